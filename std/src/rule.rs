use switchyard_core::connector::Connector;
use switchyard_core::negotiator::Negotiator;

/// A named, hand-authored list of negotiators.
///
/// ```rust,ignore
/// let units = RuleConnector::new("units")
///     .rule(Negotiator::convert(|c: Celsius| Kelvin(c.0 + 273.15)).build())
///     .rule(Negotiator::convert(|k: Kelvin| Celsius(k.0 - 273.15)).build());
/// ```
#[derive(Debug, Clone)]
pub struct RuleConnector {
    name: String,
    negotiators: Vec<Negotiator>,
}

impl RuleConnector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negotiators: Vec::new(),
        }
    }

    pub fn rule(mut self, negotiator: Negotiator) -> Self {
        self.negotiators.push(negotiator);
        self
    }

    pub fn push(&mut self, negotiator: Negotiator) {
        self.negotiators.push(negotiator);
    }

    pub fn len(&self) -> usize {
        self.negotiators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.negotiators.is_empty()
    }
}

impl Connector for RuleConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&self) -> Vec<Negotiator> {
        self.negotiators.clone()
    }
}
