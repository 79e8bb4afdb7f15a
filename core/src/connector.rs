//! # Connectors: Sources of Negotiators
//!
//! * `Connector`: one cohesive group of negotiators from a single logical source.
//! * `ConnectorProvider`: supplies connectors; providers compose by concatenation.
//! * `NegotiatorProvider`: configures every connector exactly once and caches the
//!   flattened edge set for its lifetime.

use crate::negotiator::Negotiator;
use std::sync::{Arc, OnceLock};

/// A named group of negotiators.
///
/// `configure` may be expensive (catalog scans, reflection-like discovery).
/// `NegotiatorProvider` calls it once per provider instance.
pub trait Connector: Send + Sync {
    fn name(&self) -> &str;
    fn configure(&self) -> Vec<Negotiator>;
}

/// Supplies a collection of connectors.
pub trait ConnectorProvider: Send + Sync {
    fn connectors(&self) -> Vec<Arc<dyn Connector>>;
}

impl ConnectorProvider for Vec<Arc<dyn Connector>> {
    fn connectors(&self) -> Vec<Arc<dyn Connector>> {
        self.clone()
    }
}

impl<P: ConnectorProvider + ?Sized> ConnectorProvider for Arc<P> {
    fn connectors(&self) -> Vec<Arc<dyn Connector>> {
        (**self).connectors()
    }
}

/// Fixed list of connectors, registered up front.
#[derive(Default, Clone)]
pub struct StaticConnectorProvider {
    connectors: Vec<Arc<dyn Connector>>,
}

impl StaticConnectorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connectors.push(Arc::new(connector));
        self
    }

    pub fn push(&mut self, connector: Arc<dyn Connector>) {
        self.connectors.push(connector);
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl ConnectorProvider for StaticConnectorProvider {
    fn connectors(&self) -> Vec<Arc<dyn Connector>> {
        self.connectors.clone()
    }
}

impl std::fmt::Debug for StaticConnectorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticConnectorProvider")
            .field(
                "connectors",
                &self.connectors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Flattens every connector of every provider into one edge set.
///
/// The edge set is computed on first access and never recomputed.
pub struct NegotiatorProvider {
    providers: Vec<Arc<dyn ConnectorProvider>>,
    negotiators: OnceLock<Arc<[Negotiator]>>,
}

impl NegotiatorProvider {
    pub fn new(providers: Vec<Arc<dyn ConnectorProvider>>) -> Self {
        Self {
            providers,
            negotiators: OnceLock::new(),
        }
    }

    /// Provider over a single connector provider.
    pub fn single<P: ConnectorProvider + 'static>(provider: P) -> Self {
        let provider: Arc<dyn ConnectorProvider> = Arc::new(provider);
        Self::new(vec![provider])
    }

    /// The flattened edge set, in provider then connector then configure order.
    pub fn negotiators(&self) -> &[Negotiator] {
        self.negotiators.get_or_init(|| self.collect())
    }

    /// Shared handle to the flattened edge set.
    pub fn shared(&self) -> Arc<[Negotiator]> {
        self.negotiators.get_or_init(|| self.collect()).clone()
    }

    pub fn is_configured(&self) -> bool {
        self.negotiators.get().is_some()
    }

    fn collect(&self) -> Arc<[Negotiator]> {
        let mut all = Vec::new();
        let mut connector_count = 0usize;
        for provider in &self.providers {
            for connector in provider.connectors() {
                let produced = connector.configure();
                tracing::debug!(
                    connector = connector.name(),
                    negotiators = produced.len(),
                    "Connector configured"
                );
                connector_count += 1;
                all.extend(produced);
            }
        }
        tracing::info!(
            providers = self.providers.len(),
            connectors = connector_count,
            negotiators = all.len(),
            "Negotiator set assembled"
        );
        Arc::from(all)
    }
}

impl std::fmt::Debug for NegotiatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiatorProvider")
            .field("providers", &self.providers.len())
            .field("configured", &self.is_configured())
            .finish()
    }
}
