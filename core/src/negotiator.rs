//! # Negotiator: Weighted, Executable Edge
//!
//! A `Negotiator` converts a value of its source State into a value of its
//! target State. The router only reads its shape (source, target, weight);
//! callers execute it.
//!
//! ## Construction
//!
//! * **Builder pattern**: `Negotiator::convert(f).with_weight(2.0).of_content_type("text/xml").build()`
//! * **Immutable once built**: a built `Negotiator` has no setters.
//! * **Anchors**: `Negotiator::terminate(state)` marks a query endpoint and is
//!   never published into a persistent graph.

use crate::config::{DEFAULT_WEIGHT, NegotiationConfig};
use crate::error::ConversionError;
use crate::state::{State, TypeKey, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased conversion function.
pub type Transform = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// A single directed, weighted conversion between two States.
#[derive(Clone)]
pub struct Negotiator {
    source: State,
    target: State,
    weight: f64,
    label: Arc<str>,
    transform: Transform,
    anchor: bool,
}

impl Negotiator {
    /// Start a draft converting `A` into `B` with an infallible function.
    pub fn convert<A, B, F>(f: F) -> NegotiatorBuilder
    where
        A: Any + Send,
        B: Any + Send,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        Self::try_convert::<A, B, std::convert::Infallible, _>(move |a| Ok(f(a)))
    }

    /// Start a draft converting `A` into `B` with a fallible function.
    pub fn try_convert<A, B, E, F>(f: F) -> NegotiatorBuilder
    where
        A: Any + Send,
        B: Any + Send,
        E: Into<anyhow::Error>,
        F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
    {
        NegotiatorBuilder::new(State::of::<A>(), State::of::<B>(), typed_transform(f))
    }

    /// Assemble a negotiator from already type-erased parts.
    ///
    /// Used by connectors that discover conversions at runtime.
    pub fn from_parts(source: State, target: State, weight: f64, transform: Transform) -> Self {
        let label = default_label(&source, &target);
        Self {
            source,
            target,
            weight,
            label: Arc::from(label),
            transform,
            anchor: false,
        }
    }

    /// Anchor negotiator naming `state` as a query endpoint.
    pub fn terminate(state: State) -> Self {
        let label = format!("terminate({state})");
        let identity: Transform = Arc::new(|value: Value| -> anyhow::Result<Value> { Ok(value) });
        Self {
            source: state.clone(),
            target: state,
            weight: 0.0,
            label: Arc::from(label),
            transform: identity,
            anchor: true,
        }
    }

    pub fn source(&self) -> &State {
        &self.source
    }

    pub fn target(&self) -> &State {
        &self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_anchor(&self) -> bool {
        self.anchor
    }

    /// Apply the transform to `value`.
    pub fn execute(&self, value: Value) -> Result<Value, ConversionError> {
        if !self.source.accepts(&*value) {
            return Err(ConversionError::TypeMismatch {
                negotiator: self.label.to_string(),
                expected: self.source.clone(),
            });
        }
        (self.transform)(value).map_err(|source| ConversionError::Failed {
            negotiator: self.label.to_string(),
            source,
        })
    }
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator")
            .field("label", &self.label)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("weight", &self.weight)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

/// Erase a typed conversion function into a `Transform`.
///
/// The returned transform fails if handed anything other than an `A`.
pub fn typed_transform<A, B, E, F>(f: F) -> Transform
where
    A: Any + Send,
    B: Any + Send,
    E: Into<anyhow::Error>,
    F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
{
    Arc::new(move |value: Value| {
        let input = value
            .downcast::<A>()
            .map_err(|_| anyhow::anyhow!("value is not a {}", std::any::type_name::<A>()))?;
        let output = f(*input).map_err(Into::<anyhow::Error>::into)?;
        Ok(Box::new(output) as Value)
    })
}

fn default_label(source: &State, target: &State) -> String {
    format!("{source} -> {target}")
}

/// Draft of a negotiator. Setters may be called in any order; `build`
/// produces the immutable edge.
pub struct NegotiatorBuilder {
    source: State,
    target: State,
    weight: Option<f64>,
    label: Option<String>,
    transform: Transform,
}

impl NegotiatorBuilder {
    pub fn new(source: State, target: State, transform: Transform) -> Self {
        Self {
            source,
            target,
            weight: None,
            label: None,
            transform,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Tag the source State with a content type.
    pub fn of_content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.source = self.source.with_content_type(content_type);
        self
    }

    /// Tag the target State with a content type.
    pub fn as_content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.target = self.target.with_content_type(content_type);
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source_type(&self) -> TypeKey {
        self.source.type_key()
    }

    pub fn target_type(&self) -> TypeKey {
        self.target.type_key()
    }

    pub fn build(self) -> Negotiator {
        self.finish(DEFAULT_WEIGHT)
    }

    /// Like `build`, but falls back to the configured default weight.
    pub fn build_with(self, config: &NegotiationConfig) -> Negotiator {
        self.finish(config.default_weight)
    }

    fn finish(self, default_weight: f64) -> Negotiator {
        let label = self
            .label
            .unwrap_or_else(|| default_label(&self.source, &self.target));
        Negotiator {
            source: self.source,
            target: self.target,
            weight: self.weight.unwrap_or(default_weight),
            label: Arc::from(label),
            transform: self.transform,
            anchor: false,
        }
    }
}
