//! Negotiation error types.

use crate::state::State;
use thiserror::Error;

/// The search finished without connecting the two endpoints.
///
/// This is an ordinary, definitive result. Callers branch on it; retrying
/// against the same graph yields the same answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No route from {from} to {to}")]
pub struct NoRouteFound {
    pub from: State,
    pub to: State,
}

impl NoRouteFound {
    pub fn new(from: State, to: State) -> Self {
        Self { from, to }
    }
}

/// Failure while executing a resolved negotiator against a concrete value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The value handed to a negotiator is not an instance of its source type.
    #[error("Negotiator {negotiator} expected {expected}, got a value of another type")]
    TypeMismatch {
        /// Label of the negotiator that rejected the value.
        negotiator: String,
        /// Source state of that negotiator.
        expected: State,
    },

    /// The transform itself failed.
    #[error("Negotiator {negotiator} failed: {source}")]
    Failed {
        negotiator: String,
        source: anyhow::Error,
    },

    /// The pipeline completed but its output could not be taken as the requested type.
    #[error("Pipeline produced {produced}, which is not the requested output type {requested}")]
    OutputMismatch {
        produced: State,
        requested: &'static str,
    },
}

/// A malformed edge or setting detected while building a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphConfigurationError {
    /// Weights must be finite and non-negative.
    #[error("Negotiator {negotiator} has invalid weight {weight}; weights must be finite and >= 0")]
    InvalidWeight { negotiator: String, weight: f64 },

    /// An anchor negotiator was published into a persistent graph.
    #[error("Anchor negotiator at {state} cannot be published into a persistent graph")]
    AnchorPublished { state: State },

    #[error("Invalid negotiation config: {0}")]
    InvalidConfig(String),
}

/// Umbrella error for callers that resolve and execute in one step.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    NoRoute(#[from] NoRouteFound),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Configuration(#[from] GraphConfigurationError),
    #[error("Failed to parse negotiation config: {0}")]
    Config(#[from] toml::de::Error),
}

impl NegotiationError {
    /// Whether this error means the graph has no path (as opposed to a broken value or graph).
    pub fn is_no_route(&self) -> bool {
        matches!(self, NegotiationError::NoRoute(_))
    }
}
