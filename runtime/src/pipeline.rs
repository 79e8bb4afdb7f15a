//! # Pipeline: Executable Route
//!
//! A `Pipeline` is the runtime face of a resolved `Route`.
//!
//! ## Design Philosophy
//!
//! * **Pipeline flows, Schematic shows**: `execute` runs the chain; `schematic` describes it
//! * **Chained**: the output of negotiator *i* is the input of negotiator *i + 1*
//! * **Fail fast**: the first conversion error aborts the rest of the chain

use std::any::{Any, type_name};
use std::sync::Arc;
use switchyard_core::error::ConversionError;
use switchyard_core::negotiator::Negotiator;
use switchyard_core::router::Route;
use switchyard_core::schematic::Schematic;
use switchyard_core::state::{State, Value};
use switchyard_core::telemetry::Traced;

/// A resolved, reusable, thread-safe conversion chain.
#[derive(Debug, Clone)]
pub struct Pipeline {
    route: Arc<Route>,
}

impl Pipeline {
    pub fn new(route: Route) -> Self {
        Self {
            route: Arc::new(route),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn from(&self) -> &State {
        self.route.from()
    }

    pub fn to(&self) -> &State {
        self.route.to()
    }

    pub fn negotiators(&self) -> &[Negotiator] {
        self.route.negotiators()
    }

    pub fn total_weight(&self) -> f64 {
        self.route.total_weight()
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// Run every negotiator in order, feeding each output into the next step.
    pub fn execute(&self, value: Value) -> Result<Value, ConversionError> {
        let span = tracing::info_span!(
            "Pipeline",
            switchyard.from = %self.from(),
            switchyard.to = %self.to(),
            switchyard.steps = self.len(),
        );
        let _entered = span.enter();

        let mut value = value;
        for (step, negotiator) in self.negotiators().iter().enumerate() {
            value = Traced::new(negotiator, step).execute(value)?;
        }
        Ok(value)
    }

    /// Typed wrapper around `execute`.
    pub fn run<In, Out>(&self, input: In) -> Result<Out, ConversionError>
    where
        In: Any + Send,
        Out: Any + Send,
    {
        let output = self.execute(Box::new(input))?;
        output
            .downcast::<Out>()
            .map(|boxed| *boxed)
            .map_err(|_| ConversionError::OutputMismatch {
                produced: self.to().clone(),
                requested: type_name::<Out>(),
            })
    }

    /// Get the Schematic (structural view) of this pipeline.
    pub fn schematic(&self) -> Schematic {
        Schematic::from_route(&self.route)
    }
}
