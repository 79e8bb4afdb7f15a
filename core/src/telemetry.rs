//! # Telemetry: Observability Decorators
//!
//! This module provides decorators for adding observability to negotiator execution.

use crate::error::ConversionError;
use crate::negotiator::Negotiator;
use crate::state::Value;

/// A wrapper that adds telemetry (tracing) to any inner Negotiator.
/// This is the "Decorator" pattern for observability; the inner edge is untouched.
#[derive(Clone, Copy)]
pub struct Traced<'a> {
    inner: &'a Negotiator,
    step: usize,
}

impl<'a> Traced<'a> {
    pub fn new(inner: &'a Negotiator, step: usize) -> Self {
        Self { inner, step }
    }

    pub fn inner(&self) -> &'a Negotiator {
        self.inner
    }

    pub fn execute(&self, value: Value) -> Result<Value, ConversionError> {
        let span = tracing::info_span!(
            "negotiator",
            switchyard.negotiator = %self.inner.label(),
            switchyard.step = self.step,
            switchyard.source = %self.inner.source(),
            switchyard.target = %self.inner.target(),
        );
        let _entered = span.enter();

        tracing::debug!("Entering negotiator");
        let start = std::time::Instant::now();

        let result = self.inner.execute(value);

        let duration = start.elapsed();
        match &result {
            Ok(_) => {
                tracing::debug!(?duration, "Negotiator completed");
            }
            Err(e) => {
                tracing::error!(error = %e, ?duration, "Negotiator failed");
            }
        }
        result
    }
}
