//! Switchyard facade crate.
//!
//! This crate re-exports core, runtime and std crates with a single entry point.
//! `Negotiation::builder()` is where most programs start.
//!
//! ```rust,ignore
//! use switchyard::prelude::*;
//!
//! switchyard::observe::init_stdout_tracing();
//!
//! let negotiation = Negotiation::builder()
//!     .provider(builtin_provider())
//!     .build()?;
//! let n: i64 = negotiation.convert(b"42".to_vec())?;
//! ```

pub use switchyard_core as core;
pub use switchyard_runtime as runtime;
#[cfg(feature = "std")]
pub use switchyard_std as std;

#[cfg(feature = "observe")]
pub mod observe;

pub use switchyard_core::{
    NegotiationConfig, NegotiationError, Negotiator, NoRouteFound, Schematic, State,
};
pub use switchyard_runtime::{Negotiation, Pipeline};

pub mod prelude {
    pub use switchyard_core::prelude::*;
    pub use switchyard_runtime::prelude::*;
    #[cfg(feature = "std")]
    pub use switchyard_std::prelude::*;
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;
    use switchyard_test::{assert_no_route, assert_route};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Celsius(f64);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Kelvin(f64);

    fn units() -> RuleConnector {
        RuleConnector::new("units")
            .rule(Negotiator::convert(|c: Celsius| Kelvin(c.0 + 273.15)).build())
            .rule(Negotiator::convert(|k: Kelvin| k.0).with_weight(0.5).build())
            .rule(Negotiator::convert(|x: f64| Celsius(x)).with_weight(0.5).build())
    }

    fn negotiation() -> Negotiation {
        Negotiation::builder()
            .provider(builtin_provider())
            .connector(units())
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_types_join_builtin_graph() {
        let negotiation = negotiation();
        let text: String = negotiation.convert(Celsius(0.0)).unwrap();
        assert_eq!(text, "273.15");

        let celsius: Celsius = negotiation.convert("21.5".to_string()).unwrap();
        assert_eq!(celsius, Celsius(21.5));
    }

    #[test]
    fn test_graph_assertions() {
        let negotiation = negotiation();
        let graph = negotiation.graph();

        assert_route!(
            *graph,
            State::of::<Celsius>(),
            State::of::<String>(),
            weight = 2.5
        );
        assert_no_route!(
            *graph,
            State::of::<Celsius>(),
            State::of::<bool>().with_content_type("x")
        );
    }

    #[test]
    fn test_schematic_serialises() {
        let json = negotiation().schematic("builtin").to_json().to_string();
        assert!(json.contains("Celsius"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_across_tasks() {
        let negotiation = Arc::new(negotiation());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let negotiation = negotiation.clone();
                tokio::spawn(async move { negotiation.convert::<i64, String>(i).unwrap() })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), i.to_string());
        }
    }
}
