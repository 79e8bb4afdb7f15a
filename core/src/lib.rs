//! Switchyard core: negotiation graph and shortest-path router.
//!
//! Connectors describe conversions, providers flatten them into one edge set,
//! the graph indexes that set by source State, and the router finds the
//! cheapest chain of negotiators between two States.

pub mod config;
pub mod connector;
pub mod error;
pub mod graph;
pub mod negotiator;
pub mod router;
pub mod schematic;
pub mod state;
pub mod telemetry;

pub use config::NegotiationConfig;
pub use connector::{Connector, ConnectorProvider, NegotiatorProvider, StaticConnectorProvider};
pub use error::{ConversionError, GraphConfigurationError, NegotiationError, NoRouteFound};
pub use graph::{DefaultNegotiationGraph, MergedNegotiationGraph, NegotiationGraph};
pub use negotiator::{Negotiator, NegotiatorBuilder, Transform, typed_transform};
pub use router::{DijkstraRouter, Route, Router};
pub use schematic::Schematic;
pub use state::{State, TypeKey, Value};

pub mod prelude {
    pub use crate::config::NegotiationConfig;
    pub use crate::connector::{
        Connector, ConnectorProvider, NegotiatorProvider, StaticConnectorProvider,
    };
    pub use crate::error::{
        ConversionError, GraphConfigurationError, NegotiationError, NoRouteFound,
    };
    pub use crate::graph::{DefaultNegotiationGraph, MergedNegotiationGraph, NegotiationGraph};
    pub use crate::negotiator::{Negotiator, NegotiatorBuilder};
    pub use crate::router::{DijkstraRouter, Route, Router};
    pub use crate::state::{State, TypeKey, Value};
}
