//! Switchyard runtime: executes resolved routes and serves queries over a shared graph.

pub mod cache;
pub mod negotiation;
pub mod pipeline;

pub mod prelude {
    pub use crate::negotiation::{Negotiation, NegotiationBuilder};
    pub use crate::pipeline::Pipeline;
}

pub use cache::RouteCache;
pub use negotiation::{Negotiation, NegotiationBuilder};
pub use pipeline::Pipeline;
