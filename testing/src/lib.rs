//! Test utilities for Switchyard: synthetic graphs, a brute-force oracle, and
//! assertion macros.

pub mod fixture;
mod macros;
pub mod oracle;

pub use fixture::{GraphFixture, LETTERS, Node, state};
pub use oracle::brute_force_min_weight;

use switchyard_core::error::NoRouteFound;
use switchyard_core::graph::NegotiationGraph;
use switchyard_core::router::{DijkstraRouter, Route, Router};
use switchyard_core::state::State;

#[doc(hidden)]
pub fn __route<G: NegotiationGraph>(
    graph: &G,
    from: &State,
    to: &State,
) -> Result<Route, NoRouteFound> {
    DijkstraRouter.route(graph, from, to)
}
