//! # Negotiation Graph: Adjacency Index
//!
//! The graph indexes negotiators by their source State. Outgoing-edge lookup
//! costs a hash probe plus the size of that State's bucket, independent of the
//! total edge count.
//!
//! * `DefaultNegotiationGraph`: built once from one or more `NegotiatorProvider`s.
//! * `MergedNegotiationGraph`: a base graph plus a small per-query edge set,
//!   looked up side by side. The base is borrowed, never copied or mutated.

use crate::connector::NegotiatorProvider;
use crate::error::GraphConfigurationError;
use crate::negotiator::Negotiator;
use crate::state::State;
use ahash::{AHashMap, AHashSet};

/// Boxed iterator over borrowed negotiators.
pub type EdgeIter<'a> = Box<dyn Iterator<Item = &'a Negotiator> + 'a>;

/// Read-only view of a directed, weighted negotiation graph.
pub trait NegotiationGraph: Send + Sync {
    /// Outgoing edges of `state`, in a stable order.
    fn edges<'a>(&'a self, state: &State) -> EdgeIter<'a>;

    /// Every edge of the graph.
    fn negotiators<'a>(&'a self) -> EdgeIter<'a>;

    /// Whether `state` appears as the source or target of any edge.
    fn contains(&self, state: &State) -> bool;
}

/// Edges grouped by source State, preserving insertion order per bucket.
#[derive(Default)]
struct EdgeIndex {
    negotiators: Vec<Negotiator>,
    by_source: AHashMap<State, Vec<usize>>,
    states: AHashSet<State>,
}

impl EdgeIndex {
    fn build<I>(negotiators: I, allow_anchors: bool) -> Result<Self, GraphConfigurationError>
    where
        I: IntoIterator<Item = Negotiator>,
    {
        let mut index = EdgeIndex::default();
        for negotiator in negotiators {
            validate(&negotiator, allow_anchors)?;
            let position = index.negotiators.len();
            index
                .by_source
                .entry(negotiator.source().clone())
                .or_default()
                .push(position);
            index.states.insert(negotiator.source().clone());
            index.states.insert(negotiator.target().clone());
            index.negotiators.push(negotiator);
        }
        Ok(index)
    }

    fn edges<'a>(&'a self, state: &State) -> EdgeIter<'a> {
        match self.by_source.get(state) {
            Some(positions) => Box::new(positions.iter().map(move |&i| &self.negotiators[i])),
            None => Box::new(std::iter::empty()),
        }
    }
}

fn validate(negotiator: &Negotiator, allow_anchors: bool) -> Result<(), GraphConfigurationError> {
    let weight = negotiator.weight();
    if !weight.is_finite() || weight < 0.0 {
        return Err(GraphConfigurationError::InvalidWeight {
            negotiator: negotiator.label().to_string(),
            weight,
        });
    }
    if negotiator.is_anchor() && !allow_anchors {
        return Err(GraphConfigurationError::AnchorPublished {
            state: negotiator.source().clone(),
        });
    }
    Ok(())
}

/// The long-lived graph built from the flattened provider edge sets.
pub struct DefaultNegotiationGraph {
    index: EdgeIndex,
}

impl DefaultNegotiationGraph {
    /// Index every negotiator of every provider.
    ///
    /// Fails wholesale on the first malformed edge; no partial graph is returned.
    pub fn new(providers: &[&NegotiatorProvider]) -> Result<Self, GraphConfigurationError> {
        Self::from_negotiators(
            providers
                .iter()
                .flat_map(|provider| provider.negotiators().iter().cloned()),
        )
    }

    pub fn from_negotiators<I>(negotiators: I) -> Result<Self, GraphConfigurationError>
    where
        I: IntoIterator<Item = Negotiator>,
    {
        let index = EdgeIndex::build(negotiators, false).inspect_err(|e| {
            tracing::error!(error = %e, "Rejected negotiation graph");
        })?;
        tracing::info!(
            states = index.states.len(),
            edges = index.negotiators.len(),
            "Negotiation graph indexed"
        );
        Ok(Self { index })
    }

    pub fn state_count(&self) -> usize {
        self.index.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.index.negotiators.len()
    }

    /// Borrow this graph together with per-query `extra` edges.
    pub fn merge<I>(&self, extra: I) -> Result<MergedNegotiationGraph<'_>, GraphConfigurationError>
    where
        I: IntoIterator<Item = Negotiator>,
    {
        MergedNegotiationGraph::new(self, extra)
    }
}

impl NegotiationGraph for DefaultNegotiationGraph {
    fn edges<'a>(&'a self, state: &State) -> EdgeIter<'a> {
        self.index.edges(state)
    }

    fn negotiators<'a>(&'a self) -> EdgeIter<'a> {
        Box::new(self.index.negotiators.iter())
    }

    fn contains(&self, state: &State) -> bool {
        self.index.states.contains(state)
    }
}

impl std::fmt::Debug for DefaultNegotiationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultNegotiationGraph")
            .field("states", &self.state_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// A base graph seen together with edges that exist only for this instance.
///
/// Lookups yield the base graph's edges first, then the extra edges.
/// Anchor negotiators are accepted here, unlike in `DefaultNegotiationGraph`.
pub struct MergedNegotiationGraph<'a> {
    base: &'a dyn NegotiationGraph,
    extra: EdgeIndex,
}

impl<'a> MergedNegotiationGraph<'a> {
    pub fn new<I>(base: &'a dyn NegotiationGraph, extra: I) -> Result<Self, GraphConfigurationError>
    where
        I: IntoIterator<Item = Negotiator>,
    {
        Ok(Self {
            base,
            extra: EdgeIndex::build(extra, true)?,
        })
    }

    /// Number of edges contributed by this merge (not counting the base).
    pub fn extra_edge_count(&self) -> usize {
        self.extra.negotiators.len()
    }
}

impl NegotiationGraph for MergedNegotiationGraph<'_> {
    fn edges<'b>(&'b self, state: &State) -> EdgeIter<'b> {
        Box::new(self.base.edges(state).chain(self.extra.edges(state)))
    }

    fn negotiators<'b>(&'b self) -> EdgeIter<'b> {
        Box::new(self.base.negotiators().chain(self.extra.negotiators.iter()))
    }

    fn contains(&self, state: &State) -> bool {
        self.extra.states.contains(state) || self.base.contains(state)
    }
}

impl std::fmt::Debug for MergedNegotiationGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedNegotiationGraph")
            .field("extra_edges", &self.extra_edge_count())
            .finish_non_exhaustive()
    }
}
