//! # Router: Cheapest Conversion Path
//!
//! `DijkstraRouter` runs a single-source shortest-path search over the edges a
//! `NegotiationGraph` reports, stopping once the goal State is finalised.
//!
//! ## Determinism
//!
//! The frontier is ordered by `(accumulated weight, discovery sequence)`, and a
//! State's best path is only replaced by a strictly cheaper one. When several
//! paths tie, the one discovered first (following the graph's edge order) wins,
//! so an unchanged graph always yields the same route.
//!
//! Each State is finalised once; cycles, self-loops and zero-weight edges
//! cannot make the search loop.

use crate::error::NoRouteFound;
use crate::graph::NegotiationGraph;
use crate::negotiator::Negotiator;
use crate::state::State;
use ahash::AHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Finds the cheapest negotiator chain between two States.
pub trait Router: Send + Sync {
    fn route(
        &self,
        graph: &dyn NegotiationGraph,
        from: &State,
        to: &State,
    ) -> Result<Route, NoRouteFound>;
}

/// An ordered negotiator chain from one State to another.
#[derive(Debug, Clone)]
pub struct Route {
    from: State,
    to: State,
    negotiators: Vec<Negotiator>,
    total_weight: f64,
}

impl Route {
    /// Zero-cost identity route.
    pub fn identity(state: State) -> Self {
        Self {
            from: state.clone(),
            to: state,
            negotiators: Vec::new(),
            total_weight: 0.0,
        }
    }

    pub fn from(&self) -> &State {
        &self.from
    }

    pub fn to(&self) -> &State {
        &self.to
    }

    pub fn negotiators(&self) -> &[Negotiator] {
        &self.negotiators
    }

    pub fn into_negotiators(self) -> Vec<Negotiator> {
        self.negotiators
    }

    /// Sum of the weights of every negotiator in the chain.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.negotiators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.negotiators.is_empty()
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Negotiator;
    type IntoIter = std::slice::Iter<'a, Negotiator>;

    fn into_iter(self) -> Self::IntoIter {
        self.negotiators.iter()
    }
}

/// Frontier entry. `BinaryHeap` is a max-heap, so the ordering is reversed:
/// lower cost first, then earlier discovery.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    seq: u64,
    node: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Per-call search state. Nothing here outlives a single `route` call.
struct Search<'g> {
    ids: AHashMap<&'g State, usize>,
    states: Vec<&'g State>,
    dist: Vec<f64>,
    prev: Vec<Option<(usize, &'g Negotiator)>>,
    done: Vec<bool>,
}

impl<'g> Search<'g> {
    fn new() -> Self {
        Self {
            ids: AHashMap::new(),
            states: Vec::new(),
            dist: Vec::new(),
            prev: Vec::new(),
            done: Vec::new(),
        }
    }

    fn intern(&mut self, state: &'g State) -> usize {
        if let Some(&id) = self.ids.get(state) {
            return id;
        }
        let id = self.states.len();
        self.ids.insert(state, id);
        self.states.push(state);
        self.dist.push(f64::INFINITY);
        self.prev.push(None);
        self.done.push(false);
        id
    }

    fn path_to(&self, goal: usize) -> Vec<Negotiator> {
        let mut path = Vec::new();
        let mut node = goal;
        while let Some((parent, edge)) = self.prev[node] {
            path.push(edge.clone());
            node = parent;
        }
        path.reverse();
        path
    }
}

/// Binary-heap Dijkstra with deterministic tie-breaking.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraRouter;

impl DijkstraRouter {
    pub fn new() -> Self {
        Self
    }
}

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph: &dyn NegotiationGraph,
        from: &State,
        to: &State,
    ) -> Result<Route, NoRouteFound> {
        if from == to {
            return Ok(Route::identity(from.clone()));
        }

        let mut search = Search::new();
        let start = search.intern(from);
        let goal = search.intern(to);
        search.dist[start] = 0.0;

        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;
        heap.push(Frontier {
            cost: 0.0,
            seq,
            node: start,
        });

        let mut expanded = 0usize;
        while let Some(Frontier { cost, node, .. }) = heap.pop() {
            if search.done[node] {
                continue;
            }
            search.done[node] = true;
            if node == goal {
                let negotiators = search.path_to(goal);
                tracing::debug!(
                    %from,
                    %to,
                    hops = negotiators.len(),
                    weight = cost,
                    expanded,
                    "Route found"
                );
                return Ok(Route {
                    from: from.clone(),
                    to: to.clone(),
                    negotiators,
                    total_weight: cost,
                });
            }
            expanded += 1;

            for edge in graph.edges(search.states[node]) {
                let next = search.intern(edge.target());
                if search.done[next] {
                    continue;
                }
                let candidate = cost + edge.weight();
                if candidate < search.dist[next] {
                    search.dist[next] = candidate;
                    search.prev[next] = Some((node, edge));
                    seq += 1;
                    heap.push(Frontier {
                        cost: candidate,
                        seq,
                        node: next,
                    });
                }
            }
        }

        tracing::debug!(%from, %to, expanded, "No route found");
        Err(NoRouteFound::new(from.clone(), to.clone()))
    }
}

/// Route with the default `DijkstraRouter`.
pub fn route(
    graph: &dyn NegotiationGraph,
    from: &State,
    to: &State,
) -> Result<Route, NoRouteFound> {
    DijkstraRouter.route(graph, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DefaultNegotiationGraph;

    #[derive(Debug, PartialEq)]
    struct A(u32);
    #[derive(Debug, PartialEq)]
    struct B(u32);
    #[derive(Debug, PartialEq)]
    struct C(u32);
    struct D;

    fn edge<X, Y>(label: &str, weight: f64, f: fn(X) -> Y) -> Negotiator
    where
        X: Send + 'static,
        Y: Send + 'static,
    {
        Negotiator::convert(f).with_weight(weight).labeled(label).build()
    }

    fn labels(route: &Route) -> Vec<&str> {
        route.negotiators().iter().map(|n| n.label()).collect()
    }

    #[test]
    fn test_prefers_cheaper_two_hop_path() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("a->b", 1.0, |a: A| B(a.0 + 1)),
            edge("b->c", 2.0, |b: B| C(b.0 * 10)),
            edge("a->c", 5.0, |a: A| C(a.0)),
        ])
        .unwrap();

        let route = DijkstraRouter
            .route(&graph, &State::of::<A>(), &State::of::<C>())
            .unwrap();

        assert_eq!(labels(&route), vec!["a->b", "b->c"]);
        assert_eq!(route.total_weight(), 3.0);
        assert_eq!(route.from(), &State::of::<A>());
        assert_eq!(route.to(), &State::of::<C>());

        let owned = route.into_negotiators();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[1].label(), "b->c");
    }

    #[test]
    fn test_same_endpoint_is_empty() {
        let graph = DefaultNegotiationGraph::from_negotiators(Vec::new()).unwrap();
        let state = State::of::<A>();

        let route = route(&graph, &state, &state).unwrap();
        assert!(route.is_empty());
        assert_eq!(route.total_weight(), 0.0);
    }

    #[test]
    fn test_content_type_tags_narrow_edges() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            Negotiator::convert(|a: A| B(a.0))
                .of_content_type("text/xml")
                .as_content_type("application/pdf")
                .build(),
        ])
        .unwrap();

        let xml = State::of::<A>().with_content_type("text/xml");
        let pdf = State::of::<B>().with_content_type("application/pdf");
        assert_eq!(route(&graph, &xml, &pdf).unwrap().len(), 1);

        let json = State::of::<A>().with_content_type("application/json");
        assert!(route(&graph, &json, &pdf).is_err());

        let html = State::of::<B>().with_content_type("text/html");
        assert!(route(&graph, &xml, &html).is_err());

        assert!(route(&graph, &State::of::<A>(), &State::of::<B>()).is_err());
    }

    #[test]
    fn test_cycle_with_unreachable_goal_terminates() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("a->b", 1.0, |a: A| B(a.0)),
            edge("b->c", 1.0, |b: B| C(b.0)),
            edge("c->a", 1.0, |c: C| A(c.0)),
        ])
        .unwrap();

        let err = route(&graph, &State::of::<A>(), &State::of::<D>()).unwrap_err();
        assert_eq!(err.from, State::of::<A>());
        assert_eq!(err.to, State::of::<D>());
    }

    #[test]
    fn test_self_loops_and_zero_weights() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("a->a", 0.0, |a: A| a),
            edge("a->b", 0.0, |a: A| B(a.0)),
            edge("b->b", 0.0, |b: B| b),
            edge("b->c", 0.0, |b: B| C(b.0)),
        ])
        .unwrap();

        let route = route(&graph, &State::of::<A>(), &State::of::<C>()).unwrap();
        assert_eq!(labels(&route), vec!["a->b", "b->c"]);
        assert_eq!(route.total_weight(), 0.0);
    }

    #[test]
    fn test_equal_cost_ties_pick_first_discovered() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("a->b#1", 1.0, |a: A| B(a.0)),
            edge("a->b#2", 1.0, |a: A| B(a.0 + 100)),
            edge("a->c", 1.0, |a: A| C(a.0)),
            edge("b->d", 1.0, |_: B| D),
            edge("c->d", 1.0, |_: C| D),
        ])
        .unwrap();

        let first = route(&graph, &State::of::<A>(), &State::of::<D>()).unwrap();
        assert_eq!(labels(&first), vec!["a->b#1", "b->d"]);

        for _ in 0..10 {
            let again = route(&graph, &State::of::<A>(), &State::of::<D>()).unwrap();
            assert_eq!(labels(&again), labels(&first));
        }
    }

    #[test]
    fn test_parallel_edges_cheapest_wins() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("slow", 4.0, |a: A| B(a.0)),
            edge("fast", 2.0, |a: A| B(a.0)),
        ])
        .unwrap();

        let route = route(&graph, &State::of::<A>(), &State::of::<B>()).unwrap();
        assert_eq!(labels(&route), vec!["fast"]);
    }

    #[test]
    fn test_route_executes_in_order() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            edge("a->b", 1.0, |a: A| B(a.0 + 1)),
            edge("b->c", 1.0, |b: B| C(b.0 * 10)),
        ])
        .unwrap();

        let route = route(&graph, &State::of::<A>(), &State::of::<C>()).unwrap();
        let mut value: crate::state::Value = Box::new(A(4));
        for negotiator in &route {
            value = negotiator.execute(value).unwrap();
        }
        assert_eq!(*value.downcast::<C>().unwrap(), C(50));
    }

    #[test]
    fn test_unknown_start_state() {
        let graph =
            DefaultNegotiationGraph::from_negotiators(vec![edge("b->c", 1.0, |b: B| C(b.0))])
                .unwrap();
        assert!(route(&graph, &State::of::<A>(), &State::of::<C>()).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_routing_over_shared_graph() {
        let graph = std::sync::Arc::new(
            DefaultNegotiationGraph::from_negotiators(vec![
                edge("a->b", 1.0, |a: A| B(a.0)),
                edge("b->c", 1.0, |b: B| C(b.0)),
            ])
            .unwrap(),
        );

        let mut handles = Vec::new();
        for _ in 0..16 {
            let graph = graph.clone();
            handles.push(tokio::spawn(async move {
                route(graph.as_ref(), &State::of::<A>(), &State::of::<C>())
                    .map(|r| r.total_weight())
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2.0);
        }
    }
}
