//! Synthetic graphs over letter-named node types.
//!
//! Every letter `'A'..='H'` is its own Rust type (`Node<'A'>`, `Node<'B'>`, ...),
//! so fixtures exercise real type-keyed States. Values carry the trail of
//! letters they passed through, which makes execution order observable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use switchyard_core::error::GraphConfigurationError;
use switchyard_core::graph::DefaultNegotiationGraph;
use switchyard_core::negotiator::{Negotiator, NegotiatorBuilder, Transform};
use switchyard_core::state::{State, Value};

/// Fixture node type. The payload is the trail of visited letters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node<const L: char>(pub Vec<char>);

pub type A = Node<'A'>;
pub type B = Node<'B'>;
pub type C = Node<'C'>;
pub type D = Node<'D'>;
pub type E = Node<'E'>;
pub type F = Node<'F'>;
pub type G = Node<'G'>;
pub type H = Node<'H'>;

pub const LETTERS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

macro_rules! by_letter {
    ($letter:expr, |$ty:ident| $body:expr) => {
        match $letter {
            'A' => { type $ty = A; Some($body) }
            'B' => { type $ty = B; Some($body) }
            'C' => { type $ty = C; Some($body) }
            'D' => { type $ty = D; Some($body) }
            'E' => { type $ty = E; Some($body) }
            'F' => { type $ty = F; Some($body) }
            'G' => { type $ty = G; Some($body) }
            'H' => { type $ty = H; Some($body) }
            _ => None,
        }
    };
}

/// Untagged State of the node type named by `letter`.
///
/// # Panics
/// If `letter` is not one of `LETTERS`.
pub fn state(letter: char) -> State {
    by_letter!(letter, |T| State::of::<T>())
        .unwrap_or_else(|| panic!("unknown fixture letter {letter:?}"))
}

/// Box a trail as a value of the node type named by `letter`.
pub fn wrap(letter: char, trail: Vec<char>) -> Option<Value> {
    by_letter!(letter, |T| Box::new(T::from_trail(trail)) as Value)
}

/// Recover the trail from a fixture value of any letter.
pub fn trail_of(value: Value) -> Option<Vec<char>> {
    let mut value = value;
    for letter in LETTERS {
        match take_trail(letter, value) {
            Ok(trail) => return Some(trail),
            Err(back) => value = back,
        }
    }
    None
}

fn take_trail(letter: char, value: Value) -> Result<Vec<char>, Value> {
    match by_letter!(letter, |T| value.downcast::<T>().map(|node| node.0)) {
        Some(result) => result,
        None => Err(Box::new(()) as Value),
    }
}

impl<const L: char> Node<L> {
    fn from_trail(trail: Vec<char>) -> Self {
        Node(trail)
    }

    /// A fresh value that has only visited its own letter.
    pub fn start() -> Self {
        Node(vec![L])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureEdge {
    pub from: char,
    pub to: char,
    pub weight: f64,
    pub label: String,
}

/// Declarative edge list that turns into negotiators or a graph.
#[derive(Debug, Clone, Default)]
pub struct GraphFixture {
    edges: Vec<FixtureEdge>,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `from -> to` labelled `"{from}->{to}"`.
    pub fn edge(self, from: char, to: char, weight: f64) -> Self {
        let label = format!("{from}->{to}");
        self.labeled_edge(from, to, weight, label)
    }

    pub fn labeled_edge(
        mut self,
        from: char,
        to: char,
        weight: f64,
        label: impl Into<String>,
    ) -> Self {
        assert!(LETTERS.contains(&from), "unknown fixture letter {from:?}");
        assert!(LETTERS.contains(&to), "unknown fixture letter {to:?}");
        self.edges.push(FixtureEdge {
            from,
            to,
            weight,
            label: label.into(),
        });
        self
    }

    /// Random graph over the first `letters` letters with integer weights in `0..=4`.
    ///
    /// Small integer weights make equal-cost ties common.
    pub fn random(seed: u64, letters: usize, edges: usize) -> Self {
        let letters = letters.clamp(1, LETTERS.len());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut fixture = Self::new();
        for i in 0..edges {
            let from = LETTERS[rng.gen_range(0..letters)];
            let to = LETTERS[rng.gen_range(0..letters)];
            let weight = rng.gen_range(0..=4) as f64;
            fixture = fixture.labeled_edge(from, to, weight, format!("{from}->{to}#{i}"));
        }
        fixture
    }

    pub fn edges(&self) -> &[FixtureEdge] {
        &self.edges
    }

    pub fn negotiators(&self) -> Vec<Negotiator> {
        self.edges
            .iter()
            .map(|edge| {
                NegotiatorBuilder::new(state(edge.from), state(edge.to), appender(edge.to))
                    .with_weight(edge.weight)
                    .labeled(edge.label.clone())
                    .build()
            })
            .collect()
    }

    pub fn graph(&self) -> Result<DefaultNegotiationGraph, GraphConfigurationError> {
        DefaultNegotiationGraph::from_negotiators(self.negotiators())
    }

    /// Minimum total weight over all simple paths, by exhaustive search.
    pub fn min_weight(&self, from: char, to: char) -> Option<f64> {
        crate::oracle::brute_force_min_weight(&self.edges, from, to)
    }
}

/// Transform appending `to` to the trail and re-boxing as `Node<to>`.
fn appender(to: char) -> Transform {
    std::sync::Arc::new(move |value: Value| {
        let mut trail =
            trail_of(value).ok_or_else(|| anyhow::anyhow!("not a fixture node value"))?;
        trail.push(to);
        wrap(to, trail).ok_or_else(|| anyhow::anyhow!("unknown fixture letter {to:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_are_distinct_states() {
        assert_ne!(state('A'), state('B'));
        assert_eq!(state('C'), State::of::<C>());
    }

    #[test]
    fn test_wrap_and_trail() {
        let value = wrap('D', vec!['A', 'D']).unwrap();
        assert!(state('D').accepts(&*value));
        assert_eq!(trail_of(value), Some(vec!['A', 'D']));
        assert!(wrap('Z', Vec::new()).is_none());
    }

    #[test]
    fn test_negotiators_append_trail() {
        let fixture = GraphFixture::new().edge('A', 'B', 1.0);
        let negotiators = fixture.negotiators();

        assert_eq!(negotiators[0].label(), "A->B");
        let out = negotiators[0].execute(Box::new(A::start())).unwrap();
        assert_eq!(*out.downcast::<B>().unwrap(), Node(vec!['A', 'B']));
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = GraphFixture::random(7, 5, 12);
        let b = GraphFixture::random(7, 5, 12);
        assert_eq!(a.edges(), b.edges());
        assert!(a.edges().iter().all(|e| LETTERS[..5].contains(&e.from)));
    }
}
