//! Exhaustive reference search for checking the router on small graphs.

use crate::fixture::FixtureEdge;

/// Minimum total weight over every simple path from `from` to `to`.
///
/// Returns `Some(0.0)` when `from == to` and `None` when `to` is unreachable.
/// Exponential in the number of letters; intended for graphs of a handful of nodes.
pub fn brute_force_min_weight(edges: &[FixtureEdge], from: char, to: char) -> Option<f64> {
    if from == to {
        return Some(0.0);
    }
    let mut visited = vec![from];
    let mut best = None;
    walk(edges, from, to, 0.0, &mut visited, &mut best);
    best
}

fn walk(
    edges: &[FixtureEdge],
    at: char,
    goal: char,
    cost: f64,
    visited: &mut Vec<char>,
    best: &mut Option<f64>,
) {
    for edge in edges.iter().filter(|e| e.from == at) {
        if visited.contains(&edge.to) {
            continue;
        }
        let total = cost + edge.weight;
        if edge.to == goal {
            if best.is_none_or(|b| total < b) {
                *best = Some(total);
            }
            continue;
        }
        visited.push(edge.to);
        walk(edges, edge.to, goal, total, visited, best);
        visited.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::GraphFixture;

    #[test]
    fn test_oracle_finds_cheapest() {
        let fixture = GraphFixture::new()
            .edge('A', 'B', 1.0)
            .edge('B', 'C', 2.0)
            .edge('A', 'C', 5.0);

        assert_eq!(fixture.min_weight('A', 'C'), Some(3.0));
        assert_eq!(fixture.min_weight('C', 'A'), None);
        assert_eq!(fixture.min_weight('B', 'B'), Some(0.0));
    }

    #[test]
    fn test_oracle_handles_cycles() {
        let fixture = GraphFixture::new()
            .edge('A', 'B', 1.0)
            .edge('B', 'C', 1.0)
            .edge('C', 'A', 1.0);

        assert_eq!(fixture.min_weight('A', 'D'), None);
        assert_eq!(fixture.min_weight('C', 'B'), Some(2.0));
    }
}
