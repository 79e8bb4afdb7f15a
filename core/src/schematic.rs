use crate::graph::NegotiationGraph;
use crate::router::Route;
use crate::state::State;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The Static Analysis View of a negotiation graph or route.
///
/// `Schematic` is a plain node/edge snapshot extracted from a graph.
/// It is used for visualization, documentation, and verification.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Schematic {
    pub name: String,
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Snapshot every State and edge of `graph`, in the graph's enumeration order.
    pub fn from_graph(name: impl Into<String>, graph: &dyn NegotiationGraph) -> Self {
        let mut builder = SchematicBuilder::new(name);
        for negotiator in graph.negotiators() {
            builder.edge(
                negotiator.source(),
                negotiator.target(),
                negotiator.label(),
                negotiator.weight(),
            );
        }
        builder.finish()
    }

    /// Snapshot a resolved route as a chain from its start to its goal.
    pub fn from_route(route: &Route) -> Self {
        let mut builder = SchematicBuilder::new(format!("{} -> {}", route.from(), route.to()));
        builder.node(route.from());
        for negotiator in route {
            builder.edge(
                negotiator.source(),
                negotiator.target(),
                negotiator.label(),
                negotiator.weight(),
            );
        }
        builder.mark(route.to(), NodeKind::Egress);
        builder.mark(route.from(), NodeKind::Ingress);
        builder.finish()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String, // full type path plus content-type tag, unique per State
    pub label: String,
    pub kind: NodeKind,
    pub type_name: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    Ingress, // Route start
    State,   // Intermediate / plain graph node
    Egress,  // Route goal
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub weight: f64,
}

struct SchematicBuilder {
    schematic: Schematic,
    seen: AHashMap<State, usize>,
}

impl SchematicBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            schematic: Schematic::new(name),
            seen: AHashMap::new(),
        }
    }

    fn node(&mut self, state: &State) -> String {
        if let Some(&idx) = self.seen.get(state) {
            return self.schematic.nodes[idx].id.clone();
        }
        let id = match state.content_type() {
            Some(ct) => format!("{}[{}]", state.type_key().name(), ct),
            None => state.type_key().name().to_string(),
        };
        self.seen.insert(state.clone(), self.schematic.nodes.len());
        self.schematic.nodes.push(Node {
            id: id.clone(),
            label: state.to_string(),
            kind: NodeKind::State,
            type_name: state.type_key().name().to_string(),
            content_type: state.content_type().map(str::to_string),
        });
        id
    }

    fn mark(&mut self, state: &State, kind: NodeKind) {
        if let Some(&idx) = self.seen.get(state) {
            self.schematic.nodes[idx].kind = kind;
        }
    }

    fn edge(&mut self, from: &State, to: &State, label: &str, weight: f64) {
        let from = self.node(from);
        let to = self.node(to);
        self.schematic.edges.push(Edge {
            from,
            to,
            label: label.to_string(),
            weight,
        });
    }

    fn finish(self) -> Schematic {
        self.schematic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DefaultNegotiationGraph;
    use crate::negotiator::Negotiator;
    use crate::router::route;

    fn graph() -> DefaultNegotiationGraph {
        DefaultNegotiationGraph::from_negotiators(vec![
            Negotiator::convert(|x: u8| x as u16).labeled("widen8").build(),
            Negotiator::convert(|x: u16| x as u32)
                .with_weight(2.0)
                .labeled("widen16")
                .build(),
            Negotiator::convert(|x: u16| x.to_string())
                .as_content_type("text/plain")
                .labeled("render")
                .build(),
        ])
        .unwrap()
    }

    #[test]
    fn test_graph_snapshot() {
        let schematic = Schematic::from_graph("numbers", &graph());

        let labels: Vec<&str> = schematic.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["u8", "u16", "u32", "String[text/plain]"]);
        assert_eq!(
            schematic.nodes[3].id,
            format!("{}[text/plain]", std::any::type_name::<String>())
        );
        assert_eq!(schematic.edges.len(), 3);
        assert_eq!(schematic.edges[1].weight, 2.0);
        assert_eq!(schematic.nodes[3].content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_route_snapshot_marks_endpoints() {
        let graph = graph();
        let route = route(&graph, &State::of::<u8>(), &State::of::<u32>()).unwrap();
        let schematic = Schematic::from_route(&route);

        assert_eq!(schematic.nodes.len(), 3);
        assert_eq!(schematic.nodes[0].kind, NodeKind::Ingress);
        assert_eq!(schematic.nodes[1].kind, NodeKind::State);
        assert_eq!(schematic.nodes[2].kind, NodeKind::Egress);
    }

    mod imperial {
        pub struct Meters;
    }

    mod metric {
        pub struct Meters;
    }

    #[test]
    fn test_same_short_name_keeps_distinct_ids() {
        let graph = DefaultNegotiationGraph::from_negotiators(vec![
            Negotiator::convert(|_: imperial::Meters| metric::Meters).build(),
        ])
        .unwrap();
        let schematic = Schematic::from_graph("meters", &graph);

        assert_eq!(schematic.nodes.len(), 2);
        assert_eq!(schematic.nodes[0].label, schematic.nodes[1].label);
        assert_ne!(schematic.nodes[0].id, schematic.nodes[1].id);
        assert_eq!(schematic.edges[0].from, schematic.nodes[0].id);
        assert_eq!(schematic.edges[0].to, schematic.nodes[1].id);

        let route = route(
            &graph,
            &State::of::<imperial::Meters>(),
            &State::of::<metric::Meters>(),
        )
        .unwrap();
        let schematic = Schematic::from_route(&route);
        assert_eq!(schematic.nodes[0].kind, NodeKind::Ingress);
        assert_eq!(schematic.nodes[1].kind, NodeKind::Egress);
    }

    #[test]
    fn test_identity_route_is_ingress() {
        let route = Route::identity(State::of::<u8>());
        let schematic = Schematic::from_route(&route).with_description("no-op");

        assert_eq!(schematic.nodes.len(), 1);
        assert_eq!(schematic.nodes[0].kind, NodeKind::Ingress);
        assert!(schematic.edges.is_empty());
        assert_eq!(schematic.description.as_deref(), Some("no-op"));
    }

    #[test]
    fn test_to_json() {
        let json = Schematic::from_graph("numbers", &graph()).to_json();
        assert_eq!(json["name"], "numbers");
        assert_eq!(json["edges"][0]["label"], "widen8");
        assert_eq!(json["nodes"][0]["kind"], "State");
    }
}
