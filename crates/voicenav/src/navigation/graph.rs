use std::collections::HashMap;

use log::warn;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::error::NavError;
use super::types::{Edge, Segment, TurnDirection};

/// Compiled-in campus map: (from, to, distance in metres, turn).
const CAMPUS_EDGES: &[(&str, &str, u32, TurnDirection)] = &[
    ("Entrance", "CSE Dept", 50, TurnDirection::Straight),
    ("CSE Dept", "Library", 100, TurnDirection::Right),
    ("Library", "Hostel", 150, TurnDirection::Left),
    ("CSE Dept", "ECE Dept", 60, TurnDirection::Left),
    ("ECE Dept", "Auditorium", 90, TurnDirection::Right),
    ("Library", "Canteen", 80, TurnDirection::Right),
    ("Canteen", "Hostel", 70, TurnDirection::Left),
];

/// Directed graph of named locations.
///
/// Nodes hold the canonical location name, edges hold distance and turn direction.
/// Edges are never mirrored: walking back needs its own edge.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    graph: DiGraph<String, Segment>,
    /// Lookup key (see [`location_key`]) to node.
    index: HashMap<String, NodeIndex>,
}

/// Normalize a location name for lookup: lowercase, whitespace runs collapsed.
pub fn location_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl LocationGraph {
    /// The sample campus map, validated like any other edge list.
    pub fn campus() -> Result<Self, NavError> {
        Self::from_edges(
            CAMPUS_EDGES
                .iter()
                .map(|(from, to, distance, direction)| (*from, *to, *distance, direction.clone())),
        )
    }

    pub fn builder() -> LocationGraphBuilder {
        LocationGraphBuilder::new()
    }

    /// Build a graph from (from, to, distance, direction) tuples.
    pub fn from_edges<'a, I>(edges: I) -> Result<Self, NavError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, u32, TurnDirection)>,
    {
        let mut builder = Self::builder();
        for (from, to, distance, direction) in edges {
            builder.add_edge(from, to, distance, direction)?;
        }
        Ok(builder.build())
    }

    /// Canonical spelling of `name`, if the location exists.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.node(name).map(|idx| self.graph[idx].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Location names in insertion order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| Edge {
            from: self.graph[e.source()].clone(),
            to: self.graph[e.target()].clone(),
            distance: e.weight().distance,
            direction: e.weight().direction.clone(),
        })
    }

    /// The edge from `from` to `to`, if both exist and are directly connected.
    pub fn edge(&self, from: &str, to: &str) -> Option<&Segment> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
    }

    pub fn location_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(&location_key(name)).copied()
    }

    pub(crate) fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, Segment> {
        &self.graph
    }
}

/// Incremental construction of a [`LocationGraph`].
#[derive(Debug, Default)]
pub struct LocationGraphBuilder {
    inner: LocationGraph,
}

impl LocationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location without edges. Returns the canonical name.
    ///
    /// A name that matches an existing location (ignoring case and spacing)
    /// keeps the first spelling.
    pub fn add_location(&mut self, name: &str) -> Result<&str, NavError> {
        if name.trim().is_empty() {
            return Err(NavError::InvalidLocation(name.to_string()));
        }
        let idx = self.node_or_insert(name);
        Ok(self.inner.name(idx))
    }

    /// Add a directed edge, creating missing endpoints.
    ///
    /// A second edge for the same ordered pair replaces the first.
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        distance: u32,
        direction: TurnDirection,
    ) -> Result<&mut Self, NavError> {
        if distance == 0 {
            return Err(NavError::InvalidEdge {
                from: from.to_string(),
                to: to.to_string(),
                reason: "distance must be positive".to_string(),
            });
        }
        self.add_location(from)?;
        self.add_location(to)?;
        self.insert_edge(from, to, distance, direction);
        Ok(self)
    }

    pub fn build(self) -> LocationGraph {
        self.inner
    }

    fn insert_edge(&mut self, from: &str, to: &str, distance: u32, direction: TurnDirection) {
        let a = self.node_or_insert(from);
        let b = self.node_or_insert(to);
        if self.inner.graph.find_edge(a, b).is_some() {
            warn!("Replacing existing edge {from} -> {to}");
        }
        self.inner
            .graph
            .update_edge(a, b, Segment { distance, direction });
    }

    fn node_or_insert(&mut self, name: &str) -> NodeIndex {
        let key = location_key(name);
        if let Some(&idx) = self.inner.index.get(&key) {
            return idx;
        }
        let canonical = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let idx = self.inner.graph.add_node(canonical);
        self.inner.index.insert(key, idx);
        idx
    }
}
