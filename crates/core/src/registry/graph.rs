//! Global subtype graph.
//!
//! Nodes are type definition names, edges point from a base definition to a
//! direct subtype. The graph only grows; nodes are never removed.

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use retrieve_api::TypeName;
use retrieve_ingest::{EdgeKind, SubtypeEdge};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct SubtypeGraph {
    topology: StableDiGraph<TypeName, EdgeKind>,
    /// Name -> NodeIndex mapping for fast lookup
    name_index: HashMap<TypeName, NodeIndex>,
}

impl SubtypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, name: &TypeName) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        let idx = self.topology.add_node(name.clone());
        self.name_index.insert(name.clone(), idx);
        idx
    }

    /// Returns true if the edge was not present yet.
    pub fn add_edge(&mut self, edge: &SubtypeEdge) -> bool {
        let base = self.ensure_node(&edge.base);
        let derived = self.ensure_node(&edge.derived);
        if self.topology.find_edge(base, derived).is_some() {
            return false;
        }
        self.topology.add_edge(base, derived, edge.kind);
        true
    }

    pub fn find_node(&self, name: &TypeName) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    pub fn name(&self, idx: NodeIndex) -> Option<&TypeName> {
        self.topology.node_weight(idx)
    }

    pub fn direct_subtypes(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.topology.neighbors_directed(idx, Direction::Outgoing)
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }
}
