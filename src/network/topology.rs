use std::collections::HashMap;

use log::trace;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::{Result, RouteError};

/// Undirected weighted graph over routers and networks.
///
/// Routers and networks share one namespace. Network-to-router edges carry
/// weight 0, router-to-router edges carry the link metric. The graph is
/// append-only: nodes and edges are never removed during a run.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    graph: UnGraph<String, u32>,
    nodes: HashMap<String, NodeIndex>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `id`, inserting the node on first reference.
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(id) {
            return index;
        }

        let index = self.graph.add_node(id.to_string());
        self.nodes.insert(id.to_string(), index);
        index
    }

    /// Inserts an undirected edge, or overwrites its metric if the two nodes
    /// are already adjacent.
    pub fn add_link(&mut self, a: &str, b: &str, metric: u32) {
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        self.graph.update_edge(ia, ib, metric);
        trace!("Link {} <-> {} metric {}", a, b, metric);
    }

    /// Adjacent node identifiers, in the order their edges were first declared.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        match self.nodes.get(id) {
            Some(&index) => self
                .neighbor_indices(index)
                .into_iter()
                .map(|n| self.graph[n].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn weight(&self, a: &str, b: &str) -> Result<u32> {
        let not_found = || RouteError::EdgeNotFound {
            a: a.to_string(),
            b: b.to_string(),
        };

        let ia = *self.nodes.get(a).ok_or_else(not_found)?;
        let ib = *self.nodes.get(b).ok_or_else(not_found)?;
        let edge = self.graph.find_edge(ia, ib).ok_or_else(not_found)?;
        Ok(self.graph[edge])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every edge as `(a, b, metric)`, in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
                *edge.weight(),
            )
        })
    }

    /// Underlying petgraph graph, for renderers.
    pub fn as_petgraph(&self) -> &UnGraph<String, u32> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }

    pub(crate) fn name(&self, index: NodeIndex) -> &str {
        &self.graph[index]
    }

    // petgraph walks adjacency lists newest-first; sort by edge index so
    // enumeration follows declaration order.
    pub(crate) fn neighbor_indices(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut adjacent: Vec<_> = self
            .graph
            .edges(index)
            .map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), other)
            })
            .collect();
        adjacent.sort_by_key(|(edge, _)| edge.index());
        adjacent.into_iter().map(|(_, other)| other).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_link_registers_both_nodes() {
        let mut graph = TopologyGraph::new();
        graph.add_link("R1", "R2", 3);

        assert!(graph.contains("R1"));
        assert!(graph.contains("R2"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn weight_is_symmetric() {
        let mut graph = TopologyGraph::new();
        graph.add_link("R1", "R2", 4);

        assert_eq!(graph.weight("R1", "R2").unwrap(), 4);
        assert_eq!(graph.weight("R2", "R1").unwrap(), 4);
    }

    #[test]
    fn redeclared_link_updates_metric() {
        let mut graph = TopologyGraph::new();
        graph.add_link("R1", "R2", 4);
        graph.add_link("R2", "R1", 7);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("R1", "R2").unwrap(), 7);
    }

    #[test]
    fn weight_between_non_adjacent_nodes_fails() {
        let mut graph = TopologyGraph::new();
        graph.add_link("R1", "R2", 1);
        graph.add_link("R2", "R3", 1);

        let err = graph.weight("R1", "R3").unwrap_err();
        assert!(matches!(err, RouteError::EdgeNotFound { .. }));

        let err = graph.weight("R1", "R9").unwrap_err();
        assert!(matches!(err, RouteError::EdgeNotFound { .. }));
    }

    #[test]
    fn neighbors_follow_declaration_order() {
        let mut graph = TopologyGraph::new();
        graph.add_link("N1", "R1", 0);
        graph.add_link("R1", "R2", 1);
        graph.add_link("R3", "R1", 5);

        assert_eq!(graph.neighbors("R1"), vec!["N1", "R2", "R3"]);
        assert_eq!(graph.neighbors("R3"), vec!["R1"]);
        assert!(graph.neighbors("R9").is_empty());
    }

    #[test]
    fn edges_lists_every_link() {
        let mut graph = TopologyGraph::new();
        graph.add_link("N1", "R1", 0);
        graph.add_link("R1", "R2", 2);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![("N1", "R1", 0), ("R1", "R2", 2)]);
    }
}
