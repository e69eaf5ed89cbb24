use petgraph::graph::NodeIndex;

use crate::error::{Result, RouteError};
use crate::network::TopologyGraph;

/// Lazy depth-first enumeration of every simple path between two nodes.
///
/// Paths are produced in a reproducible order: neighbours are explored in
/// the order their edges were declared, so identical input always yields an
/// identical sequence. The destination is never expanded further.
#[derive(Debug)]
pub struct SimplePaths<'a> {
    graph: &'a TopologyGraph,
    target: Option<NodeIndex>,
    path: Vec<NodeIndex>,
    stack: Vec<std::vec::IntoIter<NodeIndex>>,
}

impl<'a> SimplePaths<'a> {
    pub fn new(graph: &'a TopologyGraph, source: &str, destination: &str) -> Self {
        let source = graph.index_of(source);
        let target = graph.index_of(destination);

        let mut paths = Self {
            graph,
            target,
            path: Vec::new(),
            stack: Vec::new(),
        };

        if let (Some(source), Some(target)) = (source, target) {
            if source != target {
                paths.path.push(source);
                paths.stack.push(graph.neighbor_indices(source).into_iter());
            }
        }

        paths
    }

    fn emit(&self, target: NodeIndex) -> Vec<String> {
        self.path
            .iter()
            .chain(std::iter::once(&target))
            .map(|&index| self.graph.name(index).to_string())
            .collect()
    }
}

impl Iterator for SimplePaths<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let target = self.target?;

        while let Some(children) = self.stack.last_mut() {
            match children.next() {
                Some(child) if child == target => return Some(self.emit(target)),
                Some(child) => {
                    if !self.path.contains(&child) {
                        self.path.push(child);
                        self.stack.push(self.graph.neighbor_indices(child).into_iter());
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }

        None
    }
}

/// Every simple path from `source` to `destination`. Unknown endpoints yield
/// no paths.
pub fn all_simple_paths<'a>(
    graph: &'a TopologyGraph,
    source: &str,
    destination: &str,
) -> SimplePaths<'a> {
    SimplePaths::new(graph, source, destination)
}

/// Sum of the edge weights between consecutive nodes of `path`.
///
/// Fails with [`RouteError::MetricOverflow`] when the sum exceeds `u32::MAX`.
pub fn path_cost(graph: &TopologyGraph, path: &[String]) -> Result<u32> {
    path.windows(2).try_fold(0u32, |cost, hop| -> Result<u32> {
        cost.checked_add(graph.weight(&hop[0], &hop[1])?)
            .ok_or_else(|| RouteError::MetricOverflow {
                path: path.to_vec(),
            })
    })
}
