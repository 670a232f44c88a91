//! Reference graph module.
//!
//! Provides the `ReferenceGraph` type: which reference names a referenceable
//! collection's patterns use. Expanding `{Name}` placeholders recursively
//! only terminates if this graph is acyclic.

use crate::error::DataError;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Directed graph over reference names; an edge `A -> B` means a pattern
/// registered under `A` contains `{B}`.
///
/// # Examples
///
/// ```rust
/// use statline::graph::ReferenceGraph;
///
/// let mut graph = ReferenceGraph::new();
/// graph.add_edge("StatMatchers", "DamageTypeMatchers");
/// assert!(graph.detect_cycles().is_ok());
///
/// graph.add_edge("DamageTypeMatchers", "StatMatchers");
/// assert!(graph.detect_cycles().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if it doesn't exist and return its index.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            idx
        } else {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
            idx
        }
    }

    /// Record that patterns under `from` reference `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Names referenced directly by `name`.
    pub fn references_of(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }

    /// Detect reference cycles, including a name referencing itself.
    ///
    /// Returns `DataError::CyclicReference` with the path of the first
    /// cycle found, closed by repeating its first name.
    pub fn detect_cycles(&self) -> Result<(), DataError> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) = self.dfs(node_idx, &mut visited, &mut on_stack, &mut path) {
                    return Err(DataError::CyclicReference { path: cycle });
                }
            }
        }

        Ok(())
    }

    fn dfs(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for neighbor in self
            .graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
        {
            if on_stack.contains(&neighbor) {
                let start = path.iter().position(|&n| n == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|&n| self.graph[n].clone()).collect();
                cycle.push(self.graph[neighbor].clone());
                return Some(cycle);
            }
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs(neighbor, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }

        on_stack.remove(&node);
        path.pop();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acyclic_chain() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("StatMatchers", "DamageStatMatchers");
        graph.add_edge("DamageStatMatchers", "DamageTypeMatchers");
        assert!(graph.detect_cycles().is_ok());
        assert_eq!(graph.references_of("StatMatchers"), vec!["DamageStatMatchers"]);
    }

    #[test]
    fn test_self_reference() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("StatMatchers", "StatMatchers");
        assert_eq!(
            graph.detect_cycles(),
            Err(DataError::CyclicReference {
                path: vec!["StatMatchers".into(), "StatMatchers".into()]
            })
        );
    }

    #[test]
    fn test_cycle_path() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph.add_edge("C", "A");
        match graph.detect_cycles() {
            Err(DataError::CyclicReference { path }) => {
                assert_eq!(path.len(), 4);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_edges_are_ignored() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("A", "B");
        assert_eq!(graph.references_of("A"), vec!["B"]);
        assert!(graph.contains("B"));
        assert!(!graph.contains("C"));
    }
}
