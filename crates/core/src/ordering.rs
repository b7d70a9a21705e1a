//! Evaluation ordering graph
//!
//! "Evaluate after" constraints are explicit directed edges from a
//! prerequisite module to each dependent module. The graph orders the
//! configuration phase only; it says nothing about build task execution.

use crate::error::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed graph of module evaluation constraints
#[derive(Debug, Clone, Default)]
pub struct EvaluationGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl EvaluationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with one node per module path
    pub fn with_modules<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for path in paths {
            graph.add_module(path.into());
        }
        graph
    }

    /// Add a module node; adding an existing path is a no-op
    pub fn add_module(&mut self, path: impl Into<String>) -> NodeIndex {
        let path = path.into();
        match self.nodes.get(&path) {
            Some(&idx) => idx,
            None => {
                let idx = self.graph.add_node(path.clone());
                self.nodes.insert(path, idx);
                idx
            }
        }
    }

    /// Whether a module path is known to the graph
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Require `prerequisite`'s configuration to complete before
    /// `dependent`'s.
    ///
    /// The prerequisite must already be a node: referencing a module that
    /// does not exist in the tree is the fatal unresolved-reference error.
    /// Re-adding an existing constraint is a no-op.
    pub fn evaluate_after(&mut self, dependent: &str, prerequisite: &str) -> Result<()> {
        let Some(&pre) = self.nodes.get(prerequisite) else {
            return Err(Error::unresolved_module(prerequisite));
        };
        let dep = self.add_module(dependent);
        if !self.graph.contains_edge(pre, dep) {
            self.graph.add_edge(pre, dep, ());
        }
        Ok(())
    }

    /// Whether `prerequisite` is constrained to evaluate before `dependent`
    pub fn is_prerequisite(&self, prerequisite: &str, dependent: &str) -> bool {
        match (self.nodes.get(prerequisite), self.nodes.get(dependent)) {
            (Some(&pre), Some(&dep)) => self.graph.contains_edge(pre, dep),
            _ => false,
        }
    }

    /// Number of constraints
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// A module order satisfying every constraint.
    ///
    /// A cycle in the constraints is fatal.
    pub fn evaluation_order(&self) -> Result<Vec<String>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|i| self.graph[i].clone()).collect())
            .map_err(|cycle| Error::evaluation_cycle(&self.graph[cycle.node_id()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_after_records_edge() {
        let mut graph = EvaluationGraph::with_modules([":", ":app", ":payments"]);
        graph.evaluate_after(":payments", ":app").unwrap();
        assert!(graph.is_prerequisite(":app", ":payments"));
        assert!(!graph.is_prerequisite(":payments", ":app"));
    }

    #[test]
    fn test_unknown_prerequisite_is_fatal() {
        let mut graph = EvaluationGraph::with_modules([":", ":payments"]);
        let err = graph.evaluate_after(":payments", ":app").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::UnresolvedModule);
    }

    #[test]
    fn test_duplicate_constraint_not_duplicated() {
        let mut graph = EvaluationGraph::with_modules([":app", ":payments"]);
        graph.evaluate_after(":payments", ":app").unwrap();
        graph.evaluate_after(":payments", ":app").unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_evaluation_order_respects_constraints() {
        let mut graph = EvaluationGraph::with_modules([":app", ":payments", ":feature_home"]);
        graph.evaluate_after(":payments", ":app").unwrap();
        graph.evaluate_after(":feature_home", ":app").unwrap();

        let order = graph.evaluation_order().unwrap();
        let pos = |p: &str| order.iter().position(|m| m == p).unwrap();
        assert!(pos(":app") < pos(":payments"));
        assert!(pos(":app") < pos(":feature_home"));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let mut graph = EvaluationGraph::with_modules([":app", ":payments"]);
        graph.evaluate_after(":payments", ":app").unwrap();
        graph.evaluate_after(":app", ":payments").unwrap();
        let err = graph.evaluation_order().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::EvaluationCycle);
    }
}
