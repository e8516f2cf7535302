//! Prerequisite graph for tool installation ordering.
//!
//! The graph is small and fixed by configuration, so ordering is a plain
//! topological pass. Ties are broken by declaration order, which keeps
//! plans stable from run to run.

use std::collections::{HashMap, HashSet};

use crate::error::{CfgError, Result};

/// Prerequisite relationships between tools.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Tool names in declaration order.
    order: Vec<String>,
    /// Map of tool name to its direct prerequisites.
    prerequisites: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Get the direct prerequisites of a tool.
    pub fn prerequisites_of(&self, tool: &str) -> &[String] {
        self.prerequisites
            .get(tool)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All tools in topological order (prerequisites before dependents).
    ///
    /// Returns an error if a cycle is detected.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let all: HashSet<&str> = self.order.iter().map(String::as_str).collect();
        self.order_subset(&all)
    }

    /// Order a subset of tools so that each member follows its member
    /// prerequisites. Edges to tools outside the subset are ignored.
    ///
    /// Among tools that are ready at the same time, the one declared first
    /// goes first.
    pub fn order_subset(&self, members: &HashSet<&str>) -> Result<Vec<String>> {
        let pending: Vec<&String> = self
            .order
            .iter()
            .filter(|t| members.contains(t.as_str()))
            .collect();

        let mut placed: HashSet<&str> = HashSet::new();
        let mut result = Vec::with_capacity(pending.len());

        while result.len() < pending.len() {
            let next = pending.iter().find(|tool| {
                !placed.contains(tool.as_str())
                    && self
                        .prerequisites_of(tool)
                        .iter()
                        .filter(|p| members.contains(p.as_str()))
                        .all(|p| placed.contains(p.as_str()))
            });

            match next {
                Some(tool) => {
                    placed.insert(tool.as_str());
                    result.push((*tool).clone());
                }
                None => {
                    let remaining: Vec<&str> = pending
                        .iter()
                        .map(|t| t.as_str())
                        .filter(|t| !placed.contains(t))
                        .collect();
                    return Err(CfgError::CircularDependency {
                        cycle: remaining.join(" -> "),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs<'a>(
            node: &'a str,
            graph: &'a DependencyGraph,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node);

            for dep in graph.prerequisites_of(node) {
                match state.get(dep.as_str()) {
                    Some(State::Visiting) => {
                        let start = path.iter().position(|s| *s == dep).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    Some(State::Unvisited) | None => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    Some(State::Visited) => {}
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<&str, State> = self
            .order
            .iter()
            .map(|s| (s.as_str(), State::Unvisited))
            .collect();
        let mut path = Vec::new();

        for tool in &self.order {
            if state.get(tool.as_str()) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(tool, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    order: Vec<String>,
    prerequisites: HashMap<String, Vec<String>>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool with its prerequisites.
    pub fn add_tool(mut self, name: impl Into<String>, prerequisites: Vec<String>) -> Self {
        let name = name.into();
        let entry = self.prerequisites.entry(name.clone()).or_insert_with(|| {
            self.order.push(name);
            Vec::new()
        });
        for p in prerequisites {
            if !entry.contains(&p) {
                entry.push(p);
            }
        }
        self
    }

    /// Build the dependency graph.
    ///
    /// Returns an error if any prerequisite references an unknown tool.
    pub fn build(self) -> Result<DependencyGraph> {
        for tool in &self.order {
            for dep in &self.prerequisites[tool] {
                if !self.prerequisites.contains_key(dep) {
                    return Err(CfgError::ConfigValidationError {
                        message: format!("Tool '{}' requires unknown tool '{}'", tool, dep),
                    });
                }
            }
        }

        Ok(DependencyGraph {
            order: self.order,
            prerequisites: self.prerequisites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolchain() -> DependencyGraph {
        DependencyGraph::builder()
            .add_tool("vim", vec![])
            .add_tool("node", vec![])
            .add_tool("ccls", vec!["cmake".to_string()])
            .add_tool("cmake", vec![])
            .add_tool("bear", vec![])
            .build()
            .unwrap()
    }

    #[test]
    fn builder_creates_empty_graph() {
        let graph = DependencyGraph::builder().build().unwrap();
        assert!(graph.order.is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let graph = toolchain();
        assert_eq!(graph.order, ["vim", "node", "ccls", "cmake", "bear"]);
    }

    #[test]
    fn builder_merges_repeated_tool() {
        let graph = DependencyGraph::builder()
            .add_tool("cmake", vec![])
            .add_tool("ccls", vec!["cmake".to_string()])
            .add_tool("ccls", vec!["cmake".to_string()])
            .build()
            .unwrap();
        assert_eq!(graph.order, ["cmake", "ccls"]);
        assert_eq!(graph.prerequisites_of("ccls"), &["cmake"]);
    }

    #[test]
    fn builder_rejects_unknown_prerequisite() {
        let err = DependencyGraph::builder()
            .add_tool("ccls", vec!["cmake".to_string()])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown tool 'cmake'"));
    }

    #[test]
    fn prerequisite_moves_ahead_of_dependent() {
        let order = toolchain().topological_order().unwrap();
        assert_eq!(order, vec!["vim", "node", "cmake", "ccls", "bear"]);
    }

    #[test]
    fn subset_ignores_edges_to_outsiders() {
        let graph = toolchain();
        let members: HashSet<&str> = ["ccls", "bear"].into_iter().collect();
        let order = graph.order_subset(&members).unwrap();
        assert_eq!(order, vec!["ccls", "bear"]);
    }

    #[test]
    fn subset_without_edges_keeps_declaration_order() {
        let graph = toolchain();
        let members: HashSet<&str> = ["bear", "vim"].into_iter().collect();
        assert_eq!(graph.order_subset(&members).unwrap(), vec!["vim", "bear"]);
    }

    #[test]
    fn diamond_orders_all_edges() {
        let graph = DependencyGraph::builder()
            .add_tool("d", vec!["b".to_string(), "c".to_string()])
            .add_tool("c", vec!["a".to_string()])
            .add_tool("b", vec!["a".to_string()])
            .add_tool("a", vec![])
            .build()
            .unwrap();

        let order = graph.topological_order().unwrap();
        let pos = |s: &str| order.iter().position(|t| t == s).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn topological_order_detects_cycle() {
        let graph = DependencyGraph::builder()
            .add_tool("a", vec!["b".to_string()])
            .add_tool("b", vec!["a".to_string()])
            .build()
            .unwrap();

        assert!(matches!(
            graph.topological_order(),
            Err(CfgError::CircularDependency { .. })
        ));
    }

    #[test]
    fn find_cycle_returns_path() {
        let graph = DependencyGraph::builder()
            .add_tool("a", vec!["b".to_string()])
            .add_tool("b", vec!["c".to_string()])
            .add_tool("c", vec!["a".to_string()])
            .build()
            .unwrap();

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        assert!(toolchain().find_cycle().is_none());
    }
}
