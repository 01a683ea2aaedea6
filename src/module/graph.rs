//! Dependency-first ordering of a resolved module set.
//!
//! Cycles are legal in a catalog, so a plain topological sort is not
//! enough: modules on a cycle are grouped into one strongly connected
//! component and ordered as a unit.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::ResolvedSet;

/// Module graph of a resolved set; an edge points from a module to a
/// module it requires.
pub struct DependencyGraph<'c> {
    graph: DiGraph<&'c str, ()>,
}

impl<'c> DependencyGraph<'c> {
    pub fn new(resolved: &ResolvedSet<'c>) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<&'c str, NodeIndex> = HashMap::new();
        for name in resolved.names() {
            index.insert(name, graph.add_node(name));
        }
        for module in resolved.modules() {
            let from = index[module.name()];
            for required in module.requires() {
                // Closure guarantees membership; stay total anyway.
                if let Some(&to) = index.get(required.as_str()) {
                    graph.update_edge(from, to, ());
                }
            }
        }
        Self { graph }
    }

    /// Strongly connected components, dependencies before dependents.
    ///
    /// Components are ranked by their depth in the condensed graph, then
    /// by name, so the order does not depend on traversal details.
    pub fn load_order(&self) -> Vec<Vec<&'c str>> {
        // tarjan_scc yields components in reverse topological order,
        // i.e. every component after all the components it points to.
        let components = tarjan_scc(&self.graph);
        let mut component_of: HashMap<NodeIndex, usize> = HashMap::new();
        for (i, component) in components.iter().enumerate() {
            for &node in component {
                component_of.insert(node, i);
            }
        }

        let mut depth = vec![0usize; components.len()];
        for (i, component) in components.iter().enumerate() {
            let mut d = 0;
            for &node in component {
                for target in self.graph.neighbors(node) {
                    let j = component_of[&target];
                    if j != i {
                        d = d.max(depth[j] + 1);
                    }
                }
            }
            depth[i] = d;
        }

        let mut ranked: Vec<(usize, Vec<&'c str>)> = components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                let mut names: Vec<&'c str> = component.iter().map(|&n| self.graph[n]).collect();
                names.sort_unstable();
                (depth[i], names)
            })
            .collect();
        ranked.sort();
        ranked.into_iter().map(|(_, names)| names).collect()
    }

    /// Module names in load order, cycles flattened.
    pub fn ordered_names(&self) -> Vec<&'c str> {
        self.load_order().into_iter().flatten().collect()
    }

    /// Components that form a cycle: more than one module, or a module
    /// that requires itself.
    pub fn cycles(&self) -> Vec<Vec<&'c str>> {
        self.load_order()
            .into_iter()
            .filter(|names| names.len() > 1 || self.requires_itself(names[0]))
            .collect()
    }

    fn requires_itself(&self, name: &str) -> bool {
        self.graph
            .node_indices()
            .find(|&n| self.graph[n] == name)
            .is_some_and(|n| self.graph.contains_edge(n, n))
    }

    /// One line per component in load order; cycles are marked.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for names in self.load_order() {
            let cyclic = names.len() > 1 || self.requires_itself(names[0]);
            out.push_str(&names.join(", "));
            if cyclic {
                out.push_str(" (cycle)");
            }
            out.push('\n');
        }
        out
    }
}
