//! Dependency graph recorded while the factory initializes.
//!
//! Every component the resolver builds becomes a node; every constructor
//! parameter becomes an edge from the component to the parameter's type.
//! The graph can be rendered as Graphviz DOT, or as JSON with the
//! `graph-export` feature.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::key::TypeKey;

/// How a component entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize))]
#[cfg_attr(feature = "graph-export", serde(rename_all = "snake_case"))]
pub enum NodeOrigin {
    /// Listed in the candidate set passed to `initialize`
    Candidate,
    /// Built only because another component depends on it
    Transitive,
    /// Supplied as a ready-made instance
    External,
}

/// A component in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize))]
pub struct GraphNode {
    /// Full type name
    pub type_name: &'static str,
    /// How the component entered the registry
    pub origin: NodeOrigin,
}

/// A constructor dependency: `from` takes `to` as parameter `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize))]
pub struct GraphEdge {
    pub from: &'static str,
    pub to: &'static str,
    pub position: usize,
}

/// Nodes in build order plus constructor edges.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{BeanFactory, ComponentCatalog, NodeOrigin, TypeKey};
/// use std::sync::Arc;
///
/// struct Repo;
/// struct Service { repo: Arc<Repo> }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<Repo>().constructor(|()| Repo).register();
/// catalog.component::<Service>()
///     .injected_constructor(|(repo,): (Arc<Repo>,)| Service { repo })
///     .register();
///
/// let factory = BeanFactory::builder(catalog)
///     .initialize([TypeKey::of::<Service>()])
///     .unwrap();
///
/// let graph = factory.dependency_graph();
/// let repo = graph.node(&TypeKey::of::<Repo>()).unwrap();
/// assert_eq!(repo.origin, NodeOrigin::Transitive);
/// assert_eq!(graph.dependencies_of(&TypeKey::of::<Service>()), vec![TypeKey::of::<Repo>().name()]);
/// assert!(graph.to_dot().contains("->"));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize))]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[cfg_attr(feature = "graph-export", serde(skip))]
    index: HashMap<TypeKey, usize>,
    /// `(from, to)` keys, parallel to `edges`; type names are not unique.
    #[cfg_attr(feature = "graph-export", serde(skip))]
    edge_keys: Vec<(TypeKey, TypeKey)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node for `key`; a second call for the same key is ignored.
    pub(crate) fn add_node(&mut self, key: &TypeKey, origin: NodeOrigin) {
        if self.index.contains_key(key) {
            return;
        }
        self.index.insert(*key, self.nodes.len());
        self.nodes.push(GraphNode {
            type_name: key.name(),
            origin,
        });
    }

    pub(crate) fn add_edge(&mut self, from: &TypeKey, to: &TypeKey, position: usize) {
        self.edges.push(GraphEdge {
            from: from.name(),
            to: to.name(),
            position,
        });
        self.edge_keys.push((*from, *to));
    }

    fn edges_with_keys(&self) -> impl Iterator<Item = (&GraphEdge, &(TypeKey, TypeKey))> {
        self.edges.iter().zip(&self.edge_keys)
    }

    /// Nodes in the order components were stored.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, key: &TypeKey) -> Option<&GraphNode> {
        self.index.get(key).map(|&pos| &self.nodes[pos])
    }

    /// Parameter types of `key`'s constructor, in parameter order.
    pub fn dependencies_of(&self, key: &TypeKey) -> Vec<&'static str> {
        let mut deps: Vec<&GraphEdge> = self
            .edges_with_keys()
            .filter(|(_, (from, _))| from == key)
            .map(|(edge, _)| edge)
            .collect();
        deps.sort_by_key(|e| e.position);
        deps.into_iter().map(|e| e.to).collect()
    }

    /// Components whose constructor takes `key`.
    pub fn dependents_of(&self, key: &TypeKey) -> Vec<&'static str> {
        let mut seen: Vec<TypeKey> = Vec::new();
        let mut dependents: Vec<&'static str> = Vec::new();
        for (edge, (from, _)) in self.edges_with_keys().filter(|(_, (_, to))| to == key) {
            if !seen.contains(from) {
                seen.push(*from);
                dependents.push(edge.from);
            }
        }
        dependents
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph Beans {\n");
        output.push_str("  rankdir=TB;\n");

        for node in &self.nodes {
            let (shape, color) = match node.origin {
                NodeOrigin::Candidate => ("box", "lightblue"),
                NodeOrigin::Transitive => ("ellipse", "lightyellow"),
                NodeOrigin::External => ("note", "lightgrey"),
            };
            let _ = writeln!(
                output,
                "  \"{}\" [shape={}, fillcolor={}, style=filled];",
                node.type_name, shape, color
            );
        }

        for edge in &self.edges {
            let _ = writeln!(
                output,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                edge.from, edge.to, edge.position
            );
        }

        output.push_str("}\n");
        output
    }

    /// Renders the graph as pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
