//! Dependency graph visualization for development and debugging
//!
//! Builds a renderable graph from the same static member metadata the
//! analyzer walks, and emits DOT for Graphviz.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stagehand::visualization::DependencyGraph;
//!
//! let graph = DependencyGraph::of::<GameSession>();
//! println!("{}", graph.to_dot());
//! ```

use crate::graph::{DependencyMeta, static_dependencies};
use crate::injectable::Injectable;
use std::any::TypeId;
use std::collections::HashSet;

/// A node of the rendered graph: one type in the dependency closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
	/// Type name of the service
	pub name: &'static str,
	/// Number of members the type declares
	pub dependency_count: usize,
}

/// A directed edge: a declared member and where it points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
	pub from: &'static str,
	pub to: &'static str,
	/// Name of the declaring member
	pub member: &'static str,
	/// Required members render solid, optional ones dashed
	pub required: bool,
}

/// The member-declared dependency closure of a root type.
#[derive(Debug, Default)]
pub struct DependencyGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
}

impl DependencyGraph {
	/// Builds the graph reachable from `T`'s declared members.
	pub fn of<T: Injectable>() -> Self {
		let mut graph = Self::default();
		let mut seen = HashSet::new();
		let mut queue: Vec<(TypeId, &'static str, fn() -> Vec<DependencyMeta>)> = vec![(
			TypeId::of::<T>(),
			std::any::type_name::<T>(),
			static_dependencies::<T>,
		)];

		while let Some((id, name, expand)) = queue.pop() {
			if !seen.insert(id) {
				continue;
			}
			let dependencies = expand();
			graph.nodes.push(GraphNode {
				name,
				dependency_count: dependencies.len(),
			});
			for dependency in dependencies {
				graph.edges.push(GraphEdge {
					from: name,
					to: dependency.key.type_name(),
					member: dependency.member,
					required: dependency.required,
				});
				queue.push((
					dependency.key.type_id(),
					dependency.key.type_name(),
					dependency.expand,
				));
			}
		}

		graph
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Generate DOT format output for Graphviz.
	pub fn to_dot(&self) -> String {
		let mut output = String::from("digraph DependencyGraph {\n");
		output.push_str("  rankdir=LR;\n");
		output.push_str("  node [shape=box, style=rounded];\n\n");

		for node in &self.nodes {
			output.push_str(&format!("  \"{}\";\n", node.name));
		}

		output.push('\n');

		for edge in &self.edges {
			let style = if edge.required { "solid" } else { "dashed" };
			output.push_str(&format!(
				"  \"{}\" -> \"{}\" [label=\"{}\", style={}];\n",
				edge.from, edge.to, edge.member, style
			));
		}

		output.push_str("}\n");
		output
	}

	/// Get statistics about the dependency graph.
	pub fn statistics(&self) -> GraphStatistics {
		GraphStatistics {
			node_count: self.nodes.len(),
			edge_count: self.edges.len(),
			required_count: self.edges.iter().filter(|e| e.required).count(),
			optional_count: self.edges.iter().filter(|e| !e.required).count(),
		}
	}
}

/// Statistics about a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
	pub node_count: usize,
	pub edge_count: usize,
	pub required_count: usize,
	pub optional_count: usize,
}
