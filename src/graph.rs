//! Static dependency graph analysis
//!
//! Walks declared member metadata only: no instance is ever constructed.
//! This complements the resolver's dynamic detection, which catches cycles
//! introduced at runtime (factory closures and trait bindings) that the
//! static graph cannot see. Conversely, the static walk reports cycles in
//! member declarations before anything is instantiated.

use crate::injectable::{Injectable, InjectionPlan};
use crate::key::ServiceKey;
use std::any::TypeId;
use std::collections::HashSet;

/// Statically declared dependency edge: one member of a type, with an
/// expander for the dependency's own members.
pub struct DependencyMeta {
	/// Key of the dependency (type, plus binding name if declared)
	pub key: ServiceKey,
	/// Name of the declaring member
	pub member: &'static str,
	/// Whether an unresolved dependency is fatal for the declaring type
	pub required: bool,
	/// Expands to the dependency's own declared members
	pub expand: fn() -> Vec<DependencyMeta>,
}

/// The declared members of `T` as graph edges.
pub fn static_dependencies<T: Injectable>() -> Vec<DependencyMeta> {
	let mut plan = InjectionPlan::new();
	T::members(&mut plan);
	plan.dependency_meta()
}

/// Edge expander for opaque dependencies (trait objects).
pub(crate) fn no_static_edges() -> Vec<DependencyMeta> {
	Vec::new()
}

/// Whether the member-declared dependency graph rooted at `T` contains a
/// cycle.
///
/// ```
/// use stagehand::{graph, Injectable, InjectionPlan};
/// use std::sync::Arc;
///
/// struct Left { right: Option<Arc<Right>> }
/// struct Right { left: Option<Arc<Left>> }
///
/// impl Injectable for Left {
///     fn members(plan: &mut InjectionPlan<Self>) {
///         plan.member("right", |l: &mut Self| &mut l.right);
///     }
/// }
/// impl Injectable for Right {
///     fn members(plan: &mut InjectionPlan<Self>) {
///         plan.member("left", |r: &mut Self| &mut r.left);
///     }
/// }
///
/// assert!(graph::has_cycle::<Left>());
/// ```
pub fn has_cycle<T: Injectable>() -> bool {
	find_cycle::<T>().is_some()
}

/// Like [`has_cycle`], but reports the offending path (the first and last
/// entries name the same type).
pub fn find_cycle<T: Injectable>() -> Option<Vec<&'static str>> {
	let mut visited = HashSet::new();
	let mut in_stack = HashSet::new();
	let mut path = Vec::new();
	visit(
		TypeId::of::<T>(),
		std::any::type_name::<T>(),
		static_dependencies::<T>,
		&mut visited,
		&mut in_stack,
		&mut path,
	)
}

fn visit(
	node: TypeId,
	name: &'static str,
	expand: fn() -> Vec<DependencyMeta>,
	visited: &mut HashSet<TypeId>,
	in_stack: &mut HashSet<TypeId>,
	path: &mut Vec<(TypeId, &'static str)>,
) -> Option<Vec<&'static str>> {
	// Fully explored nodes cannot start a new cycle
	if visited.contains(&node) {
		return None;
	}

	in_stack.insert(node);
	path.push((node, name));

	for dependency in expand() {
		let dep_id = dependency.key.type_id();
		if in_stack.contains(&dep_id) {
			let start = path
				.iter()
				.position(|(id, _)| *id == dep_id)
				.unwrap_or_default();
			let mut cycle: Vec<&'static str> =
				path[start..].iter().map(|(_, name)| *name).collect();
			cycle.push(dependency.key.type_name());
			return Some(cycle);
		}
		if let Some(cycle) = visit(
			dep_id,
			dependency.key.type_name(),
			dependency.expand,
			visited,
			in_stack,
			path,
		) {
			return Some(cycle);
		}
	}

	path.pop();
	in_stack.remove(&node);
	visited.insert(node);
	None
}
