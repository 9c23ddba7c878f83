//! Circular dependency detection during resolution
//!
//! Tracks the set of keys currently being resolved on the call stack.
//! Re-entering a key that is still in progress fails immediately with
//! [`DiError::CircularDependency`], and a depth backstop catches
//! pathological chains that never repeat a key.
//!
//! Cleanup is RAII: [`ResolutionGuard`] removes its key on drop, so an
//! error unwinding out of a resolution never leaves the key stuck in the
//! in-progress set.

use crate::error::{DiError, DiResult};
use crate::key::ServiceKey;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Maximum resolution depth (prevents pathological cases)
const MAX_RESOLUTION_DEPTH: usize = 100;

#[derive(Default)]
struct TrackerState {
	/// Keys currently being resolved (O(1) circular detection)
	in_progress: HashSet<ServiceKey>,
	/// Resolution path (for displaying circular paths)
	path: Vec<ServiceKey>,
	/// Resolution depth counter
	depth: usize,
}

/// Shared in-progress set for one container.
///
/// A single collection, mutated in-line by whichever call is resolving;
/// consistent only under the container's single-logical-thread model.
#[derive(Default)]
pub(crate) struct ResolutionTracker {
	state: Mutex<TrackerState>,
}

impl ResolutionTracker {
	/// Record the start of resolving `key`.
	///
	/// Fails with `CircularDependency` if `key` is already in progress, or
	/// `MaxDepthExceeded` past the depth backstop. On success the returned
	/// guard removes the key again when dropped.
	pub(crate) fn begin(&self, key: ServiceKey) -> DiResult<ResolutionGuard<'_>> {
		let mut state = self.state.lock();

		if state.depth + 1 > MAX_RESOLUTION_DEPTH {
			return Err(DiError::MaxDepthExceeded(state.depth + 1));
		}

		if state.in_progress.contains(&key) {
			let path = build_cycle_path(&state, &key);
			return Err(DiError::CircularDependency {
				type_name: key.type_name().to_string(),
				path,
			});
		}

		state.depth += 1;
		state.in_progress.insert(key.clone());
		state.path.push(key.clone());
		drop(state);

		Ok(ResolutionGuard { tracker: self, key })
	}

	/// Drop all in-progress state (container teardown).
	pub(crate) fn clear(&self) {
		let mut state = self.state.lock();
		state.in_progress.clear();
		state.path.clear();
		state.depth = 0;
	}

	fn release(&self, key: &ServiceKey) {
		let mut state = self.state.lock();
		state.in_progress.remove(key);
		if let Some(pos) = state.path.iter().rposition(|k| k == key) {
			state.path.remove(pos);
		}
		state.depth = state.depth.saturating_sub(1);
	}
}

/// RAII guard: automatic cleanup on drop.
pub(crate) struct ResolutionGuard<'t> {
	tracker: &'t ResolutionTracker,
	key: ServiceKey,
}

impl Drop for ResolutionGuard<'_> {
	fn drop(&mut self) {
		self.tracker.release(&self.key);
	}
}

fn build_cycle_path(state: &TrackerState, current: &ServiceKey) -> String {
	if let Some(cycle_start) = state.path.iter().position(|k| k == current) {
		let cycle: Vec<&str> = state.path[cycle_start..]
			.iter()
			.map(|k| k.type_name())
			.collect();
		format!("{} -> {}", cycle.join(" -> "), current.type_name())
	} else {
		format!("Unknown cycle involving {}", current.type_name())
	}
}
