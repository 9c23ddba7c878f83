//! The member injection pass
//!
//! One pass over a target's declared members: filter by condition, skip
//! occupied slots, resolve in priority order, then run post-injection
//! hooks. Required failures abort the pass (already-assigned members keep
//! their values); optional failures fall back to a declared default or
//! leave the slot vacant, with a warning either way.

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::hooks;
use crate::injectable::{Injectable, InjectionPlan};
use crate::statics::{StaticInjectable, StaticInjectionPlan};
use std::cmp::Reverse;

pub(crate) fn inject_instance<T: Injectable>(
	container: &Container,
	target: &mut T,
) -> DiResult<()> {
	let mut plan = InjectionPlan::new();
	T::members(&mut plan);
	let mut members = plan.into_members();
	// Higher priority first; the sort is stable, so ties keep declaration order
	members.sort_by_key(|member| Reverse(member.priority));

	let target_name = std::any::type_name::<T>();

	for member in &members {
		if let Some(condition) = &member.condition {
			match (condition.read)(target) {
				Some(value) if value == condition.expected => {}
				Some(_) => continue,
				None => {
					tracing::warn!(
						ty = target_name,
						member = member.member,
						condition = condition.member,
						"condition member could not be read; skipping injection"
					);
					continue;
				}
			}
		}

		// Injection never overwrites an existing value
		if (member.probe)(target) {
			continue;
		}

		match (member.assign)(target, container, member.dependency.name()) {
			Ok(()) => {}
			Err(err) if member.required => {
				return Err(match err {
					fatal @ (DiError::CircularDependency { .. } | DiError::MaxDepthExceeded(_)) => {
						fatal
					}
					other => DiError::RequiredInjection {
						target: target_name,
						member: member.member,
						source: Box::new(other),
					},
				});
			}
			Err(err) => {
				if let Some(apply_default) = &member.apply_default {
					apply_default(target);
					tracing::warn!(
						ty = target_name,
						member = member.member,
						error = %err,
						"optional dependency unresolved; using declared default"
					);
				} else {
					tracing::warn!(
						ty = target_name,
						member = member.member,
						error = %err,
						"optional dependency unresolved; member left unset"
					);
				}
			}
		}
	}

	hooks::run_hooks(target);
	Ok(())
}

pub(crate) fn inject_statics<T: StaticInjectable>(container: &Container) -> DiResult<()> {
	let mut plan = StaticInjectionPlan::new();
	T::members(&mut plan);
	let mut members = plan.into_members();
	members.sort_by_key(|member| Reverse(member.priority));

	let target_name = std::any::type_name::<T>();

	for member in &members {
		if let Some(condition) = &member.condition {
			match (condition.read)() {
				Some(value) if value == condition.expected => {}
				Some(_) => continue,
				None => {
					tracing::warn!(
						ty = target_name,
						member = member.member,
						condition = condition.member,
						"condition member could not be read; skipping injection"
					);
					continue;
				}
			}
		}

		if (member.probe)() {
			continue;
		}

		match (member.assign)(container, member.dependency.name()) {
			Ok(()) => {}
			Err(err) if member.required => {
				return Err(match err {
					fatal @ (DiError::CircularDependency { .. } | DiError::MaxDepthExceeded(_)) => {
						fatal
					}
					other => DiError::RequiredInjection {
						target: target_name,
						member: member.member,
						source: Box::new(other),
					},
				});
			}
			Err(err) => {
				if let Some(apply_default) = &member.apply_default {
					apply_default();
					tracing::warn!(
						ty = target_name,
						member = member.member,
						error = %err,
						"optional dependency unresolved; using declared default"
					);
				} else {
					tracing::warn!(
						ty = target_name,
						member = member.member,
						error = %err,
						"optional dependency unresolved; slot left unset"
					);
				}
			}
		}
	}

	Ok(())
}
