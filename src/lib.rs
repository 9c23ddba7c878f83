//! # Stagehand
//!
//! A runtime service container for host-driven applications: bind service
//! types to instances or factories, resolve object graphs on demand, and
//! inject the declared members of already-constructed objects, including
//! objects whose creation belongs to an external host runtime.
//!
//! ## Features
//!
//! - **Explicit**: the container is an ordinary value, passed by reference;
//!   there is no process-global instance
//! - **Declarative**: injectable types enumerate their own members and
//!   hooks, checked at compile time (or generated by `#[derive(Injectable)]`)
//! - **Lifetimes**: singleton and transient bindings, named bindings,
//!   multi-binding implementation sets and pre-supplied collections
//! - **Safe teardown**: cycle detection during resolution, static graph
//!   analysis without instantiation, and disposal of everything the
//!   container cached
//!
//! ## Example
//!
//! ```
//! use stagehand::{Container, Injectable, InjectionPlan};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Inventory;
//! impl Injectable for Inventory {
//!     fn construct() -> Option<Self> { Some(Self::default()) }
//! }
//!
//! struct ShopManager {
//!     inventory: Option<Arc<Inventory>>,
//! }
//!
//! impl Injectable for ShopManager {
//!     fn members(plan: &mut InjectionPlan<Self>) {
//!         plan.member("inventory", |shop: &mut Self| &mut shop.inventory);
//!     }
//! }
//!
//! let container = Container::new();
//! let mut shop = ShopManager { inventory: None };
//! container.inject(&mut shop).unwrap();
//! assert!(shop.inventory.is_some());
//! ```
//!
//! ## Development Tools (dev-tools feature)
//!
//! With the `dev-tools` feature enabled, [`visualization`] renders the
//! static dependency graph in DOT format for Graphviz.

mod container;
mod cycle;
mod error;
pub mod graph;
mod hooks;
mod host;
mod injectable;
mod injector;
mod key;
mod lifetime;
mod registry;
mod statics;

pub use container::{CollectionBuilder, Container};
pub use error::{DiError, DiResult, ValidationFailure};
pub use hooks::{HookSet, PostInjectHook};
pub use host::{HostLifecycle, ManagedHandle, NullHost};
pub use injectable::{Injectable, InjectionPlan, MemberBinding, MemberBuilder};
pub use key::ServiceKey;
pub use lifetime::Lifetime;
pub use statics::{StaticInjectable, StaticInjectionPlan, StaticMemberBinding, StaticMemberBuilder};

#[cfg(feature = "derive")]
pub use stagehand_macros::Injectable;

// Development tools
#[cfg(feature = "dev-tools")]
pub mod visualization;
