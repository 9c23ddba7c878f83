//! Procedural macros for stagehand
//!
//! Provides `#[derive(Injectable)]`, which generates the member and hook
//! declarations of the `Injectable` trait from field attributes.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod injectable;

/// Derive the `Injectable` trait from field attributes.
///
/// # Example
///
/// ```ignore
/// use stagehand::Injectable;
/// use std::sync::Arc;
///
/// #[derive(Default, Injectable)]
/// #[injectable(construct, hooks(warm_caches = 0))]
/// struct ShopManager {
///     #[inject]
///     catalog: Option<Arc<Catalog>>,
///     #[inject(optional, priority = 10)]
///     analytics: Option<Arc<Analytics>>,
///     #[inject(name = "primary")]
///     store: Option<Arc<Storefront>>,
///     #[inject(optional, condition = "use_cache")]
///     cache: Option<Arc<Cache>>,
///     use_cache: bool,
/// }
/// ```
///
/// # Field attributes
///
/// - `#[inject]` - required member, priority 0
/// - `optional` - unresolved dependency is logged instead of fatal
/// - `name = "..."` - resolve through a named binding
/// - `priority = N` - higher priorities are injected earlier
/// - `condition = "field"` / `expected = false` - only inject while the
///   named `bool` field matches the expected value (default `true`)
/// - `default = "expr"` - value substituted when an optional dependency
///   cannot be resolved
///
/// Fields marked `#[inject]` must be of type `Option<Arc<T>>`; fields of
/// type `Option<Arc<dyn Trait>>` resolve through the container's trait
/// bindings.
///
/// # Struct attributes
///
/// - `#[injectable(construct)]` - generate the parameterless fallback
///   constructor from `Default` (opts into implicit singleton promotion)
/// - `#[injectable(hooks(method = order, ...))]` - declare post-injection
///   hooks; each method must have the signature
///   `fn method(&mut self) -> stagehand::DiResult<()>`
#[proc_macro_derive(Injectable, attributes(inject, injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	injectable::derive_injectable_impl(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
