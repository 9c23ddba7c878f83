//! Implementation of the `#[derive(Injectable)]` macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
	Data, DeriveInput, Expr, Fields, GenericArgument, Ident, LitBool, LitStr, PathArguments,
	Result, Type,
};

#[derive(Default)]
struct InjectOptions {
	optional: bool,
	name: Option<LitStr>,
	priority: Option<Expr>,
	condition: Option<LitStr>,
	expected: Option<bool>,
	default_expr: Option<Expr>,
}

/// Parse the options of one `#[inject]` / `#[inject(...)]` attribute
fn parse_inject_attr(attr: &syn::Attribute) -> Result<InjectOptions> {
	let mut options = InjectOptions::default();

	match &attr.meta {
		syn::Meta::Path(_) => Ok(options),
		syn::Meta::List(_) => {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("optional") {
					options.optional = true;
					Ok(())
				} else if meta.path.is_ident("name") {
					options.name = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("priority") {
					options.priority = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("condition") {
					options.condition = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("expected") {
					let lit: LitBool = meta.value()?.parse()?;
					options.expected = Some(lit.value());
					Ok(())
				} else if meta.path.is_ident("default") {
					let lit: LitStr = meta.value()?.parse()?;
					options.default_expr = Some(lit.parse()?);
					Ok(())
				} else {
					Err(meta.error(
						"unknown inject option; expected one of: optional, name, priority, condition, expected, default",
					))
				}
			})?;
			Ok(options)
		}
		syn::Meta::NameValue(nv) => Err(syn::Error::new_spanned(
			nv,
			"expected #[inject] or #[inject(...)]",
		)),
	}
}

/// Peel `Option<...>` from a field type, if it has that shape
fn option_inner(ty: &Type) -> Option<&Type> {
	let Type::Path(path) = ty else { return None };
	let segment = path.path.segments.last()?;
	if segment.ident != "Option" {
		return None;
	}
	let PathArguments::AngleBracketed(args) = &segment.arguments else {
		return None;
	};
	match args.args.first()? {
		GenericArgument::Type(inner) => Some(inner),
		_ => None,
	}
}

/// Whether the `Option<Arc<...>>` payload is a trait object
fn is_trait_object_member(ty: &Type) -> bool {
	let Some(inner) = option_inner(ty) else {
		return false;
	};
	let Type::Path(path) = inner else { return false };
	let Some(segment) = path.path.segments.last() else {
		return false;
	};
	if segment.ident != "Arc" {
		return false;
	}
	let PathArguments::AngleBracketed(args) = &segment.arguments else {
		return false;
	};
	matches!(args.args.first(), Some(GenericArgument::Type(Type::TraitObject(_))))
}

/// Implementation of the `#[derive(Injectable)]` macro
///
/// Generates `Injectable::members` from `#[inject]` field attributes, and
/// `Injectable::hooks` / `Injectable::construct` from the struct-level
/// `#[injectable(...)]` attribute.
pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
	let struct_name = &input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	// Struct-level options
	let mut construct = false;
	let mut hooks: Vec<(Ident, Expr)> = Vec::new();
	for attr in &input.attrs {
		if !attr.path().is_ident("injectable") {
			continue;
		}
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("construct") {
				construct = true;
				Ok(())
			} else if meta.path.is_ident("hooks") {
				meta.parse_nested_meta(|hook| {
					let Some(method) = hook.path.get_ident().cloned() else {
						return Err(hook.error("expected `method = order`"));
					};
					let order: Expr = hook.value()?.parse()?;
					hooks.push((method, order));
					Ok(())
				})
			} else {
				Err(meta.error("unknown injectable option; expected `construct` or `hooks(...)`"))
			}
		})?;
	}

	// Validate that this is a struct and extract fields
	let fields = match &input.data {
		Data::Struct(data_struct) => match &data_struct.fields {
			Fields::Named(fields) => Some(&fields.named),
			Fields::Unit => None,
			Fields::Unnamed(_) => {
				return Err(syn::Error::new_spanned(
					struct_name,
					"#[derive(Injectable)] cannot be applied to tuple structs",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				struct_name,
				"#[derive(Injectable)] can only be applied to structs",
			));
		}
	};

	let mut member_stmts = Vec::new();
	if let Some(fields) = fields {
		for field in fields {
			let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("inject")) else {
				continue;
			};
			let options = parse_inject_attr(attr)?;
			let Some(ident) = &field.ident else { continue };

			if option_inner(&field.ty).is_none() {
				return Err(syn::Error::new_spanned(
					&field.ty,
					"fields marked #[inject] must be of type Option<Arc<T>>",
				));
			}
			if options.expected.is_some() && options.condition.is_none() {
				return Err(syn::Error::new_spanned(
					attr,
					"`expected` requires a `condition`",
				));
			}
			if options.default_expr.is_some() && !options.optional {
				return Err(syn::Error::new_spanned(
					attr,
					"`default` requires `optional`: required members fail instead of defaulting",
				));
			}

			let member_name = LitStr::new(&ident.to_string(), ident.span());
			let entry = if is_trait_object_member(&field.ty) {
				quote! { plan.member_trait(#member_name, |target: &mut Self| &mut target.#ident) }
			} else {
				quote! { plan.member(#member_name, |target: &mut Self| &mut target.#ident) }
			};

			let mut chain = entry;
			if options.optional {
				chain = quote! { #chain.optional() };
			}
			if let Some(name) = &options.name {
				chain = quote! { #chain.named(#name) };
			}
			if let Some(priority) = &options.priority {
				chain = quote! { #chain.priority(#priority) };
			}
			if let Some(condition) = &options.condition {
				let condition_field = Ident::new(&condition.value(), condition.span());
				let expected = options.expected.unwrap_or(true);
				chain = quote! {
					#chain.when(
						#condition,
						|target: &Self| ::core::option::Option::Some(target.#condition_field),
						#expected,
					)
				};
			}
			if let Some(default_expr) = &options.default_expr {
				chain = quote! { #chain.or_default(#default_expr) };
			}

			member_stmts.push(quote! { #chain; });
		}
	}

	let members_impl = if member_stmts.is_empty() {
		TokenStream::new()
	} else {
		quote! {
			fn members(plan: &mut ::stagehand::InjectionPlan<Self>) {
				#(#member_stmts)*
			}
		}
	};

	let hooks_impl = if hooks.is_empty() {
		TokenStream::new()
	} else {
		let hook_stmts = hooks.iter().map(|(method, order)| {
			let hook_name = LitStr::new(&method.to_string(), method.span());
			quote! {
				hooks.hook(#hook_name, |target: &mut Self| target.#method()).order(#order);
			}
		});
		quote! {
			fn hooks(hooks: &mut ::stagehand::HookSet<Self>) {
				#(#hook_stmts)*
			}
		}
	};

	let construct_impl = if construct {
		quote! {
			fn construct() -> ::core::option::Option<Self> {
				::core::option::Option::Some(<Self as ::core::default::Default>::default())
			}
		}
	} else {
		TokenStream::new()
	};

	Ok(quote! {
		impl #impl_generics ::stagehand::Injectable for #struct_name #ty_generics #where_clause {
			#members_impl
			#hooks_impl
			#construct_impl
		}
	})
}
