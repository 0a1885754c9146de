//! Procedural macros for flux-dispatch

use darling::{FromDeriveInput, FromMeta, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Naming convention applied to variant names
    #[darling(default)]
    rename_all: Option<RenameRule>,

    /// Leave `ActionSummary` to a hand-written impl
    #[darling(default)]
    skip_summary: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit name, wins over `rename_all`
    #[darling(default)]
    rename: Option<String>,

    /// Marks the variant returned by `Action::init()`
    #[darling(default)]
    init: bool,
}

#[derive(Debug, Clone, Copy)]
enum RenameRule {
    ScreamingSnake,
    Snake,
}

impl FromMeta for RenameRule {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnake),
            "snake_case" => Ok(RenameRule::Snake),
            other => Err(darling::Error::unknown_value(other)),
        }
    }
}

impl RenameRule {
    fn apply(self, variant: &str) -> String {
        let snake = to_snake_case(variant);
        match self {
            RenameRule::ScreamingSnake => snake.to_uppercase(),
            RenameRule::Snake => snake,
        }
    }
}

/// Split a PascalCase string into parts
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    split_pascal_case(s)
        .iter()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

impl ActionVariant {
    fn action_name(&self, rule: Option<RenameRule>) -> String {
        let ident = self.ident.to_string();
        match (&self.rename, rule) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(rule)) => rule.apply(&ident),
            (None, None) => ident,
        }
    }
}

/// Derive macro for the Action trait
///
/// Generates:
/// - `name()` returning the variant name, renamed by `#[action(rename = "...")]`
///   on a variant or `#[action(rename_all = "SCREAMING_SNAKE_CASE")]` (or
///   `"snake_case"`) on the enum
/// - `init()` returning the unit variant marked `#[action(init)]`
/// - an `ActionSummary` impl using the `Debug` representation, unless
///   `#[action(skip_summary)]` is set
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(rename_all = "SCREAMING_SNAKE_CASE")]
/// enum TodoAction {
///     #[action(init)]
///     Init,
///     AddTodo { id: u64, text: String },
///     ToggleTodo { id: u64 },
///     #[action(rename = "SET_VISIBILITY_FILTER")]
///     SetFilter(VisibilityFilter),
/// }
///
/// let action = TodoAction::ToggleTodo { id: 1 };
/// assert_eq!(action.name(), "TOGGLE_TODO");
/// assert!(matches!(TodoAction::init(), TodoAction::Init));
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let init_variants: Vec<&ActionVariant> = variants.iter().filter(|v| v.init).collect();
    let init_variant = match init_variants.as_slice() {
        [only] => *only,
        [] => {
            return syn::Error::new_spanned(
                &input.ident,
                "Action requires one variant marked #[action(init)]",
            )
            .to_compile_error()
            .into();
        }
        [_, extra, ..] => {
            return syn::Error::new_spanned(
                &extra.ident,
                "only one variant may be marked #[action(init)]",
            )
            .to_compile_error()
            .into();
        }
    };
    if !matches!(init_variant.fields.style, darling::ast::Style::Unit) {
        return syn::Error::new_spanned(
            &init_variant.ident,
            "the #[action(init)] variant must be a unit variant",
        )
        .to_compile_error()
        .into();
    }
    let init_ident = &init_variant.ident;

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = v.action_name(opts.rename_all);

        match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        }
    });

    let mut expanded = quote! {
        impl #impl_generics flux_dispatch::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &str {
                match self {
                    #(#name_arms),*
                }
            }

            fn init() -> Self {
                #name::#init_ident
            }
        }
    };

    if !opts.skip_summary {
        expanded.extend(quote! {
            impl #impl_generics flux_dispatch::ActionSummary for #name #ty_generics #where_clause {}
        });
    }

    TokenStream::from(expanded)
}
