//! Derive macro for `destructurable`.
//!
//! This crate generates the field tables behind `#[derive(Entity)]`. It:
//! - reads `#[destructure(...)]` attributes on the struct and its fields
//! - emits `Destructure` and `Entity` implementations whose field readers are
//!   plain function pointers
//!
//! It does **not** define rules. Rule sets are authored at runtime through
//! `destructurable::DestructuringPolicy::builder()`.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::from_over_into
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Result, parse_macro_input};

mod attrs;
mod derive_struct;
use attrs::parse_container_options;
use derive_struct::derive_struct;

/// Derives `destructurable::Destructure` and `destructurable::Entity` for structs.
///
/// # Field enumeration
///
/// Named fields with a `pub` or restricted (`pub(crate)`, `pub(super)`)
/// visibility are enumerated in declaration order. Private fields are left out
/// unless marked.
///
/// # Field Attributes
///
/// - `#[destructure(include)]`: enumerate a private field.
/// - `#[destructure(skip)]`: never enumerate the field.
/// - `#[destructure(base)]`: the field holds the base entity. Its fields are
///   enumerated after this struct's own fields; names already seen at a more
///   derived level are skipped. At most one field can be the base.
///
/// # Container Attributes
///
/// - `#[destructure(getter = "method")]`: enumerate a computed field read by
///   calling `self.method()`. Repeatable; getters follow the stored fields.
/// - `#[destructure(display)]`: use the type's `Display` impl as its text form
///   (mutable snapshots, opaque scalars). Otherwise the text form is the type
///   name.
///
/// # Requirements
///
/// The struct must be `Clone`, `Send`, `Sync` and `'static`, and every
/// enumerated field type must implement `Destructure`.
///
/// Tuple structs, enums and unions are rejected at compile time.
#[proc_macro_derive(Entity, attributes(destructure))]
pub fn derive_entity(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let options = parse_container_options(&attrs)?;
    match data {
        Data::Struct(data) => derive_struct(&ident, data, &generics, &options),
        Data::Enum(data) => Err(syn::Error::new(
            data.enum_token.span,
            "`Entity` cannot be derived for enums",
        )),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span,
            "`Entity` cannot be derived for unions",
        )),
    }
}

/// Returns the token stream to reference the destructurable crate root.
///
/// Inside the runtime crate itself the path resolves through its
/// `extern crate self as destructurable;` alias.
fn crate_root() -> TokenStream {
    match crate_name("destructurable") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::destructurable },
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn expand_err(input: DeriveInput) -> String {
        expand(input).unwrap_err().to_string()
    }

    #[test]
    fn rejects_enums() {
        let message = expand_err(parse_quote! {
            enum Shape { Circle, Square }
        });
        assert!(message.contains("enums"));
    }

    #[test]
    fn rejects_unions() {
        let message = expand_err(parse_quote! {
            union Bits { a: u32, b: f32 }
        });
        assert!(message.contains("unions"));
    }

    #[test]
    fn rejects_tuple_structs() {
        let message = expand_err(parse_quote! {
            struct Pair(u32, u32);
        });
        assert!(message.contains("tuple structs"));
    }

    #[test]
    fn expands_named_structs() {
        let tokens = expand(parse_quote! {
            #[derive(Clone)]
            pub struct Employee {
                pub name: String,
                secret: String,
            }
        })
        .unwrap()
        .to_string();
        assert!(tokens.contains("\"name\""));
        assert!(!tokens.contains("\"secret\""));
    }
}
