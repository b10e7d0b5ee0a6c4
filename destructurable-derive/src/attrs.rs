//! Parsing of `#[destructure(...)]` attributes.
//!
//! This module maps attribute syntax to enumeration decisions and produces
//! structured errors for invalid forms.

use syn::{Attribute, Ident, LitStr, Result, spanned::Spanned};

const ATTRIBUTE: &str = "destructure";

/// Options placed on the struct itself.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// `#[destructure(display)]`: the text form comes from `Display`.
    pub(crate) display: bool,
    /// `#[destructure(getter = "method")]`, in declaration order.
    pub(crate) getters: Vec<Ident>,
}

/// How a field takes part in enumeration.
///
/// | Attribute                 | Behavior                                 |
/// |---------------------------|------------------------------------------|
/// | None                      | enumerated when not private              |
/// | `#[destructure(include)]` | enumerated regardless of visibility      |
/// | `#[destructure(skip)]`    | never enumerated                         |
/// | `#[destructure(base)]`    | holds the base entity                    |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum FieldMode {
    #[default]
    ByVisibility,
    Include,
    Skip,
    Base,
}

pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();
    for attr in attrs {
        if !attr.path().is_ident(ATTRIBUTE) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("display") {
                options.display = true;
                Ok(())
            } else if meta.path.is_ident("getter") {
                let method: LitStr = meta.value()?.parse()?;
                options.getters.push(method.parse()?);
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported container attribute: expected `display` or `getter = \"method\"`",
                ))
            }
        })?;
    }
    Ok(options)
}

pub(crate) fn parse_field_mode(attrs: &[Attribute]) -> Result<FieldMode> {
    let mut mode: Option<FieldMode> = None;
    for attr in attrs {
        if !attr.path().is_ident(ATTRIBUTE) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("include") {
                FieldMode::Include
            } else if meta.path.is_ident("skip") {
                FieldMode::Skip
            } else if meta.path.is_ident("base") {
                FieldMode::Base
            } else {
                return Err(meta.error(
                    "unsupported field attribute: expected `include`, `skip` or `base`",
                ));
            };
            if mode.is_some_and(|current| current != next) {
                return Err(syn::Error::new(
                    meta.path.span(),
                    "conflicting #[destructure] attributes on the same field",
                ));
            }
            mode = Some(next);
            Ok(())
        })?;
    }
    Ok(mode.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_is_by_visibility() {
        let attrs = parse_attrs(quote! {});
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::ByVisibility);
    }

    #[test]
    fn field_modes() {
        let attrs = parse_attrs(quote! { #[destructure(include)] });
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::Include);

        let attrs = parse_attrs(quote! { #[destructure(skip)] });
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::Skip);

        let attrs = parse_attrs(quote! { #[destructure(base)] });
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::Base);
    }

    #[test]
    fn conflicting_field_modes_error() {
        let attrs = parse_attrs(quote! { #[destructure(skip, base)] });
        let result = parse_field_mode(&attrs);
        assert!(result.unwrap_err().to_string().contains("conflicting"));

        let attrs = parse_attrs(quote! {
            #[destructure(include)]
            #[destructure(skip)]
        });
        assert!(parse_field_mode(&attrs).is_err());
    }

    #[test]
    fn repeated_field_mode_is_accepted() {
        let attrs = parse_attrs(quote! { #[destructure(skip, skip)] });
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::Skip);
    }

    #[test]
    fn unknown_field_attribute_errors() {
        let attrs = parse_attrs(quote! { #[destructure(mask)] });
        let result = parse_field_mode(&attrs);
        assert!(result.unwrap_err().to_string().contains("unsupported field attribute"));
    }

    #[test]
    fn container_options() {
        let attrs = parse_attrs(quote! {
            #[destructure(display)]
            #[destructure(getter = "full_name", getter = "age")]
        });
        let options = parse_container_options(&attrs).unwrap();
        assert!(options.display);
        let getters: Vec<String> = options.getters.iter().map(ToString::to_string).collect();
        assert_eq!(getters, vec!["full_name", "age"]);
    }

    #[test]
    fn getter_must_be_an_identifier() {
        let attrs = parse_attrs(quote! { #[destructure(getter = "not an ident")] });
        assert!(parse_container_options(&attrs).is_err());
    }

    #[test]
    fn unknown_container_attribute_errors() {
        let attrs = parse_attrs(quote! { #[destructure(base)] });
        let result = parse_container_options(&attrs);
        assert!(result.unwrap_err().to_string().contains("unsupported container attribute"));
    }

    #[test]
    fn other_attributes_ignored() {
        let attrs = parse_attrs(quote! {
            #[derive(Clone)]
            #[serde(skip)]
        });
        assert_eq!(parse_field_mode(&attrs).unwrap(), FieldMode::ByVisibility);
        assert!(!parse_container_options(&attrs).unwrap().display);
    }
}
