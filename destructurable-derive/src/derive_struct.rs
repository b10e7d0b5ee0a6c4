//! Struct-specific `Entity` derivation.
//!
//! This module turns the named fields of a struct into an `EntityDef` builder
//! chain and collects the trait bounds the generated impls need.

use std::collections::HashSet;

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{
    DataStruct, Fields, LitStr, Result, Visibility, ext::IdentExt, parse_quote,
    spanned::Spanned,
};

use crate::{
    attrs::{ContainerOptions, FieldMode, parse_field_mode},
    crate_root,
};

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &syn::Generics,
    options: &ContainerOptions,
) -> Result<TokenStream> {
    let fields: Vec<syn::Field> = match data.fields {
        Fields::Named(fields) => fields.named.into_iter().collect(),
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new(
                fields.span(),
                "`Entity` cannot be derived for tuple structs: fields need names",
            ));
        }
        Fields::Unit => Vec::new(),
    };

    let root = crate_root();
    let type_name = LitStr::new(&name.unraw().to_string(), name.span());

    let mut readers = Vec::new();
    let mut bounds: Vec<syn::WherePredicate> = Vec::new();
    let mut seen = HashSet::new();
    let mut base: Option<TokenStream> = None;

    for field in fields {
        let span = field.span();
        let mode = parse_field_mode(&field.attrs)?;
        let Some(ident) = field.ident else {
            continue;
        };
        let ty = &field.ty;

        match mode {
            FieldMode::Skip => continue,
            FieldMode::Base => {
                if base.is_some() {
                    return Err(syn::Error::new(
                        span,
                        "only one field can be marked #[destructure(base)]",
                    ));
                }
                bounds.push(parse_quote!(#ty: #root::Entity));
                base = Some(quote_spanned! { span =>
                    .base(
                        |entity| {
                            entity.downcast_ref::<Self>().map(|entity| {
                                let base: &dyn ::core::any::Any = &entity.#ident;
                                base
                            })
                        },
                        <#ty as #root::Entity>::definition,
                    )
                });
            }
            FieldMode::ByVisibility if matches!(field.vis, Visibility::Inherited) => {}
            FieldMode::ByVisibility | FieldMode::Include => {
                let field_name = ident.unraw().to_string();
                seen.insert(field_name.clone());
                let field_name = LitStr::new(&field_name, ident.span());
                bounds.push(parse_quote!(#ty: #root::Destructure));
                readers.push(quote_spanned! { span =>
                    .field(#field_name, |entity| match entity.downcast_ref::<Self>() {
                        ::core::option::Option::Some(entity) => #root::FieldRef::borrowed(&entity.#ident),
                        ::core::option::Option::None => #root::FieldRef::Null,
                    })
                });
            }
        }
    }

    for getter in &options.getters {
        let getter_name = getter.unraw().to_string();
        if !seen.insert(getter_name.clone()) {
            return Err(syn::Error::new(
                getter.span(),
                format!("getter `{getter_name}` has the same name as an enumerated field"),
            ));
        }
        let getter_name = LitStr::new(&getter_name, getter.span());
        readers.push(quote! {
            .field(#getter_name, |entity| match entity.downcast_ref::<Self>() {
                ::core::option::Option::Some(entity) => #root::FieldRef::owned(entity.#getter()),
                ::core::option::Option::None => #root::FieldRef::Null,
            })
        });
    }

    let display_string = if options.display {
        quote! { ::std::string::ToString::to_string(self) }
    } else {
        quote! { ::std::string::String::from(#type_name) }
    };

    let mut generics = generics.clone();
    {
        let where_clause = generics.make_where_clause();
        where_clause.predicates.push(parse_quote! {
            Self: ::core::clone::Clone + ::core::marker::Send + ::core::marker::Sync + 'static
        });
        where_clause.predicates.extend(bounds);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #root::Destructure for #name #ty_generics #where_clause {
            fn value(&self) -> #root::Value<'_> {
                #root::Value::Entity(self)
            }

            fn capture(&self) -> #root::Scalar {
                #root::Scalar::Opaque(#root::OpaqueValue::new(::core::clone::Clone::clone(self)))
            }

            fn display_string(&self) -> ::std::string::String {
                #display_string
            }
        }

        impl #impl_generics #root::Entity for #name #ty_generics #where_clause {
            fn definition() -> #root::EntityDef {
                #root::EntityDef::new(#type_name)
                    #(#readers)*
                    #base
            }

            fn entity_definition(&self) -> #root::EntityDef {
                <Self as #root::Entity>::definition()
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_destructure(&self) -> &dyn #root::Destructure {
                self
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::{Data, DeriveInput};

    use super::*;
    use crate::attrs::parse_container_options;

    fn derive(input: DeriveInput) -> Result<TokenStream> {
        let options = parse_container_options(&input.attrs)?;
        let Data::Struct(data) = input.data else {
            panic!("expected a struct");
        };
        derive_struct(&input.ident, data, &input.generics, &options)
    }

    #[test]
    fn private_fields_are_left_out_unless_included() {
        let tokens = derive(parse_quote! {
            struct Employee {
                pub name: String,
                pub(crate) team: String,
                salary: u64,
                #[destructure(include)]
                badge: u32,
            }
        })
        .unwrap()
        .to_string();
        assert!(tokens.contains("\"name\""));
        assert!(tokens.contains("\"team\""));
        assert!(!tokens.contains("\"salary\""));
        assert!(tokens.contains("\"badge\""));
    }

    #[test]
    fn skipped_fields_are_left_out() {
        let tokens = derive(parse_quote! {
            struct Employee {
                pub name: String,
                #[destructure(skip)]
                pub cache: Vec<u8>,
            }
        })
        .unwrap()
        .to_string();
        assert!(!tokens.contains("\"cache\""));
    }

    #[test]
    fn raw_identifiers_are_unrawed() {
        let tokens = derive(parse_quote! {
            struct Item {
                pub r#type: String,
            }
        })
        .unwrap()
        .to_string();
        assert!(tokens.contains("\"type\""));
    }

    #[test]
    fn two_bases_error() {
        let result = derive(parse_quote! {
            struct Manager {
                #[destructure(base)]
                employee: Employee,
                #[destructure(base)]
                person: Person,
            }
        });
        assert!(result.unwrap_err().to_string().contains("only one field"));
    }

    #[test]
    fn getter_clashing_with_field_errors() {
        let result = derive(parse_quote! {
            #[destructure(getter = "name")]
            struct Employee {
                pub name: String,
            }
        });
        assert!(result.unwrap_err().to_string().contains("same name"));
    }

    #[test]
    fn display_option_uses_to_string() {
        let tokens = derive(parse_quote! {
            #[destructure(display)]
            struct Money {
                pub amount: u64,
            }
        })
        .unwrap()
        .to_string();
        assert!(tokens.contains("ToString"));
    }
}
