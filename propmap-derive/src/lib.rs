//! `#[derive(PropertyObject)]` for propmap.
//!
//! ```ignore
//! #[derive(Default, PropertyObject)]
//! #[property_root(name = "customer")]
//! struct Customer {
//!     #[property]
//!     name: String,
//!     #[property(name = "tel")]
//!     phone: String,
//!     #[property(converter = propmap::Rfc3339)]
//!     since: chrono::DateTime<chrono::Utc>,
//!     cache: Vec<u8>, // not mapped
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Meta, Type, parse_macro_input};

#[proc_macro_derive(PropertyObject, attributes(property, property_root))]
pub fn derive_property_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Options of one `#[property(...)]` field.
#[derive(Default)]
struct FieldOptions {
    key: Option<LitStr>,
    converter: Option<Type>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "PropertyObject can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "PropertyObject can only be derived for structs",
            ));
        }
    };

    let ident = &input.ident;
    let type_name = ident.unraw().to_string();
    let root = root_override(&input.attrs)?.map(|name| quote! { .root(#name) });

    let mut descriptors = Vec::new();
    for field in fields {
        let Some(options) = field_options(&field.attrs)? else {
            continue;
        };
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let field_name = field_ident.unraw().to_string();
        let ty = &field.ty;

        let constructor = match &options.converter {
            Some(converter) => quote! {
                ::propmap::FieldDescriptor::with_converter::<#converter, _, _>
            },
            None => quote! { ::propmap::FieldDescriptor::new },
        };
        let key = options.key.map(|key| quote! { .key(#key) });

        descriptors.push(quote! {
            .field(
                #constructor(
                    #field_name,
                    |object: &Self| &object.#field_ident,
                    |object: &mut Self, value: #ty| object.#field_ident = value,
                )
                #key
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::propmap::PropertyObject for #ident #ty_generics #where_clause {
            fn descriptor() -> ::propmap::TypeDescriptor<Self> {
                ::propmap::TypeDescriptor::named(#type_name)
                    #root
                    #(#descriptors)*
            }
        }
    })
}

/// `#[property_root(name = "...")]`
fn root_override(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut root = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("property_root")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                root = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unknown property_root option, expected `name`"))
            }
        })?;
    }
    Ok(root)
}

/// `#[property]`, `#[property(name = "...")]`, `#[property(converter = Type)]`.
///
/// `None` when the field carries no `#[property]` attribute.
fn field_options(attrs: &[Attribute]) -> syn::Result<Option<FieldOptions>> {
    let mut options: Option<FieldOptions> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("property")) {
        let current = options.get_or_insert_with(FieldOptions::default);
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                current.key = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else if meta.path.is_ident("converter") {
                current.converter = Some(meta.value()?.parse::<Type>()?);
                Ok(())
            } else {
                Err(meta.error("unknown property option, expected `name` or `converter`"))
            }
        })?;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn error_of(input: DeriveInput) -> String {
        match expand(&input) {
            Ok(tokens) => panic!("expected an error, got {tokens}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn rejects_enums() {
        let message = error_of(parse_quote! {
            enum Shape { Circle, Square }
        });
        assert_eq!(message, "PropertyObject can only be derived for structs");
    }

    #[test]
    fn rejects_tuple_and_unit_structs() {
        let tuple = error_of(parse_quote! {
            struct Pair(#[property] String, u8);
        });
        assert_eq!(tuple, "PropertyObject can only be derived for structs with named fields");

        let unit = error_of(parse_quote! {
            struct Marker;
        });
        assert_eq!(unit, "PropertyObject can only be derived for structs with named fields");
    }

    #[test]
    fn rejects_unknown_root_option() {
        let message = error_of(parse_quote! {
            #[property_root(prefix = "x")]
            struct Customer {
                #[property]
                name: String,
            }
        });
        assert_eq!(message, "unknown property_root option, expected `name`");
    }

    #[test]
    fn rejects_unknown_field_option() {
        let message = error_of(parse_quote! {
            struct Customer {
                #[property(rename = "n")]
                name: String,
            }
        });
        assert_eq!(message, "unknown property option, expected `name` or `converter`");
    }

    #[test]
    fn repeated_property_attributes_merge() {
        let input: DeriveInput = parse_quote! {
            #[property_root(name = "cust")]
            struct Customer {
                #[property]
                #[property(name = "x")]
                name: String,
                ignored: u8,
            }
        };
        let expanded = expand(&input).unwrap().to_string();
        assert!(expanded.contains("TypeDescriptor :: named (\"Customer\")"));
        assert!(expanded.contains(". root (\"cust\")"));
        assert!(expanded.contains(". key (\"x\")"));
        assert_eq!(expanded.matches(". field (").count(), 1);
        assert!(!expanded.contains("ignored"));
    }

    #[test]
    fn converter_fields_use_with_converter() {
        let input: DeriveInput = parse_quote! {
            struct Event {
                #[property(converter = Rfc3339)]
                at: DateTime<Utc>,
            }
        };
        let expanded = expand(&input).unwrap().to_string();
        assert!(expanded.contains("with_converter"));
        assert!(expanded.contains("Rfc3339"));
    }
}
