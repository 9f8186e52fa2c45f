//! Turns a [`ParsedResource`] into the `impl JsonApiResource` token stream:
//! one `Field`/`Relationship` entry per annotated struct field, each
//! carrying a pair of closures that close over a
//! `downcast_ref::<RefCell<Self>>()` call — the typed-closures-keyed-by-
//! erased-value-type realization the core crate's docs describe.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, LitStr, Path};

use crate::parsed::{FieldKind, ParsedField, ParsedResource};
use crate::type_shape;

pub fn expand(resource: &ParsedResource) -> TokenStream {
    let struct_ident = &resource.ident;
    let wire_name = &resource.wire_name;

    let mut field_entries = Vec::new();
    let mut relationship_entries = Vec::new();

    for field in &resource.fields {
        match &field.kind {
            FieldKind::Id => field_entries.push(scalar_field(struct_ident, field, true, false, false)),
            FieldKind::Attribute { skip_serializing, skip_deserializing } => {
                field_entries.push(scalar_field(struct_ident, field, false, *skip_serializing, *skip_deserializing))
            }
            FieldKind::BelongsTo { target, via, uri } => {
                relationship_entries.push(belongs_to(struct_ident, field, target, via.as_ref(), uri.as_ref()))
            }
            FieldKind::HasMany { target, uri } => {
                relationship_entries.push(has_many(struct_ident, field, target, uri.as_ref()))
            }
        }
    }

    quote! {
        impl ::jsonapi_codec::JsonApiResource for #struct_ident {
            fn contract() -> ::jsonapi_codec::Contract {
                ::jsonapi_codec::Contract {
                    name: #wire_name,
                    type_id: ::std::any::TypeId::of::<::std::cell::RefCell<#struct_ident>>(),
                    type_name: ::std::stringify!(#struct_ident),
                    create_instance: || ::jsonapi_codec::contract::new_handle(#struct_ident::default()),
                    fields: ::std::vec![ #(#field_entries),* ],
                    relationships: ::std::vec![ #(#relationship_entries),* ],
                }
            }
        }
    }
}

fn scalar_field(struct_ident: &Ident, field: &ParsedField, is_id: bool, skip_ser: bool, skip_de: bool) -> TokenStream {
    let field_ident = &field.ident;
    let name = LitStr::new(&field_ident.to_string(), field_ident.span());

    let mut option_flags = vec![quote!(::jsonapi_codec::FieldOptions::NONE)];
    if is_id {
        option_flags.push(quote!(::jsonapi_codec::FieldOptions::ID));
    }
    if !skip_ser {
        option_flags.push(quote!(::jsonapi_codec::FieldOptions::CAN_SERIALIZE));
    }
    if !skip_de {
        option_flags.push(quote!(::jsonapi_codec::FieldOptions::CAN_DESERIALIZE));
    }

    let get = if skip_ser {
        quote!(None)
    } else {
        quote! {
            Some(Box::new(|handle: &::jsonapi_codec::contract::Handle| {
                let cell = handle
                    .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                    .expect("handle does not wrap the expected type");
                ::jsonapi_codec::scalar::serialize_value(&cell.borrow().#field_ident)
            }))
        }
    };
    let set = if skip_de {
        quote!(None)
    } else {
        quote! {
            Some(Box::new(|handle: &::jsonapi_codec::contract::Handle, value: ::jsonapi_codec::Value| {
                let cell = handle
                    .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                    .expect("handle does not wrap the expected type");
                cell.borrow_mut().#field_ident = ::jsonapi_codec::scalar::deserialize_value(value)?;
                Ok(())
            }))
        }
    };

    quote! {
        ::jsonapi_codec::contract::Field {
            name: #name,
            options: #(#option_flags)|*,
            get: #get,
            set: #set,
        }
    }
}

fn belongs_to(
    struct_ident: &Ident,
    field: &ParsedField,
    target: &Path,
    via: Option<&Ident>,
    uri: Option<&LitStr>,
) -> TokenStream {
    let field_ident = &field.ident;
    let name = LitStr::new(&field_ident.to_string(), field_ident.span());
    let uri_tokens = uri_tokens(uri);

    if type_shape::as_belongs_to_navigation(&field.ty).is_some() {
        let via_field_name = opt_litstr_tokens(via.map(|v| v.to_string()));
        let field_name = LitStr::new(&field_ident.to_string(), field_ident.span());
        quote! {
            ::jsonapi_codec::contract::Relationship {
                name: #name,
                kind: ::jsonapi_codec::RelationshipKind::BelongsTo,
                related_type: ::std::any::TypeId::of::<::std::cell::RefCell<#target>>(),
                related_type_name: ::std::stringify!(#target),
                options: ::jsonapi_codec::FieldOptions::DEFAULT,
                field_name: Some(#field_name),
                via_field_name: #via_field_name,
                get_related: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle| {
                    let cell = handle
                        .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                        .expect("handle does not wrap the expected type");
                    match &cell.borrow().#field_ident {
                        Some(related) => ::std::vec![::jsonapi_codec::contract::to_handle(related.clone())],
                        None => ::std::vec![],
                    }
                })),
                set_related: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle, related: ::std::vec::Vec<::jsonapi_codec::contract::Handle>| {
                    let cell = handle
                        .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                        .expect("handle does not wrap the expected type");
                    let mut items = related.into_iter();
                    let value = match items.next() {
                        Some(related_handle) => Some(
                            ::jsonapi_codec::contract::from_handle::<#target>(related_handle).map_err(|_| {
                                ::jsonapi_codec::CodecError::ShapeMismatch(::std::format!(
                                    "relationship `{}` resolved to an unexpected type", #name
                                ))
                            })?,
                        ),
                        None => None,
                    };
                    cell.borrow_mut().#field_ident = value;
                    Ok(())
                })),
                get_foreign_key: None,
                set_foreign_key: None,
                uri_template: #uri_tokens,
            }
        }
    } else {
        let via_ident = via.expect("parser guarantees via is present when the field isn't Option<Rc<RefCell<_>>>");
        let via_name = LitStr::new(&via_ident.to_string(), via_ident.span());
        quote! {
            ::jsonapi_codec::contract::Relationship {
                name: #name,
                kind: ::jsonapi_codec::RelationshipKind::BelongsTo,
                related_type: ::std::any::TypeId::of::<::std::cell::RefCell<#target>>(),
                related_type_name: ::std::stringify!(#target),
                options: ::jsonapi_codec::FieldOptions::DEFAULT,
                field_name: None,
                via_field_name: Some(#via_name),
                get_related: None,
                set_related: None,
                get_foreign_key: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle| {
                    let cell = handle
                        .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                        .expect("handle does not wrap the expected type");
                    ::jsonapi_codec::scalar::serialize_value(&cell.borrow().#via_ident)
                })),
                set_foreign_key: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle, value: ::jsonapi_codec::Value| {
                    let cell = handle
                        .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                        .expect("handle does not wrap the expected type");
                    cell.borrow_mut().#via_ident = ::jsonapi_codec::scalar::deserialize_value(value)?;
                    Ok(())
                })),
                uri_template: #uri_tokens,
            }
        }
    }
}

fn has_many(struct_ident: &Ident, field: &ParsedField, target: &Path, uri: Option<&LitStr>) -> TokenStream {
    let field_ident = &field.ident;
    let name = LitStr::new(&field_ident.to_string(), field_ident.span());
    let field_name = LitStr::new(&field_ident.to_string(), field_ident.span());
    let uri_tokens = uri_tokens(uri);

    quote! {
        ::jsonapi_codec::contract::Relationship {
            name: #name,
            kind: ::jsonapi_codec::RelationshipKind::HasMany,
            related_type: ::std::any::TypeId::of::<::std::cell::RefCell<#target>>(),
            related_type_name: ::std::stringify!(#target),
            options: ::jsonapi_codec::FieldOptions::DEFAULT,
            field_name: Some(#field_name),
            via_field_name: None,
            get_related: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle| {
                let cell = handle
                    .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                    .expect("handle does not wrap the expected type");
                cell.borrow()
                    .#field_ident
                    .iter()
                    .map(|related| ::jsonapi_codec::contract::to_handle(related.clone()))
                    .collect()
            })),
            set_related: Some(Box::new(|handle: &::jsonapi_codec::contract::Handle, related: ::std::vec::Vec<::jsonapi_codec::contract::Handle>| {
                let cell = handle
                    .downcast_ref::<::std::cell::RefCell<#struct_ident>>()
                    .expect("handle does not wrap the expected type");
                let mut items = ::std::vec::Vec::with_capacity(related.len());
                for related_handle in related {
                    items.push(::jsonapi_codec::contract::from_handle::<#target>(related_handle).map_err(|_| {
                        ::jsonapi_codec::CodecError::ShapeMismatch(::std::format!(
                            "relationship `{}` resolved to an unexpected type", #name
                        ))
                    })?);
                }
                cell.borrow_mut().#field_ident = items;
                Ok(())
            })),
            get_foreign_key: None,
            set_foreign_key: None,
            uri_template: #uri_tokens,
        }
    }
}

fn uri_tokens(uri: Option<&LitStr>) -> TokenStream {
    match uri {
        Some(lit) => quote!(Some(#lit)),
        None => quote!(None),
    }
}

fn opt_litstr_tokens(value: Option<String>) -> TokenStream {
    match value {
        Some(s) => {
            let lit = LitStr::new(&s, proc_macro2::Span::call_site());
            quote!(Some(#lit))
        }
        None => quote!(None),
    }
}
