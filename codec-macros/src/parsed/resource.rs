//! Parses a `#[derive(JsonApiResource)]` input into a structured
//! description the codegen module turns into a `Contract`.

use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, LitStr, Meta, MetaNameValue, Path, Token, Type,
};

use crate::type_shape;

pub struct ParsedResource {
    pub ident: Ident,
    pub wire_name: LitStr,
    pub fields: Vec<ParsedField>,
}

pub struct ParsedField {
    pub ident: Ident,
    pub ty: Type,
    pub kind: FieldKind,
}

pub enum FieldKind {
    Id,
    Attribute { skip_serializing: bool, skip_deserializing: bool },
    BelongsTo { target: Path, via: Option<Ident>, uri: Option<LitStr> },
    HasMany { target: Path, uri: Option<LitStr> },
}

pub fn parse(input: &DeriveInput) -> syn::Result<ParsedResource> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(input, "JsonApiResource can only be derived for a struct"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(input, "JsonApiResource requires a struct with named fields"));
    };

    let wire_name = container_wire_name(input)?;

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let ident = field.ident.clone().expect("named field always has an ident");
        let kind = parse_field_kind(&field.attrs, &ident)?;
        fields.push(ParsedField { ident, ty: field.ty.clone(), kind });
    }

    let id_count = fields.iter().filter(|f| matches!(f.kind, FieldKind::Id)).count();
    if id_count == 0 {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "no field marked #[jsonapi(id)]: exactly one field must be the resource id",
        ));
    }
    if id_count > 1 {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "more than one field marked #[jsonapi(id)]: exactly one id field is allowed",
        ));
    }

    for field in &fields {
        match &field.kind {
            FieldKind::HasMany { .. } => {
                if type_shape::as_has_many_collection(&field.ty).is_none() {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "#[jsonapi(has_many)] requires a field of type `Vec<Rc<RefCell<Target>>>`",
                    ));
                }
            }
            FieldKind::BelongsTo { via, .. } => {
                if type_shape::as_belongs_to_navigation(&field.ty).is_none() && via.is_none() {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "#[jsonapi(belongs_to)] requires either a field of type \
                         `Option<Rc<RefCell<Target>>>` or a `via` naming the foreign-key field",
                    ));
                }
            }
            _ => {}
        }
    }

    Ok(ParsedResource { ident: input.ident.clone(), wire_name, fields })
}

fn container_wire_name(input: &DeriveInput) -> syn::Result<LitStr> {
    for attr in &input.attrs {
        if !attr.path().is_ident("jsonapi") {
            continue;
        }
        let meta = attr.parse_args::<Meta>()?;
        if let Meta::NameValue(nv) = &meta {
            if nv.path.is_ident("type") {
                return expr_as_litstr(&nv.value);
            }
        }
        return Err(syn::Error::new_spanned(&meta, "expected `type = \"wire-name\"`"));
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "missing #[jsonapi(type = \"wire-name\")] on the struct",
    ))
}

fn parse_field_kind(attrs: &[Attribute], field_ident: &Ident) -> syn::Result<FieldKind> {
    let mut found: Option<FieldKind> = None;
    for attr in attrs {
        if !attr.path().is_ident("jsonapi") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "at most one #[jsonapi(...)] attribute is allowed per field"));
        }
        let meta = attr.parse_args::<Meta>()?;
        found = Some(parse_directive(&meta, field_ident)?);
    }
    Ok(found.unwrap_or(FieldKind::Attribute { skip_serializing: false, skip_deserializing: false }))
}

fn parse_directive(meta: &Meta, field_ident: &Ident) -> syn::Result<FieldKind> {
    match meta {
        Meta::Path(path) if path.is_ident("id") => Ok(FieldKind::Id),
        Meta::Path(path) if path.is_ident("attribute") => {
            Ok(FieldKind::Attribute { skip_serializing: false, skip_deserializing: false })
        }
        Meta::List(list) if list.path.is_ident("attribute") => {
            let mut skip_serializing = false;
            let mut skip_deserializing = false;
            let idents = Punctuated::<Ident, Token![,]>::parse_terminated.parse2(list.tokens.clone())?;
            for ident in idents {
                if ident == "skip_serializing" {
                    skip_serializing = true;
                } else if ident == "skip_deserializing" {
                    skip_deserializing = true;
                } else {
                    return Err(syn::Error::new_spanned(
                        &ident,
                        "expected `skip_serializing` or `skip_deserializing`",
                    ));
                }
            }
            Ok(FieldKind::Attribute { skip_serializing, skip_deserializing })
        }
        Meta::List(list) if list.path.is_ident("belongs_to") => {
            let values = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(list.tokens.clone())?;
            let mut target = None;
            let mut via = None;
            let mut uri = None;
            for nv in values {
                if nv.path.is_ident("target") {
                    target = Some(expr_as_path(&expr_as_litstr(&nv.value)?)?);
                } else if nv.path.is_ident("via") {
                    via = Some(Ident::new(&expr_as_litstr(&nv.value)?.value(), field_ident.span()));
                } else if nv.path.is_ident("uri") {
                    uri = Some(expr_as_litstr(&nv.value)?);
                } else {
                    return Err(syn::Error::new_spanned(&nv.path, "unknown belongs_to argument"));
                }
            }
            let target = target.ok_or_else(|| syn::Error::new_spanned(list, "belongs_to requires `target = \"Type\"`"))?;
            Ok(FieldKind::BelongsTo { target, via, uri })
        }
        Meta::List(list) if list.path.is_ident("has_many") => {
            let values = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(list.tokens.clone())?;
            let mut target = None;
            let mut uri = None;
            for nv in values {
                if nv.path.is_ident("target") {
                    target = Some(expr_as_path(&expr_as_litstr(&nv.value)?)?);
                } else if nv.path.is_ident("via") {
                    return Err(syn::Error::new_spanned(
                        &nv.path,
                        "has_many cannot take `via`: via_field is ignored for many-valued relationships",
                    ));
                } else if nv.path.is_ident("uri") {
                    uri = Some(expr_as_litstr(&nv.value)?);
                } else {
                    return Err(syn::Error::new_spanned(&nv.path, "unknown has_many argument"));
                }
            }
            let target = target.ok_or_else(|| syn::Error::new_spanned(list, "has_many requires `target = \"Type\"`"))?;
            Ok(FieldKind::HasMany { target, uri })
        }
        other => Err(syn::Error::new_spanned(other, "unknown #[jsonapi(...)] field attribute")),
    }
}

fn expr_as_litstr(expr: &Expr) -> syn::Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.clone()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn expr_as_path(lit: &LitStr) -> syn::Result<Path> {
    lit.parse()
}
