//! Syntactic (pre-type-check) recognition of the field shapes the derive
//! macro requires for relationship fields: `Option<Rc<RefCell<Target>>>`
//! for `belongs_to`, `Vec<Rc<RefCell<Target>>>` for `has_many`. A macro
//! runs before name resolution, so this only ever matches token shape, not
//! resolved types — a field aliasing one of these wrappers under a
//! different name will not be recognized, which is an accepted limitation.

use syn::{GenericArgument, PathArguments, Type};

/// If `ty` is `wrapper<Inner>` (exactly one angle-bracketed type argument
/// on a path whose last segment is named `wrapper`), returns `Inner`.
fn unwrap_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Unwraps `Rc<RefCell<Target>>`, returning `Target`.
fn unwrap_rc_refcell(ty: &Type) -> Option<&Type> {
    unwrap_generic(ty, "Rc").and_then(|inner| unwrap_generic(inner, "RefCell"))
}

/// Recognizes `Option<Rc<RefCell<Target>>>`.
pub fn as_belongs_to_navigation(ty: &Type) -> Option<&Type> {
    unwrap_generic(ty, "Option").and_then(unwrap_rc_refcell)
}

/// Recognizes `Vec<Rc<RefCell<Target>>>`.
pub fn as_has_many_collection(ty: &Type) -> Option<&Type> {
    unwrap_generic(ty, "Vec").and_then(unwrap_rc_refcell)
}
