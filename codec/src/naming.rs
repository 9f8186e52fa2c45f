//! Transforms between the on-wire naming convention (dash-case, leading
//! lower) and the in-memory convention (camelCase) used by Rust field names.

/// `"createdAt"` -> `"created-at"`.
///
/// Lowers the first character, then at every lower-to-upper transition
/// interposes a `-` and lowers the upper character.
pub fn camel_to_dashed(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }
    let mut prev_lower = true;
    for c in chars {
        if c.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_numeric();
        }
    }
    out
}

/// `"created-at"` -> `"createdAt"`.
///
/// Splits on `-`, capitalizes every segment past the first, concatenates.
pub fn dashed_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('-').enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            out.push_str(segment);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Matches a wire-form member name against a contract field's in-memory
/// name by transforming the wire form back to camelCase and comparing
/// case-insensitively against the field name.
pub fn matches_field(wire_name: &str, field_name: &str) -> bool {
    dashed_to_camel(wire_name).eq_ignore_ascii_case(field_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_to_dashed_basic() {
        assert_eq!(camel_to_dashed("title"), "title");
        assert_eq!(camel_to_dashed("createdAt"), "created-at");
        assert_eq!(camel_to_dashed("ownerUserId"), "owner-user-id");
    }

    #[test]
    fn dashed_to_camel_basic() {
        assert_eq!(dashed_to_camel("title"), "title");
        assert_eq!(dashed_to_camel("created-at"), "createdAt");
        assert_eq!(dashed_to_camel("owner-user-id"), "ownerUserId");
    }

    #[test]
    fn round_trips() {
        for name in ["title", "createdAt", "ownerUserId", "a", "aB", "aBc"] {
            assert_eq!(dashed_to_camel(&camel_to_dashed(name)), name);
        }
    }

    #[test]
    fn matching_is_case_insensitive_on_camel_form() {
        assert!(matches_field("created-at", "createdAt"));
        assert!(matches_field("CREATED-AT", "createdAt"));
        assert!(!matches_field("created-at", "updatedAt"));
    }
}
