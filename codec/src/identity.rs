//! Resource-identity key: the `(type, id)` pair used to deduplicate resource
//! objects across `data` and `included`, and to key the deserializer's
//! materialization cache.

use serde_json::Value;

/// Identity of a resource object, derived from its `type` and `id` members.
///
/// Two resource objects are identity-equal iff both strings exist and
/// match; a resource with no `id` member has no identity (value types are
/// never deduplicated or cached by identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentity {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Extracts the identity from a resource JSON object (an object with
    /// `type` and, optionally, `id` string members). Returns `None` if
    /// either member is missing or not a string.
    pub fn from_resource_object(object: &Value) -> Option<Self> {
        let resource_type = object.get("type")?.as_str()?;
        let id = scalar_to_id_string(object.get("id")?)?;
        Some(Self::new(resource_type, id))
    }
}

/// Converts a scalar JSON value used as an id into its canonical string
/// representation. Strings pass through unchanged; numbers and bools use
/// their JSON textual form, matching how they would have been written as a
/// resource's `id` member.
pub fn scalar_to_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_identity_from_resource_object() {
        let obj = json!({"type": "posts", "id": "7", "attributes": {}});
        let identity = ResourceIdentity::from_resource_object(&obj).unwrap();
        assert_eq!(identity, ResourceIdentity::new("posts", "7"));
    }

    #[test]
    fn numeric_id_is_stringified() {
        let obj = json!({"type": "posts", "id": 7});
        let identity = ResourceIdentity::from_resource_object(&obj).unwrap();
        assert_eq!(identity.id, "7");
    }

    #[test]
    fn missing_id_has_no_identity() {
        let obj = json!({"type": "posts"});
        assert!(ResourceIdentity::from_resource_object(&obj).is_none());
    }

    #[test]
    fn equal_pairs_are_identity_equal() {
        let a = ResourceIdentity::new("posts", "7");
        let b = ResourceIdentity::new("posts", "7");
        let c = ResourceIdentity::new("posts", "8");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
