//! The contract/metadata model: a runtime description of a resource type,
//! its fields and relationships, and the accessors used to read and write
//! them on a type-erased instance.
//!
//! ## Representation
//!
//! Deserialization must reconstruct a possibly-cyclic object graph while
//! preserving reference identity (two resources with the same `(type, id)`
//! become the *same* in-memory instance, §8 property 7). Safe Rust's answer
//! to "shared, mutable, possibly-cyclic graph node" is `Rc<RefCell<T>>`, so
//! every contract-managed entity is represented, once erased, as a
//! [`Handle`] — an `Rc<dyn Any>` whose concrete payload is always
//! `RefCell<T>` for the entity's Rust type `T`. Relationship-typed struct
//! fields hold `Rc<RefCell<Target>>` directly (see [`to_handle`]); attribute
//! fields are plain values, read and written through the `RefCell` borrow.
//!
//! Accessors are typed closures keyed by this erased value type, generated
//! by `#[derive(JsonApiResource)]` at macro-expansion time — see
//! `jsonapi-codec-macros`. Nothing here performs runtime reflection;
//! `downcast_ref`/`downcast` inside a generated closure is the only place a
//! concrete type is recovered.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use serde_json::Value;

use crate::errors::CodecResult;

/// A type-erased handle to one contract-managed entity. Always wraps a
/// `RefCell<T>` for some concrete `T`; see the module docs.
pub type Handle = Rc<dyn Any>;

/// Wraps a freshly constructed value as a [`Handle`].
pub fn new_handle<T: Any>(value: T) -> Handle {
    Rc::new(RefCell::new(value))
}

/// Coerces an already-`Rc<RefCell<T>>`-wrapped value (as found in a
/// relationship-typed struct field) into its erased [`Handle`] form.
pub fn to_handle<T: Any>(value: Rc<RefCell<T>>) -> Handle {
    value
}

/// Recovers a concrete `Rc<RefCell<T>>` from a [`Handle`], if it wraps `T`.
pub fn from_handle<T: Any>(handle: Handle) -> Result<Rc<RefCell<T>>, Handle> {
    handle.downcast::<RefCell<T>>()
}

bitflags! {
    /// Per-field capability bits. "Default" is `CAN_SERIALIZE | CAN_DESERIALIZE`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldOptions: u8 {
        const NONE             = 0;
        const ID               = 1 << 0;
        const CAN_SERIALIZE    = 1 << 1;
        const CAN_DESERIALIZE  = 1 << 2;
        const RELATIONSHIP     = 1 << 3;
    }
}

impl FieldOptions {
    pub const DEFAULT: FieldOptions =
        FieldOptions::CAN_SERIALIZE.union(FieldOptions::CAN_DESERIALIZE);
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions::DEFAULT
    }
}

/// Reads a scalar value off a handle via the scalar (serde_json) codec.
pub type Getter = Box<dyn Fn(&Handle) -> CodecResult<Value> + Send + Sync>;
/// Writes a scalar value onto a handle via the scalar (serde_json) codec.
/// Takes `&Handle` (not `&mut`): mutation happens through the wrapped
/// `RefCell`'s interior mutability, so no exclusive borrow of the handle
/// itself is required.
pub type Setter = Box<dyn Fn(&Handle, Value) -> CodecResult<()> + Send + Sync>;
/// Reads the full related object(s) off a handle: 0 or 1 for `BelongsTo`,
/// 0..N for `HasMany`.
pub type RelatedGetter = Box<dyn Fn(&Handle) -> Vec<Handle> + Send + Sync>;
/// Installs resolved related handles onto a handle, downcasting each into
/// the field's concrete `Rc<RefCell<Target>>` type.
pub type RelatedSetter = Box<dyn Fn(&Handle, Vec<Handle>) -> CodecResult<()> + Send + Sync>;

/// A single field of a contract: an attribute, an id, or the scalar
/// foreign-key side of a relationship.
pub struct Field {
    pub name: &'static str,
    pub options: FieldOptions,
    pub get: Option<Getter>,
    pub set: Option<Setter>,
}

impl Field {
    pub fn should_serialize(&self) -> bool {
        self.options.contains(FieldOptions::CAN_SERIALIZE) && self.get.is_some()
    }

    pub fn should_deserialize(&self) -> bool {
        self.options.contains(FieldOptions::CAN_DESERIALIZE) && self.set.is_some()
    }

    pub fn is_id(&self) -> bool {
        self.options.contains(FieldOptions::ID)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .finish()
    }
}

/// The two relationship cardinalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// Zero-or-one related resource.
    BelongsTo,
    /// Zero-or-more related resources.
    HasMany,
}

/// A named relationship to another resource type.
pub struct Relationship {
    pub name: &'static str,
    pub kind: RelationshipKind,
    pub related_type: TypeId,
    pub related_type_name: &'static str,
    pub options: FieldOptions,
    /// Backing struct field name for the navigation accessor, if it also
    /// happens to coincide with an entry in `fields` (normally it does not).
    pub field_name: Option<&'static str>,
    /// Backing struct field name for the foreign key, used both to build a
    /// `via_field`-only linkage and to exclude that field from `attributes`
    /// (attribute/relationship disjointness).
    pub via_field_name: Option<&'static str>,
    pub get_related: Option<RelatedGetter>,
    pub set_related: Option<RelatedSetter>,
    pub get_foreign_key: Option<Getter>,
    pub set_foreign_key: Option<Setter>,
    pub uri_template: Option<&'static str>,
}

impl Relationship {
    pub fn should_serialize(&self) -> bool {
        self.options.contains(FieldOptions::CAN_SERIALIZE)
            && (self.get_related.is_some() || self.get_foreign_key.is_some())
    }

    pub fn should_deserialize(&self) -> bool {
        self.options.contains(FieldOptions::CAN_DESERIALIZE)
            && (self.set_foreign_key.is_some() || self.set_related.is_some())
    }
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("related_type_name", &self.related_type_name)
            .field("field_name", &self.field_name)
            .field("via_field_name", &self.via_field_name)
            .field("uri_template", &self.uri_template)
            .finish()
    }
}

/// The runtime description of one resource type.
pub struct Contract {
    pub name: &'static str,
    /// `TypeId::of::<RefCell<T>>()` for the contract's Rust type `T` — the
    /// type actually observed once a `T` is erased into a [`Handle`].
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub create_instance: fn() -> Handle,
    pub fields: Vec<Field>,
    pub relationships: Vec<Relationship>,
}

impl Contract {
    pub fn id_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_id())
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// True if `field` is the backing foreign key or navigation slot of any
    /// relationship on this contract — used by the attribute-inclusion rule
    /// (§4.2) to keep a field from being emitted both as an attribute and
    /// as relationship data.
    pub fn is_relationship_backed(&self, field_name: &str) -> bool {
        self.relationships
            .iter()
            .any(|r| r.via_field_name == Some(field_name) || r.field_name == Some(field_name))
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.len())
            .field("relationships", &self.relationships.len())
            .finish()
    }
}

/// Implemented by `#[derive(JsonApiResource)]` for every annotated struct.
pub trait JsonApiResource: Any + Default {
    fn contract() -> Contract
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_allow_both_directions() {
        assert!(FieldOptions::DEFAULT.contains(FieldOptions::CAN_SERIALIZE));
        assert!(FieldOptions::DEFAULT.contains(FieldOptions::CAN_DESERIALIZE));
        assert!(!FieldOptions::DEFAULT.contains(FieldOptions::ID));
    }

    #[test]
    fn field_should_serialize_requires_both_flag_and_accessor() {
        let field = Field {
            name: "title",
            options: FieldOptions::CAN_SERIALIZE,
            get: None,
            set: None,
        };
        assert!(!field.should_serialize());
    }

    #[derive(Default)]
    struct Widget {
        label: String,
    }

    #[test]
    fn handle_round_trips_through_erasure() {
        let handle = new_handle(Widget { label: "a".into() });
        let widget_cell = handle.downcast_ref::<RefCell<Widget>>().unwrap();
        assert_eq!(widget_cell.borrow().label, "a");
    }
}
