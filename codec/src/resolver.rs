//! Bidirectional mapping between the nominal wire type tag (e.g. `"posts"`)
//! and the runtime type handle of domain entities (e.g. `Post`).

use std::any::TypeId;
use std::collections::HashMap;

use crate::contract::{Contract, JsonApiResource};
use crate::errors::{CodecError, CodecResult};

/// A read-only (after construction), shareable table of contracts.
///
/// Built once — by hand via [`ContractResolver::register`] or via the
/// `jsonapi_resolver!` macro — and then passed by reference to a
/// [`crate::serializer::Serializer`] or [`crate::deserializer::Deserializer`]
/// per document.
#[derive(Default)]
pub struct ContractResolver {
    by_type: HashMap<TypeId, Contract>,
    by_wire_name: HashMap<&'static str, TypeId>,
}

impl ContractResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`'s contract. Panics if `T` (by `TypeId`) or its wire
    /// name is already registered — a resolver is assembled once at startup,
    /// so a duplicate registration is a programming error, not a runtime
    /// condition callers should handle.
    pub fn register<T: JsonApiResource>(mut self) -> Self {
        let contract = T::contract();
        let type_id = contract.type_id;
        assert!(
            !self.by_type.contains_key(&type_id),
            "contract for type already registered"
        );
        assert!(
            !self.by_wire_name.contains_key(contract.name),
            "contract with wire name `{}` already registered",
            contract.name
        );
        tracing::debug!(
            wire_name = contract.name,
            fields = contract.fields.len(),
            relationships = contract.relationships.len(),
            "registered contract"
        );
        self.by_wire_name.insert(contract.name, type_id);
        self.by_type.insert(type_id, contract);
        self
    }

    pub fn try_resolve_type(&self, type_id: TypeId) -> Option<&Contract> {
        self.by_type.get(&type_id)
    }

    pub fn try_resolve_wire_name(&self, wire_name: &str) -> Option<&Contract> {
        let type_id = self.by_wire_name.get(wire_name)?;
        self.by_type.get(type_id)
    }

    pub fn resolve_type(&self, type_id: TypeId) -> CodecResult<&Contract> {
        self.try_resolve_type(type_id)
            .ok_or_else(|| CodecError::UnknownRuntimeType(format!("{type_id:?}")))
    }

    pub fn resolve_wire_name(&self, wire_name: &str) -> CodecResult<&Contract> {
        self.try_resolve_wire_name(wire_name)
            .ok_or_else(|| CodecError::UnknownWireType(wire_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Contract, Field, FieldOptions, new_handle};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Dummy {
        id: String,
    }

    impl JsonApiResource for Dummy {
        fn contract() -> Contract {
            Contract {
                name: "dummies",
                type_id: TypeId::of::<RefCell<Dummy>>(),
                type_name: std::any::type_name::<Dummy>(),
                create_instance: || new_handle(Dummy::default()),
                fields: vec![Field {
                    name: "id",
                    options: FieldOptions::ID | FieldOptions::CAN_SERIALIZE | FieldOptions::CAN_DESERIALIZE,
                    get: Some(Box::new(|inst: &crate::contract::Handle| {
                        let cell = inst.downcast_ref::<RefCell<Dummy>>().unwrap();
                        Ok(serde_json::Value::String(cell.borrow().id.clone()))
                    })),
                    set: None,
                }],
                relationships: vec![],
            }
        }
    }

    #[test]
    fn resolves_by_type_and_wire_name() {
        let resolver = ContractResolver::new().register::<Dummy>();
        assert!(resolver.try_resolve_type(TypeId::of::<RefCell<Dummy>>()).is_some());
        assert!(resolver.try_resolve_wire_name("dummies").is_some());
        assert!(resolver.try_resolve_wire_name("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_registration_panics() {
        let _ = ContractResolver::new().register::<Dummy>().register::<Dummy>();
    }
}
