//! Schema registry (§4.9 SUPPLEMENT): resolves a schema SAID to the
//! JSON-Schema document it names. Schemas are themselves saidified
//! documents, keyed on `$id` rather than `d` (§4.9: "Schemas are JSON-Schema
//! documents themselves saidified on their `$id`"), so this is a distinct
//! trait from the `AcdcStore` keyed on `d` even though both are just
//! `said -> json` maps — grounded on the same shape as the storage contract
//! in spec.md §6.3 (`get`/`put` over an opaque key).

use std::collections::HashMap;
use std::sync::RwLock;

use keri_core::sai::derivation::SelfAddressing;
use keri_core::sai::saidify;
use serde_json::Value;

use crate::error::Error;

/// `get(said) -> schema json?` (§4.9).
pub trait SchemaRegistry {
    fn get(&self, schema_said: &str) -> Result<Option<Value>, Error>;
}

/// In-memory reference implementation (§1 AMBIENT: every contract ships at
/// least one concrete implementation for this crate's own tests to run
/// against).
#[derive(Default)]
pub struct InMemorySchemaRegistry {
    schemas: RwLock<HashMap<String, Value>>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saidify `schema` on `$id` and store it under the resulting SAID,
    /// returning the SAID so callers can reference it from an ACDC's `s`.
    pub fn insert_schema(&self, schema: Value, derivation: SelfAddressing) -> Result<String, Error> {
        let (said, saidified) = saidify::saidify(&schema, "$id", derivation)?;
        self.schemas
            .write()
            .map_err(|_| Error::Core(keri_core::error::Error::InvariantViolation("schema registry lock poisoned".into())))?
            .insert(said.to_str(), saidified);
        Ok(said.to_str())
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn get(&self, schema_said: &str) -> Result<Option<Value>, Error> {
        Ok(self
            .schemas
            .read()
            .map_err(|_| Error::Core(keri_core::error::Error::InvariantViolation("schema registry lock poisoned".into())))?
            .get(schema_said)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inserted_schema_resolves_by_its_own_said() {
        let registry = InMemorySchemaRegistry::new();
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        let said = registry.insert_schema(schema, SelfAddressing::Blake3_256).unwrap();

        let resolved = registry.get(&said).unwrap().unwrap();
        assert_eq!(resolved["$id"], said);
        assert_eq!(resolved["type"], "object");
    }

    #[test]
    fn unknown_said_resolves_to_none() {
        let registry = InMemorySchemaRegistry::new();
        assert!(registry.get("EUnknown").unwrap().is_none());
    }
}
