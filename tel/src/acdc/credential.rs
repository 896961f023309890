//! `Acdc` (§3.4, §4.9): builder and verifier for authentic chained data
//! containers. The top-level frame (`v`/`d`) and the nested attribute block
//! (its own `d`) are both saidified the same two-pass way a KEL/TEL event is
//! framed (§4.6) — `keri_core::event_message::dummy_event::frame_and_said`
//! isn't reusable as-is because it always inserts a `t` discriminant, and an
//! ACDC has none, so this module re-runs the same placeholder-then-size-
//! then-digest sequence directly over `serde_json::Value`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use keri_core::canon::canonicalize;
use keri_core::database::{keys, EventLog};
use keri_core::event_message::serialization_info::SerializationInfo;
use keri_core::prefix::IdentifierPrefix;
use keri_core::sai::derivation::SelfAddressing;
use keri_core::sai::said::SelfAddressingIdentifier;
use keri_core::sai::saidify;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::processor::TelProcessor;
use crate::state::CredentialState;

use super::schema::SchemaRegistry;

/// One entry of an ACDC's edge block (§3.4): `n` names the target
/// credential's own SAID; an optional `s` pins the schema the target must
/// match.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EdgeNode {
    #[serde(rename = "n")]
    pub node: IdentifierPrefix,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<IdentifierPrefix>,
}

impl EdgeNode {
    pub fn new(node: IdentifierPrefix, schema: Option<IdentifierPrefix>) -> Self {
        Self { node, schema }
    }
}

/// A saidified ACDC (§3.4). `attributes`/`edges`/`rules` stay as
/// `serde_json::Value` rather than a fixed struct because their shape is
/// schema-defined, not fixed by this crate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Acdc {
    #[serde(rename = "v")]
    pub serialization_info: SerializationInfo,
    #[serde(rename = "d")]
    pub digest: SelfAddressingIdentifier,
    #[serde(rename = "i")]
    pub issuer: IdentifierPrefix,
    #[serde(rename = "ri")]
    pub registry_id: IdentifierPrefix,
    #[serde(rename = "s")]
    pub schema: IdentifierPrefix,
    #[serde(rename = "a")]
    pub attributes: Value,
    #[serde(rename = "e", skip_serializing_if = "Option::is_none", default)]
    pub edges: Option<Value>,
    #[serde(rename = "r", skip_serializing_if = "Option::is_none", default)]
    pub rules: Option<Value>,
}

impl Acdc {
    /// The ACDC's own SAID, keyed as `acdc/{said}` in the storage contract
    /// (§6.3).
    pub fn said(&self) -> &SelfAddressingIdentifier {
        &self.digest
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(canonicalize(&serde_json::to_value(self).map_err(keri_core::error::Error::from)?))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes).map_err(keri_core::error::Error::from)?)
    }

    /// Named edges of this ACDC's edge block, skipping the block's own `d`.
    pub fn edge_targets(&self) -> Result<Vec<EdgeNode>, Error> {
        let Some(edges) = &self.edges else {
            return Ok(vec![]);
        };
        let map = edges
            .as_object()
            .ok_or_else(|| keri_core::error::Error::NonCanonicalJson("edge block must be a JSON object".into()))?;
        map.iter()
            .filter(|(k, _)| k.as_str() != "d")
            .map(|(_, v)| serde_json::from_value::<EdgeNode>(v.clone()).map_err(|e| keri_core::error::Error::from(e).into()))
            .collect()
    }
}

fn saidify_block(mut map: Map<String, Value>, derivation: SelfAddressing) -> Result<(SelfAddressingIdentifier, Value), Error> {
    map.insert("d".to_string(), Value::String(saidify::placeholder(derivation)));
    Ok(saidify::saidify(&Value::Object(map), "d", derivation)?)
}

/// Build a complete, self-verifying ACDC (§4.9 "Build"): saidify the
/// attribute block's `d`, then the top-level `d`, in that order — the
/// top-level digest covers the already-saidified attribute block, so it
/// must be computed second.
#[allow(clippy::too_many_arguments)]
pub fn build(
    issuer: IdentifierPrefix,
    registry_id: IdentifierPrefix,
    schema: IdentifierPrefix,
    attributes: Map<String, Value>,
    edges: Option<BTreeMap<String, EdgeNode>>,
    rules: Option<Value>,
    derivation: SelfAddressing,
) -> Result<Acdc, Error> {
    let (_, attr_block) = saidify_block(attributes, derivation)?;

    let edge_block = edges
        .map(|entries| -> Result<Value, Error> {
            let mut map = Map::new();
            for (name, node) in entries {
                map.insert(name, serde_json::to_value(&node).map_err(keri_core::error::Error::from)?);
            }
            let (_, block) = saidify_block(map, derivation)?;
            Ok(block)
        })
        .transpose()?;

    let mut top = Map::new();
    top.insert("v".to_string(), Value::String(SerializationInfo::new_empty().to_string()));
    top.insert("d".to_string(), Value::String(saidify::placeholder(derivation)));
    top.insert("i".to_string(), Value::String(issuer.to_str()));
    top.insert("ri".to_string(), Value::String(registry_id.to_str()));
    top.insert("s".to_string(), Value::String(schema.to_str()));
    top.insert("a".to_string(), attr_block);
    if let Some(block) = &edge_block {
        top.insert("e".to_string(), block.clone());
    }
    if let Some(r) = &rules {
        top.insert("r".to_string(), r.clone());
    }

    let sized_pass = canonicalize(&Value::Object(top.clone()));
    let info = SerializationInfo::new(sized_pass.len());
    top.insert("v".to_string(), Value::String(info.to_string()));

    let (_, framed) = saidify::saidify(&Value::Object(top), "d", derivation)?;
    Ok(serde_json::from_value(framed).map_err(keri_core::error::Error::from)?)
}

/// Verify an ACDC's own SAIDs and its attribute data against its schema
/// (§4.9 "Verify": "recompute both SAIDs, resolve `s` against a known
/// schema registry, validate data against schema"). Edge resolution is a
/// separate step ([`verify_edges`]) since it needs TEL access this function
/// doesn't take.
pub fn verify(acdc: &Acdc, schemas: &dyn SchemaRegistry) -> Result<(), Error> {
    let attr_ok = saidify::verify_said(&acdc.attributes, "d")?;
    if !attr_ok {
        return Err(keri_core::error::Error::DigestMismatch.into());
    }
    if let Some(edges) = &acdc.edges {
        if !saidify::verify_said(edges, "d")? {
            return Err(keri_core::error::Error::DigestMismatch.into());
        }
    }

    let whole = serde_json::to_value(acdc).map_err(keri_core::error::Error::from)?;
    if !saidify::verify_said(&whole, "d")? {
        return Err(keri_core::error::Error::DigestMismatch.into());
    }

    let schema = schemas
        .get(&acdc.schema.to_str())?
        .ok_or_else(|| keri_core::error::Error::SchemaResolutionFailed(acdc.schema.to_str()))?;
    validate_against_schema(&acdc.attributes, &schema)?;
    Ok(())
}

fn validate_against_schema(instance: &Value, schema: &Value) -> Result<(), Error> {
    let compiled = jsonschema::JSONSchema::compile(schema)
        .map_err(|e| keri_core::error::Error::SchemaResolutionFailed(e.to_string()))?;
    compiled.validate(instance).map_err(|errors| {
        let joined = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        keri_core::error::Error::SchemaValidationFailed(joined)
    })?;
    Ok(())
}

/// Default recursion bound for [`verify_edges`] (§9: "Implement edge
/// traversal with a visited-set guard and a depth cap").
pub const DEFAULT_MAX_EDGE_DEPTH: usize = 8;

/// Walk an ACDC's edge block, checking that each target resolves (exists
/// and is `issued`, not merely present) via its own registry's TEL (§4.9:
/// "check each edge's target ACDC resolves via its registry TEL"). Cycles
/// are tolerated — a back-reference carries no state-machine meaning
/// (§9) — but never re-descended into, and depth is capped regardless of
/// cycles so a very long (if acyclic) chain can't be used to force
/// unbounded work.
pub fn verify_edges(acdc: &Acdc, store: &AcdcStore, tel: &TelProcessor, max_depth: usize) -> Result<(), Error> {
    let mut visited = HashSet::new();
    verify_edges_rec(acdc, store, tel, max_depth, &mut visited)
}

fn verify_edges_rec(acdc: &Acdc, store: &AcdcStore, tel: &TelProcessor, depth_remaining: usize, visited: &mut HashSet<String>) -> Result<(), Error> {
    visited.insert(acdc.said().to_str());
    if depth_remaining == 0 {
        return Ok(());
    }
    for edge in acdc.edge_targets()? {
        let target_said = edge.node.to_str();
        if visited.contains(&target_said) {
            continue;
        }
        match tel.get_credential_state(&edge.node)? {
            CredentialState::Issued(_) => {}
            _ => return Err(keri_core::error::Error::EdgeTargetMissing(target_said).into()),
        }
        if let Some(schema) = &edge.schema {
            let target = store
                .get(&edge.node)?
                .ok_or_else(|| keri_core::error::Error::EdgeTargetMissing(target_said.clone()))?;
            if &target.schema != schema {
                return Err(keri_core::error::Error::SchemaValidationFailed(format!(
                    "edge target {target_said} does not match pinned schema {schema}"
                ))
                .into());
            }
            verify_edges_rec(&target, store, tel, depth_remaining - 1, visited)?;
        }
    }
    Ok(())
}

/// `acdc/{SAID}` storage (§6.3).
pub struct AcdcStore {
    db: Arc<dyn EventLog + Send + Sync>,
}

impl AcdcStore {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self { db }
    }

    pub fn put(&self, acdc: &Acdc) -> Result<(), Error> {
        self.db.put(&keys::acdc(&acdc.said().to_str()), &acdc.encode()?)?;
        Ok(())
    }

    pub fn get(&self, said: &IdentifierPrefix) -> Result<Option<Acdc>, Error> {
        match self.db.get(&keys::acdc(&said.to_str()))? {
            None => Ok(None),
            Some(bytes) => Ok(Some(Acdc::decode(&bytes)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acdc::schema::InMemorySchemaRegistry;
    use crate::event::credential::{CredentialEventData, CredentialIssuance};
    use crate::event::registry::{RegistryEventData, RegistryInception};
    use crate::event::{credential::CredentialEvent, registry::RegistryEvent};
    use keri_core::database::memory::MemoryLog;
    use keri_core::event::event_data::{EventData, InceptionEvent, InteractionEvent};
    use keri_core::event::sections::key_config::nxt_commitment;
    use keri_core::event::sections::seal::EventSeal;
    use keri_core::event::sections::KeyConfig;
    use keri_core::event::KeyEvent;
    use keri_core::event_message::msg::KeriEvent as Wrapped;
    use keri_core::event_message::signed_event_message::SignedEventMessage;
    use keri_core::keys::PublicKey;
    use keri_core::prefix::BasicPrefix;
    use keri_core::processor::event_storage::EventStorage as KelStorage;
    use keri_core::threshold::SignatureThreshold;
    use serde_json::json;

    fn issuer_aid() -> IdentifierPrefix {
        IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"acdc issuer"))
    }

    fn registry_id() -> IdentifierPrefix {
        IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"acdc registry"))
    }

    fn schema_with_name_field(registry: &InMemorySchemaRegistry) -> IdentifierPrefix {
        let schema = json!({
            "type": "object",
            "properties": {"d": {"type": "string"}, "name": {"type": "string"}},
            "required": ["name"],
        });
        registry.insert_schema(schema, SelfAddressing::Blake3_256).unwrap().parse().unwrap()
    }

    #[test]
    fn build_then_verify_round_trips() {
        let registry = InMemorySchemaRegistry::new();
        let schema = schema_with_name_field(&registry);

        let mut attrs = Map::new();
        attrs.insert("name".to_string(), json!("Charlie"));

        let acdc = build(issuer_aid(), registry_id(), schema, attrs, None, None, SelfAddressing::Blake3_256).unwrap();
        verify(&acdc, &registry).unwrap();
    }

    #[test]
    fn tampering_with_attributes_breaks_verification() {
        let registry = InMemorySchemaRegistry::new();
        let schema = schema_with_name_field(&registry);
        let mut attrs = Map::new();
        attrs.insert("name".to_string(), json!("Charlie"));
        let mut acdc = build(issuer_aid(), registry_id(), schema, attrs, None, None, SelfAddressing::Blake3_256).unwrap();

        acdc.attributes["name"] = json!("Mallory");
        let err = verify(&acdc, &registry).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::DigestMismatch)));
    }

    #[test]
    fn attributes_not_matching_schema_are_rejected() {
        let registry = InMemorySchemaRegistry::new();
        let schema = schema_with_name_field(&registry);
        // Missing the required "name" property.
        let attrs = Map::new();
        let acdc = build(issuer_aid(), registry_id(), schema, attrs, None, None, SelfAddressing::Blake3_256).unwrap();
        let err = verify(&acdc, &registry).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::SchemaValidationFailed(_))));
    }

    fn issue_credential(db: Arc<MemoryLog>, kel: &KelStorage, tel: &TelProcessor, credential_id: &IdentifierPrefix, registry: &IdentifierPrefix, issuer: &IdentifierPrefix) {
        let iss = CredentialEvent::new(
            credential_id.clone(),
            0,
            CredentialEventData::Iss(CredentialIssuance { registry_id: registry.clone() }),
        );
        let iss_wrapped = Wrapped::new(iss, SelfAddressing::Blake3_256).unwrap();
        tel.process_credential_event(iss_wrapped).unwrap();
        let _ = (db, kel, issuer);
    }

    /// An ACDC edge that names a credential the registry TEL has actually
    /// issued resolves; one naming an unissued credential does not (§4.9).
    #[test]
    fn edge_resolves_only_once_target_is_issued() {
        let db = Arc::new(MemoryLog::new());
        let kel_storage = KelStorage::new(db.clone());

        let key = BasicPrefix::Ed25519NT(PublicKey::new(vec![7; 32]));
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key.clone()], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key.clone()], next, Some(SignatureThreshold::simple(1)));
        let icp = InceptionEvent::new(key_config, None, None);
        let key_event = KeyEvent::new(IdentifierPrefix::Basic(key), 0, EventData::Icp(icp));
        let icp_wrapped = Wrapped::new(key_event, SelfAddressing::Blake3_256).unwrap();
        let issuer = icp_wrapped.data.prefix.clone();
        kel_storage.add_kel_finalized_event(&SignedEventMessage::new(icp_wrapped.clone(), vec![], None)).unwrap();

        let registry = registry_id();
        let vcp = RegistryInception::new(issuer.clone(), 1, vec![]);
        let registry_event = RegistryEvent::new(registry.clone(), 0, RegistryEventData::Vcp(vcp));
        let registry_wrapped = Wrapped::new(registry_event, SelfAddressing::Blake3_256).unwrap();

        let ixn = InteractionEvent::new(
            icp_wrapped.get_digest().unwrap(),
            vec![EventSeal::new(registry.clone(), 0, registry_wrapped.get_digest().unwrap())],
        );
        let ixn_event = KeyEvent::new(issuer.clone(), 1, EventData::Ixn(ixn));
        let ixn_wrapped = Wrapped::new(ixn_event, SelfAddressing::Blake3_256).unwrap();
        kel_storage.add_kel_finalized_event(&SignedEventMessage::new(ixn_wrapped, vec![], None)).unwrap();

        let tel = TelProcessor::new(db.clone());
        tel.process_registry_event(registry_wrapped, &kel_storage).unwrap();

        let registry_reg = InMemorySchemaRegistry::new();
        let schema = schema_with_name_field(&registry_reg);
        let mut attrs = Map::new();
        attrs.insert("name".to_string(), json!("base credential"));
        let target_acdc = build(issuer.clone(), registry.clone(), schema.clone(), attrs, None, None, SelfAddressing::Blake3_256).unwrap();
        let target_said = IdentifierPrefix::SelfAddressing(target_acdc.said().clone());

        let store = AcdcStore::new(db.clone());
        store.put(&target_acdc).unwrap();

        let mut chained_attrs = Map::new();
        chained_attrs.insert("name".to_string(), json!("chained credential"));
        let mut edges = BTreeMap::new();
        edges.insert("source".to_string(), EdgeNode::new(target_said.clone(), Some(schema.clone())));
        let chained = build(issuer.clone(), registry.clone(), schema, chained_attrs, Some(edges), None, SelfAddressing::Blake3_256).unwrap();

        // Edge target not issued yet: resolution fails.
        let err = verify_edges(&chained, &store, &tel, DEFAULT_MAX_EDGE_DEPTH).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::EdgeTargetMissing(_))));

        issue_credential(db.clone(), &kel_storage, &tel, &target_said, &registry, &issuer);
        verify_edges(&chained, &store, &tel, DEFAULT_MAX_EDGE_DEPTH).unwrap();
    }
}
