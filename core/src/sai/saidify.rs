//! SAIDifier (§4.4): placeholder-based self-addressing digest insertion.
//! Generalizes `keriox_core::sai::sad::SAD` (a trait with a type-specific
//! `dummy_sad`) into free functions over `serde_json::Value`, since SAIDs in
//! this crate are computed both over typed event structs (via `serde_json`
//! round-tripping) and over untyped ACDC/schema documents.

use serde_json::Value;

use crate::canon::canonicalize;
use crate::error::Error;

use super::derivation::SelfAddressing;
use super::said::SelfAddressingIdentifier;

/// Build the `#`-filled placeholder of exactly the CESR-text length of
/// `derivation`'s digest code (44 characters for Blake3-256). The placeholder
/// length MUST equal the encoded-digest length or the digest of the object
/// with the embedded SAID will not match (§4.4).
pub fn placeholder(derivation: SelfAddressing) -> String {
    "#".repeat(SelfAddressingIdentifier::text_len(derivation))
}

/// `saidify(obj, field) -> (said, obj')`: set `obj[field]` to the placeholder,
/// canonicalize, digest, then return the SAID plus a copy of `obj` with the
/// real SAID spliced in.
pub fn saidify(obj: &Value, field: &str, derivation: SelfAddressing) -> Result<(SelfAddressingIdentifier, Value), Error> {
    let mut work = obj
        .as_object()
        .ok_or_else(|| Error::NonCanonicalJson("saidify target must be a JSON object".into()))?
        .clone();
    work.insert(field.to_string(), Value::String(placeholder(derivation)));
    let dummy = Value::Object(work);
    let bytes = canonicalize(&dummy);
    let said = SelfAddressingIdentifier::derive(derivation, &bytes);

    let mut out = obj
        .as_object()
        .expect("checked above")
        .clone();
    out.insert(field.to_string(), Value::String(said.to_str()));
    Ok((said, Value::Object(out)))
}

/// `saidify_matching(obj, fields, derivation) -> (said, obj')`: like
/// [`saidify`], but sets every field in `fields` to the *same* computed
/// SAID. Used for self-addressing AID derivation (§4.7): an `icp`/`dip`
/// event's `i` (the AID) and `d` (the event SAID) are both the event's own
/// digest, so both placeholders must be filled and both outputs spliced
/// together in one pass.
pub fn saidify_matching(
    obj: &Value,
    fields: &[&str],
    derivation: SelfAddressing,
) -> Result<(SelfAddressingIdentifier, Value), Error> {
    let mut work = obj
        .as_object()
        .ok_or_else(|| Error::NonCanonicalJson("saidify target must be a JSON object".into()))?
        .clone();
    let ph = placeholder(derivation);
    for field in fields {
        work.insert(field.to_string(), Value::String(ph.clone()));
    }
    let bytes = canonicalize(&Value::Object(work));
    let said = SelfAddressingIdentifier::derive(derivation, &bytes);

    let mut out = obj
        .as_object()
        .expect("checked above")
        .clone();
    for field in fields {
        out.insert(field.to_string(), Value::String(said.to_str()));
    }
    Ok((said, Value::Object(out)))
}

/// `verify_said(obj, field)`: recompute the digest with the placeholder
/// substituted back in and compare against the embedded value.
pub fn verify_said(obj: &Value, field: &str) -> Result<bool, Error> {
    let map = obj
        .as_object()
        .ok_or_else(|| Error::NonCanonicalJson("verify_said target must be a JSON object".into()))?;
    let embedded = map
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::NonCanonicalJson(format!("missing field {field}")))?;
    let said: SelfAddressingIdentifier = embedded.parse()?;

    let mut work = map.clone();
    work.insert(field.to_string(), Value::String(placeholder(said.derivation)));
    let bytes = canonicalize(&Value::Object(work));
    Ok(said.verify_binding(&bytes))
}

/// `verify_said_matching(obj, fields)`: like [`verify_said`] for the
/// multi-field self-addressing case — every listed field must carry the
/// same embedded SAID, and recomputing with all of them replaced by the
/// placeholder must reproduce it.
pub fn verify_said_matching(obj: &Value, fields: &[&str]) -> Result<bool, Error> {
    let map = obj
        .as_object()
        .ok_or_else(|| Error::NonCanonicalJson("verify_said target must be a JSON object".into()))?;
    let mut embedded: Option<SelfAddressingIdentifier> = None;
    for field in fields {
        let value = map
            .get(*field)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::NonCanonicalJson(format!("missing field {field}")))?;
        let said: SelfAddressingIdentifier = value.parse()?;
        match &embedded {
            None => embedded = Some(said),
            Some(prior) if *prior != said => return Ok(false),
            Some(_) => {}
        }
    }
    let said = embedded.ok_or_else(|| Error::NonCanonicalJson("no fields given".into()))?;

    let mut work = map.clone();
    let ph = placeholder(said.derivation);
    for field in fields {
        work.insert(field.to_string(), Value::String(ph.clone()));
    }
    let bytes = canonicalize(&Value::Object(work));
    Ok(said.verify_binding(&bytes))
}
