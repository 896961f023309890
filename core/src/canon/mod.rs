//! Deterministic JSON canonicalization shared by SAID computation (§4.4) and
//! the framed event serializer (§4.6). Both call sites MUST produce
//! byte-identical output for the same logical document or verification
//! silently diverges across implementations (§9) — so this is the single
//! place either one is allowed to turn a `serde_json::Value` into bytes.

use serde_json::Value;

/// Recursively sort object keys by codepoint, preserve array order, and
/// serialize with `serde_json`'s compact (no insignificant whitespace)
/// writer. `serde_json::Map` is already a `BTreeMap` under the
/// `preserve_order` feature being off, so a plain `to_string` on a
/// re-built, explicitly-sorted value is sufficient and avoids depending on
/// crate feature flags elsewhere in the workspace to get this right.
pub fn canonicalize(value: &Value) -> Vec<u8> {
    let sorted = sort_keys(value);
    serde_json::to_vec(&sorted).expect("canonical value is always serializable")
}

pub fn canonicalize_string(value: &Value) -> String {
    String::from_utf8(canonicalize(value)).expect("canonical JSON is valid UTF-8")
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for k in keys {
                sorted.insert(k.clone(), sort_keys(&map[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
