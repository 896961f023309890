//! Builds the zero-sized placeholder frame used to compute an event's own
//! `v` size and `d` digest before either is known (§4.6). Ported from
//! `keriox_core::event_message::dummy_event::DummyEvent`, generalized from a
//! typed struct wrapper into a `serde_json::Value` transform so it can be
//! reused by every event ilk (icp/rot/ixn/dip/drt/vcp/iss/rev/rct) without a
//! dedicated dummy type per variant.

use serde::Serialize;
use serde_hex::{Compact, SerHex};
use serde_json::Value;

use crate::canon::canonicalize;
use crate::error::Error;
use crate::event::event_data::EventData;
use crate::event::KeyEvent;
use crate::prefix::IdentifierPrefix;
use crate::sai::derivation::SelfAddressing;
use crate::sai::said::SelfAddressingIdentifier;
use crate::sai::saidify;

use super::serialization_info::SerializationInfo;
use super::{EventTypeTag, Typeable};

/// Two-pass framing: (i) serialize with a zero-sized `v` and placeholder
/// `d`, measure the byte length; (ii) overwrite `v` with the real size,
/// then digest over that framed form with `d` still the placeholder
/// (§4.6). Returns the final version info, computed SAID, and the fully
/// saidified JSON object ready to emit.
pub fn frame_and_said<D>(
    event_type: EventTypeTag,
    data: &D,
    derivation: SelfAddressing,
) -> Result<(SerializationInfo, SelfAddressingIdentifier, Value), Error>
where
    D: Serialize,
{
    let mut map = match serde_json::to_value(data)? {
        Value::Object(m) => m,
        _ => {
            return Err(Error::NonCanonicalJson(
                "event data must serialize to a JSON object".into(),
            ))
        }
    };
    map.insert("t".to_string(), serde_json::to_value(event_type)?);
    map.insert(
        "v".to_string(),
        Value::String(SerializationInfo::new_empty().to_string()),
    );
    map.insert(
        "d".to_string(),
        Value::String(saidify::placeholder(derivation)),
    );

    let sized_pass = canonicalize(&Value::Object(map.clone()));
    let info = SerializationInfo::new(sized_pass.len());
    map.insert("v".to_string(), Value::String(info.to_string()));

    let (said, framed) = saidify::saidify(&Value::Object(map), "d", derivation)?;
    Ok((info, said, framed))
}

/// Like [`frame_and_said`], but for the self-addressing inception case
/// (§4.7): `i` is placeholdered alongside `d` and both are filled with the
/// same digest, since the AID itself is the event's own SAID.
pub fn frame_and_said_self_addressing(
    event_type: EventTypeTag,
    sn: u64,
    event_data: &EventData,
    derivation: SelfAddressing,
) -> Result<(SerializationInfo, SelfAddressingIdentifier, Value), Error> {
    #[derive(Serialize)]
    struct Frame<'a> {
        #[serde(rename = "i")]
        prefix_placeholder: String,
        #[serde(rename = "s", with = "SerHex::<Compact>")]
        sn: u64,
        #[serde(flatten)]
        event_data: &'a EventData,
    }

    let frame = Frame {
        prefix_placeholder: saidify::placeholder(derivation),
        sn,
        event_data,
    };
    let mut map = match serde_json::to_value(&frame)? {
        Value::Object(m) => m,
        _ => {
            return Err(Error::NonCanonicalJson(
                "event data must serialize to a JSON object".into(),
            ))
        }
    };
    map.insert("t".to_string(), serde_json::to_value(event_type)?);
    map.insert(
        "v".to_string(),
        Value::String(SerializationInfo::new_empty().to_string()),
    );
    map.insert(
        "d".to_string(),
        Value::String(saidify::placeholder(derivation)),
    );

    let sized_pass = canonicalize(&Value::Object(map.clone()));
    let info = SerializationInfo::new(sized_pass.len());
    map.insert("v".to_string(), Value::String(info.to_string()));

    let (said, framed) = saidify::saidify_matching(&Value::Object(map), &["i", "d"], derivation)?;
    Ok((info, said, framed))
}
