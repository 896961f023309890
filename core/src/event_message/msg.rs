//! `KeriEvent<D>` (§3.2, §4.6): a framed, saidified event wrapping any
//! `Typeable` event payload. Ported from `keriox_core::event_message::msg`,
//! dropping the `sad_macros`/`said` crate dependency — the saidification
//! here goes through this crate's own `sai::saidify` over `serde_json::Value`
//! rather than a derive macro, since CESR/SAID live in this crate, not an
//! external one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::canon::canonicalize;
use crate::error::Error;
use crate::sai::derivation::SelfAddressing;
use crate::sai::said::SelfAddressingIdentifier;
use crate::sai::saidify;

use super::dummy_event::frame_and_said;
use super::serialization_info::SerializationInfo;
use super::{EventTypeTag, Typeable};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct KeriEvent<D> {
    #[serde(rename = "v")]
    pub serialization_info: SerializationInfo,
    #[serde(rename = "d")]
    pub digest: Option<SelfAddressingIdentifier>,
    #[serde(flatten)]
    pub data: D,
}

impl<D> KeriEvent<D>
where
    D: Serialize + Clone + Typeable<TypeTag = EventTypeTag>,
{
    /// Frame and saidify `data`, producing a complete, self-verifying event.
    pub fn new(data: D, derivation: SelfAddressing) -> Result<Self, Error> {
        let tag = data.get_type();
        let (info, said, _framed) = frame_and_said(tag, &data, derivation)?;
        Ok(Self {
            serialization_info: info,
            digest: Some(said),
            data,
        })
    }

    fn as_value(&self) -> Result<Value, Error> {
        let mut map = match serde_json::to_value(&self.data)? {
            Value::Object(m) => m,
            _ => {
                return Err(Error::NonCanonicalJson(
                    "event data must serialize to a JSON object".into(),
                ))
            }
        };
        map.insert("t".to_string(), serde_json::to_value(self.data.get_type())?);
        map.insert(
            "v".to_string(),
            Value::String(self.serialization_info.to_string()),
        );
        let digest = self
            .digest
            .clone()
            .ok_or_else(|| Error::InvariantViolation("event has no digest".into()))?;
        map.insert("d".to_string(), Value::String(digest.to_str()));
        Ok(Value::Object(map))
    }

    /// Emit the canonical, CESR-framed wire bytes (§4.6).
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(canonicalize(&self.as_value()?))
    }

    /// Recompute the digest over the framed form and compare it to the
    /// embedded `d` (§4.4 verification half). A self-addressing `icp`/`dip`
    /// saidifies `i` and `d` together (`frame_and_said_self_addressing` →
    /// `saidify_matching(&["i","d"])`), so `i` must be placeholdered
    /// alongside `d` when recomputing or the digest is taken over the wrong
    /// byte string; any other event only ever placeholders `d`.
    pub fn verify_digest(&self) -> Result<bool, Error> {
        let value = self.as_value()?;
        let digest = self.get_digest()?;
        let self_addressing_prefix = value
            .get("i")
            .and_then(Value::as_str)
            .map(|i| i == digest.to_str())
            .unwrap_or(false);
        if self_addressing_prefix {
            saidify::verify_said_matching(&value, &["i", "d"])
        } else {
            saidify::verify_said(&value, "d")
        }
    }

    pub fn get_digest(&self) -> Result<SelfAddressingIdentifier, Error> {
        self.digest
            .clone()
            .ok_or_else(|| Error::InvariantViolation("event has no digest".into()))
    }
}

impl<D> KeriEvent<D>
where
    D: DeserializeOwned,
{
    /// Parse a CESR-framed event text (`v{...}`) back into a typed event.
    pub fn decode(text: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(text).map_err(Error::from)
    }
}

impl<D> Serialize for KeriEvent<D>
where
    D: Serialize + Clone + Typeable<TypeTag = EventTypeTag>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Framed<D> {
            #[serde(rename = "v")]
            v: SerializationInfo,
            #[serde(rename = "t")]
            t: EventTypeTag,
            #[serde(rename = "d")]
            d: SelfAddressingIdentifier,
            #[serde(flatten)]
            data: D,
        }

        let digest = self.digest.clone().ok_or_else(|| {
            serde::ser::Error::custom("cannot serialize an event with no digest")
        })?;
        Framed {
            v: self.serialization_info,
            t: self.data.get_type(),
            d: digest,
            data: self.data.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct Stub {
        #[serde(rename = "i")]
        prefix: String,
    }

    impl Typeable for Stub {
        type TypeTag = EventTypeTag;
        fn get_type(&self) -> EventTypeTag {
            EventTypeTag::Ixn
        }
    }

    #[test]
    fn new_event_round_trips_and_self_verifies() {
        let stub = Stub {
            prefix: "EAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
        };
        let event = KeriEvent::new(stub, SelfAddressing::Blake3_256).unwrap();
        assert!(event.verify_digest().unwrap());

        let encoded = event.encode().unwrap();
        let decoded: KeriEvent<Stub> = KeriEvent::decode(&encoded).unwrap();
        assert_eq!(decoded, event);
        assert!(decoded.verify_digest().unwrap());
    }
}
