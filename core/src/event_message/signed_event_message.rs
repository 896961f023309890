//! `SignedEventMessage`/`SignedNontransferableReceipt`/`Message` (§6.1): a
//! framed event plus its attachment groups. Ported in spirit from
//! `keriox_core::event_message::signed_event_message`, narrowed to the one
//! receipt dialect this crate pins (§9 "receipt semantics": a separate `rct`
//! event keyed by the receipted SAID, carrying witness couplets — not an
//! attachment group spliced onto the receipted event).

use crate::codex::CounterCode;
use crate::error::Error;
use crate::event::event_data::EventData;
use crate::event::receipt::Receipt;
use crate::event::sections::SourceSeal;
use crate::event::KeyEvent;
use crate::event_message::msg::KeriEvent;
use crate::prefix::IndexedSignature;
use crate::sai::said::SelfAddressingIdentifier;

use super::signature::{decode_group, encode_group};

/// A `dip`/`drt` event plus its fully satisfied signature set and,
/// optionally, the seal source couple proving delegator anchoring (§4.12).
#[derive(Debug, Clone, PartialEq)]
pub struct SignedEventMessage {
    pub event_message: KeriEvent<KeyEvent>,
    pub signatures: Vec<IndexedSignature>,
    pub delegator_seal: Option<SourceSeal>,
}

impl SignedEventMessage {
    pub fn new(
        event_message: KeriEvent<KeyEvent>,
        signatures: Vec<IndexedSignature>,
        delegator_seal: Option<SourceSeal>,
    ) -> Self {
        Self {
            event_message,
            signatures,
            delegator_seal,
        }
    }

    pub fn event_type(&self) -> crate::event_message::EventTypeTag {
        self.event_message.data.event_data.get_type()
    }

    /// `(event_text, (idx, sig)+)` on the wire (§6.1, §4.11).
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut out = self.event_message.encode()?;
        out.extend(encode_group(CounterCode::ControllerIdxSigs, &self.signatures)?.into_bytes());
        if let Some(seal) = &self.delegator_seal {
            out.extend(encode_seal_source(seal).into_bytes());
        }
        Ok(out)
    }
}

fn encode_seal_source(seal: &SourceSeal) -> String {
    format!("-C01{:024x}{}", seal.sn, seal.digest.to_str())
}

fn decode_seal_source(text: &str) -> Result<(SourceSeal, &str), Error> {
    if !text.starts_with("-C01") {
        return Err(Error::InvalidCode(text.get(..4).unwrap_or(text).to_string()));
    }
    let rest = &text[4..];
    if rest.len() < 24 {
        return Err(Error::TruncatedInput {
            expected: 24,
            got: rest.len(),
        });
    }
    let sn = u64::from_str_radix(&rest[..24], 16)
        .map_err(|_| Error::InvariantViolation("malformed seal source sn".into()))?;
    let rest = &rest[24..];
    let digest_len = SelfAddressingIdentifier::text_len(crate::sai::derivation::SelfAddressing::Blake3_256);
    if rest.len() < digest_len {
        return Err(Error::TruncatedInput {
            expected: digest_len,
            got: rest.len(),
        });
    }
    let digest: SelfAddressingIdentifier = rest[..digest_len].parse()?;
    Ok((SourceSeal::new(sn, digest), &rest[digest_len..]))
}

/// A non-transferable witness receipt: `body` identifies the receipted
/// event, `witness_signatures` is one indexed signature per witness over
/// the receipted event's framed bytes (§4.7, witness receipting).
#[derive(Debug, Clone, PartialEq)]
pub struct SignedNontransferableReceipt {
    pub body: KeriEvent<Receipt>,
    pub witness_signatures: Vec<IndexedSignature>,
}

impl SignedNontransferableReceipt {
    pub fn new(body: KeriEvent<Receipt>, witness_signatures: Vec<IndexedSignature>) -> Self {
        Self {
            body,
            witness_signatures,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut out = self.body.encode()?;
        out.extend(encode_group(CounterCode::WitnessIdxSigs, &self.witness_signatures)?.into_bytes());
        Ok(out)
    }
}

/// Any wire message this crate accepts on ingestion (§6.1).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Event(SignedEventMessage),
    NontransferableRct(SignedNontransferableReceipt),
}

/// Parse one event frame plus its attachment groups off the front of
/// `text`, returning the parsed message and whatever trailing bytes remain
/// (possibly another message) — readers MUST handle extra trailing
/// attachments (§6.1).
pub fn parse_message(text: &[u8]) -> Result<(Message, Vec<u8>), Error> {
    // The framed JSON object's byte length is carried in its own `v` field
    // (§4.6), but this crate's canonical form sorts keys instead of pinning
    // `v` first, so a streaming deserializer — rather than a fixed-offset
    // slice of the size field — is what actually finds the object boundary
    // for us, the same way `serde_json::StreamDeserializer` lets a reader
    // consume one JSON value off the front of a longer byte stream.
    let mut stream = serde_json::Deserializer::from_slice(text).into_iter::<serde_json::Value>();
    let tag = stream
        .next()
        .ok_or_else(|| Error::TruncatedInput { expected: 1, got: 0 })??;
    let body_end = stream.byte_offset();
    let event_text = std::str::from_utf8(&text[..body_end])
        .map_err(|_| Error::NonCanonicalJson("message frame is not valid UTF-8".into()))?;
    let rest = std::str::from_utf8(&text[body_end..])
        .map_err(|_| Error::NonCanonicalJson("attachment group is not valid UTF-8".into()))?;

    let t = tag
        .get("t")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::NonCanonicalJson("missing t field".into()))?;

    if t == "rct" {
        let body: KeriEvent<Receipt> = KeriEvent::decode(event_text.as_bytes())?;
        let (code, sigs, rest) = decode_group(rest)?;
        if code != CounterCode::WitnessIdxSigs {
            return Err(Error::InvariantViolation("rct must carry witness-indexed signatures".into()));
        }
        Ok((
            Message::NontransferableRct(SignedNontransferableReceipt::new(body, sigs)),
            rest.as_bytes().to_vec(),
        ))
    } else {
        let event_message: KeriEvent<KeyEvent> = KeriEvent::decode(event_text.as_bytes())?;
        let (code, sigs, rest) = decode_group(rest)?;
        if code != CounterCode::ControllerIdxSigs {
            return Err(Error::InvariantViolation("event must carry controller-indexed signatures".into()));
        }
        let (delegator_seal, rest) = match decode_seal_source(rest) {
            Ok((seal, rest)) => (Some(seal), rest),
            Err(_) => (None, rest),
        };
        Ok((
            Message::Event(SignedEventMessage::new(event_message, sigs, delegator_seal)),
            rest.as_bytes().to_vec(),
        ))
    }
}
