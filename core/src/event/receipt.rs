//! `rct`: a non-transferable witness receipt (§9, "receipt semantics" open
//! question — pinned here to one canonical form: a companion event keyed by
//! the receipted event's SAID, carrying a couplet of `(witness AID,
//! signature)` per witness, parallel to `icp/rot/ixn` rather than an
//! attachment group on the receipted event itself). Ported in spirit from
//! `keriox_core::event::receipt::Receipt`.

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use crate::event_message::{EventTypeTag, Typeable};
use crate::prefix::IdentifierPrefix;
use crate::sai::said::SelfAddressingIdentifier;

/// The receipted event's identity: the same `(i, s, d)` triple an anchor
/// seal carries (§4.12), since a receipt is itself a reference to an event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(rename = "d")]
    pub receipted_event_digest: SelfAddressingIdentifier,
}

impl Receipt {
    pub fn new(prefix: IdentifierPrefix, sn: u64, receipted_event_digest: SelfAddressingIdentifier) -> Self {
        Self {
            prefix,
            sn,
            receipted_event_digest,
        }
    }
}

impl Typeable for Receipt {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Rct
    }
}
