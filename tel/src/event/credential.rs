//! Credential TEL event data (§4.8): `iss`/`rev` mark a credential SAID
//! issued or revoked within a registry. Ported from
//! `support/teliox::event::vc_event::{SimpleIssuance, SimpleRevocation}`,
//! dropping the backer-endorsed `bis`/`brv` pair (spec.md's TEL engine
//! names only `iss`/`rev`; backer endorsement of credential events is a
//! witness-receipt-style concern the escrow pipeline (§4.11) already covers
//! for KEL events and spec.md never extends to TEL ones).

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use keri_core::event_message::{EventTypeTag, Typeable};
use keri_core::prefix::IdentifierPrefix;
use keri_core::sai::said::SelfAddressingIdentifier;

/// `iss`: marks the credential as issued under registry `ri`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialIssuance {
    #[serde(rename = "ri")]
    pub registry_id: IdentifierPrefix,
}

/// `rev`: marks the credential revoked. `p` must bind to the digest of the
/// credential's own `iss` event (§3.3: "`rev` must follow an `iss` for the
/// same credential").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialRevocation {
    #[serde(rename = "p")]
    pub prior_event_digest: SelfAddressingIdentifier,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CredentialEventData {
    Iss(CredentialIssuance),
    Rev(CredentialRevocation),
}

impl Typeable for CredentialEventData {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        match self {
            CredentialEventData::Iss(_) => EventTypeTag::Iss,
            CredentialEventData::Rev(_) => EventTypeTag::Rev,
        }
    }
}

/// `{i, s}` envelope for a credential event. `i` is the credential's own
/// SAID (the digest of its serialized ACDC contents, §3.4).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CredentialEvent {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(flatten)]
    pub event_data: CredentialEventData,
}

impl CredentialEvent {
    pub fn new(prefix: IdentifierPrefix, sn: u64, event_data: CredentialEventData) -> Self {
        Self {
            prefix,
            sn,
            event_data,
        }
    }
}

impl Typeable for CredentialEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        self.event_data.get_type()
    }
}
