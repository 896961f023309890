//! Registry ("management TEL") event data (§4.8): `vcp` creates a
//! credential registry. Ported from
//! `support/teliox::event::manager_event::{ManagerTelEvent, Inc}`,
//! collapsed to the `vcp` shape spec.md names — no `vrt` backer-rotation
//! event, since spec.md's registry state carries no operation that mutates
//! `b`/`bt` after inception.

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use keri_core::event_message::{EventTypeTag, Typeable};
use keri_core::prefix::IdentifierPrefix;

/// `vcp`: registry inception. `ii` is the issuing AID; an optional `ip`
/// names the parent registry this one nests under (§4.8 "nested
/// registries"), in which case the anchoring seal is expected in the
/// parent's issuer's KEL rather than `ii`'s.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistryInception {
    #[serde(rename = "ii")]
    pub issuer: IdentifierPrefix,
    #[serde(rename = "ip", skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<IdentifierPrefix>,
    #[serde(rename = "bt", with = "SerHex::<Compact>")]
    pub backer_threshold: u64,
    #[serde(rename = "b")]
    pub backers: Vec<IdentifierPrefix>,
}

impl RegistryInception {
    pub fn new(issuer: IdentifierPrefix, backer_threshold: u64, backers: Vec<IdentifierPrefix>) -> Self {
        Self {
            issuer,
            parent: None,
            backer_threshold,
            backers,
        }
    }

    pub fn nested_under(mut self, parent: IdentifierPrefix) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegistryEventData {
    Vcp(RegistryInception),
}

impl Typeable for RegistryEventData {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        match self {
            RegistryEventData::Vcp(_) => EventTypeTag::Vcp,
        }
    }
}

/// `{i, s}` envelope for a registry event, mirroring
/// `keri_core::event::KeyEvent`. `i` is the registry's own SAID, derived
/// from the `vcp` at sn 0 exactly the way a self-addressing AID is derived
/// from its `icp` (§3.3's "AID derivation").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegistryEvent {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(flatten)]
    pub event_data: RegistryEventData,
}

impl RegistryEvent {
    pub fn new(prefix: IdentifierPrefix, sn: u64, event_data: RegistryEventData) -> Self {
        Self {
            prefix,
            sn,
            event_data,
        }
    }
}

impl Typeable for RegistryEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        self.event_data.get_type()
    }
}
