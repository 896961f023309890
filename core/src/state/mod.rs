//! Controller key state (§3.2, §4.7): the accumulated result of applying a
//! KEL's events in order. Ported from `keriox_core::state`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use crate::error::Error;
use crate::event::sections::KeyConfig;
use crate::event_message::EventTypeTag;
use crate::prefix::{BasicPrefix, IdentifierPrefix, IndexedSignature};
use crate::sai::said::SelfAddressingIdentifier;
use crate::threshold::SignatureThreshold;

/// The sequence number, digest and witness-pool delta of the last
/// establishment event (`icp`/`rot`/`dip`/`drt`), used to answer "what
/// witness pool applied when this key set was installed" (§4.7).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LastEstablishmentData {
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(rename = "d")]
    pub digest: SelfAddressingIdentifier,
    #[serde(rename = "br")]
    pub br: Vec<BasicPrefix>,
    #[serde(rename = "ba")]
    pub ba: Vec<BasicPrefix>,
}

/// `bt`/`b`: the receipt threshold and witness pool currently in effect.
#[derive(Default, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct WitnessConfig {
    #[serde(rename = "bt")]
    pub tally: SignatureThreshold,
    #[serde(rename = "b")]
    pub witnesses: Vec<BasicPrefix>,
}

impl WitnessConfig {
    /// Does a set of indexed witness receipts satisfy `bt` (§4.11,
    /// "witness pending")?
    pub fn enough_receipts(&self, indexed_receipts: &[IndexedSignature]) -> Result<bool, Error> {
        let mut unique = HashSet::new();
        for r in indexed_receipts {
            if let Some(w) = self.witnesses.get(r.index as usize) {
                unique.insert(w.clone());
            }
        }
        let indices: Vec<usize> = unique
            .iter()
            .filter_map(|w| self.witnesses.iter().position(|x| x == w))
            .collect();
        self.tally.satisfied(&indices)
    }
}

/// The accumulated state after applying a KEL prefix, per §13 of the KERI
/// paper (and spec.md §4.7).
#[derive(Default, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierState {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(rename = "d")]
    pub last_event_digest: SelfAddressingIdentifier,
    #[serde(rename = "et")]
    pub last_event_type: Option<EventTypeTag>,
    #[serde(flatten)]
    pub current: KeyConfig,
    #[serde(flatten)]
    pub witness_config: WitnessConfig,
    pub delegator: Option<IdentifierPrefix>,
    #[serde(rename = "ee")]
    pub last_est: LastEstablishmentData,
}

impl IdentifierState {
    pub fn apply<T: EventSemantics>(self, event: &T) -> Result<Self, Error> {
        event.apply_to(self)
    }
}

impl EventTypeTag {
    pub fn is_establishment_event(&self) -> bool {
        matches!(self, EventTypeTag::Icp | EventTypeTag::Rot | EventTypeTag::Dip | EventTypeTag::Drt)
    }
}

/// How an event's data transforms the accumulated identifier state (§4.7).
pub trait EventSemantics {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        Ok(state)
    }
}
