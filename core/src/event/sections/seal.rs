//! Anchor seals (§4.12, glossary "Anchor seal"): a `{i, s, d}` reference
//! embedded in an `ixn`'s `a` field that binds another event's acceptance to
//! it. Simplified from `keriox_core::event::sections::seal::Seal` (which
//! also carries location/root/digest-only seal variants not named anywhere
//! in spec.md) down to the one shape spec.md actually specifies.

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use crate::prefix::IdentifierPrefix;
use crate::sai::said::SelfAddressingIdentifier;

/// `{i, s, d}`: the identifier, sequence number and digest of the anchored
/// event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventSeal {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(rename = "d")]
    pub event_digest: SelfAddressingIdentifier,
}

impl EventSeal {
    pub fn new(prefix: IdentifierPrefix, sn: u64, event_digest: SelfAddressingIdentifier) -> Self {
        Self {
            prefix,
            sn,
            event_digest,
        }
    }

    /// Does this seal anchor the event identified by `(prefix, sn, digest)`?
    pub fn matches(&self, prefix: &IdentifierPrefix, sn: u64, digest: &SelfAddressingIdentifier) -> bool {
        &self.prefix == prefix && self.sn == sn && &self.event_digest == digest
    }
}

/// `a`: the anchored-seals list carried by `icp`/`ixn`/`dip`/`drt`.
pub type Seal = EventSeal;

/// A seal source couple (§6.1's `-C` counter group): the sequence number and
/// digest of the delegator's anchoring `ixn`, attached to a `dip`/`drt` so a
/// verifier can locate the anchor without re-scanning the delegator's whole
/// KEL. Unlike `EventSeal` it carries no `i`, since the delegator's AID is
/// already named in the delegated event's own `di` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceSeal {
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(rename = "d")]
    pub digest: SelfAddressingIdentifier,
}

impl SourceSeal {
    pub fn new(sn: u64, digest: SelfAddressingIdentifier) -> Self {
        Self { sn, digest }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::BasicPrefix;
    use crate::sai::derivation::SelfAddressing;

    #[test]
    fn seal_round_trips_through_json() {
        let seal = EventSeal::new(
            IdentifierPrefix::Basic(BasicPrefix::Ed25519NT(crate::keys::PublicKey::new(vec![7; 32]))),
            1,
            SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"anchored event bytes"),
        );
        let text = serde_json::to_string(&seal).unwrap();
        let back: EventSeal = serde_json::from_str(&text).unwrap();
        assert_eq!(seal, back);
    }
}
