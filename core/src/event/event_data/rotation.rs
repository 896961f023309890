//! `rot`/`drt` (§4.7): rotates the signing key set, enforcing the
//! previous-next-key digest commitment. Ported from
//! `keriox_core::event::event_data::rotation::RotationEvent`.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::sections::seal::Seal;
use crate::event::sections::{KeyConfig, RotationWitnessConfig};
use crate::event_message::{EventTypeTag, Typeable};
use crate::sai::said::SelfAddressingIdentifier;
use crate::state::{EventSemantics, IdentifierState, LastEstablishmentData};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RotationEvent {
    #[serde(rename = "p")]
    pub previous_event_hash: SelfAddressingIdentifier,
    #[serde(flatten)]
    pub key_config: KeyConfig,
    #[serde(flatten)]
    pub witness_config: RotationWitnessConfig,
    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

impl Typeable for RotationEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Rot
    }
}

impl EventSemantics for RotationEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        // next-key digest commitment (§4.8, §8.4): the previous key config's
        // `n` must match this rotation's new key set.
        state.current.verify_next(&self.key_config)?;

        if self.previous_event_hash != state.last_event_digest {
            return Err(Error::PriorMismatch);
        }

        let new_witnesses = self.witness_config.apply(&state.witness_config.witnesses);
        let last_est = LastEstablishmentData {
            sn: state.sn,
            digest: state.last_event_digest.clone(),
            br: self.witness_config.prune.clone(),
            ba: self.witness_config.graft.clone(),
        };

        Ok(IdentifierState {
            current: self.key_config.clone(),
            witness_config: crate::state::WitnessConfig {
                tally: self.witness_config.tally.clone(),
                witnesses: new_witnesses,
            },
            last_est,
            ..state
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::sections::key_config::nxt_commitment;
    use crate::keys::PublicKey;
    use crate::prefix::BasicPrefix;
    use crate::sai::derivation::SelfAddressing;
    use crate::threshold::SignatureThreshold;

    fn key(byte: u8) -> BasicPrefix {
        BasicPrefix::Ed25519(PublicKey::new(vec![byte; 32]))
    }

    /// S4 — a rotation whose new key set does not match the prior `n`
    /// commitment is rejected (spec §8.4).
    #[test]
    fn rotation_rejects_uncommitted_keys() {
        let committed_next = nxt_commitment(SignatureThreshold::simple(1), &[key(9)], SelfAddressing::Blake3_256);
        let current = crate::event::sections::KeyConfig::new(
            vec![key(1)],
            committed_next,
            Some(SignatureThreshold::simple(1)),
        );
        let state = IdentifierState {
            current,
            ..Default::default()
        };

        let bad_next = nxt_commitment(SignatureThreshold::simple(1), &[key(3)], SelfAddressing::Blake3_256);
        let rot = RotationEvent {
            previous_event_hash: SelfAddressingIdentifier::default(),
            key_config: crate::event::sections::KeyConfig::new(
                vec![key(2)],
                bad_next,
                Some(SignatureThreshold::simple(1)),
            ),
            witness_config: Default::default(),
            data: vec![],
        };
        assert!(rot.apply_to(state).is_err());
    }
}
