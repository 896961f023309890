//! `dip`/`drt` (§4.12): delegated inception and delegated rotation, each an
//! ordinary establishment event plus a `di` delegator AID. Acceptance
//! additionally requires the delegation anchorer (§4.12) to find a matching
//! seal in the delegator's KEL — that check lives in the processor, not
//! here, the same separation `keriox_core` draws between `EventSemantics`
//! (local state transition) and the escrow/anchor-matching pipeline.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event_message::{EventTypeTag, Typeable};
use crate::prefix::IdentifierPrefix;
use crate::state::{EventSemantics, IdentifierState};

use super::inception::InceptionEvent;
use super::rotation::RotationEvent;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DelegatedInceptionEvent {
    #[serde(flatten)]
    pub inception_data: InceptionEvent,
    #[serde(rename = "di")]
    pub delegator: IdentifierPrefix,
}

impl Typeable for DelegatedInceptionEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Dip
    }
}

impl EventSemantics for DelegatedInceptionEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        Ok(IdentifierState {
            delegator: Some(self.delegator.clone()),
            ..self.inception_data.apply_to(state)?
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DelegatedRotationEvent {
    #[serde(flatten)]
    pub rotation_data: RotationEvent,
    #[serde(rename = "di")]
    pub delegator: IdentifierPrefix,
}

impl Typeable for DelegatedRotationEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Drt
    }
}

impl EventSemantics for DelegatedRotationEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        Ok(IdentifierState {
            delegator: Some(self.delegator.clone()),
            ..self.rotation_data.apply_to(state)?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::sections::key_config::nxt_commitment;
    use crate::event::sections::KeyConfig;
    use crate::event_message::msg::KeriEvent;
    use crate::keys::PublicKey;
    use crate::prefix::BasicPrefix;
    use crate::sai::derivation::SelfAddressing;
    use crate::sai::said::SelfAddressingIdentifier;
    use crate::threshold::SignatureThreshold;

    /// S5 — delegated inception carries its delegator AID and escrows until
    /// the delegator's KEL anchors it (spec §8.5, the anchoring check itself
    /// lives in the processor/delegation module).
    #[test]
    fn delegated_inception_records_delegator_in_state() {
        let key = BasicPrefix::Ed25519(PublicKey::new(vec![1; 32]));
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key.clone()], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key], next, Some(SignatureThreshold::simple(1)));
        let delegator: IdentifierPrefix = IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(
            SelfAddressing::Blake3_256,
            b"delegator aid",
        ));
        let dip = DelegatedInceptionEvent {
            inception_data: InceptionEvent::new(key_config, None, None),
            delegator: delegator.clone(),
        };
        let event = KeriEvent::new(dip.clone(), SelfAddressing::Blake3_256).unwrap();
        assert!(event.verify_digest().unwrap());

        let state = dip.apply_to(IdentifierState::default()).unwrap();
        assert_eq!(state.delegator, Some(delegator));
    }
}
