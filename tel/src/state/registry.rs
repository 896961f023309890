//! Registry state (§4.8): "registry ID, issuing AID, backers, backer
//! threshold, per-credential status, optional parent registry". Ported from
//! `support/teliox::state::ManagerTelState`, generalized with the optional
//! `parent` field nested registries need.

use keri_core::prefix::IdentifierPrefix;
use keri_core::sai::said::SelfAddressingIdentifier;

use crate::error::Error;
use crate::event::registry::{RegistryEvent, RegistryEventData};

/// Accumulated state of one registry's management TEL. `prefix` is
/// `IdentifierPrefix::default()` until a `vcp` has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
    pub prefix: IdentifierPrefix,
    pub sn: u64,
    pub last_event_digest: SelfAddressingIdentifier,
    pub issuer: IdentifierPrefix,
    pub parent: Option<IdentifierPrefix>,
    pub backer_threshold: u64,
    pub backers: Vec<IdentifierPrefix>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            prefix: IdentifierPrefix::default(),
            sn: 0,
            last_event_digest: SelfAddressingIdentifier::default(),
            issuer: IdentifierPrefix::default(),
            parent: None,
            backer_threshold: 0,
            backers: vec![],
        }
    }
}

impl RegistryState {
    /// Apply `event`, whose own digest is `event_digest` (the caller already
    /// has it from framing/decoding and recomputing it here would be
    /// redundant).
    pub fn apply(&self, event: &RegistryEvent, event_digest: SelfAddressingIdentifier) -> Result<Self, Error> {
        let RegistryEventData::Vcp(vcp) = &event.event_data;
        if self.prefix != IdentifierPrefix::default() {
            return Err(keri_core::error::Error::DuplicateEvent(event.sn).into());
        }
        if event.sn != 0 {
            return Err(keri_core::error::Error::OutOfOrderSequence {
                expected: 0,
                got: event.sn,
            }
            .into());
        }
        Ok(Self {
            prefix: event.prefix.clone(),
            sn: 0,
            last_event_digest: event_digest,
            issuer: vcp.issuer.clone(),
            parent: vcp.parent.clone(),
            backer_threshold: vcp.backer_threshold,
            backers: vcp.backers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::registry::RegistryInception;
    use keri_core::sai::derivation::SelfAddressing;

    fn issuer() -> IdentifierPrefix {
        IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"issuer aid"))
    }

    #[test]
    fn vcp_establishes_registry_state() {
        let registry_id = IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"registry said"));
        let vcp = RegistryInception::new(issuer(), 1, vec![]);
        let event = RegistryEvent::new(registry_id.clone(), 0, RegistryEventData::Vcp(vcp));
        let digest = SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"event bytes");

        let state = RegistryState::default().apply(&event, digest).unwrap();
        assert_eq!(state.prefix, registry_id);
        assert_eq!(state.issuer, issuer());
        assert!(state.parent.is_none());
    }

    #[test]
    fn second_vcp_on_established_registry_is_rejected() {
        let registry_id = IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"registry said"));
        let vcp = RegistryInception::new(issuer(), 1, vec![]);
        let event = RegistryEvent::new(registry_id.clone(), 0, RegistryEventData::Vcp(vcp.clone()));
        let digest = SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"event bytes");
        let state = RegistryState::default().apply(&event, digest.clone()).unwrap();

        let repeated = RegistryEvent::new(registry_id, 0, RegistryEventData::Vcp(vcp));
        let err = state.apply(&repeated, digest).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::DuplicateEvent(_))));
    }
}
