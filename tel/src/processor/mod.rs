//! `TelProcessor` (§4.8): the entry point for registry and credential
//! events, mirroring `keri_core::processor::EventProcessor`'s
//! validate-then-commit shape. TEL events carry no indexed signatures of
//! their own (§4.11's multi-signature escrow pipeline is scoped to KEL
//! controller events) — a TEL event's integrity comes from its own SAID
//! self-addressing plus, for `vcp`, the issuer-KEL anchor check.

pub mod event_storage;
pub mod validator;

use std::sync::Arc;

use keri_core::database::EventLog;
use keri_core::event_message::msg::KeriEvent;
use keri_core::prefix::IdentifierPrefix;
use keri_core::processor::event_storage::EventStorage as KelStorage;

use crate::error::Error;
use crate::event::credential::CredentialEvent;
use crate::event::registry::RegistryEvent;
use crate::state::{CredentialState, RegistryState};

use self::event_storage::TelStorage;
use self::validator::TelValidator;

pub struct TelProcessor {
    storage: TelStorage,
    validator: TelValidator,
}

impl TelProcessor {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self {
            storage: TelStorage::new(db.clone()),
            validator: TelValidator::new(TelStorage::new(db)),
        }
    }

    /// Ingest a `vcp`. `kel` is the primary KEL store, consulted to check
    /// the anchoring seal.
    pub fn process_registry_event(&self, event: KeriEvent<RegistryEvent>, kel: &KelStorage) -> Result<RegistryState, Error> {
        let state = self.validator.validate_registry_event(&event, kel)?;
        self.storage.add_registry_event(&event)?;
        log::debug!("registry {} accepted at sn {}", event.data.prefix, event.data.sn);
        Ok(state)
    }

    /// Ingest an `iss`/`rev`.
    pub fn process_credential_event(&self, event: KeriEvent<CredentialEvent>) -> Result<CredentialState, Error> {
        let state = self.validator.validate_credential_event(&event)?;
        self.storage.add_credential_event(&event)?;
        log::debug!("credential {} accepted at sn {}", event.data.prefix, event.data.sn);
        Ok(state)
    }

    pub fn get_registry_state(&self, id: &IdentifierPrefix) -> Result<Option<RegistryState>, Error> {
        self.storage.get_registry_state(id)
    }

    pub fn get_credential_state(&self, id: &IdentifierPrefix) -> Result<CredentialState, Error> {
        self.storage.get_credential_state(id)
    }

    pub fn storage(&self) -> &TelStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use keri_core::database::memory::MemoryLog;
    use keri_core::event::event_data::{EventData, InceptionEvent, InteractionEvent};
    use keri_core::event::sections::key_config::nxt_commitment;
    use keri_core::event::sections::seal::EventSeal;
    use keri_core::event::sections::KeyConfig;
    use keri_core::event::KeyEvent;
    use keri_core::event_message::msg::KeriEvent as Wrapped;
    use keri_core::event_message::signed_event_message::SignedEventMessage;
    use keri_core::keys::PublicKey;
    use keri_core::prefix::BasicPrefix;
    use keri_core::sai::derivation::SelfAddressing;
    use keri_core::sai::said::SelfAddressingIdentifier;
    use keri_core::threshold::SignatureThreshold;

    use super::*;
    use crate::event::credential::{CredentialEventData, CredentialIssuance, CredentialRevocation};
    use crate::event::registry::{RegistryEventData, RegistryInception};

    fn said(bytes: &[u8]) -> SelfAddressingIdentifier {
        SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, bytes)
    }

    fn issuer_icp() -> (IdentifierPrefix, SignedEventMessage) {
        let key = BasicPrefix::Ed25519NT(PublicKey::new(vec![9; 32]));
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key.clone()], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key.clone()], next, Some(SignatureThreshold::simple(1)));
        let icp = InceptionEvent::new(key_config, None, None);
        let key_event = KeyEvent::new(IdentifierPrefix::Basic(key), 0, EventData::Icp(icp));
        let wrapped = Wrapped::new(key_event, SelfAddressing::Blake3_256).unwrap();
        let aid = wrapped.data.prefix.clone();
        (aid, SignedEventMessage::new(wrapped, vec![], None))
    }

    /// A `vcp` anchored in its issuer's `ixn` is accepted, and an `iss`/`rev`
    /// pair for a credential in that registry transitions
    /// `NotIssued -> Issued -> Revoked`.
    #[test]
    fn anchored_vcp_is_accepted_and_credential_lifecycle_runs() {
        let db = Arc::new(MemoryLog::new());
        let kel_storage = KelStorage::new(db.clone());
        let (issuer, icp_signed) = issuer_icp();
        kel_storage.add_kel_finalized_event(&icp_signed).unwrap();

        let registry_id = IdentifierPrefix::SelfAddressing(said(b"registry said"));
        let vcp = RegistryInception::new(issuer.clone(), 1, vec![]);
        let registry_event = RegistryEvent::new(registry_id.clone(), 0, RegistryEventData::Vcp(vcp));
        let registry_wrapped = Wrapped::new(registry_event, SelfAddressing::Blake3_256).unwrap();

        let ixn = InteractionEvent::new(
            icp_signed.event_message.get_digest().unwrap(),
            vec![EventSeal::new(registry_id.clone(), 0, registry_wrapped.get_digest().unwrap())],
        );
        let ixn_event = KeyEvent::new(issuer.clone(), 1, EventData::Ixn(ixn));
        let ixn_wrapped = Wrapped::new(ixn_event, SelfAddressing::Blake3_256).unwrap();
        kel_storage
            .add_kel_finalized_event(&SignedEventMessage::new(ixn_wrapped, vec![], None))
            .unwrap();

        let tel = TelProcessor::new(db);
        let state = tel.process_registry_event(registry_wrapped, &kel_storage).unwrap();
        assert_eq!(state.issuer, issuer);

        let credential_id = IdentifierPrefix::SelfAddressing(said(b"credential contents"));
        let iss = CredentialEvent::new(credential_id.clone(), 0, CredentialEventData::Iss(CredentialIssuance { registry_id: registry_id.clone() }));
        let iss_wrapped = Wrapped::new(iss, SelfAddressing::Blake3_256).unwrap();
        let iss_digest = iss_wrapped.get_digest().unwrap();
        let state = tel.process_credential_event(iss_wrapped).unwrap();
        assert!(matches!(state, CredentialState::Issued(_)));

        let rev = CredentialEvent::new(credential_id, 1, CredentialEventData::Rev(CredentialRevocation { prior_event_digest: iss_digest }));
        let rev_wrapped = Wrapped::new(rev, SelfAddressing::Blake3_256).unwrap();
        let state = tel.process_credential_event(rev_wrapped).unwrap();
        assert_eq!(state, CredentialState::Revoked);
    }

    /// A child registry's anchor is checked against the parent registry's
    /// issuer KEL, not the child's own `ii`.
    #[test]
    fn nested_registry_anchors_against_parent_issuer() {
        let db = Arc::new(MemoryLog::new());
        let kel_storage = KelStorage::new(db.clone());
        let (issuer, icp_signed) = issuer_icp();
        kel_storage.add_kel_finalized_event(&icp_signed).unwrap();

        let tel = TelProcessor::new(db);

        let parent_id = IdentifierPrefix::SelfAddressing(said(b"parent registry"));
        let parent_vcp = RegistryInception::new(issuer.clone(), 1, vec![]);
        let parent_event = RegistryEvent::new(parent_id.clone(), 0, RegistryEventData::Vcp(parent_vcp));
        let parent_wrapped = Wrapped::new(parent_event, SelfAddressing::Blake3_256).unwrap();

        let ixn = InteractionEvent::new(
            icp_signed.event_message.get_digest().unwrap(),
            vec![EventSeal::new(parent_id.clone(), 0, parent_wrapped.get_digest().unwrap())],
        );
        let ixn_event = KeyEvent::new(issuer.clone(), 1, EventData::Ixn(ixn));
        let ixn_wrapped = Wrapped::new(ixn_event, SelfAddressing::Blake3_256).unwrap();
        kel_storage
            .add_kel_finalized_event(&SignedEventMessage::new(ixn_wrapped, vec![], None))
            .unwrap();
        tel.process_registry_event(parent_wrapped, &kel_storage).unwrap();

        // A different, unrelated AID is named as the child's own `ii`; the
        // anchor check must still look at the parent's issuer KEL.
        let unrelated_issuer = IdentifierPrefix::SelfAddressing(said(b"unrelated issuer"));
        let child_id = IdentifierPrefix::SelfAddressing(said(b"child registry"));
        let child_vcp = RegistryInception::new(unrelated_issuer, 1, vec![]).nested_under(parent_id.clone());
        let child_event = RegistryEvent::new(child_id.clone(), 0, RegistryEventData::Vcp(child_vcp));
        let child_wrapped = Wrapped::new(child_event, SelfAddressing::Blake3_256).unwrap();

        let child_ixn = InteractionEvent::new(
            kel_storage.get_kel_events(&issuer).unwrap().last().unwrap().event_message.get_digest().unwrap(),
            vec![EventSeal::new(child_id.clone(), 0, child_wrapped.get_digest().unwrap())],
        );
        let child_ixn_event = KeyEvent::new(issuer.clone(), 2, EventData::Ixn(child_ixn));
        let child_ixn_wrapped = Wrapped::new(child_ixn_event, SelfAddressing::Blake3_256).unwrap();
        kel_storage
            .add_kel_finalized_event(&SignedEventMessage::new(child_ixn_wrapped, vec![], None))
            .unwrap();

        let state = tel.process_registry_event(child_wrapped, &kel_storage).unwrap();
        assert_eq!(state.parent, Some(parent_id));
    }
}
