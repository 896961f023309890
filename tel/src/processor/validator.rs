//! `TelValidator` (§4.8, §4.12): checks TEL event chaining and the
//! registry-anchor requirement for `vcp`, mirroring
//! `keri_core::processor::validator::EventValidator::check_delegation_anchor`
//! — a `vcp` is accepted only once the anchoring AID's KEL carries a
//! matching seal, exactly as a `dip` is accepted only once its delegator's
//! KEL does.

use keri_core::event::event_data::EventData;
use keri_core::event::sections::seal::EventSeal;
use keri_core::event_message::msg::KeriEvent;
use keri_core::prefix::IdentifierPrefix;
use keri_core::processor::event_storage::EventStorage as KelStorage;
use keri_core::sai::said::SelfAddressingIdentifier;

use crate::error::Error;
use crate::event::credential::{CredentialEvent, CredentialEventData};
use crate::event::registry::{RegistryEvent, RegistryEventData};
use crate::state::{CredentialState, RegistryState};

use super::event_storage::TelStorage;

pub struct TelValidator {
    pub storage: TelStorage,
}

impl TelValidator {
    pub fn new(storage: TelStorage) -> Self {
        Self { storage }
    }

    /// Validate a `vcp`/registry event. `kel` is read-only access to the
    /// primary KEL store, scanned for the seal `vcp` requires: for a
    /// top-level registry that's the issuer's own KEL; for a nested
    /// registry (`ip` present) it's the parent registry's issuer's KEL.
    pub fn validate_registry_event(&self, event: &KeriEvent<RegistryEvent>, kel: &KelStorage) -> Result<RegistryState, Error> {
        let prior_state = self.storage.get_registry_state(&event.data.prefix)?;
        let digest = event.get_digest()?;

        let new_state = match &prior_state {
            None => RegistryState::default().apply(&event.data, digest.clone())?,
            Some(state) => state.clone().apply(&event.data, digest.clone())?,
        };

        let RegistryEventData::Vcp(vcp) = &event.data.event_data;
        let anchor_source = match &vcp.parent {
            Some(parent) => {
                let parent_state = self
                    .storage
                    .get_registry_state(parent)?
                    .ok_or_else(|| keri_core::error::Error::InvariantViolation(format!("parent registry {parent} has no vcp")))?;
                parent_state.issuer
            }
            None => vcp.issuer.clone(),
        };
        self.check_registry_anchor(&anchor_source, &event.data.prefix, digest, kel)?;

        Ok(new_state)
    }

    /// §4.8: a registry is only acceptable once `anchor_source`'s KEL
    /// contains an `ixn`/`icp` whose `a` seals reference this registry's
    /// own `(i=registry_id, s=0, d=registry's own SAID)`.
    pub fn check_registry_anchor(
        &self,
        anchor_source: &IdentifierPrefix,
        registry_id: &IdentifierPrefix,
        registry_digest: SelfAddressingIdentifier,
        kel: &KelStorage,
    ) -> Result<(), Error> {
        let target = EventSeal::new(registry_id.clone(), 0, registry_digest);
        let anchored = kel.get_kel_events(anchor_source)?.iter().any(|event| match &event.event_message.data.event_data {
            EventData::Ixn(ixn) => ixn.data.iter().any(|seal| seal.matches(&target.prefix, target.sn, &target.event_digest)),
            EventData::Icp(icp) => icp.data.iter().any(|seal| seal.matches(&target.prefix, target.sn, &target.event_digest)),
            _ => false,
        });

        if anchored {
            Ok(())
        } else {
            Err(keri_core::error::Error::DelegatorMissingAnchor(anchor_source.clone()).into())
        }
    }

    /// Validate an `iss`/`rev`. The credential's registry is derived from
    /// its own `iss` (`ri` on issuance, or the prior `iss` for a `rev`) and
    /// must already have a committed `vcp` (§4.8).
    pub fn validate_credential_event(&self, event: &KeriEvent<CredentialEvent>) -> Result<CredentialState, Error> {
        let registry_id = self.registry_for(event)?;
        if self.storage.get_registry_state(&registry_id)?.is_none() {
            return Err(keri_core::error::Error::InvariantViolation(format!("registry {registry_id} has no vcp")).into());
        }
        let prior_state = self.storage.get_credential_state(&event.data.prefix)?;
        prior_state.apply(&event.data, event.get_digest()?)
    }

    fn registry_for(&self, event: &KeriEvent<CredentialEvent>) -> Result<IdentifierPrefix, Error> {
        match &event.data.event_data {
            CredentialEventData::Iss(iss) => Ok(iss.registry_id.clone()),
            CredentialEventData::Rev(_) => self
                .storage
                .get_credential_events(&event.data.prefix)?
                .iter()
                .find_map(|e| match &e.data.event_data {
                    CredentialEventData::Iss(iss) => Some(iss.registry_id.clone()),
                    _ => None,
                })
                .ok_or_else(|| keri_core::error::Error::TypeForbidden("rev without a prior iss".into()).into()),
        }
    }
}
