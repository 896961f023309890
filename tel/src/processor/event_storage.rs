//! Read access to a committed TEL log (§6.3): folds registry/credential
//! events for one log id (registry SAID or credential SAID — they share
//! one flat keyspace, the way `keri_core::database::keys::tel_event` keys
//! by whatever log id is given) into the accumulated state they produce.
//! Mirrors `keri_core::processor::event_storage::EventStorage`.

use std::sync::Arc;

use keri_core::database::{keys, EventLog};
use keri_core::event_message::msg::KeriEvent;
use keri_core::prefix::{IdentifierPrefix, Prefix};

use crate::error::Error;
use crate::event::credential::CredentialEvent;
use crate::event::registry::RegistryEvent;
use crate::state::{CredentialState, RegistryState};

pub struct TelStorage {
    pub db: Arc<dyn EventLog + Send + Sync>,
}

impl TelStorage {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self { db }
    }

    pub fn add_registry_event(&self, event: &KeriEvent<RegistryEvent>) -> Result<(), Error> {
        let key = keys::tel_event(&event.data.prefix.to_str(), event.data.sn);
        self.db.put(&key, &event.encode()?)?;
        Ok(())
    }

    pub fn get_registry_events(&self, id: &IdentifierPrefix) -> Result<Vec<KeriEvent<RegistryEvent>>, Error> {
        let rows = self.db.list(&keys::tel_prefix(&id.to_str()))?;
        rows.into_iter().map(|(_, v)| Ok(KeriEvent::decode(&v)?)).collect()
    }

    pub fn get_registry_state(&self, id: &IdentifierPrefix) -> Result<Option<RegistryState>, Error> {
        let events = self.get_registry_events(id)?;
        if events.is_empty() {
            return Ok(None);
        }
        let mut state = RegistryState::default();
        for event in &events {
            state = state.apply(&event.data, event.get_digest()?)?;
        }
        Ok(Some(state))
    }

    pub fn add_credential_event(&self, event: &KeriEvent<CredentialEvent>) -> Result<(), Error> {
        let key = keys::tel_event(&event.data.prefix.to_str(), event.data.sn);
        self.db.put(&key, &event.encode()?)?;
        Ok(())
    }

    pub fn get_credential_events(&self, id: &IdentifierPrefix) -> Result<Vec<KeriEvent<CredentialEvent>>, Error> {
        let rows = self.db.list(&keys::tel_prefix(&id.to_str()))?;
        rows.into_iter().map(|(_, v)| Ok(KeriEvent::decode(&v)?)).collect()
    }

    pub fn get_credential_state(&self, id: &IdentifierPrefix) -> Result<CredentialState, Error> {
        let events = self.get_credential_events(id)?;
        let mut state = CredentialState::default();
        for event in &events {
            state = state.apply(&event.data, event.get_digest()?)?;
        }
        Ok(state)
    }
}
