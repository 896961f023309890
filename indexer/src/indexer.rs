//! `Indexer` (§4.13): an append-only, write-time projection over committed
//! KEL/TEL/ACDC entries, kept for audit and cross-log verification rather
//! than for replaying state (that's what `EventStorage`/`TelStorage` are
//! for). It owns no sequencing logic of its own — every `record_*` call
//! takes an event (and, where the source event alone doesn't carry enough
//! context, the state that committing it already produced) and derives the
//! `Reference`s mechanically. Because of that it needs no write-ahead log:
//! a crash between committing to the primary store and recording here just
//! leaves a gap that `rebuild_*` closes by replaying the primary store from
//! scratch (§4.13 "regenerable... crash-safe... no own WAL").

use std::sync::Arc;

use chrono::Utc;
use keri_core::database::EventLog;
use keri_core::event::event_data::EventData;
use keri_core::event_message::signed_event_message::SignedEventMessage;
use keri_core::event_message::Typeable;
use keri_core::prefix::{IdentifierPrefix, Prefix};
use keri_core::processor::event_storage::EventStorage as KelStorage;
use teliox::acdc::Acdc;
use teliox::event::credential::{CredentialEvent, CredentialEventData};
use teliox::event::registry::{RegistryEvent, RegistryEventData};
use teliox::processor::event_storage::TelStorage;

use crate::entry::IndexEntry;
use crate::error::Error;
use crate::reference::Reference;

fn log_key(log_id: &str, sn: u64) -> String {
    format!("index/{log_id}/{sn:016x}")
}

fn log_prefix(log_id: &str) -> String {
    format!("index/{log_id}/")
}

pub struct Indexer {
    db: Arc<dyn EventLog + Send + Sync>,
}

impl Indexer {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self { db }
    }

    /// Every entry recorded for `log_id`, in sequence order (the same
    /// ordering guarantee `EventLog::list` makes for the primary stores).
    pub fn get(&self, log_id: &IdentifierPrefix) -> Result<Vec<IndexEntry>, Error> {
        self.db
            .list(&log_prefix(&log_id.to_str()))?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(|e| keri_core::error::Error::from(e).into()))
            .collect()
    }

    fn put(&self, log_id: &IdentifierPrefix, entry: &IndexEntry) -> Result<(), Error> {
        let bytes = serde_json::to_vec(entry).map_err(keri_core::error::Error::from)?;
        self.db.put(&log_key(&log_id.to_str(), entry.sequence), &bytes)?;
        Ok(())
    }

    fn clear(&self, log_id: &IdentifierPrefix) -> Result<(), Error> {
        for (key, _) in self.db.list(&log_prefix(&log_id.to_str()))? {
            self.db.del(&key)?;
        }
        Ok(())
    }

    /// Append one projection of a just-committed KEL event (§4.13). A
    /// `dip`/`drt` carries a `SignerKel` reference to its delegator, the
    /// only cross-log relationship a bare KEL event names.
    pub fn record_kel_event(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let event = &signed.event_message;
        let data = &event.data.event_data;
        let references = match data.delegator() {
            Some(delegator) => vec![Reference::SignerKel { aid: delegator.clone() }],
            None => vec![],
        };
        let prior = prior_digest(data);
        let entry = IndexEntry::new(
            event.get_digest().map_err(Error::from)?,
            data.get_type(),
            event.data.sn,
            prior,
            Utc::now(),
            signed.signatures.clone(),
            references,
        );
        self.put(&event.data.prefix, &entry)
    }

    /// Append one projection of a just-committed registry event (§4.13).
    /// `vcp` carries an `IssuerKel` reference always, and additionally a
    /// `ParentRegistry` reference (plus, symmetrically, a `ChildRegistry`
    /// reference recorded back onto the parent's own log) when nested.
    pub fn record_registry_event(&self, event: &keri_core::event_message::msg::KeriEvent<RegistryEvent>) -> Result<(), Error> {
        let RegistryEventData::Vcp(vcp) = &event.data.event_data;
        let mut references = vec![Reference::IssuerKel { aid: vcp.issuer.clone() }];
        if let Some(parent) = &vcp.parent {
            references.push(Reference::ParentRegistry { registry_id: parent.clone() });
            self.append_reference(parent, Reference::ChildRegistry { registry_id: event.data.prefix.clone() })?;
        }
        let entry = IndexEntry::new(
            event.get_digest().map_err(Error::from)?,
            event.data.event_data.get_type(),
            event.data.sn,
            None,
            Utc::now(),
            vec![],
            references,
        );
        self.put(&event.data.prefix, &entry)
    }

    /// Append one projection of a just-committed credential event (§4.13).
    pub fn record_credential_event(&self, event: &keri_core::event_message::msg::KeriEvent<CredentialEvent>) -> Result<(), Error> {
        let (registry_id, prior) = match &event.data.event_data {
            CredentialEventData::Iss(iss) => (iss.registry_id.clone(), None),
            CredentialEventData::Rev(rev) => {
                let registry_id = self.registry_for_credential(&event.data.prefix)?;
                (registry_id, Some(rev.prior_event_digest.clone()))
            }
        };
        let entry = IndexEntry::new(
            event.get_digest().map_err(Error::from)?,
            event.data.event_data.get_type(),
            event.data.sn,
            prior,
            Utc::now(),
            vec![],
            vec![Reference::CredentialRegistry { registry_id }],
        );
        self.put(&event.data.prefix, &entry)
    }

    /// Append one projection of a stored ACDC, one `Edge` reference per
    /// named edge target (§4.13).
    pub fn record_acdc(&self, acdc: &Acdc) -> Result<(), Error> {
        let references = acdc
            .edge_targets()
            .map_err(Error::from)?
            .into_iter()
            .map(|edge| Reference::Edge { credential_said: edge.node })
            .collect();
        let entry = IndexEntry::new(
            acdc.said().clone(),
            keri_core::event_message::EventTypeTag::Iss,
            0,
            None,
            Utc::now(),
            vec![],
            references,
        );
        self.put(&IdentifierPrefix::SelfAddressing(acdc.said().clone()), &entry)
    }

    fn append_reference(&self, log_id: &IdentifierPrefix, reference: Reference) -> Result<(), Error> {
        let mut entries = self.get(log_id)?;
        if let Some(last) = entries.last_mut() {
            if !last.references.contains(&reference) {
                last.references.push(reference);
            }
            let entry = last.clone();
            return self.put(log_id, &entry);
        }
        Ok(())
    }

    fn registry_for_credential(&self, credential_id: &IdentifierPrefix) -> Result<IdentifierPrefix, Error> {
        for entry in self.get(credential_id)? {
            for reference in &entry.references {
                if let Reference::CredentialRegistry { registry_id } = reference {
                    return Ok(registry_id.clone());
                }
            }
        }
        Err(keri_core::error::Error::StorageCorrupt(format!("no prior iss recorded for credential {}", credential_id.to_str())).into())
    }

    /// Rebuild `aid`'s KEL projection from scratch by replaying its
    /// committed events (§4.13: "regenerable from the primary event
    /// store"), the same crash-recovery shape
    /// `keri_core::processor::event_storage::compute_state` uses for
    /// `IdentifierState` itself.
    pub fn rebuild_kel(&self, kel: &KelStorage, aid: &IdentifierPrefix) -> Result<(), Error> {
        self.clear(aid)?;
        for signed in kel.get_kel_events(aid).map_err(Error::from)? {
            self.record_kel_event(&signed)?;
        }
        Ok(())
    }

    /// Rebuild one registry's projection from its committed `vcp` (there is
    /// only ever one, per `RegistryState`'s single-inception invariant).
    pub fn rebuild_registry(&self, tel: &TelStorage, registry_id: &IdentifierPrefix) -> Result<(), Error> {
        self.clear(registry_id)?;
        for event in tel.get_registry_events(registry_id).map_err(Error::from)? {
            self.record_registry_event(&event)?;
        }
        Ok(())
    }

    /// Rebuild one credential's projection from its committed `iss`/`rev`
    /// pair.
    pub fn rebuild_credential(&self, tel: &TelStorage, credential_id: &IdentifierPrefix) -> Result<(), Error> {
        self.clear(credential_id)?;
        for event in tel.get_credential_events(credential_id).map_err(Error::from)? {
            self.record_credential_event(&event)?;
        }
        Ok(())
    }
}

fn prior_digest(data: &EventData) -> Option<keri_core::sai::said::SelfAddressingIdentifier> {
    match data {
        EventData::Icp(_) | EventData::Dip(_) => None,
        EventData::Rot(e) => Some(e.previous_event_hash.clone()),
        EventData::Ixn(e) => Some(e.previous_event_hash.clone()),
        EventData::Drt(e) => Some(e.rotation_data.previous_event_hash.clone()),
    }
}
