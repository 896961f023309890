//! `gpse` (§4.11): an event whose accumulated indexed signatures do not yet
//! satisfy its signing threshold. New contributions are merged by index
//! until the threshold check in `EventValidator` passes. Ported in spirit
//! from `keriox_core::processor::escrow::partially_signed_escrow`.

use std::sync::Arc;
use std::time::Duration;

use crate::database::EventLog;
use crate::error::Error;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::Prefix;

use super::StageStore;

pub struct PartiallySignedEscrow {
    store: StageStore,
}

impl PartiallySignedEscrow {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>, timeout: Duration) -> Self {
        Self {
            store: StageStore::new(db, "gpse", timeout),
        }
    }

    /// Merge `signed`'s signatures into whatever is already escrowed for
    /// the same event, deduplicating by signer index, and persist the
    /// union (§4.11: contributions from different parties accumulate
    /// rather than overwrite each other).
    pub fn add(&self, signed: &SignedEventMessage) -> Result<SignedEventMessage, Error> {
        let aid = signed.event_message.data.prefix.to_str();
        let sn = signed.event_message.data.sn;
        let merged = match self.store.get(&aid, sn)? {
            Some((_, existing)) if existing.event_message == signed.event_message => {
                let mut signatures = existing.signatures;
                for sig in &signed.signatures {
                    if !signatures.contains(sig) {
                        signatures.push(sig.clone());
                    }
                }
                SignedEventMessage {
                    signatures,
                    ..signed.clone()
                }
            }
            _ => signed.clone(),
        };
        self.store.put(&merged)?;
        Ok(merged)
    }

    pub fn remove(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let aid = signed.event_message.data.prefix.to_str();
        self.store.remove(&aid, signed.event_message.data.sn)
    }

    pub fn pending(&self) -> Result<Vec<SignedEventMessage>, Error> {
        self.store.live_entries()
    }
}
