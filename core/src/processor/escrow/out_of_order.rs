//! The likely-out-of-order escrow (§4.7): an event whose `sn` is ahead of
//! the AID's current state. Promotion is driven purely by the gap closing
//! as earlier sequence numbers are accepted, re-running
//! `EventValidator::validate_event` with no change to the held event.
//! Ported in spirit from
//! `keriox_core::processor::escrow::maybe_out_of_order_escrow`.

use std::sync::Arc;
use std::time::Duration;

use crate::database::EventLog;
use crate::error::Error;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::Prefix;

use super::StageStore;

pub struct OutOfOrderEscrow {
    store: StageStore,
}

impl OutOfOrderEscrow {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>, timeout: Duration) -> Self {
        Self {
            store: StageStore::new(db, "ooe", timeout),
        }
    }

    pub fn add(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        self.store.put(signed)
    }

    pub fn remove(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let aid = signed.event_message.data.prefix.to_str();
        self.store.remove(&aid, signed.event_message.data.sn)
    }

    /// Everything held for `aid`, in sequence order, for the processor to
    /// retry after `aid`'s state has advanced (§4.7).
    pub fn pending_for(&self, aid: &str) -> Result<Vec<SignedEventMessage>, Error> {
        let mut entries = self
            .store
            .live_entries()?
            .into_iter()
            .filter(|e| e.event_message.data.prefix.to_str() == aid)
            .collect::<Vec<_>>();
        entries.sort_by_key(|e| e.event_message.data.sn);
        Ok(entries)
    }
}
