//! `gpwe` (§4.11): a fully signed (and, if delegated, anchored) event whose
//! witness receipts don't yet satisfy `bt`. Promotion happens as witness
//! receipts arrive via `EventValidator::validate_witness_receipt`, not by
//! merging anything here — the event itself doesn't change, only the
//! receipt tally held alongside it in the KEL does. Ported in spirit from
//! `keriox_core::processor::escrow::partially_witnessed_escrow`.

use std::sync::Arc;
use std::time::Duration;

use crate::database::EventLog;
use crate::error::Error;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::Prefix;

use super::StageStore;

pub struct PartiallyWitnessedEscrow {
    store: StageStore,
}

impl PartiallyWitnessedEscrow {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>, timeout: Duration) -> Self {
        Self {
            store: StageStore::new(db, "gpwe", timeout),
        }
    }

    pub fn add(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        self.store.put(signed)
    }

    pub fn remove(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let aid = signed.event_message.data.prefix.to_str();
        self.store.remove(&aid, signed.event_message.data.sn)
    }

    pub fn pending(&self) -> Result<Vec<SignedEventMessage>, Error> {
        self.store.live_entries()
    }
}
