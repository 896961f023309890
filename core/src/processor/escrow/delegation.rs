//! `gdee` (§4.11, §4.12): a fully signed `dip`/`drt` whose delegator has not
//! yet anchored it. Promotion is driven by the delegator's own KEL growing
//! an `ixn`/`icp` with a matching seal, checked via
//! `EventValidator::check_delegation_anchor`. Ported in spirit from
//! `keriox_core::processor::escrow::delegation_escrow`.

use std::sync::Arc;
use std::time::Duration;

use crate::database::EventLog;
use crate::error::Error;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::Prefix;

use super::StageStore;

pub struct DelegationEscrow {
    store: StageStore,
}

impl DelegationEscrow {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>, timeout: Duration) -> Self {
        Self {
            store: StageStore::new(db, "gdee", timeout),
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
