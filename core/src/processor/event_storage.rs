//! Read access to the committed KEL/TEL (§6.3): wraps the raw `EventLog`
//! contract with the key layout from `database::keys` and replays events to
//! produce the accumulated `IdentifierState` on demand. Ported from
//! `keriox_core::processor::event_storage::EventStorage` /
//! `keriox_core::processor::compute_state`.

use std::sync::Arc;

use crate::database::{keys, EventLog};
use crate::error::Error;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::{IdentifierPrefix, Prefix};
use crate::state::IdentifierState;

pub struct EventStorage {
    pub db: Arc<dyn EventLog + Send + Sync>,
}

impl EventStorage {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self { db }
    }

    /// Append a validated event at its key (§6.3's content-addressed
    /// put-if-absent contract — by the time this is called the caller has
    /// already checked `sn` is the next expected one, so a collision here
    /// would only happen for malformed input).
    pub fn add_kel_finalized_event(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let aid = signed.event_message.data.prefix.to_str();
        let sn = signed.event_message.data.sn;
        let key = keys::kel_event(&aid, sn);
        self.db.put(&key, &signed.encode()?)?;
        self.db.put(&keys::kel_head(&aid), sn.to_string().as_bytes())?;
        Ok(())
    }

    /// Every event committed for `id`, in sequence order.
    pub fn get_kel_events(&self, id: &IdentifierPrefix) -> Result<Vec<SignedEventMessage>, Error> {
        let aid = id.to_str();
        let rows = self.db.list(&keys::kel_prefix(&aid))?;
        rows.into_iter()
            .filter(|(k, _)| !k.ends_with("/head"))
            .map(|(_, v)| match crate::event_message::signed_event_message::parse_message(&v)?.0 {
                crate::event_message::signed_event_message::Message::Event(e) => Ok(e),
                _ => Err(Error::StorageCorrupt("kel entry is not an event".into())),
            })
            .collect()
    }

    pub fn get_event_at_sn(&self, id: &IdentifierPrefix, sn: u64) -> Result<Option<SignedEventMessage>, Error> {
        let key = keys::kel_event(&id.to_str(), sn);
        match self.db.get(&key)? {
            None => Ok(None),
            Some(bytes) => match crate::event_message::signed_event_message::parse_message(&bytes)?.0 {
                crate::event_message::signed_event_message::Message::Event(e) => Ok(Some(e)),
                _ => Err(Error::StorageCorrupt("kel entry is not an event".into())),
            },
        }
    }

    /// The accumulated state after replaying every committed event for
    /// `id`, or `None` if nothing has been accepted yet (§4.7).
    pub fn get_state(&self, id: &IdentifierPrefix) -> Result<Option<IdentifierState>, Error> {
        compute_state(&self.get_kel_events(id)?)
    }
}

/// Fold a sequence-ordered run of committed events into the `IdentifierState`
/// they produce, the way `keriox_core::processor::compute_state` replays a
/// whole KERL from scratch rather than persisting derived state separately —
/// the indexer (§4.13) is regenerable for the same reason.
pub fn compute_state(events: &[SignedEventMessage]) -> Result<Option<IdentifierState>, Error> {
    if events.is_empty() {
        return Ok(None);
    }
    let mut state = IdentifierState::default();
    for event in events {
        state = state.apply(&event.event_message.data)?;
        state.last_event_digest = event.event_message.get_digest()?;
    }
    Ok(Some(state))
}
