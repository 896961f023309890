//! `IndexEntry` (§4.13): one row of the append-only projection — enough to
//! answer "what happened, in what order, signed by whom, referencing what"
//! without re-decoding the underlying event from the primary store.

use chrono::{DateTime, Utc};
use keri_core::event_message::EventTypeTag;
use keri_core::prefix::IndexedSignature;
use keri_core::sai::said::SelfAddressingIdentifier;
use serde::{Deserialize, Serialize};

use crate::reference::Reference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The event's own SAID (KEL/TEL events' `d`, an ACDC's `d`).
    pub event_id: SelfAddressingIdentifier,
    pub event_type: EventTypeTag,
    pub sequence: u64,
    /// `None` for an inception/`vcp`/`iss`/ACDC entry, which carries no `p`.
    pub prior: Option<SelfAddressingIdentifier>,
    pub recorded_at: DateTime<Utc>,
    /// Empty for TEL/ACDC entries, which carry no indexed signatures of
    /// their own (signing lives one layer down, in the anchoring KEL).
    pub signatures: Vec<IndexedSignature>,
    pub references: Vec<Reference>,
}

impl IndexEntry {
    pub fn new(
        event_id: SelfAddressingIdentifier,
        event_type: EventTypeTag,
        sequence: u64,
        prior: Option<SelfAddressingIdentifier>,
        recorded_at: DateTime<Utc>,
        signatures: Vec<IndexedSignature>,
        references: Vec<Reference>,
    ) -> Self {
        Self {
            event_id,
            event_type,
            sequence,
            prior,
            recorded_at,
            signatures,
            references,
        }
    }
}
