//! Outcomes the processor reports back to its caller after ingesting one
//! message (§7 propagation policy): `OutOfOrderSequence` and
//! `DelegatorMissingAnchor` are recovered locally by escrowing rather than
//! surfaced as hard errors, so `process` returns a `Notification` instead of
//! a bare `Result<(), Error>` for those cases. Ported from
//! `keriox_core::processor::notification::Notification`, narrowed to the
//! event ilks this crate actually ingests.

use crate::event_message::signed_event_message::{SignedEventMessage, SignedNontransferableReceipt};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Accepted and committed to the KEL.
    KeyEventAdded(SignedEventMessage),
    /// §4.7: held in the likely-out-of-order escrow until the gap closes.
    OutOfOrder(SignedEventMessage),
    /// §4.11 `gpse`: signatures accumulated so far do not satisfy `kt` yet.
    PartiallySigned(SignedEventMessage),
    /// §4.11 `gdee`: fully signed but the delegator's KEL has not anchored it.
    DelegationPending(SignedEventMessage),
    /// §4.11 `gpwe`: anchored (or non-delegated) but witness receipts don't
    /// satisfy `bt` yet.
    PartiallyWitnessed(SignedEventMessage),
    /// §7: rejected as a duplicate at an already-occupied sequence number.
    DuplicitousEvent(SignedEventMessage),
    /// A witness receipt accepted against an already-known event.
    ReceiptAccepted,
    /// A witness receipt arrived before the event it receipts.
    ReceiptOutOfOrder(SignedNontransferableReceipt),
}
