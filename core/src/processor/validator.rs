//! `EventValidator` (§4.7, §4.12): checks a candidate event's signatures
//! against the right key set, applies the state-machine transition, and
//! checks delegation anchoring. Ported from
//! `keriox_core::processor::validator::EventValidator`.

use crate::error::Error;
use crate::event::event_data::EventData;
use crate::event::sections::seal::EventSeal;
use crate::event_message::signed_event_message::SignedEventMessage;
use crate::prefix::IdentifierPrefix;
use crate::state::IdentifierState;

use super::event_storage::EventStorage;

pub struct EventValidator {
    pub storage: EventStorage,
}

impl EventValidator {
    pub fn new(storage: EventStorage) -> Self {
        Self { storage }
    }

    /// Validate `signed` against the committed state for its AID. Returns
    /// the new state on success. `Error::ThresholdNotMet`,
    /// `Error::OutOfOrderSequence` and `Error::DelegatorMissingAnchor` are
    /// the three outcomes the processor recovers locally by escrowing
    /// (§7); every other `Err` is a hard refusal that must leave state
    /// unchanged.
    pub fn validate_event(&self, signed: &SignedEventMessage) -> Result<IdentifierState, Error> {
        let key_event = &signed.event_message.data;
        let aid = &key_event.prefix;
        let prior_state = self.storage.get_state(aid)?;
        let message_bytes = signed.event_message.encode()?;

        let verifying_key_config = match &prior_state {
            None => key_event
                .event_data
                .key_config()
                .ok_or_else(|| Error::InvariantViolation("first event for an AID must be an inception".into()))?
                .clone(),
            Some(state) => {
                if key_event.sn <= state.sn {
                    return Err(Error::DuplicateEvent(key_event.sn));
                }
                if key_event.sn > state.sn + 1 {
                    return Err(Error::OutOfOrderSequence {
                        expected: state.sn + 1,
                        got: key_event.sn,
                    });
                }
                // `ixn`/`rot`/`drt` are signed by the key set already in
                // force, not the one a `rot`/`drt` is about to install.
                state.current.clone()
            }
        };

        verifying_key_config.verify(&message_bytes, &signed.signatures)?;

        let mut new_state = match &prior_state {
            None => IdentifierState::default().apply(key_event)?,
            Some(state) => state.clone().apply(key_event)?,
        };
        // `KeyEvent::apply_to` only knows the `i`/`s`/event-data envelope;
        // the event's own SAID lives on the wrapping `KeriEvent`, so the
        // chain-tip digest `ixn`/`rot` check against `p` (§3.3, §8.3) has
        // to be stamped in here once it's available.
        new_state.last_event_digest = signed.event_message.get_digest()?;

        if let Some(delegator) = key_event.event_data.delegator() {
            self.check_delegation_anchor(delegator, aid, key_event.sn, signed)?;
        }

        Ok(new_state)
    }

    /// §4.12: a `dip`/`drt` is acceptable only once the delegator's KEL
    /// contains an `ixn` whose `a` seals include `{i, s, d}` matching the
    /// delegated event.
    pub fn check_delegation_anchor(
        &self,
        delegator: &IdentifierPrefix,
        delegated_aid: &IdentifierPrefix,
        delegated_sn: u64,
        signed: &SignedEventMessage,
    ) -> Result<(), Error> {
        let digest = signed
            .event_message
            .get_digest()
            .map_err(|_| Error::InvariantViolation("delegated event has no digest".into()))?;
        let target = EventSeal::new(delegated_aid.clone(), delegated_sn, digest);

        let delegator_events = self.storage.get_kel_events(delegator)?;
        let anchored = delegator_events.iter().any(|event| match &event.event_message.data.event_data {
            EventData::Ixn(ixn) => ixn.data.iter().any(|seal| {
                seal.matches(&target.prefix, target.sn, &target.event_digest)
            }),
            EventData::Icp(icp) => icp.data.iter().any(|seal| {
                seal.matches(&target.prefix, target.sn, &target.event_digest)
            }),
            _ => false,
        });

        if anchored {
            Ok(())
        } else {
            Err(Error::DelegatorMissingAnchor(delegator.clone()))
        }
    }

    /// Verify a witness receipt's couplets against the receipted event's
    /// committed witness pool.
    pub fn validate_witness_receipt(
        &self,
        receipt: &crate::event_message::signed_event_message::SignedNontransferableReceipt,
    ) -> Result<bool, Error> {
        let body = &receipt.body.data;
        let receipted = self
            .storage
            .get_event_at_sn(&body.prefix, body.sn)?
            .ok_or_else(|| Error::InvariantViolation("receipt for unknown event".into()))?;
        let state = self
            .storage
            .get_state(&body.prefix)?
            .ok_or_else(|| Error::InvariantViolation("no state for receipted AID".into()))?;
        if body.receipted_event_digest != receipted.event_message.get_digest()? {
            return Err(Error::DigestMismatch);
        }
        state.witness_config.enough_receipts(&receipt.witness_signatures)
    }
}
