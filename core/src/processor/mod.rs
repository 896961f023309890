//! `EventProcessor` (§7, §4.11): the single entry point a caller feeds wire
//! messages into. Ported from `keriox_core::processor::EventProcessor`,
//! narrowed to this crate's synchronous, escrow-by-`Notification` pipeline.

pub mod escrow;
pub mod event_storage;
pub mod notification;
pub mod validator;

use std::sync::Arc;

use crate::database::EventLog;
use crate::error::Error;
use crate::event_message::signed_event_message::Message;
use crate::prefix::Prefix;

use self::escrow::delegation::DelegationEscrow;
use self::escrow::out_of_order::OutOfOrderEscrow;
use self::escrow::partially_signed::PartiallySignedEscrow;
use self::escrow::partially_witnessed::PartiallyWitnessedEscrow;
use self::escrow::EscrowConfig;
use self::event_storage::EventStorage;
use self::notification::Notification;
use self::validator::EventValidator;

pub struct EventProcessor {
    storage: EventStorage,
    validator: EventValidator,
    out_of_order: OutOfOrderEscrow,
    partially_signed: PartiallySignedEscrow,
    partially_witnessed: PartiallyWitnessedEscrow,
    delegation: DelegationEscrow,
}

impl EventProcessor {
    pub fn new(db: Arc<dyn EventLog + Send + Sync>) -> Self {
        Self::with_escrow_config(db, EscrowConfig::default())
    }

    pub fn with_escrow_config(db: Arc<dyn EventLog + Send + Sync>, config: EscrowConfig) -> Self {
        let storage = EventStorage::new(db.clone());
        let validator = EventValidator::new(EventStorage::new(db.clone()));
        Self {
            storage,
            validator,
            out_of_order: OutOfOrderEscrow::new(db.clone(), config.out_of_order_timeout),
            partially_signed: PartiallySignedEscrow::new(db.clone(), config.partially_signed_timeout),
            partially_witnessed: PartiallyWitnessedEscrow::new(db.clone(), config.partially_witnessed_timeout),
            delegation: DelegationEscrow::new(db, config.delegation_timeout),
        }
    }

    /// Ingest one wire message: validate, commit on success, and map the
    /// locally-recoverable failure modes (§7) to the matching escrow
    /// `Notification` instead of surfacing them as hard errors.
    pub fn process(&self, message: Message) -> Result<Notification, Error> {
        match message {
            Message::Event(signed) => self.process_event(signed),
            Message::NontransferableRct(rct) => match self.validator.validate_witness_receipt(&rct) {
                Ok(true) => {
                    self.partially_witnessed.remove(
                        &self
                            .storage
                            .get_event_at_sn(&rct.body.data.prefix, rct.body.data.sn)?
                            .ok_or(Error::InvariantViolation("receipted event vanished".into()))?,
                    )?;
                    Ok(Notification::ReceiptAccepted)
                }
                Ok(false) => {
                    let event = self
                        .storage
                        .get_event_at_sn(&rct.body.data.prefix, rct.body.data.sn)?
                        .ok_or(Error::InvariantViolation("receipted event vanished".into()))?;
                    self.partially_witnessed.add(&event)?;
                    Ok(Notification::PartiallyWitnessed(event))
                }
                Err(Error::InvariantViolation(_)) => Ok(Notification::ReceiptOutOfOrder(rct)),
                Err(e) => Err(e),
            },
        }
    }

    fn process_event(&self, signed: crate::event_message::signed_event_message::SignedEventMessage) -> Result<Notification, Error> {
        match self.validator.validate_event(&signed) {
            Ok(new_state) => self.commit(signed, &new_state),
            Err(Error::OutOfOrderSequence { expected, got }) => {
                log::warn!("event at sn {got} escrowed out of order, expected sn {expected}");
                self.out_of_order.add(&signed)?;
                Ok(Notification::OutOfOrder(signed))
            }
            Err(Error::ThresholdNotMet { satisfied, .. }) => {
                let merged = self.partially_signed.add(&signed)?;
                match self.validator.validate_event(&merged) {
                    Ok(new_state) => self.commit(merged, &new_state),
                    Err(_) => {
                        log::debug!("event held in partially-signed escrow with {satisfied} signatures");
                        Ok(Notification::PartiallySigned(merged))
                    }
                }
            }
            Err(Error::DelegatorMissingAnchor(delegator)) => {
                log::warn!("event escrowed pending anchor from delegator {delegator}");
                self.delegation.add(&signed)?;
                Ok(Notification::DelegationPending(signed))
            }
            Err(Error::DuplicateEvent(_)) => Ok(Notification::DuplicitousEvent(signed)),
            Err(e) => Err(e),
        }
    }

    /// Finalize a validated event: persist it, clear it out of whichever
    /// escrow stage it came from (if any), start tracking it for witness
    /// receipts if it has a witness pool, and give any out-of-order events
    /// behind it a chance to close their gap.
    fn commit(
        &self,
        signed: crate::event_message::signed_event_message::SignedEventMessage,
        new_state: &crate::state::IdentifierState,
    ) -> Result<Notification, Error> {
        self.storage.add_kel_finalized_event(&signed)?;
        let aid = signed.event_message.data.prefix.to_str();
        log::debug!("{} accepted at sn {} ({:?})", aid, signed.event_message.data.sn, signed.event_type());
        self.out_of_order.remove(&signed)?;
        self.partially_signed.remove(&signed)?;
        self.delegation.remove(&signed)?;
        if !new_state.witness_config.witnesses.is_empty() {
            self.partially_witnessed.add(&signed)?;
        }
        self.retry_out_of_order(&aid)?;
        Ok(Notification::KeyEventAdded(signed))
    }

    /// Re-attempt every event escrowed as out-of-order for `aid` now that
    /// its state has just advanced, in sequence order, stopping at the
    /// first one that still doesn't fit (§4.7).
    fn retry_out_of_order(&self, aid: &str) -> Result<(), Error> {
        for pending in self.out_of_order.pending_for(aid)? {
            match self.process_event(pending) {
                Ok(Notification::KeyEventAdded(_)) => continue,
                _ => break,
            }
        }
        Ok(())
    }

    /// Re-attempt every delegation-pending event, promoting whichever ones
    /// the delegator's KEL has anchored since they were escrowed. Meant to
    /// be called after ingesting new events for a delegator, since nothing
    /// else would re-examine an already-rejected `dip`/`drt`.
    pub fn retry_delegation_pending(&self) -> Result<Vec<Notification>, Error> {
        let mut results = vec![];
        for pending in self.delegation.pending()? {
            results.push(self.process_event(pending)?);
        }
        Ok(results)
    }

    pub fn storage(&self) -> &EventStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::database::memory::MemoryLog;
    use crate::event::event_data::{EventData, InceptionEvent, InteractionEvent};
    use crate::event::sections::key_config::nxt_commitment;
    use crate::event::sections::KeyConfig;
    use crate::event::KeyEvent;
    use crate::event_message::msg::KeriEvent;
    use crate::event_message::signed_event_message::SignedEventMessage;
    use crate::prefix::{BasicPrefix, IdentifierPrefix, IndexedSignature, SelfSigningPrefix};
    use crate::sai::derivation::SelfAddressing;
    use crate::signer::Signer;
    use crate::threshold::SignatureThreshold;

    fn sign(signer: &Signer, wrapped: &KeriEvent<KeyEvent>, idx: u16) -> IndexedSignature {
        let sig_bytes = signer.sign(wrapped.encode().unwrap()).unwrap();
        IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(sig_bytes), idx)
    }

    fn signed_icp(signer: &Signer) -> SignedEventMessage {
        let key = BasicPrefix::Ed25519(signer.public_key());
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key.clone()], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key.clone()], next, Some(SignatureThreshold::simple(1)));
        let icp = InceptionEvent::new(key_config, None, None);
        let key_event = KeyEvent::new(IdentifierPrefix::Basic(key), 0, EventData::Icp(icp));
        let wrapped = KeriEvent::new(key_event, SelfAddressing::Blake3_256).unwrap();
        let sig = sign(signer, &wrapped, 0);
        SignedEventMessage::new(wrapped, vec![sig], None)
    }

    #[test]
    fn accepted_inception_is_committed_and_readable_back() {
        let db = Arc::new(MemoryLog::new());
        let processor = EventProcessor::new(db);
        let signer = Signer::new();
        let signed = signed_icp(&signer);
        let aid = signed.event_message.data.prefix.clone();

        let notification = processor.process(Message::Event(signed)).unwrap();
        assert!(matches!(notification, Notification::KeyEventAdded(_)));

        let state = processor.storage().get_state(&aid).unwrap().unwrap();
        assert_eq!(state.sn, 0);
    }

    #[test]
    fn unsigned_inception_is_escrowed_as_partially_signed() {
        let db = Arc::new(MemoryLog::new());
        let processor = EventProcessor::new(db);
        let signer = Signer::new();
        let mut signed = signed_icp(&signer);
        signed.signatures.clear();

        let notification = processor.process(Message::Event(signed)).unwrap();
        assert!(matches!(notification, Notification::PartiallySigned(_)));
    }

    /// S5 — delegated inception escrow (spec §8.5): a fully signed `dip`
    /// is held in `gdee` until the delegator's KEL grows an `ixn` anchoring
    /// `{i, s, d}` for it, at which point `retry_delegation_pending`
    /// promotes and commits it.
    #[test]
    fn delegated_inception_escrows_until_delegator_anchors_it() {
        use crate::event::builder::incept;
        use crate::event::event_data::{EventData, InteractionEvent};
        use crate::event::sections::key_config::nxt_commitment;
        use crate::event::sections::KeyConfig;
        use crate::keys::PublicKey;

        let db = Arc::new(MemoryLog::new());
        let processor = EventProcessor::new(db);

        let delegator_signer = Signer::new();
        let delegator_icp_signed = signed_icp(&delegator_signer);
        let delegator_aid = delegator_icp_signed.event_message.data.prefix.clone();
        assert!(matches!(
            processor.process(Message::Event(delegator_icp_signed.clone())).unwrap(),
            Notification::KeyEventAdded(_)
        ));

        let delegate_signer = Signer::new();
        let delegate_key = BasicPrefix::Ed25519(delegate_signer.public_key());
        let next = nxt_commitment(SignatureThreshold::simple(1), &[delegate_key.clone()], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![delegate_key], next, Some(SignatureThreshold::simple(1)));
        let dip_wrapped = incept(
            key_config,
            None,
            None,
            Some(delegator_aid.clone()),
            false,
            SelfAddressing::Blake3_256,
        )
        .unwrap();
        let delegate_aid = dip_wrapped.data.prefix.clone();
        let dip_digest = dip_wrapped.get_digest().unwrap();
        let dip_sig = sign(&delegate_signer, &dip_wrapped, 0);
        let dip_signed = SignedEventMessage::new(dip_wrapped, vec![dip_sig], None);

        let notification = processor.process(Message::Event(dip_signed)).unwrap();
        assert!(matches!(notification, Notification::DelegationPending(_)));
        assert!(processor.storage().get_state(&delegate_aid).unwrap().is_none());

        let anchoring_ixn = InteractionEvent::new(
            delegator_icp_signed.event_message.get_digest().unwrap(),
            vec![crate::event::sections::seal::EventSeal::new(delegate_aid.clone(), 0, dip_digest)],
        );
        let ixn_event = KeyEvent::new(delegator_aid.clone(), 1, EventData::Ixn(anchoring_ixn));
        let ixn_wrapped = KeriEvent::new(ixn_event, SelfAddressing::Blake3_256).unwrap();
        let ixn_sig = sign(&delegator_signer, &ixn_wrapped, 0);
        let ixn_signed = SignedEventMessage::new(ixn_wrapped, vec![ixn_sig], None);
        assert!(matches!(
            processor.process(Message::Event(ixn_signed)).unwrap(),
            Notification::KeyEventAdded(_)
        ));

        let results = processor.retry_delegation_pending().unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Notification::KeyEventAdded(_)));

        let delegate_state = processor.storage().get_state(&delegate_aid).unwrap().unwrap();
        assert_eq!(delegate_state.sn, 0);
        assert_eq!(delegate_state.delegator, Some(delegator_aid));
    }

    #[test]
    fn out_of_order_ixn_is_promoted_once_icp_arrives() {
        let db = Arc::new(MemoryLog::new());
        let processor = EventProcessor::new(db);
        let signer = Signer::new();
        let icp_signed = signed_icp(&signer);
        let aid = icp_signed.event_message.data.prefix.clone();
        let icp_digest = icp_signed.event_message.get_digest().unwrap();

        let ixn = InteractionEvent::new(icp_digest, vec![]);
        let ixn_event = KeyEvent::new(aid.clone(), 1, EventData::Ixn(ixn));
        let ixn_wrapped = KeriEvent::new(ixn_event, SelfAddressing::Blake3_256).unwrap();
        let ixn_sig = sign(&signer, &ixn_wrapped, 0);
        let ixn_signed = SignedEventMessage::new(ixn_wrapped, vec![ixn_sig], None);

        let notification = processor.process(Message::Event(ixn_signed)).unwrap();
        assert!(matches!(notification, Notification::OutOfOrder(_)));
        assert!(processor.storage().get_state(&aid).unwrap().is_none());

        let notification = processor.process(Message::Event(icp_signed)).unwrap();
        assert!(matches!(notification, Notification::KeyEventAdded(_)));

        let state = processor.storage().get_state(&aid).unwrap().unwrap();
        assert_eq!(state.sn, 1);
    }
}
