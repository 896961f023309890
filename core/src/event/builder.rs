//! Inception builder (§4.7): decides the AID derivation mode and frames a
//! complete, self-verifying `icp`/`dip` event. Ported in spirit from
//! `keriox_core::event::event_data::inception`'s `incept_keys` helper,
//! generalized to the self-addressing-vs-nontransferable decision spec.md
//! §9 leaves to the implementer.

use crate::error::Error;
use crate::event::event_data::{DelegatedInceptionEvent, EventData, InceptionEvent};
use crate::event::sections::{InceptionWitnessConfig, KeyConfig};
use crate::event::KeyEvent;
use crate::event_message::dummy_event::frame_and_said_self_addressing;
use crate::event_message::msg::KeriEvent;
use crate::event_message::EventTypeTag;
use crate::prefix::IdentifierPrefix;
use crate::sai::derivation::SelfAddressing;

/// Does this `icp`/`dip` shape self-address its AID (§4.7, §9 "derivation
/// mode selection")? Delegation, more than one signing key, or an
/// explicitly supplied threshold all force self-addressing; a single key
/// with a defaulted threshold uses the key itself as the AID.
///
/// Pins the open question at the caller boundary: "explicit" tracks
/// whether the caller passed a threshold in, not whether the value differs
/// from what `KeyConfig::new`'s default would have produced — so a caller
/// that writes `isith="1"` for a single key gets a self-addressing AID
/// even though `1` is also the default, while a caller that omits the
/// threshold entirely for that same single key gets the non-transferable
/// form.
pub fn is_self_addressing(key_count: usize, explicit_threshold: bool, delegator: Option<&IdentifierPrefix>) -> bool {
    delegator.is_some() || explicit_threshold || key_count > 1
}

/// Build a complete `icp` (or `dip`, if `delegator` is given), picking the
/// AID derivation mode per [`is_self_addressing`] and saidifying
/// accordingly.
pub fn incept(
    key_config: KeyConfig,
    witness_config: Option<InceptionWitnessConfig>,
    inception_config: Option<Vec<String>>,
    delegator: Option<IdentifierPrefix>,
    explicit_threshold: bool,
    derivation: SelfAddressing,
) -> Result<KeriEvent<KeyEvent>, Error> {
    let self_addressing = is_self_addressing(key_config.public_keys.len(), explicit_threshold, delegator.as_ref());
    let icp = InceptionEvent::new(key_config.clone(), witness_config, inception_config);

    let (event_data, event_type) = match delegator {
        Some(delegator) => (
            EventData::Dip(DelegatedInceptionEvent {
                inception_data: icp,
                delegator,
            }),
            EventTypeTag::Dip,
        ),
        None => (EventData::Icp(icp), EventTypeTag::Icp),
    };

    if self_addressing {
        let (info, said, _) = frame_and_said_self_addressing(event_type, 0, &event_data, derivation)?;
        let key_event = KeyEvent::new(IdentifierPrefix::SelfAddressing(said.clone()), 0, event_data);
        Ok(KeriEvent {
            serialization_info: info,
            digest: Some(said),
            data: key_event,
        })
    } else {
        let key = key_config
            .public_keys
            .first()
            .ok_or_else(|| Error::InvariantViolation("inception requires at least one key".into()))?
            .clone();
        let key_event = KeyEvent::new(IdentifierPrefix::Basic(key), 0, event_data);
        KeriEvent::new(key_event, derivation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::sections::key_config::nxt_commitment;
    use crate::keys::PublicKey;
    use crate::prefix::BasicPrefix;
    use crate::threshold::SignatureThreshold;

    fn key(byte: u8) -> BasicPrefix {
        BasicPrefix::Ed25519(PublicKey::new(vec![byte; 32]))
    }

    /// S2 — a single key with a defaulted threshold derives a
    /// non-transferable AID equal to the key itself (spec §8.2).
    #[test]
    fn single_key_defaulted_threshold_is_nontransferable() {
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key(2)], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key(1)], next, None);
        let event = incept(key_config.clone(), None, None, None, false, SelfAddressing::Blake3_256).unwrap();
        assert_eq!(event.data.prefix, IdentifierPrefix::Basic(key_config.public_keys[0].clone()));
        assert!(event.verify_digest().unwrap());
    }

    /// S3 — multiple keys always self-address regardless of `explicit_threshold`.
    #[test]
    fn multi_key_inception_self_addresses() {
        let next = nxt_commitment(SignatureThreshold::simple(2), &[key(4), key(5), key(6)], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key(1), key(2), key(3)], next, Some(SignatureThreshold::simple(2)));
        let event = incept(key_config, None, None, None, false, SelfAddressing::Blake3_256).unwrap();
        match event.data.prefix {
            IdentifierPrefix::SelfAddressing(ref said) => assert_eq!(*said, event.get_digest().unwrap()),
            _ => panic!("expected a self-addressing AID"),
        }
        assert!(event.verify_digest().unwrap());
    }

    /// Open question pinned: a single key with an *explicit* threshold
    /// self-addresses even though the threshold value (`1`) matches the
    /// default that would have been picked implicitly.
    #[test]
    fn single_key_explicit_threshold_self_addresses() {
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key(2)], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key(1)], next, Some(SignatureThreshold::simple(1)));
        let event = incept(key_config, None, None, None, true, SelfAddressing::Blake3_256).unwrap();
        assert!(matches!(event.data.prefix, IdentifierPrefix::SelfAddressing(_)));
        assert!(event.verify_digest().unwrap());
    }
}
