//! `KeyEvent` (§3.2): the `i`/`s` envelope common to every KEL event ilk,
//! wrapping the ilk-specific `EventData`. Ported from
//! `keriox_core::event::KeyEvent`.

pub mod builder;
pub mod event_data;
pub mod receipt;
pub mod sections;

use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

use crate::error::Error;
use crate::event_message::{EventTypeTag, Typeable};
use crate::prefix::IdentifierPrefix;
use crate::state::{EventSemantics, IdentifierState};

use self::event_data::EventData;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KeyEvent {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,
    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,
    #[serde(flatten)]
    pub event_data: EventData,
}

impl KeyEvent {
    pub fn new(prefix: IdentifierPrefix, sn: u64, event_data: EventData) -> Self {
        Self {
            prefix,
            sn,
            event_data,
        }
    }
}

impl Typeable for KeyEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        self.event_data.get_type()
    }
}

impl EventSemantics for KeyEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        match &self.event_data {
            EventData::Icp(_) | EventData::Dip(_) => {
                if state.prefix != IdentifierPrefix::default() {
                    return Err(Error::DuplicateEvent(self.sn));
                }
                if self.sn != 0 {
                    return Err(Error::OutOfOrderSequence {
                        expected: 0,
                        got: self.sn,
                    });
                }
            }
            _ => {
                if self.prefix != state.prefix {
                    return Err(Error::InvariantViolation("event prefix does not match identifier state".into()));
                }
                if self.sn <= state.sn {
                    return Err(Error::DuplicateEvent(self.sn));
                }
                if self.sn > state.sn + 1 {
                    return Err(Error::OutOfOrderSequence {
                        expected: state.sn + 1,
                        got: self.sn,
                    });
                }
            }
        }
        self.event_data.apply_to(IdentifierState {
            sn: self.sn,
            prefix: self.prefix.clone(),
            last_event_type: Some(self.get_type()),
            ..state
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_data::InceptionEvent;
    use crate::event::sections::key_config::nxt_commitment;
    use crate::event::sections::KeyConfig;
    use crate::event_message::msg::KeriEvent;
    use crate::keys::PublicKey;
    use crate::prefix::BasicPrefix;
    use crate::sai::derivation::SelfAddressing;
    use crate::sai::said::SelfAddressingIdentifier;
    use crate::threshold::SignatureThreshold;

    fn key(byte: u8) -> BasicPrefix {
        BasicPrefix::Ed25519(PublicKey::new(vec![byte; 32]))
    }

    #[test]
    fn icp_establishes_state_from_default() {
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key(2)], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key(1)], next, Some(SignatureThreshold::simple(1)));
        let icp = InceptionEvent::new(key_config.clone(), None, None);
        let event = KeriEvent::new(EventData::Icp(icp), SelfAddressing::Blake3_256).unwrap();
        let digest = event.get_digest().unwrap();

        let key_event = KeyEvent::new(
            IdentifierPrefix::SelfAddressing(digest),
            0,
            event.data.clone(),
        );
        let state = key_event.apply_to(IdentifierState::default()).unwrap();
        assert_eq!(state.sn, 0);
        assert_eq!(state.current, key_config);
    }

    #[test]
    fn second_icp_on_established_state_is_rejected() {
        let state = IdentifierState {
            prefix: IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::derive(
                SelfAddressing::Blake3_256,
                b"already incepted",
            )),
            ..Default::default()
        };
        let next = nxt_commitment(SignatureThreshold::simple(1), &[key(2)], SelfAddressing::Blake3_256);
        let key_config = KeyConfig::new(vec![key(1)], next, Some(SignatureThreshold::simple(1)));
        let icp = InceptionEvent::new(key_config, None, None);
        let key_event = KeyEvent::new(state.prefix.clone(), 0, EventData::Icp(icp));
        assert!(matches!(key_event.apply_to(state), Err(Error::DuplicateEvent(_))));
    }
}
