//! `EventData` (§3.2): the event-type-specific payload common to every KEL
//! event. Ported from `keriox_core::event::event_data::EventData`.

pub mod delegated;
pub mod inception;
pub mod interaction;
pub mod rotation;

use serde::{Deserialize, Serialize};

pub use delegated::{DelegatedInceptionEvent, DelegatedRotationEvent};
pub use inception::InceptionEvent;
pub use interaction::InteractionEvent;
pub use rotation::RotationEvent;

use crate::error::Error;
use crate::event::sections::KeyConfig;
use crate::event_message::{EventTypeTag, Typeable};
use crate::prefix::IdentifierPrefix;
use crate::state::{EventSemantics, IdentifierState};

// Variant order matters: `#[serde(untagged)]` tries each variant's
// `Deserialize` in declaration order and keeps the first that succeeds.
// `Dip`/`Drt` are strict supersets of `Icp`/`Rot` (same required fields plus
// `di`), so they must be tried first or a `dip`/`drt` event would silently
// deserialize as `icp`/`rot` with its `di` field dropped as unknown.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EventData {
    Dip(DelegatedInceptionEvent),
    Icp(InceptionEvent),
    Drt(DelegatedRotationEvent),
    Rot(RotationEvent),
    Ixn(InteractionEvent),
}

impl EventSemantics for EventData {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        match self {
            EventData::Icp(e) => e.apply_to(state),
            EventData::Rot(e) => e.apply_to(state),
            EventData::Ixn(e) => e.apply_to(state),
            EventData::Dip(e) => e.apply_to(state),
            EventData::Drt(e) => e.apply_to(state),
        }
    }
}

impl Typeable for EventData {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        match self {
            EventData::Icp(_) => EventTypeTag::Icp,
            EventData::Rot(_) => EventTypeTag::Rot,
            EventData::Ixn(_) => EventTypeTag::Ixn,
            EventData::Dip(_) => EventTypeTag::Dip,
            EventData::Drt(_) => EventTypeTag::Drt,
        }
    }
}

impl EventData {
    pub fn is_establishment(&self) -> bool {
        matches!(self, EventData::Icp(_) | EventData::Rot(_) | EventData::Dip(_) | EventData::Drt(_))
    }

    /// The key-configuration section an establishment event carries, for
    /// the validator to check signatures against (§4.7: `icp`/`dip` are
    /// self-signed by their own new keys; `rot`/`drt` are signed by the
    /// *prior* key set instead, so this is only useful for the self-signed
    /// inception case). `None` for `ixn`, which carries no key config.
    pub fn key_config(&self) -> Option<&KeyConfig> {
        match self {
            EventData::Icp(e) => Some(&e.key_config),
            EventData::Rot(e) => Some(&e.key_config),
            EventData::Dip(e) => Some(&e.inception_data.key_config),
            EventData::Drt(e) => Some(&e.rotation_data.key_config),
            EventData::Ixn(_) => None,
        }
    }

    /// The delegator AID carried by `dip`/`drt`, if any (§4.12).
    pub fn delegator(&self) -> Option<&IdentifierPrefix> {
        match self {
            EventData::Dip(e) => Some(&e.delegator),
            EventData::Drt(e) => Some(&e.delegator),
            _ => None,
        }
    }
}
