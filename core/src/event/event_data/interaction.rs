//! `ixn` (§4.7): anchors external seals without changing key state. Ported
//! from `keriox_core::event::event_data::interaction::InteractionEvent`.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::sections::seal::Seal;
use crate::event_message::{EventTypeTag, Typeable};
use crate::sai::said::SelfAddressingIdentifier;
use crate::state::{EventSemantics, IdentifierState};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    #[serde(rename = "p")]
    pub previous_event_hash: SelfAddressingIdentifier,
    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

impl InteractionEvent {
    pub fn new(previous_event_hash: SelfAddressingIdentifier, data: Vec<Seal>) -> Self {
        Self {
            previous_event_hash,
            data,
        }
    }
}

impl Typeable for InteractionEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Ixn
    }
}

impl EventSemantics for InteractionEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        if self.previous_event_hash != state.last_event_digest {
            return Err(Error::PriorMismatch);
        }
        Ok(state)
    }
}
