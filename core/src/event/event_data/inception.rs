//! `icp` (§4.7): establishes a new identifier's initial key state. Ported
//! from `keriox_core::event::event_data::inception::InceptionEvent`.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::sections::seal::Seal;
use crate::event::sections::{InceptionWitnessConfig, KeyConfig};
use crate::event_message::{EventTypeTag, Typeable};
use crate::state::{EventSemantics, IdentifierState, LastEstablishmentData};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InceptionEvent {
    #[serde(flatten)]
    pub key_config: KeyConfig,
    #[serde(flatten)]
    pub witness_config: InceptionWitnessConfig,
    #[serde(rename = "c")]
    pub inception_configuration: Vec<String>,
    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

impl InceptionEvent {
    pub fn new(
        key_config: KeyConfig,
        witness_config: Option<InceptionWitnessConfig>,
        inception_config: Option<Vec<String>>,
    ) -> Self {
        Self {
            key_config,
            witness_config: witness_config.unwrap_or_default(),
            inception_configuration: inception_config.unwrap_or_default(),
            data: vec![],
        }
    }
}

impl Typeable for InceptionEvent {
    type TypeTag = EventTypeTag;
    fn get_type(&self) -> EventTypeTag {
        EventTypeTag::Icp
    }
}

impl EventSemantics for InceptionEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        if state.sn != 0 || state.prefix != Default::default() {
            return Err(Error::DuplicateEvent(0));
        }
        let last_est = LastEstablishmentData {
            sn: 0,
            digest: state.last_event_digest.clone(),
            br: vec![],
            ba: vec![],
        };
        Ok(IdentifierState {
            current: self.key_config.clone(),
            witness_config: self.witness_config.clone().into(),
            last_est,
            ..state
        })
    }
}
