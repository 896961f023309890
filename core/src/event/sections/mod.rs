pub mod key_config;
pub mod seal;
pub mod witness;

pub use key_config::{nxt_commitment, KeyConfig, NextKeysData};
pub use seal::{EventSeal, Seal, SourceSeal};
pub use witness::{InceptionWitnessConfig, RotationWitnessConfig};
