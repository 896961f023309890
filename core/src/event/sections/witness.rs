//! Witness configuration sections: `bt`/`b` on `icp`, `bt`/`br`/`ba` on
//! `rot`. Ported from `keriox_core::event::sections::{InceptionWitnessConfig,
//! RotationWitnessConfig}`.

use serde::{Deserialize, Serialize};

use crate::prefix::BasicPrefix;
use crate::state::WitnessConfig;
use crate::threshold::SignatureThreshold;

/// `bt`/`b`: the receipt threshold and initial witness pool set at
/// inception (§3.2).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InceptionWitnessConfig {
    #[serde(rename = "bt")]
    pub tally: SignatureThreshold,
    #[serde(rename = "b")]
    pub initial_witnesses: Vec<BasicPrefix>,
}

impl Default for InceptionWitnessConfig {
    fn default() -> Self {
        Self {
            tally: SignatureThreshold::simple(0),
            initial_witnesses: Vec::new(),
        }
    }
}

/// `bt`/`br`/`ba`: the receipt threshold plus pruned/grafted witnesses a
/// rotation applies to the pool (§3.2).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RotationWitnessConfig {
    #[serde(rename = "bt")]
    pub tally: SignatureThreshold,
    #[serde(rename = "br")]
    pub prune: Vec<BasicPrefix>,
    #[serde(rename = "ba")]
    pub graft: Vec<BasicPrefix>,
}

impl Default for RotationWitnessConfig {
    fn default() -> Self {
        Self {
            tally: SignatureThreshold::simple(0),
            prune: Vec::new(),
            graft: Vec::new(),
        }
    }
}

impl From<InceptionWitnessConfig> for WitnessConfig {
    fn from(iwc: InceptionWitnessConfig) -> Self {
        Self {
            tally: iwc.tally,
            witnesses: iwc.initial_witnesses,
        }
    }
}

impl RotationWitnessConfig {
    /// Apply this rotation's prune/graft to a witness pool, yielding the
    /// pool state for the new `bt` threshold.
    pub fn apply(&self, current: &[BasicPrefix]) -> Vec<BasicPrefix> {
        let mut next: Vec<BasicPrefix> = current
            .iter()
            .filter(|w| !self.prune.contains(w))
            .cloned()
            .collect();
        for w in &self.graft {
            if !next.contains(w) {
                next.push(w.clone());
            }
        }
        next
    }
}
