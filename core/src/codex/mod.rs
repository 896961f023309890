//! The codex: a static lookup table from CESR code strings to their payload
//! and textual widths. New primitives require a new table entry, not a new
//! type — algorithm/verfer/digest selection is a single switch on the code
//! string, the way `keriox_core::event_parsing::codes` is organized, split
//! here into one `DerivationCode` trait shared by every code family instead
//! of a family-per-module enum, since the codex itself is the L0 component
//! and every L1 primitive (Matter, Diger, Verfer, indexed signature) just
//! needs `(hard_size, soft_size, value_size)` for its own code.

use crate::error::Error;

/// A CESR derivation code: the hard (fixed) and soft (variable) parts of the
/// textual code prefix, plus the value size in base64 characters.
pub trait DerivationCode {
    /// Hard (fixed) part of the code size, in characters.
    fn hard_size(&self) -> usize;
    /// Soft (variable) part of the code size, in characters. Zero for every
    /// code this codex currently enumerates.
    fn soft_size(&self) -> usize {
        0
    }
    /// Payload size, in base64 characters (i.e. the textual length of just
    /// the encoded raw bytes, not including the code).
    fn value_size(&self) -> usize;
    /// Raw payload size in bytes implied by `value_size`.
    fn raw_size(&self) -> usize {
        (self.value_size() * 3) / 4
    }
    fn code_size(&self) -> usize {
        self.hard_size() + self.soft_size()
    }
    fn full_size(&self) -> usize {
        self.code_size() + self.value_size()
    }
    fn to_str(&self) -> String;
}

/// Counter codes for CESR attachment groups (§6.1): a counter is itself a
/// four-character CESR primitive whose "payload" is a count, prefixed to a
/// group of primitives rather than to raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterCode {
    /// `-A##` — indexed controller signature group, count = number of sigs.
    ControllerIdxSigs,
    /// `-B##` — non-transferable witness receipt couplets.
    WitnessIdxSigs,
    /// `-C##` — seal source couplets (sn + digest) anchoring a delegated event.
    SealSourceCouples,
}

impl CounterCode {
    pub fn prefix(&self) -> &'static str {
        match self {
            CounterCode::ControllerIdxSigs => "-A",
            CounterCode::WitnessIdxSigs => "-B",
            CounterCode::SealSourceCouples => "-C",
        }
    }

    pub fn from_prefix(s: &str) -> Result<Self, Error> {
        match s {
            "-A" => Ok(CounterCode::ControllerIdxSigs),
            "-B" => Ok(CounterCode::WitnessIdxSigs),
            "-C" => Ok(CounterCode::SealSourceCouples),
            _ => Err(Error::InvalidCode(s.to_string())),
        }
    }

    /// Encode a counter primitive: two-char code followed by a two-digit
    /// base64url count.
    pub fn encode(&self, count: u16) -> Result<String, Error> {
        if count > 4095 {
            return Err(Error::InvalidCode(format!("count {count} exceeds counter capacity")));
        }
        let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let hi = alphabet[(count as usize / 64) % 64] as char;
        let lo = alphabet[(count as usize % 64) % 64] as char;
        Ok(format!("{}{}{}", self.prefix(), hi, lo))
    }
}
