use core::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codex::DerivationCode;
use crate::error::Error;
use crate::matter;

use super::derivation::SelfAddressing;

/// A SAID: a self-addressing digest, CESR-encoded as a Matter primitive. The
/// struct pairs the digest algorithm (so the codex entry is known without a
/// lookup) with the raw digest bytes, mirroring
/// `keriox_core::prefix::self_addressing::SelfAddressingPrefix`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SelfAddressingIdentifier {
    pub derivation: SelfAddressing,
    pub digest: Vec<u8>,
}

impl fmt::Debug for SelfAddressingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str())
    }
}

impl SelfAddressingIdentifier {
    pub fn new(derivation: SelfAddressing, digest: Vec<u8>) -> Self {
        Self { derivation, digest }
    }

    /// Compute the SAID of `data` under `derivation`.
    pub fn derive(derivation: SelfAddressing, data: &[u8]) -> Self {
        Self {
            derivation,
            digest: derivation.digest(data),
        }
    }

    /// Recompute the digest of `data` and compare against `self`.
    pub fn verify_binding(&self, data: &[u8]) -> bool {
        self.derivation.digest(data) == self.digest
    }

    pub fn to_str(&self) -> String {
        matter::encode_text(&self.derivation.to_str(), &self.digest)
            .expect("digest length always matches its derivation code")
    }

    /// Length, in characters, of this algorithm's CESR text form — used by
    /// the SAIDifier to build a placeholder of matching width (§4.4).
    pub fn text_len(derivation: SelfAddressing) -> usize {
        derivation.full_size()
    }
}

impl fmt::Display for SelfAddressingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Default for SelfAddressingIdentifier {
    fn default() -> Self {
        Self {
            derivation: SelfAddressing::Blake3_256,
            digest: vec![0; 32],
        }
    }
}

impl FromStr for SelfAddressingIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let derivation = SelfAddressing::from_str(s)?;
        let cs = derivation.code_size();
        let ps = crate::matter::pad_size(derivation.raw_size());
        if s.len() != derivation.full_size() {
            return Err(Error::TruncatedInput {
                expected: derivation.full_size(),
                got: s.len(),
            });
        }
        let (_, digest) = matter::decode_text(s, cs, ps)?;
        Ok(Self { derivation, digest })
    }
}

impl Serialize for SelfAddressingIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for SelfAddressingIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keripy_vector() {
        let to_digest = "abcdefghijklmnopqrstuvwxyz0123456789";
        let said = SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, to_digest.as_bytes());
        assert!(said.verify_binding(to_digest.as_bytes()));
        assert_eq!(said.to_str(), "ELC5L3iBVD77d_MYbYGGCUQgqQBju1o4x1Ud-z2sL-ux");
    }

    #[test]
    fn round_trip() {
        let said = SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, b"hello there");
        let text = said.to_str();
        let parsed: SelfAddressingIdentifier = text.parse().unwrap();
        assert_eq!(parsed, said);
    }
}
