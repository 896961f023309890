use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codex::DerivationCode;
use crate::error::Error;
use crate::keys::PublicKey;
use crate::matter;

use super::Prefix;

/// A verfer: an Ed25519 public verification key, CESR-framed. `D` is
/// transferable (the controller may rotate away from it — readers must
/// resolve the current key via the KEL), `B` is non-transferable (the key
/// itself *is* the AID and never rotates), per §3.1.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum BasicPrefix {
    Ed25519(PublicKey),
    Ed25519NT(PublicKey),
}

impl BasicPrefix {
    pub fn is_transferable(&self) -> bool {
        matches!(self, BasicPrefix::Ed25519(_))
    }

    pub fn public_key(&self) -> &PublicKey {
        match self {
            BasicPrefix::Ed25519(pk) | BasicPrefix::Ed25519NT(pk) => pk,
        }
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        self.public_key().verify(data, signature)
    }
}

impl Prefix for BasicPrefix {
    fn derivative(&self) -> Vec<u8> {
        self.public_key().key()
    }

    fn derivation_code(&self) -> String {
        match self {
            BasicPrefix::Ed25519(_) => "D".to_string(),
            BasicPrefix::Ed25519NT(_) => "B".to_string(),
        }
    }
}

impl FromStr for BasicPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 44 {
            return Err(Error::TruncatedInput {
                expected: 44,
                got: s.len(),
            });
        }
        let (code, raw) = matter::decode_text(s, 1, matter::pad_size(32))?;
        match code.as_str() {
            "D" => Ok(BasicPrefix::Ed25519(PublicKey::new(raw))),
            "B" => Ok(BasicPrefix::Ed25519NT(PublicKey::new(raw))),
            other => Err(Error::InvalidCode(other.to_string())),
        }
    }
}

impl Serialize for BasicPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for BasicPrefix {
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
    fn zero_key_round_trip() {
        let bp = BasicPrefix::Ed25519NT(PublicKey::new(vec![0u8; 32]));
        assert_eq!(bp.to_str(), "BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
        let parsed: BasicPrefix = bp.to_str().parse().unwrap();
        assert_eq!(parsed, bp);
    }
}
