use core::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::matter;

use super::Prefix;

/// A signature, CESR-framed. `0B` is the only code this crate emits
/// (Ed25519 over SHA-512, 64-byte signature) — see §3.1.
#[derive(PartialEq, Eq, Clone, Hash)]
pub enum SelfSigningPrefix {
    Ed25519Sha512(Vec<u8>),
}

impl fmt::Debug for SelfSigningPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str())
    }
}

impl SelfSigningPrefix {
    pub fn new(signature: Vec<u8>) -> Self {
        Self::Ed25519Sha512(signature)
    }

    pub fn signature(&self) -> &[u8] {
        match self {
            Self::Ed25519Sha512(sig) => sig,
        }
    }
}

impl Prefix for SelfSigningPrefix {
    fn derivative(&self) -> Vec<u8> {
        self.signature().to_vec()
    }

    fn derivation_code(&self) -> String {
        "0B".to_string()
    }
}

impl FromStr for SelfSigningPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 88 {
            return Err(Error::TruncatedInput {
                expected: 88,
                got: s.len(),
            });
        }
        let (code, raw) = matter::decode_text(s, 2, matter::pad_size(64))?;
        match code.as_str() {
            "0B" => Ok(SelfSigningPrefix::Ed25519Sha512(raw)),
            other => Err(Error::InvalidCode(other.to_string())),
        }
    }
}

impl Serialize for SelfSigningPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for SelfSigningPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
