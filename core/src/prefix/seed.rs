use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::keys::{PrivateKey, PublicKey};
use crate::matter;

use super::Prefix;

/// A seed: an Ed25519 private-scalar carrier, code `A`, 32 raw bytes (§3.1).
#[derive(Clone, PartialEq, Eq)]
pub enum SeedPrefix {
    RandomSeed256Ed25519(Vec<u8>),
}

impl SeedPrefix {
    pub fn derive_key_pair(&self) -> Result<(PublicKey, PrivateKey), Error> {
        match self {
            SeedPrefix::RandomSeed256Ed25519(seed) => {
                let secret = ed25519_dalek::SecretKey::from_bytes(seed)?;
                let public = ed25519_dalek::PublicKey::from(&secret);
                Ok((
                    PublicKey::new(public.to_bytes().to_vec()),
                    PrivateKey::new(secret.to_bytes().to_vec()),
                ))
            }
        }
    }
}

impl Prefix for SeedPrefix {
    fn derivative(&self) -> Vec<u8> {
        match self {
            SeedPrefix::RandomSeed256Ed25519(seed) => seed.clone(),
        }
    }

    fn derivation_code(&self) -> String {
        "A".to_string()
    }
}

impl FromStr for SeedPrefix {
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
            "A" => Ok(SeedPrefix::RandomSeed256Ed25519(raw)),
            other => Err(Error::InvalidCode(other.to_string())),
        }
    }
}

impl Serialize for SeedPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for SeedPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
