//! Digest algorithm selection, generalized from
//! `keriox_core::sai::derivation::SelfAddressing` (there the Blake2 variants
//! carry a MAC key for keyed hashing; that use case is out of this crate's
//! scope, so the variants here are plain).

use std::str::FromStr;

use crate::codex::DerivationCode;
use crate::error::Error;

use super::digest;

/// Self-addressing digest algorithm. Default for SAIDs is `Blake3_256`
/// (§4.2); the others are supported so the codex stays data-driven rather
/// than hard-coding one algorithm into every caller.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SelfAddressing {
    Blake3_256,
    Blake2B256,
    Blake2S256,
    Sha3_256,
    Sha2_256,
    Blake3_512,
    Sha3_512,
    Blake2B512,
    Sha2_512,
}

impl Default for SelfAddressing {
    fn default() -> Self {
        SelfAddressing::Blake3_256
    }
}

impl SelfAddressing {
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Blake3_256 => digest::blake3_256_digest(data),
            Self::Blake2B256 => digest::blake2b_256_digest(data),
            Self::Blake2S256 => digest::blake2s_256_digest(data),
            Self::Sha3_256 => digest::sha3_256_digest(data),
            Self::Sha2_256 => digest::sha2_256_digest(data),
            Self::Blake3_512 => digest::blake3_512_digest(data),
            Self::Sha3_512 => digest::sha3_512_digest(data),
            Self::Blake2B512 => digest::blake2b_512_digest(data),
            Self::Sha2_512 => digest::sha2_512_digest(data),
        }
    }
}

impl DerivationCode for SelfAddressing {
    fn hard_size(&self) -> usize {
        match self {
            Self::Blake3_256 | Self::Blake2B256 | Self::Blake2S256 | Self::Sha3_256 | Self::Sha2_256 => 1,
            Self::Blake3_512 | Self::Sha3_512 | Self::Blake2B512 | Self::Sha2_512 => 2,
        }
    }

    fn value_size(&self) -> usize {
        match self {
            Self::Blake3_256 | Self::Blake2B256 | Self::Blake2S256 | Self::Sha3_256 | Self::Sha2_256 => 43,
            Self::Blake3_512 | Self::Sha3_512 | Self::Blake2B512 | Self::Sha2_512 => 86,
        }
    }

    fn to_str(&self) -> String {
        match self {
            Self::Blake3_256 => "E",
            Self::Blake2B256 => "F",
            Self::Blake2S256 => "G",
            Self::Sha3_256 => "H",
            Self::Sha2_256 => "I",
            Self::Blake3_512 => "0D",
            Self::Sha3_512 => "0E",
            Self::Blake2B512 => "0F",
            Self::Sha2_512 => "0G",
        }
        .into()
    }
}

impl FromStr for SelfAddressing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.get(..1).ok_or_else(|| Error::InvalidCode(s.to_string()))? {
            "E" => Ok(Self::Blake3_256),
            "F" => Ok(Self::Blake2B256),
            "G" => Ok(Self::Blake2S256),
            "H" => Ok(Self::Sha3_256),
            "I" => Ok(Self::Sha2_256),
            "0" => match s.get(1..2) {
                Some("D") => Ok(Self::Blake3_512),
                Some("E") => Ok(Self::Sha3_512),
                Some("F") => Ok(Self::Blake2B512),
                Some("G") => Ok(Self::Sha2_512),
                _ => Err(Error::InvalidCode(s.to_string())),
            },
            _ => Err(Error::InvalidCode(s.to_string())),
        }
    }
}
