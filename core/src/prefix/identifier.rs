use core::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::sai::SelfAddressingIdentifier;

use super::{BasicPrefix, Prefix};

/// An AID (controller identifier). §3.3: when thresholds and multi-key are
/// trivial the AID is the first signing verfer (`Basic`); otherwise it is
/// the SAID of the inception event (`SelfAddressing`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierPrefix {
    Basic(BasicPrefix),
    SelfAddressing(SelfAddressingIdentifier),
}

impl fmt::Display for IdentifierPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for IdentifierPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BasicPrefix::from_str(s) {
            Ok(bp) => Ok(Self::Basic(bp)),
            Err(_) => Ok(Self::SelfAddressing(SelfAddressingIdentifier::from_str(s)?)),
        }
    }
}

impl Prefix for IdentifierPrefix {
    fn derivative(&self) -> Vec<u8> {
        match self {
            Self::Basic(bp) => bp.derivative(),
            Self::SelfAddressing(said) => said.digest.clone(),
        }
    }

    fn derivation_code(&self) -> String {
        match self {
            Self::Basic(bp) => bp.derivation_code(),
            Self::SelfAddressing(said) => said.derivation.to_str(),
        }
    }
}

impl Default for IdentifierPrefix {
    fn default() -> Self {
        IdentifierPrefix::SelfAddressing(SelfAddressingIdentifier::default())
    }
}

impl Serialize for IdentifierPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for IdentifierPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IdentifierPrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PublicKey;

    #[test]
    fn basic_prefix_round_trip() {
        let pref: IdentifierPrefix = "BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
            .parse()
            .unwrap();
        assert!(matches!(pref, IdentifierPrefix::Basic(_)));
    }

    #[test]
    fn self_addressing_prefix_round_trip() {
        let said = SelfAddressingIdentifier::derive(
            crate::sai::SelfAddressing::Blake3_256,
            b"inception event bytes",
        );
        let pref = IdentifierPrefix::SelfAddressing(said.clone());
        let text = pref.to_str();
        let parsed: IdentifierPrefix = text.parse().unwrap();
        assert_eq!(parsed, pref);
    }

    #[test]
    fn default_prefix_is_not_a_real_key() {
        let pref = IdentifierPrefix::Basic(BasicPrefix::Ed25519NT(PublicKey::new(vec![1; 32])));
        assert_ne!(pref, IdentifierPrefix::default());
    }
}
