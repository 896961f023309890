use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::matter;

use super::SelfSigningPrefix;

/// An indexed signature: `(idx, sig_bytes)` where `idx` is the position of
/// the signing key within the event's `k` (§4.10). Wire form is two
/// concatenated CESR primitives — a one-character-code index primitive
/// (`A` + a 2-byte big-endian index, CESR-framed) followed by the full
/// signature primitive — rather than splicing the index into the
/// signature's own lead-pad bits the way `keriox_core`'s
/// `AttachedSignaturePrefix` does; concatenating whole primitives keeps each
/// piece self-describing, the same principle the attachment-group framing
/// in §6.1 already relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSignature {
    pub index: u16,
    pub signature: SelfSigningPrefix,
}

const INDEX_CODE: &str = "A";

impl IndexedSignature {
    pub fn new(signature: SelfSigningPrefix, index: u16) -> Self {
        Self { index, signature }
    }

    pub fn to_str(&self) -> String {
        let idx_text = matter::encode_text(INDEX_CODE, &self.index.to_be_bytes())
            .expect("2-byte index always encodes");
        format!("{}{}", idx_text, self.signature.to_str())
    }
}

impl FromStr for IndexedSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 + 88 {
            return Err(Error::TruncatedInput {
                expected: 4 + 88,
                got: s.len(),
            });
        }
        let (code, raw) = matter::decode_text(&s[..4], 1, matter::pad_size(2))?;
        if code != INDEX_CODE {
            return Err(Error::InvalidCode(code));
        }
        let idx_bytes: [u8; 2] = raw
            .try_into()
            .map_err(|_| Error::PaddingMismatch)?;
        let index = u16::from_be_bytes(idx_bytes);
        let signature = SelfSigningPrefix::from_str(&s[4..])?;
        Ok(IndexedSignature { index, signature })
    }
}

impl Serialize for IndexedSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

impl<'de> Deserialize<'de> for IndexedSignature {
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
    fn round_trip() {
        let sig = IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(vec![7u8; 64]), 2);
        let text = sig.to_str();
        assert_eq!(text.len() % 4, 0);
        let parsed: IndexedSignature = text.parse().unwrap();
        assert_eq!(parsed, sig);
    }
}
