//! Key configuration sections (§3.2, §4.8 invariants): the current signing
//! set with its threshold, and the next-key digest commitment. Ported from
//! `keriox_core::event::sections::key_config`.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::prefix::attached_signature::IndexedSignature;
use crate::prefix::BasicPrefix;
use crate::prefix::Prefix;
use crate::sai::derivation::SelfAddressing;
use crate::sai::said::SelfAddressingIdentifier;
use crate::threshold::SignatureThreshold;

/// `nt`/`n`: threshold and digests the *next* key set must satisfy (§4.8).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NextKeysData {
    #[serde(rename = "nt")]
    pub threshold: SignatureThreshold,
    #[serde(rename = "n")]
    pub next_key_hashes: Vec<SelfAddressingIdentifier>,
}

impl NextKeysData {
    /// Verify that `next`'s public keys, under `next`'s own rotation
    /// threshold, are exactly the committed set (§4.8: next-key digest
    /// commitment).
    pub fn verify_next(&self, next: &KeyConfig) -> Result<bool, Error> {
        let mut indices = vec![];
        for key in &next.public_keys {
            let idx = self
                .next_key_hashes
                .iter()
                .position(|digest| digest.verify_binding(key.to_str().as_bytes()))
                .ok_or_else(|| Error::NextKeyDigestMismatch(0))?;
            indices.push(idx);
        }
        if self.threshold.satisfied(&indices)? {
            Ok(true)
        } else {
            Err(Error::ThresholdNotMet {
                satisfied: indices.len(),
                required: self.threshold.to_string(),
            })
        }
    }
}

/// `kt`/`k` plus the embedded `nt`/`n`: the full key-configuration section
/// common to `icp`/`rot`/`dip`/`drt`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KeyConfig {
    #[serde(rename = "kt")]
    pub threshold: SignatureThreshold,
    #[serde(rename = "k")]
    pub public_keys: Vec<BasicPrefix>,
    #[serde(flatten)]
    pub next_keys_data: NextKeysData,
}

impl KeyConfig {
    pub fn new(
        public_keys: Vec<BasicPrefix>,
        next_keys_data: NextKeysData,
        threshold: Option<SignatureThreshold>,
    ) -> Self {
        Self {
            threshold: threshold
                .unwrap_or_else(|| SignatureThreshold::simple(public_keys.len() as u64 / 2 + 1)),
            public_keys,
            next_keys_data,
        }
    }

    /// Verify a set of indexed signatures against `message` using this key
    /// set, rejecting duplicate indices, out-of-range indices and
    /// under-threshold sets (§4.8, §8.3).
    pub fn verify(&self, message: &[u8], sigs: &[IndexedSignature]) -> Result<bool, Error> {
        let mut seen = vec![0u32; self.public_keys.len()];
        for sig in sigs {
            let idx = sig.index as usize;
            let slot = seen
                .get_mut(idx)
                .ok_or_else(|| Error::InvariantViolation("signature index out of range".into()))?;
            *slot += 1;
            if *slot > 1 {
                return Err(Error::InvariantViolation("duplicate signature index".into()));
            }
        }

        let indices: Vec<usize> = sigs.iter().map(|s| s.index as usize).collect();
        if !self.threshold.satisfied(&indices)? {
            return Err(Error::ThresholdNotMet {
                satisfied: indices.len(),
                required: self.threshold.to_string(),
            });
        }

        for sig in sigs {
            let key = self
                .public_keys
                .get(sig.index as usize)
                .ok_or_else(|| Error::InvariantViolation("signature index out of range".into()))?;
            if !key.verify(message, sig.signature.signature()) {
                return Err(Error::SignatureInvalid);
            }
        }
        Ok(true)
    }

    pub fn verify_next(&self, next: &KeyConfig) -> Result<bool, Error> {
        self.next_keys_data.verify_next(next)
    }

    /// Build the `NextKeysData` commitment for this key set, to be embedded
    /// as the *current* event's `nt`/`n` (what the following rotation must
    /// satisfy).
    pub fn commit(&self, derivation: SelfAddressing) -> NextKeysData {
        nxt_commitment(self.threshold.clone(), &self.public_keys, derivation)
    }
}

/// Digest each key's CESR text under `derivation`, producing the
/// `NextKeysData` a rotation must later satisfy (§4.8).
pub fn nxt_commitment(
    threshold: SignatureThreshold,
    keys: &[BasicPrefix],
    derivation: SelfAddressing,
) -> NextKeysData {
    let next_key_hashes = keys
        .iter()
        .map(|k| SelfAddressingIdentifier::derive(derivation, k.to_str().as_bytes()))
        .collect();
    NextKeysData {
        threshold,
        next_key_hashes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PublicKey;
    use crate::prefix::attached_signature::IndexedSignature;
    use crate::prefix::{BasicPrefix, SelfSigningPrefix};
    use crate::signer::Signer;

    fn keypair() -> (BasicPrefix, Signer) {
        let signer = Signer::new();
        (BasicPrefix::Ed25519(signer.public_key()), signer)
    }

    fn fake_key() -> BasicPrefix {
        BasicPrefix::Ed25519(PublicKey::new(vec![9; 32]))
    }

    /// S3 — 2-of-3 multi-sig: verification succeeds only once 2 distinct
    /// indexed signatures are present (spec §8.3).
    #[test]
    fn threshold_of_two_of_three() {
        let (k0, s0) = keypair();
        let (k1, s1) = keypair();
        let k2 = fake_key();

        let next = nxt_commitment(
            SignatureThreshold::simple(1),
            &[fake_key()],
            SelfAddressing::Blake3_256,
        );
        let config = KeyConfig::new(vec![k0, k1, k2], next, Some(SignatureThreshold::simple(2)));

        let msg = b"an ixn event body";
        let sig0 = IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(s0.sign(msg).unwrap()), 0);
        let sig1 = IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(s1.sign(msg).unwrap()), 1);

        assert!(matches!(config.verify(msg, &[sig0.clone()]), Err(Error::ThresholdNotMet { .. })));
        assert!(config.verify(msg, &[sig0, sig1]).unwrap());
    }

    #[test]
    fn duplicate_index_rejected() {
        let (k0, s0) = keypair();
        let next = nxt_commitment(SignatureThreshold::simple(1), &[fake_key()], SelfAddressing::Blake3_256);
        let config = KeyConfig::new(vec![k0], next, Some(SignatureThreshold::simple(1)));
        let msg = b"msg";
        let sig = IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(s0.sign(msg).unwrap()), 0);
        let err = config.verify(msg, &[sig.clone(), sig]).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }
}
