//! Ed25519 key material, ported from `keriox_core::keys` (the ECDSA branch
//! is dropped: spec.md §3.1 names Ed25519 as the signing algorithm for KERI
//! events, and carrying a second signature scheme with no caller in this
//! crate would be dead code).

use ed25519_dalek::{Signer, Verifier};
use zeroize::Zeroize;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PublicKey {
    key: Vec<u8>,
}

impl PublicKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn key(&self) -> Vec<u8> {
        self.key.clone()
    }

    pub fn verify(&self, msg: &[u8], sig: &[u8]) -> bool {
        let Ok(key_bytes): Result<[u8; 32], _> = self.key.as_slice().try_into() else {
            return false;
        };
        let Ok(key) = ed25519_dalek::PublicKey::from_bytes(&key_bytes) else {
            return false;
        };
        if sig.len() != 64 {
            return false;
        }
        let sig_bytes = arrayref::array_ref!(sig, 0, 64);
        let signature = ed25519_dalek::Signature::new(*sig_bytes);
        key.verify(msg, &signature).is_ok()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    key: Vec<u8>,
}

impl PrivateKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn key(&self) -> Vec<u8> {
        self.key.clone()
    }

    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        let secret = ed25519_dalek::SecretKey::from_bytes(&self.key)?;
        let public = ed25519_dalek::PublicKey::from(&secret);
        let keypair = ed25519_dalek::Keypair { secret, public };
        Ok(keypair.sign(msg).to_bytes().to_vec())
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

pub fn generate_ed25519_keypair() -> (PublicKey, PrivateKey) {
    use rand::rngs::OsRng;
    let kp = ed25519_dalek::Keypair::generate(&mut OsRng);
    (
        PublicKey::new(kp.public.to_bytes().to_vec()),
        PrivateKey::new(kp.secret.to_bytes().to_vec()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let (pk, sk) = generate_ed25519_keypair();
        let msg = b"hello KERI";
        let sig = sk.sign(msg).unwrap();
        assert!(pk.verify(msg, &sig));
        assert!(!pk.verify(b"tampered", &sig));
    }
}
