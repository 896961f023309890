//! The signing contract (§6.4): `sign(message, key_index) -> signature` and
//! a verifier the core treats uniformly whether in-process, hardware-backed
//! or remote. Ported from `keriox_core::signer` (the `CryptoBox`
//! auto-rotating wrapper is dropped — rotation in this crate is driven
//! explicitly by the KEL engine building a `rot` event from caller-supplied
//! next keys, not by the key manager rotating itself).

use crate::error::Error;
use crate::keys::{generate_ed25519_keypair, PrivateKey, PublicKey};
use crate::prefix::SeedPrefix;

/// A signer abstraction the KEL/escrow layers consume uniformly; concrete
/// implementations may be in-process, hardware-backed or remote (§6.4).
pub trait KeyManager {
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Error>;
    fn public_key(&self) -> PublicKey;
}

/// A verifier abstraction mirroring `KeyManager` on the read side.
pub trait Verifier {
    fn verify(&self, msg: &[u8], signature: &[u8], key: &PublicKey) -> bool;
}

pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(&self, msg: &[u8], signature: &[u8], key: &PublicKey) -> bool {
        key.verify(msg, signature)
    }
}

/// An in-process Ed25519 signer.
pub struct Signer {
    priv_key: PrivateKey,
    pub_key: PublicKey,
}

impl Signer {
    pub fn new() -> Self {
        let (pub_key, priv_key) = generate_ed25519_keypair();
        Signer { pub_key, priv_key }
    }

    pub fn new_with_seed(seed: &SeedPrefix) -> Result<Self, Error> {
        let (pub_key, priv_key) = seed.derive_key_pair()?;
        Ok(Signer { pub_key, priv_key })
    }

    pub fn sign(&self, msg: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
        self.priv_key.sign(msg.as_ref())
    }

    pub fn public_key(&self) -> PublicKey {
        self.pub_key.clone()
    }
}

impl Default for Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyManager for Signer {
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        Signer::sign(self, msg)
    }

    fn public_key(&self) -> PublicKey {
        Signer::public_key(self)
    }
}
