use crate::matter;

pub mod attached_signature;
pub mod basic;
pub mod identifier;
pub mod seed;
pub mod self_signing;

pub use attached_signature::IndexedSignature;
pub use basic::BasicPrefix;
pub use identifier::IdentifierPrefix;
pub use seed::SeedPrefix;
pub use self_signing::SelfSigningPrefix;

/// Common behavior of every CESR textual primitive used as a prefix: pair
/// its derivation code with its raw derivative bytes to produce the
/// CESR text, the way `keriox_core::prefix::Prefix` does.
pub trait Prefix {
    fn derivative(&self) -> Vec<u8>;
    fn derivation_code(&self) -> String;
    fn to_str(&self) -> String {
        let code = self.derivation_code();
        matter::encode_text(&code, &self.derivative())
            .expect("derivative length always matches its own derivation code")
    }
}

/// Verify a signature using a verfer, by CESR prefix type.
pub fn verify(data: &[u8], key: &BasicPrefix, signature: &SelfSigningPrefix) -> bool {
    key.verify(data, signature.signature())
}

/// Derive the Basic (verfer) Prefix corresponding to a Seed Prefix.
pub fn derive(seed: &SeedPrefix, transferable: bool) -> Result<BasicPrefix, crate::error::Error> {
    let (pk, _) = seed.derive_key_pair()?;
    Ok(if transferable {
        BasicPrefix::Ed25519(pk)
    } else {
        BasicPrefix::Ed25519NT(pk)
    })
}
