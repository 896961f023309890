//! Diger (§4.2) and SAIDifier (§4.4): digest algorithm selection plus
//! self-addressing digest computation over canonical JSON.

pub mod derivation;
mod digest;
pub mod said;
pub mod saidify;

pub use derivation::SelfAddressing;
pub use said::SelfAddressingIdentifier;
pub use saidify::{placeholder, saidify, verify_said};
