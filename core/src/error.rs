use thiserror::Error;

use crate::prefix::IdentifierPrefix;

/// Flat error taxonomy for the KERI core, one leaf per failure mode named in
/// the error handling design: encoding, cryptographic, state-machine,
/// delegation, escrow, schema/ACDC and storage kinds all land in one enum the
/// way `keriox_core::error::Error` does, rather than per-module error types
/// bubbling up through a chain of `From` impls.
#[derive(Error, Debug)]
pub enum Error {
    // --- Encoding ---
    #[error("invalid CESR code: {0}")]
    InvalidCode(String),
    #[error("truncated CESR input: expected {expected} chars, got {got}")]
    TruncatedInput { expected: usize, got: usize },
    #[error("lead-byte padding mismatch")]
    PaddingMismatch,
    #[error("non-canonical base64url text")]
    NonCanonicalBase64,
    #[error("value is not canonical JSON: {0}")]
    NonCanonicalJson(String),
    #[error("base64 decoding error")]
    Base64DecodingError(#[from] base64::DecodeError),

    // --- Cryptographic ---
    #[error("digest mismatch")]
    DigestMismatch,
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("unsupported algorithm code: {0}")]
    UnsupportedAlgorithm(String),
    #[error("ed25519 error: {0}")]
    Ed25519Error(#[from] ed25519_dalek::SignatureError),

    // --- State machine ---
    #[error("out of order event: expected sn {expected}, got {got}")]
    OutOfOrderSequence { expected: u64, got: u64 },
    #[error("prior event digest mismatch")]
    PriorMismatch,
    #[error("duplicate event at sn {0}")]
    DuplicateEvent(u64),
    #[error("threshold not met: {satisfied}/{required:?}")]
    ThresholdNotMet { satisfied: usize, required: String },
    #[error("next key digest commitment mismatch at index {0}")]
    NextKeyDigestMismatch(usize),
    #[error("event type {0} forbidden in this context")]
    TypeForbidden(String),

    // --- Delegation ---
    #[error("delegator {0} has no anchoring seal yet")]
    DelegatorMissingAnchor(IdentifierPrefix),
    #[error("delegator seal does not match the delegated event")]
    DelegatorSealMismatch,

    // --- Escrow ---
    #[error("escrow entry expired")]
    EscrowExpired,
    #[error("duplicate contribution to escrow entry")]
    EscrowDuplicateContribution,

    // --- Schema / ACDC ---
    #[error("schema {0} could not be resolved")]
    SchemaResolutionFailed(String),
    #[error("schema validation failed: {0}")]
    SchemaValidationFailed(String),
    #[error("edge target credential missing: {0}")]
    EdgeTargetMissing(String),

    // --- Storage ---
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("storage corrupt: {0}")]
    StorageCorrupt(String),

    // --- Programmer ---
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("error parsing numerical value")]
    ParseIntError(#[from] core::num::ParseIntError),
}
