//! Flat error taxonomy for the TEL/ACDC layer, following
//! `keri_core::error::Error`'s shape: every failure mode this crate needs
//! (`TypeForbidden` for double-issuance and revoke-before-issue,
//! `EdgeTargetMissing`, `SchemaResolutionFailed`, `SchemaValidationFailed`,
//! ordering/digest mismatches) already exists on the core error, so this
//! crate's own `Error` is a thin transparent wrapper rather than a
//! duplicate enum, mirroring `support/teliox::error::Error::KeriError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] keri_core::error::Error),
}
