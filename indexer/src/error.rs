//! Flat error taxonomy for the indexer, following the same thin-wrapper
//! shape `teliox::error::Error` uses over `keri_core::error::Error`: the
//! indexer only ever fails the way its two upstream crates already fail
//! (storage I/O, decode, state-machine replay), so it adds nothing of its
//! own.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] keri_core::error::Error),
    #[error(transparent)]
    Tel(#[from] teliox::error::Error),
}
