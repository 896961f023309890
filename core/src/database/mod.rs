//! The log persistence contract (§6.3): the core consumes a key-value store
//! it does not implement itself — persistence engines are an out-of-scope
//! external collaborator (§1). `EventLog` is that contract as a Rust trait;
//! `memory::MemoryLog` is the in-memory reference implementation this
//! crate's own tests run against, the way `keriox_core::database::sled`
//! is the teacher's concrete implementation of the same idea (ported here
//! against a plain `get/put/del/list` contract instead of a `sled::Db`
//! handle, since a specific embedded database is an out-of-scope
//! persistence engine per spec.md §1).

pub mod memory;

use crate::error::Error;

/// `get(key) -> bytes?`, `put(key, bytes)`, `del(key)`, `list(prefix) ->
/// ordered sequence of (key, bytes)` (§6.3).
pub trait EventLog {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), Error>;
    fn del(&self, key: &str) -> Result<(), Error>;
    fn list(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, Error>;
}

/// Key layout (§6.3). Centralized here so every caller builds keys the same
/// way instead of re-deriving the format string per call site.
pub mod keys {
    pub fn kel_event(aid: &str, sn: u64) -> String {
        format!("kel/{aid}/{sn:016x}")
    }

    pub fn kel_head(aid: &str) -> String {
        format!("kel/{aid}/head")
    }

    pub fn kel_prefix(aid: &str) -> String {
        format!("kel/{aid}/")
    }

    pub fn tel_event(registry_id: &str, sn: u64) -> String {
        format!("tel/{registry_id}/{sn:016x}")
    }

    pub fn tel_prefix(registry_id: &str) -> String {
        format!("tel/{registry_id}/")
    }

    pub fn acdc(said: &str) -> String {
        format!("acdc/{said}")
    }

    pub fn sig(said: &str, idx: u16) -> String {
        format!("sig/{said}/{idx}")
    }

    pub fn sig_prefix(said: &str) -> String {
        format!("sig/{said}/")
    }

    pub fn escrow(stage: &str, key: &str) -> String {
        format!("escrow/{stage}/{key}")
    }

    pub fn escrow_prefix(stage: &str) -> String {
        format!("escrow/{stage}/")
    }

    pub fn alias(scope: &str, name: &str) -> String {
        format!("alias/{scope}/{name}")
    }
}
