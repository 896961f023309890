//! Append-only audit/verification projection over committed KEL and TEL
//! logs (§4.13). Nothing here participates in validation or state
//! transitions — it is a read-side convenience the core and TEL crates
//! don't need for their own correctness, kept regenerable from them so it
//! never needs a write-ahead log of its own.

pub mod entry;
pub mod error;
pub mod indexer;
pub mod reference;

pub use entry::IndexEntry;
pub use error::Error;
pub use indexer::Indexer;
pub use reference::Reference;
