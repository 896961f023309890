//! ACDC builder/verifier (§4.9): saidified, schema-bound credential
//! documents with optional edge chaining to other ACDCs. Lifecycle state
//! (issued/revoked) lives in the credential's TEL (§3.4), not here — this
//! module only builds and verifies the document itself.

pub mod credential;
pub mod schema;

pub use credential::{Acdc, AcdcStore, EdgeNode};
pub use schema::{InMemorySchemaRegistry, SchemaRegistry};
