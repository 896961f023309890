//! Cross-log reference kinds (§4.13 SUPPLEMENT): the indexer's whole value
//! over just re-reading the primary KEL/TEL stores is that it already
//! classifies *why* one log entry relates to another, instead of a reader
//! having to re-derive it (walk a registry's `ip` chain, resolve a
//! credential's `ri`, parse an ACDC's edge block) every time. One entry
//! carries zero or more of these, since e.g. a `vcp` for a nested registry
//! is both anchored in an issuer KEL and parented under another registry.

use keri_core::prefix::IdentifierPrefix;

/// Why this log entry references another log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reference {
    /// This entry is anchored in `aid`'s KEL (a registry's `vcp`, anchored
    /// by its issuer's `ixn`).
    IssuerKel { aid: IdentifierPrefix },
    /// This entry is signed for by `aid`'s KEL (a delegated `dip`/`drt`,
    /// anchored by its delegator's `ixn`).
    SignerKel { aid: IdentifierPrefix },
    /// This registry nests under `registry_id` (§4.8 "nested registries").
    ParentRegistry { registry_id: IdentifierPrefix },
    /// `registry_id` nests under this one.
    ChildRegistry { registry_id: IdentifierPrefix },
    /// This credential event belongs to `registry_id`'s TEL.
    CredentialRegistry { registry_id: IdentifierPrefix },
    /// This ACDC names `credential_said` as an edge target (§4.9).
    Edge { credential_said: IdentifierPrefix },
}
