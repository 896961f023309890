//! TEL registry and credential state machines (§4.8), mirroring
//! `keri_core::state::IdentifierState`'s apply-events-in-order pattern over
//! the much smaller state shapes `support/teliox` tracks
//! (`ManagerTelState`, `vc_state::TelState`).

pub mod credential;
pub mod registry;

pub use credential::CredentialState;
pub use registry::RegistryState;
