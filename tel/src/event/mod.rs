//! TEL event data (§4.8): the registry ("management TEL") and credential
//! event families, each with their own `{i, s}` envelope mirroring
//! `keri_core::event::KeyEvent`.

pub mod credential;
pub mod registry;
