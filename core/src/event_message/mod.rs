//! Event framing (§4.6) and the event-type taxonomy (§3.2). Ported from
//! `keriox_core::event_message`.

pub mod dummy_event;
pub mod msg;
pub mod serialization_info;
pub mod signature;
pub mod signed_event_message;

use serde::{Deserialize, Serialize};

/// `t`: the event type discriminant, shared by KEL, TEL and receipt events.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventTypeTag {
    Icp,
    Rot,
    Ixn,
    Dip,
    Drt,
    Rct,
    Vcp,
    Iss,
    Rev,
}

/// Anything with a `t` value can report it for event framing.
pub trait Typeable {
    type TypeTag;
    fn get_type(&self) -> Self::TypeTag;
}
