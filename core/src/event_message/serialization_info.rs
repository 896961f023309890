//! Version string framing (§4.6): `KERI10JSON{size_hex6}_`. The teacher
//! delegates this to an external `version` crate; since protocol/major/minor
//! are fixed constants here (KERI 1.0, JSON only — spec.md names no other
//! serialization kind) we inline the format rather than pull in a crate for
//! three constant bytes.

use core::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

const PREAMBLE: &str = "KERI10JSON";
const SIZE_DIGITS: usize = 6;

/// The `v` field: protocol/version/kind are constant in this crate, so this
/// is effectively a newtype over the framed byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationInfo {
    pub size: usize,
}

impl SerializationInfo {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// A version string with a zero-filled size field, used as the first
    /// pass of the two-pass framing algorithm (§4.6).
    pub fn new_empty() -> Self {
        Self { size: 0 }
    }
}

impl fmt::Display for SerializationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREAMBLE}{:0width$x}_", self.size, width = SIZE_DIGITS)
    }
}

impl FromStr for SerializationInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expected_len = PREAMBLE.len() + SIZE_DIGITS + 1;
        if s.len() != expected_len || !s.starts_with(PREAMBLE) || !s.ends_with('_') {
            return Err(Error::InvariantViolation(format!("malformed version string: {s}")));
        }
        let size_str = &s[PREAMBLE.len()..s.len() - 1];
        let size = usize::from_str_radix(size_str, 16)
            .map_err(|_| Error::InvariantViolation(format!("malformed version string size: {s}")))?;
        Ok(Self { size })
    }
}

impl Serialize for SerializationInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SerializationInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let info = SerializationInfo::new(0x15f);
        let s = info.to_string();
        assert_eq!(s, "KERI10JSON00015f_");
        let parsed: SerializationInfo = s.parse().unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn placeholder_and_final_are_equal_length() {
        assert_eq!(SerializationInfo::new_empty().to_string().len(), SerializationInfo::new(0xabcdef).to_string().len());
    }
}
