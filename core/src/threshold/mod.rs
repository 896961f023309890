//! Tholder (§4.5): parses and evaluates signing thresholds, numeric or
//! weighted-fractional. Ported near-verbatim from
//! `keriox_core::event::sections::threshold`, which already implements
//! exact-rational weighted evaluation via the `fraction` crate — the
//! invariant in §8.6 (weighted threshold rationality) is exactly what that
//! crate's `Fraction` arithmetic gives for free.

use std::{fmt, str::FromStr};

use fraction::{Fraction, One, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_hex::{Compact, SerHex};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdFraction {
    fraction: Fraction,
}

impl ThresholdFraction {
    pub fn new(n: u64, d: u64) -> Self {
        Self {
            fraction: Fraction::new(n, d),
        }
    }
}

impl fmt::Display for ThresholdFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fraction)
    }
}

impl FromStr for ThresholdFraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split('/').collect();
        match parts.as_slice() {
            [a] => Ok(ThresholdFraction::new(a.parse::<u64>()?, 1)),
            [a, b] => Ok(ThresholdFraction::new(a.parse::<u64>()?, b.parse::<u64>()?)),
            _ => Err(Error::InvariantViolation(format!("malformed threshold fraction: {s}"))),
        }
    }
}

impl<'de> Deserialize<'de> for ThresholdFraction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for ThresholdFraction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A signing threshold: integer `k` (any `k` of the listed signers), or a
/// set of weighted fractional clauses (§4.5).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SignatureThreshold {
    #[serde(with = "SerHex::<Compact>")]
    Simple(u64),
    Weighted(WeightedThreshold),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WeightedThreshold {
    Single(ThresholdClause),
    Multi(MultiClauses),
}

impl WeightedThreshold {
    pub fn satisfied(&self, indices: &[usize]) -> Result<bool, Error> {
        match self {
            WeightedThreshold::Single(clause) => clause.satisfied(0, indices),
            WeightedThreshold::Multi(clauses) => clauses.satisfied(indices),
        }
    }
}

impl SignatureThreshold {
    pub fn simple(t: u64) -> Self {
        Self::Simple(t)
    }

    pub fn single_weighted(fracs: Vec<(u64, u64)>) -> Self {
        Self::Weighted(WeightedThreshold::Single(ThresholdClause::new_from_tuples(fracs)))
    }

    pub fn multi_weighted(fracs: Vec<Vec<(u64, u64)>>) -> Self {
        Self::Weighted(WeightedThreshold::Multi(MultiClauses::new_from_tuples(fracs)))
    }

    /// `satisfied(indices) -> bool` (§4.5): does this set of signer indices
    /// satisfy the threshold?
    pub fn satisfied(&self, indices: &[usize]) -> Result<bool, Error> {
        match self {
            SignatureThreshold::Simple(t) => Ok((indices.len() as u64) >= *t),
            SignatureThreshold::Weighted(thresh) => thresh.satisfied(indices),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SignatureThreshold::Simple(0))
    }
}

impl Default for SignatureThreshold {
    fn default() -> Self {
        Self::Simple(1)
    }
}

impl fmt::Display for SignatureThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureThreshold::Simple(t) => write!(f, "{:x}", t),
            SignatureThreshold::Weighted(_) => write!(f, "{}", serde_json::to_string(self).unwrap_or_default()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ThresholdClause(Vec<ThresholdFraction>);

impl ThresholdClause {
    pub fn new(fracs: &[ThresholdFraction]) -> Self {
        Self(fracs.to_owned())
    }

    pub fn new_from_tuples(tuples: Vec<(u64, u64)>) -> Self {
        Self(tuples.into_iter().map(|(n, d)| ThresholdFraction::new(n, d)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn satisfied(&self, start_index: usize, indices: &[usize]) -> Result<bool, Error> {
        let sum = indices.iter().try_fold(Fraction::zero(), |acc, idx| {
            idx.checked_sub(start_index)
                .and_then(|rel| self.0.get(rel))
                .map(|frac| acc + frac.fraction)
                .ok_or_else(|| Error::InvariantViolation("signature index out of bounds".into()))
        })?;
        Ok(sum >= Fraction::one())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultiClauses(Vec<ThresholdClause>);

impl MultiClauses {
    pub fn new_from_tuples(fracs: Vec<Vec<(u64, u64)>>) -> Self {
        Self(fracs.into_iter().map(ThresholdClause::new_from_tuples).collect())
    }

    pub fn satisfied(&self, indices: &[usize]) -> Result<bool, Error> {
        let mut start = 0;
        for clause in &self.0 {
            let in_clause: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|i| *i >= start && *i < start + clause.len())
                .collect();
            if !clause.satisfied(start, &in_clause)? {
                return Ok(false);
            }
            start += clause.len();
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S3 — 2-of-3 multi-sig inception (spec §8).
    #[test]
    fn s3_simple_2_of_3() {
        let t = SignatureThreshold::simple(2);
        assert!(!t.satisfied(&[0]).unwrap());
        assert!(t.satisfied(&[0, 2]).unwrap());
    }

    /// S4 — weighted-threshold rotation (spec §8).
    #[test]
    fn s4_weighted_half_half_half() {
        let t = SignatureThreshold::single_weighted(vec![(1, 2), (1, 2), (1, 2)]);
        assert!(t.satisfied(&[0, 1]).unwrap());
        assert!(!t.satisfied(&[0]).unwrap());
    }

    #[test]
    fn multi_clause_threshold() {
        let wt = MultiClauses::new_from_tuples(vec![vec![(1, 1)], vec![(1, 2), (1, 2), (1, 2)]]);
        assert!(wt.satisfied(&[0, 1, 2, 3]).unwrap());
        assert!(wt.satisfied(&[0, 1, 3]).unwrap());
        assert!(!wt.satisfied(&[0]).unwrap());
    }

    #[test]
    fn weighted_threshold_serde_shapes() {
        let multi = r#"[["1"],["1/2","1/2","1/2"]]"#;
        let wt: WeightedThreshold = serde_json::from_str(multi).unwrap();
        assert!(matches!(wt, WeightedThreshold::Multi(_)));
        assert_eq!(serde_json::to_string(&wt).unwrap(), multi);

        let single = r#"["1/2","1/2","1/2"]"#;
        let wt: WeightedThreshold = serde_json::from_str(single).unwrap();
        assert!(matches!(wt, WeightedThreshold::Single(_)));
        assert_eq!(serde_json::to_string(&wt).unwrap(), single);
    }
}
