//! Slot maps: card code to quantity
//!
//! Persisted snapshots only ever hold non-negative quantities; signed values
//! appear while diffing two snapshots.

use crate::identity::CardCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from card code to quantity, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slots(IndexMap<CardCode, i32>);

impl Slots {
    /// Create an empty slot map
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity for a code, zero when absent
    pub fn get(&self, code: &str) -> i32 {
        self.0.get(code).copied().unwrap_or(0)
    }

    /// Check whether the code has an entry (even a zero one)
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// Set the quantity for a code
    pub fn set(&mut self, code: impl Into<CardCode>, quantity: i32) {
        self.0.insert(code.into(), quantity);
    }

    /// Add a delta to the quantity for a code
    pub fn add(&mut self, code: impl Into<CardCode>, delta: i32) {
        *self.0.entry(code.into()).or_insert(0) += delta;
    }

    /// Increment the quantity for a code
    pub fn inc(&mut self, code: impl Into<CardCode>) {
        self.add(code, 1);
    }

    /// Decrement the quantity for a code
    pub fn dec(&mut self, code: impl Into<CardCode>) {
        self.add(code, -1);
    }

    /// Remove the entry for a code
    pub fn remove(&mut self, code: &str) -> Option<i32> {
        self.0.shift_remove(code)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&CardCode, i32)> {
        self.0.iter().map(|(code, qty)| (code, *qty))
    }

    /// Iterate codes in insertion order
    pub fn codes(&self) -> impl Iterator<Item = &CardCode> {
        self.0.keys()
    }

    /// Sum of all quantities
    pub fn total(&self) -> i32 {
        self.0.values().sum()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes of both maps, this map's first, without duplicates
    pub fn union_codes<'a>(&'a self, other: &'a Slots) -> Vec<&'a CardCode> {
        let mut codes: Vec<&CardCode> = self.codes().collect();
        for code in other.codes() {
            if !self.contains(code.as_str()) {
                codes.push(code);
            }
        }
        codes
    }

    /// Decode the compact meta string format (one code per copy, comma separated)
    ///
    /// Empty tokens are ignored, so `""` decodes to an empty map.
    pub fn from_meta_string(value: &str) -> Self {
        let mut slots = Slots::new();
        for code in value.split(',').filter(|c| !c.is_empty()) {
            slots.inc(code);
        }
        slots
    }

    /// Encode to the compact meta string format
    ///
    /// Non-positive quantities produce no tokens.
    pub fn to_meta_string(&self) -> String {
        let mut tokens: Vec<&str> = Vec::new();
        for (code, count) in self.iter() {
            for _ in 0..count.max(0) {
                tokens.push(code.as_str());
            }
        }
        tokens.join(",")
    }
}

impl FromIterator<(CardCode, i32)> for Slots {
    fn from_iter<T: IntoIterator<Item = (CardCode, i32)>>(iter: T) -> Self {
        Slots(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, i32); N]> for Slots {
    fn from(entries: [(&str, i32); N]) -> Self {
        entries
            .into_iter()
            .map(|(code, qty)| (CardCode::new(code), qty))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults_to_zero() {
        let slots = Slots::from([("01030", 2)]);
        assert_eq!(slots.get("01030"), 2);
        assert_eq!(slots.get("01031"), 0);
    }

    #[test]
    fn test_inc_dec() {
        let mut slots = Slots::new();
        slots.inc("01030");
        slots.inc("01030");
        slots.dec("01031");
        assert_eq!(slots.get("01030"), 2);
        assert_eq!(slots.get("01031"), -1);
        assert_eq!(slots.total(), 1);
    }

    #[test]
    fn test_meta_string_decode() {
        let slots = Slots::from_meta_string("01030,01030,,02110");
        assert_eq!(slots.get("01030"), 2);
        assert_eq!(slots.get("02110"), 1);
        assert_eq!(slots.len(), 2);
        assert!(Slots::from_meta_string("").is_empty());
    }

    #[test]
    fn test_meta_string_encode_skips_empty() {
        let slots = Slots::from([("01030", 2), ("01031", 0), ("02110", 1)]);
        assert_eq!(slots.to_meta_string(), "01030,01030,02110");
    }

    #[test]
    fn test_union_codes_keeps_order() {
        let a = Slots::from([("1", 1), ("2", 1)]);
        let b = Slots::from([("2", 1), ("3", 1)]);
        let codes: Vec<&str> = a.union_codes(&b).into_iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "3"]);
    }
}
