//! Deck snapshots and their free-form meta values

use indexmap::IndexMap;
use ledger_core::{CardCode, Slots};
use serde::{Deserialize, Serialize};

/// Key-value metadata attached to a deck
///
/// Holds alternate investigator sides, the parallel investigator extra deck
/// and encoded customization decisions (`cus_<code>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckMeta(IndexMap<String, String>);

impl DeckMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a raw value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a value, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Investigator card used for the front side
    pub fn alternate_front(&self) -> Option<&str> {
        self.get("alternate_front").filter(|v| !v.is_empty())
    }

    /// Investigator card used for the back side
    pub fn alternate_back(&self) -> Option<&str> {
        self.get("alternate_back").filter(|v| !v.is_empty())
    }

    /// The extra deck, decoded from its comma separated form
    pub fn extra_deck(&self) -> Slots {
        self.get("extra_deck")
            .map(Slots::from_meta_string)
            .unwrap_or_default()
    }

    /// Store the extra deck in its comma separated form
    pub fn set_extra_deck(&mut self, slots: &Slots) {
        self.set("extra_deck", slots.to_meta_string());
    }

    /// Encoded customization decisions for a card
    pub fn customization(&self, code: &str) -> Option<&str> {
        self.get(&format!("cus_{}", code))
    }
}

/// A deck snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub investigator_code: CardCode,
    pub slots: Slots,
    /// Copies that do not count against deck limits
    #[serde(default)]
    pub ignore_deck_limit_slots: Slots,
    #[serde(default)]
    pub side_slots: Slots,
    #[serde(default)]
    pub meta: DeckMeta,
    /// Comma separated codes of exiled cards, one token per copy
    #[serde(default)]
    pub exile_string: Option<String>,
    /// Experience earned for this upgrade
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub xp_adjustment: i32,
}

impl Deck {
    /// Create an empty deck for an investigator
    pub fn new(id: impl Into<String>, investigator: impl Into<CardCode>) -> Self {
        Self {
            id: id.into(),
            investigator_code: investigator.into(),
            ..Self::default()
        }
    }

    /// Replace the slots
    pub fn with_slots(mut self, slots: Slots) -> Self {
        self.slots = slots;
        self
    }

    /// Replace the ignore-deck-limit slots
    pub fn with_ignore_deck_limit_slots(mut self, slots: Slots) -> Self {
        self.ignore_deck_limit_slots = slots;
        self
    }

    /// Replace the meta values
    pub fn with_meta(mut self, meta: DeckMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the exiled cards
    pub fn with_exiled(mut self, exiled: &Slots) -> Self {
        self.exile_string = Some(exiled.to_meta_string());
        self
    }

    /// Set the earned experience
    pub fn with_xp(mut self, xp: i32) -> Self {
        self.xp = xp;
        self
    }

    /// Exiled cards counted per code
    pub fn exiled(&self) -> Slots {
        self.exile_string
            .as_deref()
            .map(Slots::from_meta_string)
            .unwrap_or_default()
    }

    /// Investigator card of the front side
    pub fn front_code(&self) -> &str {
        self.meta
            .alternate_front()
            .unwrap_or(self.investigator_code.as_str())
    }

    /// Investigator card of the back side
    pub fn back_code(&self) -> &str {
        self.meta
            .alternate_back()
            .unwrap_or(self.investigator_code.as_str())
    }

    /// Slots minus ignore-deck-limit copies
    pub fn counted_slots(&self) -> Slots {
        self.slots
            .iter()
            .map(|(code, count)| {
                let ignored = self.ignore_deck_limit_slots.get(code.as_str());
                (code.clone(), count - ignored)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_accessors() {
        let meta = DeckMeta::new()
            .with("alternate_back", "90017")
            .with("alternate_front", "")
            .with("extra_deck", "01030,01030,01031")
            .with("cus_09021", "0|1,1|2");
        assert_eq!(meta.alternate_back(), Some("90017"));
        assert_eq!(meta.alternate_front(), None);
        assert_eq!(meta.extra_deck().get("01030"), 2);
        assert_eq!(meta.customization("09021"), Some("0|1,1|2"));
        assert_eq!(meta.customization("09022"), None);
    }

    #[test]
    fn test_sides_fall_back_to_investigator() {
        let deck = Deck::new("1", "01001")
            .with_meta(DeckMeta::new().with("alternate_back", "90001"));
        assert_eq!(deck.front_code(), "01001");
        assert_eq!(deck.back_code(), "90001");
    }

    #[test]
    fn test_exiled_and_counted_slots() {
        let deck = Deck::new("1", "01001")
            .with_slots(Slots::from([("01030", 2), ("05040", 2)]))
            .with_ignore_deck_limit_slots(Slots::from([("05040", 1)]))
            .with_exiled(&Slots::from([("01030", 2)]));
        assert_eq!(deck.exile_string.as_deref(), Some("01030,01030"));
        assert_eq!(deck.exiled().get("01030"), 2);
        assert_eq!(deck.counted_slots().get("05040"), 1);
        assert_eq!(Deck::new("2", "01001").exiled().total(), 0);
    }

    #[test]
    fn test_extra_deck_round_trip() {
        let mut meta = DeckMeta::new();
        meta.set_extra_deck(&Slots::from([("90053", 1), ("02000", 2)]));
        assert_eq!(meta.get("extra_deck"), Some("90053,02000,02000"));
        assert_eq!(meta.extra_deck().total(), 3);
    }
}
