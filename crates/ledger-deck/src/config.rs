//! Deck Configuration - Card codes and display settings
//!
//! The accountant and the summarizer key several rules on specific card
//! codes. They are collected here so a catalog with different codes (or a
//! test) can swap them without touching the algorithms.

use crate::constants;
use serde::{Deserialize, Serialize};

/// Card codes with dedicated deck rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialCards {
    pub adaptable: String,
    pub deja_vu: String,
    pub arcane_research: String,
    pub down_the_rabbit_hole: String,
    pub ace_of_rods: String,
    pub parallel_agnes: String,
    pub parallel_skids: String,
    pub parallel_jim: String,
    pub vengeful_shade: String,
    pub random_basic_weakness: String,
    pub faction_count_excluded: String,
}

impl SpecialCards {
    /// Investigators whose ignore-deck-limit changes count as invalid cards
    pub fn tracks_ignored_delta(&self, investigator: &str) -> bool {
        investigator == self.parallel_agnes || investigator == self.parallel_skids
    }
}

impl Default for SpecialCards {
    fn default() -> Self {
        Self {
            adaptable: constants::ADAPTABLE.to_string(),
            deja_vu: constants::DEJA_VU.to_string(),
            arcane_research: constants::ARCANE_RESEARCH.to_string(),
            down_the_rabbit_hole: constants::DOWN_THE_RABBIT_HOLE.to_string(),
            ace_of_rods: constants::ACE_OF_RODS.to_string(),
            parallel_agnes: constants::PARALLEL_AGNES.to_string(),
            parallel_skids: constants::PARALLEL_SKIDS.to_string(),
            parallel_jim: constants::PARALLEL_JIM.to_string(),
            vengeful_shade: constants::VENGEFUL_SHADE.to_string(),
            random_basic_weakness: constants::RANDOM_BASIC_WEAKNESS.to_string(),
            faction_count_excluded: constants::FACTION_COUNT_EXCLUDED.to_string(),
        }
    }
}

/// Configuration for deck parsing
///
/// # Example
///
/// ```
/// use ledger_deck::DeckConfig;
///
/// let config = DeckConfig::default().with_list_separator("\n");
/// assert_eq!(config.list_separator(), "\n");
/// assert_eq!(config.special().adaptable, "02110");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Separator used when appending customization texts to card text
    list_separator: String,
    /// Codes of cards with dedicated rules
    special: SpecialCards,
}

impl DeckConfig {
    /// Create a configuration with the given separator and default codes
    pub fn new(list_separator: impl Into<String>) -> Self {
        Self {
            list_separator: list_separator.into(),
            special: SpecialCards::default(),
        }
    }

    /// Replace the list separator
    pub fn with_list_separator(mut self, separator: impl Into<String>) -> Self {
        self.list_separator = separator.into();
        self
    }

    /// Replace the special card codes
    pub fn with_special(mut self, special: SpecialCards) -> Self {
        self.special = special;
        self
    }

    /// Get the list separator
    pub fn list_separator(&self) -> &str {
        &self.list_separator
    }

    /// Get the special card codes
    pub fn special(&self) -> &SpecialCards {
        &self.special
    }

    /// Set the list separator
    pub fn set_list_separator(&mut self, separator: impl Into<String>) {
        self.list_separator = separator.into();
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self::new(constants::DEFAULT_LIST_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codes() {
        let config = DeckConfig::default();
        assert_eq!(config.list_separator(), ". ");
        assert_eq!(config.special().deja_vu, "60531");
        assert_eq!(config.special().parallel_jim, "90049");
    }

    #[test]
    fn test_tracks_ignored_delta() {
        let special = SpecialCards::default();
        assert!(special.tracks_ignored_delta("90017"));
        assert!(special.tracks_ignored_delta("90008"));
        assert!(!special.tracks_ignored_delta("01001"));
    }

    #[test]
    fn test_builder() {
        let special = SpecialCards {
            adaptable: "X1".to_string(),
            ..SpecialCards::default()
        };
        let mut config = DeckConfig::default().with_special(special);
        config.set_list_separator(" / ");
        assert_eq!(config.special().adaptable, "X1");
        assert_eq!(config.special().arcane_research, "04109");
        assert_eq!(config.list_separator(), " / ");
    }
}
