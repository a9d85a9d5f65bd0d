//! Ledger Deck - deck parsing and experience accounting
//!
//! This crate provides:
//! - Deck records with their free-form metadata (`Deck`, `DeckMeta`)
//! - Customization resolution from deck metadata (`resolve_customizations`)
//! - Deck legality checks behind a pluggable rule set (`DeckRules`, `DeckValidation`)
//! - Experience accounting between a deck and its previous version (`compute_changes`)
//! - Composition summaries for display (`split_cards`, `cost_histogram`, ...)
//! - A one-call parser tying the above together (`parse_deck`)
//!
//! Special card codes are configurable through `DeckConfig`; the defaults live
//! in [`constants`].

mod changes;
mod config;
pub mod constants;
mod customization;
mod deck;
mod error;
mod parse;
mod summary;
mod validation;

pub use changes::{compute_changes, DeckChanges, DeckSnapshot, SpecialDiscount, SpecialDiscounts};
pub use config::{DeckConfig, SpecialCards};
pub use customization::{
    customization_xp, encode_customization_decisions, parse_customization_decision,
    process_advanced_choice, resolve_customizations, Customizations,
};
pub use deck::{Deck, DeckMeta};
pub use error::{Error, Result};
pub use parse::{calculate_total_xp, get_cards, parse_deck, ParsedDeck};
pub use summary::{
    cost_histogram, faction_count, faction_counts, group_assets, is_special_card,
    skill_icon_counts, slot_counts, split_cards, AssetGroup, AssetGroupKind, CardId,
    FactionCount, FactionCounts, SkillCounts, SlotCounts, SplitCards, COST_HISTOGRAM_MAX,
    COST_HISTOGRAM_MIN,
};
pub use validation::{
    DeckProblem, DeckProblemKind, DeckRules, DeckValidation, InvestigatorCards, StandardRules,
    StandardValidation,
};
