//! Ledger Core - shared card data model for the campaign ledger
//!
//! This crate provides the read-only types consumed by the campaign and deck crates:
//! - Card identity (`CardCode`) and the card catalog (`CardCatalog`)
//! - Card definitions with cost, level, faction and flag data (`Card`)
//! - Delimited trait/slot text parsed into tag sets (`TagSet`)
//! - Code-to-quantity slot maps (`Slots`)
//! - Customization options and resolved choices

mod card;
mod catalog;
mod customization;
mod error;
mod faction;
mod identity;
mod slots;
mod tags;

pub use card::{Card, CardCost, DeckOption, DeckRequirements, SkillIcons};
pub use catalog::CardCatalog;
pub use customization::{
    ChoiceKind, CustomizationChoice, CustomizationDecision, CustomizationOption, Selection,
};
pub use error::{Error, Result};
pub use faction::{CardType, Faction, Skill, SlotKind};
pub use identity::{CardCode, InvestigatorCode};
pub use slots::Slots;
pub use tags::TagSet;
