//! Closed enumerations of the card game: factions, skills, slots and card types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Guardian,
    Seeker,
    Rogue,
    Mystic,
    Survivor,
    Neutral,
    Mythos,
}

impl Faction {
    /// Factions a player deck can draw from, in display order
    pub const PLAYER: [Faction; 6] = [
        Faction::Guardian,
        Faction::Seeker,
        Faction::Rogue,
        Faction::Mystic,
        Faction::Survivor,
        Faction::Neutral,
    ];

    /// Lowercase code used by card data
    pub fn code(&self) -> &'static str {
        match self {
            Faction::Guardian => "guardian",
            Faction::Seeker => "seeker",
            Faction::Rogue => "rogue",
            Faction::Mystic => "mystic",
            Faction::Survivor => "survivor",
            Faction::Neutral => "neutral",
            Faction::Mythos => "mythos",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Faction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "guardian" => Ok(Faction::Guardian),
            "seeker" => Ok(Faction::Seeker),
            "rogue" => Ok(Faction::Rogue),
            "mystic" => Ok(Faction::Mystic),
            "survivor" => Ok(Faction::Survivor),
            "neutral" => Ok(Faction::Neutral),
            "mythos" => Ok(Faction::Mythos),
            other => Err(Error::UnknownFaction(other.to_string())),
        }
    }
}

/// Skill icon kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Willpower,
    Intellect,
    Combat,
    Agility,
    Wild,
}

impl Skill {
    /// Every skill icon, in histogram order
    pub const ALL: [Skill; 5] = [
        Skill::Willpower,
        Skill::Intellect,
        Skill::Combat,
        Skill::Agility,
        Skill::Wild,
    ];

    /// Lowercase code used by card data
    pub fn code(&self) -> &'static str {
        match self {
            Skill::Willpower => "willpower",
            Skill::Intellect => "intellect",
            Skill::Combat => "combat",
            Skill::Agility => "agility",
            Skill::Wild => "wild",
        }
    }
}

impl FromStr for Skill {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "willpower" => Ok(Skill::Willpower),
            "intellect" => Ok(Skill::Intellect),
            "combat" => Ok(Skill::Combat),
            "agility" => Ok(Skill::Agility),
            "wild" => Ok(Skill::Wild),
            other => Err(Error::UnknownSkill(other.to_string())),
        }
    }
}

/// Equipment slot an asset occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Hand,
    Arcane,
    Accessory,
    Body,
    Ally,
    Tarot,
}

impl SlotKind {
    /// Every slot kind, in histogram order
    pub const ALL: [SlotKind; 6] = [
        SlotKind::Hand,
        SlotKind::Arcane,
        SlotKind::Accessory,
        SlotKind::Body,
        SlotKind::Ally,
        SlotKind::Tarot,
    ];

    /// Lowercase tag used by normalized slot sets
    pub fn code(&self) -> &'static str {
        match self {
            SlotKind::Hand => "hand",
            SlotKind::Arcane => "arcane",
            SlotKind::Accessory => "accessory",
            SlotKind::Body => "body",
            SlotKind::Ally => "ally",
            SlotKind::Tarot => "tarot",
        }
    }
}

impl FromStr for SlotKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hand" => Ok(SlotKind::Hand),
            "arcane" => Ok(SlotKind::Arcane),
            "accessory" => Ok(SlotKind::Accessory),
            "body" => Ok(SlotKind::Body),
            "ally" => Ok(SlotKind::Ally),
            "tarot" => Ok(SlotKind::Tarot),
            _ => Err(Error::UnknownSlot(s.to_string())),
        }
    }
}

/// Card type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Investigator,
    Asset,
    Event,
    Skill,
    Treachery,
    Enemy,
    Location,
    Story,
}

impl FromStr for CardType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "investigator" => Ok(CardType::Investigator),
            "asset" => Ok(CardType::Asset),
            "event" => Ok(CardType::Event),
            "skill" => Ok(CardType::Skill),
            "treachery" => Ok(CardType::Treachery),
            "enemy" => Ok(CardType::Enemy),
            "location" => Ok(CardType::Location),
            "story" => Ok(CardType::Story),
            other => Err(Error::UnknownCardType(other.to_string())),
        }
    }
}
