//! Card definitions as consumed from the catalog

use crate::customization::{CustomizationChoice, CustomizationOption, Selection};
use crate::error::{Error, Result};
use crate::faction::{CardType, Faction, Skill};
use crate::identity::CardCode;
use crate::tags::TagSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Printed resource cost of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardCost {
    /// A fixed cost
    Fixed(i32),
    /// Variable "X" cost
    Variable,
    /// Printed "-" (cannot be played for a cost)
    Dash,
}

impl CardCost {
    /// Histogram bucket: the cost itself, -2 for "X", -1 for "-"
    pub fn bucket(&self) -> i32 {
        match self {
            CardCost::Fixed(cost) => *cost,
            CardCost::Variable => -2,
            CardCost::Dash => -1,
        }
    }

    /// Shift a fixed cost; "X" and "-" are unaffected
    pub fn adjusted(self, delta: i32) -> Self {
        match self {
            CardCost::Fixed(cost) => CardCost::Fixed((cost + delta).max(0)),
            other => other,
        }
    }
}

impl FromStr for CardCost {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "X" | "x" => Ok(CardCost::Variable),
            "-" => Ok(CardCost::Dash),
            other => other
                .parse::<i32>()
                .map(CardCost::Fixed)
                .map_err(|_| Error::InvalidCost(s.to_string())),
        }
    }
}

/// Skill icons printed on a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillIcons {
    #[serde(default)]
    pub willpower: u32,
    #[serde(default)]
    pub intellect: u32,
    #[serde(default)]
    pub combat: u32,
    #[serde(default)]
    pub agility: u32,
    #[serde(default)]
    pub wild: u32,
}

impl SkillIcons {
    /// Number of icons of one kind
    pub fn count(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Willpower => self.willpower,
            Skill::Intellect => self.intellect,
            Skill::Combat => self.combat,
            Skill::Agility => self.agility,
            Skill::Wild => self.wild,
        }
    }
}

/// Deckbuilding size requirement printed on an investigator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRequirements {
    /// Number of cards the deck must hold
    pub size: u32,
    /// Number of cards an extra deck must hold, for investigators that keep one
    #[serde(default)]
    pub extra_size: Option<u32>,
}

/// One deckbuilding option printed on an investigator
///
/// A card is allowed by the option when every populated filter matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOption {
    /// Allowed factions (empty: any)
    #[serde(default)]
    pub factions: Vec<Faction>,
    /// Allowed traits (empty: any)
    #[serde(default)]
    pub traits: Vec<String>,
    /// Minimum level
    #[serde(default)]
    pub level_min: Option<i32>,
    /// Maximum level
    #[serde(default)]
    pub level_max: Option<i32>,
    /// Maximum number of cards this option may grant
    #[serde(default)]
    pub limit: Option<u32>,
}

impl DeckOption {
    /// Check whether the option admits a card
    pub fn admits(&self, card: &Card) -> bool {
        if !self.factions.is_empty() && !card.factions().any(|f| self.factions.contains(&f)) {
            return false;
        }
        if !self.traits.is_empty() && !self.traits.iter().any(|t| card.traits.has(t)) {
            return false;
        }
        let level = card.xp.unwrap_or(0);
        if self.level_min.is_some_and(|min| level < min) {
            return false;
        }
        if self.level_max.is_some_and(|max| level > max) {
            return false;
        }
        true
    }
}

/// A card definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog code
    pub code: CardCode,
    /// Name shared by every level of the card
    pub name: String,
    /// Card type
    pub type_code: CardType,
    /// Subtype code ("weakness", "basicweakness")
    #[serde(default)]
    pub subtype_code: Option<String>,
    /// Primary faction
    pub faction_code: Faction,
    #[serde(default)]
    pub faction2_code: Option<Faction>,
    #[serde(default)]
    pub faction3_code: Option<Faction>,
    /// Experience level; `None` for story cards that cannot be upgraded
    #[serde(default)]
    pub xp: Option<i32>,
    /// Exceptional cards cost double their level
    #[serde(default)]
    pub exceptional: bool,
    /// Taboo surcharge added on top of the level cost
    #[serde(default)]
    pub extra_xp: i32,
    #[serde(default)]
    pub cost: Option<CardCost>,
    #[serde(default)]
    pub icons: SkillIcons,
    /// Printed slot text ("Hand", "Hand x2", "Hand. Arcane")
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub traits: TagSet,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub customization_options: Vec<CustomizationOption>,
    #[serde(default)]
    pub permanent: bool,
    /// Card carries the Exile keyword
    #[serde(default)]
    pub exile: bool,
    #[serde(default)]
    pub myriad: bool,
    #[serde(default)]
    pub double_sided: bool,
    #[serde(default)]
    pub mythos_card: bool,
    /// Card can only be taken by specific investigators
    #[serde(default)]
    pub has_restrictions: bool,
    /// Set for encounter cards
    #[serde(default)]
    pub encounter_code: Option<String>,
    #[serde(default)]
    pub pack_code: String,
    #[serde(default)]
    pub deck_limit: Option<u32>,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub sanity: Option<u32>,
    /// Investigator deck size requirement
    #[serde(default)]
    pub deck_requirements: Option<DeckRequirements>,
    /// Investigator deckbuilding options
    #[serde(default)]
    pub deck_options: Vec<DeckOption>,
    /// Fan-made content
    #[serde(default)]
    pub fan_made: bool,
}

impl Card {
    /// Create a level 0 neutral card of the given type
    pub fn new(code: impl Into<CardCode>, name: impl Into<String>, type_code: CardType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            type_code,
            subtype_code: None,
            faction_code: Faction::Neutral,
            faction2_code: None,
            faction3_code: None,
            xp: Some(0),
            exceptional: false,
            extra_xp: 0,
            cost: None,
            icons: SkillIcons::default(),
            slot: None,
            traits: TagSet::new(),
            text: None,
            customization_options: Vec::new(),
            permanent: false,
            exile: false,
            myriad: false,
            double_sided: false,
            mythos_card: false,
            has_restrictions: false,
            encounter_code: None,
            pack_code: String::new(),
            deck_limit: Some(2),
            health: None,
            sanity: None,
            deck_requirements: None,
            deck_options: Vec::new(),
            fan_made: false,
        }
    }

    /// Set the experience level (`None` makes it a story card)
    pub fn with_xp(mut self, xp: Option<i32>) -> Self {
        self.xp = xp;
        self
    }

    /// Set the primary faction
    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction_code = faction;
        self
    }

    /// Replace the traits
    pub fn with_traits(mut self, traits: &str) -> Self {
        self.traits = TagSet::parse(traits);
        self
    }

    /// Set the printed slot text
    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slot = Some(slot.to_string());
        self
    }

    /// Set the printed cost
    pub fn with_cost(mut self, cost: CardCost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Total experience cost: level (doubled when exceptional) plus taboo surcharge
    pub fn total_xp(&self) -> i32 {
        let multiplier = if self.exceptional { 2 } else { 1 };
        multiplier * self.xp.unwrap_or(0) + self.extra_xp
    }

    /// Card cannot be upgraded and is added for free
    pub fn is_story(&self) -> bool {
        self.xp.is_none()
    }

    /// Printed cost after customizations
    pub fn real_cost(&self) -> Option<CardCost> {
        self.cost
    }

    /// Number of skill icons of one kind
    pub fn skill_count(&self, skill: Skill) -> u32 {
        self.icons.count(skill)
    }

    /// Primary faction
    pub fn faction_code(&self) -> Faction {
        self.faction_code
    }

    /// Every faction the card belongs to
    pub fn factions(&self) -> impl Iterator<Item = Faction> + '_ {
        std::iter::once(self.faction_code)
            .chain(self.faction2_code)
            .chain(self.faction3_code)
    }

    /// Card belongs to more than one faction
    pub fn is_multi_faction(&self) -> bool {
        self.faction2_code.is_some()
    }

    /// Check for a trait (whole tag, case-insensitive)
    pub fn has_trait(&self, tag: &str) -> bool {
        self.traits.has(tag)
    }

    /// Card is a spell
    pub fn is_spell(&self) -> bool {
        self.has_trait("spell")
    }

    /// Normalized slot tags: "Hand x2. Arcane" yields `hand` and `arcane`
    pub fn slots(&self) -> TagSet {
        let mut set = TagSet::new();
        if let Some(slot) = &self.slot {
            for part in slot.split('.') {
                let part = part.trim();
                let part = part.strip_suffix(" x2").unwrap_or(part);
                set.insert(part);
            }
        }
        set
    }

    /// Card is fan-made content
    pub fn custom(&self) -> bool {
        self.fan_made
    }

    /// Card has customization options
    pub fn is_customizable(&self) -> bool {
        !self.customization_options.is_empty()
    }

    /// Weakness (signature or basic)
    pub fn is_weakness(&self) -> bool {
        matches!(
            self.subtype_code.as_deref(),
            Some("weakness") | Some("basicweakness")
        )
    }

    /// Apply unlocked customization choices, returning the customized card
    ///
    /// Unlocked options may replace the slot, add traits, shift the cost and
    /// override the deck limit. Option texts are appended to the card text
    /// with `separator`.
    pub fn with_customizations(
        &self,
        separator: &str,
        choices: Option<&[CustomizationChoice]>,
    ) -> Card {
        let mut card = self.clone();
        let Some(choices) = choices else {
            return card;
        };
        let mut texts: Vec<String> = Vec::new();
        for choice in choices.iter().filter(|c| c.unlocked) {
            let option = &choice.option;
            if let Some(slot) = &option.real_slot {
                card.slot = Some(slot.clone());
            }
            if let Some(traits) = &option.real_traits {
                card.traits.extend(traits);
            }
            if let Some(delta) = option.cost {
                card.cost = card.cost.map(|cost| cost.adjusted(delta));
            }
            if let Some(limit) = option.deck_limit {
                card.deck_limit = Some(limit);
            }
            if let Some(text) = &option.text {
                texts.push(text.clone());
            }
            match &choice.selection {
                Selection::ChooseTrait { traits, .. } => {
                    for tag in traits {
                        card.traits.insert(tag);
                    }
                }
                Selection::RemoveSlot { index, .. } => {
                    card.slot = remove_slot(card.slot.as_deref(), *index);
                }
                Selection::None | Selection::ChooseCard { .. } | Selection::ChooseSkill { .. } => {}
            }
        }
        if !texts.is_empty() {
            let mut parts: Vec<String> = card.text.take().into_iter().collect();
            parts.extend(texts);
            card.text = Some(parts.join(separator));
        }
        card
    }
}

/// Drop the slot at `index` from "A. B" style slot text
fn remove_slot(slot: Option<&str>, index: u32) -> Option<String> {
    let slot = slot?;
    let remaining: Vec<&str> = slot
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .filter(|(i, _)| *i != index as usize)
        .map(|(_, s)| s)
        .collect();
    if remaining.is_empty() {
        None
    } else {
        Some(remaining.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::ChoiceKind;

    fn customizable() -> Card {
        let mut card = Card::new("09021", "Hunter's Armor", CardType::Asset)
            .with_slot("Body. Hand")
            .with_traits("Item. Armor.")
            .with_cost(CardCost::Fixed(3));
        card.customization_options = vec![
            CustomizationOption::new(0, 1).with_cost(-1),
            CustomizationOption::new(1, 2).with_choice(ChoiceKind::RemoveSlot),
            CustomizationOption::new(2, 3).with_choice(ChoiceKind::ChooseTrait),
        ];
        card
    }

    #[test]
    fn test_total_xp() {
        let mut card = Card::new("02300", "Lightning Gun", CardType::Asset).with_xp(Some(5));
        assert_eq!(card.total_xp(), 5);
        card.exceptional = true;
        card.extra_xp = 1;
        assert_eq!(card.total_xp(), 11);
        assert_eq!(card.clone().with_xp(None).total_xp(), 1);
    }

    #[test]
    fn test_deck_option_levels() {
        let option = DeckOption {
            level_min: Some(1),
            level_max: Some(3),
            ..DeckOption::default()
        };
        let card = |xp| Card::new("60205", "Lucky Cigarette Case", CardType::Asset).with_xp(xp);
        assert!(!option.admits(&card(Some(0))));
        assert!(option.admits(&card(Some(1))));
        assert!(option.admits(&card(Some(3))));
        assert!(!option.admits(&card(Some(4))));
        // Story cards read as level 0
        assert!(!option.admits(&card(None)));
        assert!(DeckOption::default().admits(&card(Some(5))));
    }

    #[test]
    fn test_cost_parse() {
        assert_eq!("X".parse::<CardCost>().unwrap(), CardCost::Variable);
        assert_eq!("-".parse::<CardCost>().unwrap(), CardCost::Dash);
        assert_eq!("4".parse::<CardCost>().unwrap(), CardCost::Fixed(4));
        assert!("four".parse::<CardCost>().is_err());
        assert_eq!(CardCost::Variable.bucket(), -2);
        assert_eq!(CardCost::Dash.bucket(), -1);
    }

    #[test]
    fn test_slot_tags() {
        let card = Card::new("1", "Shrivelling", CardType::Asset).with_slot("Hand x2. Arcane");
        let slots = card.slots();
        assert!(slots.has("hand"));
        assert!(slots.has("arcane"));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_factions() {
        let mut card = Card::new("1", "Dual", CardType::Event).with_faction(Faction::Rogue);
        assert!(!card.is_multi_faction());
        card.faction2_code = Some(Faction::Survivor);
        let factions: Vec<Faction> = card.factions().collect();
        assert_eq!(factions, vec![Faction::Rogue, Faction::Survivor]);
    }

    #[test]
    fn test_with_customizations_applies_unlocked_only() {
        let card = customizable();
        let options = card.customization_options.clone();
        let choices = vec![
            CustomizationChoice::basic(options[0].clone(), 1, 0, true),
            CustomizationChoice {
                selection: Selection::RemoveSlot {
                    encoded: "1".to_string(),
                    index: 1,
                },
                ..CustomizationChoice::basic(options[1].clone(), 2, 0, true)
            },
            CustomizationChoice {
                selection: Selection::ChooseTrait {
                    encoded: "Blessed".to_string(),
                    traits: vec!["Blessed".to_string()],
                },
                ..CustomizationChoice::basic(options[2].clone(), 1, 0, false)
            },
        ];
        let customized = card.with_customizations(". ", Some(&choices));
        assert_eq!(customized.real_cost(), Some(CardCost::Fixed(2)));
        assert_eq!(customized.slot.as_deref(), Some("Body"));
        assert!(!customized.has_trait("blessed"));
    }

    #[test]
    fn test_with_customizations_none_is_identity() {
        let card = customizable();
        assert_eq!(card.with_customizations(". ", None), card);
    }
}
