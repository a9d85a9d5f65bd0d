//! Card definition schema, in the shape of the public card data export

use ledger_core::{
    Card, CardCost, CardType, CustomizationOption, DeckOption, DeckRequirements, Faction,
    SkillIcons, TagSet,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A card as written in data files
///
/// Enumerated fields are plain text ("guardian", "asset", "X") and are
/// checked when the card is converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDef {
    pub code: String,
    pub name: String,
    pub type_code: String,
    #[serde(default)]
    pub subtype_code: Option<String>,
    #[serde(default = "default_faction")]
    pub faction_code: String,
    #[serde(default)]
    pub faction2_code: Option<String>,
    #[serde(default)]
    pub faction3_code: Option<String>,
    /// Missing for story cards
    #[serde(default)]
    pub xp: Option<i32>,
    #[serde(default)]
    pub exceptional: bool,
    #[serde(default)]
    pub extra_xp: i32,
    /// Printed cost: a number, "X" or "-"
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub skill_willpower: u32,
    #[serde(default)]
    pub skill_intellect: u32,
    #[serde(default)]
    pub skill_combat: u32,
    #[serde(default)]
    pub skill_agility: u32,
    #[serde(default)]
    pub skill_wild: u32,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub traits: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub customization_options: Vec<CustomizationOption>,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub exile: bool,
    #[serde(default)]
    pub myriad: bool,
    #[serde(default)]
    pub double_sided: bool,
    #[serde(default)]
    pub mythos_card: bool,
    #[serde(default)]
    pub restrictions: bool,
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
    #[serde(default)]
    pub deck_requirements: Option<DeckRequirements>,
    #[serde(default)]
    pub deck_options: Vec<DeckOption>,
    #[serde(default)]
    pub custom: bool,
}

fn default_faction() -> String {
    "neutral".to_string()
}

fn parse_optional<T: std::str::FromStr<Err = ledger_core::Error>>(
    value: Option<&str>,
) -> Result<Option<T>> {
    Ok(value.map(str::parse::<T>).transpose()?)
}

impl CardDef {
    /// Convert into a catalog card
    pub fn into_card(self) -> Result<Card> {
        if self.code.trim().is_empty() {
            return Err(Error::InvalidSchema(format!(
                "card '{}' has an empty code",
                self.name
            )));
        }
        let type_code: CardType = self.type_code.parse()?;
        let mut card = Card::new(self.code, self.name, type_code);
        card.subtype_code = self.subtype_code;
        card.faction_code = self.faction_code.parse::<Faction>()?;
        card.faction2_code = parse_optional(self.faction2_code.as_deref())?;
        card.faction3_code = parse_optional(self.faction3_code.as_deref())?;
        card.xp = self.xp;
        card.exceptional = self.exceptional;
        card.extra_xp = self.extra_xp;
        card.cost = parse_optional::<CardCost>(self.cost.as_deref())?;
        card.icons = SkillIcons {
            willpower: self.skill_willpower,
            intellect: self.skill_intellect,
            combat: self.skill_combat,
            agility: self.skill_agility,
            wild: self.skill_wild,
        };
        card.slot = self.slot;
        card.traits = self.traits.map(TagSet::from).unwrap_or_default();
        card.text = self.text;
        card.customization_options = self.customization_options;
        card.permanent = self.permanent;
        card.exile = self.exile;
        card.myriad = self.myriad;
        card.double_sided = self.double_sided;
        card.mythos_card = self.mythos_card;
        card.has_restrictions = self.restrictions;
        card.encounter_code = self.encounter_code;
        card.pack_code = self.pack_code;
        card.deck_limit = self.deck_limit;
        card.health = self.health;
        card.sanity = self.sanity;
        card.deck_requirements = self.deck_requirements;
        card.deck_options = self.deck_options;
        card.fan_made = self.custom;
        Ok(card)
    }
}

/// A collection of card definitions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CardDefs {
    pub cards: Vec<CardDef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Skill;

    #[test]
    fn test_card_def_ron() {
        let ron_str = r#"
        (
            code: "01016",
            name: ".45 Automatic",
            type_code: "asset",
            faction_code: "guardian",
            xp: Some(0),
            cost: Some("4"),
            skill_agility: 1,
            slot: Some("Hand"),
            traits: Some("Item. Weapon. Firearm."),
            pack_code: "core",
            deck_limit: Some(2),
        )
        "#;

        let card = ron::from_str::<CardDef>(ron_str).unwrap().into_card().unwrap();
        assert_eq!(card.code.as_str(), "01016");
        assert_eq!(card.faction_code, Faction::Guardian);
        assert_eq!(card.cost, Some(CardCost::Fixed(4)));
        assert_eq!(card.skill_count(Skill::Agility), 1);
        assert!(card.has_trait("Firearm"));
        assert!(!card.is_story());
    }

    #[test]
    fn test_story_card_defaults() {
        let ron_str =
            r#"(code: "01104", name: "Lita Chantler", type_code: "asset", cost: Some("X"))"#;

        let card = ron::from_str::<CardDef>(ron_str).unwrap().into_card().unwrap();
        assert_eq!(card.faction_code, Faction::Neutral);
        assert_eq!(card.cost, Some(CardCost::Variable));
        assert!(card.is_story());
    }

    #[test]
    fn test_unknown_faction_rejected() {
        let ron_str = r#"(code: "x1", name: "Odd", type_code: "event", faction_code: "cultist")"#;

        let def = ron::from_str::<CardDef>(ron_str).unwrap();
        assert!(matches!(
            def.into_card(),
            Err(Error::Core(ledger_core::Error::UnknownFaction(_)))
        ));
    }

    #[test]
    fn test_empty_code_rejected() {
        let ron_str = r#"(code: " ", name: "Blank", type_code: "skill")"#;

        let def = ron::from_str::<CardDef>(ron_str).unwrap();
        assert!(matches!(def.into_card(), Err(Error::InvalidSchema(_))));
    }
}
