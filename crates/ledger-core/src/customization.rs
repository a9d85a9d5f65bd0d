//! Customization tracks printed on customizable cards and the typed choices
//! a deck has made on them

use crate::card::Card;
use crate::faction::Skill;
use crate::identity::CardCode;
use crate::tags::TagSet;
use serde::{Deserialize, Serialize};

/// The kind of sub-choice an option asks for when unlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    RemoveSlot,
    ChooseTrait,
    ChooseCard,
    ChooseSkill,
}

/// One customization option printed on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationOption {
    /// Position of the option on the card
    pub index: u32,
    /// Experience needed to unlock the option
    pub xp: i32,
    #[serde(default)]
    pub choice: Option<ChoiceKind>,
    /// Traits gained when unlocked
    #[serde(default)]
    pub real_traits: Option<TagSet>,
    /// Slot text replacing the printed slot when unlocked
    #[serde(default)]
    pub real_slot: Option<String>,
    /// Cost delta applied when unlocked
    #[serde(default)]
    pub cost: Option<i32>,
    /// Deck limit override
    #[serde(default)]
    pub deck_limit: Option<u32>,
    /// Rules text appended to the card when unlocked
    #[serde(default)]
    pub text: Option<String>,
}

impl CustomizationOption {
    /// Create a plain option
    pub fn new(index: u32, xp: i32) -> Self {
        Self {
            index,
            xp,
            choice: None,
            real_traits: None,
            real_slot: None,
            cost: None,
            deck_limit: None,
            text: None,
        }
    }

    /// Require a sub-choice
    pub fn with_choice(mut self, choice: ChoiceKind) -> Self {
        self.choice = Some(choice);
        self
    }

    /// Shift the card cost when unlocked
    pub fn with_cost(mut self, delta: i32) -> Self {
        self.cost = Some(delta);
        self
    }

    /// Replace the slot when unlocked
    pub fn with_slot(mut self, slot: &str) -> Self {
        self.real_slot = Some(slot.to_string());
        self
    }

    /// Add traits when unlocked
    pub fn with_traits(mut self, traits: &str) -> Self {
        self.real_traits = Some(TagSet::parse(traits));
        self
    }

    /// Append rules text when unlocked
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }
}

/// A raw decision parsed from the compact `index|xp|choice` encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationDecision {
    pub index: u32,
    pub spent_xp: i32,
    #[serde(default)]
    pub choice: Option<String>,
}

impl CustomizationDecision {
    pub fn new(index: u32, spent_xp: i32) -> Self {
        Self {
            index,
            spent_xp,
            choice: None,
        }
    }

    /// Attach the encoded sub-choice
    pub fn with_choice(mut self, choice: &str) -> Self {
        self.choice = Some(choice.to_string());
        self
    }
}

/// A typed sub-choice; every variant keeps its encoded form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    RemoveSlot {
        encoded: String,
        index: u32,
    },
    ChooseTrait {
        encoded: String,
        traits: Vec<String>,
    },
    ChooseCard {
        encoded: String,
        codes: Vec<CardCode>,
        /// Codes that resolved against the catalog
        cards: Vec<Card>,
    },
    ChooseSkill {
        encoded: String,
        skill: Option<Skill>,
    },
}

impl Selection {
    /// The encoded sub-choice, if any
    pub fn encoded(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::RemoveSlot { encoded, .. }
            | Selection::ChooseTrait { encoded, .. }
            | Selection::ChooseCard { encoded, .. }
            | Selection::ChooseSkill { encoded, .. } => Some(encoded),
        }
    }
}

/// A resolved customization choice for one option of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationChoice {
    pub option: CustomizationOption,
    /// Experience spent on the option so far
    pub xp_spent: i32,
    /// Experience already paid in the previous snapshot
    pub xp_locked: i32,
    /// Can still be changed
    pub editable: bool,
    /// Fully paid
    pub unlocked: bool,
    pub selection: Selection,
}

impl CustomizationChoice {
    /// Build a choice without a sub-selection; `unlocked` follows the spend
    pub fn basic(option: CustomizationOption, xp_spent: i32, xp_locked: i32, editable: bool) -> Self {
        let unlocked = xp_spent == option.xp;
        Self {
            option,
            xp_spent,
            xp_locked,
            editable,
            unlocked,
            selection: Selection::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocked_follows_spend() {
        let option = CustomizationOption::new(2, 3);
        assert!(!CustomizationChoice::basic(option.clone(), 2, 0, true).unlocked);
        assert!(CustomizationChoice::basic(option, 3, 0, true).unlocked);
    }

    #[test]
    fn test_selection_encoded() {
        assert_eq!(Selection::None.encoded(), None);
        let selection = Selection::ChooseSkill {
            encoded: "combat".to_string(),
            skill: Some(Skill::Combat),
        };
        assert_eq!(selection.encoded(), Some("combat"));
    }

    #[test]
    fn test_option_from_ron() {
        let option: CustomizationOption =
            ron::from_str(r#"(index: 1, xp: 2, choice: Some(choose_trait), real_traits: Some("Blessed."))"#)
                .unwrap();
        assert_eq!(option.choice, Some(ChoiceKind::ChooseTrait));
        assert!(option.real_traits.unwrap().has("blessed"));
    }
}
