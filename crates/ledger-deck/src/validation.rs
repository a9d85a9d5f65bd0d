//! Deck legality collaborator
//!
//! The accountant and the parser only ask a few questions of the legality
//! rules (deck size, invalid cards, eldritch brand target). [`DeckValidation`]
//! is that seam; [`StandardRules`] is a reference implementation driven by the
//! investigator card's deck requirements and deckbuilding options.

use indexmap::IndexMap;
use ledger_core::{Card, CardCatalog, CardCode, DeckOption, Slots};
use serde::{Deserialize, Serialize};

use crate::customization::parse_customization_decision;
use crate::deck::{Deck, DeckMeta};
use crate::error::{Error, Result};

/// The three investigator cards a deck is built around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigatorCards {
    /// The investigator the deck was created for
    pub main: Card,
    /// Card providing the front side (stats, abilities)
    pub front: Card,
    /// Card providing the back side (deckbuilding)
    pub back: Card,
}

impl InvestigatorCards {
    /// Look up the investigator cards of a deck
    pub fn resolve(catalog: &CardCatalog, deck: &Deck) -> Result<Self> {
        let lookup = |role: &'static str, code: &str| {
            catalog.get(code).cloned().ok_or_else(|| Error::MissingInvestigator {
                role,
                code: code.to_string(),
            })
        };
        Ok(Self {
            main: lookup("main", deck.investigator_code.as_str())?,
            front: lookup("front", deck.front_code())?,
            back: lookup("back", deck.back_code())?,
        })
    }
}

/// Why a deck is not legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckProblemKind {
    TooFewCards,
    TooManyCards,
    TooManyCopies,
    InvalidCards,
}

/// A legality problem with the cards that cause it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckProblem {
    pub reason: DeckProblemKind,
    #[serde(default)]
    pub invalid_cards: Vec<Card>,
}

impl DeckProblem {
    pub fn new(reason: DeckProblemKind) -> Self {
        Self {
            reason,
            invalid_cards: Vec::new(),
        }
    }

    /// Check whether a code is among the invalid cards
    pub fn is_invalid(&self, code: &str) -> bool {
        self.invalid_cards.iter().any(|c| c.code.as_str() == code)
    }
}

/// Legality rules for one deck
///
/// `cards` are always expanded card instances (one entry per copy, with
/// customizations applied and ignore-deck-limit copies removed).
pub trait DeckValidation {
    /// The investigator the rules were built for
    fn investigator(&self) -> &InvestigatorCards;

    /// Required number of cards for this card list
    fn deck_size(&self, cards: &[Card]) -> i32;

    /// First legality problem, if any
    fn problem(&self, cards: &[Card]) -> Option<DeckProblem>;

    /// Card instances the investigator may not include
    fn invalid_cards(&self, cards: &[Card]) -> Vec<Card> {
        cards
            .iter()
            .filter(|card| !self.can_include_card(card, false, cards))
            .cloned()
            .collect()
    }

    /// Check a single card against the deckbuilding options
    fn can_include_card(&self, card: &Card, is_extra_deck: bool, current_cards: &[Card]) -> bool;

    /// Card is only allowed through a limited deckbuilding option
    fn is_card_limited(&self, card: &Card, current_cards: &[Card]) -> bool;

    /// Card chosen by an Eldritch Brand customization, if any
    fn eldritch_branded_card_code(&self) -> Option<CardCode>;

    /// Deckbuilding options in force for this card list
    fn deck_options(&self, cards: &[Card]) -> Vec<DeckOption>;
}

/// Factory for [`DeckValidation`] instances
pub trait DeckRules {
    type Validation: DeckValidation;

    /// Build the rules for an investigator and a slot set
    fn validation(
        &self,
        investigator: &InvestigatorCards,
        slots: &Slots,
        meta: &DeckMeta,
        extra_deck: bool,
    ) -> Self::Validation;
}

/// Reference rules
///
/// Deck size comes from the investigator's deck requirements plus the size
/// modifiers of the cards in the deck; legality comes from the deckbuilding
/// options printed on the investigator back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardRules {
    /// Cards that change the required deck size while in the deck
    #[serde(default)]
    size_modifiers: IndexMap<CardCode, i32>,
    /// Customizable card whose chosen card may be branded
    #[serde(default)]
    eldritch_brand: Option<CardCode>,
}

impl StandardRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card that changes the deck size by `delta` per copy
    pub fn with_size_modifier(mut self, code: impl Into<CardCode>, delta: i32) -> Self {
        self.size_modifiers.insert(code.into(), delta);
        self
    }

    /// Register the Eldritch Brand card
    pub fn with_eldritch_brand(mut self, code: impl Into<CardCode>) -> Self {
        self.eldritch_brand = Some(code.into());
        self
    }
}

impl DeckRules for StandardRules {
    type Validation = StandardValidation;

    fn validation(
        &self,
        investigator: &InvestigatorCards,
        slots: &Slots,
        meta: &DeckMeta,
        extra_deck: bool,
    ) -> StandardValidation {
        // The branded card is the last card choice recorded on Eldritch Brand
        let branded = self
            .eldritch_brand
            .as_ref()
            .filter(|code| slots.get(code.as_str()) > 0)
            .and_then(|code| {
                parse_customization_decision(meta.customization(code.as_str()))
                    .into_iter()
                    .filter_map(|d| d.choice)
                    .filter(|choice| !choice.is_empty())
                    .last()
            })
            .map(CardCode::from);
        StandardValidation {
            investigator: investigator.clone(),
            size_modifiers: self.size_modifiers.clone(),
            branded,
            extra_deck,
        }
    }
}

/// [`DeckValidation`] built by [`StandardRules`]
#[derive(Debug, Clone, PartialEq)]
pub struct StandardValidation {
    investigator: InvestigatorCards,
    size_modifiers: IndexMap<CardCode, i32>,
    branded: Option<CardCode>,
    extra_deck: bool,
}

impl StandardValidation {
    fn base_size(&self) -> i32 {
        let requirements = self.investigator.back.deck_requirements.as_ref();
        let size = if self.extra_deck {
            requirements.and_then(|r| r.extra_size)
        } else {
            requirements.map(|r| r.size)
        };
        size.map(|s| s as i32).unwrap_or(if self.extra_deck { 0 } else { 30 })
    }

    /// Cards that take up a deck slot
    fn counts_toward_size(card: &Card) -> bool {
        !card.permanent && !card.is_weakness() && card.xp.is_some()
    }

    fn admitting_option<'a>(&'a self, card: &Card) -> Option<&'a DeckOption> {
        self.investigator
            .back
            .deck_options
            .iter()
            .find(|option| option.admits(card))
    }
}

impl DeckValidation for StandardValidation {
    fn investigator(&self) -> &InvestigatorCards {
        &self.investigator
    }

    fn deck_size(&self, cards: &[Card]) -> i32 {
        if self.extra_deck {
            return self.base_size();
        }
        let modifier: i32 = cards
            .iter()
            .map(|card| self.size_modifiers.get(&card.code).copied().unwrap_or(0))
            .sum();
        self.base_size() + modifier
    }

    fn problem(&self, cards: &[Card]) -> Option<DeckProblem> {
        let invalid = self.invalid_cards(cards);
        if !invalid.is_empty() {
            return Some(DeckProblem {
                reason: DeckProblemKind::InvalidCards,
                invalid_cards: invalid,
            });
        }
        let mut copies: IndexMap<&str, (u32, Option<u32>)> = IndexMap::new();
        for card in cards {
            let entry = copies.entry(card.name.as_str()).or_insert((0, card.deck_limit));
            entry.0 += 1;
        }
        if copies
            .values()
            .any(|(count, limit)| limit.is_some_and(|limit| *count > limit))
        {
            return Some(DeckProblem::new(DeckProblemKind::TooManyCopies));
        }
        let size = cards.iter().filter(|c| Self::counts_toward_size(c)).count() as i32;
        let required = self.deck_size(cards);
        if size < required {
            return Some(DeckProblem::new(DeckProblemKind::TooFewCards));
        }
        if size > required {
            return Some(DeckProblem::new(DeckProblemKind::TooManyCards));
        }
        None
    }

    fn can_include_card(&self, card: &Card, _is_extra_deck: bool, _current_cards: &[Card]) -> bool {
        if card.is_weakness() || card.xp.is_none() || card.code == self.investigator.main.code {
            return true;
        }
        self.investigator.back.deck_options.is_empty() || self.admitting_option(card).is_some()
    }

    fn is_card_limited(&self, card: &Card, _current_cards: &[Card]) -> bool {
        self.admitting_option(card)
            .is_some_and(|option| option.limit.is_some())
    }

    fn eldritch_branded_card_code(&self) -> Option<CardCode> {
        self.branded.clone()
    }

    fn deck_options(&self, _cards: &[Card]) -> Vec<DeckOption> {
        self.investigator.back.deck_options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{CardType, DeckRequirements, Faction};

    fn investigator() -> InvestigatorCards {
        let mut card = Card::new("01004", "Roland Banks", CardType::Investigator)
            .with_faction(Faction::Guardian);
        card.deck_requirements = Some(DeckRequirements {
            size: 3,
            extra_size: None,
        });
        card.deck_options = vec![
            DeckOption {
                factions: vec![Faction::Guardian, Faction::Neutral],
                level_max: Some(5),
                ..DeckOption::default()
            },
            DeckOption {
                factions: vec![Faction::Seeker],
                level_max: Some(0),
                limit: Some(5),
                ..DeckOption::default()
            },
        ];
        InvestigatorCards {
            main: card.clone(),
            front: card.clone(),
            back: card,
        }
    }

    fn card(code: &str, faction: Faction, xp: i32) -> Card {
        Card::new(code, code, CardType::Asset)
            .with_faction(faction)
            .with_xp(Some(xp))
    }

    #[test]
    fn test_resolve_missing_investigator() {
        let catalog = CardCatalog::new();
        let err = InvestigatorCards::resolve(&catalog, &Deck::new("1", "01004")).unwrap_err();
        assert_eq!(
            err,
            Error::MissingInvestigator {
                role: "main",
                code: "01004".to_string()
            }
        );
    }

    #[test]
    fn test_include_and_limited() {
        let validation = StandardRules::new().validation(
            &investigator(),
            &Slots::new(),
            &DeckMeta::new(),
            false,
        );
        let guardian = card("01016", Faction::Guardian, 0);
        let seeker = card("01030", Faction::Seeker, 0);
        let seeker_upgrade = card("01039", Faction::Seeker, 2);
        let rogue = card("01045", Faction::Rogue, 0);
        assert!(validation.can_include_card(&guardian, false, &[]));
        assert!(validation.can_include_card(&seeker, false, &[]));
        assert!(!validation.can_include_card(&seeker_upgrade, false, &[]));
        assert!(!validation.can_include_card(&rogue, false, &[]));
        assert!(validation.is_card_limited(&seeker, &[]));
        assert!(!validation.is_card_limited(&guardian, &[]));

        let cards = vec![guardian, rogue.clone()];
        assert_eq!(validation.invalid_cards(&cards), vec![rogue]);
        let problem = validation.problem(&cards).unwrap();
        assert_eq!(problem.reason, DeckProblemKind::InvalidCards);
        assert!(problem.is_invalid("01045"));
    }

    #[test]
    fn test_deck_size_and_problems() {
        let rules = StandardRules::new().with_size_modifier("06167", 2);
        let validation = rules.validation(&investigator(), &Slots::new(), &DeckMeta::new(), false);
        let a = card("01016", Faction::Guardian, 0);
        let b = card("01017", Faction::Guardian, 0);
        assert_eq!(validation.deck_size(&[a.clone()]), 3);
        assert_eq!(
            validation.problem(&[a.clone(), b.clone()]).map(|p| p.reason),
            Some(DeckProblemKind::TooFewCards)
        );
        let versatile = card("06167", Faction::Neutral, 0);
        assert_eq!(validation.deck_size(&[versatile.clone()]), 5);
        assert_eq!(
            validation.problem(&[a.clone(), a.clone(), a]).map(|p| p.reason),
            Some(DeckProblemKind::TooManyCopies)
        );
        assert_eq!(
            validation.problem(&[versatile, b.clone(), b]).map(|p| p.reason),
            Some(DeckProblemKind::TooFewCards)
        );
    }

    #[test]
    fn test_eldritch_brand_choice() {
        let rules = StandardRules::new().with_eldritch_brand("11087");
        let meta = DeckMeta::new().with("cus_11087", "0|0,1|1|06116");
        let slots = Slots::from([("11087", 1)]);
        let validation = rules.validation(&investigator(), &slots, &meta, false);
        assert_eq!(
            validation.eldritch_branded_card_code(),
            Some(CardCode::new("06116"))
        );
        let without_card = rules.validation(&investigator(), &Slots::new(), &meta, false);
        assert_eq!(without_card.eldritch_branded_card_code(), None);
    }

    #[test]
    fn test_extra_deck_size() {
        let mut cards = investigator();
        cards.back.deck_requirements = Some(DeckRequirements {
            size: 30,
            extra_size: Some(10),
        });
        let validation =
            StandardRules::new().validation(&cards, &Slots::new(), &DeckMeta::new(), true);
        assert_eq!(validation.deck_size(&[]), 10);
        assert_eq!(validation.deck_options(&[]).len(), 2);
    }
}
