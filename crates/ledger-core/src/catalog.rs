//! Card catalog lookup

use crate::card::Card;
use crate::identity::CardCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only card lookup by code
///
/// Unknown codes yield `None`; callers exclude them from aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCatalog {
    cards: IndexMap<CardCode, Card>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, returning the card it replaced
    pub fn insert(&mut self, card: Card) -> Option<Card> {
        self.cards.insert(card.code.clone(), card)
    }

    /// Look up a card by code
    pub fn get(&self, code: &str) -> Option<&Card> {
        self.cards.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.cards.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<Card> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::CardType;

    #[test]
    fn test_catalog_lookup() {
        let catalog: CardCatalog = vec![
            Card::new("01016", ".45 Automatic", CardType::Asset),
            Card::new("01017", "Physical Training", CardType::Asset),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("01017").unwrap().name, "Physical Training");
        assert!(catalog.get("99999").is_none());
    }
}
