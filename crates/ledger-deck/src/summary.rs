//! Deck composition summaries: display groupings and histograms

use indexmap::IndexMap;
use ledger_core::{Card, CardCatalog, CardCode, CardType, Faction, Skill, SlotKind};
use serde::{Deserialize, Serialize};

use crate::config::SpecialCards;
use crate::customization::Customizations;

/// Lowest cost bucket ("X")
pub const COST_HISTOGRAM_MIN: i32 = -2;
/// Highest cost bucket
pub const COST_HISTOGRAM_MAX: i32 = 10;

/// One catalog card in a deck listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardId {
    pub id: CardCode,
    pub quantity: i32,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub limited: bool,
    #[serde(default)]
    pub custom: bool,
    /// Quantity counts ignore-deck-limit copies only
    #[serde(default)]
    pub ignore_count: bool,
}

impl CardId {
    pub fn new(id: impl Into<CardCode>, quantity: i32) -> Self {
        Self {
            id: id.into(),
            quantity,
            invalid: false,
            limited: false,
            custom: false,
            ignore_count: false,
        }
    }
}

/// Display bucket of an asset, keyed on its slot text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetGroupKind {
    Hand,
    HandX2,
    Arcane,
    ArcaneX2,
    Accessory,
    Body,
    Ally,
    Tarot,
    HandArcane,
    BodyHandX2,
    AllyArcane,
    Other,
}

impl AssetGroupKind {
    /// Buckets in display order
    pub const ALL: [AssetGroupKind; 12] = [
        AssetGroupKind::Hand,
        AssetGroupKind::HandX2,
        AssetGroupKind::Arcane,
        AssetGroupKind::ArcaneX2,
        AssetGroupKind::Accessory,
        AssetGroupKind::Body,
        AssetGroupKind::Ally,
        AssetGroupKind::Tarot,
        AssetGroupKind::HandArcane,
        AssetGroupKind::BodyHandX2,
        AssetGroupKind::AllyArcane,
        AssetGroupKind::Other,
    ];

    /// Bucket for an exact slot text
    pub fn from_slot(slot: Option<&str>) -> Self {
        match slot {
            Some("Hand") => AssetGroupKind::Hand,
            Some("Hand x2") => AssetGroupKind::HandX2,
            Some("Arcane") => AssetGroupKind::Arcane,
            Some("Arcane x2") => AssetGroupKind::ArcaneX2,
            Some("Accessory") => AssetGroupKind::Accessory,
            Some("Body") => AssetGroupKind::Body,
            Some("Ally") => AssetGroupKind::Ally,
            Some("Tarot") => AssetGroupKind::Tarot,
            Some("Hand. Arcane") => AssetGroupKind::HandArcane,
            Some("Body. Hand x2") => AssetGroupKind::BodyHandX2,
            Some("Ally. Arcane") => AssetGroupKind::AllyArcane,
            _ => AssetGroupKind::Other,
        }
    }

    /// Display label, the slot text of the bucket
    pub fn label(&self) -> &'static str {
        match self {
            AssetGroupKind::Hand => "Hand",
            AssetGroupKind::HandX2 => "Hand x2",
            AssetGroupKind::Arcane => "Arcane",
            AssetGroupKind::ArcaneX2 => "Arcane x2",
            AssetGroupKind::Accessory => "Accessory",
            AssetGroupKind::Body => "Body",
            AssetGroupKind::Ally => "Ally",
            AssetGroupKind::Tarot => "Tarot",
            AssetGroupKind::HandArcane => "Hand. Arcane",
            AssetGroupKind::BodyHandX2 => "Body. Hand x2",
            AssetGroupKind::AllyArcane => "Ally. Arcane",
            AssetGroupKind::Other => "Other",
        }
    }
}

/// Assets sharing a display bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub kind: AssetGroupKind,
    pub cards: Vec<CardId>,
}

/// A card listing split by card type
///
/// Empty categories stay empty; investigators are listed with treacheries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCards {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<CardId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<CardId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treacheries: Vec<CardId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enemies: Vec<CardId>,
}

impl SplitCards {
    /// Check whether every category is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
            && self.events.is_empty()
            && self.skills.is_empty()
            && self.treacheries.is_empty()
            && self.enemies.is_empty()
    }
}

/// Dual-faction and single-faction card counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCount {
    /// Multi-faction cards that include the faction
    pub dual: i32,
    /// Single-faction cards of the faction
    pub single: i32,
}

pub type FactionCounts = IndexMap<Faction, FactionCount>;
pub type SkillCounts = IndexMap<Skill, i32>;
pub type SlotCounts = IndexMap<SlotKind, i32>;

/// Cards listed apart from the regular deck
pub fn is_special_card(card: &Card, special: &SpecialCards) -> bool {
    card.code.as_str() == special.random_basic_weakness
        || card.permanent
        || card.is_weakness()
        || card.mythos_card
        || card.has_restrictions
}

fn of_type<'a>(
    card_ids: &'a [CardId],
    catalog: &'a CardCatalog,
    type_code: CardType,
) -> impl Iterator<Item = &'a CardId> + 'a {
    card_ids.iter().filter(move |c| {
        catalog
            .get(c.id.as_str())
            .is_some_and(|card| card.type_code == type_code)
    })
}

/// Group assets by the slot text of their customized card
pub fn group_assets(
    card_ids: &[CardId],
    catalog: &CardCatalog,
    customizations: &Customizations,
    separator: &str,
) -> Vec<AssetGroup> {
    let mut groups: IndexMap<AssetGroupKind, Vec<CardId>> = IndexMap::new();
    for card_id in of_type(card_ids, catalog, CardType::Asset) {
        let kind = match catalog.get(card_id.id.as_str()) {
            Some(card) => {
                let choices = customizations.get(&card_id.id).map(Vec::as_slice);
                let card = card.with_customizations(separator, choices);
                AssetGroupKind::from_slot(card.slot.as_deref())
            }
            None => AssetGroupKind::Other,
        };
        groups.entry(kind).or_default().push(card_id.clone());
    }
    AssetGroupKind::ALL
        .iter()
        .filter_map(|kind| {
            groups.shift_remove(kind).map(|cards| AssetGroup {
                kind: *kind,
                cards,
            })
        })
        .collect()
}

/// Split a listing into display categories
pub fn split_cards(
    card_ids: &[CardId],
    catalog: &CardCatalog,
    customizations: &Customizations,
    separator: &str,
) -> SplitCards {
    let collect = |type_code| of_type(card_ids, catalog, type_code).cloned().collect::<Vec<_>>();
    let mut treacheries = collect(CardType::Treachery);
    treacheries.extend(collect(CardType::Investigator));
    SplitCards {
        assets: group_assets(card_ids, catalog, customizations, separator),
        events: collect(CardType::Event),
        skills: collect(CardType::Skill),
        treacheries,
        enemies: collect(CardType::Enemy),
    }
}

/// Faction split of a listing
///
/// Permanents, double-sided cards and the excluded card do not count.
pub fn faction_count(
    card_ids: &[CardId],
    catalog: &CardCatalog,
    faction: Faction,
    special: &SpecialCards,
) -> FactionCount {
    let mut count = FactionCount::default();
    for card_id in card_ids {
        let Some(card) = catalog.get(card_id.id.as_str()) else {
            continue;
        };
        let excluded = card.code.as_str() == special.faction_count_excluded;
        if card.permanent || card.double_sided || excluded {
            continue;
        }
        if card.is_multi_faction() {
            if card.factions().any(|f| f == faction) {
                count.dual += card_id.quantity;
            }
        } else if card.faction_code() == faction {
            count.single += card_id.quantity;
        }
    }
    count
}

/// Faction split for every player faction
pub fn faction_counts(
    card_ids: &[CardId],
    catalog: &CardCatalog,
    special: &SpecialCards,
) -> FactionCounts {
    Faction::PLAYER
        .iter()
        .map(|faction| (*faction, faction_count(card_ids, catalog, *faction, special)))
        .collect()
}

/// Quantities per cost bucket, from "X" (-2) and "-" (-1) up to 10
///
/// Cards without a printed cost and costs outside the range are left out.
pub fn cost_histogram(card_ids: &[CardId], catalog: &CardCatalog) -> Vec<i32> {
    let mut histogram = vec![0; (COST_HISTOGRAM_MAX - COST_HISTOGRAM_MIN + 1) as usize];
    for card_id in card_ids {
        let Some(cost) = catalog.get(card_id.id.as_str()).and_then(Card::real_cost) else {
            continue;
        };
        let bucket = cost.bucket();
        if (COST_HISTOGRAM_MIN..=COST_HISTOGRAM_MAX).contains(&bucket) {
            histogram[(bucket - COST_HISTOGRAM_MIN) as usize] += card_id.quantity;
        }
    }
    histogram
}

/// Skill icons of a listing, weighted by quantity
pub fn skill_icon_counts(card_ids: &[CardId], catalog: &CardCatalog) -> SkillCounts {
    Skill::ALL
        .iter()
        .map(|skill| {
            let total = card_ids
                .iter()
                .filter_map(|c| {
                    catalog
                        .get(c.id.as_str())
                        .map(|card| card.skill_count(*skill) as i32 * c.quantity)
                })
                .sum();
            (*skill, total)
        })
        .collect()
}

/// Assets occupying each slot kind, weighted by quantity
pub fn slot_counts(card_ids: &[CardId], catalog: &CardCatalog) -> SlotCounts {
    SlotKind::ALL
        .iter()
        .map(|slot| {
            let total = of_type(card_ids, catalog, CardType::Asset)
                .filter(|c| {
                    catalog
                        .get(c.id.as_str())
                        .is_some_and(|card| card.slots().has(slot.code()))
                })
                .map(|c| c.quantity)
                .sum();
            (*slot, total)
        })
        .collect()
}
