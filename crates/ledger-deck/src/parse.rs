//! Deck parsing: everything a deck screen shows, computed in one pass

use indexmap::IndexSet;
use ledger_core::{Card, CardCatalog, CardCode, Faction, Slots};
use serde::{Deserialize, Serialize};

use crate::changes::{compute_changes, DeckChanges, DeckSnapshot};
use crate::config::DeckConfig;
use crate::customization::{customization_xp, resolve_customizations, Customizations};
use crate::deck::Deck;
use crate::error::Result;
use crate::summary::{
    cost_histogram, faction_counts, is_special_card, skill_icon_counts, slot_counts, split_cards,
    CardId, FactionCounts, SkillCounts, SlotCounts, SplitCards,
};
use crate::validation::{DeckProblem, DeckRules, DeckValidation, InvestigatorCards};

/// A deck with its listings, histograms and upgrade accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDeck {
    pub id: String,
    /// Faction of the investigator front
    pub faction: Faction,
    pub investigator: InvestigatorCards,
    pub slots: Slots,
    /// Customized card instances counted toward the deck
    pub deck_cards: Vec<Card>,
    pub customizations: Customizations,
    pub previous_customizations: Customizations,
    pub normal_card_count: i32,
    pub deck_size: i32,
    pub total_card_count: i32,
    /// Experience value of the deck
    pub experience: i32,
    /// Experience earned so far
    pub available_experience: i32,
    /// Number of distinct packs the cards come from
    pub packs: usize,
    pub faction_counts: FactionCounts,
    pub cost_histogram: Vec<i32>,
    pub slot_counts: SlotCounts,
    pub skill_icon_counts: SkillCounts,
    pub normal_cards: SplitCards,
    pub special_cards: SplitCards,
    pub side_cards: SplitCards,
    pub extra_cards: Option<SplitCards>,
    pub extra_deck_size: Option<i32>,
    pub extra_normal_card_count: Option<i32>,
    pub ignore_deck_limit_slots: Slots,
    pub changes: Option<DeckChanges>,
    pub problem: Option<DeckProblem>,
    pub extra_problem: Option<DeckProblem>,
    /// A deckbuilding option with a card limit is in force
    pub limited_slots: bool,
    pub custom_content: bool,
    /// Permanents carried over from the previous version
    pub locked_permanents: Slots,
}

/// Expand slots into customized card instances
///
/// Ignore-deck-limit copies are left out; unknown codes are skipped.
pub fn get_cards(
    catalog: &CardCatalog,
    slots: &Slots,
    ignore_deck_limit_slots: &Slots,
    separator: &str,
    customizations: &Customizations,
) -> Vec<Card> {
    let mut cards = Vec::new();
    for (code, count) in slots.iter() {
        let Some(card) = catalog.get(code.as_str()) else {
            log::warn!("unknown card {} in deck slots", code);
            continue;
        };
        let customized =
            card.with_customizations(separator, customizations.get(code).map(Vec::as_slice));
        let count = count - ignore_deck_limit_slots.get(code.as_str());
        for _ in 0..count.max(0) {
            cards.push(customized.clone());
        }
    }
    cards
}

/// Experience value of a set of slots
///
/// Myriad cards are paid once per name and level; ignore-deck-limit copies
/// are free; customization experience is added per card.
pub fn calculate_total_xp(
    catalog: &CardCatalog,
    slots: &Slots,
    ignore_deck_limit_slots: &Slots,
    customizations: &Customizations,
) -> i32 {
    let mut myriad_buys: IndexSet<(&str, Option<i32>)> = IndexSet::new();
    let mut total = 0;
    for (code, count) in slots.iter() {
        let card = catalog.get(code.as_str());
        let xp = card.map(Card::total_xp).unwrap_or(0);
        let customize_xp = customization_xp(customizations.get(code).map(Vec::as_slice));
        match card {
            Some(card) if card.myriad => {
                if myriad_buys.insert((card.name.as_str(), card.xp)) {
                    total += xp + customize_xp;
                }
            }
            _ => {
                let count = count - ignore_deck_limit_slots.get(code.as_str());
                total += xp * count + customize_xp;
            }
        }
    }
    total
}

/// Known codes in first-seen order, sorted by name then level
fn sorted_codes<'a>(
    catalog: &'a CardCatalog,
    sources: &[&'a Slots],
) -> Vec<(&'a CardCode, &'a Card)> {
    let mut seen: IndexSet<&CardCode> = IndexSet::new();
    for slots in sources.iter().copied() {
        seen.extend(slots.codes());
    }
    let mut codes: Vec<(&CardCode, &Card)> = seen
        .into_iter()
        .filter_map(|code| catalog.get(code.as_str()).map(|card| (code, card)))
        .collect();
    codes.sort_by(|(_, a), (_, b)| {
        a.name
            .cmp(&b.name)
            .then(a.xp.unwrap_or(0).cmp(&b.xp.unwrap_or(0)))
    });
    codes
}

/// Listing entries with legality flags
fn listed_cards<V: DeckValidation>(
    codes: &[(&CardCode, &Card)],
    slots: &Slots,
    validation: &V,
    problem: Option<&DeckProblem>,
    current_cards: &[Card],
    customizations: &Customizations,
    separator: &str,
) -> Vec<CardId> {
    codes
        .iter()
        .map(|(code, card)| {
            let customized =
                card.with_customizations(separator, customizations.get(*code).map(Vec::as_slice));
            let quantity = slots.get(code.as_str());
            let over_limit = customized
                .deck_limit
                .is_some_and(|limit| quantity > limit as i32);
            CardId {
                id: (*code).clone(),
                quantity,
                invalid: !validation.can_include_card(&customized, false, current_cards)
                    || problem.is_some_and(|p| p.is_invalid(code.as_str()))
                    || over_limit,
                limited: validation.is_card_limited(&customized, current_cards),
                custom: card.custom(),
                ignore_count: false,
            }
        })
        .collect()
}

/// Parse a deck against the catalog and, when given, its previous version
///
/// Fails only when one of the investigator cards is missing from the
/// catalog. Upgrade accounting is present only when a previous version is
/// given and its investigator resolves.
pub fn parse_deck<R: DeckRules>(
    deck: &Deck,
    catalog: &CardCatalog,
    rules: &R,
    config: &DeckConfig,
    previous: Option<&Deck>,
) -> Result<ParsedDeck> {
    let separator = config.list_separator();
    let special = config.special();
    let slots = &deck.slots;
    let ignore = &deck.ignore_deck_limit_slots;

    let (customizations, previous_customizations) = resolve_customizations(
        &deck.meta,
        slots,
        catalog,
        previous.map(|p| &p.meta),
        previous.map(|p| &p.slots),
    );
    let investigator = InvestigatorCards::resolve(catalog, deck)?;
    let validation = rules.validation(&investigator, slots, &deck.meta, false);
    let deck_cards = get_cards(catalog, slots, ignore, separator, &customizations);
    let problem = validation.problem(&deck_cards);

    let mut extra_cards = None;
    let mut extra_deck_slots = None;
    let mut extra_deck_size = None;
    let mut extra_problem = None;
    if deck.back_code() == special.parallel_jim {
        let extra_slots = deck.meta.extra_deck();
        let no_ignore = Slots::new();
        let extra_deck_cards =
            get_cards(catalog, &extra_slots, &no_ignore, separator, &customizations);
        let extra_validation = rules.validation(&investigator, &extra_slots, &deck.meta, true);
        extra_deck_size = Some(extra_validation.deck_size(&extra_deck_cards));
        extra_problem = extra_validation.problem(&extra_deck_cards);
        let previous_extra = previous.map(|p| p.meta.extra_deck()).unwrap_or_default();
        let codes = sorted_codes(catalog, &[&extra_slots, &previous_extra]);
        extra_cards = Some(listed_cards(
            &codes,
            &extra_slots,
            &extra_validation,
            extra_problem.as_ref(),
            &[],
            &customizations,
            separator,
        ));
        extra_deck_slots = Some(extra_slots);
    }

    let empty = Slots::new();
    let previous_slots = previous.map(|p| &p.slots).unwrap_or(&empty);
    let codes = sorted_codes(catalog, &[slots, previous_slots]);
    let card_ids = listed_cards(
        &codes,
        slots,
        &validation,
        problem.as_ref(),
        &deck_cards,
        &customizations,
        separator,
    );

    let is_special = |card_id: &CardId| {
        catalog
            .get(card_id.id.as_str())
            .is_some_and(|card| is_special_card(card, special))
    };
    let special_cards: Vec<CardId> = card_ids
        .iter()
        .filter_map(|c| {
            let ignored = ignore.get(c.id.as_str());
            if ignored > 0 {
                return Some(CardId {
                    quantity: ignored,
                    ignore_count: true,
                    ..c.clone()
                });
            }
            (is_special(c) && c.quantity >= 0).then(|| c.clone())
        })
        .collect();
    let normal_cards: Vec<CardId> = card_ids
        .iter()
        .filter(|c| {
            let ignored = ignore.get(c.id.as_str());
            !is_special(c) && (c.quantity > ignored || (ignored == 0 && c.quantity >= 0))
        })
        .map(|c| CardId {
            quantity: c.quantity - ignore.get(c.id.as_str()),
            ..c.clone()
        })
        .collect();
    let side_cards: Vec<CardId> = sorted_codes(catalog, &[&deck.side_slots])
        .into_iter()
        .map(|(code, _)| CardId::new(code.clone(), deck.side_slots.get(code.as_str())))
        .collect();

    let changes = compute_changes(
        catalog,
        rules,
        &validation,
        DeckSnapshot::new(deck, &customizations),
        previous.map(|p| DeckSnapshot::new(p, &previous_customizations)),
        config,
    );

    let experience = calculate_total_xp(catalog, slots, ignore, &customizations)
        + extra_deck_slots
            .as_ref()
            .map(|extra| calculate_total_xp(catalog, extra, &Slots::new(), &customizations))
            .unwrap_or(0);

    let packs = card_ids
        .iter()
        .filter_map(|c| catalog.get(c.id.as_str()))
        .map(|card| card.pack_code.as_str())
        .collect::<IndexSet<_>>()
        .len();

    let deck_options = validation.deck_options(&deck_cards);
    let limited_slots = deck_options.iter().any(|option| {
        option.limit.is_some_and(|limit| limit > 0)
            && !option.traits.iter().any(|t| t == "Covenant")
    });
    let custom_content = normal_cards.iter().chain(special_cards.iter()).any(|c| c.custom);

    let mut locked_permanents = Slots::new();
    if let Some(previous) = previous {
        for (code, quantity) in previous.slots.iter() {
            let locked = catalog
                .get(code.as_str())
                .is_some_and(|card| card.permanent && !card.exile);
            if !locked {
                continue;
            }
            let exiled = changes.as_ref().map(|c| c.exiled.get(code.as_str())).unwrap_or(0);
            if quantity - exiled > 0 {
                locked_permanents.set(code, quantity - exiled);
            }
        }
    }

    let extra_normal_card_count = extra_cards.as_ref().map(|cards: &Vec<CardId>| {
        cards
            .iter()
            .filter(|c| c.id.as_str() != special.vengeful_shade)
            .map(|c| c.quantity)
            .sum::<i32>()
    });

    let parsed = ParsedDeck {
        id: deck.id.clone(),
        faction: investigator.front.faction_code(),
        slots: slots.clone(),
        customizations: customizations.clone(),
        previous_customizations: previous_customizations.clone(),
        normal_card_count: normal_cards.iter().map(|c| c.quantity).sum(),
        deck_size: validation.deck_size(&deck_cards),
        total_card_count: card_ids.iter().map(|c| c.quantity).sum(),
        experience,
        available_experience: deck.xp + deck.xp_adjustment,
        packs,
        faction_counts: faction_counts(&card_ids, catalog, special),
        cost_histogram: cost_histogram(&card_ids, catalog),
        slot_counts: slot_counts(&card_ids, catalog),
        skill_icon_counts: skill_icon_counts(&card_ids, catalog),
        normal_cards: split_cards(&normal_cards, catalog, &customizations, separator),
        special_cards: split_cards(&special_cards, catalog, &customizations, separator),
        side_cards: split_cards(&side_cards, catalog, &customizations, separator),
        extra_cards: extra_cards
            .as_ref()
            .map(|cards| split_cards(cards, catalog, &customizations, separator)),
        extra_deck_size,
        extra_normal_card_count,
        ignore_deck_limit_slots: ignore.clone(),
        changes,
        problem,
        extra_problem,
        limited_slots,
        custom_content,
        locked_permanents,
        deck_cards,
        investigator,
    };
    log::debug!(
        "parsed deck {}: {} cards, {} xp",
        parsed.id,
        parsed.total_card_count,
        parsed.experience
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckMeta;
    use crate::error::Error;
    use crate::summary::AssetGroupKind;
    use crate::validation::StandardRules;
    use ledger_core::{CardType, CustomizationOption, DeckOption, DeckRequirements};

    fn investigator(code: &str) -> Card {
        let mut card = Card::new(code, "Investigator", CardType::Investigator)
            .with_faction(Faction::Guardian);
        card.deck_requirements = Some(DeckRequirements {
            size: 4,
            extra_size: Some(2),
        });
        card.deck_options = vec![
            DeckOption {
                factions: vec![Faction::Guardian, Faction::Neutral],
                ..DeckOption::default()
            },
            DeckOption {
                factions: vec![Faction::Seeker],
                level_max: Some(0),
                limit: Some(1),
                ..DeckOption::default()
            },
        ];
        card
    }

    fn card(code: &str, name: &str, faction: Faction, xp: i32, pack: &str) -> Card {
        let mut card = Card::new(code, name, CardType::Asset)
            .with_faction(faction)
            .with_xp(Some(xp))
            .with_slot("Hand");
        card.pack_code = pack.to_string();
        card
    }

    fn catalog() -> CardCatalog {
        let mut myriad = card("07010", "Crafty", Faction::Guardian, 1, "tfa");
        myriad.myriad = true;
        let mut permanent = card("02110", "Adaptable", Faction::Neutral, 0, "dwl");
        permanent.permanent = true;
        permanent.slot = None;
        let mut armor = card("09021", "Hunter's Armor", Faction::Guardian, 0, "tsk");
        armor.customization_options = vec![CustomizationOption::new(0, 2)];
        let mut shade = card("90053", "Vengeful Shade", Faction::Neutral, 0, "rttfa");
        shade.slot = None;
        [
            investigator("01001"),
            investigator("90049"),
            card("01016", "Beat Cop", Faction::Guardian, 0, "core"),
            card("01516", "Beat Cop", Faction::Guardian, 2, "dwl"),
            card("01030", "Magnifying Glass", Faction::Seeker, 0, "core"),
            card("01045", "Switchblade", Faction::Rogue, 0, "core"),
            myriad,
            permanent,
            armor,
            shade,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_missing_investigator() {
        let deck = Deck::new("1", "00000");
        let err = parse_deck(&deck, &catalog(), &StandardRules::new(), &DeckConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingInvestigator { role: "main", .. }));
    }

    #[test]
    fn test_parse_listing() {
        let deck = Deck::new("1", "01001")
            .with_slots(Slots::from([
                ("01516", 1),
                ("01016", 1),
                ("01045", 1),
                ("02110", 1),
                ("07010", 3),
                ("01030", 2),
            ]))
            .with_xp(5);
        let parsed =
            parse_deck(&deck, &catalog(), &StandardRules::new(), &DeckConfig::default(), None)
                .unwrap();
        assert!(parsed.changes.is_none());
        assert_eq!(parsed.faction, Faction::Guardian);
        assert_eq!(parsed.available_experience, 5);
        // Beat Cop 2 plus one paid Crafty
        assert_eq!(parsed.experience, 3);
        assert_eq!(parsed.total_card_count, 9);
        assert_eq!(parsed.normal_card_count, 8);
        assert_eq!(parsed.packs, 3);
        assert!(parsed.limited_slots);
        assert!(!parsed.custom_content);

        let hand = &parsed.normal_cards.assets[0];
        assert_eq!(hand.kind, AssetGroupKind::Hand);
        let order: Vec<&str> = hand.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["01016", "01516", "07010", "01030", "01045"]);
        let switchblade = hand.cards.iter().find(|c| c.id.as_str() == "01045").unwrap();
        assert!(switchblade.invalid);
        let glass = hand.cards.iter().find(|c| c.id.as_str() == "01030").unwrap();
        assert!(glass.limited);
        assert!(!glass.invalid);

        let special = &parsed.special_cards.assets;
        assert_eq!(special.len(), 1);
        assert_eq!(special[0].cards[0].id.as_str(), "02110");
        assert_eq!(parsed.faction_counts[&Faction::Guardian].single, 5);
    }

    #[test]
    fn test_ignore_deck_limit_copies_are_special() {
        let deck = Deck::new("1", "01001")
            .with_slots(Slots::from([("01016", 3)]))
            .with_ignore_deck_limit_slots(Slots::from([("01016", 1)]));
        let parsed =
            parse_deck(&deck, &catalog(), &StandardRules::new(), &DeckConfig::default(), None)
                .unwrap();
        assert_eq!(parsed.deck_cards.len(), 2);
        let special = &parsed.special_cards.assets[0].cards[0];
        assert_eq!(special.quantity, 1);
        assert!(special.ignore_count);
        assert_eq!(parsed.normal_cards.assets[0].cards[0].quantity, 2);
    }

    #[test]
    fn test_parse_with_previous() {
        let previous = Deck::new("0", "01001")
            .with_slots(Slots::from([("01016", 2), ("02110", 1)]));
        let deck = Deck::new("1", "01001")
            .with_slots(Slots::from([("01016", 1), ("01516", 1), ("02110", 1), ("09021", 1)]))
            .with_meta(DeckMeta::new().with("cus_09021", "0|2"))
            .with_xp(6);
        let parsed = parse_deck(
            &deck,
            &catalog(),
            &StandardRules::new(),
            &DeckConfig::default(),
            Some(&previous),
        )
        .unwrap();
        let changes = parsed.changes.as_ref().unwrap();
        // Beat Cop upgrade 2, Hunter's Armor customization 2, armor swap free
        assert_eq!(changes.spent_xp, 4);
        assert_eq!(changes.upgraded.get("01516"), 1);
        assert_eq!(changes.customized.get("09021"), 2);
        assert_eq!(parsed.customizations["09021"].len(), 1);
        assert!(parsed.previous_customizations["09021"].is_empty());
        assert_eq!(parsed.experience, 4);
        assert_eq!(parsed.locked_permanents.get("02110"), 1);
    }

    #[test]
    fn test_parallel_jim_extra_deck() {
        let mut config_deck = Deck::new("1", "01001")
            .with_meta(
                DeckMeta::new()
                    .with("alternate_back", "90049")
                    .with("extra_deck", "90053,01016,01016"),
            );
        config_deck.slots = Slots::from([("01016", 1)]);
        let parsed = parse_deck(
            &config_deck,
            &catalog(),
            &StandardRules::new(),
            &DeckConfig::default(),
            None,
        )
        .unwrap();
        assert_eq!(parsed.extra_deck_size, Some(2));
        assert_eq!(parsed.extra_normal_card_count, Some(2));
        assert!(parsed.extra_cards.is_some());
        // Extra deck holds 3 cards against a size of 2
        assert!(parsed.extra_problem.is_some());
    }

    #[test]
    fn test_calculate_total_xp() {
        let catalog = catalog();
        let slots = Slots::from([("07010", 3), ("01516", 2), ("99999", 1)]);
        let ignore = Slots::from([("01516", 1)]);
        assert_eq!(calculate_total_xp(&catalog, &slots, &ignore, &Customizations::new()), 3);
    }

    #[test]
    fn test_get_cards_applies_ignore() {
        let catalog = catalog();
        let slots = Slots::from([("01016", 2), ("99999", 1)]);
        let ignore = Slots::from([("01016", 1)]);
        let cards = get_cards(&catalog, &slots, &ignore, ". ", &Customizations::new());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].code.as_str(), "01016");
    }
}
