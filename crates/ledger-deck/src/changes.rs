//! Deck change accountant
//!
//! Two snapshots only record how many copies of each card a deck held. The
//! accountant reconstructs a cheapest plausible story of what was bought:
//! which additions were upgrades of removed cards, which rode on a free swap
//! and which discount card paid for what.
//!
//! Added cards are resolved greedily from the highest experience cost down,
//! so upgrades claim their lower level before cheaper cards do. Cards without
//! an upgrade target on the first pass are delayed and resolved afterwards,
//! together with lower levels pulled from the unchanged part of the deck.
//!
//! Arcane Research and Down the Rabbit Hole compete for the same upgrades and
//! the order they apply in changes the total. When a deck holds both, the
//! reconciliation runs once per order and the cheaper result wins.

use indexmap::IndexSet;
use ledger_core::{Card, CardCatalog, CardCode, Slots};
use serde::{Deserialize, Serialize};

use crate::config::{DeckConfig, SpecialCards};
use crate::constants::{ADAPTABLE_USES_PER_COPY, DEJA_VU_USES_PER_COPY, DTR_USES};
use crate::customization::{customization_xp, Customizations};
use crate::deck::Deck;
use crate::parse::get_cards;
use crate::validation::{DeckRules, DeckValidation, InvestigatorCards};

/// Usage of one discount card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDiscount {
    pub code: CardCode,
    /// Uses granted by the copies in the deck
    pub available: i32,
    /// Uses consumed by this upgrade
    pub used: i32,
}

/// Free swaps and discount card usage of an upgrade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDiscounts {
    pub used_free_cards: i32,
    pub total_free_cards: i32,
    pub cards: Vec<SpecialDiscount>,
}

impl SpecialDiscounts {
    /// Usage entry of a discount card
    pub fn get(&self, code: &str) -> Option<&SpecialDiscount> {
        self.cards.iter().find(|d| d.code.as_str() == code)
    }
}

/// Reconciliation between a deck and its previous version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckChanges {
    pub added: Slots,
    /// Negative quantities of cards taken out
    pub removed: Slots,
    /// Positive for the new level, negative for the level it replaced
    pub upgraded: Slots,
    /// Customization experience bought per card
    pub customized: Slots,
    pub exiled: Slots,
    pub spent_xp: i32,
    pub special_discounts: SpecialDiscounts,
}

/// A deck together with its resolved customizations
#[derive(Debug, Clone, Copy)]
pub struct DeckSnapshot<'a> {
    pub deck: &'a Deck,
    pub customizations: &'a Customizations,
}

impl<'a> DeckSnapshot<'a> {
    pub fn new(deck: &'a Deck, customizations: &'a Customizations) -> Self {
        Self {
            deck,
            customizations,
        }
    }
}

/// Slot deltas between the two snapshots
#[derive(Debug, Clone, Default)]
struct SlotChanges {
    changed: Slots,
    /// Parallel Jim's extra deck
    extra_changed: Slots,
    /// Ignore-deck-limit growth for parallel Agnes and Skids
    ignored_delta: Slots,
    exiled: Slots,
    customized_slots: Slots,
    customized_xp: Slots,
    /// Previous slots minus removed copies
    unchanged: Slots,
}

/// Free swap counters known before reconciling
#[derive(Debug, Clone, Copy)]
struct FreeSwaps {
    extra_deck_size: i32,
    eldritch_brand_removed: i32,
    total_free_cards: i32,
}

/// Discount uses left during one reconciliation
#[derive(Debug, Clone)]
struct DiscountBudget {
    deja_vu_card_uses: Slots,
    deja_vu_max: i32,
    deja_vu_uses: i32,
    adaptable_uses: i32,
    /// Arcane Research uses once freshly added copies are discounted
    arcane_research_start: i32,
    arcane_research_uses: i32,
    dtr_xp: i32,
    dtr_uses: i32,
    extra_deck_size: i32,
    eldritch_brand_removed: i32,
    total_free_cards: i32,
}

impl DiscountBudget {
    fn new(slots: &Slots, special: &SpecialCards, exiled: &Slots, free: FreeSwaps) -> Self {
        let deja_vu_max = slots.get(&special.deja_vu);
        let dtr_xp = if slots.get(&special.down_the_rabbit_hole) > 0 { 1 } else { 0 };
        Self {
            deja_vu_card_uses: exiled.clone(),
            deja_vu_max,
            deja_vu_uses: deja_vu_max * DEJA_VU_USES_PER_COPY,
            adaptable_uses: slots.get(&special.adaptable) * ADAPTABLE_USES_PER_COPY,
            arcane_research_start: 0,
            arcane_research_uses: slots.get(&special.arcane_research),
            dtr_xp,
            dtr_uses: dtr_xp * DTR_USES,
            extra_deck_size: free.extra_deck_size,
            eldritch_brand_removed: free.eldritch_brand_removed,
            total_free_cards: free.total_free_cards,
        }
    }

    /// Take one Down the Rabbit Hole waiver off a positive cost
    fn waive(&mut self, cost: &mut i32) {
        if *cost > 0 && self.dtr_uses > 0 {
            *cost -= 1;
            self.dtr_uses -= 1;
        }
    }

    /// Spend Arcane Research uses on a positive cost
    fn research(&mut self, cost: &mut i32) {
        while *cost > 0 && self.arcane_research_uses > 0 {
            *cost -= 1;
            self.arcane_research_uses -= 1;
        }
    }
}

fn is_upgrade(added: &Card, removed: &Card) -> bool {
    let (added_xp, removed_xp) = (added.xp.unwrap_or(0), removed.xp.unwrap_or(0));
    added.name == removed.name
        && (added_xp > removed_xp
            || (added.xp == removed.xp && added.exceptional && !removed.exceptional))
}

fn both_spells(added: &Card, removed: &Card) -> bool {
    added.is_spell() && removed.is_spell()
}

/// One greedy reconciliation with a fixed discount order
struct Reconciliation<'a> {
    customized_xp: &'a Slots,
    dtr_first: bool,
    budget: DiscountBudget,
    exiled_slots: Vec<&'a Card>,
    removed_cards: Vec<&'a Card>,
    ignored_removed: Vec<&'a Card>,
    unchanged: Vec<&'a Card>,
    basic_added: Vec<&'a Card>,
    extra_added: Vec<&'a Card>,
    myriad_buys: IndexSet<(String, Option<i32>)>,
    added: Slots,
    removed: Slots,
    upgraded: Slots,
}

impl<'a> Reconciliation<'a> {
    fn myriad_key(card: &Card) -> (String, Option<i32>) {
        (card.name.clone(), card.xp)
    }

    /// Experience paid for one added card
    fn added_xp(&mut self, card: &'a Card, delay: bool) -> i32 {
        if (card.xp == Some(0) || !delay) && card.myriad {
            if !self.myriad_buys.insert(Self::myriad_key(card)) {
                log::trace!("{}: myriad copy already paid", card.code);
                self.added.inc(&card.code);
                if card.xp == Some(0) && self.budget.extra_deck_size > 0 {
                    self.budget.extra_deck_size -= 1;
                }
                return 0;
            }
        }
        if card.xp == Some(0) {
            return self.level_zero_xp(card);
        }

        if self.budget.deja_vu_card_uses.get(card.code.as_str()) > 0
            && self.budget.deja_vu_uses > 0
        {
            let discount = card
                .xp
                .unwrap_or(0)
                .min(self.budget.deja_vu_uses.min(self.budget.deja_vu_max));
            if discount > 0 {
                log::trace!("{}: deja vu discount {}", card.code, discount);
                self.budget.deja_vu_card_uses.dec(&card.code);
                self.budget.deja_vu_uses -= discount;
                self.added.inc(&card.code);
                return card.total_xp() - discount + self.budget.dtr_xp;
            }
        }

        if let Some(i) = self.removed_cards.iter().position(|r| is_upgrade(card, r)) {
            let removed = self.removed_cards.remove(i);
            log::trace!("{}: upgrade of {}", card.code, removed.code);
            self.upgraded.dec(&removed.code);
            self.upgraded.inc(&card.code);
            if card.myriad && !self.myriad_buys.insert(Self::myriad_key(card)) {
                return 0;
            }
            return self.discounted(card, removed);
        }

        if let Some(i) = self.ignored_removed.iter().position(|r| {
            card.name == r.name && card.xp.unwrap_or(0) > r.xp.unwrap_or(0)
        }) {
            let removed = self.ignored_removed.remove(i);
            log::trace!("{}: upgrade of ignored {}", card.code, removed.code);
            self.upgraded.inc(&card.code);
            return self.discounted(card, removed);
        }

        if delay {
            self.basic_added.push(card);
            return 0;
        }

        let budget = &self.budget;
        if let Some(i) = self.unchanged.iter().position(|r| {
            card.name == r.name
                && card.xp.unwrap_or(0) > r.xp.unwrap_or(0)
                && (budget.dtr_uses > 0
                    || (budget.arcane_research_uses > 1 && both_spells(card, r)))
        }) {
            let kept = self.unchanged.remove(i);
            log::trace!("{}: upgrade of kept {}, re-adding it", card.code, kept.code);
            self.upgraded.inc(&card.code);
            self.extra_added.push(kept);
            return self.discounted(card, kept);
        }

        self.added.inc(&card.code);
        card.total_xp() + self.budget.dtr_xp
    }

    /// Cost of a level zero card: free swaps first, then one experience
    fn level_zero_xp(&mut self, card: &'a Card) -> i32 {
        if !self.exiled_slots.is_empty() {
            self.exiled_slots.remove(0);
            self.added.inc(&card.code);
            log::trace!("{}: swapped in for an exiled card", card.code);
            return card.extra_xp;
        }

        if self.budget.adaptable_uses > 0 {
            if let Some(i) = self.removed_cards.iter().position(|r| r.xp == Some(0)) {
                let removed = self.removed_cards.remove(i);
                log::trace!("{}: adaptable swap for {}", card.code, removed.code);
                self.removed.dec(&removed.code);
                self.added.inc(&card.code);
                self.budget.adaptable_uses -= 1;
                return 0;
            }
        }

        self.added.inc(&card.code);
        let taboo = card.extra_xp;
        if taboo > 0 {
            if self.budget.extra_deck_size > 0 && self.budget.dtr_xp > 0 {
                self.budget.extra_deck_size -= 1;
                return taboo;
            }
            return taboo + self.budget.dtr_xp;
        }
        if self.budget.extra_deck_size > 0 {
            self.budget.extra_deck_size -= 1;
            return 0;
        }
        if self.budget.eldritch_brand_removed > 0 {
            self.budget.eldritch_brand_removed -= 1;
            return 0;
        }
        if self.customized_xp.get(card.code.as_str()) > 0 {
            return self.budget.dtr_xp;
        }
        if self.budget.dtr_xp > 0 {
            return self.budget.dtr_xp;
        }
        1
    }

    /// Cost of upgrading `removed` into `added`
    fn discounted(&mut self, added: &Card, removed: &Card) -> i32 {
        let mut cost = added.total_xp() - removed.total_xp();
        if self.budget.arcane_research_uses > 0 && both_spells(added, removed) {
            if self.dtr_first {
                self.budget.waive(&mut cost);
            }
            self.budget.research(&mut cost);
            if !self.dtr_first {
                self.budget.waive(&mut cost);
            }
            return cost.max(0);
        }
        if added.permanent && !removed.permanent {
            self.budget.extra_deck_size += 1;
            self.budget.total_free_cards += 1;
        }
        self.budget.waive(&mut cost);
        cost.max(0)
    }

    /// Customization experience after discounts
    fn customization_xp(&mut self, catalog: &CardCatalog) -> i32 {
        let mut total = 0;
        for (code, value) in self.customized_xp.iter() {
            let mut cost = value;
            if let Some(card) = catalog.get(code.as_str()) {
                if self.dtr_first {
                    self.budget.waive(&mut cost);
                }
                if card.is_spell() {
                    self.budget.research(&mut cost);
                }
                if !self.dtr_first {
                    self.budget.waive(&mut cost);
                }
            }
            total += cost;
        }
        total
    }
}

fn push_copies<'a>(pool: &mut Vec<&'a Card>, card: &'a Card, count: i32) {
    for _ in 0..count {
        pool.push(card);
    }
}

/// Run one reconciliation over precomputed slot changes
fn reconcile(
    catalog: &CardCatalog,
    slots: &Slots,
    changes: &SlotChanges,
    free: FreeSwaps,
    invalid_cards: &[Card],
    dtr_first: bool,
    special: &SpecialCards,
) -> DeckChanges {
    let mut exiled_slots: Vec<&Card> = Vec::new();
    for (code, count) in changes.exiled.iter() {
        match catalog.get(code.as_str()) {
            // Exiled encounter cards grant no swap
            Some(card) if card.encounter_code.is_none() => {
                push_copies(&mut exiled_slots, card, count)
            }
            _ => {}
        }
    }
    exiled_slots.extend(invalid_cards.iter());

    let mut budget = DiscountBudget::new(slots, special, &changes.exiled, free);
    let mut added_cards: Vec<&Card> = Vec::new();
    let mut removed_cards: Vec<&Card> = Vec::new();
    for (code, count) in changes.changed.iter().chain(changes.extra_changed.iter()) {
        let Some(card) = catalog.get(code.as_str()) else {
            log::warn!("unknown card {} in deck changes", code);
            continue;
        };
        if count < 0 {
            push_copies(&mut removed_cards, card, -count);
        } else {
            push_copies(&mut added_cards, card, count);
            if card.code.as_str() == special.arcane_research {
                // A freshly added Arcane Research does not discount this upgrade
                budget.arcane_research_uses -= count;
            }
        }
    }
    budget.arcane_research_start = budget.arcane_research_uses;
    let mut unchanged: Vec<&Card> = Vec::new();
    for (code, count) in changes.unchanged.iter() {
        if let Some(card) = catalog.get(code.as_str()) {
            push_copies(&mut unchanged, card, count);
        }
    }
    let mut ignored_removed: Vec<&Card> = Vec::new();
    for (code, count) in changes.ignored_delta.iter() {
        if let Some(card) = catalog.get(code.as_str()) {
            push_copies(&mut ignored_removed, card, count);
        }
    }

    let mut run = Reconciliation {
        customized_xp: &changes.customized_xp,
        dtr_first,
        budget,
        exiled_slots,
        removed_cards,
        ignored_removed,
        unchanged,
        basic_added: Vec::new(),
        extra_added: Vec::new(),
        myriad_buys: IndexSet::new(),
        added: Slots::new(),
        removed: Slots::new(),
        upgraded: Slots::new(),
    };

    let (story, normal): (Vec<&Card>, Vec<&Card>) =
        added_cards.into_iter().partition(|card| card.is_story());
    for card in story {
        run.added.inc(&card.code);
    }
    let (customizable, mut plain): (Vec<&Card>, Vec<&Card>) =
        normal.into_iter().partition(|card| card.is_customizable());
    plain.sort_by_key(|card| -(card.xp.unwrap_or(0) + card.extra_xp));

    let mut spent_xp = 0;
    for card in plain {
        spent_xp += run.added_xp(card, true);
    }
    for card in std::mem::take(&mut run.basic_added) {
        spent_xp += run.added_xp(card, false);
    }
    for card in std::mem::take(&mut run.extra_added) {
        spent_xp += run.added_xp(card, false);
    }
    for card in customizable {
        spent_xp += run.added_xp(card, false);
    }
    for card in std::mem::take(&mut run.removed_cards) {
        run.removed.dec(&card.code);
    }
    let customized_xp = run.customization_xp(catalog);

    let budget = &run.budget;
    let mut discounts = Vec::new();
    let adaptable = slots.get(&special.adaptable);
    if adaptable != 0 {
        let available = adaptable * ADAPTABLE_USES_PER_COPY;
        discounts.push(SpecialDiscount {
            code: CardCode::new(&special.adaptable),
            available,
            used: available - budget.adaptable_uses,
        });
    }
    let deja_vu = slots.get(&special.deja_vu);
    let total_exiled = changes.exiled.total();
    if deja_vu != 0 && total_exiled != 0 {
        discounts.push(SpecialDiscount {
            code: CardCode::new(&special.deja_vu),
            available: deja_vu * DEJA_VU_USES_PER_COPY.min(total_exiled),
            used: deja_vu * DEJA_VU_USES_PER_COPY - budget.deja_vu_uses,
        });
    }
    let arcane_research = slots.get(&special.arcane_research);
    if arcane_research != 0 {
        discounts.push(SpecialDiscount {
            code: CardCode::new(&special.arcane_research),
            available: arcane_research,
            used: budget.arcane_research_start - budget.arcane_research_uses,
        });
    }
    if slots.get(&special.down_the_rabbit_hole) != 0 {
        discounts.push(SpecialDiscount {
            code: CardCode::new(&special.down_the_rabbit_hole),
            available: DTR_USES,
            used: DTR_USES - budget.dtr_uses,
        });
    }

    let remaining_free = budget.extra_deck_size + run.exiled_slots.len() as i32;
    DeckChanges {
        added: run.added,
        removed: run.removed,
        upgraded: run.upgraded,
        customized: changes.customized_slots.clone(),
        exiled: changes.exiled.clone(),
        spent_xp: customized_xp + spent_xp,
        special_discounts: SpecialDiscounts {
            used_free_cards: run.budget.total_free_cards - remaining_free,
            total_free_cards: run.budget.total_free_cards,
            cards: discounts,
        },
    }
}

/// Reconcile a deck against its previous version
///
/// Returns `None` when there is no previous version or its investigator cards
/// are missing from the catalog.
pub fn compute_changes<R: DeckRules>(
    catalog: &CardCatalog,
    rules: &R,
    validation: &R::Validation,
    current: DeckSnapshot<'_>,
    previous: Option<DeckSnapshot<'_>>,
    config: &DeckConfig,
) -> Option<DeckChanges> {
    let previous = previous?;
    let special = config.special();
    let separator = config.list_separator();
    let (deck, previous_deck) = (current.deck, previous.deck);

    let previous_investigator = match InvestigatorCards::resolve(catalog, previous_deck) {
        Ok(cards) => cards,
        Err(err) => {
            log::debug!("no changes for deck {}: {}", deck.id, err);
            return None;
        }
    };

    let exiled = deck.exiled();
    let previous_cards = get_cards(
        catalog,
        &previous_deck.slots,
        &previous_deck.ignore_deck_limit_slots,
        separator,
        current.customizations,
    );
    let old_deck_size = rules
        .validation(&previous_investigator, &previous_deck.slots, &previous_deck.meta, false)
        .deck_size(&previous_cards);
    let invalid_cards = validation.invalid_cards(&previous_cards);

    let eldritch_brand_removed = validation
        .eldritch_branded_card_code()
        .map(|code| {
            let before = previous_deck.slots.get(code.as_str());
            let after = deck.slots.get(code.as_str()).max(1);
            (before - after).max(0)
        })
        .unwrap_or(0);

    let new_cards = get_cards(
        catalog,
        &deck.slots,
        &deck.ignore_deck_limit_slots,
        separator,
        current.customizations,
    );
    let extra_deck_size = validation.deck_size(&new_cards) - old_deck_size;
    let free = FreeSwaps {
        extra_deck_size,
        eldritch_brand_removed,
        total_free_cards: extra_deck_size + exiled.total(),
    };

    let mut changes = SlotChanges {
        unchanged: previous_deck.slots.clone(),
        exiled,
        ..SlotChanges::default()
    };
    let back_code = validation.investigator().back.code.as_str();
    let tracks_ignored = special.tracks_ignored_delta(back_code);
    for code in deck.slots.union_codes(&previous_deck.slots) {
        let code_str = code.as_str();
        let ignore_delta = deck.ignore_deck_limit_slots.get(code_str)
            - previous_deck.ignore_deck_limit_slots.get(code_str);
        let is_ace_of_rods = code_str == special.ace_of_rods;
        let delta = deck.slots.get(code_str) + changes.exiled.get(code_str)
            - previous_deck.slots.get(code_str)
            - if is_ace_of_rods { ignore_delta } else { 0 };
        if delta != 0 {
            changes.changed.set(code, delta);
            if delta < 0 {
                changes.unchanged.add(code, delta);
            }
        }
        if ignore_delta != 0 && !is_ace_of_rods && tracks_ignored {
            changes.ignored_delta.set(code, ignore_delta);
        }
    }

    if previous_deck.back_code() == special.parallel_jim {
        let extra = deck.meta.extra_deck();
        let previous_extra = previous_deck.meta.extra_deck();
        for code in extra.union_codes(&previous_extra) {
            let delta = extra.get(code.as_str()) - previous_extra.get(code.as_str());
            if delta != 0 {
                changes.extra_changed.set(code, delta);
            }
        }
    }

    for code in deck.slots.codes() {
        let spent = customization_xp(current.customizations.get(code).map(Vec::as_slice));
        let before = customization_xp(previous.customizations.get(code).map(Vec::as_slice));
        if spent > before {
            changes.customized_xp.set(code, spent - before);
            changes.customized_slots.set(code, spent - before);
        }
    }

    let normal = reconcile(catalog, &deck.slots, &changes, free, &invalid_cards, false, special);
    log::debug!("deck {}: {} xp with research first", deck.id, normal.spent_xp);
    let has_both = deck.slots.get(&special.down_the_rabbit_hole) > 0
        && deck.slots.get(&special.arcane_research) > 0;
    if has_both {
        let alternative =
            reconcile(catalog, &deck.slots, &changes, free, &invalid_cards, true, special);
        log::debug!("deck {}: {} xp with rabbit hole first", deck.id, alternative.spent_xp);
        if alternative.spent_xp < normal.spent_xp {
            return Some(alternative);
        }
    }
    Some(normal)
}
