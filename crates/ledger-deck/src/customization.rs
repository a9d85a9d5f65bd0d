//! Customization resolver
//!
//! Decisions are stored per card in the deck meta under `cus_<code>` as a
//! comma separated list of `index|spent_xp|choice` tokens. The resolver turns
//! them into typed [`CustomizationChoice`] values for the current and the
//! previous snapshot.

use indexmap::IndexMap;
use ledger_core::{
    CardCatalog, CardCode, ChoiceKind, CustomizationChoice, CustomizationDecision,
    CustomizationOption, Selection, Skill, Slots,
};

use crate::deck::DeckMeta;

/// Resolved choices per card code
pub type Customizations = IndexMap<CardCode, Vec<CustomizationChoice>>;

/// Parse an integer prefix the lenient way stored decks expect ("2abc" is 2)
fn parse_int_prefix(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}

/// Decode a `cus_<code>` meta value
///
/// Tokens with an empty or `NaN` index or spend are dropped.
pub fn parse_customization_decision(value: Option<&str>) -> Vec<CustomizationDecision> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Vec::new();
    };
    let mut decisions = Vec::new();
    for token in value.split(',') {
        let parts: Vec<&str> = token.split('|').collect();
        if parts[0].is_empty() || parts[0] == "NaN" {
            log::debug!("dropping customization token {:?}", token);
            continue;
        }
        if parts.len() > 1 && (parts[1].is_empty() || parts[1] == "NaN") {
            log::debug!("dropping customization token {:?}", token);
            continue;
        }
        let Some(index) = parse_int_prefix(parts[0]).and_then(|i| u32::try_from(i).ok()) else {
            log::debug!("dropping customization token {:?}", token);
            continue;
        };
        let spent_xp = parts
            .get(1)
            .and_then(|spent| parse_int_prefix(spent))
            .unwrap_or(0);
        decisions.push(CustomizationDecision {
            index,
            spent_xp,
            choice: parts.get(2).map(|c| c.to_string()),
        });
    }
    decisions
}

/// Encode decisions back into the `cus_<code>` meta format
pub fn encode_customization_decisions(decisions: &[CustomizationDecision]) -> String {
    decisions
        .iter()
        .map(|d| match &d.choice {
            Some(choice) => format!("{}|{}|{}", d.index, d.spent_xp, choice),
            None => format!("{}|{}", d.index, d.spent_xp),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Attach the typed sub-choice an option asks for
pub fn process_advanced_choice(
    mut basic: CustomizationChoice,
    choice: Option<&str>,
    catalog: &CardCatalog,
) -> CustomizationChoice {
    let Some(kind) = basic.option.choice else {
        return basic;
    };
    basic.selection = match kind {
        ChoiceKind::RemoveSlot => {
            let encoded = choice.filter(|c| !c.is_empty()).unwrap_or("0");
            Selection::RemoveSlot {
                encoded: encoded.to_string(),
                index: parse_int_prefix(encoded)
                    .and_then(|i| u32::try_from(i).ok())
                    .unwrap_or(0),
            }
        }
        ChoiceKind::ChooseTrait => {
            let encoded = choice.unwrap_or("");
            Selection::ChooseTrait {
                encoded: encoded.to_string(),
                traits: encoded
                    .split('^')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        }
        ChoiceKind::ChooseCard => {
            let encoded = choice.unwrap_or("");
            let codes: Vec<CardCode> = if encoded.is_empty() {
                Vec::new()
            } else {
                encoded.split('^').map(CardCode::from).collect()
            };
            let cards = codes
                .iter()
                .filter_map(|code| catalog.get(code.as_str()).cloned())
                .collect();
            Selection::ChooseCard {
                encoded: encoded.to_string(),
                codes,
                cards,
            }
        }
        ChoiceKind::ChooseSkill => {
            let skill = choice
                .and_then(|c| c.parse::<Skill>().ok())
                .filter(|s| *s != Skill::Wild);
            Selection::ChooseSkill {
                encoded: skill.map(|s| s.code().to_string()).unwrap_or_default(),
                skill,
            }
        }
    };
    basic
}

fn find_decision<'a>(
    decisions: &'a [CustomizationDecision],
    option: &CustomizationOption,
) -> Option<&'a CustomizationDecision> {
    decisions.iter().find(|d| d.index == option.index)
}

/// Resolve the customization choices of every customizable card in a deck
///
/// Returns the current choices and the choices as they stood in the previous
/// snapshot. Options that cost experience appear only once a decision exists
/// for them; free options always appear. A current choice stays editable
/// until the previous snapshot paid for it in full.
pub fn resolve_customizations(
    meta: &DeckMeta,
    slots: &Slots,
    catalog: &CardCatalog,
    previous_meta: Option<&DeckMeta>,
    previous_slots: Option<&Slots>,
) -> (Customizations, Customizations) {
    let mut current = Customizations::new();
    let mut previous = Customizations::new();
    for (code, count) in slots.iter() {
        if count == 0 {
            continue;
        }
        let Some(card) = catalog.get(code.as_str()) else {
            continue;
        };
        if !card.is_customizable() {
            continue;
        }
        let decisions = parse_customization_decision(meta.customization(code.as_str()));
        let previous_entry = match (previous_meta, previous_slots) {
            (Some(meta), Some(slots)) if slots.get(code.as_str()) > 0 => {
                meta.customization(code.as_str())
            }
            _ => None,
        };
        let previous_decisions = parse_customization_decision(previous_entry);

        let previous_choices = card
            .customization_options
            .iter()
            .filter_map(|option| {
                let decision = find_decision(&previous_decisions, option);
                if decision.is_none() && option.xp != 0 {
                    return None;
                }
                let spent = decision.map(|d| d.spent_xp).unwrap_or(0);
                let basic = CustomizationChoice::basic(option.clone(), spent, spent, false);
                Some(process_advanced_choice(
                    basic,
                    decision.and_then(|d| d.choice.as_deref()),
                    catalog,
                ))
            })
            .collect();
        previous.insert(code.clone(), previous_choices);

        let choices = card
            .customization_options
            .iter()
            .filter_map(|option| {
                let decision = find_decision(&decisions, option);
                if decision.is_none() && option.xp != 0 {
                    return None;
                }
                let locked = find_decision(&previous_decisions, option);
                let editable = locked.is_none_or(|p| p.spent_xp < option.xp);
                let basic = CustomizationChoice::basic(
                    option.clone(),
                    decision.map(|d| d.spent_xp).unwrap_or(0),
                    locked.map(|p| p.spent_xp).unwrap_or(0),
                    editable,
                );
                Some(process_advanced_choice(
                    basic,
                    decision.and_then(|d| d.choice.as_deref()),
                    catalog,
                ))
            })
            .collect();
        current.insert(code.clone(), choices);
    }
    (current, previous)
}

/// Experience spent on a card's customizations
pub fn customization_xp(choices: Option<&[CustomizationChoice]>) -> i32 {
    choices
        .map(|choices| choices.iter().map(|c| c.xp_spent).sum())
        .unwrap_or(0)
}
