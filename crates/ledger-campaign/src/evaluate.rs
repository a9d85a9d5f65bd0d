//! Condition evaluation
//!
//! Every condition evaluates to a [`ConditionResult`] as a pure function of the
//! condition and the campaign log. Options are matched first-in-declared-order;
//! missing data reads as false, zero or empty.

use crate::branch::{
    BoolOption, BranchPayload, InvestigatorBranch, NumOption, SelectedBranch, StringOption,
};
use crate::campaign_log::{CampaignLogView, ScenarioStatus};
use crate::condition::{
    BasicTrauma, CampaignDataCondition, CardScope, Condition, Coverage, EliminationStatus,
    InvestigatorField, KeyHolder, KilledTrauma, LocationStatus, MathCondition, PartnerSelector,
    PartnerStatusCondition, ScenarioDataCondition, ScenarioInvestigatorStatus, TraumaCondition,
};
use crate::result::{
    BinaryResult, ConditionResult, InvestigatorChoices, InvestigatorResult, NumberResult,
    StringResult,
};
use ledger_core::{Card, CardCode};

/// Evaluate a condition against a campaign log
pub fn evaluate<L: CampaignLogView + ?Sized>(condition: &Condition, campaign_log: &L) -> ConditionResult {
    let result: ConditionResult = match condition {
        Condition::CampaignLog {
            section,
            id,
            options,
        } => BinaryResult::new(campaign_log.check(section, id), options).into(),
        Condition::CampaignLogSectionExists { section, options } => {
            BinaryResult::new(campaign_log.section_exists(section), options).into()
        }
        Condition::CampaignLogCards {
            section,
            id,
            options,
        } => campaign_log_cards(section, id, options, campaign_log).into(),
        Condition::CampaignLogTask {
            section,
            id,
            options,
        } => {
            let assignee = campaign_log.task_assignee(section, id);
            let count = campaign_log.task(section, id);
            BinaryResult::new(assignee.is_some(), options)
                .with_input(assignee.into_iter().map(|code| code.to_string()).collect())
                .with_number_input(vec![count])
                .into()
        }
        Condition::CampaignLogCardsSwitch {
            section,
            id,
            options,
        } => {
            let cards = campaign_log.all_cards(section, id).unwrap_or_default();
            StringResult {
                value: cards.first().cloned().unwrap_or_default(),
                option: options
                    .iter()
                    .find(|option| cards.contains(&option.condition))
                    .map(SelectedBranch::from),
            }
            .into()
        }
        Condition::CampaignLogCount {
            section,
            id,
            options,
            default_option,
        } => NumberResult::new(
            campaign_log.count(section, id),
            options,
            default_option.as_ref(),
        )
        .into(),
        Condition::CampaignLogInvestigatorCount {
            section,
            investigator,
            options,
            default_option,
        } => investigator_count(section, *investigator, options, default_option.as_ref(), campaign_log),
        Condition::InvestigatorCampaignLogCards {
            section,
            id,
            option,
        } => {
            let cards = campaign_log.all_cards(section, id).unwrap_or_default();
            let eligible: Vec<String> = campaign_log
                .investigator_codes(true)
                .into_iter()
                .map(|code| code.to_string())
                .filter(|code| cards.contains(code) == option.condition)
                .collect();
            let decision = !eligible.is_empty();
            BinaryResult {
                decision,
                option: decision.then(|| SelectedBranch::from(option)),
                input: Some(eligible),
                number_input: None,
            }
            .into()
        }
        Condition::CheckSupplies {
            section,
            id,
            investigator: Coverage::Any,
            options,
        } => {
            let decision = campaign_log.investigator_codes(false).iter().any(|code| {
                campaign_log
                    .investigator_section(section, code.as_str())
                    .is_some_and(|s| s.has_supply(id))
            });
            BinaryResult::new(decision, options).into()
        }
        Condition::CheckSupplies {
            section,
            id,
            investigator: Coverage::All,
            options,
        } => check_supplies_all(section, id, options, campaign_log).into(),
        Condition::Multi {
            count,
            conditions,
            options,
        } => multi(*count, conditions, options, campaign_log).into(),
        Condition::Math(math) => math_result(math, campaign_log),
        Condition::HasCard {
            card,
            investigator: CardScope::Each,
            options,
        } => has_card_each(card, options, campaign_log).into(),
        Condition::HasCard {
            card,
            investigator,
            options,
        } => {
            let with_card: Vec<String> = campaign_log
                .investigator_codes(true)
                .into_iter()
                .filter(|code| {
                    (*investigator != CardScope::Defeated || campaign_log.is_defeated(code.as_str()))
                        && campaign_log.has_card(code.as_str(), card.as_str())
                })
                .map(|code| code.to_string())
                .collect();
            BinaryResult::new(!with_card.is_empty(), options)
                .with_input(with_card)
                .into()
        }
        Condition::Trauma(TraumaCondition::Each { trauma, options }) => {
            trauma_each(*trauma, options, campaign_log).into()
        }
        Condition::Trauma(TraumaCondition::LeadInvestigator { trauma, options }) => {
            let lead = campaign_log.lead_investigator_choice();
            BinaryResult::new(killed_trauma(lead.as_str(), *trauma, campaign_log), options).into()
        }
        Condition::Trauma(TraumaCondition::All { trauma, options }) => {
            let decision = campaign_log
                .investigator_codes(true)
                .iter()
                .all(|code| killed_trauma(code.as_str(), *trauma, campaign_log));
            BinaryResult::new(decision, options).into()
        }
        Condition::Investigator {
            investigator_data,
            options,
        } => investigator_matches(*investigator_data, options, &[], campaign_log).into(),
        Condition::PartnerStatus(partner) => partner_status(partner, campaign_log).into(),
        Condition::CampaignData(data) => campaign_data(data, campaign_log),
        Condition::ScenarioData(data) => scenario_data(data, campaign_log),
        Condition::Location {
            location,
            status,
            options,
        } => {
            let scarlet = &campaign_log.campaign_data().scarlet;
            let decision = match status {
                LocationStatus::Visited => scarlet.visited_locations.contains(location),
                LocationStatus::Current => scarlet.location.as_ref() == Some(location),
            };
            BinaryResult::new(decision, options).into()
        }
        Condition::ScarletKey {
            scarlet_key,
            status,
            options,
        } => {
            let key = campaign_log.campaign_data().scarlet.key_status.get(scarlet_key);
            let holder = key.and_then(|key| match status {
                KeyHolder::Enemy => key.enemy.clone(),
                KeyHolder::Investigator => key.investigator.as_ref().map(CardCode::to_string),
            });
            BinaryResult::new(holder.is_some(), options)
                .with_input(holder.into_iter().collect())
                .into()
        }
        Condition::ScarletKeyCount {
            status,
            options,
            default_option,
        } => {
            let keys = campaign_log.campaign_data().scarlet.key_status.values();
            let count = match status {
                KeyHolder::Enemy => keys.filter(|key| key.enemy.is_some()).count(),
                KeyHolder::Investigator => keys
                    .filter(|key| key.investigator.is_some() && key.enemy.is_none())
                    .count(),
            };
            NumberResult::new(count as i32, options, default_option.as_ref()).into()
        }
    };
    log::debug!(
        "{} condition evaluated (passes: {})",
        condition.kind(),
        result.passes()
    );
    result
}

impl Condition {
    /// Evaluate against a campaign log
    pub fn evaluate<L: CampaignLogView + ?Sized>(&self, campaign_log: &L) -> ConditionResult {
        evaluate(self, campaign_log)
    }
}

/// Per-investigator answers for guide steps that follow up on a condition
///
/// Returns `None` for conditions that have no per-investigator reading.
pub fn investigator_choices<L: CampaignLogView + ?Sized>(
    condition: &Condition,
    campaign_log: &L,
) -> Option<InvestigatorChoices> {
    match condition {
        Condition::HasCard { card, options, .. } => {
            Some(has_card_each(card, options, campaign_log).investigator_choices)
        }
        Condition::Trauma(TraumaCondition::Each { trauma, options }) => {
            Some(trauma_each(*trauma, options, campaign_log).investigator_choices)
        }
        Condition::Investigator {
            investigator_data,
            options,
        } => Some(investigator_matches(*investigator_data, options, &[], campaign_log).investigator_choices),
        Condition::Multi {
            count,
            conditions,
            options,
        } => {
            let result = multi(*count, conditions, options, campaign_log);
            let mut choices = InvestigatorChoices::new();
            if result.decision {
                for code in campaign_log.investigator_codes(false) {
                    choices.insert(code.to_string(), vec!["true".to_string()]);
                }
            }
            Some(choices)
        }
        Condition::CampaignLog {
            section,
            id,
            options,
        } => {
            let result = BinaryResult::new(campaign_log.check(section, id), options);
            let mut choices = InvestigatorChoices::new();
            if result.option.is_some() {
                for code in campaign_log.investigator_codes(false) {
                    choices.insert(code.to_string(), vec![id.clone()]);
                }
            }
            Some(choices)
        }
        Condition::CampaignLogCards {
            section,
            id,
            options,
        } => {
            let result = campaign_log_cards(section, id, options, campaign_log);
            let mut choices = InvestigatorChoices::new();
            if let Some(input) = &result.input {
                for code in campaign_log.investigator_codes(false) {
                    let listed = input.iter().any(|card| card == code.as_str());
                    if options.iter().any(|option| option.condition == listed) {
                        choices.insert(code.to_string(), vec![id.clone()]);
                    }
                }
            }
            Some(choices)
        }
        _ => None,
    }
}

fn campaign_log_cards<L: CampaignLogView + ?Sized>(
    section: &str,
    id: &str,
    options: &[BoolOption],
    campaign_log: &L,
) -> BinaryResult {
    BinaryResult {
        input: campaign_log.all_cards(section, id),
        number_input: campaign_log.all_card_counts(section, id),
        ..BinaryResult::new(campaign_log.check(section, id), options)
    }
}

fn bool_branches(options: &[BoolOption]) -> Vec<InvestigatorBranch> {
    options.iter().map(InvestigatorBranch::from_bool).collect()
}

/// Record `decision` for a code when some option is keyed by it
fn insert_decision(choices: &mut InvestigatorChoices, code: &str, decision: bool, options: &[BoolOption]) {
    if options.iter().any(|option| option.condition == decision) {
        choices.insert(code.to_string(), vec![decision.to_string()]);
    }
}

fn investigator_count<L: CampaignLogView + ?Sized>(
    section: &str,
    coverage: Coverage,
    options: &[NumOption],
    default_option: Option<&BranchPayload>,
    campaign_log: &L,
) -> ConditionResult {
    let counts: Vec<(CardCode, i32)> = campaign_log
        .investigator_codes(false)
        .into_iter()
        .map(|code| {
            let count = campaign_log
                .investigator_section(section, code.as_str())
                .and_then(|s| s.count_entry("$count"))
                .and_then(|entry| entry.count_value())
                .unwrap_or(0);
            (code, count)
        })
        .collect();
    match coverage {
        Coverage::Any => {
            let option = options
                .iter()
                .find(|option| counts.iter().any(|(_, count)| *count == option.condition));
            BinaryResult {
                decision: option.is_some(),
                option: option
                    .map(SelectedBranch::from)
                    .or_else(|| default_option.map(SelectedBranch::default_option)),
                input: None,
                number_input: None,
            }
            .into()
        }
        Coverage::All => {
            let mut choices = InvestigatorChoices::new();
            for (code, count) in &counts {
                let matches: Vec<String> = options
                    .iter()
                    .filter(|option| option.condition == *count)
                    .map(|option| option.condition.to_string())
                    .collect();
                if !matches.is_empty() {
                    choices.insert(code.to_string(), matches);
                } else if default_option.is_some() {
                    choices.insert(code.to_string(), vec!["default".to_string()]);
                }
            }
            let mut branches: Vec<InvestigatorBranch> =
                options.iter().map(InvestigatorBranch::from_number).collect();
            if let Some(payload) = default_option {
                branches.push(InvestigatorBranch {
                    id: "default".to_string(),
                    branch: SelectedBranch::default_option(payload),
                });
            }
            InvestigatorResult::new(choices, branches).into()
        }
    }
}

/// Every active investigator starts at "false"; section holders are then
/// overwritten when an option is keyed by their supply state
fn check_supplies_all<L: CampaignLogView + ?Sized>(
    section: &str,
    id: &str,
    options: &[BoolOption],
    campaign_log: &L,
) -> InvestigatorResult {
    let mut choices = InvestigatorChoices::new();
    for code in campaign_log.investigator_codes(false) {
        choices.insert(code.to_string(), vec!["false".to_string()]);
    }
    let roster = campaign_log.investigator_codes(true);
    for code in campaign_log.investigator_section_codes(section) {
        if !roster.contains(&code) {
            log::warn!("investigator {} in section {} is not part of the campaign", code, section);
        }
        let has_supply = campaign_log
            .investigator_section(section, code.as_str())
            .is_some_and(|s| s.has_supply(id));
        insert_decision(&mut choices, code.as_str(), has_supply, options);
    }
    InvestigatorResult::new(choices, bool_branches(options))
}

fn multi<L: CampaignLogView + ?Sized>(
    count: u32,
    conditions: &[Condition],
    options: &[BoolOption],
    campaign_log: &L,
) -> BinaryResult {
    let passed = conditions
        .iter()
        .filter(|condition| evaluate(condition, campaign_log).passes())
        .count();
    log::debug!("multi condition: {} of {} passed, {} required", passed, conditions.len(), count);
    BinaryResult::new(passed >= count as usize, options)
}

fn has_card_each<L: CampaignLogView + ?Sized>(
    card: &CardCode,
    options: &[BoolOption],
    campaign_log: &L,
) -> InvestigatorResult {
    let mut choices = InvestigatorChoices::new();
    for code in campaign_log.investigator_codes(false) {
        let has_card = campaign_log.has_card(code.as_str(), card.as_str());
        insert_decision(&mut choices, code.as_str(), has_card, options);
    }
    InvestigatorResult::new(choices, bool_branches(options))
}

fn trauma_each<L: CampaignLogView + ?Sized>(
    trauma: BasicTrauma,
    options: &[BoolOption],
    campaign_log: &L,
) -> InvestigatorResult {
    let mut choices = InvestigatorChoices::new();
    for code in campaign_log.investigator_codes(false) {
        let code = code.as_str();
        let decision = match trauma {
            BasicTrauma::Mental => campaign_log.has_mental_trauma(code),
            BasicTrauma::Physical => campaign_log.has_physical_trauma(code),
            BasicTrauma::Alive => !campaign_log.is_insane(code) && !campaign_log.is_killed(code),
        };
        insert_decision(&mut choices, code, decision, options);
    }
    InvestigatorResult::new(choices, bool_branches(options))
}

fn killed_trauma<L: CampaignLogView + ?Sized>(code: &str, trauma: KilledTrauma, campaign_log: &L) -> bool {
    match trauma {
        KilledTrauma::Killed => campaign_log.is_killed(code),
        KilledTrauma::Insane => campaign_log.is_insane(code),
        KilledTrauma::Alive => !campaign_log.is_killed(code) && !campaign_log.is_insane(code),
    }
}

fn investigator_field_matches(card: &Card, field: InvestigatorField, value: &str) -> bool {
    match field {
        InvestigatorField::Trait => card.has_trait(value),
        InvestigatorField::Faction => card.faction_code().code() == value,
        InvestigatorField::Code => card.code.as_str() == value,
    }
}

/// Each active, non-excluded investigator maps to every option value its card matches
fn investigator_matches<L: CampaignLogView + ?Sized>(
    field: InvestigatorField,
    options: &[StringOption],
    exclude: &[CardCode],
    campaign_log: &L,
) -> InvestigatorResult {
    let mut choices = InvestigatorChoices::new();
    for card in campaign_log.investigators(false) {
        if exclude.contains(&card.code) {
            continue;
        }
        let matches: Vec<String> = options
            .iter()
            .filter(|option| investigator_field_matches(card, field, &option.condition))
            .map(|option| option.condition.clone())
            .collect();
        if !matches.is_empty() {
            choices.insert(card.code.to_string(), matches);
        }
    }
    InvestigatorResult::new(
        choices,
        options.iter().map(InvestigatorBranch::from_string).collect(),
    )
}

pub(crate) fn partner_status<L: CampaignLogView + ?Sized>(
    condition: &PartnerStatusCondition,
    campaign_log: &L,
) -> InvestigatorResult {
    let mut choices = InvestigatorChoices::new();
    let partners = campaign_log
        .partners(&condition.section)
        .iter()
        .filter(|partner| match &condition.partner {
            PartnerSelector::Any => true,
            PartnerSelector::Fixed(code) => partner.code == *code,
        });
    for partner in partners {
        let has_status =
            |status: &String| campaign_log.has_partner_status(&condition.section, &partner.code, status);
        let decision = match condition.operation {
            Coverage::Any => condition.status.iter().any(has_status),
            Coverage::All => condition.status.iter().all(has_status),
        };
        insert_decision(&mut choices, &partner.code, decision, &condition.options);
    }
    InvestigatorResult::new(choices, bool_branches(&condition.options))
}

/// Floor division; a zero divisor yields `None`
fn floor_div(a: i32, b: i32) -> Option<i32> {
    if b == 0 {
        return None;
    }
    let (a, b) = (i64::from(a), i64::from(b));
    let mut quotient = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient -= 1;
    }
    Some(quotient.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

fn math_result<L: CampaignLogView + ?Sized>(math: &MathCondition, campaign_log: &L) -> ConditionResult {
    match math {
        MathCondition::Equals { op_a, op_b, options } => {
            let decision = op_a.resolve(campaign_log) == op_b.resolve(campaign_log);
            BinaryResult::new(decision, options).into()
        }
        MathCondition::Sum {
            op_a,
            op_b,
            options,
            default_option,
        } => {
            let value = op_a.resolve(campaign_log).saturating_add(op_b.resolve(campaign_log));
            NumberResult::new(value, options, default_option.as_ref()).into()
        }
        MathCondition::Divide {
            op_a,
            op_b,
            options,
            default_option,
        } => match floor_div(op_a.resolve(campaign_log), op_b.resolve(campaign_log)) {
            Some(value) => NumberResult::new(value, options, default_option.as_ref()).into(),
            None => {
                log::debug!("math divide by zero, selecting the default option");
                NumberResult {
                    number: 0,
                    option: default_option.as_ref().map(SelectedBranch::default_option),
                }
                .into()
            }
        },
        MathCondition::Compare { op_a, op_b, options } => {
            let value = op_a.resolve(campaign_log).saturating_sub(op_b.resolve(campaign_log));
            let bucket = value.signum();
            NumberResult {
                number: value,
                option: options
                    .iter()
                    .find(|option| option.condition == bucket)
                    .map(SelectedBranch::from),
            }
            .into()
        }
    }
}

fn campaign_data<L: CampaignLogView + ?Sized>(
    condition: &CampaignDataCondition,
    campaign_log: &L,
) -> ConditionResult {
    let data = campaign_log.campaign_data();
    match condition {
        CampaignDataCondition::LinkedCampaign { options } => {
            BinaryResult::new(campaign_log.linked(), options).into()
        }
        CampaignDataCondition::Version {
            min_version,
            options,
        } => BinaryResult::new(campaign_log.guide_version() >= *min_version, options).into(),
        CampaignDataCondition::Cycle { options } => {
            StringResult::new(data.cycle.clone(), options, None).into()
        }
        CampaignDataCondition::Difficulty { options } => {
            let difficulty = data.difficulty.clone().unwrap_or_else(|| "standard".to_string());
            StringResult::new(difficulty, options, None).into()
        }
        CampaignDataCondition::Standalone { options } => {
            BinaryResult::new(data.standalone, options).into()
        }
        CampaignDataCondition::ScenarioCompleted { scenario, options } => BinaryResult::new(
            campaign_log.scenario_status(scenario) == ScenarioStatus::Completed,
            options,
        )
        .into(),
        CampaignDataCondition::ScenarioReplayed { scenario, options } => {
            let replays = data.scenario_replay_count.get(scenario).copied().unwrap_or(0);
            BinaryResult::new(replays > 0, options).into()
        }
        CampaignDataCondition::NextScenario { options } => {
            let replay_required = campaign_log.scenario().is_some_and(|scenario| {
                let required = data.scenario_replay_count.get(&scenario.id).copied().unwrap_or(0);
                scenario.replay_attempt < required
            });
            BinaryResult::new(!data.next_scenario.is_empty() || replay_required, options).into()
        }
        CampaignDataCondition::ChaosBag {
            token,
            options,
            default_option,
        } => NumberResult::new(campaign_log.chaos_bag(token), options, default_option.as_ref()).into(),
        CampaignDataCondition::InvestigatorStatus {
            status: EliminationStatus::NotEliminated,
            options,
        } => {
            let decision = campaign_log
                .investigator_codes(true)
                .iter()
                .any(|code| !campaign_log.is_eliminated(code.as_str()));
            BinaryResult::new(decision, options).into()
        }
        CampaignDataCondition::Investigator {
            investigator_data,
            options,
            exclude_investigators,
            default_option,
        } => {
            let result =
                investigator_matches(*investigator_data, options, exclude_investigators, campaign_log);
            let mut matched: Option<&InvestigatorBranch> = None;
            let mut input = Vec::new();
            for (code, choices) in &result.investigator_choices {
                if let Some(first) = choices.first() {
                    matched = result.options.iter().find(|option| option.id == *first);
                    input.push(code.clone());
                }
            }
            match matched {
                Some(option) => BinaryResult {
                    decision: true,
                    option: Some(option.branch.clone()),
                    input: Some(input),
                    number_input: None,
                }
                .into(),
                None => BinaryResult {
                    decision: false,
                    option: default_option.as_ref().map(SelectedBranch::default_option),
                    input: None,
                    number_input: None,
                }
                .into(),
            }
        }
    }
}

fn scenario_data<L: CampaignLogView + ?Sized>(
    condition: &ScenarioDataCondition,
    campaign_log: &L,
) -> ConditionResult {
    match condition {
        ScenarioDataCondition::PlayerCount { options } => {
            NumberResult::new(campaign_log.player_count(), options, None).into()
        }
        ScenarioDataCondition::Resolution { options } => {
            StringResult::new(campaign_log.resolution(), options, None).into()
        }
        ScenarioDataCondition::HasResolution { options } => {
            BinaryResult::new(campaign_log.has_resolution(), options).into()
        }
        ScenarioDataCondition::FixedInvestigatorStatus {
            fixed_investigator,
            status,
            options,
        } => {
            let decision = campaign_log
                .investigators_with_status(*status)
                .contains(fixed_investigator);
            BinaryResult::new(decision, options).into()
        }
        ScenarioDataCondition::InvestigatorStatus {
            investigator,
            options,
        } => {
            let decision = campaign_log.investigator_codes(false).iter().any(|code| {
                let code = code.as_str();
                match investigator {
                    ScenarioInvestigatorStatus::Defeated => campaign_log.is_defeated(code),
                    ScenarioInvestigatorStatus::NotDefeated => !campaign_log.is_defeated(code),
                    ScenarioInvestigatorStatus::Resigned => campaign_log.resigned(code),
                    ScenarioInvestigatorStatus::NotResigned => !campaign_log.resigned(code),
                    ScenarioInvestigatorStatus::Alive => campaign_log.is_alive(code),
                }
            });
            BinaryResult::new(decision, options).into()
        }
    }
}
