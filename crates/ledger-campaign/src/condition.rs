//! Condition expressions authored in campaign guides
//!
//! The set of conditions is closed; each variant carries the options it can
//! select between and, where a fallback exists, a `default_option`.

use crate::branch::{BoolOption, BranchPayload, NumOption, StringOption};
use crate::campaign_log::InvestigatorStatus;
use crate::operand::Operand;
use ledger_core::{CardCode, InvestigatorCode};
use serde::{Deserialize, Serialize};

/// A condition evaluated against a campaign log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    // === Campaign log ===
    /// Entry is present and not crossed out
    CampaignLog {
        section: String,
        id: String,
        options: Vec<BoolOption>,
    },
    /// Section is present
    CampaignLogSectionExists {
        section: String,
        options: Vec<BoolOption>,
    },
    /// Like `CampaignLog`, also reporting the logged cards
    CampaignLogCards {
        section: String,
        id: String,
        options: Vec<BoolOption>,
    },
    /// Task has an assignee
    CampaignLogTask {
        section: String,
        id: String,
        options: Vec<BoolOption>,
    },
    /// Switch on the logged cards
    CampaignLogCardsSwitch {
        section: String,
        id: String,
        options: Vec<StringOption>,
    },
    CampaignLogCount {
        section: String,
        id: String,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
    /// Per-investigator `$count` entries of an investigator section
    CampaignLogInvestigatorCount {
        section: String,
        investigator: Coverage,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
    /// Investigators listed (or not listed) in a card-list entry
    ///
    /// The option's condition selects the side: `true` keeps investigators whose
    /// code is logged, `false` keeps the others.
    InvestigatorCampaignLogCards {
        section: String,
        id: String,
        option: BoolOption,
    },
    /// Supplies held in an investigator section
    CheckSupplies {
        section: String,
        id: String,
        investigator: Coverage,
        options: Vec<BoolOption>,
    },

    // === Composite ===
    /// At least `count` sub-conditions select an option
    Multi {
        count: u32,
        conditions: Vec<Condition>,
        options: Vec<BoolOption>,
    },
    Math(MathCondition),

    // === Investigators ===
    HasCard {
        card: CardCode,
        investigator: CardScope,
        options: Vec<BoolOption>,
    },
    Trauma(TraumaCondition),
    /// Match investigator cards by trait, faction or code
    Investigator {
        investigator_data: InvestigatorField,
        options: Vec<StringOption>,
    },
    PartnerStatus(PartnerStatusCondition),

    // === Campaign and scenario data ===
    CampaignData(CampaignDataCondition),
    ScenarioData(ScenarioDataCondition),

    // === Scarlet keys ===
    Location {
        location: String,
        status: LocationStatus,
        options: Vec<BoolOption>,
    },
    ScarletKey {
        scarlet_key: String,
        status: KeyHolder,
        options: Vec<BoolOption>,
    },
    /// Number of keys held by one kind of holder
    ScarletKeyCount {
        status: KeyHolder,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
}

/// Whether a check applies to any investigator or to each one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coverage {
    Any,
    All,
}

/// Which investigators a card check considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardScope {
    /// Per-investigator result over active investigators
    Each,
    /// Any investigator, killed ones included
    Any,
    /// Any investigator defeated in the current scenario
    Defeated,
}

/// Trauma checked for each active investigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicTrauma {
    Mental,
    Physical,
    Alive,
}

/// Fatal trauma checked for the lead or for everyone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KilledTrauma {
    Killed,
    Insane,
    Alive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraumaCondition {
    /// Per-investigator result
    Each {
        trauma: BasicTrauma,
        options: Vec<BoolOption>,
    },
    LeadInvestigator {
        trauma: KilledTrauma,
        options: Vec<BoolOption>,
    },
    /// Every investigator, eliminated ones included; true when there are none
    All {
        trauma: KilledTrauma,
        options: Vec<BoolOption>,
    },
}

/// Investigator card field compared against option values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestigatorField {
    /// Case-insensitive trait
    Trait,
    /// Primary faction code
    Faction,
    Code,
}

/// Which partners of a section are checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerSelector {
    Any,
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerStatusCondition {
    pub section: String,
    pub partner: PartnerSelector,
    /// Statuses to look for
    pub status: Vec<String>,
    /// Any status or every status
    pub operation: Coverage,
    pub options: Vec<BoolOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathCondition {
    Equals {
        op_a: Operand,
        op_b: Operand,
        options: Vec<BoolOption>,
    },
    Sum {
        op_a: Operand,
        op_b: Operand,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
    /// Floor division
    Divide {
        op_a: Operand,
        op_b: Operand,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
    /// Options keyed -1, 0 and 1 by the sign of `op_a - op_b`
    Compare {
        op_a: Operand,
        op_b: Operand,
        options: Vec<NumOption>,
    },
}

/// Elimination check over the whole roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EliminationStatus {
    NotEliminated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignDataCondition {
    LinkedCampaign {
        options: Vec<BoolOption>,
    },
    /// Guide version is at least `min_version`
    Version {
        min_version: u32,
        options: Vec<BoolOption>,
    },
    Cycle {
        options: Vec<StringOption>,
    },
    Difficulty {
        options: Vec<StringOption>,
    },
    Standalone {
        options: Vec<BoolOption>,
    },
    ScenarioCompleted {
        scenario: String,
        options: Vec<BoolOption>,
    },
    ScenarioReplayed {
        scenario: String,
        options: Vec<BoolOption>,
    },
    /// Another scenario is queued or the current one must be replayed
    NextScenario {
        options: Vec<BoolOption>,
    },
    ChaosBag {
        token: String,
        options: Vec<NumOption>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
    InvestigatorStatus {
        status: EliminationStatus,
        options: Vec<BoolOption>,
    },
    /// Binary match of active investigator cards
    Investigator {
        investigator_data: InvestigatorField,
        options: Vec<StringOption>,
        #[serde(default)]
        exclude_investigators: Vec<InvestigatorCode>,
        #[serde(default)]
        default_option: Option<BranchPayload>,
    },
}

/// Scenario outcome checked for any active investigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioInvestigatorStatus {
    Defeated,
    NotDefeated,
    Resigned,
    NotResigned,
    Alive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioDataCondition {
    PlayerCount {
        options: Vec<NumOption>,
    },
    Resolution {
        options: Vec<StringOption>,
    },
    HasResolution {
        options: Vec<BoolOption>,
    },
    FixedInvestigatorStatus {
        fixed_investigator: InvestigatorCode,
        status: InvestigatorStatus,
        options: Vec<BoolOption>,
    },
    InvestigatorStatus {
        investigator: ScenarioInvestigatorStatus,
        options: Vec<BoolOption>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationStatus {
    Visited,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyHolder {
    Enemy,
    Investigator,
}

impl Condition {
    /// Short name used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::CampaignLog { .. } => "campaign_log",
            Condition::CampaignLogSectionExists { .. } => "campaign_log_section_exists",
            Condition::CampaignLogCards { .. } => "campaign_log_cards",
            Condition::CampaignLogTask { .. } => "campaign_log_task",
            Condition::CampaignLogCardsSwitch { .. } => "campaign_log_cards_switch",
            Condition::CampaignLogCount { .. } => "campaign_log_count",
            Condition::CampaignLogInvestigatorCount { .. } => "campaign_log_investigator_count",
            Condition::InvestigatorCampaignLogCards { .. } => "investigator_campaign_log_cards",
            Condition::CheckSupplies { .. } => "check_supplies",
            Condition::Multi { .. } => "multi",
            Condition::Math(_) => "math",
            Condition::HasCard { .. } => "has_card",
            Condition::Trauma(_) => "trauma",
            Condition::Investigator { .. } => "investigator",
            Condition::PartnerStatus(_) => "partner_status",
            Condition::CampaignData(_) => "campaign_data",
            Condition::ScenarioData(_) => "scenario_data",
            Condition::Location { .. } => "location",
            Condition::ScarletKey { .. } => "scarlet_key",
            Condition::ScarletKeyCount { .. } => "scarlet_key_count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_ron() {
        let condition: Condition = ron::from_str(
            r#"CampaignLogCount(
                section: "supplies",
                id: "ammo",
                options: [
                    (condition: 3, payload: (steps: ["well_stocked"])),
                ],
                default_option: Some((steps: ["short"])),
            )"#,
        )
        .unwrap();
        assert_eq!(condition.kind(), "campaign_log_count");
    }

    #[test]
    fn test_nested_condition_ron() {
        let condition: Condition = ron::from_str(
            r#"Multi(
                count: 1,
                conditions: [
                    CampaignData(Difficulty(options: [(condition: "hard")])),
                    Math(Divide(op_a: Constant(7), op_b: Constant(2), options: [])),
                    Trauma(Each(trauma: Mental, options: [(condition: true)])),
                ],
                options: [(condition: true)],
            )"#,
        )
        .unwrap();
        match condition {
            Condition::Multi { conditions, .. } => assert_eq!(conditions.len(), 3),
            other => panic!("unexpected condition {}", other.kind()),
        }
    }
}
