//! Ledger Campaign - campaign log conditions for guided campaigns
//!
//! This crate provides:
//! - The campaign log model (`CampaignLog`) and its read-only view (`CampaignLogView`)
//! - Condition expressions loaded from guide data (`Condition`, `Operand`)
//! - A pure evaluator producing tagged results (`evaluate`, `ConditionResult`)
//! - Per-investigator follow-up answers (`investigator_choices`)
//!
//! Evaluation never fails. Missing sections, entries and investigators read as
//! false, zero or empty, and an unmatched option is reported as `None`.

mod branch;
mod campaign_log;
mod condition;
mod evaluate;
mod operand;
mod result;

pub use branch::{
    BoolOption, Branch, BranchKey, BranchPayload, InvestigatorBranch, NumOption, SelectedBranch,
    StringOption,
};
pub use campaign_log::{
    CampaignData, CampaignLog, CampaignLogView, EntryValue, InvestigatorData, InvestigatorStatus,
    LogEntry, LogSection, LoggedCard, Partner, ScarletData, ScarletKeyStatus, ScenarioState,
    ScenarioStatus,
};
pub use condition::{
    BasicTrauma, CampaignDataCondition, CardScope, Condition, Coverage, EliminationStatus,
    InvestigatorField, KeyHolder, KilledTrauma, LocationStatus, MathCondition, PartnerSelector,
    PartnerStatusCondition, ScenarioDataCondition, ScenarioInvestigatorStatus, TraumaCondition,
};
pub use evaluate::{evaluate, investigator_choices};
pub use operand::Operand;
pub use result::{
    BinaryResult, ConditionResult, InvestigatorChoices, InvestigatorResult, NumberResult,
    StringResult,
};
