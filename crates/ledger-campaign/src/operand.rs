//! Numeric operands of math conditions

use crate::campaign_log::CampaignLogView;
use crate::condition::PartnerStatusCondition;
use crate::evaluate::partner_status;
use serde::{Deserialize, Serialize};

/// A number read from the campaign log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Constant(i32),
    /// Counter entry; the section-level `$count` when `id` is absent
    CampaignLogCount {
        section: String,
        #[serde(default)]
        id: Option<String>,
    },
    CampaignLogTask {
        section: String,
        id: String,
    },
    ChaosBag {
        token: String,
    },
    /// Highest experience earned by an active investigator
    ///
    /// Ties keep the first investigator in campaign order.
    MostXpEarned,
    /// Only `player_count` is numeric; anything else reads as 0
    ScenarioData {
        scenario_data: String,
    },
    /// Number of partners the status check produced a choice for
    PartnerStatus(PartnerStatusCondition),
}

impl Operand {
    /// Resolve the operand; missing data reads as 0
    pub fn resolve<L: CampaignLogView + ?Sized>(&self, campaign_log: &L) -> i32 {
        match self {
            Operand::Constant(value) => *value,
            Operand::CampaignLogCount { section, id } => {
                campaign_log.count(section, id.as_deref().unwrap_or("$count"))
            }
            Operand::CampaignLogTask { section, id } => campaign_log.task(section, id),
            Operand::ChaosBag { token } => campaign_log.chaos_bag(token),
            Operand::MostXpEarned => campaign_log
                .investigator_codes(false)
                .iter()
                .map(|code| campaign_log.earned_xp(code.as_str()))
                .reduce(|best, xp| if xp > best { xp } else { best })
                .unwrap_or(0),
            Operand::ScenarioData { scenario_data } => match scenario_data.as_str() {
                "player_count" => campaign_log.player_count(),
                _ => 0,
            },
            Operand::PartnerStatus(condition) => {
                partner_status(condition, campaign_log).investigator_choices.len() as i32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign_log::{CampaignLog, LogEntry};
    use ledger_core::{Card, CardType};

    fn make_log() -> CampaignLog {
        let mut log = CampaignLog::new(vec![
            Card::new("01001", "Roland Banks", CardType::Investigator),
            Card::new("01002", "Daisy Walker", CardType::Investigator),
        ]);
        log.record("campaign_notes", LogEntry::count("$count", 4));
        log.record("campaign_notes", LogEntry::count("cultists", 2));
        log.investigator_data_mut("01001").earned_xp = 5;
        log.investigator_data_mut("01002").earned_xp = 8;
        log
    }

    #[test]
    fn test_count_operand_defaults_to_section_count() {
        let log = make_log();
        let operand = Operand::CampaignLogCount {
            section: "campaign_notes".to_string(),
            id: None,
        };
        assert_eq!(operand.resolve(&log), 4);
        let operand = Operand::CampaignLogCount {
            section: "campaign_notes".to_string(),
            id: Some("cultists".to_string()),
        };
        assert_eq!(operand.resolve(&log), 2);
    }

    #[test]
    fn test_most_xp_earned() {
        let log = make_log();
        assert_eq!(Operand::MostXpEarned.resolve(&log), 8);
        assert_eq!(Operand::MostXpEarned.resolve(&CampaignLog::default()), 0);
    }

    #[test]
    fn test_most_xp_earned_tie() {
        let mut log = make_log();
        log.investigator_data_mut("01001").earned_xp = 8;
        assert_eq!(Operand::MostXpEarned.resolve(&log), 8);
        // Eliminated investigators do not count
        log.investigator_data_mut("01001").killed = true;
        log.investigator_data_mut("01002").earned_xp = 3;
        assert_eq!(Operand::MostXpEarned.resolve(&log), 3);
    }

    #[test]
    fn test_scenario_data_operand() {
        let log = make_log();
        let players = Operand::ScenarioData {
            scenario_data: "player_count".to_string(),
        };
        assert_eq!(players.resolve(&log), 2);
        let other = Operand::ScenarioData {
            scenario_data: "resolution".to_string(),
        };
        assert_eq!(other.resolve(&log), 0);
    }
}
