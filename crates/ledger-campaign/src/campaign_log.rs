//! Campaign log data model and the read-only view the evaluator queries
//!
//! A campaign log is a set of named sections holding append-ordered entries,
//! per-investigator sub-sections, and campaign-wide data (difficulty, chaos
//! bag, trauma, scenario progress). Lookups never fail: a missing section reads
//! as empty and a missing entry reads as unchecked or zero.

use indexmap::IndexMap;
use ledger_core::{Card, CardCode, InvestigatorCode};
use serde::{Deserialize, Serialize};

/// Value carried by a log entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryValue {
    /// Plain marker
    #[default]
    Basic,
    /// Free-text entry
    Text(String),
    /// Counter
    Count(i32),
    /// List of story cards
    Cards(Vec<LoggedCard>),
    /// Task assigned to an investigator
    Task {
        #[serde(default)]
        assignee: Option<InvestigatorCode>,
        #[serde(default)]
        count: i32,
    },
}

/// A card recorded in a card-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCard {
    pub card: String,
    #[serde(default = "default_card_count")]
    pub count: i32,
}

fn default_card_count() -> i32 {
    1
}

/// A single entry in a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Durable entry identifier
    pub id: String,
    #[serde(default)]
    pub crossed_out: bool,
    #[serde(default)]
    pub value: EntryValue,
}

impl LogEntry {
    /// Create a basic marker entry
    pub fn basic(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            crossed_out: false,
            value: EntryValue::Basic,
        }
    }

    /// Create a counter entry
    pub fn count(id: impl Into<String>, count: i32) -> Self {
        Self {
            id: id.into(),
            crossed_out: false,
            value: EntryValue::Count(count),
        }
    }

    /// Create a card-list entry with one copy of each card
    pub fn cards(id: impl Into<String>, cards: &[&str]) -> Self {
        Self {
            id: id.into(),
            crossed_out: false,
            value: EntryValue::Cards(
                cards
                    .iter()
                    .map(|card| LoggedCard {
                        card: card.to_string(),
                        count: 1,
                    })
                    .collect(),
            ),
        }
    }

    /// Create a task entry
    pub fn task(id: impl Into<String>, assignee: Option<&str>, count: i32) -> Self {
        Self {
            id: id.into(),
            crossed_out: false,
            value: EntryValue::Task {
                assignee: assignee.map(CardCode::from),
                count,
            },
        }
    }

    /// Mark the entry as crossed out
    pub fn crossed_out(mut self) -> Self {
        self.crossed_out = true;
        self
    }

    /// Counter value, if this is a counter entry
    pub fn count_value(&self) -> Option<i32> {
        match self.value {
            EntryValue::Count(count) => Some(count),
            _ => None,
        }
    }
}

/// An ordered list of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl LogSection {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// First entry with the given id
    pub fn entry(&self, id: &str) -> Option<&LogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// First counter entry with the given id
    pub fn count_entry(&self, id: &str) -> Option<&LogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id == id && entry.count_value().is_some())
    }

    /// A counter with this id that is not crossed out and holds a positive count
    pub fn has_supply(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.id == id && !entry.crossed_out && entry.count_value().is_some_and(|c| c > 0)
        })
    }

    /// Card-list entries with the given id that are not crossed out
    pub fn card_entries<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LoggedCard> {
        self.entries
            .iter()
            .filter(move |entry| entry.id == id && !entry.crossed_out)
            .flat_map(|entry| -> &'a [LoggedCard] {
                match &entry.value {
                    EntryValue::Cards(cards) => cards,
                    _ => &[],
                }
            })
    }
}

/// Trauma, story assets and experience tracked for one investigator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorData {
    #[serde(default)]
    pub physical: u32,
    #[serde(default)]
    pub mental: u32,
    #[serde(default)]
    pub killed: bool,
    #[serde(default)]
    pub insane: bool,
    #[serde(default)]
    pub story_assets: Vec<CardCode>,
    /// Experience earned over the campaign
    #[serde(default)]
    pub earned_xp: i32,
}

/// Progress of a scenario within the campaign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    #[default]
    NotStarted,
    Started,
    Completed,
    Skipped,
}

/// Who holds one scarlet key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScarletKeyStatus {
    #[serde(default)]
    pub enemy: Option<String>,
    #[serde(default)]
    pub investigator: Option<InvestigatorCode>,
}

/// Scarlet key and location tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScarletData {
    #[serde(default)]
    pub key_status: IndexMap<String, ScarletKeyStatus>,
    #[serde(default)]
    pub visited_locations: Vec<String>,
    /// Current location
    #[serde(default)]
    pub location: Option<String>,
}

/// Campaign-wide data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignData {
    /// Absent means "standard"
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Campaign cycle code
    #[serde(default)]
    pub cycle: String,
    #[serde(default)]
    pub standalone: bool,
    /// Linked to another campaign
    #[serde(default)]
    pub linked: bool,
    #[serde(default)]
    pub guide_version: u32,
    /// Token id to count
    #[serde(default)]
    pub chaos_bag: IndexMap<String, i32>,
    /// Scenario id to the number of required replays
    #[serde(default)]
    pub scenario_replay_count: IndexMap<String, u32>,
    #[serde(default)]
    pub scenario_status: IndexMap<String, ScenarioStatus>,
    /// Upcoming scenarios queued by the guide
    #[serde(default)]
    pub next_scenario: Vec<String>,
    #[serde(default)]
    pub investigator_data: IndexMap<InvestigatorCode, InvestigatorData>,
    #[serde(default)]
    pub scarlet: ScarletData,
}

/// State of the scenario currently being played
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioState {
    pub id: String,
    /// Zero for the first play
    #[serde(default)]
    pub replay_attempt: u32,
    #[serde(default)]
    pub lead_investigator: Option<InvestigatorCode>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub defeated: Vec<InvestigatorCode>,
    #[serde(default)]
    pub resigned: Vec<InvestigatorCode>,
}

/// A story partner tracked in a campaign log section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Vec<String>,
}

/// Investigator status queried by fixed-investigator conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestigatorStatus {
    Alive,
    Killed,
    Insane,
    Eliminated,
    Defeated,
    Resigned,
}

/// Read-only view of a campaign log
///
/// Implementors provide the raw data; every derived query has a default
/// implementation.
pub trait CampaignLogView {
    /// A top-level section
    fn section(&self, section: &str) -> Option<&LogSection>;

    /// An investigator's sub-section of a per-investigator section
    fn investigator_section(&self, section: &str, code: &str) -> Option<&LogSection>;

    /// Investigators holding a sub-section of a per-investigator section, in log order
    fn investigator_section_codes(&self, section: &str) -> Vec<InvestigatorCode>;

    /// Every investigator card in the campaign, eliminated ones included
    fn roster(&self) -> &[Card];

    fn campaign_data(&self) -> &CampaignData;

    /// The scenario being played, if any
    fn scenario(&self) -> Option<&ScenarioState>;

    /// Partners declared for a section
    fn partners(&self, section: &str) -> &[Partner];

    fn investigator_data(&self, code: &str) -> Option<&InvestigatorData> {
        self.campaign_data().investigator_data.get(code)
    }

    fn section_exists(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// First entry with the id exists and is not crossed out
    fn check(&self, section: &str, id: &str) -> bool {
        self.section(section)
            .and_then(|s| s.entry(id))
            .is_some_and(|entry| !entry.crossed_out)
    }

    /// Value of the first counter with the id, 0 if absent
    fn count(&self, section: &str, id: &str) -> i32 {
        self.section(section)
            .and_then(|s| s.count_entry(id))
            .and_then(LogEntry::count_value)
            .unwrap_or(0)
    }

    /// Progress of the first task with the id, 0 if absent
    fn task(&self, section: &str, id: &str) -> i32 {
        self.section(section)
            .and_then(|s| s.entries.iter().find_map(|entry| match &entry.value {
                EntryValue::Task { count, .. } if entry.id == id => Some(*count),
                _ => None,
            }))
            .unwrap_or(0)
    }

    /// Investigator assigned to the first task with the id
    fn task_assignee(&self, section: &str, id: &str) -> Option<InvestigatorCode> {
        self.section(section)
            .and_then(|s| {
                s.entries.iter().find_map(|entry| match &entry.value {
                    EntryValue::Task { assignee, .. } if entry.id == id => Some(assignee.clone()),
                    _ => None,
                })
            })
            .flatten()
    }

    /// Cards of every card-list entry with the id; `None` if the section is missing
    fn all_cards(&self, section: &str, id: &str) -> Option<Vec<String>> {
        self.section(section)
            .map(|s| s.card_entries(id).map(|c| c.card.clone()).collect())
    }

    /// Card counts parallel to [`all_cards`](Self::all_cards)
    fn all_card_counts(&self, section: &str, id: &str) -> Option<Vec<i32>> {
        self.section(section)
            .map(|s| s.card_entries(id).map(|c| c.count).collect())
    }

    /// Investigator owns a story asset
    fn has_card(&self, code: &str, card: &str) -> bool {
        self.investigator_data(code)
            .is_some_and(|data| data.story_assets.iter().any(|c| c.as_str() == card))
    }

    fn is_killed(&self, code: &str) -> bool {
        let data = self.investigator_data(code);
        if data.is_some_and(|d| d.killed) {
            return true;
        }
        let physical = data.map_or(0, |d| d.physical);
        self.roster()
            .iter()
            .find(|card| card.code.as_str() == code)
            .and_then(|card| card.health)
            .is_some_and(|health| physical >= health)
    }

    fn is_insane(&self, code: &str) -> bool {
        let data = self.investigator_data(code);
        if data.is_some_and(|d| d.insane) {
            return true;
        }
        let mental = data.map_or(0, |d| d.mental);
        self.roster()
            .iter()
            .find(|card| card.code.as_str() == code)
            .and_then(|card| card.sanity)
            .is_some_and(|sanity| mental >= sanity)
    }

    fn is_eliminated(&self, code: &str) -> bool {
        self.is_killed(code) || self.is_insane(code)
    }

    fn is_alive(&self, code: &str) -> bool {
        !self.is_killed(code) && !self.is_insane(code)
    }

    /// Defeated in the current scenario
    fn is_defeated(&self, code: &str) -> bool {
        self.scenario()
            .is_some_and(|s| s.defeated.iter().any(|c| c.as_str() == code))
    }

    /// Resigned from the current scenario
    fn resigned(&self, code: &str) -> bool {
        self.scenario()
            .is_some_and(|s| s.resigned.iter().any(|c| c.as_str() == code))
    }

    fn has_mental_trauma(&self, code: &str) -> bool {
        self.investigator_data(code).is_some_and(|d| d.mental > 0)
    }

    fn has_physical_trauma(&self, code: &str) -> bool {
        self.investigator_data(code).is_some_and(|d| d.physical > 0)
    }

    fn has_partner_status(&self, section: &str, partner: &str, status: &str) -> bool {
        self.partners(section)
            .iter()
            .find(|p| p.code == partner)
            .is_some_and(|p| p.status.iter().any(|s| s == status))
    }

    /// Investigator cards in roster order
    fn investigators(&self, include_eliminated: bool) -> Vec<&Card> {
        self.roster()
            .iter()
            .filter(|card| include_eliminated || !self.is_eliminated(card.code.as_str()))
            .collect()
    }

    fn investigator_codes(&self, include_eliminated: bool) -> Vec<InvestigatorCode> {
        self.investigators(include_eliminated)
            .into_iter()
            .map(|card| card.code.clone())
            .collect()
    }

    /// Investigators (eliminated ones included) with the given status
    fn investigators_with_status(&self, status: InvestigatorStatus) -> Vec<InvestigatorCode> {
        self.investigator_codes(true)
            .into_iter()
            .filter(|code| match status {
                InvestigatorStatus::Alive => self.is_alive(code.as_str()),
                InvestigatorStatus::Killed => self.is_killed(code.as_str()),
                InvestigatorStatus::Insane => self.is_insane(code.as_str()),
                InvestigatorStatus::Eliminated => self.is_eliminated(code.as_str()),
                InvestigatorStatus::Defeated => self.is_defeated(code.as_str()),
                InvestigatorStatus::Resigned => self.resigned(code.as_str()),
            })
            .collect()
    }

    /// Chosen lead investigator, falling back to the first active investigator
    fn lead_investigator_choice(&self) -> InvestigatorCode {
        self.scenario()
            .and_then(|s| s.lead_investigator.clone())
            .or_else(|| self.investigator_codes(false).into_iter().next())
            .unwrap_or_default()
    }

    fn earned_xp(&self, code: &str) -> i32 {
        self.investigator_data(code).map_or(0, |d| d.earned_xp)
    }

    /// Number of active investigators
    fn player_count(&self) -> i32 {
        self.investigators(false).len() as i32
    }

    /// Resolution of the current scenario, empty if unresolved
    fn resolution(&self) -> String {
        self.scenario()
            .and_then(|s| s.resolution.clone())
            .unwrap_or_default()
    }

    fn has_resolution(&self) -> bool {
        self.scenario().is_some_and(|s| s.resolution.is_some())
    }

    fn scenario_status(&self, scenario: &str) -> ScenarioStatus {
        self.campaign_data()
            .scenario_status
            .get(scenario)
            .copied()
            .unwrap_or_default()
    }

    fn guide_version(&self) -> u32 {
        self.campaign_data().guide_version
    }

    /// Number of tokens of one kind in the chaos bag
    fn chaos_bag(&self, token: &str) -> i32 {
        self.campaign_data().chaos_bag.get(token).copied().unwrap_or(0)
    }

    fn linked(&self) -> bool {
        self.campaign_data().linked
    }
}

/// In-memory campaign log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignLog {
    /// Investigator cards, in the order they joined
    #[serde(default)]
    pub investigators: Vec<Card>,
    #[serde(default)]
    pub sections: IndexMap<String, LogSection>,
    /// Section name to investigator code to sub-section
    #[serde(default)]
    pub investigator_sections: IndexMap<String, IndexMap<InvestigatorCode, LogSection>>,
    #[serde(default)]
    pub partners: IndexMap<String, Vec<Partner>>,
    #[serde(default)]
    pub campaign_data: CampaignData,
    #[serde(default)]
    pub scenario: Option<ScenarioState>,
}

impl CampaignLog {
    /// Create an empty log for the given investigators
    pub fn new(investigators: Vec<Card>) -> Self {
        Self {
            investigators,
            ..Self::default()
        }
    }

    /// Append an entry to a section, creating the section if needed
    pub fn record(&mut self, section: &str, entry: LogEntry) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .entries
            .push(entry);
    }

    /// Append an entry to an investigator's sub-section
    pub fn record_for(&mut self, section: &str, investigator: &str, entry: LogEntry) {
        self.investigator_sections
            .entry(section.to_string())
            .or_default()
            .entry(CardCode::from(investigator))
            .or_default()
            .entries
            .push(entry);
    }

    /// Mutable trauma data for an investigator
    pub fn investigator_data_mut(&mut self, code: &str) -> &mut InvestigatorData {
        self.campaign_data
            .investigator_data
            .entry(CardCode::from(code))
            .or_default()
    }
}

impl CampaignLogView for CampaignLog {
    fn section(&self, section: &str) -> Option<&LogSection> {
        self.sections.get(section)
    }

    fn investigator_section(&self, section: &str, code: &str) -> Option<&LogSection> {
        self.investigator_sections.get(section)?.get(code)
    }

    fn investigator_section_codes(&self, section: &str) -> Vec<InvestigatorCode> {
        self.investigator_sections
            .get(section)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn roster(&self) -> &[Card] {
        &self.investigators
    }

    fn campaign_data(&self) -> &CampaignData {
        &self.campaign_data
    }

    fn scenario(&self) -> Option<&ScenarioState> {
        self.scenario.as_ref()
    }

    fn partners(&self, section: &str) -> &[Partner] {
        self.partners.get(section).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::CardType;

    fn investigator(code: &str, health: u32, sanity: u32) -> Card {
        let mut card = Card::new(code, code, CardType::Investigator);
        card.health = Some(health);
        card.sanity = Some(sanity);
        card
    }

    fn make_log() -> CampaignLog {
        let mut log = CampaignLog::new(vec![
            investigator("01001", 9, 5),
            investigator("01002", 5, 9),
        ]);
        log.record("campaign_notes", LogEntry::basic("ghoul_priest_alive"));
        log.record("campaign_notes", LogEntry::basic("house_burned").crossed_out());
        log.record("supplies", LogEntry::count("ammo", 3));
        log.record("supplies", LogEntry::count("ammo", 7));
        log.record("story", LogEntry::cards("allies", &["01117", "02020"]));
        log.record("story", LogEntry::cards("allies", &["03001"]));
        log.record("story", LogEntry::cards("allies", &["03002"]).crossed_out());
        log
    }

    #[test]
    fn test_check_and_count() {
        let log = make_log();
        assert!(log.check("campaign_notes", "ghoul_priest_alive"));
        assert!(!log.check("campaign_notes", "house_burned"));
        assert!(!log.check("missing", "ghoul_priest_alive"));
        assert_eq!(log.count("supplies", "ammo"), 3);
        assert_eq!(log.count("supplies", "food"), 0);
        assert!(log.section_exists("supplies"));
        assert!(!log.section_exists("missing"));
    }

    #[test]
    fn test_all_cards_aggregates() {
        let log = make_log();
        assert_eq!(
            log.all_cards("story", "allies"),
            Some(vec!["01117".to_string(), "02020".to_string(), "03001".to_string()])
        );
        assert_eq!(log.all_card_counts("story", "allies"), Some(vec![1, 1, 1]));
        assert_eq!(log.all_cards("missing", "allies"), None);
    }

    #[test]
    fn test_trauma_thresholds() {
        let mut log = make_log();
        log.investigator_data_mut("01001").mental = 5;
        log.investigator_data_mut("01002").physical = 1;
        assert!(log.is_insane("01001"));
        assert!(log.is_eliminated("01001"));
        assert!(!log.is_killed("01002"));
        assert!(log.has_physical_trauma("01002"));
        assert_eq!(log.investigator_codes(false), vec![CardCode::from("01002")]);
        assert_eq!(log.investigator_codes(true).len(), 2);
        assert_eq!(log.player_count(), 1);
        assert_eq!(log.lead_investigator_choice(), CardCode::from("01002"));
    }

    #[test]
    fn test_task_lookup() {
        let mut log = make_log();
        log.record("tasks", LogEntry::task("find_relic", Some("01002"), 2));
        assert_eq!(log.task("tasks", "find_relic"), 2);
        assert_eq!(log.task_assignee("tasks", "find_relic"), Some(CardCode::from("01002")));
        assert_eq!(log.task_assignee("tasks", "missing"), None);
    }

    #[test]
    fn test_log_from_ron() {
        let log: CampaignLog = ron::from_str(
            r#"(
                sections: {
                    "supplies": (entries: [(id: "ammo", value: Count(3))]),
                },
                campaign_data: (difficulty: Some("hard"), chaos_bag: {"skull": 2}),
            )"#,
        )
        .unwrap();
        assert_eq!(log.count("supplies", "ammo"), 3);
        assert_eq!(log.chaos_bag("skull"), 2);
        assert_eq!(log.chaos_bag("cultist"), 0);
    }
}
