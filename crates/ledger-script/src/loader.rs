//! RON data loader

use crate::error::{Error, Result};
use crate::schema::{CardDef, CardDefs, ConditionDefs};
use indexmap::IndexMap;
use ledger_campaign::{evaluate, CampaignLog, Condition, ConditionResult};
use ledger_core::{Card, CardCatalog, CardCode};
use ledger_deck::{parse_deck, Deck, DeckConfig, DeckRules, ParsedDeck};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Loaded catalog, guide and deck data
#[derive(Debug, Default)]
pub struct GameData {
    /// Every loaded card, by code
    pub catalog: CardCatalog,
    /// Guide conditions by id, in load order
    pub conditions: IndexMap<String, Condition>,
    pub campaign_log: Option<CampaignLog>,
    /// Decks by id, in load order
    pub decks: IndexMap<String, Deck>,
    pub deck_config: Option<DeckConfig>,
}

impl GameData {
    /// Create empty game data
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_card(&self, code: &str) -> Option<&Card> {
        self.catalog.get(code)
    }

    pub fn get_condition(&self, id: &str) -> Option<&Condition> {
        self.conditions.get(id)
    }

    pub fn get_deck(&self, id: &str) -> Option<&Deck> {
        self.decks.get(id)
    }

    /// The loaded deck config, or the default one
    pub fn deck_config(&self) -> DeckConfig {
        self.deck_config.clone().unwrap_or_default()
    }

    /// Evaluate a named condition against the loaded campaign log
    ///
    /// An absent campaign log reads as an empty one.
    pub fn evaluate(&self, condition_id: &str) -> Option<ConditionResult> {
        let condition = self.get_condition(condition_id)?;
        let result = match &self.campaign_log {
            Some(log) => evaluate(condition, log),
            None => evaluate(condition, &CampaignLog::default()),
        };
        Some(result)
    }

    /// Parse a loaded deck, optionally against a loaded previous version
    ///
    /// `None` when either deck id is unknown.
    pub fn parse_deck<R: DeckRules>(
        &self,
        deck_id: &str,
        previous_id: Option<&str>,
        rules: &R,
    ) -> Option<ledger_deck::Result<ParsedDeck>> {
        let deck = self.get_deck(deck_id)?;
        let previous = match previous_id {
            Some(id) => Some(self.get_deck(id)?),
            None => None,
        };
        Some(parse_deck(
            deck,
            &self.catalog,
            rules,
            &self.deck_config(),
            previous,
        ))
    }
}

#[derive(Deserialize)]
struct CampaignLogFile {
    /// Investigator codes resolved against the catalog when loading finishes
    #[serde(default)]
    investigators: Vec<String>,
    campaign_log: CampaignLog,
}

/// Loader for RON data files
pub struct Loader {
    data: GameData,
    pending_investigators: Vec<CardCode>,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            data: GameData::new(),
            pending_investigators: Vec::new(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        log::debug!("loading {}", path.display());

        if filename.contains("config") || content.contains("deck_config:") {
            self.load_config_str(&content)
        } else if filename.contains("campaign") || content.contains("campaign_log:") {
            self.load_campaign_log_str(&content)
        } else if filename.contains("condition") || content.contains("conditions:") {
            self.load_conditions_str(&content)
        } else if filename.contains("deck") || content.contains("decks:") {
            self.load_decks_str(&content)
        } else if filename.contains("card") || content.contains("cards:") {
            self.load_cards_str(&content)
        } else {
            self.load_single_definition(&content)
        }
    }

    /// Load card definitions from a RON string
    pub fn load_cards_str(&mut self, content: &str) -> Result<()> {
        let file: CardDefs = ron::from_str(content)?;
        let count = file.cards.len();
        for def in file.cards {
            self.insert_card(def.into_card()?)?;
        }
        log::debug!("loaded {} cards", count);
        Ok(())
    }

    /// Load named conditions from a RON string
    pub fn load_conditions_str(&mut self, content: &str) -> Result<()> {
        let file: ConditionDefs = ron::from_str(content)?;
        let count = file.conditions.len();
        for def in file.conditions {
            if self.data.conditions.contains_key(&def.id) {
                return Err(Error::DuplicateDefinition(def.id));
            }
            self.data.conditions.insert(def.id, def.condition);
        }
        log::debug!("loaded {} conditions", count);
        Ok(())
    }

    /// Load the campaign log from a RON string
    pub fn load_campaign_log_str(&mut self, content: &str) -> Result<()> {
        let file: CampaignLogFile = ron::from_str(content)?;
        if self.data.campaign_log.is_some() {
            return Err(Error::DuplicateDefinition("campaign_log".to_string()));
        }
        self.pending_investigators = file.investigators.into_iter().map(CardCode::from).collect();
        self.data.campaign_log = Some(file.campaign_log);
        Ok(())
    }

    /// Load decks from a RON string
    pub fn load_decks_str(&mut self, content: &str) -> Result<()> {
        #[derive(Deserialize)]
        struct DeckFile {
            decks: Vec<Deck>,
        }

        let file: DeckFile = ron::from_str(content)?;
        for deck in file.decks {
            self.insert_deck(deck)?;
        }
        Ok(())
    }

    /// Load the deck config from a RON string
    pub fn load_config_str(&mut self, content: &str) -> Result<()> {
        #[derive(Deserialize)]
        struct ConfigFile {
            deck_config: DeckConfig,
        }

        let file: ConfigFile = ron::from_str(content)?;
        if self.data.deck_config.is_some() {
            return Err(Error::DuplicateDefinition("deck_config".to_string()));
        }
        self.data.deck_config = Some(file.deck_config);
        Ok(())
    }

    fn insert_card(&mut self, card: Card) -> Result<()> {
        if self.data.catalog.contains(card.code.as_str()) {
            return Err(Error::DuplicateDefinition(card.code.to_string()));
        }
        self.data.catalog.insert(card);
        Ok(())
    }

    fn insert_deck(&mut self, deck: Deck) -> Result<()> {
        if self.data.decks.contains_key(&deck.id) {
            return Err(Error::DuplicateDefinition(deck.id));
        }
        self.data.decks.insert(deck.id.clone(), deck);
        Ok(())
    }

    /// Try to load a file holding one bare card or deck
    fn load_single_definition(&mut self, content: &str) -> Result<()> {
        if let Ok(def) = ron::from_str::<CardDef>(content) {
            return self.insert_card(def.into_card()?);
        }

        if let Ok(deck) = ron::from_str::<Deck>(content) {
            return self.insert_deck(deck);
        }

        Err(Error::InvalidSchema(
            "Could not parse as any known definition type".to_string(),
        ))
    }

    /// Load all RON files from a directory, in file name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut paths = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for file_path in paths {
            if file_path.extension().is_some_and(|e| e == "ron") {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the game data
    ///
    /// Campaign log investigators are resolved against the catalog here, so
    /// files may be loaded in any order. Unknown codes are skipped.
    pub fn finish(mut self) -> GameData {
        if let Some(log) = self.data.campaign_log.as_mut() {
            for code in &self.pending_investigators {
                if log.investigators.iter().any(|card| &card.code == code) {
                    continue;
                }
                match self.data.catalog.get(code.as_str()) {
                    Some(card) => log.investigators.push(card.clone()),
                    None => log::warn!("unknown investigator {} in campaign log", code),
                }
            }
        }
        log::debug!(
            "loaded {} cards, {} conditions, {} decks",
            self.data.catalog.len(),
            self.data.conditions.len(),
            self.data.decks.len()
        );
        self.data
    }

    /// Get the current data (for inspection during loading)
    pub fn data(&self) -> &GameData {
        &self.data
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_deck::StandardRules;

    const CARDS: &str = r#"
    (
        cards: [
            (
                code: "01001",
                name: "Roland Banks",
                type_code: "investigator",
                faction_code: "guardian",
                deck_requirements: Some((size: 30)),
            ),
            (
                code: "01016",
                name: ".45 Automatic",
                type_code: "asset",
                faction_code: "guardian",
                xp: Some(0),
                cost: Some("4"),
                slot: Some("Hand"),
            ),
            (
                code: "01020",
                name: "Machete",
                type_code: "asset",
                faction_code: "guardian",
                xp: Some(0),
                cost: Some("3"),
                slot: Some("Hand"),
            ),
        ]
    )
    "#;

    const CONDITIONS: &str = r#"
    (
        conditions: [
            (
                id: "ammo_count",
                condition: CampaignLogCount(
                    section: "supplies",
                    id: "ammo",
                    options: [(condition: 3, payload: (steps: ["well_stocked"]))],
                    default_option: Some((steps: ["short"])),
                ),
            ),
        ]
    )
    "#;

    const CAMPAIGN_LOG: &str = r#"
    (
        investigators: ["01001", "09999"],
        campaign_log: (
            sections: {
                "supplies": (entries: [(id: "ammo", value: Count(3))]),
            },
        ),
    )
    "#;

    const DECKS: &str = r#"
    (
        decks: [
            (
                id: "roland-1",
                name: "Roland",
                investigator_code: "01001",
                slots: {"01001": 1},
            ),
            (
                id: "roland-2",
                name: "Roland",
                investigator_code: "01001",
                slots: {"01001": 1, "01016": 1},
                xp: 2,
            ),
        ]
    )
    "#;

    fn load_all() -> GameData {
        let mut loader = Loader::new();
        loader.load_campaign_log_str(CAMPAIGN_LOG).unwrap();
        loader.load_cards_str(CARDS).unwrap();
        loader.load_conditions_str(CONDITIONS).unwrap();
        loader.load_decks_str(DECKS).unwrap();
        loader.finish()
    }

    #[test]
    fn test_load_cards() {
        let mut loader = Loader::new();
        loader.load_cards_str(CARDS).unwrap();

        let data = loader.finish();
        assert_eq!(data.catalog.len(), 3);
        assert_eq!(data.get_card("01020").unwrap().name, "Machete");
        assert!(data.get_card("01099").is_none());
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let mut loader = Loader::new();
        loader.load_cards_str(CARDS).unwrap();
        assert!(matches!(
            loader.load_cards_str(CARDS),
            Err(Error::DuplicateDefinition(code)) if code == "01001"
        ));
    }

    #[test]
    fn test_duplicate_condition_rejected() {
        let mut loader = Loader::new();
        loader.load_conditions_str(CONDITIONS).unwrap();
        assert!(matches!(
            loader.load_conditions_str(CONDITIONS),
            Err(Error::DuplicateDefinition(id)) if id == "ammo_count"
        ));
    }

    #[test]
    fn test_evaluate_loaded_condition() {
        let data = load_all();

        let result = data.evaluate("ammo_count").unwrap();
        assert_eq!(result.as_number().unwrap().number, 3);
        assert_eq!(
            result.option().unwrap().payload.steps,
            vec!["well_stocked".to_string()]
        );
        assert!(data.evaluate("missing").is_none());
    }

    #[test]
    fn test_evaluate_without_campaign_log() {
        let mut loader = Loader::new();
        loader.load_conditions_str(CONDITIONS).unwrap();
        let data = loader.finish();

        let result = data.evaluate("ammo_count").unwrap();
        assert_eq!(result.as_number().unwrap().number, 0);
        assert_eq!(result.option().unwrap().payload.steps, vec!["short".to_string()]);
    }

    #[test]
    fn test_campaign_log_investigators_resolved() {
        let data = load_all();

        let log = data.campaign_log.as_ref().unwrap();
        assert_eq!(log.investigators.len(), 1);
        assert_eq!(log.investigators[0].name, "Roland Banks");
    }

    #[test]
    fn test_parse_loaded_decks() {
        let data = load_all();
        let rules = StandardRules::new();

        let parsed = data
            .parse_deck("roland-2", Some("roland-1"), &rules)
            .unwrap()
            .unwrap();
        let changes = parsed.changes.unwrap();
        assert_eq!(changes.spent_xp, 1);
        assert_eq!(parsed.available_experience, 2);

        assert!(data.parse_deck("roland-3", None, &rules).is_none());
        assert!(data.parse_deck("roland-2", Some("roland-0"), &rules).is_none());
    }

    #[test]
    fn test_load_config() {
        let mut loader = Loader::new();
        loader
            .load_config_str(r#"(deck_config: (list_separator: " / "))"#)
            .unwrap();
        assert!(loader.load_config_str(r#"(deck_config: ())"#).is_err());

        let data = loader.finish();
        assert_eq!(data.deck_config().list_separator(), " / ");
        assert_eq!(data.deck_config().special().adaptable, "02110");
    }

    #[test]
    fn test_default_config() {
        let data = Loader::new().finish();
        assert_eq!(data.deck_config().list_separator(), ". ");
    }

    #[test]
    fn test_load_single_card() {
        let content = r#"(code: "01020", name: "Machete", type_code: "asset", xp: Some(0))"#;

        let mut loader = Loader::new();
        loader.load_single_definition(content).unwrap();

        let data = loader.finish();
        assert!(data.get_card("01020").is_some());
    }

    #[test]
    fn test_load_single_unknown() {
        let mut loader = Loader::new();
        assert!(matches!(
            loader.load_single_definition("(colour: \"red\")"),
            Err(Error::InvalidSchema(_))
        ));
    }
}
