//! Condition options: a predicate value paired with the guide content it selects

use serde::{Deserialize, Serialize};

/// Guide content selected when an option matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPayload {
    /// Guide steps to run
    #[serde(default)]
    pub steps: Vec<String>,
    /// Flavor or prompt text
    #[serde(default)]
    pub text: Option<String>,
}

impl BranchPayload {
    pub fn steps(steps: &[&str]) -> Self {
        Self {
            steps: steps.iter().map(|s| s.to_string()).collect(),
            text: None,
        }
    }
}

/// An option matched when the evaluated value equals `condition`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch<K> {
    pub condition: K,
    #[serde(default)]
    pub payload: BranchPayload,
}

impl<K> Branch<K> {
    pub fn new(condition: K, payload: BranchPayload) -> Self {
        Self { condition, payload }
    }
}

pub type BoolOption = Branch<bool>;
pub type NumOption = Branch<i32>;
pub type StringOption = Branch<String>;

/// The predicate value of a matched option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKey {
    Bool(bool),
    Number(i32),
    Text(String),
    /// The condition's default option
    Default,
}

/// An option selected by evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedBranch {
    pub key: BranchKey,
    pub payload: BranchPayload,
}

impl SelectedBranch {
    pub fn default_option(payload: &BranchPayload) -> Self {
        Self {
            key: BranchKey::Default,
            payload: payload.clone(),
        }
    }

    /// Selected the option keyed by `condition`
    pub fn is_bool(&self, condition: bool) -> bool {
        self.key == BranchKey::Bool(condition)
    }
}

impl From<&BoolOption> for SelectedBranch {
    fn from(option: &BoolOption) -> Self {
        Self {
            key: BranchKey::Bool(option.condition),
            payload: option.payload.clone(),
        }
    }
}

impl From<&NumOption> for SelectedBranch {
    fn from(option: &NumOption) -> Self {
        Self {
            key: BranchKey::Number(option.condition),
            payload: option.payload.clone(),
        }
    }
}

impl From<&StringOption> for SelectedBranch {
    fn from(option: &StringOption) -> Self {
        Self {
            key: BranchKey::Text(option.condition.clone()),
            payload: option.payload.clone(),
        }
    }
}

/// An option offered per investigator, named by the id investigator choices refer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorBranch {
    pub id: String,
    pub branch: SelectedBranch,
}

impl InvestigatorBranch {
    /// Bool options are named "true" / "false"
    pub fn from_bool(option: &BoolOption) -> Self {
        Self {
            id: option.condition.to_string(),
            branch: option.into(),
        }
    }

    /// String options are named by their value
    pub fn from_string(option: &StringOption) -> Self {
        Self {
            id: option.condition.clone(),
            branch: option.into(),
        }
    }

    /// Number options are named by their value
    pub fn from_number(option: &NumOption) -> Self {
        Self {
            id: option.condition.to_string(),
            branch: option.into(),
        }
    }
}
