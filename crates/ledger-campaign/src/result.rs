//! Condition results

use crate::branch::{
    BoolOption, BranchPayload, InvestigatorBranch, NumOption, SelectedBranch, StringOption,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Investigator (or partner) code to the ids of the options matched for them
///
/// A code missing from the map matched no option.
pub type InvestigatorChoices = IndexMap<String, Vec<String>>;

/// Outcome of a yes/no condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryResult {
    pub decision: bool,
    /// `None` when no option matched: no branch is taken
    pub option: Option<SelectedBranch>,
    /// Investigators or cards that produced the decision
    #[serde(default)]
    pub input: Option<Vec<String>>,
    #[serde(default)]
    pub number_input: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberResult {
    pub number: i32,
    pub option: Option<SelectedBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringResult {
    pub value: String,
    pub option: Option<SelectedBranch>,
}

/// Per-investigator outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorResult {
    pub investigator_choices: InvestigatorChoices,
    /// Options referenced by at least one investigator choice
    pub options: Vec<InvestigatorBranch>,
}

/// Result of evaluating a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionResult {
    Binary(BinaryResult),
    Number(NumberResult),
    String(StringResult),
    Investigator(InvestigatorResult),
}

impl ConditionResult {
    /// The selected option of a scalar result
    pub fn option(&self) -> Option<&SelectedBranch> {
        match self {
            ConditionResult::Binary(r) => r.option.as_ref(),
            ConditionResult::Number(r) => r.option.as_ref(),
            ConditionResult::String(r) => r.option.as_ref(),
            ConditionResult::Investigator(_) => None,
        }
    }

    /// Whether the result counts towards a multi-condition threshold
    ///
    /// Scalar results pass when an option was selected; investigator results
    /// pass when any investigator matched an option.
    pub fn passes(&self) -> bool {
        match self {
            ConditionResult::Investigator(r) => !r.options.is_empty(),
            other => other.option().is_some(),
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryResult> {
        match self {
            ConditionResult::Binary(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberResult> {
        match self {
            ConditionResult::Number(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringResult> {
        match self {
            ConditionResult::String(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_investigator(&self) -> Option<&InvestigatorResult> {
        match self {
            ConditionResult::Investigator(r) => Some(r),
            _ => None,
        }
    }
}

impl From<BinaryResult> for ConditionResult {
    fn from(result: BinaryResult) -> Self {
        ConditionResult::Binary(result)
    }
}

impl From<NumberResult> for ConditionResult {
    fn from(result: NumberResult) -> Self {
        ConditionResult::Number(result)
    }
}

impl From<StringResult> for ConditionResult {
    fn from(result: StringResult) -> Self {
        ConditionResult::String(result)
    }
}

impl From<InvestigatorResult> for ConditionResult {
    fn from(result: InvestigatorResult) -> Self {
        ConditionResult::Investigator(result)
    }
}

impl BinaryResult {
    /// Select the first option whose condition equals the decision
    pub fn new(decision: bool, options: &[BoolOption]) -> Self {
        Self {
            decision,
            option: options
                .iter()
                .find(|option| option.condition == decision)
                .map(SelectedBranch::from),
            input: None,
            number_input: None,
        }
    }

    pub fn with_input(mut self, input: Vec<String>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_number_input(mut self, number_input: Vec<i32>) -> Self {
        self.number_input = Some(number_input);
        self
    }
}

impl NumberResult {
    /// Select the first option equal to the value, else the default option
    pub fn new(number: i32, options: &[NumOption], default_option: Option<&BranchPayload>) -> Self {
        let option = options
            .iter()
            .find(|option| option.condition == number)
            .map(SelectedBranch::from)
            .or_else(|| default_option.map(SelectedBranch::default_option));
        Self { number, option }
    }
}

impl StringResult {
    /// Select the first option equal to the value, else the default option
    pub fn new(value: String, options: &[StringOption], default_option: Option<&BranchPayload>) -> Self {
        let option = options
            .iter()
            .find(|option| option.condition == value)
            .map(SelectedBranch::from)
            .or_else(|| default_option.map(SelectedBranch::default_option));
        Self { value, option }
    }
}

impl InvestigatorResult {
    /// Keep only the options some investigator chose
    pub fn new(investigator_choices: InvestigatorChoices, options: Vec<InvestigatorBranch>) -> Self {
        let options = options
            .into_iter()
            .filter(|option| {
                investigator_choices
                    .values()
                    .any(|choices| choices.iter().any(|choice| *choice == option.id))
            })
            .collect();
        Self {
            investigator_choices,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::Branch;

    fn bool_options() -> Vec<BoolOption> {
        vec![
            Branch::new(false, BranchPayload::steps(&["no"])),
            Branch::new(true, BranchPayload::steps(&["yes"])),
            Branch::new(true, BranchPayload::steps(&["yes_again"])),
        ]
    }

    #[test]
    fn test_binary_first_match() {
        let result = BinaryResult::new(true, &bool_options());
        assert_eq!(result.option.unwrap().payload.steps, vec!["yes".to_string()]);
        let result = BinaryResult::new(false, &bool_options()[1..]);
        assert!(result.option.is_none());
    }

    #[test]
    fn test_number_default_fallback() {
        let options = vec![Branch::new(3, BranchPayload::steps(&["three"]))];
        let fallback = BranchPayload::steps(&["other"]);
        let result = NumberResult::new(4, &options, Some(&fallback));
        assert_eq!(result.option.unwrap().key, crate::branch::BranchKey::Default);
        assert!(NumberResult::new(4, &options, None).option.is_none());
    }

    #[test]
    fn test_investigator_options_filtered() {
        let options: Vec<InvestigatorBranch> =
            bool_options()[..2].iter().map(InvestigatorBranch::from_bool).collect();
        let mut choices = InvestigatorChoices::new();
        choices.insert("01001".to_string(), vec!["true".to_string()]);
        let result = InvestigatorResult::new(choices, options);
        assert_eq!(result.options.len(), 1);
        assert_eq!(result.options[0].id, "true");
        assert!(ConditionResult::from(result).passes());
    }
}
