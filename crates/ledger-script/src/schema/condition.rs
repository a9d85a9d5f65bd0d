//! Named condition schema

use ledger_campaign::Condition;
use serde::{Deserialize, Serialize};

/// A guide condition stored under an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDef {
    pub id: String,
    pub condition: Condition,
}

/// A collection of named conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConditionDefs {
    pub conditions: Vec<ConditionDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_def_ron() {
        let ron_str = r#"
        (
            id: "supplies_check",
            condition: CampaignLog(
                section: "supplies",
                id: "rope",
                options: [(condition: true, payload: (steps: ["climb"]))],
            ),
        )
        "#;

        let def: ConditionDef = ron::from_str(ron_str).unwrap();
        assert_eq!(def.id, "supplies_check");
        assert_eq!(def.condition.kind(), "campaign_log");
    }
}
