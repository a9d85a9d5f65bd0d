//! Schema definitions for RON data files

pub mod card;
pub mod condition;

pub use card::{CardDef, CardDefs};
pub use condition::{ConditionDef, ConditionDefs};
