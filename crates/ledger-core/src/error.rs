//! Error types for ledger-core

use thiserror::Error;

/// Core error type
///
/// Only produced when parsing the closed enumerations of the data model.
/// Lookups against catalogs and slots never fail; they degrade to empty values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown faction: {0}")]
    UnknownFaction(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Unknown slot: {0}")]
    UnknownSlot(String),

    #[error("Unknown card type: {0}")]
    UnknownCardType(String),

    #[error("Invalid cost: {0}")]
    InvalidCost(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
