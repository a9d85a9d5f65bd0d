//! Error types for ledger-deck

use thiserror::Error;

/// Deck parsing error type
///
/// Missing cards and malformed meta values degrade silently; only a missing
/// investigator makes a deck impossible to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing {role} investigator card: {code}")]
    MissingInvestigator { role: &'static str, code: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
