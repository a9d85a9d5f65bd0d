//! Ledger Script - RON loader for ledger data
//!
//! Loads ledger content from RON files:
//! - Card catalogs in the shape of the public card data export
//! - Named guide conditions
//! - The campaign log
//! - Deck snapshots and the deck config
//!
//! The loaded `GameData` evaluates conditions against the campaign log and
//! parses decks against the catalog.

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{GameData, Loader};
pub use schema::{CardDef, CardDefs, ConditionDef, ConditionDefs};
