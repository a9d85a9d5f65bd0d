//! Identity types for cards and investigators

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a card in the catalog (e.g. "01033")
///
/// Investigators are identified by the code of their investigator card, so the
/// same type doubles as the investigator identity inside campaign logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(pub String);

/// Investigators are keyed by their card code
pub type InvestigatorCode = CardCode;

impl CardCode {
    /// Create a new card code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for CardCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&CardCode> for CardCode {
    fn from(code: &CardCode) -> Self {
        code.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_card_code() {
        let code = CardCode::new("01033");
        assert_eq!(code.as_str(), "01033");
        assert_eq!(format!("{}", code), "01033");
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map: IndexMap<CardCode, u32> = IndexMap::new();
        map.insert("02110".into(), 2);
        assert_eq!(map.get("02110"), Some(&2));
        assert_eq!(map.get("02111"), None);
    }
}
