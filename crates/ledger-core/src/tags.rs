//! Tag sets for traits and slots
//!
//! Card data encodes traits and slots as delimited text ("Spell. Blessed." or
//! the normalized "#spell#blessed#"). [`TagSet`] parses either form once, at
//! the data-model boundary, and answers delimiter-bounded, case-insensitive
//! membership queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered set of tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse delimited tag text
    ///
    /// Both `.` and `#` act as delimiters; surrounding whitespace is trimmed and
    /// empty fragments are dropped. Duplicates (ignoring case) keep the first
    /// spelling.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::new();
        for tag in text.split(['.', '#']) {
            set.insert(tag);
        }
        set
    }

    /// Add a tag, ignoring blanks and case-insensitive duplicates
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Add every tag of another set
    pub fn extend(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    /// Check whether the set holds a tag (whole tag, case-insensitive)
    pub fn has(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Iterate tags in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Normalized form: lowercase tags wrapped in `#` delimiters
    pub fn normalized(&self) -> String {
        if self.tags.is_empty() {
            return String::new();
        }
        let mut out = String::from("#");
        for tag in &self.tags {
            out.push_str(&tag.to_lowercase());
            out.push('#');
        }
        out
    }

    /// Join tags for display using the given separator, with a trailing period
    pub fn join(&self, separator: &str) -> String {
        if self.tags.is_empty() {
            return String::new();
        }
        format!("{}.", self.tags.join(separator))
    }
}

impl From<String> for TagSet {
    fn from(text: String) -> Self {
        TagSet::parse(&text)
    }
}

impl From<&str> for TagSet {
    fn from(text: &str) -> Self {
        TagSet::parse(text)
    }
}

impl From<TagSet> for String {
    fn from(set: TagSet) -> Self {
        set.join(". ")
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_form() {
        let tags = TagSet::parse("Spell. Blessed.");
        assert_eq!(tags.len(), 2);
        assert!(tags.has("spell"));
        assert!(tags.has("BLESSED"));
        assert_eq!(tags.normalized(), "#spell#blessed#");
    }

    #[test]
    fn test_parse_normalized_form() {
        let tags = TagSet::parse("#spell#skill#");
        assert!(tags.has("Spell"));
        assert!(tags.has("skill"));
        assert!(!tags.has("spel"));
    }

    #[test]
    fn test_whole_tag_matching() {
        let tags = TagSet::parse("Spellbook.");
        assert!(!tags.has("spell"));
        assert!(tags.has("spellbook"));
    }

    #[test]
    fn test_serde_as_text() {
        let tags: TagSet = ron::from_str("\"Item. Weapon. Firearm.\"").unwrap();
        assert!(tags.has("firearm"));
        let text = ron::to_string(&tags).unwrap();
        assert_eq!(text, "\"Item. Weapon. Firearm.\"");
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut tags = TagSet::parse("Spell.");
        assert!(!tags.insert("SPELL"));
        assert!(tags.insert("Ritual"));
        assert_eq!(tags.join(", "), "Spell, Ritual.");
    }
}
