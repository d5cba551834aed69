//! Substring search terms.

/// A case-sensitive substring filter.
///
/// An absent or empty term matches every text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    pub fn new(term: Option<String>) -> Self {
        Self(term)
    }

    pub fn any() -> Self {
        Self(None)
    }

    /// True for an absent or empty term.
    pub fn is_unrestricted(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.0 {
            Some(term) => text.contains(term.as_str()),
            None => true,
        }
    }

    /// True if at least one of `texts` matches.
    pub fn matches_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|t| self.matches(t))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl From<&str> for SearchTerm {
    fn from(term: &str) -> Self {
        Self(Some(term.to_string()))
    }
}

impl From<Option<String>> for SearchTerm {
    fn from(term: Option<String>) -> Self {
        Self(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sensitive() {
        let term = SearchTerm::from("Plaza");
        assert!(term.matches("Central Plaza"));
        assert!(!term.matches("central plaza"));
    }

    #[test]
    fn test_empty_and_absent_match_everything() {
        assert!(SearchTerm::from("").matches("East Side"));
        assert!(SearchTerm::any().matches(""));
    }

    #[test]
    fn test_unrestricted_terms() {
        assert!(SearchTerm::any().is_unrestricted());
        assert!(SearchTerm::from("").is_unrestricted());
        assert!(!SearchTerm::from(" ").is_unrestricted());
    }

    #[test]
    fn test_matches_any() {
        let term = SearchTerm::from("Vitosha");
        assert!(term.matches_any(&["South Park", "12 Vitosha Blvd"]));
        assert!(!term.matches_any(&["South Park", "Graf Ignatiev 4"]));
    }
}
