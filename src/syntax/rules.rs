//! Word classification rules
//!
//! Word tokens are checked against the keyword set first and against the
//! special patterns second.

use std::collections::HashSet;

use regex::Regex;

use super::style::ClassStyle;

/// Keywords of a syntax, folded to lowercase when matching ignores case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<String>,
    ignore_case: bool,
}

impl KeywordSet {
    pub fn new(ignore_case: bool) -> Self {
        Self {
            words: HashSet::new(),
            ignore_case,
        }
    }

    /// Add every entry of a comma-separated list
    pub fn add_list(&mut self, list: &str) {
        for word in list.split(',').map(str::trim).filter(|w| !w.is_empty()) {
            self.add(word);
        }
    }

    pub fn add(&mut self, word: &str) {
        if self.ignore_case {
            self.words.insert(word.to_lowercase());
        } else {
            self.words.insert(word.to_string());
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.ignore_case {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A named pattern that gives matching words their own style
///
/// The pattern must match the whole word. A pattern starting with `^` is
/// anchored: it only applies to the first token of a rendered line.
#[derive(Debug, Clone)]
pub struct SpecialPattern {
    /// Name, as in `colorcode.special.<name>.pattern`
    pub name: String,
    /// Pattern source as configured
    pub source: String,
    /// Whether the pattern only applies at the start of a line
    pub anchored: bool,
    /// Style used for matches
    pub style: ClassStyle,
    regex: Regex,
}

impl SpecialPattern {
    pub fn new(name: &str, pattern: &str, style: ClassStyle) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            name: name.to_string(),
            source: pattern.to_string(),
            anchored: pattern.starts_with('^'),
            style,
            regex,
        })
    }

    /// Whole-token match, honoring the start-of-line anchor
    pub fn matches(&self, token: &str, at_line_start: bool) -> bool {
        self.matches_text(token) && (at_line_start || !self.anchored)
    }

    /// Whole-token match ignoring the anchor
    pub fn matches_text(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_ignore_case() {
        let mut keywords = KeywordSet::new(true);
        keywords.add_list("Select, FROM,,where");

        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains("select"));
        assert!(keywords.contains("SELECT"));
        assert!(keywords.contains("From"));
        assert!(!keywords.contains("order"));
    }

    #[test]
    fn test_keywords_case_sensitive() {
        let mut keywords = KeywordSet::new(false);
        keywords.add_list("select");

        assert!(keywords.contains("select"));
        assert!(!keywords.contains("SELECT"));
    }

    #[test]
    fn test_special_pattern_whole_token() {
        let rule = SpecialPattern::new("annotation", "@[A-Za-z]+", ClassStyle::default()).unwrap();
        assert!(!rule.anchored);
        assert!(rule.matches("@Override", false));
        assert!(rule.matches("@Override", true));
        assert!(!rule.matches("x@Override", false));
        assert!(!rule.matches("@Override1", false));
    }

    #[test]
    fn test_special_pattern_anchor() {
        let rule = SpecialPattern::new("comment", "^#.*", ClassStyle::default()).unwrap();
        assert!(rule.anchored);
        assert!(rule.matches("#comment", true));
        assert!(!rule.matches("#comment", false));
        assert!(rule.matches_text("#comment"));
        assert_eq!(rule.source, "^#.*");
    }

    #[test]
    fn test_special_pattern_invalid() {
        assert!(SpecialPattern::new("broken", "(", ClassStyle::default()).is_err());
    }
}
