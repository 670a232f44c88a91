//! Stat line normalization and stat replacement.
//!
//! Before matching, a raw stat line is lowercased, its whitespace collapsed
//! and a trailing hidden marker removed. Stat replacers then split lines
//! that describe several modifiers at once (keystones mostly) into
//! individually parseable lines.

use crate::error::DataError;
use regex::{Regex, RegexBuilder};

/// Trim and collapse every whitespace run into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase and collapse whitespace.
///
/// # Examples
///
/// ```rust
/// use statline::normalize::normalize;
///
/// assert_eq!(normalize("  30% Increased\tCritical  Strike Chance "), "30% increased critical strike chance");
/// ```
pub fn normalize(line: &str) -> String {
    collapse_whitespace(&line.to_lowercase())
}

/// Remove a trailing `marker` (case-insensitive) and trim.
pub fn strip_marker<'a>(line: &'a str, marker: &str) -> &'a str {
    let trimmed = line.trim_end();
    if marker.is_empty() || trimmed.len() < marker.len() {
        return trimmed.trim();
    }
    let split = trimmed.len() - marker.len();
    match (trimmed.get(..split), trimmed.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(marker) => head.trim(),
        _ => trimmed.trim(),
    }
}

/// Whether `remaining` is nothing but whitespace and an optional marker.
pub fn is_blank(remaining: &str, marker: &str) -> bool {
    strip_marker(remaining, marker).is_empty()
}

/// Rewrites a whole stat line into zero or more lines.
///
/// The pattern must match the entire line (case-insensitive). Each
/// replacement is expanded with the pattern's captures (`$1`, `${name}`);
/// an empty replacement list drops the line.
///
/// # Examples
///
/// ```rust
/// use statline::normalize::StatReplacer;
///
/// let replacer = StatReplacer::new(
///     r"(maximum life becomes 1), (immune to chaos damage)",
///     &["$1", "$2"],
/// ).unwrap();
/// assert_eq!(
///     replacer.apply("maximum life becomes 1, immune to chaos damage"),
///     Some(vec!["maximum life becomes 1".to_string(), "immune to chaos damage".to_string()])
/// );
/// assert_eq!(replacer.apply("maximum life becomes 1"), None);
/// ```
#[derive(Debug, Clone)]
pub struct StatReplacer {
    pattern: String,
    regex: Regex,
    replacements: Vec<String>,
}

impl StatReplacer {
    pub fn new(pattern: &str, replacements: &[&str]) -> Result<Self, DataError> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| DataError::InvalidReplacer {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            replacements: replacements.iter().map(|r| r.to_string()).collect(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The replacement lines, or `None` if the pattern does not match.
    pub fn apply(&self, line: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(line)?;
        Some(
            self.replacements
                .iter()
                .map(|template| {
                    let mut out = String::new();
                    captures.expand(template, &mut out);
                    out
                })
                .collect(),
        )
    }
}

/// Normalization plus stat replacement.
///
/// The first replacer that matches a line wins. Replacement lines are
/// normalized again but not replaced again.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    replacers: Vec<StatReplacer>,
    hidden_marker: String,
}

impl Preprocessor {
    pub fn new(replacers: Vec<StatReplacer>, hidden_marker: impl Into<String>) -> Self {
        Self {
            replacers,
            hidden_marker: hidden_marker.into().to_lowercase(),
        }
    }

    pub fn hidden_marker(&self) -> &str {
        &self.hidden_marker
    }

    fn clean(&self, line: &str) -> String {
        let normalized = normalize(line);
        strip_marker(&normalized, &self.hidden_marker).to_string()
    }

    /// The lines to parse for `line`, each normalized.
    pub fn preprocess(&self, line: &str) -> Vec<String> {
        let cleaned = self.clean(line);
        for replacer in &self.replacers {
            if let Some(parts) = replacer.apply(&cleaned) {
                return parts
                    .iter()
                    .map(|part| self.clean(part))
                    .filter(|part| !part.is_empty())
                    .collect();
            }
        }
        vec![cleaned]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("+30 to Maximum   Life"), "+30 to maximum life");
        assert_eq!(normalize("\n\t"), "");
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("10% more damage (Hidden)", "(hidden)"), "10% more damage");
        assert_eq!(strip_marker("10% more damage", "(hidden)"), "10% more damage");
        assert_eq!(strip_marker("(hidden)", "(hidden)"), "");
        assert_eq!(strip_marker("  ", "(hidden)"), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("", "(hidden)"));
        assert!(is_blank(" (HIDDEN) ", "(hidden)"));
        assert!(!is_blank("damage", "(hidden)"));
    }

    #[test]
    fn test_replacer_requires_full_match() {
        let replacer = StatReplacer::new("(.+) per grand spectrum", &["$0", "grand spectrum"]).unwrap();
        assert_eq!(
            replacer.apply("4% increased damage per grand spectrum"),
            Some(vec![
                "4% increased damage per grand spectrum".to_string(),
                "grand spectrum".to_string()
            ])
        );
        assert_eq!(replacer.apply("grand spectrum"), None);
    }

    #[test]
    fn test_invalid_replacer() {
        let err = StatReplacer::new("(unclosed", &[]).unwrap_err();
        assert!(matches!(err, DataError::InvalidReplacer { .. }));
    }

    #[test]
    fn test_preprocess_is_not_recursive() {
        let replacer = StatReplacer::new("(.+) per grand spectrum", &["$0", "grand spectrum"]).unwrap();
        let pre = Preprocessor::new(vec![replacer], "(hidden)");
        let parts = pre.preprocess("4% Increased Damage per Grand Spectrum");
        assert_eq!(
            parts,
            vec!["4% increased damage per grand spectrum", "grand spectrum"]
        );
    }

    #[test]
    fn test_preprocess_drops_empty_replacements() {
        let replacer = StatReplacer::new("nothing to see", &[]).unwrap();
        let pre = Preprocessor::new(vec![replacer], "(hidden)");
        assert!(pre.preprocess("Nothing to see").is_empty());
        assert_eq!(pre.preprocess("something (Hidden)"), vec!["something"]);
    }
}
