//! Parse results module.
//!
//! Contains [`ParsedLine`], the modifiers of one stat line together with a
//! breakdown of which matcher consumed which text, and [`ParseReport`],
//! the outcome of parsing many lines.

use crate::error::LineError;
use crate::modifier::Modifier;
use crate::step::ParsingStep;
use serde::{Deserialize, Serialize};

/// One matcher application while parsing a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub step: ParsingStep,
    /// The pattern as declared in the matcher table.
    pub pattern: String,
    /// The consumed text.
    pub matched: String,
}

/// A successfully parsed stat line.
///
/// # Examples
///
/// ```rust
/// use statline::{Form, Modifier, ParsedLine, ParsingStep};
///
/// let mut parsed = ParsedLine::new("+30 to maximum life");
/// parsed.add_match(ParsingStep::Form, r"\+#%? to", "+30 to");
/// parsed.add_match(ParsingStep::PoolStat, "maximum ({PoolMatchers})", "maximum life");
/// parsed.modifiers.push(Modifier::new(Form::BaseAdd, "Life.Maximum", 30.0));
///
/// assert_eq!(parsed.matches.len(), 2);
/// assert_eq!(parsed.modifiers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// The line as given to the parser.
    pub line: String,

    pub modifiers: Vec<Modifier>,

    /// Matches in the order they were applied, across all replacement parts.
    pub matches: Vec<MatchRecord>,
}

impl ParsedLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            modifiers: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn add_match(
        &mut self,
        step: ParsingStep,
        pattern: impl Into<String>,
        matched: impl Into<String>,
    ) {
        self.matches.push(MatchRecord {
            step,
            pattern: pattern.into(),
            matched: matched.into(),
        });
    }

    /// Steps that matched, in order, without repetitions.
    pub fn steps(&self) -> Vec<ParsingStep> {
        let mut steps: Vec<ParsingStep> = Vec::new();
        for record in &self.matches {
            if steps.last() != Some(&record.step) {
                steps.push(record.step);
            }
        }
        steps
    }
}

/// The outcome of parsing several lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Modifiers of every line that parsed, in input order.
    pub modifiers: Vec<Modifier>,

    /// Lines that did not parse, with the reason.
    pub failures: Vec<(String, LineError)>,
}

impl ParseReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: &str, result: Result<ParsedLine, LineError>) {
        match result {
            Ok(parsed) => self.modifiers.extend(parsed.modifiers),
            Err(err) => self.failures.push((line.to_string(), err)),
        }
    }

    /// Append another report.
    pub fn extend(&mut self, other: ParseReport) {
        self.modifiers.extend(other.modifiers);
        self.failures.extend(other.failures);
    }

    /// Whether every line parsed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
