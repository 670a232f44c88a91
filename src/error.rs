//! Error types.
//!
//! Errors fall into three groups:
//!
//! - [`DataError`]: problems in the matcher tables, detected once when
//!   [`ParsingData`](crate::data::ParsingData) is compiled. These are
//!   authoring bugs and abort startup.
//! - [`LineError`]: the outcome of parsing one stat line that did not
//!   produce modifiers.
//! - [`TemplateError`]: raised by matcher templates while turning captured
//!   values and references into fragments; surfaced to callers as
//!   [`LineError::Unsupported`].

use crate::step::ParsingStep;
use thiserror::Error;

/// Format a reference cycle as a readable string.
fn format_cycle_path(path: &[String]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.join(" -> ")
}

/// Errors in matcher data, detected while compiling [`ParsingData`](crate::data::ParsingData).
///
/// # Examples
///
/// ```rust
/// use statline::DataError;
///
/// let err = DataError::CyclicReference {
///     path: vec!["A".into(), "B".into(), "A".into()],
/// };
/// assert_eq!(err.to_string(), "Cyclic reference: A -> B -> A");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// An expanded pattern is not a valid regular expression.
    #[error("Invalid pattern in {collection} entry {index} ({pattern:?}): {message}")]
    PatternCompilation {
        collection: String,
        index: usize,
        pattern: String,
        message: String,
    },

    /// A `{Name}` placeholder names no referenced or referenceable collection.
    #[error("Unknown reference {{{name}}} in {collection}")]
    UnknownReference { name: String, collection: String },

    /// Reference names refer to each other in a loop.
    #[error("Cyclic reference: {}", format_cycle_path(.path))]
    CyclicReference { path: Vec<String> },

    /// Two referenced collections share a name, or a referenced collection
    /// shares its name with a stat collection.
    #[error("Reference name {0} is declared more than once")]
    DuplicateReference(String),

    /// A pattern reachable through a reference contains something it may not.
    #[error("Invalid pattern {pattern:?} in referenceable collection {name}: {reason}")]
    InvalidReferencedPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    /// A stat replacer pattern failed to compile.
    #[error("Invalid stat replacer {pattern:?}: {message}")]
    InvalidReplacer { pattern: String, message: String },
}

/// Why a single stat line produced no modifiers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineError {
    /// No entry of the step's collections matched. The stepper recovers
    /// from this by moving to the step's failure transition.
    #[error("No match in {step} for {remaining:?}")]
    NoMatch { step: ParsingStep, remaining: String },

    /// The line was recognized but the modifier cannot be represented.
    #[error("Unsupported modifier {line:?}: {reason}")]
    Unsupported { line: String, reason: String },

    /// Matching stalled with text left over. `remaining` is the normalized
    /// residual; residuals of several replacement lines are joined by `\n`.
    #[error("Could not parse {remaining:?} (stalled at {step})")]
    ResidualText { step: ParsingStep, remaining: String },
}

impl LineError {
    /// Text that was left unparsed, if any.
    pub fn remaining(&self) -> Option<&str> {
        match self {
            LineError::NoMatch { remaining, .. } | LineError::ResidualText { remaining, .. } => {
                Some(remaining)
            }
            LineError::Unsupported { .. } => None,
        }
    }
}

/// Errors raised by matcher templates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    /// The matched modifier is known but deliberately not modelled.
    #[error("{0}")]
    Unsupported(String),

    #[error("Value {index} requested but {count} captured")]
    MissingValue { index: usize, count: usize },

    #[error("Reference {index} requested but {count} captured")]
    MissingReference { index: usize, count: usize },

    #[error("Reference {index} is a {found}, expected a {expected}")]
    ReferenceKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Captured value {0:?} is not a number")]
    InvalidValue(String),

    /// Two fragments could not be combined.
    #[error("Cannot aggregate fragments: {0}")]
    Aggregation(String),

    /// The aggregated fragment lacks a form, stat or value.
    #[error("Incomplete modifier: {0}")]
    Incomplete(String),

    /// A referenced stat matcher did not produce exactly one plain stat.
    #[error("Invalid stat reference: {0}")]
    InvalidStatReference(String),
}
