//! # statline - Deterministic Stat-Line Parser
//!
//! Compiles free-text item and passive modifiers such as
//! `"30% increased Critical Strike Chance with Bows"` into structured
//! `(Form, Stat, Value, Condition)` modifiers:
//! - **Declarative** matcher tables (regex patterns with `#` value and
//!   `{Name}` reference placeholders)
//! - **Longest match** resolution within each parsing step
//! - **Validated at startup** (unknown or cyclic references, malformed
//!   patterns are errors before any line is parsed)
//! - **Immutable** compiled tables, safe to share between threads
//!
//! ## Core Concepts
//!
//! ### Parsing Pipeline
//!
//! ```text
//! [line] → [Preprocessor] → [Stepper × LongestMatchResolver] → [Fragment] → [Modifier]
//! ```
//!
//! 1. **Preprocessing** lowercases, collapses whitespace, strips the hidden
//!    marker and applies stat replacers
//! 2. **Steps** (`Special`, `StatManipulation`, `ValueConversion`,
//!    `FormAndStat`, `Keystone`, `Form`, stats, `Condition`,
//!    `ActionCondition`) each remove the text their longest match consumed
//! 3. **Fragments** produced by the matches are aggregated and built into
//!    modifiers once the line is consumed
//!
//! ## Example
//!
//! ```rust
//! use statline::*;
//!
//! let parser = Parser::new(ParsingData::new(&[]).unwrap());
//!
//! let parsed = parser.parse("adds 5 to 10 Physical Damage").unwrap();
//! assert_eq!(
//!     parsed.modifiers,
//!     vec![
//!         Modifier::new(Form::MinBaseAdd, "Physical.Damage", 5.0),
//!         Modifier::new(Form::MaxBaseAdd, "Physical.Damage", 10.0),
//!     ]
//! );
//!
//! match parser.parse("quux blorp zinger") {
//!     Err(LineError::ResidualText { step, remaining }) => {
//!         assert_eq!(step, ParsingStep::Form);
//!         assert_eq!(remaining, "quux blorp zinger");
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - Parser facade and caching parser
//! - [`data`] - Built-in matcher tables and [`ParsingData`]
//! - [`matcher`] - Declarative matcher collections
//! - [`expand`] - Placeholder expansion and compilation
//! - [`resolver`] - Longest-match resolution
//! - [`step`] - Parsing steps and the stepper
//! - [`modifier`] - Modifiers and fragments
//! - [`given`] - Given stats of characters and monsters
//! - [`error`] - Error types

pub mod condition;
pub mod config;
pub mod context;
pub mod data;
pub mod domain;
pub mod error;
pub mod expand;
pub mod given;
pub mod graph;
pub mod matcher;
pub mod modifier;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod resolved;
pub mod resolver;
pub mod stat_id;
pub mod step;
pub mod value;

// Re-export main types for convenience
pub use condition::Condition;
pub use config::ParserConfig;
pub use data::ParsingData;
pub use error::{DataError, LineError, TemplateError};
pub use modifier::{Form, Fragment, Modifier, StatConverter};
pub use parser::{CachingParser, Parser};
pub use resolved::{MatchRecord, ParseReport, ParsedLine};
pub use stat_id::StatId;
pub use step::{ParsingStep, Stepper, StepperState};
pub use value::Value;
