//! Declarative matcher collections.
//!
//! Matcher tables are written as plain data: a regex pattern with `#`
//! value placeholders and `{Name}` reference placeholders, paired with a
//! template that turns the captured [`MatchContext`] into a [`Fragment`].
//! Collections are inert until [`ParsingData`](crate::data::ParsingData)
//! validates and compiles them; after that they are never mutated.
//!
//! # Examples
//!
//! ```rust
//! use statline::matcher::MatcherCollection;
//! use statline::{Form, Fragment, ParsingStep};
//!
//! let mut forms = MatcherCollection::new(ParsingStep::Form);
//! forms
//!     .add("#% increased", |m| Ok(Fragment::form(Form::PercentIncrease, m.value()?)))
//!     .add("#% reduced", |m| Ok(Fragment::form(Form::PercentReduce, m.value()?)));
//! assert_eq!(forms.len(), 2);
//! ```

use crate::context::{MatchContext, Reference};
use crate::error::TemplateError;
use crate::modifier::Fragment;
use crate::step::ParsingStep;
use std::fmt;
use std::sync::Arc;

/// Turns captured values and references into a fragment.
pub type Template = Arc<dyn Fn(&MatchContext) -> Result<Fragment, TemplateError> + Send + Sync>;

/// One pattern of a [`MatcherCollection`].
#[derive(Clone)]
pub struct MatcherEntry {
    pub pattern: String,
    pub template: Template,
    /// Replaces the matched text instead of removing it. Uses regex
    /// replacement syntax (`$1`, `${name}`) over the entry's own groups.
    pub substitution: Option<String>,
    /// Whether the match must be delimited by non-word characters or the
    /// ends of the text.
    pub delimited: bool,
}

impl fmt::Debug for MatcherEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherEntry")
            .field("pattern", &self.pattern)
            .field("substitution", &self.substitution)
            .field("delimited", &self.delimited)
            .finish_non_exhaustive()
    }
}

/// An ordered collection of matchers for one [`ParsingStep`].
#[derive(Debug, Clone)]
pub struct MatcherCollection {
    step: ParsingStep,
    entries: Vec<MatcherEntry>,
    reference_names: Vec<String>,
    whole_line_only: bool,
}

impl MatcherCollection {
    pub fn new(step: ParsingStep) -> Self {
        Self {
            step,
            entries: Vec::new(),
            reference_names: Vec::new(),
            whole_line_only: false,
        }
    }

    /// Make the collection's entries available as `{name}` in other patterns.
    pub fn referenceable_as(mut self, name: impl Into<String>) -> Self {
        self.reference_names.push(name.into());
        self
    }

    /// Entries only match when they cover the whole line.
    pub fn whole_line_only(mut self) -> Self {
        self.whole_line_only = true;
        self
    }

    pub fn add<F>(&mut self, pattern: &str, template: F) -> &mut Self
    where
        F: Fn(&MatchContext) -> Result<Fragment, TemplateError> + Send + Sync + 'static,
    {
        self.push(pattern, None, true, Arc::new(template))
    }

    /// Add an entry whose matched text is replaced by `substitution`.
    pub fn add_substituting<F>(&mut self, pattern: &str, substitution: &str, template: F) -> &mut Self
    where
        F: Fn(&MatchContext) -> Result<Fragment, TemplateError> + Send + Sync + 'static,
    {
        self.push(pattern, Some(substitution.to_string()), true, Arc::new(template))
    }

    /// Add an entry that may match inside words.
    pub fn add_undelimited<F>(&mut self, pattern: &str, template: F) -> &mut Self
    where
        F: Fn(&MatchContext) -> Result<Fragment, TemplateError> + Send + Sync + 'static,
    {
        self.push(pattern, None, false, Arc::new(template))
    }

    /// Add an entry whose fragment does not depend on captures.
    pub fn add_fixed(&mut self, pattern: &str, fragment: Fragment) -> &mut Self {
        self.add(pattern, move |_| Ok(fragment.clone()))
    }

    fn push(
        &mut self,
        pattern: &str,
        substitution: Option<String>,
        delimited: bool,
        template: Template,
    ) -> &mut Self {
        self.entries.push(MatcherEntry {
            pattern: pattern.to_string(),
            template,
            substitution,
            delimited,
        });
        self
    }

    pub fn step(&self) -> ParsingStep {
        self.step
    }

    pub fn entries(&self) -> &[MatcherEntry] {
        &self.entries
    }

    pub fn reference_names(&self) -> &[String] {
        &self.reference_names
    }

    pub fn matches_whole_line_only(&self) -> bool {
        self.whole_line_only
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named table mapping patterns to fixed typed references, e.g.
/// `DamageTypeMatchers`: "fire" → `DamageType::Fire`.
///
/// Patterns may not contain `#` or `{Name}` placeholders.
#[derive(Debug, Clone)]
pub struct ReferencedMatcherCollection {
    name: String,
    entries: Vec<(String, Reference)>,
}

impl ReferencedMatcherCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, pattern: &str, reference: Reference) -> &mut Self {
        self.entries.push((pattern.to_string(), reference));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, Reference)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
