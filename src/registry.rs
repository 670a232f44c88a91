//! Reference registry.
//!
//! Collects every referenceable pattern under its reference name and checks
//! the rules that make placeholder expansion well defined:
//!
//! - referenced tables have unique names and no placeholders,
//! - referenceable stat patterns capture no values,
//! - a name is used by referenced tables or by stat collections, not both,
//! - every `{Name}` used anywhere is registered,
//! - names do not reference each other in a cycle.

use crate::context::Reference;
use crate::error::DataError;
use crate::graph::ReferenceGraph;
use crate::matcher::{MatcherCollection, ReferencedMatcherCollection, Template};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// `#` or `{Name}`; names start with a letter so `{2}` and `{1,3}` stay
/// regex quantifiers.
pub(crate) static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#|\{([A-Za-z][A-Za-z0-9_]*)\}").expect("placeholder regex is valid"));

/// Reference names used by a pattern, in order of appearance.
pub(crate) fn referenced_names(pattern: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(pattern)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Whether a pattern contains an unescaped `#` value placeholder.
pub(crate) fn has_value_placeholder(pattern: &str) -> bool {
    PLACEHOLDER.find_iter(pattern).any(|m| {
        m.as_str() == "#" && !pattern[..m.start()].ends_with('\\')
    })
}

/// What a matched alternative resolves to.
#[derive(Clone)]
pub(crate) enum Target {
    /// A fixed typed reference from a referenced table.
    Fixed(Reference),
    /// A stat matcher whose template runs on the nested captures.
    Matcher(Template),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Fixed(reference) => f.debug_tuple("Fixed").field(reference).finish(),
            Target::Matcher(_) => f.write_str("Matcher(..)"),
        }
    }
}

/// One alternative registered under a reference name.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceTarget {
    pub pattern: String,
    pub target: Target,
}

/// Validated mapping from reference names to their alternatives.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    targets: HashMap<String, Vec<ReferenceTarget>>,
}

impl ReferenceRegistry {
    /// Build and validate the registry.
    pub fn build(
        collections: &[MatcherCollection],
        referenced: &[ReferencedMatcherCollection],
    ) -> Result<Self, DataError> {
        let mut targets: HashMap<String, Vec<ReferenceTarget>> = HashMap::new();
        let mut graph = ReferenceGraph::new();

        for table in referenced {
            if targets.contains_key(table.name()) {
                return Err(DataError::DuplicateReference(table.name().to_string()));
            }
            let mut alternatives = Vec::with_capacity(table.len());
            for (pattern, reference) in table.entries() {
                if has_value_placeholder(pattern) {
                    return Err(invalid(table.name(), pattern, "contains a value placeholder"));
                }
                if referenced_names(pattern).next().is_some() {
                    return Err(invalid(table.name(), pattern, "contains a reference placeholder"));
                }
                alternatives.push(ReferenceTarget {
                    pattern: pattern.clone(),
                    target: Target::Fixed(reference.clone()),
                });
            }
            graph.add_node(table.name());
            targets.insert(table.name().to_string(), alternatives);
        }

        let fixed_names: Vec<String> = targets.keys().cloned().collect();
        for collection in collections {
            for name in collection.reference_names() {
                if fixed_names.contains(name) {
                    return Err(DataError::DuplicateReference(name.clone()));
                }
                graph.add_node(name);
                for entry in collection.entries() {
                    if has_value_placeholder(&entry.pattern) {
                        return Err(invalid(name, &entry.pattern, "contains a value placeholder"));
                    }
                    for used in referenced_names(&entry.pattern) {
                        graph.add_edge(name, used);
                    }
                    targets.entry(name.clone()).or_default().push(ReferenceTarget {
                        pattern: entry.pattern.clone(),
                        target: Target::Matcher(entry.template.clone()),
                    });
                }
            }
        }

        for collection in collections {
            for entry in collection.entries() {
                for used in referenced_names(&entry.pattern) {
                    if !targets.contains_key(used) {
                        return Err(DataError::UnknownReference {
                            name: used.to_string(),
                            collection: collection.step().to_string(),
                        });
                    }
                }
            }
        }

        graph.detect_cycles()?;

        Ok(Self { targets })
    }

    pub(crate) fn targets(&self, name: &str) -> Option<&[ReferenceTarget]> {
        self.targets.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Registered reference names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of alternatives registered under `name`.
    pub fn alternative_count(&self, name: &str) -> usize {
        self.targets.get(name).map_or(0, Vec::len)
    }
}

fn invalid(name: &str, pattern: &str, reason: &str) -> DataError {
    DataError::InvalidReferencedPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
