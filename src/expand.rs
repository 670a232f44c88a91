//! Matcher compilation.
//!
//! Expands placeholders in a collection's patterns and compiles them into
//! case-insensitive regexes:
//!
//! - `#` becomes a named value group matching a decimal number.
//! - `{Name}` becomes a non-capturing alternation of every pattern
//!   registered under `Name`, longest pattern first. Each alternative gets
//!   its own uniquely named group so the resolver can tell which one
//!   matched; nested placeholders are expanded recursively.
//! - The whole pattern is wrapped in a `matched` group, anchored to the
//!   line for whole-line collections and delimited by non-word characters
//!   (or the text ends) otherwise.
//!
//! Group names cannot repeat within one regex, so the mapping from group
//! name to meaning lives in a [`GroupTable`] next to the regex.
//!
//! The generated groups shift regex group numbers, so the pattern's own
//! capture groups are given names and `$n` in a substitution is rewritten
//! to the name of the pattern's `n`th group.

use crate::error::DataError;
use crate::matcher::{MatcherCollection, Template};
use crate::registry::{ReferenceRegistry, Target, PLACEHOLDER};
use crate::step::ParsingStep;
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;

/// Decimal number captured by `#`.
pub const VALUE_PATTERN: &str = r"\d+(?:\.\d+)?";

/// Name of the group spanning the text a matcher consumes.
pub(crate) const MATCHED_GROUP: &str = "matched";

/// Placeholder expansion of a name without alternatives; never matches.
const EMPTY_ALTERNATION: &str = r"\b\B";

/// Compiled regexes with large reference alternations exceed the default
/// size limit.
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

/// One group generated for a reference alternative.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceGroup {
    pub group: String,
    /// Index of the enclosing reference group, `None` at the top level.
    pub parent: Option<usize>,
    pub target: Target,
}

/// Meaning of the generated groups of one compiled pattern.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupTable {
    /// Value group names in placeholder order.
    pub values: Vec<String>,
    /// Reference groups; children of one parent appear in placeholder order.
    pub references: Vec<ReferenceGroup>,
    /// Names of the pattern's own capture groups, in opening order.
    pub captures: Vec<String>,
}

/// A single compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub(crate) regex: Regex,
    pub(crate) groups: GroupTable,
    pub(crate) template: TemplateHandle,
    pub(crate) substitution: Option<String>,
    pattern: String,
}

impl CompiledMatcher {
    /// The pattern as declared, before expansion.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The expanded regular expression.
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }
}

/// [`Template`] with a `Debug` impl.
#[derive(Clone)]
pub(crate) struct TemplateHandle(pub Template);

impl std::fmt::Debug for TemplateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Template(..)")
    }
}

/// A compiled [`MatcherCollection`].
#[derive(Debug, Clone)]
pub struct CompiledCollection {
    step: ParsingStep,
    matchers: Vec<CompiledMatcher>,
    whole_line: bool,
}

impl CompiledCollection {
    /// Expand and compile every entry of `collection`.
    pub fn compile(
        collection: &MatcherCollection,
        registry: &ReferenceRegistry,
    ) -> Result<Self, DataError> {
        let whole_line = collection.matches_whole_line_only();
        let expander = Expander {
            registry,
            collection: collection.step().to_string(),
        };

        let matchers = collection
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let (expanded, groups) = expander.expand(&entry.pattern)?;
                let invalid = |message: String| DataError::PatternCompilation {
                    collection: collection.step().to_string(),
                    index,
                    pattern: entry.pattern.clone(),
                    message,
                };
                let substitution = entry
                    .substitution
                    .as_deref()
                    .map(|s| rewrite_substitution(s, &groups.captures))
                    .transpose()
                    .map_err(invalid)?;
                let source = if whole_line {
                    format!("^(?P<{}>{})$", MATCHED_GROUP, expanded)
                } else if entry.delimited {
                    format!(r"(?:^|\W)(?P<{}>{})(?:\W|$)", MATCHED_GROUP, expanded)
                } else {
                    format!("(?P<{}>{})", MATCHED_GROUP, expanded)
                };
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .size_limit(REGEX_SIZE_LIMIT)
                    .build()
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(CompiledMatcher {
                    regex,
                    groups,
                    template: TemplateHandle(entry.template.clone()),
                    substitution,
                    pattern: entry.pattern.clone(),
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        Ok(Self {
            step: collection.step(),
            matchers,
            whole_line,
        })
    }

    pub fn step(&self) -> ParsingStep {
        self.step
    }

    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    pub fn matches_whole_line_only(&self) -> bool {
        self.whole_line
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

struct Expander<'r> {
    registry: &'r ReferenceRegistry,
    collection: String,
}

impl Expander<'_> {
    fn expand(&self, pattern: &str) -> Result<(String, GroupTable), DataError> {
        let mut groups = GroupTable::default();
        let mut stack = Vec::new();
        let expanded = self.expand_into(pattern, None, &mut groups, &mut stack)?;
        Ok((expanded, groups))
    }

    fn expand_into(
        &self,
        pattern: &str,
        parent: Option<usize>,
        groups: &mut GroupTable,
        stack: &mut Vec<String>,
    ) -> Result<String, DataError> {
        let mut out = String::with_capacity(pattern.len());
        let mut last = 0;
        let mut namer = GroupNamer::default();
        let mut literal = |text: &str, out: &mut String, groups: &mut GroupTable| {
            if parent.is_none() {
                out.push_str(&namer.name_groups(text, &mut groups.captures));
            } else {
                out.push_str(text);
            }
        };

        for caps in PLACEHOLDER.captures_iter(pattern) {
            let Some(whole) = caps.get(0) else { continue };
            literal(&pattern[last..whole.start()], &mut out, &mut *groups);
            last = whole.end();

            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                if pattern[..whole.start()].ends_with('\\') {
                    out.push('#');
                } else {
                    let group = format!("value{}", groups.values.len());
                    out.push_str(&format!("(?P<{}>{})", group, VALUE_PATTERN));
                    groups.values.push(group);
                }
                continue;
            };

            if stack.iter().any(|n| n == name) {
                let mut path = stack.clone();
                path.push(name.to_string());
                return Err(DataError::CyclicReference { path });
            }
            let targets = self
                .registry
                .targets(name)
                .ok_or_else(|| DataError::UnknownReference {
                    name: name.to_string(),
                    collection: self.collection.clone(),
                })?;

            if targets.is_empty() {
                out.push_str(&format!("(?:{})", EMPTY_ALTERNATION));
                continue;
            }

            let mut order: Vec<usize> = (0..targets.len()).collect();
            order.sort_by_key(|&i| Reverse(targets[i].pattern.len()));

            stack.push(name.to_string());
            let mut alternatives = Vec::with_capacity(order.len());
            for index in order {
                let group_index = groups.references.len();
                let group = format!("reference{}", group_index);
                groups.references.push(ReferenceGroup {
                    group: group.clone(),
                    parent,
                    target: targets[index].target.clone(),
                });
                let inner =
                    self.expand_into(&targets[index].pattern, Some(group_index), groups, stack)?;
                alternatives.push(format!("(?P<{}>{})", group, inner));
            }
            stack.pop();

            out.push_str("(?:");
            out.push_str(&alternatives.join("|"));
            out.push(')');
        }

        literal(&pattern[last..], &mut out, &mut *groups);
        Ok(out)
    }
}

/// Names the unnamed capture groups of a pattern's literal text.
#[derive(Default)]
struct GroupNamer {
    in_class: bool,
}

impl GroupNamer {
    fn name_groups(&mut self, text: &str, names: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    out.push(c);
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                }
                '[' if !self.in_class => {
                    self.in_class = true;
                    out.push(c);
                }
                ']' if self.in_class => {
                    self.in_class = false;
                    out.push(c);
                }
                '(' if !self.in_class => {
                    let rest = &text[i + 1..];
                    if let Some(name) = explicit_group_name(rest) {
                        names.push(name.to_string());
                        out.push(c);
                    } else if rest.starts_with('?') {
                        out.push(c);
                    } else {
                        let name = format!("group{}", names.len() + 1);
                        out.push_str(&format!("(?P<{}>", name));
                        names.push(name);
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}

/// The name of a group opened by `(?P<name>` or `(?<name>`, given the text
/// after the parenthesis.
fn explicit_group_name(rest: &str) -> Option<&str> {
    let inner = rest
        .strip_prefix("?P<")
        .or_else(|| rest.strip_prefix("?<"))?;
    let end = inner.find('>')?;
    Some(&inner[..end])
}

/// Rewrite group references in a substitution: `$n` and `${n}` refer to
/// the pattern's own `n`th group, `$0` to the whole match.
fn rewrite_substitution(substitution: &str, captures: &[String]) -> Result<String, String> {
    let mut out = String::with_capacity(substitution.len());
    let mut rest = substitution;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        let (reference, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => return Err(format!("unclosed group reference in {:?}", substitution)),
            }
        } else if after.starts_with('$') {
            out.push_str("$$");
            rest = &after[1..];
            continue;
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };
        rest = &after[consumed..];

        if reference.is_empty() {
            out.push_str("$$");
        } else if let Ok(number) = reference.parse::<usize>() {
            let name = match number {
                0 => MATCHED_GROUP,
                n => captures.get(n - 1).map(String::as_str).ok_or_else(|| {
                    format!(
                        "substitution refers to group {} but the pattern has {}",
                        n,
                        captures.len()
                    )
                })?,
            };
            out.push_str(&format!("${{{}}}", name));
        } else {
            out.push_str(&format!("${{{}}}", reference));
        }
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Reference;
    use crate::domain::Pool;
    use crate::matcher::ReferencedMatcherCollection;
    use crate::modifier::Fragment;

    fn pools() -> ReferencedMatcherCollection {
        let mut table = ReferencedMatcherCollection::new("PoolMatchers");
        table
            .add("life", Reference::Pool(Pool::Life))
            .add("energy shield", Reference::Pool(Pool::EnergyShield));
        table
    }

    fn compile_one(step: ParsingStep, pattern: &str) -> CompiledCollection {
        let mut collection = MatcherCollection::new(step);
        collection.add(pattern, |_| Ok(Fragment::empty()));
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[pools()]).unwrap();
        CompiledCollection::compile(&collection, &registry).unwrap()
    }

    #[test]
    fn test_value_expansion() {
        let compiled = compile_one(ParsingStep::Form, "adds # to #");
        let matcher = &compiled.matchers()[0];
        assert_eq!(matcher.groups.values, vec!["value0", "value1"]);
        assert!(matcher.regex().contains(r"(?P<value0>\d+(?:\.\d+)?)"));
        let caps = matcher.regex.captures("adds 1.5 to 10 fire damage").unwrap();
        assert_eq!(&caps["value0"], "1.5");
        assert_eq!(&caps["value1"], "10");
    }

    #[test]
    fn test_reference_alternatives_longest_first() {
        let compiled = compile_one(ParsingStep::PoolStat, "maximum ({PoolMatchers})");
        let matcher = &compiled.matchers()[0];
        assert_eq!(
            matcher.regex(),
            r"(?:^|\W)(?P<matched>maximum (?P<group1>(?:(?P<reference0>energy shield)|(?P<reference1>life))))(?:\W|$)"
        );
        assert_eq!(matcher.groups.captures, vec!["group1"]);
        assert_eq!(matcher.groups.references.len(), 2);
        assert!(matcher.groups.references.iter().all(|g| g.parent.is_none()));
    }

    #[test]
    fn test_whole_line_anchoring() {
        let mut collection = MatcherCollection::new(ParsingStep::Special).whole_line_only();
        collection.add("primordial", |_| Ok(Fragment::empty()));
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[]).unwrap();
        let compiled = CompiledCollection::compile(&collection, &registry).unwrap();
        let regex = &compiled.matchers()[0].regex;
        assert!(regex.is_match("Primordial"));
        assert!(!regex.is_match("primordial jewel"));
    }

    #[test]
    fn test_delimiters() {
        let compiled = compile_one(ParsingStep::GeneralStat, "armour");
        let regex = &compiled.matchers()[0].regex;
        assert!(regex.is_match("increased armour"));
        assert!(regex.is_match("armour, evasion"));
        assert!(!regex.is_match("armoured"));
    }

    #[test]
    fn test_nested_reference_parents() {
        let mut stats = MatcherCollection::new(ParsingStep::PoolStat).referenceable_as("PoolStatMatchers");
        stats.add("maximum ({PoolMatchers})", |_| Ok(Fragment::empty()));
        let mut conversions = MatcherCollection::new(ParsingStep::ValueConversion);
        conversions.add("per # ({PoolStatMatchers})", |_| Ok(Fragment::empty()));
        let collections = vec![stats, conversions];
        let registry = ReferenceRegistry::build(&collections, &[pools()]).unwrap();
        let compiled = CompiledCollection::compile(&collections[1], &registry).unwrap();
        let groups = &compiled.matchers()[0].groups;
        assert_eq!(groups.values, vec!["value0"]);
        assert_eq!(groups.references.len(), 3);
        assert_eq!(groups.references[0].parent, None);
        assert_eq!(groups.references[1].parent, Some(0));
        assert_eq!(groups.references[2].parent, Some(0));
    }

    #[test]
    fn test_empty_reference_never_matches() {
        let mut collection = MatcherCollection::new(ParsingStep::Condition);
        collection.add("with ({SkillMatchers})", |_| Ok(Fragment::empty()));
        let skills = ReferencedMatcherCollection::new("SkillMatchers");
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[skills]).unwrap();
        let compiled = CompiledCollection::compile(&collection, &registry).unwrap();
        assert!(!compiled.matchers()[0].regex.is_match("with "));
        assert!(!compiled.matchers()[0].regex.is_match("with fireball"));
    }

    #[test]
    fn test_own_groups_are_named() {
        let compiled = compile_one(
            ParsingStep::FormAndStat,
            r"(gain )?#% of ({PoolMatchers}) as (?P<kind>extra )?[(]\(x\)",
        );
        let matcher = &compiled.matchers()[0];
        assert_eq!(matcher.groups.captures, vec!["group1", "group2", "kind"]);
        assert!(matcher.regex().contains(r"[(]\(x\)"));
    }

    #[test]
    fn test_nested_groups_are_not_named() {
        let mut stats = MatcherCollection::new(ParsingStep::PoolStat).referenceable_as("PoolStatMatchers");
        stats.add("(maximum )?({PoolMatchers})", |_| Ok(Fragment::empty()));
        let mut conversions = MatcherCollection::new(ParsingStep::ValueConversion);
        conversions.add("per # ({PoolStatMatchers})", |_| Ok(Fragment::empty()));
        let collections = vec![stats, conversions];
        let registry = ReferenceRegistry::build(&collections, &[pools()]).unwrap();
        let compiled = CompiledCollection::compile(&collections[1], &registry).unwrap();
        assert_eq!(compiled.matchers()[0].groups.captures, vec!["group1"]);
    }

    #[test]
    fn test_numbered_substitution_is_rewritten() {
        let mut collection = MatcherCollection::new(ParsingStep::FormAndStat);
        collection.add_substituting("(fire|cold) (with .*) takes #%", "$2 and ${1}, $0 $$5", |_| {
            Ok(Fragment::empty())
        });
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[]).unwrap();
        let compiled = CompiledCollection::compile(&collection, &registry).unwrap();
        let matcher = &compiled.matchers()[0];
        assert_eq!(
            matcher.substitution.as_deref(),
            Some("${group2} and ${group1}, ${matched} $$5")
        );

        let caps = matcher.regex.captures("fire with bows takes 5%").unwrap();
        let mut out = String::new();
        caps.expand(matcher.substitution.as_deref().unwrap(), &mut out);
        assert_eq!(out, "with bows and fire, fire with bows takes 5% $5");
    }

    #[test]
    fn test_substitution_of_missing_group_fails() {
        let mut collection = MatcherCollection::new(ParsingStep::FormAndStat);
        collection.add_substituting("(fire) damage", "$2", |_| Ok(Fragment::empty()));
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[]).unwrap();
        let err = CompiledCollection::compile(&collection, &registry).unwrap_err();
        assert!(matches!(err, DataError::PatternCompilation { index: 0, .. }));
        assert!(err.to_string().contains("group 2"), "{}", err);
    }

    #[test]
    fn test_invalid_pattern() {
        let mut collection = MatcherCollection::new(ParsingStep::Form);
        collection.add("(unclosed", |_| Ok(Fragment::empty()));
        let registry = ReferenceRegistry::build(std::slice::from_ref(&collection), &[]).unwrap();
        let err = CompiledCollection::compile(&collection, &registry).unwrap_err();
        assert!(matches!(err, DataError::PatternCompilation { index: 0, .. }));
    }
}
