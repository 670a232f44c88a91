//! Longest-match resolver.
//!
//! Given the compiled collections of one parsing step and the text left of
//! a stat line, finds the matcher that consumes the most text, evaluates
//! its template on the captured values and references, and returns the
//! text with the match removed (or substituted).

use crate::context::{MatchContext, Reference};
use crate::error::{LineError, TemplateError};
use crate::expand::{CompiledCollection, CompiledMatcher, GroupTable, MATCHED_GROUP};
use crate::modifier::Fragment;
use crate::normalize::collapse_whitespace;
use crate::registry::Target;
use crate::step::ParsingStep;
use crate::value::Value;
use regex::Captures;

/// The outcome of one successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Step of the collection the winning matcher belongs to.
    pub step: ParsingStep,
    /// The winning matcher's declared pattern.
    pub pattern: String,
    /// The consumed text.
    pub matched: String,
    /// The text after removal or substitution, whitespace collapsed.
    pub remaining: String,
    pub fragment: Fragment,
}

/// Resolves text against the union of several collections.
///
/// Every matcher is tried; the one whose `matched` span is longest wins.
/// Ties go to the matcher declared first (collections in the order given,
/// entries in declaration order). A matcher competes with its leftmost
/// non-empty match; zero-width matches never win.
#[derive(Debug)]
pub struct LongestMatchResolver<'a> {
    step: ParsingStep,
    collections: Vec<&'a CompiledCollection>,
}

struct Candidate<'a, 't> {
    collection: &'a CompiledCollection,
    matcher: &'a CompiledMatcher,
    captures: Captures<'t>,
    start: usize,
    end: usize,
}

impl<'a> LongestMatchResolver<'a> {
    pub fn new(step: ParsingStep, collections: Vec<&'a CompiledCollection>) -> Self {
        Self { step, collections }
    }

    pub fn step(&self) -> ParsingStep {
        self.step
    }

    /// Match `text` once.
    ///
    /// Returns [`LineError::NoMatch`] if nothing matched and
    /// [`LineError::Unsupported`] if the winning template failed.
    pub fn resolve(&self, text: &str) -> Result<Resolution, LineError> {
        let candidate = self.best_candidate(text).ok_or_else(|| LineError::NoMatch {
            step: self.step,
            remaining: text.to_string(),
        })?;

        let unsupported = |e: TemplateError| LineError::Unsupported {
            line: text.to_string(),
            reason: e.to_string(),
        };
        let context = build_context(&candidate.captures, &candidate.matcher.groups, None)
            .map_err(unsupported)?;
        let fragment = (candidate.matcher.template.0)(&context).map_err(unsupported)?;

        let mut remaining = String::with_capacity(text.len());
        remaining.push_str(&text[..candidate.start]);
        remaining.push(' ');
        if let Some(substitution) = &candidate.matcher.substitution {
            candidate.captures.expand(substitution, &mut remaining);
            remaining.push(' ');
        }
        remaining.push_str(&text[candidate.end..]);

        let matched = text[candidate.start..candidate.end].to_string();
        log::trace!(
            "{} matched {:?} with {:?}",
            candidate.collection.step(),
            matched,
            candidate.matcher.pattern()
        );

        Ok(Resolution {
            step: candidate.collection.step(),
            pattern: candidate.matcher.pattern().to_string(),
            matched,
            remaining: collapse_whitespace(&remaining),
            fragment,
        })
    }

    fn best_candidate<'t>(&self, text: &'t str) -> Option<Candidate<'a, 't>> {
        let mut best: Option<Candidate<'a, 't>> = None;
        for &collection in &self.collections {
            for matcher in collection.matchers() {
                let found = matcher.regex.captures_iter(text).find_map(|captures| {
                    let span = captures.name(MATCHED_GROUP).filter(|m| !m.is_empty())?;
                    Some((span, captures))
                });
                let Some((span, captures)) = found else {
                    continue;
                };
                let longer = best
                    .as_ref()
                    .map_or(true, |b| span.len() > b.end - b.start);
                if longer {
                    best = Some(Candidate {
                        collection,
                        matcher,
                        start: span.start(),
                        end: span.end(),
                        captures,
                    });
                }
            }
        }
        best
    }
}

/// Collect the values and references of one nesting level.
///
/// Values exist only at the top level. A reference to a stat matcher runs
/// that matcher's template on its own nested captures and must produce a
/// single plain stat.
fn build_context(
    captures: &Captures<'_>,
    groups: &GroupTable,
    parent: Option<usize>,
) -> Result<MatchContext, TemplateError> {
    let mut values = Vec::new();
    if parent.is_none() {
        for name in &groups.values {
            if let Some(m) = captures.name(name) {
                let parsed: f64 = m
                    .as_str()
                    .parse()
                    .map_err(|_| TemplateError::InvalidValue(m.as_str().to_string()))?;
                values.push(Value::Const(parsed));
            }
        }
    }

    let mut references = Vec::new();
    for (index, group) in groups.references.iter().enumerate() {
        if group.parent != parent || captures.name(&group.group).is_none() {
            continue;
        }
        let reference = match &group.target {
            Target::Fixed(reference) => reference.clone(),
            Target::Matcher(template) => {
                let nested = build_context(captures, groups, Some(index))?;
                Reference::Stat(template(&nested)?.into_stat_reference()?)
            }
        };
        references.push(reference);
    }

    Ok(MatchContext::new(values, references))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::domain::{DamageType, Keyword, Pool};
    use crate::matcher::{MatcherCollection, ReferencedMatcherCollection};
    use crate::modifier::Form;
    use crate::registry::ReferenceRegistry;
    use crate::stat_id::StatId;

    fn damage_types() -> ReferencedMatcherCollection {
        let mut table = ReferencedMatcherCollection::new("DamageTypeMatchers");
        table
            .add("fire", Reference::DamageType(DamageType::Fire))
            .add("physical", Reference::DamageType(DamageType::Physical));
        table
    }

    fn compile(collections: &[MatcherCollection]) -> Vec<CompiledCollection> {
        let registry = ReferenceRegistry::build(collections, &[damage_types()]).unwrap();
        collections
            .iter()
            .map(|c| CompiledCollection::compile(c, &registry).unwrap())
            .collect()
    }

    #[test]
    fn test_longest_match_beats_declaration_order() {
        let mut stats = MatcherCollection::new(ParsingStep::GeneralStat);
        stats
            .add_fixed("damage", Fragment::stat("Damage"))
            .add_fixed("physical damage reduction", Fragment::stat("Physical.Resistance"));
        let compiled = compile(&[stats]);
        let resolver = LongestMatchResolver::new(ParsingStep::GeneralStat, compiled.iter().collect());

        let resolution = resolver.resolve("4% additional physical damage reduction").unwrap();
        assert_eq!(resolution.matched, "physical damage reduction");
        assert_eq!(resolution.remaining, "4% additional");
        assert_eq!(resolution.fragment, Fragment::stat("Physical.Resistance"));
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let mut first = MatcherCollection::new(ParsingStep::GeneralStat);
        first.add_fixed("armour", Fragment::stat("Armour"));
        let mut second = MatcherCollection::new(ParsingStep::DamageStat);
        second.add_fixed("armour", Fragment::stat("Other"));
        let compiled = compile(&[first, second]);
        let resolver = LongestMatchResolver::new(ParsingStep::GeneralStat, compiled.iter().collect());

        let resolution = resolver.resolve("armour").unwrap();
        assert_eq!(resolution.step, ParsingStep::GeneralStat);
        assert_eq!(resolution.fragment, Fragment::stat("Armour"));
        assert_eq!(resolution.remaining, "");
    }

    #[test]
    fn test_no_match() {
        let mut forms = MatcherCollection::new(ParsingStep::Form);
        forms.add("#% increased", |m| Ok(Fragment::form(Form::PercentIncrease, m.value()?)));
        let compiled = compile(&[forms]);
        let resolver = LongestMatchResolver::new(ParsingStep::Form, compiled.iter().collect());
        assert_eq!(
            resolver.resolve("quux blorp"),
            Err(LineError::NoMatch {
                step: ParsingStep::Form,
                remaining: "quux blorp".into()
            })
        );
    }

    #[test]
    fn test_values_and_references_reach_template() {
        let mut forms = MatcherCollection::new(ParsingStep::FormAndStat);
        forms.add("adds # to # ({DamageTypeMatchers}) damage", |m| {
            let stat = m.damage_type(0)?.damage();
            Ok(Fragment::modifiers([
                (Form::MinBaseAdd, m.values(0)?, stat.clone()),
                (Form::MaxBaseAdd, m.values(1)?, stat),
            ]))
        });
        let compiled = compile(&[forms]);
        let resolver = LongestMatchResolver::new(ParsingStep::FormAndStat, compiled.iter().collect());

        let resolution = resolver.resolve("adds 3 to 7 fire damage to attacks").unwrap();
        assert_eq!(resolution.remaining, "to attacks");
        let modifiers = resolution.fragment.build().unwrap();
        assert_eq!(modifiers[0].stat, StatId::from("Fire.Damage"));
        assert_eq!(modifiers[0].value, Value::Const(3.0));
        assert_eq!(modifiers[1].value, Value::Const(7.0));
    }

    #[test]
    fn test_nested_stat_reference() {
        let mut stats = MatcherCollection::new(ParsingStep::DamageStat).referenceable_as("DamageStatMatchers");
        stats.add("attack ({DamageTypeMatchers}) damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()).with_condition(Condition::With(Keyword::Attack)))
        });
        let mut leech = MatcherCollection::new(ParsingStep::FormAndStat);
        leech.add("#% of ({DamageStatMatchers}) leeched as life", |m| {
            let reference = m.stat(0)?;
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, Pool::Life.leech_of(&reference.stat))
                .with_condition(reference.condition))
        });
        let compiled = compile(&[stats, leech]);
        let resolver = LongestMatchResolver::new(ParsingStep::FormAndStat, vec![&compiled[1]]);

        let resolution = resolver.resolve("0.5% of attack physical damage leeched as life").unwrap();
        let modifiers = resolution.fragment.build().unwrap();
        assert_eq!(modifiers[0].stat.as_str(), "Life.Leech.Of.Physical.Damage");
        assert_eq!(modifiers[0].value, Value::Const(0.5));
        assert_eq!(modifiers[0].condition, Condition::With(Keyword::Attack));
    }

    #[test]
    fn test_substitution() {
        let mut pen = MatcherCollection::new(ParsingStep::FormAndStat);
        pen.add_substituting(
            "damage (?P<inner>with .*) penetrates #% ({DamageTypeMatchers}) resistance",
            "${inner}",
            |m| Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.damage_type(0)?.penetration())),
        );
        let compiled = compile(&[pen]);
        let resolver = LongestMatchResolver::new(ParsingStep::FormAndStat, compiled.iter().collect());

        let resolution = resolver
            .resolve("damage with bows penetrates 10% fire resistance")
            .unwrap();
        assert_eq!(resolution.remaining, "with bows");
        let modifiers = resolution.fragment.build().unwrap();
        assert_eq!(modifiers[0].stat.as_str(), "Fire.Penetration");
    }

    #[test]
    fn test_numbered_substitution() {
        let mut pen = MatcherCollection::new(ParsingStep::FormAndStat);
        pen.add_substituting(
            "damage (with .*) penetrates #% ({DamageTypeMatchers}) resistance",
            "$1",
            |m| Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.damage_type(0)?.penetration())),
        );
        let compiled = compile(&[pen]);
        let resolver = LongestMatchResolver::new(ParsingStep::FormAndStat, compiled.iter().collect());

        let resolution = resolver
            .resolve("damage with bows penetrates 10% fire resistance")
            .unwrap();
        assert_eq!(resolution.remaining, "with bows");
        assert_eq!(resolution.fragment.build().unwrap()[0].stat.as_str(), "Fire.Penetration");
    }

    #[test]
    fn test_zero_width_matches_are_skipped() {
        let mut stats = MatcherCollection::new(ParsingStep::GeneralStat);
        stats.add_undelimited("(fire )?", |_| Ok(Fragment::stat("Fire")));
        let compiled = compile(&[stats]);
        let resolver = LongestMatchResolver::new(ParsingStep::GeneralStat, compiled.iter().collect());

        assert!(matches!(
            resolver.resolve("cold damage"),
            Err(LineError::NoMatch { .. })
        ));

        // the leftmost match is empty, a later one is not
        let resolution = resolver.resolve("cold fire damage").unwrap();
        assert_eq!(resolution.matched, "fire ");
        assert_eq!(resolution.remaining, "cold damage");
    }

    #[test]
    fn test_template_error_is_unsupported() {
        let mut special = MatcherCollection::new(ParsingStep::Special).whole_line_only();
        special.add("socketed gems are supported by level # .+", |_| {
            Err(TemplateError::Unsupported("support gems are not modifiers".into()))
        });
        let compiled = compile(&[special]);
        let resolver = LongestMatchResolver::new(ParsingStep::Special, compiled.iter().collect());

        let err = resolver
            .resolve("socketed gems are supported by level 20 faster attacks")
            .unwrap_err();
        assert!(matches!(err, LineError::Unsupported { .. }));
    }
}
