//! Stat line parser.
//!
//! The [`Parser`] runs a stat line through preprocessing and then drives the
//! [`Stepper`] over the compiled matcher collections, resolving the longest
//! match of each step until the line is consumed.

use crate::config::ParserConfig;
use crate::data::ParsingData;
use crate::error::LineError;
use crate::given::GivenStats;
use crate::modifier::Fragment;
use crate::normalize::{is_blank, Preprocessor};
use crate::resolved::{ParseReport, ParsedLine};
use crate::resolver::LongestMatchResolver;
use crate::step::{ParsingStep, Stepper, StepperState};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Parses stat lines into modifiers.
///
/// A parser holds no per-line state, so `&Parser` can be shared freely.
///
/// # Examples
///
/// ```rust
/// use statline::{Form, Parser, ParsingData};
///
/// let parser = Parser::new(ParsingData::new(&[]).unwrap());
///
/// let parsed = parser.parse("30% increased Critical Strike Chance").unwrap();
/// assert_eq!(parsed.modifiers.len(), 1);
/// assert_eq!(parsed.modifiers[0].form, Form::PercentIncrease);
/// assert_eq!(parsed.modifiers[0].stat.as_str(), "CriticalStrike.Chance");
///
/// assert!(parser.parse("quux blorp zinger").is_err());
/// ```
#[derive(Debug)]
pub struct Parser {
    data: ParsingData,
    preprocessor: Preprocessor,
    stepper: Stepper,
    config: ParserConfig,
}

impl Parser {
    pub fn new(data: ParsingData) -> Self {
        Self::with_config(data, ParserConfig::default())
    }

    pub fn with_config(data: ParsingData, config: ParserConfig) -> Self {
        let preprocessor = Preprocessor::new(data.replacers().to_vec(), config.hidden_marker.as_str());
        Self {
            data,
            preprocessor,
            stepper: Stepper::new(),
            config,
        }
    }

    pub fn data(&self) -> &ParsingData {
        &self.data
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one stat line.
    ///
    /// A line that stat replacers split into several lines succeeds only
    /// if every part does; the residual texts of failing parts are joined
    /// with newlines.
    ///
    /// # Errors
    ///
    /// - [`LineError::Unsupported`] if a matcher recognized but declined
    ///   the line, or its fragments did not form complete modifiers
    /// - [`LineError::ResidualText`] if text is left that no step consumes
    pub fn parse(&self, line: &str) -> Result<ParsedLine, LineError> {
        let mut parsed = ParsedLine::new(line);
        let mut stalled: Option<ParsingStep> = None;
        let mut residuals = Vec::new();

        for part in self.preprocessor.preprocess(line) {
            if is_blank(&part, self.preprocessor.hidden_marker()) {
                continue;
            }
            match self.parse_part(&part, &mut parsed) {
                Ok(()) => {}
                Err(LineError::ResidualText { step, remaining }) => {
                    stalled.get_or_insert(step);
                    residuals.push(remaining);
                }
                Err(LineError::Unsupported { reason, .. }) => {
                    log::error!("unsupported modifier {:?}: {}", line, reason);
                    return Err(LineError::Unsupported {
                        line: line.to_string(),
                        reason,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        match stalled {
            Some(step) => {
                let err = LineError::ResidualText {
                    step,
                    remaining: residuals.join("\n"),
                };
                if self.config.log_failures {
                    log::debug!("failed to parse {:?}: {}", line, err);
                }
                Err(err)
            }
            None => Ok(parsed),
        }
    }

    fn parse_part(&self, text: &str, parsed: &mut ParsedLine) -> Result<(), LineError> {
        let mut remaining = text.to_string();
        let mut fragments = Vec::new();
        let mut state = self.stepper.initial();
        let mut last_step = ParsingStep::Special;

        while let StepperState::At(step) = state {
            last_step = step;
            let matched = self.run_step(step, &mut remaining, &mut fragments, parsed)?;
            state = self.stepper.next(step, matched);
        }

        if let StepperState::Failed(step) = state {
            return Err(LineError::ResidualText { step, remaining });
        }
        if !is_blank(&remaining, self.preprocessor.hidden_marker()) {
            return Err(LineError::ResidualText {
                step: last_step,
                remaining,
            });
        }

        let modifiers = Fragment::aggregate(fragments)
            .and_then(Fragment::build)
            .map_err(|e| LineError::Unsupported {
                line: text.to_string(),
                reason: e.to_string(),
            })?;
        parsed.modifiers.extend(modifiers);
        Ok(())
    }

    /// Resolve `step` against `remaining` as often as the stepper allows.
    /// Returns whether it matched at least once.
    fn run_step(
        &self,
        step: ParsingStep,
        remaining: &mut String,
        fragments: &mut Vec<Fragment>,
        parsed: &mut ParsedLine,
    ) -> Result<bool, LineError> {
        let limit = if self.stepper.repeats(step) {
            self.config.max_step_repetitions.max(1)
        } else {
            1
        };
        let resolver = LongestMatchResolver::new(step, self.data.collections_for(step));

        let mut matched = false;
        for _ in 0..limit {
            if remaining.is_empty() {
                break;
            }
            let resolution = match resolver.resolve(remaining) {
                Ok(resolution) => resolution,
                Err(LineError::NoMatch { .. }) => break,
                Err(err) => return Err(err),
            };
            let progressed = resolution.remaining.len() < remaining.len();
            parsed.add_match(resolution.step, resolution.pattern, resolution.matched);
            fragments.push(resolution.fragment);
            *remaining = resolution.remaining;
            matched = true;
            if !progressed {
                break;
            }
        }
        Ok(matched)
    }

    /// Parse several lines, collecting failures instead of stopping.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ParseReport::new();
        for line in lines {
            let line = line.as_ref();
            report.record(line, self.parse(line));
        }
        report
    }

    /// Like [`Parser::parse_lines`], parsing lines on the rayon thread pool.
    /// Results keep input order.
    #[cfg(feature = "parallel")]
    pub fn parse_lines_parallel<S>(&self, lines: &[S]) -> ParseReport
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<_> = lines
            .par_iter()
            .map(|line| self.parse(line.as_ref()))
            .collect();

        let mut report = ParseReport::new();
        for (line, result) in lines.iter().zip(results) {
            report.record(line.as_ref(), result);
        }
        report
    }

    /// Parse the given stat lines of `given` and append its fixed modifiers.
    pub fn parse_given(&self, given: &dyn GivenStats) -> ParseReport {
        let mut report = self.parse_lines(given.given_stat_lines().iter().copied());
        report.modifiers.extend(
            given
                .given_modifiers()
                .into_iter()
                .map(|entry| entry.into_modifier()),
        );
        report
    }
}

/// A [`Parser`] that remembers the result of every line it parsed.
///
/// Items share many stat lines, so repeated lines are answered from the
/// cache. The cache sits behind a lock and one instance can serve several
/// threads, including [`CachingParser::parse_lines_parallel`].
///
/// # Examples
///
/// ```rust
/// use statline::{CachingParser, Parser, ParsingData};
///
/// let parser = Parser::new(ParsingData::new(&[]).unwrap());
/// let cache = CachingParser::new(&parser);
///
/// let first = cache.parse("+30 to maximum Life");
/// let second = cache.parse("+30 to maximum Life");
/// assert_eq!(first, second);
/// assert_eq!(cache.cached_len(), 1);
/// ```
#[derive(Debug)]
pub struct CachingParser<'p> {
    parser: &'p Parser,
    cache: RwLock<Cache>,
}

type Cache = HashMap<String, Result<ParsedLine, LineError>>;

impl<'p> CachingParser<'p> {
    pub fn new(parser: &'p Parser) -> Self {
        Self {
            parser,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn parser(&self) -> &'p Parser {
        self.parser
    }

    // A panic while holding the lock cannot leave a half-written entry.
    fn read(&self) -> RwLockReadGuard<'_, Cache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn parse(&self, line: &str) -> Result<ParsedLine, LineError> {
        let cached = self.read().get(line).cloned();
        if let Some(cached) = cached {
            return cached;
        }
        let result = self.parser.parse(line);
        self.write().insert(line.to_string(), result.clone());
        result
    }

    /// Like [`Parser::parse_lines`], answering repeated lines from the cache.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ParseReport::new();
        for line in lines {
            let line = line.as_ref();
            report.record(line, self.parse(line));
        }
        report
    }

    /// Like [`Parser::parse_lines_parallel`], sharing this cache between
    /// the rayon workers.
    #[cfg(feature = "parallel")]
    pub fn parse_lines_parallel<S>(&self, lines: &[S]) -> ParseReport
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<_> = lines
            .par_iter()
            .map(|line| self.parse(line.as_ref()))
            .collect();

        let mut report = ParseReport::new();
        for (line, result) in lines.iter().zip(results) {
            report.record(line.as_ref(), result);
        }
        report
    }

    /// Forget the cached result of `line`.
    pub fn invalidate(&self, line: &str) {
        self.write().remove(line);
    }

    pub fn invalidate_all(&self) {
        self.write().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::context::Reference;
    use crate::domain::{DamageType, Keyword};
    use crate::matcher::{MatcherCollection, ReferencedMatcherCollection};
    use crate::modifier::Form;
    use crate::normalize::StatReplacer;
    use crate::value::Value;

    /// A small table set: enough to exercise every stepper path.
    fn small_parser(config: ParserConfig) -> Parser {
        let mut damage_types = ReferencedMatcherCollection::new("DamageTypeMatchers");
        damage_types
            .add("fire", Reference::DamageType(DamageType::Fire))
            .add("cold", Reference::DamageType(DamageType::Cold));

        let mut special = MatcherCollection::new(ParsingStep::Special).whole_line_only();
        special.add_fixed("primordial", Fragment::modifier(Form::BaseAdd, 1.0, "Primordial"));

        let mut forms = MatcherCollection::new(ParsingStep::Form);
        forms.add("#% increased", |m| Ok(Fragment::form(Form::PercentIncrease, m.value()?)));

        let mut form_and_stat = MatcherCollection::new(ParsingStep::FormAndStat);
        form_and_stat.add("#% chance to explode", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Explode.Chance"))
        });

        let mut stats = MatcherCollection::new(ParsingStep::DamageStat);
        stats
            .add_fixed("damage", Fragment::stat("Damage"))
            .add("({DamageTypeMatchers}) damage", |m| {
                Ok(Fragment::stat(m.damage_type(0)?.damage()))
            });

        let mut conditions = MatcherCollection::new(ParsingStep::Condition);
        conditions
            .add_fixed("with attacks", Fragment::condition(Condition::With(Keyword::Attack)))
            .add_fixed("while on low life", Fragment::condition(Condition::state("Life.IsLow")));

        let replacers = vec![StatReplacer::new("(.+) and (.+)", &["$1", "$2"]).unwrap()];
        let data = ParsingData::from_parts(
            vec![special, forms, form_and_stat, stats, conditions],
            vec![damage_types],
            replacers,
        )
        .unwrap();
        Parser::with_config(data, config)
    }

    #[test]
    fn test_form_stat_condition() {
        let parser = small_parser(ParserConfig::default());
        let parsed = parser
            .parse("10% increased Fire Damage with Attacks while on Low Life")
            .unwrap();
        assert_eq!(parsed.modifiers.len(), 1);
        let modifier = &parsed.modifiers[0];
        assert_eq!(modifier.stat.as_str(), "Fire.Damage");
        assert_eq!(modifier.value, Value::Const(10.0));
        assert!(matches!(&modifier.condition, Condition::And(c) if c.len() == 2));
        assert_eq!(
            parsed.steps(),
            vec![ParsingStep::Form, ParsingStep::DamageStat, ParsingStep::Condition]
        );
    }

    #[test]
    fn test_special_line() {
        let parser = small_parser(ParserConfig::default());
        let parsed = parser.parse("Primordial").unwrap();
        assert_eq!(parsed.steps(), vec![ParsingStep::Special]);
        assert_eq!(parsed.modifiers[0].stat.as_str(), "Primordial");
    }

    #[test]
    fn test_form_and_stat_line() {
        let parser = small_parser(ParserConfig::default());
        let parsed = parser.parse("5% chance to explode").unwrap();
        assert_eq!(parsed.steps(), vec![ParsingStep::FormAndStat]);
    }

    #[test]
    fn test_missing_form() {
        let parser = small_parser(ParserConfig::default());
        assert_eq!(
            parser.parse("fire damage"),
            Err(LineError::ResidualText {
                step: ParsingStep::Form,
                remaining: "fire damage".into()
            })
        );
    }

    #[test]
    fn test_missing_stat() {
        let parser = small_parser(ParserConfig::default());
        assert_eq!(
            parser.parse("10% increased armour"),
            Err(LineError::ResidualText {
                step: ParsingStep::GeneralStat,
                remaining: "armour".into()
            })
        );
    }

    #[test]
    fn test_trailing_text() {
        let parser = small_parser(ParserConfig::default());
        assert_eq!(
            parser.parse("10% increased damage with swords"),
            Err(LineError::ResidualText {
                step: ParsingStep::ActionCondition,
                remaining: "with swords".into()
            })
        );
    }

    #[test]
    fn test_hidden_marker_is_ignored() {
        let parser = small_parser(ParserConfig::default());
        assert!(parser.parse("10% increased damage (Hidden)").is_ok());

        let custom = small_parser(ParserConfig {
            hidden_marker: "[internal]".into(),
            ..ParserConfig::default()
        });
        assert!(custom.parse("10% increased damage [internal]").is_ok());
        assert!(custom.parse("10% increased damage (hidden)").is_err());
    }

    #[test]
    fn test_replaced_parts_fail_together() {
        let parser = small_parser(ParserConfig::default());
        let parsed = parser
            .parse("10% increased fire damage and 5% increased cold damage")
            .unwrap();
        assert_eq!(parsed.modifiers.len(), 2);

        let err = parser
            .parse("10% increased fire damage and 5% increased quux")
            .unwrap_err();
        assert_eq!(err.remaining(), Some("quux"));
    }

    #[test]
    fn test_condition_repetition_cap() {
        let parser = small_parser(ParserConfig {
            max_step_repetitions: 1,
            ..ParserConfig::default()
        });
        let err = parser
            .parse("10% increased damage with attacks while on low life")
            .unwrap_err();
        assert!(matches!(err, LineError::ResidualText { .. }));
    }

    #[test]
    fn test_blank_line() {
        let parser = small_parser(ParserConfig::default());
        let parsed = parser.parse("   ").unwrap();
        assert!(parsed.modifiers.is_empty());
    }

    #[test]
    fn test_parse_lines_collects_failures() {
        let parser = small_parser(ParserConfig::default());
        let report = parser.parse_lines(["10% increased damage", "bogus", "primordial"]);
        assert_eq!(report.modifiers.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "bogus");
    }

    #[test]
    fn test_caching_parser() {
        let parser = small_parser(ParserConfig::default());
        let cache = CachingParser::new(&parser);
        assert!(cache.parse("bogus").is_err());
        assert!(cache.parse("primordial").is_ok());
        assert_eq!(cache.cached_len(), 2);
        cache.invalidate("bogus");
        assert_eq!(cache.cached_len(), 1);
        cache.invalidate_all();
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn test_cache_is_shared_between_threads() {
        let parser = small_parser(ParserConfig::default());
        let cache = CachingParser::new(&parser);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert!(cache.parse("primordial").is_ok());
                    assert!(cache.parse("bogus").is_err());
                });
            }
        });
        assert_eq!(cache.cached_len(), 2);

        let report = cache.parse_lines(["primordial", "10% increased damage", "primordial"]);
        assert_eq!(report.modifiers.len(), 3);
        assert_eq!(cache.cached_len(), 3);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_cache_matches_sequential() {
        let parser = small_parser(ParserConfig::default());
        let cache = CachingParser::new(&parser);
        let lines = vec!["10% increased damage", "bogus", "10% increased damage"];
        assert_eq!(cache.parse_lines_parallel(&lines), parser.parse_lines(&lines));
        assert_eq!(cache.cached_len(), 2);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let parser = small_parser(ParserConfig::default());
        let lines = vec!["10% increased damage", "bogus", "5% chance to explode"];
        assert_eq!(parser.parse_lines_parallel(&lines), parser.parse_lines(&lines));
    }
}
