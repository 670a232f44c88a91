//! Modifiers and the fragments they are assembled from.
//!
//! Every matcher that fires on a stat line contributes a [`Fragment`]: a
//! partial modifier that may carry a form, a stat, a value, a condition,
//! stat converters or value multipliers. After a line is fully consumed the
//! fragments are aggregated and built into [`Modifier`]s.

use crate::condition::Condition;
use crate::context::StatReference;
use crate::domain::Entity;
use crate::error::TemplateError;
use crate::stat_id::StatId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a modifier's value combines with a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    BaseSet,
    BaseAdd,
    BaseSubtract,
    PercentIncrease,
    PercentReduce,
    PercentMore,
    PercentLess,
    TotalOverride,
    /// Added to the minimum of a ranged base value.
    MinBaseAdd,
    /// Added to the maximum of a ranged base value.
    MaxBaseAdd,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A fully parsed modifier: `(Form, Stat, Value, Condition)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub form: Form,
    pub stat: StatId,
    pub value: Value,
    pub condition: Condition,
}

impl Modifier {
    pub fn new(form: Form, stat: impl Into<StatId>, value: impl Into<Value>) -> Self {
        Self {
            form,
            stat: stat.into(),
            value: value.into(),
            condition: Condition::True,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.form, self.stat, self.value)?;
        if !self.condition.is_true() {
            write!(f, " if {:?}", self.condition)?;
        }
        Ok(())
    }
}

/// Rewrites the stats of a fragment, e.g. "nearby enemies have".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatConverter {
    /// The stat belongs to another entity: `Enemy.Fire.Resistance`.
    For(Entity),
    /// The stat is granted through an aura: `Aura.Damage`.
    AsAura,
}

impl StatConverter {
    pub fn apply(&self, stat: StatId) -> StatId {
        match self {
            StatConverter::For(entity) => stat.scoped(entity.name()),
            StatConverter::AsAura => stat.scoped("Aura"),
        }
    }
}

/// One entry of a [`Fragment`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FragmentEntry {
    pub form: Option<Form>,
    pub value: Option<Value>,
    pub stat: Option<StatId>,
    pub condition: Option<Condition>,
}

impl FragmentEntry {
    fn merge(self, other: FragmentEntry) -> Result<FragmentEntry, TemplateError> {
        Ok(FragmentEntry {
            form: merge_field("form", self.form, other.form)?,
            value: merge_field("value", self.value, other.value)?,
            stat: merge_field("stat", self.stat, other.stat)?,
            condition: match (self.condition, other.condition) {
                (Some(a), Some(b)) => Some(a.and(b)),
                (a, b) => a.or(b),
            },
        })
    }
}

fn merge_field<T: fmt::Debug>(
    field: &str,
    a: Option<T>,
    b: Option<T>,
) -> Result<Option<T>, TemplateError> {
    match (a, b) {
        (Some(a), Some(b)) => Err(TemplateError::Aggregation(format!(
            "{} specified twice ({:?} and {:?})",
            field, a, b
        ))),
        (a, b) => Ok(a.or(b)),
    }
}

/// A partial modifier produced by one matcher.
///
/// # Aggregation
///
/// Two fragments combine entry by entry:
/// - an empty side is neutral,
/// - equal entry counts are zipped,
/// - a single entry is broadcast over every entry of the other side,
/// - any other shape is an error.
///
/// Within an entry a form, value or stat may be set by only one side;
/// conditions are conjoined. Stat converters and value multipliers
/// accumulate and are applied by [`Fragment::build`].
///
/// # Examples
///
/// ```rust
/// use statline::{Form, Fragment, StatId, Value};
///
/// let form = Fragment::forms([
///     (Form::MinBaseAdd, Value::Const(5.0)),
///     (Form::MaxBaseAdd, Value::Const(10.0)),
/// ]);
/// let stat = Fragment::stat(StatId::from_str("Physical.Damage"));
///
/// let modifiers = Fragment::aggregate([form, stat]).unwrap().build().unwrap();
/// assert_eq!(modifiers.len(), 2);
/// assert_eq!(modifiers[0].form, Form::MinBaseAdd);
/// assert_eq!(modifiers[1].value, Value::Const(10.0));
/// assert_eq!(modifiers[1].stat.as_str(), "Physical.Damage");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    entries: Vec<FragmentEntry>,
    stat_converters: Vec<StatConverter>,
    value_multipliers: Vec<Value>,
}

impl Fragment {
    /// A fragment that contributes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_entries(entries: Vec<FragmentEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn form(form: Form, value: impl Into<Value>) -> Self {
        Self::forms([(form, value.into())])
    }

    /// One entry per form, e.g. minimum and maximum of "adds # to #".
    pub fn forms(forms: impl IntoIterator<Item = (Form, Value)>) -> Self {
        Self::from_entries(
            forms
                .into_iter()
                .map(|(form, value)| FragmentEntry {
                    form: Some(form),
                    value: Some(value),
                    ..FragmentEntry::default()
                })
                .collect(),
        )
    }

    pub fn stat(stat: impl Into<StatId>) -> Self {
        Self::stats([stat.into()])
    }

    /// One entry per stat, e.g. "all elemental resistances".
    pub fn stats(stats: impl IntoIterator<Item = StatId>) -> Self {
        Self::from_entries(
            stats
                .into_iter()
                .map(|stat| FragmentEntry {
                    stat: Some(stat),
                    ..FragmentEntry::default()
                })
                .collect(),
        )
    }

    pub fn condition(condition: Condition) -> Self {
        Self::from_entries(vec![FragmentEntry {
            condition: Some(condition),
            ..FragmentEntry::default()
        }])
    }

    /// A complete single modifier.
    pub fn modifier(form: Form, value: impl Into<Value>, stat: impl Into<StatId>) -> Self {
        Self::modifiers([(form, value.into(), stat.into())])
    }

    pub fn modifiers(modifiers: impl IntoIterator<Item = (Form, Value, StatId)>) -> Self {
        Self::from_entries(
            modifiers
                .into_iter()
                .map(|(form, value, stat)| FragmentEntry {
                    form: Some(form),
                    value: Some(value),
                    stat: Some(stat),
                    condition: None,
                })
                .collect(),
        )
    }

    pub fn stat_converter(converter: StatConverter) -> Self {
        Self {
            stat_converters: vec![converter],
            ..Self::default()
        }
    }

    /// Every built modifier's value is multiplied by `multiplier`.
    pub fn value_multiplier(multiplier: Value) -> Self {
        Self {
            value_multipliers: vec![multiplier],
            ..Self::default()
        }
    }

    /// Attach a condition to every entry, or add a condition-only entry if
    /// there are none.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        if condition.is_true() {
            return self;
        }
        if self.entries.is_empty() {
            self.entries.push(FragmentEntry::default());
        }
        for entry in &mut self.entries {
            entry.condition = Some(match entry.condition.take() {
                Some(existing) => existing.and(condition.clone()),
                None => condition.clone(),
            });
        }
        self
    }

    pub fn entries(&self) -> &[FragmentEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.stat_converters.is_empty() && self.value_multipliers.is_empty()
    }

    /// Combine two fragments.
    pub fn merge(self, other: Fragment) -> Result<Fragment, TemplateError> {
        let left = self.entries.len();
        let right = other.entries.len();
        let entries = match (left, right) {
            (0, _) => other.entries,
            (_, 0) => self.entries,
            (l, r) if l == r => self
                .entries
                .into_iter()
                .zip(other.entries)
                .map(|(a, b)| a.merge(b))
                .collect::<Result<_, _>>()?,
            (1, _) => {
                let single = &self.entries[0];
                other
                    .entries
                    .into_iter()
                    .map(|b| single.clone().merge(b))
                    .collect::<Result<_, _>>()?
            }
            (_, 1) => {
                let single = &other.entries[0];
                self.entries
                    .into_iter()
                    .map(|a| a.merge(single.clone()))
                    .collect::<Result<_, _>>()?
            }
            (l, r) => {
                return Err(TemplateError::Aggregation(format!(
                    "cannot combine {} entries with {} entries",
                    l, r
                )))
            }
        };

        let mut stat_converters = self.stat_converters;
        stat_converters.extend(other.stat_converters);
        let mut value_multipliers = self.value_multipliers;
        value_multipliers.extend(other.value_multipliers);

        Ok(Fragment {
            entries,
            stat_converters,
            value_multipliers,
        })
    }

    /// Fold fragments left to right with [`Fragment::merge`].
    pub fn aggregate(fragments: impl IntoIterator<Item = Fragment>) -> Result<Fragment, TemplateError> {
        fragments
            .into_iter()
            .try_fold(Fragment::empty(), |acc, fragment| acc.merge(fragment))
    }

    /// Turn the aggregated fragment into modifiers.
    pub fn build(self) -> Result<Vec<Modifier>, TemplateError> {
        if self.entries.is_empty() {
            return Err(TemplateError::Incomplete("no modifier entries".into()));
        }

        self.entries
            .into_iter()
            .map(|entry| {
                let form = entry
                    .form
                    .ok_or_else(|| TemplateError::Incomplete("missing form".into()))?;
                let stat = entry
                    .stat
                    .ok_or_else(|| TemplateError::Incomplete("missing stat".into()))?;
                let value = entry
                    .value
                    .ok_or_else(|| TemplateError::Incomplete("missing value".into()))?;

                let stat = self
                    .stat_converters
                    .iter()
                    .fold(stat, |stat, converter| converter.apply(stat));
                let value = self
                    .value_multipliers
                    .iter()
                    .fold(value, |value, multiplier| value * multiplier.clone());

                Ok(Modifier {
                    form,
                    stat,
                    value,
                    condition: entry.condition.unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Interpret the fragment as a single referenced stat.
    pub fn into_stat_reference(self) -> Result<StatReference, TemplateError> {
        if self.entries.len() != 1 {
            return Err(TemplateError::InvalidStatReference(format!(
                "expected exactly one entry, found {}",
                self.entries.len()
            )));
        }
        if !self.value_multipliers.is_empty() {
            return Err(TemplateError::InvalidStatReference(
                "value multipliers are not allowed".into(),
            ));
        }
        let entry = self.entries.into_iter().next().unwrap_or_default();
        if entry.form.is_some() || entry.value.is_some() {
            return Err(TemplateError::InvalidStatReference(
                "form and value are not allowed".into(),
            ));
        }
        let stat = entry
            .stat
            .ok_or_else(|| TemplateError::InvalidStatReference("missing stat".into()))?;
        let stat = self
            .stat_converters
            .iter()
            .fold(stat, |stat, converter| converter.apply(stat));
        Ok(StatReference {
            stat,
            condition: entry.condition.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Keyword;

    fn life() -> StatId {
        StatId::from_str("Life.Maximum")
    }

    #[test]
    fn test_form_and_stat_build() {
        let fragment = Fragment::form(Form::PercentIncrease, 30.0)
            .merge(Fragment::stat(life()))
            .unwrap();
        let modifiers = fragment.build().unwrap();
        assert_eq!(modifiers, vec![Modifier::new(Form::PercentIncrease, life(), 30.0)]);
    }

    #[test]
    fn test_broadcast_single_over_many() {
        let stats = Fragment::stats(vec![
            StatId::from_str("Fire.Resistance"),
            StatId::from_str("Cold.Resistance"),
            StatId::from_str("Lightning.Resistance"),
        ]);
        let modifiers = Fragment::aggregate([Fragment::form(Form::BaseAdd, 10.0), stats])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(modifiers.len(), 3);
        assert!(modifiers.iter().all(|m| m.form == Form::BaseAdd));
        assert_eq!(modifiers[2].stat.as_str(), "Lightning.Resistance");
    }

    #[test]
    fn test_mismatched_entry_counts() {
        let forms = Fragment::forms([
            (Form::MinBaseAdd, Value::Const(1.0)),
            (Form::MaxBaseAdd, Value::Const(2.0)),
        ]);
        let stats = Fragment::stats(vec![
            StatId::from_str("A"),
            StatId::from_str("B"),
            StatId::from_str("C"),
        ]);
        assert!(matches!(forms.merge(stats), Err(TemplateError::Aggregation(_))));
    }

    #[test]
    fn test_conflicting_forms() {
        let result = Fragment::form(Form::PercentMore, 10.0).merge(Fragment::form(Form::PercentLess, 5.0));
        assert!(matches!(result, Err(TemplateError::Aggregation(_))));
    }

    #[test]
    fn test_conditions_are_conjoined() {
        let modifiers = Fragment::aggregate([
            Fragment::form(Form::BaseAdd, 1.0),
            Fragment::stat(life()).with_condition(Condition::With(Keyword::Attack)),
            Fragment::condition(Condition::state("Life.IsLow")),
        ])
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(
            modifiers[0].condition,
            Condition::And(vec![
                Condition::With(Keyword::Attack),
                Condition::state("Life.IsLow")
            ])
        );
    }

    #[test]
    fn test_converters_and_multipliers() {
        let modifiers = Fragment::aggregate([
            Fragment::stat_converter(StatConverter::For(Entity::Enemy)),
            Fragment::value_multiplier(Value::stat("Frenzy.Charge.Amount")),
            Fragment::modifier(Form::BaseSubtract, 10.0, StatId::from_str("Fire.Resistance")),
        ])
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(modifiers[0].stat.as_str(), "Enemy.Fire.Resistance");
        assert_eq!(
            modifiers[0].value,
            Value::from(10.0) * Value::stat("Frenzy.Charge.Amount")
        );
    }

    #[test]
    fn test_incomplete_build() {
        assert!(matches!(
            Fragment::form(Form::BaseAdd, 1.0).build(),
            Err(TemplateError::Incomplete(_))
        ));
        assert!(matches!(
            Fragment::empty().build(),
            Err(TemplateError::Incomplete(_))
        ));
    }

    #[test]
    fn test_into_stat_reference() {
        let reference = Fragment::stat(StatId::from_str("Damage"))
            .with_condition(Condition::With(Keyword::Attack))
            .into_stat_reference()
            .unwrap();
        assert_eq!(reference.stat.as_str(), "Damage");
        assert_eq!(reference.condition, Condition::With(Keyword::Attack));

        let err = Fragment::modifier(Form::BaseAdd, 1.0, life()).into_stat_reference();
        assert!(matches!(err, Err(TemplateError::InvalidStatReference(_))));

        let err = Fragment::stats(vec![StatId::from_str("A"), StatId::from_str("B")])
            .into_stat_reference();
        assert!(matches!(err, Err(TemplateError::InvalidStatReference(_))));
    }
}
