//! Built-in matcher data.
//!
//! [`ParsingData`] validates every table once, compiles it and keeps the
//! result immutable, so one instance can serve any number of parsers and
//! threads.
//!
//! # Examples
//!
//! ```rust
//! use statline::data::ParsingData;
//! use statline::domain::SkillDefinition;
//! use statline::ParsingStep;
//!
//! let data = ParsingData::new(&[SkillDefinition::new("Fireball", "Fireball")]).unwrap();
//! assert!(data.registry().contains("SkillMatchers"));
//! assert_eq!(data.collections_for(ParsingStep::DamageStat).len(), 3);
//! ```

pub mod conditions;
pub mod conversions;
pub mod forms;
pub mod referenced;
pub mod replacers;
pub mod stats;

use crate::domain::SkillDefinition;
use crate::error::DataError;
use crate::expand::CompiledCollection;
use crate::matcher::{MatcherCollection, ReferencedMatcherCollection};
use crate::normalize::StatReplacer;
use crate::registry::ReferenceRegistry;
use crate::step::ParsingStep;

/// Every built-in matcher collection, in step order.
pub fn builtin_collections() -> Vec<MatcherCollection> {
    vec![
        forms::special_matchers(),
        conversions::stat_manipulation_matchers(),
        conversions::value_conversion_matchers(),
        forms::form_and_stat_matchers(),
        forms::keystone_matchers(),
        forms::form_matchers(),
        stats::general_stat_matchers(),
        stats::damage_stat_matchers(),
        stats::pool_stat_matchers(),
        conditions::condition_matchers(),
        conditions::action_condition_matchers(),
    ]
}

/// Compiled, validated matcher tables and stat replacers.
#[derive(Debug)]
pub struct ParsingData {
    collections: Vec<CompiledCollection>,
    replacers: Vec<StatReplacer>,
    registry: ReferenceRegistry,
}

impl ParsingData {
    /// Compile the built-in tables with the given skills.
    pub fn new(skills: &[SkillDefinition]) -> Result<Self, DataError> {
        Self::from_parts(
            builtin_collections(),
            referenced::referenced_collections(skills),
            replacers::stat_replacers()?,
        )
    }

    /// Compile custom tables.
    ///
    /// Fails on the first invalid table: an unknown or cyclic reference,
    /// a malformed pattern or a name registered twice.
    pub fn from_parts(
        collections: Vec<MatcherCollection>,
        referenced: Vec<ReferencedMatcherCollection>,
        replacers: Vec<StatReplacer>,
    ) -> Result<Self, DataError> {
        let registry = ReferenceRegistry::build(&collections, &referenced)?;
        let compiled = collections
            .iter()
            .map(|collection| CompiledCollection::compile(collection, &registry))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "compiled {} matchers in {} collections, {} reference names, {} replacers",
            compiled.iter().map(CompiledCollection::len).sum::<usize>(),
            compiled.len(),
            registry.names().len(),
            replacers.len()
        );

        Ok(Self {
            collections: compiled,
            replacers,
            registry,
        })
    }

    pub fn collections(&self) -> &[CompiledCollection] {
        &self.collections
    }

    /// The first collection of `step`, if any.
    pub fn collection(&self, step: ParsingStep) -> Option<&CompiledCollection> {
        self.collections.iter().find(|c| c.step() == step)
    }

    /// Collections tried together when the stepper is at `step`.
    ///
    /// Stat steps share one priority group, so any stat step yields the
    /// general, damage and pool stat collections together.
    pub fn collections_for(&self, step: ParsingStep) -> Vec<&CompiledCollection> {
        let group = step.priority_group();
        self.collections
            .iter()
            .filter(|c| c.step().priority_group() == group)
            .collect()
    }

    pub fn replacers(&self) -> &[StatReplacer] {
        &self.replacers
    }

    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Reference;
    use crate::domain::DamageType;
    use crate::modifier::Fragment;

    #[test]
    fn test_builtin_data_compiles() {
        let data = ParsingData::new(&[]).unwrap();
        assert_eq!(data.collections().len(), builtin_collections().len());
        assert!(!data.replacers().is_empty());
        for name in ["StatMatchers", "DamageStatMatchers", "PoolStatMatchers", "AilmentMatchers"] {
            assert!(data.registry().contains(name), "{}", name);
        }
    }

    #[test]
    fn test_every_step_has_a_collection() {
        let data = ParsingData::new(&[]).unwrap();
        for step in ParsingStep::ALL {
            assert!(data.collection(step).is_some(), "{}", step);
        }
    }

    #[test]
    fn test_stat_steps_share_collections() {
        let data = ParsingData::new(&[]).unwrap();
        let steps: Vec<_> = data
            .collections_for(ParsingStep::PoolStat)
            .iter()
            .map(|c| c.step())
            .collect();
        assert_eq!(
            steps,
            vec![ParsingStep::GeneralStat, ParsingStep::DamageStat, ParsingStep::PoolStat]
        );
        assert_eq!(data.collections_for(ParsingStep::Form).len(), 1);
    }

    #[test]
    fn test_unknown_reference_fails() {
        let mut collection = MatcherCollection::new(ParsingStep::GeneralStat);
        collection.add_fixed("({NopeMatchers}) damage", Fragment::stat("Damage"));
        let err = ParsingData::from_parts(vec![collection], vec![], vec![]).unwrap_err();
        assert_eq!(
            err,
            DataError::UnknownReference {
                name: "NopeMatchers".into(),
                collection: "GeneralStat".into(),
            }
        );
    }

    #[test]
    fn test_malformed_pattern_fails() {
        let mut collection = MatcherCollection::new(ParsingStep::Form);
        collection.add_fixed("(unclosed", Fragment::empty());
        let err = ParsingData::from_parts(vec![collection], vec![], vec![]).unwrap_err();
        assert!(matches!(err, DataError::PatternCompilation { index: 0, .. }));
    }

    #[test]
    fn test_duplicate_referenced_table_fails() {
        let mut a = ReferencedMatcherCollection::new("DamageTypeMatchers");
        a.add("fire", Reference::DamageType(DamageType::Fire));
        let b = a.clone();
        let err = ParsingData::from_parts(vec![], vec![a, b], vec![]).unwrap_err();
        assert_eq!(err, DataError::DuplicateReference("DamageTypeMatchers".into()));
    }
}
