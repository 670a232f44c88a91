//! Stat manipulation and value conversion collections.

use crate::domain::{Action, Entity};
use crate::matcher::MatcherCollection;
use crate::modifier::{Fragment, StatConverter};
use crate::step::ParsingStep;
use crate::value::Value;

pub fn stat_manipulation_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::StatManipulation);
    c.add_fixed(
        "(nearby )?enemies (have|take|deal|gain)",
        Fragment::stat_converter(StatConverter::For(Entity::Enemy)),
    )
    .add_fixed(
        "minions (have|deal|gain|take)",
        Fragment::stat_converter(StatConverter::For(Entity::Minion)),
    )
    .add_fixed(
        "totems (have|deal|gain)",
        Fragment::stat_converter(StatConverter::For(Entity::Totem)),
    )
    .add_fixed(
        "(nearby )?allies (have|deal|gain)",
        Fragment::stat_converter(StatConverter::For(Entity::Ally)),
    )
    .add_fixed(
        "you and nearby allies( have| deal| gain)?",
        Fragment::stat_converter(StatConverter::AsAura),
    );
    c
}

pub fn value_conversion_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::ValueConversion);
    c.add("per # ({StatMatchers})", |m| {
        let stat = m.stat(0)?;
        Ok(Fragment::value_multiplier((Value::stat(stat.stat) / m.value()?).floor()))
    })
    .add("per # ({StatMatchers}) ceiled", |m| {
        let stat = m.stat(0)?;
        Ok(Fragment::value_multiplier((Value::stat(stat.stat) / m.value()?).ceil()))
    })
    .add("(for every|for each) # ({StatMatchers})", |m| {
        let stat = m.stat(0)?;
        Ok(Fragment::value_multiplier((Value::stat(stat.stat) / m.value()?).floor()))
    })
    .add("per # ({PoolStatMatchers})", |m| {
        let stat = m.stat(0)?;
        Ok(Fragment::value_multiplier((Value::stat(stat.stat) / m.value()?).floor()))
    })
    .add("per ({StatMatchers})", |m| {
        Ok(Fragment::value_multiplier(Value::stat(m.stat(0)?.stat)))
    })
    .add("(per|for each) ({ChargeTypeMatchers})", |m| {
        Ok(Fragment::value_multiplier(Value::stat(m.charge_type(0)?.amount())))
    })
    .add("(per|for each) ({AilmentMatchers}) on (the )?enemy", |m| {
        Ok(Fragment::value_multiplier(Value::stat(
            m.ailment(0)?.instances_on(Entity::Enemy),
        )))
    })
    .add_fixed(
        "for each enemy you've killed recently",
        Fragment::value_multiplier(Value::stat(Action::Kill.recent_count(Entity::Character))),
    )
    .add_fixed(
        "for each hit you've blocked recently",
        Fragment::value_multiplier(Value::stat(Action::Block.recent_count(Entity::Character))),
    )
    .add_fixed(
        "for each (summoned golem|golem you have summoned)",
        Fragment::value_multiplier(Value::stat("Golem.Instances")),
    )
    .add_fixed("per totem", Fragment::value_multiplier(Value::stat("Totem.Instances")))
    .add_fixed(
        "for each curse on you",
        Fragment::value_multiplier(Value::stat("Character.Curse.Instances")),
    )
    .add_fixed(
        "for each curse on (that|the) enemy",
        Fragment::value_multiplier(Value::stat("Enemy.Curse.Instances")),
    )
    .add_fixed(
        "per grand spectrum",
        Fragment::value_multiplier(Value::stat("GrandSpectrumJewelsSocketed")),
    )
    .add_fixed(
        "for each magic item you have equipped",
        Fragment::value_multiplier(Value::stat("Equipment.MagicCount")),
    )
    .add_fixed("per buff on you", Fragment::value_multiplier(Value::stat("Buffs.Count")));
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::context::{MatchContext, Reference, StatReference};
    use crate::stat_id::StatId;

    #[test]
    fn test_per_value_stat_is_floored() {
        let collection = value_conversion_matchers();
        let entry = collection
            .entries()
            .iter()
            .find(|e| e.pattern == "per # ({StatMatchers})")
            .unwrap();
        let ctx = MatchContext::new(
            vec![Value::Const(10.0)],
            vec![Reference::Stat(StatReference {
                stat: StatId::from_str("Strength"),
                condition: Condition::True,
            })],
        );
        let fragment = (entry.template)(&ctx).unwrap();
        let modifiers = Fragment::aggregate([
            fragment,
            Fragment::modifier(crate::modifier::Form::PercentIncrease, 1.0, "Damage"),
        ])
        .unwrap()
        .build()
        .unwrap();
        let lookup = |s: &StatId| (s.as_str() == "Strength").then_some(55.0);
        assert_eq!(modifiers[0].value.evaluate(&lookup), Some(5.0));
    }

    #[test]
    fn test_manipulation_only_converts() {
        let collection = stat_manipulation_matchers();
        for entry in collection.entries() {
            let fragment = (entry.template)(&MatchContext::empty()).unwrap();
            assert!(fragment.entries().is_empty());
            assert!(!fragment.is_empty());
        }
    }
}
