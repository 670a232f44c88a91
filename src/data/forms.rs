//! Form collections and the collections that fix form and stat at once.

use crate::condition::Condition;
use crate::context::MatchContext;
use crate::domain::{Action, Ailment, ChargeType, DamageType, Entity, ItemSlot, Keyword, Pool};
use crate::error::TemplateError;
use crate::matcher::MatcherCollection;
use crate::modifier::{Form, Fragment};
use crate::stat_id::StatId;
use crate::step::ParsingStep;
use crate::value::Value;

type TemplateResult = Result<Fragment, TemplateError>;

fn form(form: Form) -> impl Fn(&MatchContext) -> TemplateResult + Send + Sync + 'static {
    move |m| Ok(Fragment::form(form, m.value()?))
}

fn min_max(m: &MatchContext) -> TemplateResult {
    Ok(Fragment::forms([
        (Form::MinBaseAdd, m.values(0)?),
        (Form::MaxBaseAdd, m.values(1)?),
    ]))
}

fn penetration(m: &MatchContext) -> TemplateResult {
    Ok(Fragment::modifier(
        Form::BaseAdd,
        m.value()?,
        m.damage_type(0)?.penetration(),
    ))
}

fn fixed_each(form: Form, value: f64, stats: impl IntoIterator<Item = StatId>) -> Fragment {
    Fragment::modifiers(stats.into_iter().map(|stat| (form, Value::Const(value), stat)))
}

pub fn form_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::Form);
    c.add("#% increased", form(Form::PercentIncrease))
        .add("#% reduced", form(Form::PercentReduce))
        .add("#% more", form(Form::PercentMore))
        .add("#% less", form(Form::PercentLess))
        .add(r"\+#%? to", form(Form::BaseAdd))
        .add(r"-#%? to", form(Form::BaseSubtract))
        .add(r"\+#%?", form(Form::BaseAdd))
        .add(r"-#%?", form(Form::BaseSubtract))
        .add("#%? additional", form(Form::BaseAdd))
        .add("adds # to #", min_max)
        .add("# to # added", min_max)
        .add("# to #", min_max)
        .add_fixed("no", Fragment::form(Form::TotalOverride, 0.0));
    c
}

pub fn form_and_stat_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::FormAndStat);
    c
        // conversion and gain
        .add(
            "#% of ({DamageTypeMatchers}) damage converted to ({DamageTypeMatchers}) damage",
            |m| {
                Ok(Fragment::modifier(
                    Form::BaseAdd,
                    m.value()?,
                    m.damage_type(0)?.conversion_to(m.damage_type(1)?),
                ))
            },
        )
        .add(
            "(gain )?#% of ({DamageTypeMatchers}) damage (gained |added )?as (extra )?({DamageTypeMatchers}) damage",
            |m| {
                Ok(Fragment::modifier(
                    Form::BaseAdd,
                    m.value()?,
                    m.damage_type(0)?.gain_as(m.damage_type(1)?),
                ))
            },
        )
        // penetration
        .add("damage penetrates #% (of enemy )?({DamageTypeMatchers}) resistances?", penetration)
        .add_substituting(
            "damage (?P<inner>with .*|dealt by .*) penetrates #% (of enemy )?({DamageTypeMatchers}) resistances?",
            "${inner}",
            penetration,
        )
        .add("penetrates? #% ({DamageTypeMatchers}) resistances?", penetration)
        .add("damage penetrates #% (of enemy )?elemental resistances", |m| {
            let value = m.value()?;
            Ok(Fragment::modifiers(
                DamageType::ELEMENTAL.map(|t| (Form::BaseAdd, value.clone(), t.penetration())),
            ))
        })
        // projectiles
        .add("fires # additional (projectiles|arrows)", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Projectile.Count"))
        })
        .add_fixed(
            "fires an additional (projectile|arrow)",
            Fragment::modifier(Form::BaseAdd, 1.0, "Projectile.Count"),
        )
        .add("(projectiles )?pierces? # additional targets?", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Projectile.PierceCount"))
        })
        .add_fixed(
            "projectiles pierce an additional target",
            Fragment::modifier(Form::BaseAdd, 1.0, "Projectile.PierceCount"),
        )
        .add(r"chains? \+# times", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Projectile.ChainCount"))
        })
        // ailments
        .add("#% chance to (cause |inflict )?({AilmentMatchers})( enemies)?", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.ailment(0)?.chance()))
        })
        .add("always ({AilmentMatchers})( enemies)?", |m| {
            Ok(Fragment::modifier(Form::TotalOverride, 100.0, m.ailment(0)?.chance()))
        })
        .add("#% chance to avoid being ({AilmentMatchers})", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.ailment(0)?.avoidance()))
        })
        .add("#% chance to avoid elemental ailments", |m| {
            let value = m.value()?;
            Ok(Fragment::modifiers(
                Ailment::ELEMENTAL.map(|a| (Form::BaseAdd, value.clone(), a.avoidance())),
            ))
        })
        .add("(cannot be|you are immune to) ({AilmentMatchers})", |m| {
            Ok(Fragment::modifier(Form::TotalOverride, 100.0, m.ailment(0)?.avoidance()))
        })
        .add_fixed(
            "immune to elemental ailments",
            fixed_each(Form::TotalOverride, 100.0, Ailment::ELEMENTAL.map(Ailment::avoidance)),
        )
        // charges
        .add("#% chance to gain a power, frenzy or endurance charge", |m| {
            let share = m.value()? / 3.0;
            Ok(Fragment::modifiers(
                ChargeType::ALL.map(|c| (Form::BaseAdd, share.clone(), c.chance_to_gain())),
            ))
        })
        .add("#% chance to gain an? ({ChargeTypeMatchers})", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.charge_type(0)?.chance_to_gain()))
        })
        .add("gain an? ({ChargeTypeMatchers})", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, 100.0, m.charge_type(0)?.chance_to_gain()))
        })
        // regeneration and leech
        .add("#% of ({PoolMatchers}) regenerated per second", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(0)?.regen_percent()))
        })
        .add("regenerate #%( of)?( your)?( maximum)? ({PoolMatchers}) per second", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(0)?.regen_percent()))
        })
        .add("# ({PoolMatchers}) regenerated per second", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(0)?.regen()))
        })
        .add("regenerate # ({PoolMatchers}) per second", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(0)?.regen()))
        })
        .add("#% of ({DamageStatMatchers}) leeched as ({PoolMatchers})", |m| {
            let damage = m.stat(0)?;
            Ok(
                Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(1)?.leech_of(&damage.stat))
                    .with_condition(damage.condition),
            )
        })
        .add("gain # ({PoolMatchers}) for each enemy hit by your attacks", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, m.pool(0)?.gain())
                .with_condition(Condition::On {
                    action: Action::Hit,
                    entity: Entity::Character,
                })
                .with_condition(Condition::With(Keyword::Attack)))
        })
        // buffs
        .add("(you have|gain) ({BuffMatchers})", |m| {
            Ok(Fragment::modifier(Form::TotalOverride, 1.0, m.buff(0)?.active()))
        })
        // energy shield bypass
        .add("#% of ({DamageTypeMatchers}) damage bypasses energy shield", |m| {
            Ok(Fragment::modifier(
                Form::BaseAdd,
                m.value()?,
                m.damage_type(0)?.energy_shield_bypass(),
            ))
        })
        .add("#% of ({DamageTypeMatchers}) damage does not bypass energy shield", |m| {
            Ok(Fragment::modifier(
                Form::BaseSubtract,
                m.value()?,
                m.damage_type(0)?.energy_shield_bypass(),
            ))
        })
        // block and dodge
        .add("#% chance to dodge attack (hits|damage)", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Dodge.AttackChance"))
        })
        .add("#% chance to dodge spell (hits|damage)", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Dodge.SpellChance"))
        })
        .add("#% of block chance applied to spells", |m| {
            Ok(Fragment::modifier(
                Form::BaseAdd,
                m.value()? * Value::stat("Block.AttackChance") / 100.0,
                "Block.SpellChance",
            ))
        })
        // misc
        .add_fixed(
            "skills cost no mana",
            Fragment::modifier(Form::TotalOverride, 0.0, Pool::Mana.cost()),
        )
        .add_fixed(
            "you can have one additional curse",
            Fragment::modifier(Form::BaseAdd, 1.0, "Curse.Limit"),
        )
        .add_fixed(
            "you can have an additional brand attached to an enemy",
            Fragment::modifier(Form::BaseAdd, 1.0, "Brand.AttachedLimit"),
        )
        .add_fixed(
            "knocks back enemies",
            Fragment::modifier(Form::TotalOverride, 100.0, "Knockback.Chance"),
        )
        .add("#% chance to knock enemies back", |m| {
            Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Knockback.Chance"))
        });
    c
}

pub fn keystone_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::Keystone);
    c.add("maximum life becomes #", |m| {
        Ok(Fragment::modifier(Form::TotalOverride, m.value()?, Pool::Life.maximum()))
    })
    .add("immune to ({DamageTypeMatchers}) damage", |m| {
        Ok(Fragment::modifier(Form::TotalOverride, 100.0, m.damage_type(0)?.resistance()))
    })
    .add_fixed(
        "removes all mana",
        Fragment::modifier(Form::TotalOverride, 0.0, Pool::Mana.maximum()),
    )
    .add_fixed(
        "spend life instead of mana for skills",
        Fragment::modifier(Form::BaseAdd, 100.0, "Mana.Cost.ConvertTo.Life"),
    )
    .add_fixed(
        "converts all evasion rating to armour",
        Fragment::modifier(Form::TotalOverride, 100.0, "Evasion.ConvertTo.Armour"),
    )
    .add_fixed(
        "dexterity provides no bonus to evasion rating",
        Fragment::modifier(Form::TotalOverride, 0.0, "DexterityEvasionBonus"),
    )
    .add_fixed(
        "never deal critical strikes",
        Fragment::modifier(Form::TotalOverride, 0.0, "CriticalStrike.Chance"),
    )
    .add_fixed(
        "your hits can't be evaded",
        Fragment::modifier(Form::TotalOverride, 100.0, "ChanceToHit"),
    )
    .add_fixed(
        "cannot evade enemy attacks",
        Fragment::modifier(Form::TotalOverride, 0.0, "Evasion.Chance"),
    )
    .add_fixed(
        "cannot be stunned",
        Fragment::modifier(Form::TotalOverride, 100.0, "Stun.Avoidance"),
    )
    .add_fixed(
        "life regeneration has no effect",
        Fragment::modifier(Form::PercentLess, 100.0, Pool::Life.regen()),
    )
    .add_fixed(
        "deal no non-fire damage",
        fixed_each(
            Form::TotalOverride,
            0.0,
            [DamageType::Physical, DamageType::Cold, DamageType::Lightning, DamageType::Chaos]
                .map(DamageType::damage),
        ),
    )
    .add("#% of physical, cold and lightning damage converted to fire damage", |m| {
        let value = m.value()?;
        Ok(Fragment::modifiers(
            [DamageType::Physical, DamageType::Cold, DamageType::Lightning]
                .map(|t| (Form::BaseAdd, value.clone(), t.conversion_to(DamageType::Fire))),
        ))
    })
    .add_fixed(
        "(leech energy shield instead of life|life leech is applied to energy shield instead)",
        Fragment::modifier(Form::TotalOverride, 1.0, "Life.Leech.AppliesToEnergyShield"),
    )
    .add_fixed(
        "spend energy shield before mana for skill costs",
        Fragment::modifier(Form::TotalOverride, 1.0, "Mana.Cost.PaidWithEnergyShieldFirst"),
    )
    .add_fixed(
        "energy shield protects mana instead of life",
        Fragment::modifier(Form::TotalOverride, 1.0, "EnergyShield.ProtectsMana"),
    );
    c
}

/// Lines that are parsed in one piece or not at all.
pub fn special_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::Special).whole_line_only();
    c.add(r"\+# to level of socketed gems", |m| {
        Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Gem.Level"))
    })
    .add(r"\+# to level of socketed support gems", |m| {
        Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Gem.SupportLevel"))
    })
    .add(r"\+# to level of socketed ({KeywordMatchers}) gems", |m| {
        Ok(Fragment::modifier(Form::BaseAdd, m.value()?, "Gem.Level")
            .with_condition(Condition::With(m.keyword(0)?)))
    })
    .add_fixed(
        "primordial",
        Fragment::modifier(Form::BaseAdd, 1.0, "PrimordialJewelsSocketed"),
    )
    .add_fixed(
        "grand spectrum",
        Fragment::modifier(Form::BaseAdd, 1.0, "GrandSpectrumJewelsSocketed"),
    )
    .add_fixed(
        "ignore all movement penalties from armour",
        Fragment::modifier(Form::TotalOverride, 1.0, "Armour.IgnoresMovementPenalties"),
    )
    .add_fixed(
        "maximum life leech rate is doubled",
        Fragment::modifier(Form::PercentMore, 100.0, "Life.Leech.RateLimit"),
    )
    .add("({PoolMatchers}) leeched per second is doubled", |m| {
        Ok(Fragment::modifier(Form::PercentMore, 100.0, m.pool(0)?.leech().child("Rate")))
    })
    .add(
        "maximum total recovery per second from ({PoolMatchers}) leech is doubled",
        |m| {
            Ok(Fragment::modifier(
                Form::PercentMore,
                100.0,
                m.pool(0)?.leech().child("RateLimit"),
            ))
        },
    )
    .add_fixed(
        "armour received from body armour is doubled",
        Fragment::modifier(Form::PercentMore, 100.0, "Armour")
            .with_condition(Condition::BaseValueFrom(ItemSlot::BodyArmour)),
    )
    .add_fixed(
        "gain accuracy rating equal to your strength",
        Fragment::modifier(Form::BaseAdd, Value::stat("Strength"), "Accuracy"),
    )
    .add_fixed(
        "you can't deal damage with (your )?skills yourself",
        Fragment::modifier(Form::TotalOverride, 0.0, "Damage").with_condition(Condition::not(
            Condition::any([
                Condition::With(Keyword::Totem),
                Condition::With(Keyword::Trap),
                Condition::With(Keyword::Mine),
            ]),
        )),
    )
    .add_fixed(
        "your bleeding does not deal extra damage while the enemy is moving",
        Fragment::modifier(Form::PercentLess, 50.0, Ailment::Bleed.damage())
            .with_condition(Condition::state("Enemy.IsMoving")),
    )
    .add("you can inflict bleeding on an enemy up to # times", |m| {
        Ok(Fragment::modifier(
            Form::BaseAdd,
            m.value()? - 1.0,
            "Bleed.Instances.Maximum",
        ))
    })
    .add("socketed gems are supported by level # .+", |_| {
        Err(TemplateError::Unsupported(
            "support gem links are not modifiers".into(),
        ))
    })
    .add("trigger level # .+ when you .+", |_| {
        Err(TemplateError::Unsupported(
            "triggered skills are not modifiers".into(),
        ))
    })
    .add("grants level # .+ skill", |_| {
        Err(TemplateError::Unsupported("granted skills are not modifiers".into()))
    });
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Reference;

    fn template(collection: &MatcherCollection, pattern: &str) -> crate::matcher::Template {
        collection
            .entries()
            .iter()
            .find(|e| e.pattern == pattern)
            .unwrap()
            .template
            .clone()
    }

    #[test]
    fn test_min_max_form() {
        let forms = form_matchers();
        let ctx = MatchContext::new(vec![Value::Const(5.0), Value::Const(10.0)], vec![]);
        let fragment = template(&forms, "adds # to #")(&ctx).unwrap();
        assert_eq!(fragment.entries().len(), 2);
        assert_eq!(fragment.entries()[0].form, Some(Form::MinBaseAdd));
        assert_eq!(fragment.entries()[1].value, Some(Value::Const(10.0)));
    }

    #[test]
    fn test_form_requires_value() {
        let forms = form_matchers();
        let err = template(&forms, "#% increased")(&MatchContext::empty()).unwrap_err();
        assert_eq!(err, TemplateError::MissingValue { index: 0, count: 0 });
    }

    #[test]
    fn test_split_charge_chance() {
        let collection = form_and_stat_matchers();
        let ctx = MatchContext::new(vec![Value::Const(30.0)], vec![]);
        let modifiers = template(
            &collection,
            "#% chance to gain a power, frenzy or endurance charge",
        )(&ctx)
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(modifiers.len(), 3);
        assert!(modifiers.iter().all(|m| m.value == Value::Const(10.0)));
    }

    #[test]
    fn test_bleed_instances_exclude_the_first() {
        let collection = special_matchers();
        let ctx = MatchContext::new(vec![Value::Const(3.0)], vec![]);
        let modifiers = template(&collection, "you can inflict bleeding on an enemy up to # times")(&ctx)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(modifiers[0].value, Value::Const(2.0));
    }

    #[test]
    fn test_immunity_keystone() {
        let collection = keystone_matchers();
        let ctx = MatchContext::new(vec![], vec![Reference::DamageType(DamageType::Chaos)]);
        let modifiers = template(&collection, "immune to ({DamageTypeMatchers}) damage")(&ctx)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(modifiers[0].stat.as_str(), "Chaos.Resistance");
        assert_eq!(modifiers[0].form, Form::TotalOverride);
    }

    #[test]
    fn test_special_is_whole_line() {
        assert!(special_matchers().matches_whole_line_only());
        assert!(!keystone_matchers().matches_whole_line_only());
    }
}
