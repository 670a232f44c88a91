//! Stat collections.
//!
//! These only name stats; forms and values come from other steps. All three
//! are referenceable so value conversions and conditions can embed them,
//! e.g. `per # ({StatMatchers})`.

use crate::condition::Condition;
use crate::domain::{DamageType, ItemTag, Keyword, Pool};
use crate::matcher::MatcherCollection;
use crate::modifier::Fragment;
use crate::stat_id::StatId;
use crate::step::ParsingStep;

fn stats<const N: usize>(names: [&str; N]) -> Fragment {
    Fragment::stats(names.into_iter().map(StatId::from))
}

fn with(keyword: Keyword) -> Condition {
    Condition::With(keyword)
}

pub fn general_stat_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::GeneralStat).referenceable_as("StatMatchers");
    c
        // attributes
        .add_fixed("strength", Fragment::stat("Strength"))
        .add_fixed("dexterity", Fragment::stat("Dexterity"))
        .add_fixed("intelligence", Fragment::stat("Intelligence"))
        .add_fixed("strength and dexterity", stats(["Strength", "Dexterity"]))
        .add_fixed("strength and intelligence", stats(["Strength", "Intelligence"]))
        .add_fixed("dexterity and intelligence", stats(["Dexterity", "Intelligence"]))
        .add_fixed("(all )?attributes", stats(["Strength", "Dexterity", "Intelligence"]))
        .add_fixed("strength damage bonus", Fragment::stat("StrengthDamageBonus"))
        .add_fixed("dexterity evasion bonus", Fragment::stat("DexterityEvasionBonus"))
        .add_fixed("(character )?level", Fragment::stat("Level"))
        // offense
        .add_fixed("(global )?critical strike chance", Fragment::stat("CriticalStrike.Chance"))
        .add_fixed("(global )?critical strike multiplier", Fragment::stat("CriticalStrike.Multiplier"))
        .add_fixed(
            "damage multiplier for ailments from critical strikes",
            Fragment::stat("CriticalStrike.AilmentMultiplier"),
        )
        .add_fixed("accuracy( rating)?", Fragment::stat("Accuracy"))
        .add_fixed("attack speed", Fragment::stat("Speed").with_condition(with(Keyword::Attack)))
        .add_fixed("cast speed", Fragment::stat("Speed").with_condition(with(Keyword::Spell)))
        .add_fixed("attack and cast speed", Fragment::stat("Speed"))
        .add_fixed("projectile speed", Fragment::stat("Projectile.Speed"))
        .add_fixed("area of effect( of skills)?", Fragment::stat("AreaOfEffect"))
        .add_fixed("(skill effect )?duration", Fragment::stat("Duration"))
        .add_fixed("chance to deal double damage", Fragment::stat("Damage.DoubleChance"))
        // defense
        .add_fixed("armour", Fragment::stat("Armour"))
        .add_fixed("evasion( rating)?", Fragment::stat("Evasion"))
        .add_fixed("armour and evasion( rating)?", stats(["Armour", "Evasion"]))
        .add_fixed("armour and energy shield", stats(["Armour", "EnergyShield.Maximum"]))
        .add_fixed("evasion( rating)? and energy shield", stats(["Evasion", "EnergyShield.Maximum"]))
        .add_fixed("(global )?defences", stats(["Armour", "Evasion", "EnergyShield.Maximum"]))
        .add("({DamageTypeMatchers}) resistance", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.resistance()))
        })
        .add("maximum ({DamageTypeMatchers}) resistance", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.max_resistance()))
        })
        .add_fixed(
            "(all )?elemental resistances",
            Fragment::stats(DamageType::ELEMENTAL.map(DamageType::resistance)),
        )
        .add_fixed(
            "(all )?maximum elemental resistances",
            Fragment::stats(DamageType::ELEMENTAL.map(DamageType::max_resistance)),
        )
        .add_fixed("physical damage reduction", Fragment::stat(DamageType::Physical.resistance()))
        .add_fixed("chance to block( attack damage)?", Fragment::stat("Block.AttackChance"))
        .add_fixed("chance to block spell damage", Fragment::stat("Block.SpellChance"))
        .add_fixed(
            "chance to block (spell and attack|attack and spell) damage",
            stats(["Block.AttackChance", "Block.SpellChance"]),
        )
        .add_fixed("chance to evade( attacks)?", Fragment::stat("Evasion.Chance"))
        .add_fixed("chance to evade projectile attacks", Fragment::stat("Evasion.Chance.Projectile"))
        .add_fixed("chance to evade melee attacks", Fragment::stat("Evasion.Chance.Melee"))
        .add_fixed("chance to dodge attacks", Fragment::stat("Dodge.AttackChance"))
        .add_fixed("chance to dodge spell damage", Fragment::stat("Dodge.SpellChance"))
        .add_fixed("damage taken", Fragment::stat("Damage.Taken"))
        .add("({DamageTypeMatchers}) damage taken", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage_taken()))
        })
        .add_fixed("stun threshold", Fragment::stat("Stun.Threshold"))
        .add_fixed("stun duration( on enemies)?", Fragment::stat("Stun.Duration"))
        .add_fixed("movement speed", Fragment::stat("MovementSpeed"))
        // charges, buffs and ailments
        .add("maximum ({ChargeTypeMatchers})", |m| {
            Ok(Fragment::stat(m.charge_type(0)?.maximum()))
        })
        .add("({ChargeTypeMatchers}) duration", |m| {
            Ok(Fragment::stat(m.charge_type(0)?.duration()))
        })
        .add("({BuffMatchers}) duration", |m| Ok(Fragment::stat(m.buff(0)?.duration())))
        .add("(effect of ({BuffMatchers})|({BuffMatchers}) effect)", |m| {
            Ok(Fragment::stat(m.buff(0)?.effect()))
        })
        .add("({AilmentMatchers}) duration( on enemies)?", |m| {
            Ok(Fragment::stat(m.ailment(0)?.duration()))
        })
        .add("effect of ({AilmentMatchers})", |m| Ok(Fragment::stat(m.ailment(0)?.effect())))
        // misc
        .add_fixed("rampage stacks", Fragment::stat("RampageStacks"))
        .add_fixed("item quantity", Fragment::stat("ItemQuantity"))
        .add_fixed("item rarity", Fragment::stat("ItemRarity"))
        .add_fixed("light radius", Fragment::stat("LightRadius"))
        .add_fixed("flask effect duration", Fragment::stat("Flask.Duration"))
        .add_fixed("flask charges gained", Fragment::stat("Flask.ChargesGained"))
        .add_fixed("passive skill points?", Fragment::stat("PassivePoints.Maximum"))
        .add_fixed("knockback distance", Fragment::stat("Knockback.Distance"))
        .add_fixed("trap throwing speed", Fragment::stat("Trap.ThrowingSpeed"))
        .add_fixed("maximum number of summoned totems", Fragment::stat("Totem.Limit"));
    c
}

pub fn damage_stat_matchers() -> MatcherCollection {
    let mut c =
        MatcherCollection::new(ParsingStep::DamageStat).referenceable_as("DamageStatMatchers");
    c.add_fixed("damage", Fragment::stat("Damage"))
        .add("({DamageTypeMatchers}) damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()))
        })
        .add_fixed(
            "elemental damage",
            Fragment::stats(DamageType::ELEMENTAL.map(DamageType::damage)),
        )
        .add_fixed("attack damage", Fragment::stat("Damage").with_condition(with(Keyword::Attack)))
        .add("attack ({DamageTypeMatchers}) damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()).with_condition(with(Keyword::Attack)))
        })
        .add("({DamageTypeMatchers}) attack damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()).with_condition(with(Keyword::Attack)))
        })
        .add_fixed("spell damage", Fragment::stat("Damage").with_condition(with(Keyword::Spell)))
        .add("({DamageTypeMatchers}) spell damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()).with_condition(with(Keyword::Spell)))
        })
        .add_fixed("melee damage", Fragment::stat("Damage").with_condition(with(Keyword::Melee)))
        .add("melee ({DamageTypeMatchers}) damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage()).with_condition(with(Keyword::Melee)))
        })
        .add_fixed(
            "projectile damage",
            Fragment::stat("Damage").with_condition(with(Keyword::Projectile)),
        )
        .add("({DamageTypeMatchers}) projectile attack damage", |m| {
            Ok(Fragment::stat(m.damage_type(0)?.damage())
                .with_condition(with(Keyword::Projectile))
                .with_condition(with(Keyword::Attack)))
        })
        .add_fixed(
            "area damage",
            Fragment::stat("Damage").with_condition(with(Keyword::AreaOfEffect)),
        )
        .add_fixed(
            "weapon damage",
            Fragment::stat("Damage").with_condition(Condition::AttackWith(ItemTag::Weapon)),
        )
        .add_fixed("damage over time", Fragment::stat("Damage.OverTime"))
        .add("({AilmentMatchers}) damage", |m| Ok(Fragment::stat(m.ailment(0)?.damage())))
        .add("damage with ({AilmentMatchers})", |m| {
            Ok(Fragment::stat(m.ailment(0)?.damage()))
        });
    c
}

pub fn pool_stat_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::PoolStat).referenceable_as("PoolStatMatchers");
    c.add("maximum ({PoolMatchers})", |m| Ok(Fragment::stat(m.pool(0)?.maximum())))
        .add("({PoolMatchers})", |m| Ok(Fragment::stat(m.pool(0)?.maximum())))
        .add_fixed(
            "maximum life and mana",
            Fragment::stats([Pool::Life.maximum(), Pool::Mana.maximum()]),
        )
        .add("({PoolMatchers}) regeneration( rate)?", |m| {
            Ok(Fragment::stat(m.pool(0)?.regen()))
        })
        .add("({PoolMatchers}) recovery( rate)?", |m| {
            Ok(Fragment::stat(m.pool(0)?.recovery()))
        })
        .add("({PoolMatchers}) gained", |m| Ok(Fragment::stat(m.pool(0)?.gain())))
        .add("({PoolMatchers}) leech(ed)?", |m| Ok(Fragment::stat(m.pool(0)?.leech())))
        .add("({PoolMatchers}) cost( of skills)?", |m| Ok(Fragment::stat(m.pool(0)?.cost())))
        .add("({PoolMatchers}) reserved", |m| Ok(Fragment::stat(m.pool(0)?.reservation())))
        .add("({PoolMatchers}) reservation( of skills)?", |m| {
            Ok(Fragment::stat(m.pool(0)?.reservation()))
        })
        .add_fixed("energy shield recharge rate", Fragment::stat("EnergyShield.Recharge"))
        .add_fixed(
            "(faster )?start of energy shield recharge",
            Fragment::stat("EnergyShield.Recharge.Start"),
        );
    c
}
