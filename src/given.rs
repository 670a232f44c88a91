//! Given stats module.
//!
//! Stats every entity of a kind has regardless of items and passives:
//! base values, and lines like "+12 to maximum Life per Level" that are
//! written as stat lines and parsed like any other modifier text.

use crate::condition::Condition;
use crate::domain::{ChargeType, DamageType, Entity, Pool};
use crate::modifier::{Form, Modifier};
use crate::stat_id::StatId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A modifier given directly, without going through the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GivenStatEntry {
    pub form: Form,
    pub stat: StatId,
    pub value: Value,
    pub condition: Condition,
}

impl GivenStatEntry {
    pub fn new(form: Form, stat: impl Into<StatId>, value: impl Into<Value>) -> Self {
        Self {
            form,
            stat: stat.into(),
            value: value.into(),
            condition: Condition::True,
        }
    }

    pub fn into_modifier(self) -> Modifier {
        Modifier {
            form: self.form,
            stat: self.stat,
            value: self.value,
            condition: self.condition,
        }
    }
}

/// A provider of given stats for some entities.
///
/// # Examples
///
/// ```rust
/// use statline::given::{CharacterGivenStats, GivenStats};
/// use statline::domain::Entity;
///
/// let given = CharacterGivenStats::default();
/// assert_eq!(given.affected_entities(), &[Entity::Character]);
/// assert!(given.given_stat_lines().contains(&"+12 to maximum Life per Level"));
/// ```
pub trait GivenStats: Send + Sync {
    /// Entities these stats apply to.
    fn affected_entities(&self) -> &[Entity];

    /// Stat lines to run through the parser.
    fn given_stat_lines(&self) -> &[&'static str];

    /// Modifiers that need no parsing.
    fn given_modifiers(&self) -> Vec<GivenStatEntry>;
}

/// Class dependent starting values of a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterBaseStats {
    pub life: f64,
    pub mana: f64,
    pub strength: f64,
    pub dexterity: f64,
    pub intelligence: f64,
}

impl Default for CharacterBaseStats {
    fn default() -> Self {
        Self {
            life: 38.0,
            mana: 34.0,
            strength: 20.0,
            dexterity: 20.0,
            intelligence: 20.0,
        }
    }
}

const CHARACTER_LINES: &[&str] = &[
    // while dual wielding
    "10% more Attack Speed while Dual Wielding",
    "+15% chance to block attack damage while Dual Wielding",
    "20% more Attack Physical Damage while Dual Wielding",
    // charges
    "4% additional Physical Damage Reduction per Endurance Charge",
    "+4% to all Elemental Resistances per Endurance Charge",
    "4% increased Attack and Cast Speed per Frenzy Charge",
    "4% more Damage per Frenzy Charge",
    "40% increased Critical Strike Chance per Power Charge",
    // level based
    "+12 to maximum Life per Level",
    "+2 to Accuracy Rating per Level",
    "+3 to Evasion Rating per Level",
    "+6 to maximum Mana per Level",
    // attribute based
    "+1 to maximum Life per 2 Strength",
    "+1 to Strength Damage Bonus per Strength",
    "1% increased Melee Physical Damage per 5 Strength Damage Bonus ceiled",
    "+2 to Accuracy Rating per 1 Dexterity",
    "+1 to Dexterity Evasion Bonus per Dexterity",
    "1% increased Evasion Rating per 5 Dexterity Evasion Bonus ceiled",
    "+1 to Mana per 2 Intelligence ceiled",
    "1% increased maximum Energy Shield per 5 Intelligence ceiled",
    // rampage
    "Minions deal 2% increased Damage per 10 Rampage Stacks",
    "Minions gain 1% increased Movement Speed per 10 Rampage Stacks",
];

/// Given stats of player characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterGivenStats {
    base: CharacterBaseStats,
}

impl CharacterGivenStats {
    pub fn new(base: CharacterBaseStats) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &CharacterBaseStats {
        &self.base
    }
}

impl GivenStats for CharacterGivenStats {
    fn affected_entities(&self) -> &[Entity] {
        &[Entity::Character]
    }

    fn given_stat_lines(&self) -> &[&'static str] {
        CHARACTER_LINES
    }

    fn given_modifiers(&self) -> Vec<GivenStatEntry> {
        let base = &self.base;
        let mut entries = vec![
            GivenStatEntry::new(Form::BaseSet, Pool::Life.maximum(), base.life),
            GivenStatEntry::new(Form::BaseSet, Pool::Mana.maximum(), base.mana),
            GivenStatEntry::new(Form::BaseSet, "Strength", base.strength),
            GivenStatEntry::new(Form::BaseSet, "Dexterity", base.dexterity),
            GivenStatEntry::new(Form::BaseSet, "Intelligence", base.intelligence),
            GivenStatEntry::new(Form::BaseSet, "Evasion", 53.0),
            GivenStatEntry::new(Form::BaseSet, "Accuracy", -2.0),
            GivenStatEntry::new(Form::BaseSet, "CriticalStrike.Multiplier", 150.0),
            GivenStatEntry::new(Form::BaseSet, Pool::Mana.regen_percent(), 1.75),
            GivenStatEntry::new(Form::BaseSet, DamageType::Physical.max_resistance(), 90.0),
            GivenStatEntry::new(Form::BaseSet, DamageType::Chaos.max_resistance(), 75.0),
            GivenStatEntry::new(Form::BaseSet, "Block.AttackChance.Maximum", 75.0),
            GivenStatEntry::new(Form::BaseSet, "PassivePoints.Maximum", Value::stat("Level") + 21.0),
        ];
        entries.extend(
            DamageType::ELEMENTAL
                .iter()
                .map(|t| GivenStatEntry::new(Form::BaseSet, t.max_resistance(), 75.0)),
        );
        entries.extend(
            ChargeType::ALL
                .iter()
                .map(|c| GivenStatEntry::new(Form::BaseSet, c.maximum(), 3.0)),
        );
        entries
    }
}

/// Given stats of enemies.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonsterGivenStats;

impl GivenStats for MonsterGivenStats {
    fn affected_entities(&self) -> &[Entity] {
        &[Entity::Enemy]
    }

    fn given_stat_lines(&self) -> &[&'static str] {
        &[]
    }

    fn given_modifiers(&self) -> Vec<GivenStatEntry> {
        let mut entries = vec![
            GivenStatEntry::new(Form::BaseSet, "CriticalStrike.Multiplier", 130.0),
            GivenStatEntry::new(Form::BaseSet, DamageType::Physical.max_resistance(), 90.0),
            GivenStatEntry::new(Form::BaseSet, DamageType::Chaos.max_resistance(), 75.0),
        ];
        entries.extend(
            DamageType::ELEMENTAL
                .iter()
                .map(|t| GivenStatEntry::new(Form::BaseSet, t.max_resistance(), 75.0)),
        );
        entries
    }
}

/// Every built-in given stats provider.
pub fn builtin_given_stats(base: CharacterBaseStats) -> Vec<Box<dyn GivenStats>> {
    vec![
        Box::new(CharacterGivenStats::new(base)),
        Box::new(MonsterGivenStats),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_base_values() {
        let given = CharacterGivenStats::new(CharacterBaseStats {
            life: 50.0,
            ..CharacterBaseStats::default()
        });
        let life = given
            .given_modifiers()
            .into_iter()
            .find(|e| e.stat == Pool::Life.maximum())
            .unwrap();
        assert_eq!(life.form, Form::BaseSet);
        assert_eq!(life.value, Value::Const(50.0));
    }

    #[test]
    fn test_character_has_all_max_resistances() {
        let entries = CharacterGivenStats::default().given_modifiers();
        for damage_type in DamageType::ALL {
            assert!(entries.iter().any(|e| e.stat == damage_type.max_resistance()));
        }
    }

    #[test]
    fn test_monster_given_stats() {
        let given = MonsterGivenStats;
        assert_eq!(given.affected_entities(), &[Entity::Enemy]);
        assert!(given.given_stat_lines().is_empty());
        assert_eq!(given.given_modifiers().len(), 6);
    }

    #[test]
    fn test_into_modifier() {
        let modifier = GivenStatEntry::new(Form::BaseSet, "Evasion", 53.0).into_modifier();
        assert_eq!(modifier, Modifier::new(Form::BaseSet, "Evasion", 53.0));
    }

    #[test]
    fn test_builtin_providers() {
        let providers = builtin_given_stats(CharacterBaseStats::default());
        assert_eq!(providers.len(), 2);
    }
}
