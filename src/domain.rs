//! Typed game vocabulary.
//!
//! Matcher tables capture these types through referenced collections
//! (`{DamageTypeMatchers}`, `{AilmentMatchers}`, ...) and turn them into
//! stat identities with the helper methods below. Keeping every stat name
//! behind a method means a typo in a matcher table is a compile error,
//! not a silently different stat.

use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};

/// Who a modifier or condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Character,
    Enemy,
    Minion,
    Totem,
    Ally,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Entity::Character => "Character",
            Entity::Enemy => "Enemy",
            Entity::Minion => "Minion",
            Entity::Totem => "Totem",
            Entity::Ally => "Ally",
        }
    }
}

/// Damage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

impl DamageType {
    pub const ALL: [DamageType; 5] = [
        DamageType::Physical,
        DamageType::Fire,
        DamageType::Cold,
        DamageType::Lightning,
        DamageType::Chaos,
    ];

    pub const ELEMENTAL: [DamageType; 3] =
        [DamageType::Fire, DamageType::Cold, DamageType::Lightning];

    pub fn name(self) -> &'static str {
        match self {
            DamageType::Physical => "Physical",
            DamageType::Fire => "Fire",
            DamageType::Cold => "Cold",
            DamageType::Lightning => "Lightning",
            DamageType::Chaos => "Chaos",
        }
    }

    fn stat(self, path: &str) -> StatId {
        StatId::from(format!("{}.{}", self.name(), path))
    }

    pub fn damage(self) -> StatId {
        self.stat("Damage")
    }

    pub fn damage_taken(self) -> StatId {
        self.stat("Damage.Taken")
    }

    pub fn resistance(self) -> StatId {
        self.stat("Resistance")
    }

    pub fn max_resistance(self) -> StatId {
        self.stat("Resistance.Maximum")
    }

    pub fn penetration(self) -> StatId {
        self.stat("Penetration")
    }

    /// Share of this type's damage converted to `target`.
    pub fn conversion_to(self, target: DamageType) -> StatId {
        self.damage().child("ConvertTo").child(target.name())
    }

    /// Share of this type's damage taken that bypasses energy shield.
    pub fn energy_shield_bypass(self) -> StatId {
        self.damage().child("BypassesEnergyShield")
    }

    /// Share of this type's damage gained as extra `target` damage.
    pub fn gain_as(self, target: DamageType) -> StatId {
        self.damage().child("GainAs").child(target.name())
    }
}

/// Status ailments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ailment {
    Ignite,
    Shock,
    Freeze,
    Chill,
    Bleed,
    Poison,
}

impl Ailment {
    pub const ELEMENTAL: [Ailment; 4] =
        [Ailment::Ignite, Ailment::Shock, Ailment::Freeze, Ailment::Chill];

    pub fn name(self) -> &'static str {
        match self {
            Ailment::Ignite => "Ignite",
            Ailment::Shock => "Shock",
            Ailment::Freeze => "Freeze",
            Ailment::Chill => "Chill",
            Ailment::Bleed => "Bleed",
            Ailment::Poison => "Poison",
        }
    }

    fn stat(self, path: &str) -> StatId {
        StatId::from(format!("{}.{}", self.name(), path))
    }

    pub fn chance(self) -> StatId {
        self.stat("Chance")
    }

    pub fn avoidance(self) -> StatId {
        self.stat("Avoidance")
    }

    pub fn duration(self) -> StatId {
        self.stat("Duration")
    }

    pub fn effect(self) -> StatId {
        self.stat("Effect")
    }

    pub fn damage(self) -> StatId {
        self.stat("Damage")
    }

    /// Number of instances of this ailment currently on `entity`.
    pub fn instances_on(self, entity: Entity) -> StatId {
        self.stat("Instances").scoped(entity.name())
    }
}

/// Resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pool {
    Life,
    Mana,
    EnergyShield,
}

impl Pool {
    pub fn name(self) -> &'static str {
        match self {
            Pool::Life => "Life",
            Pool::Mana => "Mana",
            Pool::EnergyShield => "EnergyShield",
        }
    }

    fn stat(self, path: &str) -> StatId {
        StatId::from(format!("{}.{}", self.name(), path))
    }

    pub fn maximum(self) -> StatId {
        self.stat("Maximum")
    }

    pub fn regen(self) -> StatId {
        self.stat("Regen")
    }

    pub fn regen_percent(self) -> StatId {
        self.stat("Regen.Percent")
    }

    pub fn recovery(self) -> StatId {
        self.stat("Recovery")
    }

    pub fn reservation(self) -> StatId {
        self.stat("Reservation")
    }

    pub fn cost(self) -> StatId {
        self.stat("Cost")
    }

    pub fn gain(self) -> StatId {
        self.stat("Gain")
    }

    pub fn leech(self) -> StatId {
        self.stat("Leech")
    }

    /// Leech into this pool based on the given damage stat.
    pub fn leech_of(self, damage: &StatId) -> StatId {
        self.stat(&format!("Leech.Of.{}", damage))
    }
}

/// Charge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeType {
    Endurance,
    Frenzy,
    Power,
}

impl ChargeType {
    pub const ALL: [ChargeType; 3] = [ChargeType::Endurance, ChargeType::Frenzy, ChargeType::Power];

    pub fn name(self) -> &'static str {
        match self {
            ChargeType::Endurance => "Endurance",
            ChargeType::Frenzy => "Frenzy",
            ChargeType::Power => "Power",
        }
    }

    fn stat(self, path: &str) -> StatId {
        StatId::from(format!("{}.Charge.{}", self.name(), path))
    }

    pub fn amount(self) -> StatId {
        self.stat("Amount")
    }

    pub fn maximum(self) -> StatId {
        self.stat("Maximum")
    }

    pub fn duration(self) -> StatId {
        self.stat("Duration")
    }

    pub fn chance_to_gain(self) -> StatId {
        self.stat("ChanceToGain")
    }
}

/// Buffs and debuffs that can be active on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Buff {
    Onslaught,
    Fortify,
    Phasing,
    UnholyMight,
    Tailwind,
    ArcaneSurge,
    Elusive,
    Maim,
    Blind,
    Taunt,
    Intimidate,
}

impl Buff {
    pub fn name(self) -> &'static str {
        match self {
            Buff::Onslaught => "Onslaught",
            Buff::Fortify => "Fortify",
            Buff::Phasing => "Phasing",
            Buff::UnholyMight => "UnholyMight",
            Buff::Tailwind => "Tailwind",
            Buff::ArcaneSurge => "ArcaneSurge",
            Buff::Elusive => "Elusive",
            Buff::Maim => "Maim",
            Buff::Blind => "Blind",
            Buff::Taunt => "Taunt",
            Buff::Intimidate => "Intimidate",
        }
    }

    fn stat(self, path: &str) -> StatId {
        StatId::from(format!("{}.{}", self.name(), path))
    }

    pub fn active(self) -> StatId {
        self.stat("Active")
    }

    pub fn effect(self) -> StatId {
        self.stat("Effect")
    }

    pub fn duration(self) -> StatId {
        self.stat("Duration")
    }
}

/// Skill keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Attack,
    Spell,
    Projectile,
    AreaOfEffect,
    Melee,
    Totem,
    Trap,
    Mine,
    Minion,
    Aura,
    Curse,
    Warcry,
    Movement,
    Vaal,
    Golem,
    Channelling,
    Brand,
}

/// Actions that triggers and "recently" conditions refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Kill,
    Block,
    Hit,
    CriticalStrike,
    Shatter,
    Stun,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Kill => "Kill",
            Action::Block => "Block",
            Action::Hit => "Hit",
            Action::CriticalStrike => "CriticalStrike",
            Action::Shatter => "Shatter",
            Action::Stun => "Stun",
        }
    }

    /// How often `entity` performed this action recently.
    pub fn recent_count(self, entity: Entity) -> StatId {
        StatId::from(format!("{}.{}.CountRecently", entity.name(), self.name()))
    }
}

/// Equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSlot {
    MainHand,
    OffHand,
    Helm,
    BodyArmour,
    Gloves,
    Boots,
    Amulet,
    Ring,
    Belt,
}

/// Item classes conditions test equipped items against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemTag {
    Weapon,
    OneHandWeapon,
    TwoHandWeapon,
    Bow,
    Sword,
    Axe,
    Mace,
    Dagger,
    Claw,
    Wand,
    Staff,
    Shield,
}

/// A skill supplied by the host application, e.g. loaded from game files.
///
/// Skills are matched by their display name and referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub display_name: String,
}

impl SkillDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
