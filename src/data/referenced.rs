//! Referenced typed tables: `{ActionMatchers}`, `{DamageTypeMatchers}`, ...

use crate::context::Reference;
use crate::domain::{
    Action, Ailment, Buff, ChargeType, DamageType, ItemSlot, Keyword, Pool, SkillDefinition,
};
use crate::matcher::ReferencedMatcherCollection;

/// Every referenced table, the skill table built from `skills`.
pub fn referenced_collections(skills: &[SkillDefinition]) -> Vec<ReferencedMatcherCollection> {
    vec![
        actions(),
        ailments(),
        buffs(),
        charge_types(),
        damage_types(),
        item_slots(),
        keywords(),
        pools(),
        skill_matchers(skills),
    ]
}

fn table<T: Copy>(
    name: &str,
    wrap: fn(T) -> Reference,
    entries: &[(&str, T)],
) -> ReferencedMatcherCollection {
    let mut collection = ReferencedMatcherCollection::new(name);
    for &(pattern, item) in entries {
        collection.add(pattern, wrap(item));
    }
    collection
}

pub fn actions() -> ReferencedMatcherCollection {
    table(
        "ActionMatchers",
        Reference::Action,
        &[
            ("kill", Action::Kill),
            ("killed", Action::Kill),
            ("block", Action::Block),
            ("blocked", Action::Block),
            ("hit", Action::Hit),
            ("critical strike", Action::CriticalStrike),
            ("crit", Action::CriticalStrike),
            ("critically struck", Action::CriticalStrike),
            ("shatter", Action::Shatter),
            ("shattered", Action::Shatter),
            ("stun", Action::Stun),
            ("stunned", Action::Stun),
        ],
    )
}

pub fn ailments() -> ReferencedMatcherCollection {
    table(
        "AilmentMatchers",
        Reference::Ailment,
        &[
            ("ignite", Ailment::Ignite),
            ("ignited", Ailment::Ignite),
            ("burning", Ailment::Ignite),
            ("shock", Ailment::Shock),
            ("shocked", Ailment::Shock),
            ("freeze", Ailment::Freeze),
            ("frozen", Ailment::Freeze),
            ("chill", Ailment::Chill),
            ("chilled", Ailment::Chill),
            ("bleed", Ailment::Bleed),
            ("bleeding", Ailment::Bleed),
            ("poison", Ailment::Poison),
            ("poisoned", Ailment::Poison),
        ],
    )
}

pub fn buffs() -> ReferencedMatcherCollection {
    table(
        "BuffMatchers",
        Reference::Buff,
        &[
            ("onslaught", Buff::Onslaught),
            ("fortify", Buff::Fortify),
            ("fortified", Buff::Fortify),
            ("phasing", Buff::Phasing),
            ("unholy might", Buff::UnholyMight),
            ("tailwind", Buff::Tailwind),
            ("arcane surge", Buff::ArcaneSurge),
            ("elusive", Buff::Elusive),
            ("maim", Buff::Maim),
            ("maimed", Buff::Maim),
            ("blind", Buff::Blind),
            ("blinded", Buff::Blind),
            ("taunt", Buff::Taunt),
            ("taunted", Buff::Taunt),
            ("intimidate", Buff::Intimidate),
            ("intimidated", Buff::Intimidate),
        ],
    )
}

pub fn charge_types() -> ReferencedMatcherCollection {
    table(
        "ChargeTypeMatchers",
        Reference::ChargeType,
        &[
            ("endurance charges?", ChargeType::Endurance),
            ("frenzy charges?", ChargeType::Frenzy),
            ("power charges?", ChargeType::Power),
        ],
    )
}

pub fn damage_types() -> ReferencedMatcherCollection {
    table(
        "DamageTypeMatchers",
        Reference::DamageType,
        &[
            ("physical", DamageType::Physical),
            ("fire", DamageType::Fire),
            ("cold", DamageType::Cold),
            ("lightning", DamageType::Lightning),
            ("chaos", DamageType::Chaos),
        ],
    )
}

pub fn item_slots() -> ReferencedMatcherCollection {
    table(
        "ItemSlotMatchers",
        Reference::ItemSlot,
        &[
            ("main hand( weapon)?", ItemSlot::MainHand),
            ("off hand( weapon)?", ItemSlot::OffHand),
            ("shield", ItemSlot::OffHand),
            ("helmet", ItemSlot::Helm),
            ("body armour", ItemSlot::BodyArmour),
            ("gloves", ItemSlot::Gloves),
            ("boots", ItemSlot::Boots),
            ("amulet", ItemSlot::Amulet),
            ("rings?", ItemSlot::Ring),
            ("belt", ItemSlot::Belt),
        ],
    )
}

pub fn keywords() -> ReferencedMatcherCollection {
    table(
        "KeywordMatchers",
        Reference::Keyword,
        &[
            ("attacks?", Keyword::Attack),
            ("spells?", Keyword::Spell),
            ("projectiles?", Keyword::Projectile),
            ("area skills", Keyword::AreaOfEffect),
            ("melee", Keyword::Melee),
            ("totems?", Keyword::Totem),
            ("traps?", Keyword::Trap),
            ("mines?", Keyword::Mine),
            ("minions?", Keyword::Minion),
            ("auras?", Keyword::Aura),
            ("curses?", Keyword::Curse),
            ("warcr(y|ies)", Keyword::Warcry),
            ("movement skills", Keyword::Movement),
            ("vaal skills", Keyword::Vaal),
            ("golems?", Keyword::Golem),
            ("channelling skills", Keyword::Channelling),
            ("brands?", Keyword::Brand),
        ],
    )
}

pub fn pools() -> ReferencedMatcherCollection {
    table(
        "PoolMatchers",
        Reference::Pool,
        &[
            ("life", Pool::Life),
            ("mana", Pool::Mana),
            ("energy shield", Pool::EnergyShield),
        ],
    )
}

/// `SkillMatchers`: one entry per skill, matched by its lowercased display name.
pub fn skill_matchers(skills: &[SkillDefinition]) -> ReferencedMatcherCollection {
    let mut collection = ReferencedMatcherCollection::new("SkillMatchers");
    for skill in skills {
        collection.add(
            &regex::escape(&skill.display_name.to_lowercase()),
            Reference::Skill(skill.id.clone()),
        );
    }
    collection
}
