//! Condition and action condition collections.

use crate::condition::Condition;
use crate::domain::{Action, Entity, ItemSlot, ItemTag, Keyword};
use crate::matcher::MatcherCollection;
use crate::modifier::Fragment;
use crate::step::ParsingStep;
use crate::value::Value;

fn condition(condition: Condition) -> Fragment {
    Fragment::condition(condition)
}

fn state(stat: &str) -> Fragment {
    condition(Condition::state(stat))
}

fn equipped(slot: ItemSlot, tag: ItemTag) -> Condition {
    Condition::Equipped { slot, tag }
}

pub fn condition_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::Condition);
    c
        // equipment
        .add_fixed("with bows", condition(Condition::AttackWith(ItemTag::Bow)))
        .add_fixed("with swords", condition(Condition::AttackWith(ItemTag::Sword)))
        .add_fixed("with axes", condition(Condition::AttackWith(ItemTag::Axe)))
        .add_fixed("with maces", condition(Condition::AttackWith(ItemTag::Mace)))
        .add_fixed("with daggers", condition(Condition::AttackWith(ItemTag::Dagger)))
        .add_fixed("with claws", condition(Condition::AttackWith(ItemTag::Claw)))
        .add_fixed("with wands", condition(Condition::AttackWith(ItemTag::Wand)))
        .add_fixed("with staves", condition(Condition::AttackWith(ItemTag::Staff)))
        .add_fixed("with weapons", condition(Condition::AttackWith(ItemTag::Weapon)))
        .add_fixed(
            "with one handed (melee )?weapons",
            condition(Condition::AttackWith(ItemTag::OneHandWeapon)),
        )
        .add_fixed(
            "with two handed (melee )?weapons",
            condition(Condition::AttackWith(ItemTag::TwoHandWeapon)),
        )
        .add_fixed(
            "while dual wielding",
            condition(equipped(ItemSlot::OffHand, ItemTag::Weapon)),
        )
        .add_fixed(
            "while holding a shield",
            condition(equipped(ItemSlot::OffHand, ItemTag::Shield)),
        )
        .add_fixed(
            "while wielding a two handed weapon",
            condition(equipped(ItemSlot::MainHand, ItemTag::TwoHandWeapon)),
        )
        .add_fixed(
            "while wielding a staff",
            condition(equipped(ItemSlot::MainHand, ItemTag::Staff)),
        )
        .add("from equipped ({ItemSlotMatchers})", |m| {
            Ok(condition(Condition::BaseValueFrom(m.item_slot(0)?)))
        })
        // pools
        .add_fixed("(when|while) on low life", state("Life.IsLow"))
        .add_fixed("(when|while) on full life", state("Life.IsFull"))
        .add_fixed("while on low mana", state("Mana.IsLow"))
        .add_fixed("while (your )?energy shield is full", state("EnergyShield.IsFull"))
        .add_fixed("while you have no energy shield", state("EnergyShield.IsEmpty"))
        .add_fixed("while leeching", state("Life.IsLeeching"))
        // buffs, charges and ailments
        .add("while you have ({BuffMatchers})", |m| {
            Ok(condition(Condition::BuffOn {
                buff: m.buff(0)?,
                entity: Entity::Character,
            }))
        })
        .add("(against|to) ({BuffMatchers}) enemies", |m| {
            Ok(condition(Condition::BuffOn {
                buff: m.buff(0)?,
                entity: Entity::Enemy,
            }))
        })
        .add("(against|to|with hits against) ({AilmentMatchers}) enemies", |m| {
            Ok(condition(Condition::AilmentOn {
                ailment: m.ailment(0)?,
                entity: Entity::Enemy,
            }))
        })
        .add("while (you are )?({AilmentMatchers})", |m| {
            Ok(condition(Condition::AilmentOn {
                ailment: m.ailment(0)?,
                entity: Entity::Character,
            }))
        })
        .add("while you have at least # ({ChargeTypeMatchers})", |m| {
            Ok(condition(Condition::AtLeast {
                value: Value::stat(m.charge_type(0)?.amount()),
                threshold: m.value()?,
            }))
        })
        .add("while you have no ({ChargeTypeMatchers})", |m| {
            Ok(condition(Condition::not(Condition::AtLeast {
                value: Value::stat(m.charge_type(0)?.amount()),
                threshold: Value::Const(1.0),
            })))
        })
        .add("if you have at least # ({StatMatchers})", |m| {
            let stat = m.stat(0)?;
            Ok(condition(
                Condition::AtLeast {
                    value: Value::stat(stat.stat),
                    threshold: m.value()?,
                }
                .and(stat.condition),
            ))
        })
        .add("with # corrupted items equipped", |m| {
            Ok(condition(Condition::AtLeast {
                value: Value::stat("Equipment.CorruptedCount"),
                threshold: m.value()?,
            }))
        })
        // keywords and skills
        .add("(with|for|of|to) ({KeywordMatchers})", |m| {
            Ok(condition(Condition::With(m.keyword(0)?)))
        })
        .add("({KeywordMatchers}) (deal|have)", |m| {
            Ok(condition(Condition::With(m.keyword(0)?)))
        })
        .add("({SkillMatchers})", |m| Ok(condition(Condition::WithSkill(m.skill(0)?))))
        .add("(with|of|for) ({SkillMatchers})", |m| {
            Ok(condition(Condition::WithSkill(m.skill(0)?)))
        })
        .add("({DamageTypeMatchers}) skills", |m| {
            Ok(condition(Condition::WithDamageType(m.damage_type(0)?)))
        })
        // recently
        .add("if you've ({ActionMatchers})( an enemy)? recently", |m| {
            Ok(condition(Condition::Recently {
                action: m.action(0)?,
                entity: Entity::Character,
            }))
        })
        .add("if you've been ({ActionMatchers}) recently", |m| {
            Ok(condition(Condition::Recently {
                action: m.action(0)?,
                entity: Entity::Enemy,
            }))
        })
        .add("if you haven't ({ActionMatchers})( an enemy)? recently", |m| {
            Ok(condition(Condition::not(Condition::Recently {
                action: m.action(0)?,
                entity: Entity::Character,
            })))
        })
        .add(
            "if you've ({ActionMatchers})( an enemy)? in the past # seconds",
            |m| {
                Ok(condition(Condition::InPastSeconds {
                    action: m.action(0)?,
                    entity: Entity::Character,
                    seconds: m.value()?,
                }))
            },
        )
        // entities
        .add_fixed("(to|for) you and nearby allies", condition(Condition::For(Entity::Ally)))
        .add_fixed("(to|for) totems", condition(Condition::For(Entity::Totem)));
    c
}

pub fn action_condition_matchers() -> MatcherCollection {
    let mut c = MatcherCollection::new(ParsingStep::ActionCondition);
    c.add("on ({ActionMatchers})", |m| {
        Ok(condition(Condition::On {
            action: m.action(0)?,
            entity: Entity::Character,
        }))
    })
    .add("when you ({ActionMatchers})( an enemy)?", |m| {
        Ok(condition(Condition::On {
            action: m.action(0)?,
            entity: Entity::Character,
        }))
    })
    .add("when you ({ActionMatchers}) an? ({AilmentMatchers}) enemy", |m| {
        Ok(condition(
            Condition::On {
                action: m.action(0)?,
                entity: Entity::Character,
            }
            .and(Condition::AilmentOn {
                ailment: m.ailment(1)?,
                entity: Entity::Enemy,
            }),
        ))
    })
    .add_fixed(
        "when (you are )?hit",
        condition(Condition::On {
            action: Action::Hit,
            entity: Entity::Enemy,
        }),
    )
    .add_fixed(
        "when you take a critical strike",
        condition(Condition::On {
            action: Action::CriticalStrike,
            entity: Entity::Enemy,
        }),
    )
    .add_fixed(
        "when you block",
        condition(Condition::On {
            action: Action::Block,
            entity: Entity::Character,
        }),
    )
    .add_fixed(
        "for each enemy hit by your attacks",
        condition(
            Condition::On {
                action: Action::Hit,
                entity: Entity::Character,
            }
            .and(Condition::With(Keyword::Attack)),
        ),
    );
    c
}
