//! Modifier conditions.

use crate::domain::{Action, Ailment, Buff, DamageType, Entity, ItemSlot, ItemTag, Keyword};
use crate::stat_id::StatId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A predicate that must hold for a modifier to apply.
///
/// Conditions produced by several matched fragments are combined with
/// [`Condition::and`], which drops `True` operands and flattens nested
/// conjunctions, so a line without any condition text yields plain `True`.
///
/// # Examples
///
/// ```rust
/// use statline::Condition;
/// use statline::domain::{ItemTag, Keyword};
///
/// let c = Condition::True
///     .and(Condition::With(Keyword::Attack))
///     .and(Condition::AttackWith(ItemTag::Bow));
/// assert_eq!(
///     c,
///     Condition::And(vec![
///         Condition::With(Keyword::Attack),
///         Condition::AttackWith(ItemTag::Bow),
///     ])
/// );
/// assert_eq!(Condition::True.and(Condition::True), Condition::True);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    True,
    /// The skill has the keyword.
    With(Keyword),
    /// The skill is the given one (by skill id).
    WithSkill(String),
    /// The skill deals damage of the given type.
    WithDamageType(DamageType),
    /// The hit is an attack made with an item of the given class.
    AttackWith(ItemTag),
    /// An item of the given class is equipped in the slot.
    Equipped { slot: ItemSlot, tag: ItemTag },
    /// Only the base values of the item in the slot are affected.
    BaseValueFrom(ItemSlot),
    /// The modifier applies to another entity.
    For(Entity),
    AilmentOn { ailment: Ailment, entity: Entity },
    BuffOn { buff: Buff, entity: Entity },
    Recently { action: Action, entity: Entity },
    InPastSeconds {
        action: Action,
        entity: Entity,
        seconds: Value,
    },
    /// Triggered when the action happens.
    On { action: Action, entity: Entity },
    /// `value >= threshold`.
    AtLeast { value: Value, threshold: Value },
    /// A named boolean game state, e.g. `Life.IsLow`.
    State(StatId),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn state(stat: impl Into<StatId>) -> Self {
        Condition::State(stat.into())
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Condition::True)
    }

    /// Conjunction; `True` is the identity and nested `And`s are flattened.
    pub fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::True, c) | (c, Condition::True) => c,
            (Condition::And(mut a), Condition::And(b)) => {
                a.extend(b);
                Condition::And(a)
            }
            (Condition::And(mut a), c) => {
                a.push(c);
                Condition::And(a)
            }
            (c, Condition::And(b)) => {
                let mut all = Vec::with_capacity(b.len() + 1);
                all.push(c);
                all.extend(b);
                Condition::And(all)
            }
            (a, b) => Condition::And(vec![a, b]),
        }
    }

    /// Disjunction; nested `Or`s are flattened.
    pub fn or(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::Or(mut a), Condition::Or(b)) => {
                a.extend(b);
                Condition::Or(a)
            }
            (Condition::Or(mut a), c) => {
                a.push(c);
                Condition::Or(a)
            }
            (a, b) => Condition::Or(vec![a, b]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Condition {
        match self {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    /// Disjunction over all conditions.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Condition {
        Condition::Or(conditions.into_iter().collect())
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::True
    }
}
