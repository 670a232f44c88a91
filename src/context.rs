//! Match context module.
//!
//! A [`MatchContext`] holds what a matcher captured: the numeric values
//! behind `#` placeholders and the typed references behind `{Name}`
//! placeholders, both in left-to-right order. Templates read it through
//! typed accessors that fail with a [`TemplateError`] instead of panicking
//! when a table entry asks for something its pattern does not capture.

use crate::condition::Condition;
use crate::domain::{Action, Ailment, Buff, ChargeType, DamageType, ItemSlot, Keyword, Pool};
use crate::error::TemplateError;
use crate::stat_id::StatId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A stat captured through a referenceable stat collection, together with
/// the condition that stat matcher attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatReference {
    pub stat: StatId,
    pub condition: Condition,
}

/// A typed value captured by a `{Name}` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reference {
    Action(Action),
    Ailment(Ailment),
    Buff(Buff),
    ChargeType(ChargeType),
    DamageType(DamageType),
    ItemSlot(ItemSlot),
    Keyword(Keyword),
    Pool(Pool),
    /// Skill id.
    Skill(String),
    Stat(StatReference),
}

impl Reference {
    pub fn kind(&self) -> &'static str {
        match self {
            Reference::Action(_) => "action",
            Reference::Ailment(_) => "ailment",
            Reference::Buff(_) => "buff",
            Reference::ChargeType(_) => "charge type",
            Reference::DamageType(_) => "damage type",
            Reference::ItemSlot(_) => "item slot",
            Reference::Keyword(_) => "keyword",
            Reference::Pool(_) => "pool",
            Reference::Skill(_) => "skill",
            Reference::Stat(_) => "stat",
        }
    }
}

/// Values and references captured by one match.
///
/// # Examples
///
/// ```rust
/// use statline::context::{MatchContext, Reference};
/// use statline::domain::DamageType;
/// use statline::Value;
///
/// let ctx = MatchContext::new(
///     vec![Value::Const(5.0), Value::Const(10.0)],
///     vec![Reference::DamageType(DamageType::Fire)],
/// );
/// assert_eq!(ctx.values(1).unwrap(), Value::Const(10.0));
/// assert_eq!(ctx.damage_type(0).unwrap(), DamageType::Fire);
/// assert!(ctx.ailment(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchContext {
    values: Vec<Value>,
    references: Vec<Reference>,
}

macro_rules! typed_reference {
    ($(#[$doc:meta])* $fn_name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        $(#[$doc])*
        pub fn $fn_name(&self, index: usize) -> Result<$ty, TemplateError> {
            match self.references(index)? {
                Reference::$variant(inner) => Ok(inner.clone()),
                other => Err(TemplateError::ReferenceKind {
                    index,
                    expected: $expected,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl MatchContext {
    pub fn new(values: Vec<Value>, references: Vec<Reference>) -> Self {
        Self { values, references }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The only captured value.
    pub fn value(&self) -> Result<Value, TemplateError> {
        self.values(0)
    }

    pub fn values(&self, index: usize) -> Result<Value, TemplateError> {
        self.values
            .get(index)
            .cloned()
            .ok_or(TemplateError::MissingValue {
                index,
                count: self.values.len(),
            })
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn references(&self, index: usize) -> Result<&Reference, TemplateError> {
        self.references
            .get(index)
            .ok_or(TemplateError::MissingReference {
                index,
                count: self.references.len(),
            })
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    typed_reference!(action, Action, Action, "action");
    typed_reference!(ailment, Ailment, Ailment, "ailment");
    typed_reference!(buff, Buff, Buff, "buff");
    typed_reference!(charge_type, ChargeType, ChargeType, "charge type");
    typed_reference!(damage_type, DamageType, DamageType, "damage type");
    typed_reference!(item_slot, ItemSlot, ItemSlot, "item slot");
    typed_reference!(keyword, Keyword, Keyword, "keyword");
    typed_reference!(pool, Pool, Pool, "pool");
    typed_reference!(
        /// Skill id.
        skill, Skill, String, "skill"
    );
    typed_reference!(stat, Stat, StatReference, "stat");
}
