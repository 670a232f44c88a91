//! Stat identifier module.
//!
//! Provides the `StatId` type, an interned string identifier for stats.
//! Identifiers are dotted paths such as `"CriticalStrike.Chance"` or
//! `"Fire.Damage.ConvertTo.Cold"`; composition helpers build them from
//! smaller segments so matcher tables never hand-assemble strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned string identifier for stats.
///
/// Uses `Arc<str>` for cheap clones and fast comparison.
///
/// # Examples
///
/// ```rust
/// use statline::StatId;
///
/// let chance = StatId::from_str("CriticalStrike").child("Chance");
/// assert_eq!(chance.as_str(), "CriticalStrike.Chance");
///
/// let same: StatId = "CriticalStrike.Chance".into();
/// assert_eq!(chance, same);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatId(Arc<str>);

impl Serialize for StatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StatId::from(s))
    }
}

impl StatId {
    /// Create a new `StatId` from a string slice.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `StatId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a path segment: `Life` + `Maximum` is `Life.Maximum`.
    pub fn child(&self, segment: &str) -> StatId {
        StatId::from(format!("{}.{}", self.0, segment))
    }

    /// Prepend a scope segment: `Enemy` + `Fire.Resistance` is
    /// `Enemy.Fire.Resistance`.
    pub fn scoped(&self, scope: &str) -> StatId {
        StatId::from(format!("{}.{}", scope, self.0))
    }

    /// Iterate over the dot separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl From<&str> for StatId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for StatId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for StatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_id_creation() {
        let id1 = StatId::from_str("Life.Maximum");
        let id2 = StatId::from_str("Life.Maximum");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "Life.Maximum");
    }

    #[test]
    fn test_child_and_scope() {
        let resistance = StatId::from_str("Fire").child("Resistance");
        assert_eq!(resistance.as_str(), "Fire.Resistance");
        assert_eq!(resistance.scoped("Enemy").as_str(), "Enemy.Fire.Resistance");
    }

    #[test]
    fn test_segments() {
        let id = StatId::from_str("Fire.Damage.ConvertTo.Cold");
        let segments: Vec<_> = id.segments().collect();
        assert_eq!(segments, vec!["Fire", "Damage", "ConvertTo", "Cold"]);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = StatId::from_str("Mana.Regen");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Mana.Regen\"");
        let back: StatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
