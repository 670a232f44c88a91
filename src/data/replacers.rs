//! Stat replacers: whole-line rewrites applied before matching.

use crate::error::DataError;
use crate::normalize::StatReplacer;

const REPLACERS: &[(&str, &[&str])] = &[
    (r"(.+) per grand spectrum", &["$0", "grand spectrum"]),
    // Corrupted Energy
    (
        r"(with \d+ corrupted items equipped): (\d+% of chaos damage does not bypass energy shield), and (\d+% of physical damage bypasses energy shield)",
        &["$1 $2", "$1 $3"],
    ),
    // Acrobatics
    (
        r"(\d+% chance to dodge attack hits)\. (\d+% less armour), (\d+% less energy shield), (\d+% less chance to block .+)",
        &["$1", "$2", "$3", "$4"],
    ),
    // Chaos Inoculation
    (
        r"(maximum life becomes \d+), (immune to chaos damage)",
        &["$1", "$2"],
    ),
    // Blood Magic
    (
        r"(removes all mana)\. (spend life instead of mana for skills)",
        &["$1", "$2"],
    ),
    // Eldritch Battery
    (
        r"(spend energy shield before mana for skill costs)\. (energy shield protects mana instead of life)",
        &["$1", "$2"],
    ),
    // Iron Reflexes
    (
        r"(converts all evasion rating to armour)\. (dexterity provides no bonus to evasion rating)",
        &["$1", "$2"],
    ),
    // Iron Grip
    (
        r"the increase to physical damage from strength applies to projectile attacks as well as melee attacks",
        &["1% increased physical projectile attack damage per 5 strength damage bonus ceiled"],
    ),
    // Vaal Pact
    (
        r"(life leeched per second is doubled)\.? (maximum .* is doubled)\.? (life regeneration has no effect)\.?",
        &["$1", "$2", "$3"],
    ),
    // Ancestral Bond
    (
        r"(you can't deal damage with (?:your )?skills yourself) (.* of summoned totems)",
        &["$1", "$2"],
    ),
    // Runebinder
    (
        r"(.* of summoned totems)\.? (you can have an additional brand attached to an enemy)",
        &["$1", "$2"],
    ),
    // Ghost Reaver
    (
        r"(leech energy shield instead of life) (maximum .* is doubled) (\d+% less energy shield recharge rate)",
        &["$1", "$2", "$3"],
    ),
    // Arrow Dancing
    (
        r"(\d+% more chance to evade projectile attacks) (\d+% less chance to evade melee attacks)",
        &["$1", "$2"],
    ),
    // Elemental Overload
    (
        r"(\d+% more elemental damage if you've crit in the past \d+ seconds) (no critical strike multiplier),? (no damage multiplier for ailments from critical strikes)",
        &["$1", "$2", "$3"],
    ),
    // Avatar of Fire
    (
        r"(\d+% of physical, cold and lightning damage converted to fire damage),? (deal no non-fire damage)",
        &["$1", "$2"],
    ),
    // Unwavering Stance
    (r"(cannot evade enemy attacks) (cannot be stunned)", &["$1", "$2"]),
    // Crimson Dance
    (
        r"(you can inflict bleeding on an enemy up to \d+ times) (your bleeding does not deal extra damage while the enemy is moving) (\d+% less damage with bleeding)",
        &["$1", "$2", "$3"],
    ),
    // Resolute Technique
    (r"(your hits can't be evaded) (never deal critical strikes)", &["$1", "$2"]),
    // flavour text on uniques
    (r"(.+) can't be changed by anything", &[]),
];

/// The built-in stat replacers in the order they are tried.
pub fn stat_replacers() -> Result<Vec<StatReplacer>, DataError> {
    REPLACERS
        .iter()
        .map(|(pattern, replacements)| StatReplacer::new(pattern, replacements))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_replacers_compile() {
        assert_eq!(stat_replacers().unwrap().len(), REPLACERS.len());
    }

    #[test]
    fn test_chaos_inoculation_split() {
        let replacers = stat_replacers().unwrap();
        let parts = replacers
            .iter()
            .find_map(|r| r.apply("maximum life becomes 1, immune to chaos damage"))
            .unwrap();
        assert_eq!(parts, vec!["maximum life becomes 1", "immune to chaos damage"]);
    }

    fn apply(line: &str) -> Vec<String> {
        stat_replacers()
            .unwrap()
            .iter()
            .find_map(|r| r.apply(line))
            .unwrap()
    }

    #[test]
    fn test_jewel_conditional_prefixes_every_part() {
        let parts = apply(
            "with 4 corrupted items equipped: 50% of chaos damage does not bypass energy shield, \
             and 50% of physical damage bypasses energy shield",
        );
        assert_eq!(
            parts,
            vec![
                "with 4 corrupted items equipped 50% of chaos damage does not bypass energy shield",
                "with 4 corrupted items equipped 50% of physical damage bypasses energy shield",
            ]
        );
    }

    #[test]
    fn test_vaal_pact_split() {
        let parts = apply(
            "life leeched per second is doubled. maximum total recovery per second from life leech \
             is doubled. life regeneration has no effect.",
        );
        assert_eq!(
            parts,
            vec![
                "life leeched per second is doubled",
                "maximum total recovery per second from life leech is doubled",
                "life regeneration has no effect",
            ]
        );
    }

    #[test]
    fn test_iron_grip_rewrite() {
        let parts = apply(
            "the increase to physical damage from strength applies to projectile attacks as well as melee attacks",
        );
        assert_eq!(parts.len(), 1);
        assert!(parts[0].ends_with("per 5 strength damage bonus ceiled"));
    }

    #[test]
    fn test_flavour_text_is_dropped() {
        let replacers = stat_replacers().unwrap();
        let parts = replacers
            .iter()
            .find_map(|r| r.apply("corruption can't be changed by anything"))
            .unwrap();
        assert!(parts.is_empty());
    }
}
