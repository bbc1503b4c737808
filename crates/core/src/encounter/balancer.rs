//! XP-budget encounter selection keyed to dungeon level and difficulty.

use crate::dice::{RollSource, pick_index};
use crate::monster::{boss_roster, level_roster};
use crate::types::Difficulty;

use super::Encounter;

const BASE_XP_BY_LEVEL: [u32; 5] = [100, 250, 450, 700, 1100];

/// Levels past the table reuse its last entry.
pub fn base_xp(level: u32) -> u32 {
    let index = level.clamp(1, BASE_XP_BY_LEVEL.len() as u32) - 1;
    BASE_XP_BY_LEVEL[index as usize]
}

pub fn xp_budget(level: u32, difficulty: Difficulty) -> u32 {
    base_xp(level) * difficulty.multiplier_percent() / 100
}

/// Hard ceiling on an encounter's XP: 1.5x the budget.
pub fn xp_limit(level: u32, difficulty: Difficulty) -> u32 {
    xp_budget(level, difficulty) * 3 / 2
}

pub fn max_monsters(level: u32) -> usize {
    4 + level as usize
}

/// Draws from the level roster until the next draw would break the XP limit or the
/// monster cap is reached. Never returns an empty encounter.
pub fn generate<R: RollSource + ?Sized>(
    level: u32,
    difficulty: Difficulty,
    rolls: &mut R,
) -> Encounter {
    let roster = level_roster(level);
    let limit = xp_limit(level, difficulty);
    let cap = max_monsters(level);
    let mut encounter = Encounter::new(difficulty);

    while encounter.len() < cap {
        let kind = roster[pick_index(rolls, roster.len())];
        if encounter.total_xp() + kind.stats().xp > limit {
            if encounter.is_empty() {
                encounter.push(kind);
            }
            break;
        }
        encounter.push(kind);
    }

    tracing::debug!(
        level,
        ?difficulty,
        monsters = encounter.len(),
        xp = encounter.total_xp(),
        limit,
        "balanced encounter"
    );
    encounter
}

/// One scaled boss, plus one or two minions from the level below once past level 1.
pub fn generate_boss<R: RollSource + ?Sized>(level: u32, rolls: &mut R) -> Encounter {
    let bosses = boss_roster(level);
    let mut encounter = Encounter::new(Difficulty::Deadly);
    encounter.push_boss(bosses[pick_index(rolls, bosses.len())], level);

    if level >= 2 {
        let minions = level_roster(level - 1);
        let count = 1 + pick_index(rolls, 2);
        for _ in 0..count {
            encounter.push(minions[pick_index(rolls, minions.len())]);
        }
    }
    encounter
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dice::{ScriptedRolls, SeededRolls};
    use crate::monster::MonsterKind;

    #[test]
    fn budget_scales_with_difficulty() {
        assert_eq!(xp_budget(1, Difficulty::Easy), 50);
        assert_eq!(xp_budget(1, Difficulty::Deadly), 200);
        assert_eq!(xp_limit(1, Difficulty::Easy), 75);
        assert_eq!(base_xp(9), base_xp(5));
    }

    #[test]
    fn drawing_stops_at_first_monster_that_breaks_the_limit() {
        // Level 5 easy: limit 825, one Minotaur (700) fits, a second does not.
        let mut rolls = ScriptedRolls::new([4, 4]);
        let encounter = generate(5, Difficulty::Easy, &mut rolls);
        assert_eq!(encounter.len(), 1);
        assert_eq!(encounter.monsters()[0].kind, MonsterKind::Minotaur);
    }

    #[test]
    fn boss_encounters_gain_minions_after_level_one() {
        let mut rolls = SeededRolls::new(3);
        let first = generate_boss(1, &mut rolls);
        assert_eq!(first.len(), 1);
        assert!(first.has_boss());

        for seed in 0..20 {
            let mut rolls = SeededRolls::new(seed);
            let deeper = generate_boss(3, &mut rolls);
            assert!((2..=3).contains(&deeper.len()), "boss plus one or two minions");
            assert!(deeper.monsters()[0].is_boss);
            assert!(deeper.monsters()[1..].iter().all(|minion| !minion.is_boss));
            assert!(
                deeper.monsters()[1..]
                    .iter()
                    .all(|minion| level_roster(2).contains(&minion.kind))
            );
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn level_one_easy_is_never_empty_and_stays_in_budget(seed in any::<u64>()) {
            let mut rolls = SeededRolls::new(seed);
            let encounter = generate(1, Difficulty::Easy, &mut rolls);
            prop_assert!(!encounter.is_empty());
            prop_assert!(encounter.total_xp() <= 75);
        }

        #[test]
        fn encounters_respect_cap_and_limit(
            seed in any::<u64>(),
            level in 1_u32..7,
            difficulty_index in 0_usize..4,
        ) {
            let difficulty = Difficulty::ALL[difficulty_index];
            let mut rolls = SeededRolls::new(seed);
            let encounter = generate(level, difficulty, &mut rolls);
            prop_assert!(!encounter.is_empty());
            prop_assert!(encounter.len() <= max_monsters(level));
            if encounter.len() > 1 {
                prop_assert!(encounter.total_xp() <= xp_limit(level, difficulty));
            }
        }
    }
}
