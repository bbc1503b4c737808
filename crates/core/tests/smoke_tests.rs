use delve_core::autopilot::{ExpeditionResult, Policy, run_expedition};
use delve_core::dice::SeededRolls;
use delve_core::{Character, CharacterClass, Expedition, Party};

fn run_to_the_end(seed: u64, level: u32) -> (ExpeditionResult, Expedition) {
    let mut party = Party::new();
    for class in [
        CharacterClass::Fighter,
        CharacterClass::Cleric,
        CharacterClass::Barbarian,
        CharacterClass::Wizard,
    ] {
        party.add(Character::new(class.name(), class, level));
    }
    let mut expedition = Expedition::new(party, SeededRolls::new(seed));
    expedition.descend("Smoke Caverns", level);

    // 200 moves is far more than any dungeon of these sizes needs.
    let summary = run_expedition(&mut expedition, &Policy::default(), 200)
        .expect("expedition should run without errors");
    assert!(summary.moves <= 200);
    assert_eq!(summary.rooms, expedition.dungeon().expect("descended").len());
    (summary.result, expedition)
}

#[test]
fn test_smoke_runs_end_in_a_verdict() {
    for seed in [1_u64, 7, 42, 12345] {
        let (result, expedition) = run_to_the_end(seed, 1);
        match result {
            ExpeditionResult::BossDefeated => assert!(expedition.boss_defeated()),
            ExpeditionResult::PartyDefeated => assert!(expedition.is_over()),
            ExpeditionResult::Stalled => {}
        }
    }
}

#[test]
fn test_smoke_boss_victory_explores_every_room() {
    for seed in 0..12_u64 {
        let (result, expedition) = run_to_the_end(seed, 2);
        if result != ExpeditionResult::BossDefeated {
            continue;
        }
        let dungeon = expedition.dungeon().expect("descended");
        assert_eq!(dungeon.visited_count(), dungeon.len(), "seed {seed} skipped rooms");
        assert!(expedition.tally().encounters_won >= 1);
    }
}

#[test]
fn test_smoke_gold_is_only_gained_from_loot() {
    let (_, expedition) = run_to_the_end(99, 1);
    assert_eq!(expedition.party().gold, expedition.tally().gold_collected);
}
