use super::*;
use crate::character::Character;
use crate::dice::{ScriptedRolls, SeededRolls};
use crate::encounter::Encounter;
use crate::monster::MonsterKind;
use crate::types::Difficulty;

fn party_of(classes: &[CharacterClass]) -> (Party, Vec<CharacterId>) {
    let mut party = Party::new();
    let ids = classes
        .iter()
        .map(|&class| party.add(Character::new(class.name(), class, 1)))
        .collect();
    (party, ids)
}

fn encounter_of(kinds: &[MonsterKind]) -> Encounter {
    let mut encounter = Encounter::new(Difficulty::Medium);
    for &kind in kinds {
        encounter.push(kind);
    }
    encounter
}

/// Starts a session where the first party member wins initiative outright.
fn party_first(encounter: Encounter, party: &Party) -> CombatSession {
    let mut initiative = vec![20];
    initiative.resize(party.len() + encounter.len(), 1);
    CombatSession::start(encounter, party, &mut ScriptedRolls::new(initiative))
}

fn wound(party: &mut Party, id: CharacterId, leave: i32) {
    let member = party.get_mut(id).expect("member exists");
    let amount = member.current_hp - leave;
    member.take_damage(amount, false);
}

#[test]
fn dying_member_rolls_a_death_save() {
    let (mut party, ids) = party_of(&[CharacterClass::Fighter, CharacterClass::Wizard]);
    wound(&mut party, ids[0], 0);
    assert!(party.get(ids[0]).expect("fighter").is_dying());

    let session = party_first(encounter_of(&[MonsterKind::Goblin]), &party);
    let action = Policy::default().choose_action(&session, &party);
    assert_eq!(action, Some(Action::DeathSave(ids[0])));
}

#[test]
fn monster_turns_are_handed_to_the_monster() {
    let (party, _) = party_of(&[CharacterClass::Fighter]);
    let encounter = encounter_of(&[MonsterKind::Goblin]);
    let session = CombatSession::start(encounter, &party, &mut ScriptedRolls::new([1, 20]));
    let action = Policy::default().choose_action(&session, &party);
    assert_eq!(action, Some(Action::MonsterTurn(MonsterId(0))));
}

#[test]
fn cleric_heals_the_wounded_ally_before_attacking() {
    let (mut party, ids) = party_of(&[CharacterClass::Cleric, CharacterClass::Fighter]);
    wound(&mut party, ids[1], 3);

    let session = party_first(encounter_of(&[MonsterKind::Goblin]), &party);
    let action = Policy::default().choose_action(&session, &party);
    assert_eq!(
        action,
        Some(Action::Cast {
            caster: ids[0],
            spell: SpellKind::CureWounds,
            targeting: SpellTargeting::Ally(ids[1]),
        })
    );
}

#[test]
fn cleric_without_slots_stabilizes_a_dying_ally() {
    let (mut party, ids) = party_of(&[CharacterClass::Cleric, CharacterClass::Fighter]);
    wound(&mut party, ids[1], 0);
    let cleric = party.get_mut(ids[0]).expect("cleric");
    while cleric.consume_slot(1) {}

    let session = party_first(encounter_of(&[MonsterKind::Goblin]), &party);
    let action = Policy::default().choose_action(&session, &party);
    assert_eq!(
        action,
        Some(Action::Cast {
            caster: ids[0],
            spell: SpellKind::SpareTheDying,
            targeting: SpellTargeting::Ally(ids[1]),
        })
    );
}

#[test]
fn barbarian_opens_with_rage_then_swings() {
    let (mut party, ids) = party_of(&[CharacterClass::Barbarian]);
    let mut session = party_first(encounter_of(&[MonsterKind::Ogre]), &party);
    let policy = Policy::default();

    let first = policy.choose_action(&session, &party).expect("barbarian acts");
    assert_eq!(first, Action::Feature { character: ids[0], feature: ClassFeature::Rage });
    execute(&mut session, &mut party, first, &mut SeededRolls::new(0)).expect("rage starts");

    let second = policy.choose_action(&session, &party);
    assert_eq!(second, Some(Action::Attack { attacker: ids[0], target: MonsterId(0) }));
}

#[test]
fn badly_hurt_party_runs() {
    let (mut party, ids) = party_of(&[CharacterClass::Fighter]);
    wound(&mut party, ids[0], 1);
    let session = party_first(encounter_of(&[MonsterKind::Goblin]), &party);
    assert_eq!(Policy::default().choose_action(&session, &party), Some(Action::Flee));
}

#[test]
fn wizard_spends_a_slot_on_packs_but_not_on_a_lone_monster() {
    let (party, ids) = party_of(&[CharacterClass::Wizard]);
    let policy = Policy::default();

    let pack = party_first(encounter_of(&[MonsterKind::Goblin, MonsterKind::Goblin]), &party);
    assert_eq!(
        policy.choose_action(&pack, &party),
        Some(Action::Cast {
            caster: ids[0],
            spell: SpellKind::Thunderwave,
            targeting: SpellTargeting::Enemies(vec![MonsterId(0), MonsterId(1)]),
        })
    );

    let lone = party_first(encounter_of(&[MonsterKind::Goblin]), &party);
    assert_eq!(
        policy.choose_action(&lone, &party),
        Some(Action::Cast {
            caster: ids[0],
            spell: SpellKind::RayOfFrost,
            targeting: SpellTargeting::Enemy(MonsterId(0)),
        })
    );

    let thrifty = Policy { resource_aggression: Aggro::Conserve, ..Policy::default() };
    let action = thrifty.choose_action(&pack, &party);
    assert!(matches!(action, Some(Action::Cast { spell: SpellKind::RayOfFrost, .. })));
}

#[test]
fn target_priority_decides_who_gets_hit() {
    let (party, ids) = party_of(&[CharacterClass::Fighter]);
    let mut encounter = encounter_of(&[MonsterKind::Kobold]);
    let boss = encounter.push_boss(MonsterKind::Bugbear, 1);
    let session = party_first(encounter, &party);

    let boss_first = Policy::default();
    assert_eq!(
        boss_first.choose_action(&session, &party),
        Some(Action::Attack { attacker: ids[0], target: boss })
    );

    let weakest = Policy { target_priority: vec![TargetTag::LowestHp], ..Policy::default() };
    assert_eq!(
        weakest.choose_action(&session, &party),
        Some(Action::Attack { attacker: ids[0], target: MonsterId(0) })
    );
}

#[test]
fn party_hp_percent_ignores_the_dead() {
    let (mut party, ids) = party_of(&[CharacterClass::Fighter, CharacterClass::Fighter]);
    assert_eq!(party_hp_percent(&party), 100);
    wound(&mut party, ids[0], 6);
    assert_eq!(party_hp_percent(&party), 75);

    let member = party.get_mut(ids[0]).expect("fighter");
    let max = member.max_hp;
    member.take_damage(6 + max, false);
    assert!(member.is_dead());
    assert_eq!(party_hp_percent(&party), 100);
}

#[test]
fn fights_always_reach_an_end() {
    use CharacterClass::{Cleric, Fighter, Rogue, Wizard};
    for seed in 0..20 {
        let (mut party, _) = party_of(&[Fighter, Cleric, Rogue, Wizard]);
        let mut rolls = SeededRolls::new(seed);
        let encounter = encounter_of(&[MonsterKind::Goblin, MonsterKind::Goblin]);
        let mut session = CombatSession::start(encounter, &party, &mut rolls);
        let reports = fight(&Policy::default(), &mut session, &mut party, &mut rolls)
            .expect("policy only picks legal actions");
        assert!(session.state().is_terminal(), "seed {seed} stalled");
        assert!(!reports.is_empty());
    }
}

#[test]
fn expeditions_replay_exactly_from_a_seed() {
    use CharacterClass::{Cleric, Fighter, Rogue, Wizard};
    let run = |seed| {
        let (party, _) = party_of(&[Fighter, Cleric, Rogue, Wizard]);
        let mut expedition = Expedition::new(party, SeededRolls::new(seed));
        expedition.descend("Replay Vault", 1);
        let summary =
            run_expedition(&mut expedition, &Policy::default(), 60).expect("expedition runs");
        (summary, expedition.log().to_vec())
    };

    for seed in [3_u64, 17, 2_024] {
        let (summary, log) = run(seed);
        assert!(summary.moves <= 60);
        assert!(summary.rooms_visited >= 1);
        assert_eq!(summary.party.len(), 4);
        if summary.result == ExpeditionResult::BossDefeated {
            assert!(summary.tally.encounters_won >= 1);
        }
        assert_eq!(run(seed), (summary, log));
    }
}

#[test]
fn expedition_without_a_dungeon_is_an_error() {
    let (party, _) = party_of(&[CharacterClass::Fighter]);
    let mut expedition = Expedition::new(party, SeededRolls::new(1));
    let result = run_expedition(&mut expedition, &Policy::default(), 10);
    assert!(matches!(result, Err(AutopilotError::Navigation(NavigationError::NoDungeon))));
}
