use anyhow::{Result, bail};
use clap::Parser;
use delve_core::autopilot::{Aggro, MAX_COMBAT_TURNS, Policy, TargetTag, execute};
use delve_core::dice::SeededRolls;
use delve_core::dungeon::{ENTRANCE, RoomType};
use delve_core::{
    Character, CharacterClass, CombatSession, CombatantId, Dungeon, Expedition, Party,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of expeditions, each seeded from the harness stream
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    /// Room moves per expedition
    #[arg(short, long, default_value_t = 120)]
    moves: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_party(rng: &mut ChaCha8Rng, level: u32) -> Party {
    let mut party = Party::new();
    let size = 1 + rng.next_u64() % 4;
    for _ in 0..size {
        let class = choose(rng, &CharacterClass::ALL);
        party.add(Character::new(class.name(), class, level));
    }
    party
}

fn random_policy(rng: &mut ChaCha8Rng) -> Policy {
    let tags = [TargetTag::LowestHp, TargetTag::Toughest, TargetTag::Boss];
    Policy {
        target_priority: vec![choose(rng, &tags), choose(rng, &tags)],
        resource_aggression: choose(rng, &[Aggro::Conserve, Aggro::Measured, Aggro::Burn]),
        heal_below_percent: choose(rng, &[0, 30, 50, 80]),
        flee_below_percent: choose(rng, &[0, 10, 25]),
        ..Policy::default()
    }
}

fn check_dungeon(dungeon: &Dungeon) {
    let reachable = dungeon.reachable_from(ENTRANCE);
    assert_eq!(reachable.len(), dungeon.len(), "Invariant failed: unreachable room");
    let bosses: Vec<_> = dungeon.rooms().filter(|room| room.kind == RoomType::Boss).collect();
    assert_eq!(bosses.len(), 1, "Invariant failed: boss count");
    let last = dungeon.rooms().map(|room| room.id).max();
    assert_eq!(Some(bosses[0].id), last, "Invariant failed: boss placed last");
}

fn check_party(party: &Party) {
    for (_, member) in party.iter() {
        assert!(member.current_hp >= 0, "Invariant failed: negative HP");
        assert!(member.current_hp <= member.max_hp, "Invariant failed: HP > Max HP");
        if member.is_dead() {
            assert!(!member.can_take_turns(), "Invariant failed: dead member can act");
        }
    }
}

fn check_session(session: &CombatSession, party: &Party) {
    if session.state().is_terminal() {
        assert!(session.current_turn().is_none(), "Invariant failed: turn after combat end");
        return;
    }
    assert!(!session.encounter().is_defeated(), "Invariant failed: victory unflagged");
    assert!(party.can_fight_on(), "Invariant failed: defeat unflagged");
}

fn check_cursor(session: &CombatSession, party: &Party) {
    let Some(combatant) = session.current_turn() else {
        return;
    };
    let eligible = match combatant.id {
        CombatantId::Player(id) => party.get(id).is_some_and(Character::can_take_turns),
        CombatantId::Monster(id) => session.encounter().monster(id).is_some_and(|m| m.is_alive()),
    };
    assert!(eligible, "Invariant failed: cursor on ineligible combatant");
}

fn fight_checked(
    expedition: &mut Expedition,
    policy: &Policy,
    mut session: CombatSession,
) -> Result<()> {
    let (party, rolls) = expedition.party_and_rolls();
    check_cursor(&session, party);
    for _ in 0..MAX_COMBAT_TURNS {
        if session.state().is_terminal() {
            break;
        }
        if let Some(action) = policy.choose_action(&session, party) {
            execute(&mut session, party, action, rolls)?;
            check_party(party);
            check_session(&session, party);
        }
        if !session.state().is_terminal() {
            session.advance(party);
            check_session(&session, party);
            check_cursor(&session, party);
        }
    }
    expedition.conclude_combat(session)?;
    check_party(expedition.party());
    Ok(())
}

fn run(seed: u64, harness: &mut ChaCha8Rng, moves: u32) -> Result<()> {
    let level = 1 + (harness.next_u64() % 5) as u32;
    let party = random_party(harness, level);
    let policy = random_policy(harness);
    let mut expedition = Expedition::new(party, SeededRolls::new(seed));
    expedition.descend("Fuzz Warrens", level);
    if let Some(dungeon) = expedition.dungeon() {
        check_dungeon(dungeon);
    }

    for _ in 0..moves {
        if expedition.is_over() {
            break;
        }
        if let Some(session) = expedition.begin_combat()? {
            fight_checked(&mut expedition, &policy, session)?;
            continue;
        }
        expedition.collect_treasure()?;
        if harness.next_u64() % 8 == 0 {
            expedition.rest();
        }

        let Some(room) = expedition.dungeon().and_then(|dungeon| dungeon.current_room().ok())
        else {
            bail!("expedition lost its dungeon");
        };
        let exits: Vec<_> = room.exits.keys().copied().collect();
        if exits.is_empty() {
            bail!("room {:?} has no exits", room.id);
        }
        expedition.travel(choose(harness, &exits))?;
        check_party(expedition.party());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} expeditions...", args.seed, args.runs);
    let mut harness = ChaCha8Rng::seed_from_u64(args.seed);
    for index in 0..args.runs {
        let seed = harness.next_u64();
        if let Err(err) = run(seed, &mut harness, args.moves) {
            bail!("expedition {index} (seed {seed}) failed: {err:#}");
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
