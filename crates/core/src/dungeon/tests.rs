use std::collections::BTreeSet;

use proptest::prelude::*;

use super::*;
use crate::dice::SeededRolls;

fn dungeon(seed: u64, level: u32) -> Dungeon {
    Dungeon::generate("The Dark Depths", level, &mut SeededRolls::new(seed))
}

fn walk(dungeon: &mut Dungeon, path: &[Direction]) {
    for &direction in path {
        dungeon.move_to(direction).expect("path follows recorded exits");
    }
}

#[test]
fn room_count_scales_with_level_and_entrance_starts_visited() {
    for level in 1..=5 {
        let generated = dungeon(7, level);
        assert_eq!(generated.len(), room_target(level));
        let entrance = generated.current_room().expect("entrance exists");
        assert_eq!(entrance.id, ENTRANCE);
        assert_eq!(entrance.kind, RoomType::Entrance);
        assert_eq!(entrance.pos, GridPos::ORIGIN);
        assert!(entrance.visited);
        assert_eq!(generated.visited_count(), 1);
    }
}

#[test]
fn exits_are_bidirectional_and_match_grid_adjacency() {
    let generated = dungeon(42, 3);
    let mut positions = BTreeSet::new();
    for room in generated.rooms() {
        assert!(positions.insert(room.pos), "two rooms share {:?}", room.pos);
        for (&direction, &target) in &room.exits {
            let neighbour = generated.room(target).expect("exit points at a real room");
            assert_eq!(neighbour.pos, room.pos.step(direction));
            assert_eq!(neighbour.exit(direction.opposite()), Some(room.id));
        }
    }
}

#[test]
fn room_contents_follow_type_rules() {
    for seed in [1_u64, 2, 3, 99, 1_234] {
        let generated = dungeon(seed, 2);
        for room in generated.rooms() {
            match room.kind {
                RoomType::Entrance | RoomType::Shrine | RoomType::Empty => {
                    assert!(room.encounter.is_none(), "{:?} should be quiet", room.kind);
                }
                RoomType::Boss => {
                    let encounter = room.encounter.as_ref().expect("boss rooms are guarded");
                    assert!(encounter.has_boss());
                    assert!(encounter.len() >= 2, "level 2 bosses bring minions");
                }
                _ => {}
            }
            if room.kind == RoomType::Treasure {
                assert!(matches!(room.treasure.first(), Some(TreasureItem::Gold(_))));
            } else {
                assert!(room.treasure.is_empty());
            }
            assert_eq!(room.trap.is_some(), room.kind == RoomType::Trap);
        }
    }
}

#[test]
fn moving_without_an_exit_fails_and_changes_nothing() {
    let mut generated = dungeon(11, 1);
    let boss = generated.boss_room().expect("boss room").id;
    let path = generated.path_between(ENTRANCE, boss).expect("boss is reachable");
    walk(&mut generated, &path);
    assert_eq!(generated.current_id(), boss);

    let lair = generated.current_room().expect("boss room");
    assert_eq!(lair.exits.len(), 1, "the last room placed is a leaf");
    let blocked = Direction::ALL
        .into_iter()
        .find(|direction| lair.exit(*direction).is_none())
        .expect("a leaf has closed sides");

    let before = generated.clone();
    assert_eq!(generated.move_to(blocked), Err(NavigationError::NoExit(blocked)));
    assert_eq!(generated, before);
}

#[test]
fn moving_marks_rooms_visited_and_retreat_steps_back() {
    let mut generated = dungeon(5, 1);
    assert_eq!(generated.retreat().map(|room| room.id), Err(NavigationError::NoRetreat));

    let (&direction, &target) =
        generated.current_room().expect("entrance").exits.iter().next().expect("entrance exit");
    let entered = generated.move_to(direction).expect("exit exists");
    assert_eq!(entered.id, target);
    assert!(entered.visited);
    assert_eq!(generated.previous_id(), Some(ENTRANCE));

    let back = generated.retreat().expect("came from the entrance");
    assert_eq!(back.id, ENTRANCE);
    assert_eq!(generated.current_id(), ENTRANCE);
    assert_eq!(generated.visited_count(), 2);
}

#[test]
fn snapshot_shows_only_visited_rooms_with_current_marker() {
    let generated = dungeon(8, 2);
    let snapshot = generated.snapshot();
    assert_eq!(snapshot.current, ENTRANCE);
    assert_eq!(snapshot.cells.len(), 1);
    let cell = snapshot.cell_at(GridPos::ORIGIN).expect("entrance cell");
    assert_eq!(cell.marker, CellMarker::Current);
    let entrance = generated.current_room().expect("entrance");
    assert_eq!(cell.exits, entrance.exits.keys().copied().collect::<Vec<_>>());
    assert_eq!(snapshot.bounds(), Some((GridPos::ORIGIN, GridPos::ORIGIN)));
}

#[test]
fn rooms_left_with_monsters_are_marked_dangerous() {
    let mut generated = dungeon(21, 1);
    let (guarded, path) =
        generated.nearest_room(|room| room.encounter.is_some()).expect("the boss is guarded");
    walk(&mut generated, &path);
    let pos = generated.room(guarded).expect("room").pos;
    let inside = generated.snapshot();
    assert_eq!(inside.cell_at(pos).map(|cell| cell.marker), Some(CellMarker::Current));

    generated.retreat().expect("came from somewhere");
    let snapshot = generated.snapshot();
    assert_eq!(snapshot.cell_at(pos).map(|cell| cell.marker), Some(CellMarker::Danger));
    assert_eq!(snapshot.cells.len(), generated.visited_count());

    generated.room_mut(guarded).expect("room").cleared = true;
    let cleared = generated.snapshot();
    let marker = cleared.cell_at(pos).map(|cell| cell.marker);
    assert_eq!(marker, Some(CellMarker::Room(generated.room(guarded).expect("room").kind)));
}

#[test]
fn same_seed_and_level_produce_identical_dungeons() {
    let a = dungeon(123_456, 3);
    let b = dungeon(123_456, 3);
    assert_eq!(a.canonical_bytes(), b.canonical_bytes());
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a, b);
}

#[test]
fn changing_seed_or_level_changes_the_dungeon() {
    let base = dungeon(123_456, 3);
    assert_ne!(base.fingerprint(), dungeon(123_457, 3).fingerprint());
    assert_ne!(base.fingerprint(), dungeon(123_456, 4).fingerprint());
}

#[test]
fn fingerprint_tracks_exploration_state() {
    let mut generated = dungeon(3, 1);
    let before = generated.fingerprint();
    let direction = *generated.current_room().expect("entrance").exits.keys().next().expect("exit");
    generated.move_to(direction).expect("exit exists");
    assert_ne!(generated.fingerprint(), before);
}

#[test]
fn nearest_room_prefers_the_current_room_then_the_lowest_id_at_equal_depth() {
    let generated = dungeon(5, 3);
    let here = generated.nearest_room(|room| room.kind == RoomType::Entrance);
    assert_eq!(here, Some((ENTRANCE, Vec::new())));

    let neighbours: BTreeSet<RoomId> =
        generated.current_room().expect("entrance").exits.values().copied().collect();
    let (nearest, path) =
        generated.nearest_room(|room| room.id != ENTRANCE).expect("the entrance has exits");
    assert_eq!(Some(&nearest), neighbours.first());
    assert_eq!(path.len(), 1);

    assert_eq!(generated.nearest_room(|_| false), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_room_is_reachable_and_the_boss_is_unique_and_last(
        seed in any::<u64>(),
        level in 1_u32..=6,
    ) {
        let generated = dungeon(seed, level);
        prop_assert_eq!(generated.len(), room_target(level));

        let reachable = generated.reachable_from(ENTRANCE);
        prop_assert_eq!(reachable.len(), generated.len());

        let bosses: Vec<RoomId> = generated
            .rooms()
            .filter(|room| room.kind == RoomType::Boss)
            .map(|room| room.id)
            .collect();
        prop_assert_eq!(bosses.len(), 1);
        let last = generated.rooms().map(|room| room.id).max();
        prop_assert_eq!(Some(bosses[0]), last);

        let entrances = generated.rooms().filter(|room| room.kind == RoomType::Entrance).count();
        prop_assert_eq!(entrances, 1);
    }

    #[test]
    fn shortest_paths_lead_where_they_claim(seed in any::<u64>(), pick in any::<u32>()) {
        let mut generated = dungeon(seed, 2);
        let target = RoomId(pick % generated.len() as u32);
        let path = generated.path_between(ENTRANCE, target).expect("every room is reachable");
        walk(&mut generated, &path);
        prop_assert_eq!(generated.current_id(), target);
    }

    #[test]
    fn nearest_room_is_the_closest_match_and_its_path_walks_there(
        seed in any::<u64>(),
        start in any::<u32>(),
    ) {
        let mut generated = dungeon(seed, 3);
        let origin = RoomId(start % generated.len() as u32);
        let path = generated.path_between(ENTRANCE, origin).expect("every room is reachable");
        walk(&mut generated, &path);

        let wanted = |room: &Room| room.treasure.is_empty() && room.id.0 % 3 == 0;
        let expected = generated
            .rooms()
            .filter(|room| wanted(*room))
            .filter_map(|room| {
                let steps = generated.path_between(origin, room.id)?;
                Some((steps.len(), room.id))
            })
            .min();
        let found = generated.nearest_room(wanted);
        prop_assert_eq!(found.as_ref().map(|(id, path)| (path.len(), *id)), expected);

        if let Some((target, path)) = found {
            walk(&mut generated, &path);
            prop_assert_eq!(generated.current_id(), target);
        }
    }
}
