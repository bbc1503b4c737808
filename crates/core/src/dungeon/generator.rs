//! Randomized connected growth from the entrance, then per-room contents.

use std::collections::BTreeMap;

use crate::dice::{RollSource, chance, pick_index, shuffle};
use crate::encounter::{generate as generate_encounter, generate_boss};
use crate::types::{Difficulty, Direction, GridPos, RoomId};

use super::trap::{Trap, TrapKind};
use super::treasure::generate_treasure;
use super::{Dungeon, ENTRANCE, Room, RoomType};

const BASE_ROOMS: usize = 8;
const ROOMS_PER_LEVEL: usize = 2;
const ENCOUNTER_CHANCE_PERCENT: u32 = 50;

/// Total rooms in a dungeon of `level`, entrance and boss included.
pub fn room_target(level: u32) -> usize {
    BASE_ROOMS + ROOMS_PER_LEVEL * level.max(1) as usize
}

pub(super) fn generate<R: RollSource + ?Sized>(name: String, level: u32, rolls: &mut R) -> Dungeon {
    let level = level.max(1);
    let target = room_target(level);

    let mut rooms = BTreeMap::new();
    let mut occupied = BTreeMap::new();
    let mut entrance = Room::new(ENTRANCE, GridPos::ORIGIN, RoomType::Entrance, rolls);
    entrance.visited = true;
    rooms.insert(ENTRANCE, entrance);
    occupied.insert(GridPos::ORIGIN, ENTRANCE);

    let mut frontier = vec![(ENTRANCE, GridPos::ORIGIN)];
    while rooms.len() < target && !frontier.is_empty() {
        let index = pick_index(rolls, frontier.len());
        let (from, pos) = frontier[index];
        let mut directions = Direction::ALL;
        shuffle(rolls, &mut directions);

        for direction in directions {
            if rooms.len() >= target {
                break;
            }
            let next = pos.step(direction);
            if occupied.contains_key(&next) {
                continue;
            }

            let id = RoomId(rooms.len() as u32);
            let kind =
                if rooms.len() + 1 == target { RoomType::Boss } else { RoomType::draw(rolls) };
            let mut room = Room::new(id, next, kind, rolls);
            room.exits.insert(direction.opposite(), from);
            if let Some(parent) = rooms.get_mut(&from) {
                parent.exits.insert(direction, id);
            }
            rooms.insert(id, room);
            occupied.insert(next, id);
            frontier.push((id, next));
        }

        if Direction::ALL.iter().all(|direction| occupied.contains_key(&pos.step(*direction))) {
            frontier.remove(index);
        }
    }

    for room in rooms.values_mut() {
        populate(room, level, rolls);
    }

    let dungeon = Dungeon { name, level, rooms, current: ENTRANCE, previous: None };
    tracing::info!(
        name = %dungeon.name,
        level,
        rooms = dungeon.len(),
        encounters = dungeon.rooms().filter(|room| room.encounter.is_some()).count(),
        traps = dungeon.rooms().filter(|room| room.trap.is_some()).count(),
        fingerprint = dungeon.fingerprint(),
        "dungeon generated"
    );
    dungeon
}

fn populate<R: RollSource + ?Sized>(room: &mut Room, level: u32, rolls: &mut R) {
    match room.kind {
        RoomType::Boss => room.encounter = Some(generate_boss(level, rolls)),
        kind if kind.hosts_encounters() => {
            if chance(rolls, ENCOUNTER_CHANCE_PERCENT) {
                room.encounter = Some(generate_encounter(level, Difficulty::Medium, rolls));
            }
        }
        _ => {}
    }

    match room.kind {
        RoomType::Treasure => room.treasure = generate_treasure(level, rolls),
        RoomType::Trap => room.trap = Some(Trap::new(TrapKind::draw(rolls))),
        _ => {}
    }
}
