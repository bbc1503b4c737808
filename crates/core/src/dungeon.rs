//! Procedural dungeons: an arena of rooms keyed by id with directional exits.

mod generator;
mod navigation;
mod room;
mod snapshot;
mod trap;
mod treasure;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::mem;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::dice::RollSource;
use crate::encounter::Encounter;
use crate::types::{Direction, GridPos, RoomId};

pub use generator::room_target;
pub use room::RoomType;
pub use snapshot::{CellMarker, MapCell, MapSnapshot};
pub use trap::{Trap, TrapDef, TrapKind, TrapReport, TrapSave, get_trap};
pub use treasure::{TreasureItem, generate_treasure};

pub const ENTRANCE: RoomId = RoomId(0);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no dungeon has been generated yet")]
    NoDungeon,
    #[error("there is no exit to the {0}")]
    NoExit(Direction),
    #[error("room {0:?} does not exist")]
    UnknownRoom(RoomId),
    #[error("there is nowhere to retreat to")]
    NoRetreat,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub pos: GridPos,
    pub kind: RoomType,
    pub name: String,
    pub description: String,
    pub exits: BTreeMap<Direction, RoomId>,
    pub visited: bool,
    pub cleared: bool,
    pub encounter: Option<Encounter>,
    pub treasure: Vec<TreasureItem>,
    pub trap: Option<Trap>,
}

impl Room {
    pub fn exit(&self, direction: Direction) -> Option<RoomId> {
        self.exits.get(&direction).copied()
    }

    /// An encounter that still has living monsters and has not been cleared.
    pub fn has_unresolved_encounter(&self) -> bool {
        !self.cleared && self.encounter.as_ref().is_some_and(|encounter| !encounter.is_defeated())
    }

    pub fn has_armed_trap(&self) -> bool {
        self.trap.as_ref().is_some_and(Trap::is_armed)
    }

    pub fn take_treasure(&mut self) -> Vec<TreasureItem> {
        mem::take(&mut self.treasure)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub name: String,
    pub level: u32,
    rooms: BTreeMap<RoomId, Room>,
    current: RoomId,
    previous: Option<RoomId>,
}

impl Dungeon {
    pub fn generate<R: RollSource + ?Sized>(
        name: impl Into<String>,
        level: u32,
        rolls: &mut R,
    ) -> Dungeon {
        generator::generate(name.into(), level, rolls)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn room_at(&self, pos: GridPos) -> Option<&Room> {
        self.rooms.values().find(|room| room.pos == pos)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn current_id(&self) -> RoomId {
        self.current
    }

    pub fn previous_id(&self) -> Option<RoomId> {
        self.previous
    }

    pub fn current_room(&self) -> Result<&Room, NavigationError> {
        self.room(self.current).ok_or(NavigationError::UnknownRoom(self.current))
    }

    pub fn current_room_mut(&mut self) -> Result<&mut Room, NavigationError> {
        let current = self.current;
        self.rooms.get_mut(&current).ok_or(NavigationError::UnknownRoom(current))
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.rooms.values().find(|room| room.kind == RoomType::Boss)
    }

    pub fn visited_count(&self) -> usize {
        self.rooms.values().filter(|room| room.visited).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.name.len() as u32).to_le_bytes());
        bytes.extend(self.name.as_bytes());
        bytes.extend(self.level.to_le_bytes());
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in self.rooms.values() {
            bytes.extend(room.id.0.to_le_bytes());
            bytes.extend(room.pos.y.to_le_bytes());
            bytes.extend(room.pos.x.to_le_bytes());
            bytes.push(room.kind as u8);
            bytes.push(u8::from(room.visited));
            bytes.push(u8::from(room.cleared));

            bytes.push(room.exits.len() as u8);
            for (direction, target) in &room.exits {
                bytes.push(*direction as u8);
                bytes.extend(target.0.to_le_bytes());
            }

            match &room.encounter {
                None => bytes.push(0),
                Some(encounter) => {
                    bytes.push(1);
                    bytes.push(encounter.difficulty as u8);
                    bytes.extend((encounter.len() as u32).to_le_bytes());
                    for monster in encounter.monsters() {
                        bytes.push(monster.kind as u8);
                        bytes.push(u8::from(monster.is_boss));
                        bytes.extend(monster.max_hp.to_le_bytes());
                        bytes.extend(monster.current_hp.to_le_bytes());
                    }
                }
            }

            bytes.extend((room.treasure.len() as u32).to_le_bytes());
            for item in &room.treasure {
                match item {
                    TreasureItem::Gold(amount) => {
                        bytes.push(0);
                        bytes.extend(amount.to_le_bytes());
                    }
                    TreasureItem::Gem { value } => {
                        bytes.push(1);
                        bytes.extend(value.to_le_bytes());
                    }
                    TreasureItem::Potion(kind) => {
                        bytes.push(2);
                        bytes.push(*kind as u8);
                    }
                }
            }

            match &room.trap {
                None => bytes.push(0),
                Some(trap) => {
                    bytes.push(1 + trap.kind as u8);
                    bytes.push(u8::from(trap.triggered));
                    bytes.push(u8::from(trap.disarmed));
                }
            }
        }
        bytes.extend(self.current.0.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
