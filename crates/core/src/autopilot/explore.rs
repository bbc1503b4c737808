//! Exploration target selection: nearest unexplored room first, the boss last.

use crate::dungeon::{Dungeon, RoomType};
use crate::types::Direction;

/// First step toward the nearest unvisited room that is not the boss lair. Once every
/// other room is explored, the first step toward an uncleared boss room.
pub fn next_direction(dungeon: &Dungeon) -> Option<Direction> {
    if let Some((_, path)) =
        dungeon.nearest_room(|room| !room.visited && room.kind != RoomType::Boss)
    {
        return path.first().copied();
    }
    let (_, path) = dungeon.nearest_room(|room| room.kind == RoomType::Boss && !room.cleared)?;
    path.first().copied()
}
