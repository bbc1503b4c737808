//! Renderer-agnostic view of the explored part of a dungeon.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, GridPos, RoomId};

use super::{Dungeon, RoomType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMarker {
    Current,
    /// Holds an encounter that has not been resolved.
    Danger,
    Room(RoomType),
}

impl CellMarker {
    pub fn symbol(self) -> char {
        match self {
            CellMarker::Current => '*',
            CellMarker::Danger => '!',
            CellMarker::Room(kind) => kind.symbol(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    pub room: RoomId,
    pub pos: GridPos,
    pub marker: CellMarker,
    pub exits: Vec<Direction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub current: RoomId,
    pub cells: Vec<MapCell>,
}

impl MapSnapshot {
    pub fn cell_at(&self, pos: GridPos) -> Option<&MapCell> {
        self.cells.iter().find(|cell| cell.pos == pos)
    }

    /// Inclusive `(min, max)` corners of the explored area.
    pub fn bounds(&self) -> Option<(GridPos, GridPos)> {
        let first = self.cells.first()?.pos;
        Some(self.cells.iter().fold((first, first), |(min, max), cell| {
            (
                GridPos { y: min.y.min(cell.pos.y), x: min.x.min(cell.pos.x) },
                GridPos { y: max.y.max(cell.pos.y), x: max.x.max(cell.pos.x) },
            )
        }))
    }
}

impl Dungeon {
    /// Visited rooms only. The party's position overrides danger, which overrides type.
    pub fn snapshot(&self) -> MapSnapshot {
        let cells = self
            .rooms()
            .filter(|room| room.visited)
            .map(|room| {
                let marker = if room.id == self.current {
                    CellMarker::Current
                } else if room.has_unresolved_encounter() {
                    CellMarker::Danger
                } else {
                    CellMarker::Room(room.kind)
                };
                MapCell {
                    room: room.id,
                    pos: room.pos,
                    marker,
                    exits: room.exits.keys().copied().collect(),
                }
            })
            .collect();
        MapSnapshot { current: self.current, cells }
    }
}
