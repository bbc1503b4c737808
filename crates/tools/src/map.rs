//! ASCII rendering of the explored map.

use delve_core::MapSnapshot;
use delve_core::types::{Direction, GridPos};

pub const LEGEND: &str = "* party  ! monsters  E entrance  B boss  $ treasure  ^ trap";

/// One character per room with `-` and `|` for exits between neighbouring cells.
/// Rows run north to south.
pub fn render(snapshot: &MapSnapshot) -> String {
    let Some((min, max)) = snapshot.bounds() else {
        return String::new();
    };
    let mut lines = Vec::new();
    for y in min.y..=max.y {
        let mut rooms = String::new();
        let mut links = String::new();
        for x in min.x..=max.x {
            let cell = snapshot.cell_at(GridPos { y, x });
            let opens =
                |direction: Direction| cell.is_some_and(|cell| cell.exits.contains(&direction));
            rooms.push(cell.map_or(' ', |cell| cell.marker.symbol()));
            if x < max.x {
                rooms.push(if opens(Direction::East) { '-' } else { ' ' });
            }
            links.push(if opens(Direction::South) { '|' } else { ' ' });
            if x < max.x {
                links.push(' ');
            }
        }
        lines.push(rooms.trim_end().to_string());
        if y < max.y {
            lines.push(links.trim_end().to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::dungeon::{CellMarker, MapCell};
    use delve_core::{RoomId, RoomType};

    fn cell(room: u32, y: i32, x: i32, marker: CellMarker, exits: &[Direction]) -> MapCell {
        MapCell { room: RoomId(room), pos: GridPos { y, x }, marker, exits: exits.to_vec() }
    }

    #[test]
    fn draws_rooms_and_the_exits_between_them() {
        use Direction::{East, North, South, West};
        let snapshot = MapSnapshot {
            current: RoomId(1),
            cells: vec![
                cell(0, 0, 0, CellMarker::Room(RoomType::Entrance), &[East]),
                cell(1, 0, 1, CellMarker::Current, &[West, South]),
                cell(2, 1, 1, CellMarker::Danger, &[North, West]),
            ],
        };
        assert_eq!(render(&snapshot), "E-*\n  |\n  !");
    }

    #[test]
    fn handles_negative_coordinates_and_empty_maps() {
        let empty = MapSnapshot { current: RoomId(0), cells: Vec::new() };
        assert_eq!(render(&empty), "");

        let snapshot = MapSnapshot {
            current: RoomId(0),
            cells: vec![
                cell(3, -1, -1, CellMarker::Room(RoomType::Treasure), &[Direction::South]),
                cell(0, 0, -1, CellMarker::Current, &[Direction::North]),
            ],
        };
        assert_eq!(render(&snapshot), "$\n|\n*");
    }
}
