//! Moving the party through validated exits, plus graph queries over the room arena.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::types::{Direction, RoomId};

use super::{Dungeon, NavigationError, Room};

impl Dungeon {
    /// Moves through the current room's exit in `direction` and marks the destination
    /// visited. Fails without touching any state when there is no such exit.
    pub fn move_to(&mut self, direction: Direction) -> Result<&Room, NavigationError> {
        let from = self.current;
        let to = self.current_room()?.exit(direction).ok_or(NavigationError::NoExit(direction))?;
        self.enter(from, to)
    }

    /// Steps back into the room the party last came from.
    pub fn retreat(&mut self) -> Result<&Room, NavigationError> {
        let to = self.previous.ok_or(NavigationError::NoRetreat)?;
        self.enter(self.current, to)
    }

    fn enter(&mut self, from: RoomId, to: RoomId) -> Result<&Room, NavigationError> {
        let room = self.rooms.get_mut(&to).ok_or(NavigationError::UnknownRoom(to))?;
        room.visited = true;
        self.previous = Some(from);
        self.current = to;
        tracing::debug!(from = from.0, to = to.0, kind = ?room.kind, "entered room");
        Ok(&*room)
    }

    /// Every room reachable from `start` by following exits, `start` included.
    pub fn reachable_from(&self, start: RoomId) -> BTreeSet<RoomId> {
        let mut seen = BTreeSet::new();
        if !self.rooms.contains_key(&start) {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(id) = queue.pop_front() {
            let Some(room) = self.rooms.get(&id) else {
                continue;
            };
            for next in room.exits.values() {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen
    }

    /// Shortest exit sequence from `from` to `to`, or `None` when unreachable.
    pub fn path_between(&self, from: RoomId, to: RoomId) -> Option<Vec<Direction>> {
        self.search(from, |room| room.id == to).map(|(_, path)| path)
    }

    /// Nearest room satisfying `wanted`, measured in exits from the current room.
    /// Equally distant matches resolve to the lowest room id.
    pub fn nearest_room(
        &self,
        wanted: impl Fn(&Room) -> bool,
    ) -> Option<(RoomId, Vec<Direction>)> {
        self.search(self.current, wanted)
    }

    /// Breadth-first search one depth at a time, stopping at the first depth with a match.
    fn search(
        &self,
        from: RoomId,
        wanted: impl Fn(&Room) -> bool,
    ) -> Option<(RoomId, Vec<Direction>)> {
        if !self.rooms.contains_key(&from) {
            return None;
        }
        let mut came_from: BTreeMap<RoomId, (RoomId, Direction)> = BTreeMap::new();
        let mut seen = BTreeSet::from([from]);
        let mut frontier = vec![from];
        while !frontier.is_empty() {
            let found = frontier
                .iter()
                .copied()
                .filter(|id| self.rooms.get(id).is_some_and(&wanted))
                .min();
            if let Some(goal) = found {
                let mut steps = Vec::new();
                let mut cursor = goal;
                while let Some(&(parent, direction)) = came_from.get(&cursor) {
                    steps.push(direction);
                    cursor = parent;
                }
                steps.reverse();
                return Some((goal, steps));
            }

            let mut next_frontier = Vec::new();
            for id in frontier {
                let Some(room) = self.rooms.get(&id) else {
                    continue;
                };
                for (&direction, &next) in &room.exits {
                    if seen.insert(next) {
                        came_from.insert(next, (id, direction));
                        next_frontier.push(next);
                    }
                }
            }
            frontier = next_frontier;
        }
        None
    }
}
