//! The orchestrator: a party walking one dungeon at a time, fighting what it finds.

use serde::{Deserialize, Serialize};

use crate::character::Party;
use crate::combat::{CombatOutcome, CombatSession, CombatState};
use crate::dice::{RollSource, SeededRolls};
use crate::dungeon::{Dungeon, NavigationError, RoomType, TrapReport, TreasureItem};
use crate::types::{Direction, RoomId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpeditionEvent {
    Descended { name: String, level: u32 },
    Entered { room: RoomId, kind: RoomType, first_visit: bool },
    TrapSprung(TrapReport),
    CombatStarted { room: RoomId, monsters: usize },
    CombatEnded { room: RoomId, state: CombatState, rounds: u32 },
    TreasureCollected { room: RoomId, gold: u32, potions: usize },
    Rested,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub rooms_explored: u32,
    pub encounters_won: u32,
    pub encounters_fled: u32,
    pub traps_sprung: u32,
    pub gold_collected: u32,
}

/// What the party found on stepping into a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub room: RoomId,
    pub kind: RoomType,
    pub name: String,
    pub first_visit: bool,
    /// Monsters are waiting; call [`Expedition::begin_combat`].
    pub hostile: bool,
    pub trap: Option<TrapReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aftermath {
    pub room: RoomId,
    pub outcome: CombatOutcome,
    pub loot: Vec<TreasureItem>,
}

pub struct Expedition<R: RollSource = SeededRolls> {
    party: Party,
    dungeon: Option<Dungeon>,
    rolls: R,
    engaged: Option<RoomId>,
    defeated: bool,
    tally: Tally,
    log: Vec<ExpeditionEvent>,
}

impl<R: RollSource> Expedition<R> {
    pub fn new(party: Party, rolls: R) -> Self {
        Self {
            party,
            dungeon: None,
            rolls,
            engaged: None,
            defeated: false,
            tally: Tally::default(),
            log: Vec::new(),
        }
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut Party {
        &mut self.party
    }

    /// Split borrow for driving a [`CombatSession`] outside the expedition.
    pub fn party_and_rolls(&mut self) -> (&mut Party, &mut R) {
        (&mut self.party, &mut self.rolls)
    }

    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.dungeon.as_ref()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn log(&self) -> &[ExpeditionEvent] {
        &self.log
    }

    pub fn into_party(self) -> Party {
        self.party
    }

    /// Replaces any current dungeon with a freshly generated one and stands at its entrance.
    pub fn descend(&mut self, name: impl Into<String>, level: u32) -> &Dungeon {
        let dungeon = Dungeon::generate(name, level, &mut self.rolls);
        self.log
            .push(ExpeditionEvent::Descended { name: dungeon.name.clone(), level: dungeon.level });
        self.engaged = None;
        self.defeated = false;
        self.dungeon.insert(dungeon)
    }

    /// Moves the party and springs any armed trap in a room that holds no monsters.
    pub fn travel(&mut self, direction: Direction) -> Result<Arrival, NavigationError> {
        let dungeon = self.dungeon.as_mut().ok_or(NavigationError::NoDungeon)?;
        let first_visit = {
            let from = dungeon.current_room()?;
            let to = from.exit(direction).ok_or(NavigationError::NoExit(direction))?;
            !dungeon.room(to).ok_or(NavigationError::UnknownRoom(to))?.visited
        };
        dungeon.move_to(direction)?;
        let room = dungeon.current_room_mut()?;

        let hostile = room.has_unresolved_encounter();
        let trap = match room.trap.as_mut() {
            Some(trap) if !hostile && trap.is_armed() => {
                Some(trap.spring(&mut self.party, &mut self.rolls))
            }
            _ => None,
        };
        let arrival = Arrival {
            room: room.id,
            kind: room.kind,
            name: room.name.clone(),
            first_visit,
            hostile,
            trap,
        };

        if first_visit {
            self.tally.rooms_explored += 1;
        }
        self.log.push(ExpeditionEvent::Entered {
            room: arrival.room,
            kind: arrival.kind,
            first_visit,
        });
        if let Some(report) = &arrival.trap
            && !report.noticed
        {
            self.tally.traps_sprung += 1;
            self.log.push(ExpeditionEvent::TrapSprung(report.clone()));
        }
        Ok(arrival)
    }

    /// Takes the current room's unresolved encounter into a new combat session. `None`
    /// when nothing here wants a fight.
    pub fn begin_combat(&mut self) -> Result<Option<CombatSession>, NavigationError> {
        let dungeon = self.dungeon.as_mut().ok_or(NavigationError::NoDungeon)?;
        let room = dungeon.current_room_mut()?;
        if !room.has_unresolved_encounter() {
            return Ok(None);
        }
        let Some(encounter) = room.encounter.take() else {
            return Ok(None);
        };
        let room_id = room.id;
        self.log.push(ExpeditionEvent::CombatStarted { room: room_id, monsters: encounter.len() });
        self.engaged = Some(room_id);
        Ok(Some(CombatSession::start(encounter, &self.party, &mut self.rolls)))
    }

    /// Hands the session's results back to the party and the room it was fought in.
    /// Victory clears the room and loots it; fleeing leaves the survivors behind and
    /// steps back to the previous room.
    pub fn conclude_combat(
        &mut self,
        session: CombatSession,
    ) -> Result<Aftermath, NavigationError> {
        let dungeon = self.dungeon.as_mut().ok_or(NavigationError::NoDungeon)?;
        let room_id = self.engaged.take().unwrap_or(dungeon.current_id());
        let outcome = session.conclude(&mut self.party);

        let room = dungeon.room_mut(room_id).ok_or(NavigationError::UnknownRoom(room_id))?;
        room.encounter = Some(outcome.encounter.clone());
        let mut loot = Vec::new();
        match outcome.state {
            CombatState::Victory => {
                room.cleared = true;
                loot = room.take_treasure();
                self.tally.encounters_won += 1;
            }
            CombatState::Fled => {
                self.tally.encounters_fled += 1;
                if dungeon.current_id() == room_id && dungeon.previous_id().is_some() {
                    dungeon.retreat()?;
                }
            }
            CombatState::Defeat => self.defeated = true,
            CombatState::Ongoing => {}
        }
        self.log.push(ExpeditionEvent::CombatEnded {
            room: room_id,
            state: outcome.state,
            rounds: outcome.rounds,
        });
        self.stash(room_id, &loot);
        Ok(Aftermath { room: room_id, outcome, loot })
    }

    /// Loots the current room unless monsters still hold it.
    pub fn collect_treasure(&mut self) -> Result<Vec<TreasureItem>, NavigationError> {
        let dungeon = self.dungeon.as_mut().ok_or(NavigationError::NoDungeon)?;
        let room = dungeon.current_room_mut()?;
        if room.has_unresolved_encounter() {
            return Ok(Vec::new());
        }
        let room_id = room.id;
        let loot = room.take_treasure();
        self.stash(room_id, &loot);
        Ok(loot)
    }

    fn stash(&mut self, room: RoomId, loot: &[TreasureItem]) {
        if loot.is_empty() {
            return;
        }
        let gold: u32 = loot.iter().map(|item| item.gold_value()).sum();
        let mut potions = 0;
        for item in loot {
            if let TreasureItem::Potion(kind) = item {
                self.party.potions.push(*kind);
                potions += 1;
            }
        }
        self.party.gold += gold;
        self.tally.gold_collected += gold;
        self.log.push(ExpeditionEvent::TreasureCollected { room, gold, potions });
    }

    pub fn rest(&mut self) {
        self.party.long_rest();
        self.log.push(ExpeditionEvent::Rested);
    }

    /// The boss room of the current dungeon has been cleared.
    pub fn boss_defeated(&self) -> bool {
        self.dungeon
            .as_ref()
            .and_then(Dungeon::boss_room)
            .is_some_and(|room| room.cleared)
    }

    /// The party lost a fight, everyone is dead, or the boss is beaten.
    pub fn is_over(&self) -> bool {
        self.defeated || self.party.all_dead() || self.boss_defeated()
    }
}
