//! Combat resolution for one encounter against a borrowed party.
//! This file owns turn order and terminal detection; action submodules extend
//! `CombatSession` with attacks, spells, features, death saves and fleeing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{Character, ClassFeature, Party};
use crate::content::SpellKind;
use crate::dice::{RollSource, roll};
use crate::encounter::Encounter;
use crate::monster::Monster;
use crate::types::{CharacterId, CombatantId, MonsterId};

mod attack;
mod death_save;
mod features;
mod flee;
mod outcome;
mod report;
mod spells;


pub use outcome::CombatOutcome;
pub use report::{
    AttackReport, DamageReport, DeathSaveReport, ExtraDamage, ExtraDamageSource, FeatureReport,
    FleeCheck, FleeReport, SpellReport, SpellTargetReport,
};
pub use spells::SpellTargeting;

const MONSTER_INITIATIVE_BONUS: i32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Ongoing,
    Victory,
    Defeat,
    Fled,
}

impl CombatState {
    pub fn is_terminal(self) -> bool {
        self != CombatState::Ongoing
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("combat is already over ({0:?})")]
    CombatOver(CombatState),
    #[error("no party member with id {0:?}")]
    CharacterNotFound(CharacterId),
    #[error("no living monster with id {0:?}")]
    MonsterNotFound(MonsterId),
    #[error("{0} is in no state to act")]
    Incapacitated(String),
    #[error("{caster} does not know {spell}")]
    SpellNotKnown { caster: String, spell: SpellKind },
    #[error("{caster} has no level {level} slot left for {spell}")]
    NoSpellSlot { caster: String, spell: SpellKind, level: u8 },
    #[error("{spell} cannot be aimed that way")]
    InvalidTarget { spell: SpellKind },
    #[error("{name} cannot use {feature:?} right now")]
    FeatureUnavailable { name: String, feature: ClassFeature },
    #[error("{0} is not dying")]
    NotDying(String),
    #[error("no valid target")]
    NoTarget,
}

/// Turn-order entry. Players resolve into the party, monsters into the encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub is_player: bool,
    pub initiative: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombatSession {
    encounter: Encounter,
    turn_order: Vec<Combatant>,
    cursor: usize,
    round: u32,
    state: CombatState,
}

impl CombatSession {
    /// Rolls initiative once: `d20 + DEX` for living party members, `d20 + 1` for living
    /// monsters. Party members roll first and the sort is stable, so ties favor the party.
    pub fn start<R: RollSource + ?Sized>(
        encounter: Encounter,
        party: &Party,
        rolls: &mut R,
    ) -> Self {
        let mut turn_order = Vec::with_capacity(party.len() + encounter.len());
        for (id, member) in party.iter().filter(|(_, member)| !member.is_dead()) {
            turn_order.push(Combatant {
                id: CombatantId::Player(id),
                name: member.name.clone(),
                is_player: true,
                initiative: roll(rolls, 20) as i32 + member.initiative_modifier(),
            });
        }
        for monster in encounter.alive_monsters() {
            turn_order.push(Combatant {
                id: CombatantId::Monster(monster.id),
                name: monster.name.clone(),
                is_player: false,
                initiative: roll(rolls, 20) as i32 + MONSTER_INITIATIVE_BONUS,
            });
        }
        turn_order.sort_by(|a, b| b.initiative.cmp(&a.initiative));

        let mut session =
            Self { encounter, turn_order, cursor: 0, round: 1, state: CombatState::Ongoing };
        let order: Vec<(&str, i32)> = session
            .turn_order
            .iter()
            .map(|combatant| (combatant.name.as_str(), combatant.initiative))
            .collect();
        tracing::debug!(?order, "initiative rolled");
        if !session.check_terminal(party).is_terminal() && !session.is_eligible(0, party) {
            session.advance(party);
        }
        session
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn turn_order(&self) -> &[Combatant] {
        &self.turn_order
    }

    /// `None` once combat has reached a terminal state.
    pub fn current_turn(&self) -> Option<&Combatant> {
        if self.state.is_terminal() {
            return None;
        }
        self.turn_order.get(self.cursor)
    }

    /// Moves the cursor to the next eligible combatant, wrapping into a new round.
    /// Terminal state is re-checked on every step, including skips.
    pub fn advance(&mut self, party: &Party) -> Option<&Combatant> {
        if self.check_terminal(party).is_terminal() || self.turn_order.is_empty() {
            return None;
        }
        for _ in 0..self.turn_order.len() {
            self.cursor += 1;
            if self.cursor == self.turn_order.len() {
                self.cursor = 0;
                self.round += 1;
            }
            if self.check_terminal(party).is_terminal() {
                return None;
            }
            if self.is_eligible(self.cursor, party) {
                return self.turn_order.get(self.cursor);
            }
        }
        None
    }

    /// Victory once every monster is down; defeat once no party member is conscious or
    /// still rolling death saves. Terminal states never revert.
    pub fn check_terminal(&mut self, party: &Party) -> CombatState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.encounter.is_defeated() {
            self.state = CombatState::Victory;
        } else if !party.can_fight_on() {
            self.state = CombatState::Defeat;
        }
        if self.state.is_terminal() {
            tracing::info!(state = ?self.state, round = self.round, "combat over");
        }
        self.state
    }

    fn is_eligible(&self, index: usize, party: &Party) -> bool {
        match self.turn_order.get(index).map(|combatant| combatant.id) {
            Some(CombatantId::Player(id)) => party.get(id).is_some_and(Character::can_take_turns),
            Some(CombatantId::Monster(id)) => {
                self.encounter.monster(id).is_some_and(Monster::is_alive)
            }
            None => false,
        }
    }

    fn ensure_ongoing(&self) -> Result<(), CombatError> {
        if self.state.is_terminal() {
            return Err(CombatError::CombatOver(self.state));
        }
        Ok(())
    }

    fn living_monster(&self, id: MonsterId) -> Result<&Monster, CombatError> {
        self.encounter
            .monster(id)
            .filter(|monster| monster.is_alive())
            .ok_or(CombatError::MonsterNotFound(id))
    }

    fn living_monster_mut(&mut self, id: MonsterId) -> Result<&mut Monster, CombatError> {
        self.encounter
            .monster_mut(id)
            .filter(|monster| monster.is_alive())
            .ok_or(CombatError::MonsterNotFound(id))
    }
}

/// Party member able to take a normal action this turn.
fn conscious_member(party: &Party, id: CharacterId) -> Result<&Character, CombatError> {
    let member = party.get(id).ok_or(CombatError::CharacterNotFound(id))?;
    if !member.is_conscious() {
        return Err(CombatError::Incapacitated(member.name.clone()));
    }
    Ok(member)
}
