//! Scripted play: a policy that picks combat actions and exploration steps, and a
//! driver that runs a whole expedition with it.

mod explore;
mod tactics;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{CharacterClass, ClassFeature, Party};
use crate::combat::{
    AttackReport, CombatError, CombatSession, CombatState, DeathSaveReport, FeatureReport,
    FleeReport, SpellReport, SpellTargeting,
};
use crate::content::SpellKind;
use crate::dice::RollSource;
use crate::dungeon::NavigationError;
use crate::expedition::{Expedition, Tally};
use crate::types::{CharacterId, MonsterId};

pub use explore::next_direction;
pub use tactics::{execute, fight};

/// Combat turns before a fight is called a stalemate.
pub const MAX_COMBAT_TURNS: u32 = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetTag {
    LowestHp,
    Toughest,
    Boss,
}

/// How freely leveled spell slots go into damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggro {
    Conserve,
    /// Slots go to packs of two or more and to bosses.
    Measured,
    Burn,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub target_priority: Vec<TargetTag>,
    pub resource_aggression: Aggro,
    /// Heal an ally whose HP falls below this percentage of their maximum.
    pub heal_below_percent: u8,
    /// Flee once the standing party's HP falls below this percentage.
    pub flee_below_percent: u8,
    /// Rest out of combat when the party's HP falls below this percentage.
    pub rest_below_percent: u8,
    pub max_rests: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            target_priority: vec![TargetTag::Boss, TargetTag::LowestHp],
            resource_aggression: Aggro::Measured,
            heal_below_percent: 50,
            flee_below_percent: 20,
            rest_below_percent: 40,
            max_rests: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Attack { attacker: CharacterId, target: MonsterId },
    Cast { caster: CharacterId, spell: SpellKind, targeting: SpellTargeting },
    Feature { character: CharacterId, feature: ClassFeature },
    DeathSave(CharacterId),
    MonsterTurn(MonsterId),
    Flee,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReport {
    Attack(AttackReport),
    Spell(SpellReport),
    Feature(FeatureReport),
    DeathSave(DeathSaveReport),
    Flee(FleeReport),
    /// The monster had no one left to hit.
    Idle(MonsterId),
}

#[derive(Debug, Error)]
pub enum AutopilotError {
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpeditionResult {
    BossDefeated,
    PartyDefeated,
    /// Ran out of moves or found nothing left to do.
    Stalled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatus {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub dead: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionSummary {
    pub dungeon: String,
    pub level: u32,
    pub result: ExpeditionResult,
    pub rooms: usize,
    pub rooms_visited: usize,
    pub moves: u32,
    pub rests: u32,
    pub potions_used: u32,
    pub tally: Tally,
    pub gold: u32,
    pub party: Vec<MemberStatus>,
    pub fingerprint: u64,
}

/// Percentage of maximum HP the non-dead members hold together.
pub fn party_hp_percent(party: &Party) -> u32 {
    let (current, max) = party
        .iter()
        .filter(|(_, member)| !member.is_dead())
        .fold((0, 0), |(current, max), (_, member)| {
            (current + member.current_hp.max(0), max + member.max_hp)
        });
    if max <= 0 {
        return 0;
    }
    (current * 100 / max) as u32
}

/// Explores the current dungeon room by room, fighting every encounter it walks into,
/// until the boss falls, the party is beaten, or `max_moves` rooms have been entered.
pub fn run_expedition<R: RollSource>(
    expedition: &mut Expedition<R>,
    policy: &Policy,
    max_moves: u32,
) -> Result<ExpeditionSummary, AutopilotError> {
    let mut moves = 0;
    let mut rests = 0;
    let mut potions_used = 0;
    let result = loop {
        if expedition.boss_defeated() {
            break ExpeditionResult::BossDefeated;
        }
        if expedition.is_over() {
            break ExpeditionResult::PartyDefeated;
        }

        if let Some(mut session) = expedition.begin_combat()? {
            let (party, rolls) = expedition.party_and_rolls();
            fight(policy, &mut session, party, rolls)?;
            let aftermath = expedition.conclude_combat(session)?;
            if aftermath.outcome.state == CombatState::Ongoing {
                break ExpeditionResult::Stalled;
            }
            continue;
        }
        expedition.collect_treasure()?;

        let hp = party_hp_percent(expedition.party());
        let anyone_down = expedition.party().iter().any(|(_, member)| {
            !member.is_dead() && !member.is_conscious()
        });
        if (anyone_down || hp < u32::from(policy.rest_below_percent)) && rests < policy.max_rests {
            expedition.rest();
            rests += 1;
        } else {
            potions_used += drink_potions(expedition, policy);
            for (_, member) in expedition.party_mut().iter_mut() {
                member.stabilize();
            }
        }

        if moves >= max_moves {
            break ExpeditionResult::Stalled;
        }
        let Some(dungeon) = expedition.dungeon() else {
            return Err(NavigationError::NoDungeon.into());
        };
        let Some(direction) = next_direction(dungeon) else {
            break ExpeditionResult::Stalled;
        };
        expedition.travel(direction)?;
        moves += 1;
    };

    let dungeon = expedition.dungeon().ok_or(NavigationError::NoDungeon)?;
    let summary = ExpeditionSummary {
        dungeon: dungeon.name.clone(),
        level: dungeon.level,
        result,
        rooms: dungeon.len(),
        rooms_visited: dungeon.visited_count(),
        moves,
        rests,
        potions_used,
        tally: expedition.tally(),
        gold: expedition.party().gold,
        party: expedition
            .party()
            .iter()
            .map(|(_, member)| MemberStatus {
                name: member.name.clone(),
                class: member.class,
                level: member.level,
                experience: member.experience,
                current_hp: member.current_hp,
                max_hp: member.max_hp,
                dead: member.is_dead(),
            })
            .collect(),
        fingerprint: dungeon.fingerprint(),
    };
    tracing::info!(result = ?summary.result, moves, rests, "expedition finished");
    Ok(summary)
}

/// Pours stocked potions into the most wounded conscious members below the heal line.
fn drink_potions<R: RollSource>(expedition: &mut Expedition<R>, policy: &Policy) -> u32 {
    let mut used = 0;
    loop {
        let (party, rolls) = expedition.party_and_rolls();
        let Some(&kind) = party.potions.first() else {
            break;
        };
        let wounded = party
            .iter()
            .filter(|(_, member)| member.is_conscious())
            .map(|(id, member)| (member.current_hp * 100 / member.max_hp.max(1), id))
            .filter(|(percent, _)| *percent < i32::from(policy.heal_below_percent))
            .min();
        let Some((_, target)) = wounded else {
            break;
        };
        if party.quaff(kind, target, rolls).is_none() {
            break;
        }
        used += 1;
    }
    used
}
