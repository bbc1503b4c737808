//! Group escape attempts.

use super::*;

use crate::dice::{Advantage, pick_index, saving_throw};
use crate::types::Ability;

use super::attack::random_target;

const FLEE_BASE_DC: i32 = 10;

impl CombatSession {
    /// `10 + ceil(CR)` of the living monster worth the most XP.
    pub fn flee_dc(&self) -> i32 {
        FLEE_BASE_DC + self.encounter.toughest_alive().map_or(0, |monster| monster.challenge.ceil())
    }

    /// Every conscious member rolls DEX against [`Self::flee_dc`]; the party escapes when
    /// more than half succeed. On escape one random monster gets a parting attack and the
    /// session ends as fled. Otherwise every living monster gets a free attack and combat
    /// goes on.
    pub fn flee<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        rolls: &mut R,
    ) -> Result<FleeReport, CombatError> {
        self.ensure_ongoing()?;
        let runners = party.conscious_ids();
        if runners.is_empty() {
            return Err(CombatError::NoTarget);
        }

        let dc = self.flee_dc();
        let mut checks = Vec::with_capacity(runners.len());
        for id in runners {
            let Some(member) = party.get(id) else {
                continue;
            };
            let modifier = member.ability_modifier(Ability::Dexterity);
            let save = saving_throw(rolls, modifier, dc, Advantage::Normal);
            checks.push(FleeCheck { name: member.name.clone(), save });
        }
        let successes = checks.iter().filter(|check| check.save.success).count();
        let escaped = successes * 2 > checks.len();

        let mut attacks = Vec::new();
        if escaped {
            let living = self.encounter.alive_ids();
            if !living.is_empty() {
                let monster = living[pick_index(rolls, living.len())];
                if let Some(target) = random_target(party, rolls) {
                    attacks.push(self.monster_attack(party, monster, target, rolls)?);
                }
            }
            if !self.state.is_terminal() {
                self.state = CombatState::Fled;
                tracing::info!(round = self.round, "party fled");
            }
        } else {
            for monster in self.encounter.alive_ids() {
                if self.state.is_terminal() {
                    break;
                }
                if let Some(report) = self.monster_turn(party, monster, rolls)? {
                    attacks.push(report);
                }
            }
        }

        tracing::debug!(dc, successes, escaped, "flee attempt");
        let state = self.check_terminal(party);
        Ok(FleeReport { dc, checks, escaped, attacks, state })
    }
}
