//! Tearing a session down and handing results back to the party.

use super::*;

use crate::character::XpAward;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub state: CombatState,
    pub rounds: u32,
    /// The encounter as combat left it; a fled encounter keeps its wounded survivors.
    pub encounter: Encounter,
    pub xp_award: Option<XpAward>,
    /// Dying members carried out of the fight and stabilized.
    pub stabilized: Vec<String>,
}

impl CombatSession {
    /// Clears per-combat effects on every member and stabilizes anyone still dying once the
    /// fight is behind them. Victory splits the encounter's XP among the survivors.
    pub fn conclude(self, party: &mut Party) -> CombatOutcome {
        let survived = matches!(self.state, CombatState::Victory | CombatState::Fled);
        let mut stabilized = Vec::new();
        for (_, member) in party.iter_mut() {
            member.clear_combat_effects();
            if survived && member.stabilize() {
                stabilized.push(member.name.clone());
            }
        }

        let xp_award = (self.state == CombatState::Victory)
            .then(|| party.award_experience(self.encounter.total_xp()));
        tracing::info!(
            state = ?self.state,
            rounds = self.round,
            xp = xp_award.as_ref().map_or(0, |award| award.total),
            "combat concluded"
        );
        CombatOutcome {
            state: self.state,
            rounds: self.round,
            encounter: self.encounter,
            xp_award,
            stabilized,
        }
    }
}
