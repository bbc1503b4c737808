//! The dying party member's turn.

use super::*;

use crate::dice::death_save;

impl CombatSession {
    pub fn death_save<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        character: CharacterId,
        rolls: &mut R,
    ) -> Result<DeathSaveReport, CombatError> {
        self.ensure_ongoing()?;
        let member = party.get_mut(character).ok_or(CombatError::CharacterNotFound(character))?;
        if !member.is_dying() {
            return Err(CombatError::NotDying(member.name.clone()));
        }

        let roll = death_save(rolls);
        let status = member.record_death_save(roll.outcome);
        tracing::debug!(name = %member.name, natural = roll.natural, ?status, "death save");
        let report = DeathSaveReport {
            name: member.name.clone(),
            roll,
            status,
            successes: member.death_saves.successes,
            failures: member.death_saves.failures,
            state: CombatState::Ongoing,
        };
        let state = self.check_terminal(party);
        Ok(DeathSaveReport { state, ..report })
    }
}
