//! Class features usable as combat actions.

use super::*;

use crate::dice::roll_notation;

impl CombatSession {
    /// Rage starts a barbarian's rage and spends a use; Second Wind heals a fighter for
    /// `1d10 + level` once per rest.
    pub fn use_feature<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        character: CharacterId,
        feature: ClassFeature,
        rolls: &mut R,
    ) -> Result<FeatureReport, CombatError> {
        self.ensure_ongoing()?;
        let member = party.get_mut(character).ok_or(CombatError::CharacterNotFound(character))?;
        if !member.can_use_feature(feature) {
            return Err(CombatError::FeatureUnavailable { name: member.name.clone(), feature });
        }

        let (roll, healed) = match feature {
            ClassFeature::Rage => {
                member.features.raging = true;
                member.features.rage_uses_remaining -= 1;
                (None, 0)
            }
            ClassFeature::SecondWind => {
                member.features.second_wind_used = true;
                let notation = format!("1d10+{}", member.level);
                let dice = roll_notation(rolls, &notation);
                let healed = member.heal(dice.total);
                (Some(dice), healed)
            }
        };
        tracing::debug!(name = %member.name, ?feature, healed, "class feature");
        Ok(FeatureReport {
            name: member.name.clone(),
            feature,
            roll,
            healed,
            hp: member.current_hp,
        })
    }
}
