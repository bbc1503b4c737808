//! Turn-by-turn action choice for the party and monsters.

use std::cmp::Ordering;

use super::*;

use crate::character::Character;
use crate::content::{SpellEffect, SpellTarget, Utility, get_spell};
use crate::encounter::Encounter;
use crate::monster::Monster;
use crate::types::CombatantId;

impl Policy {
    /// The action for whoever holds the current turn, or `None` once combat is over.
    pub fn choose_action(&self, session: &CombatSession, party: &Party) -> Option<Action> {
        let combatant = session.current_turn()?;
        match combatant.id {
            CombatantId::Monster(id) => Some(Action::MonsterTurn(id)),
            CombatantId::Player(id) => {
                let member = party.get(id)?;
                if member.is_dying() {
                    return Some(Action::DeathSave(id));
                }
                if !member.is_conscious() {
                    return None;
                }
                self.choose_for(id, member, session.encounter(), party)
            }
        }
    }

    fn choose_for(
        &self,
        id: CharacterId,
        member: &Character,
        encounter: &Encounter,
        party: &Party,
    ) -> Option<Action> {
        if party_hp_percent(party) < u32::from(self.flee_below_percent) {
            return Some(Action::Flee);
        }
        if let Some(action) = self.support(id, member, party) {
            return Some(action);
        }
        if hp_percent(member) < i32::from(self.heal_below_percent)
            && member.can_use_feature(ClassFeature::SecondWind)
        {
            return Some(Action::Feature { character: id, feature: ClassFeature::SecondWind });
        }
        if !member.features.raging && member.can_use_feature(ClassFeature::Rage) {
            return Some(Action::Feature { character: id, feature: ClassFeature::Rage });
        }

        let target = self.pick_target(encounter)?;
        if let Some(action) = self.offensive_spell(id, member, encounter, target) {
            return Some(action);
        }
        Some(Action::Attack { attacker: id, target: target.id })
    }

    /// Heals the worst-off ally under the heal line, or stabilizes a dying one.
    fn support(&self, id: CharacterId, member: &Character, party: &Party) -> Option<Action> {
        let (patient, patient_member) = party
            .iter()
            .filter(|(_, ally)| !ally.is_dead())
            .filter(|(_, ally)| hp_percent(ally) < i32::from(self.heal_below_percent))
            .min_by_key(|(ally_id, ally)| (!ally.is_dying(), hp_percent(ally), *ally_id))?;

        let known = member.known_spells();
        let heal = known.iter().copied().find(|&spell| {
            matches!(get_spell(spell).effect, SpellEffect::Healing { .. })
                && has_slot(member, spell)
        });
        if let Some(spell) = heal {
            let targeting =
                if patient == id { SpellTargeting::Caster } else { SpellTargeting::Ally(patient) };
            return Some(Action::Cast { caster: id, spell, targeting });
        }
        if patient_member.is_dying() {
            let stabilize = known.iter().copied().find(|&spell| {
                get_spell(spell).effect == SpellEffect::Utility(Utility::Stabilize)
                    && has_slot(member, spell)
            })?;
            return Some(Action::Cast {
                caster: id,
                spell: stabilize,
                targeting: SpellTargeting::Ally(patient),
            });
        }
        None
    }

    fn pick_target<'a>(&self, encounter: &'a Encounter) -> Option<&'a Monster> {
        encounter.alive_monsters().min_by(|a, b| {
            for tag in &self.target_priority {
                let cmp = match tag {
                    TargetTag::LowestHp => a.current_hp.cmp(&b.current_hp),
                    TargetTag::Toughest => b.xp.cmp(&a.xp),
                    TargetTag::Boss => b.is_boss.cmp(&a.is_boss),
                };
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            a.id.cmp(&b.id)
        })
    }

    /// Best damaging spell the caster can afford under the slot policy. Leveled spells come
    /// later in class lists, so the last affordable one wins.
    fn offensive_spell(
        &self,
        id: CharacterId,
        member: &Character,
        encounter: &Encounter,
        target: &Monster,
    ) -> Option<Action> {
        let living = encounter.alive_ids();
        let spend_slots = match self.resource_aggression {
            Aggro::Conserve => false,
            Aggro::Measured => living.len() >= 2 || target.is_boss,
            Aggro::Burn => true,
        };

        let mut best = None;
        for spell in member.known_spells() {
            let def = get_spell(spell);
            let damaging = match def.effect {
                SpellEffect::AttackRoll { .. } | SpellEffect::SavingThrow { .. } => true,
                SpellEffect::AutoHit(_) => true,
                SpellEffect::SelfBuff(_) => {
                    if spend_slots
                        && spell == SpellKind::HuntersMark
                        && !member.features.hunters_mark_active
                        && has_slot(member, spell)
                    {
                        return Some(Action::Cast {
                            caster: id,
                            spell,
                            targeting: SpellTargeting::Caster,
                        });
                    }
                    false
                }
                SpellEffect::Healing { .. } | SpellEffect::Utility(_) => false,
            };
            if !damaging || !has_slot(member, spell) || (def.level > 0 && !spend_slots) {
                continue;
            }
            let targeting = match def.target {
                SpellTarget::Enemies if living.len() >= 2 => {
                    SpellTargeting::Enemies(living.clone())
                }
                SpellTarget::SingleEnemy | SpellTarget::Enemies => {
                    SpellTargeting::Enemy(target.id)
                }
                SpellTarget::Ally | SpellTarget::Caster => continue,
            };
            best = Some(Action::Cast { caster: id, spell, targeting });
        }
        best
    }
}

fn hp_percent(member: &Character) -> i32 {
    member.current_hp * 100 / member.max_hp.max(1)
}

fn has_slot(member: &Character, spell: SpellKind) -> bool {
    let level = get_spell(spell).level;
    level == 0 || member.spell_slots().remaining(level) > 0
}

/// Resolves one action against the session.
pub fn execute<R: RollSource + ?Sized>(
    session: &mut CombatSession,
    party: &mut Party,
    action: Action,
    rolls: &mut R,
) -> Result<ActionReport, CombatError> {
    let report = match action {
        Action::Attack { attacker, target } => {
            ActionReport::Attack(session.player_attack(party, attacker, target, rolls)?)
        }
        Action::Cast { caster, spell, targeting } => {
            ActionReport::Spell(session.cast_spell(party, caster, spell, targeting, rolls)?)
        }
        Action::Feature { character, feature } => {
            ActionReport::Feature(session.use_feature(party, character, feature, rolls)?)
        }
        Action::DeathSave(character) => {
            ActionReport::DeathSave(session.death_save(party, character, rolls)?)
        }
        Action::MonsterTurn(monster) => match session.monster_turn(party, monster, rolls)? {
            Some(report) => ActionReport::Attack(report),
            None => ActionReport::Idle(monster),
        },
        Action::Flee => ActionReport::Flee(session.flee(party, rolls)?),
    };
    Ok(report)
}

/// Plays the session out under `policy`, advancing the turn after every action. Stops at a
/// terminal state or after [`MAX_COMBAT_TURNS`], whichever comes first.
pub fn fight<R: RollSource + ?Sized>(
    policy: &Policy,
    session: &mut CombatSession,
    party: &mut Party,
    rolls: &mut R,
) -> Result<Vec<ActionReport>, CombatError> {
    let mut reports = Vec::new();
    for _ in 0..MAX_COMBAT_TURNS {
        if session.state().is_terminal() {
            break;
        }
        if let Some(action) = policy.choose_action(session, party) {
            reports.push(execute(session, party, action, rolls)?);
        }
        if !session.state().is_terminal() {
            session.advance(party);
        }
    }
    if !session.state().is_terminal() {
        tracing::warn!(round = session.round(), "combat stalled");
    }
    Ok(reports)
}
