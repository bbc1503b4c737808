//! Spellcasting: target validation, slot spending and the six effect kinds.

use super::*;

use crate::content::{AutoHit, SelfBuff, SpellEffect, SpellTarget, Utility, get_spell};
use crate::dice::{
    Advantage, AttackRoll, SavingThrow, attack_roll, roll_damage, roll_notation, saving_throw,
};
use crate::types::Ability;

/// Where the caster points a spell. Checked against the spell's target shape before any
/// slot is spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellTargeting {
    Enemy(MonsterId),
    Enemies(Vec<MonsterId>),
    Ally(CharacterId),
    Caster,
}

/// A fully validated cast. Resolving a plan cannot fail.
enum CastPlan {
    Attack { targets: Vec<MonsterId>, damage: &'static str },
    Save { targets: Vec<MonsterId>, ability: Ability, damage: &'static str, half_on_save: bool },
    Missiles { targets: Vec<MonsterId>, missiles: u32, per_missile: &'static str },
    Sleep { targets: Vec<MonsterId>, pool: &'static str },
    Heal { target: CharacterId, dice: &'static str },
    Buff { target: CharacterId, buff: SelfBuff },
    Stabilize { target: CharacterId },
}

impl CombatSession {
    /// Casts `spell`. Leveled spells spend one slot of their level; cantrips are free.
    /// Every check happens before the slot is spent, so an `Err` leaves all state untouched.
    pub fn cast_spell<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        caster: CharacterId,
        spell: SpellKind,
        targeting: SpellTargeting,
        rolls: &mut R,
    ) -> Result<SpellReport, CombatError> {
        self.ensure_ongoing()?;
        let member = conscious_member(party, caster)?;
        let caster_name = member.name.clone();
        if !member.knows_spell(spell) {
            return Err(CombatError::SpellNotKnown { caster: caster_name, spell });
        }
        let def = get_spell(spell);
        if def.level > 0 && member.spell_slots().remaining(def.level) == 0 {
            return Err(CombatError::NoSpellSlot { caster: caster_name, spell, level: def.level });
        }
        let attack_bonus = member.spell_attack_bonus().unwrap_or(0);
        let save_dc = member.spell_save_dc().unwrap_or(0);
        let casting_modifier = member.spellcasting_modifier().unwrap_or(0);
        let plan = self.plan_cast(party, caster, spell, targeting)?;

        let slot_used = (def.level > 0).then_some(def.level);
        if let Some(level) = slot_used
            && let Some(member) = party.get_mut(caster)
        {
            member.consume_slot(level);
        }

        let mut report = SpellReport {
            caster: caster_name,
            spell,
            effect: def.effect.kind(),
            slot_used,
            rolls: Vec::new(),
            targets: Vec::new(),
            total_damage: 0,
            total_healing: 0,
            defeated: Vec::new(),
            state: CombatState::Ongoing,
        };

        match plan {
            CastPlan::Attack { targets, damage } => {
                for id in targets {
                    self.spell_attack(id, attack_bonus, damage, rolls, &mut report);
                }
            }
            CastPlan::Save { targets, ability, damage, half_on_save } => {
                let dice = roll_notation(rolls, damage);
                let full = dice.total.max(0);
                report.rolls.push(dice);
                for id in targets {
                    let Ok(monster) = self.living_monster_mut(id) else {
                        continue;
                    };
                    let modifier = monster.save_modifier(ability);
                    let save = saving_throw(rolls, modifier, save_dc, Advantage::Normal);
                    let amount = match (save.success, half_on_save) {
                        (false, _) => full,
                        (true, true) => full / 2,
                        (true, false) => 0,
                    };
                    let dealt = monster.take_damage(amount);
                    report.push_monster(monster, None, Some(save), dealt);
                }
            }
            CastPlan::Missiles { targets, missiles, per_missile } => {
                for id in targets {
                    let mut amount = 0;
                    for _ in 0..missiles {
                        let dice = roll_notation(rolls, per_missile);
                        amount += dice.total.max(0);
                        report.rolls.push(dice);
                    }
                    if let Ok(monster) = self.living_monster_mut(id) {
                        let dealt = monster.take_damage(amount);
                        report.push_monster(monster, None, None, dealt);
                    }
                }
            }
            CastPlan::Sleep { targets, pool } => self.sleep(targets, pool, rolls, &mut report),
            CastPlan::Heal { target, dice } => {
                let heal_roll = roll_notation(rolls, dice);
                let amount = (heal_roll.total + casting_modifier).max(1);
                report.rolls.push(heal_roll);
                if let Some(patient) = party.get_mut(target) {
                    let healed = patient.heal(amount);
                    report.total_healing += healed;
                    report.targets.push(member_report(patient, healed, healed > 0));
                }
            }
            CastPlan::Buff { target, buff } => {
                if let Some(member) = party.get_mut(target) {
                    match buff {
                        SelfBuff::HuntersMark => member.features.hunters_mark_active = true,
                        SelfBuff::Shield { ac_bonus } => {
                            member.features.ac_bonus = member.features.ac_bonus.max(ac_bonus);
                        }
                    }
                    report.targets.push(member_report(member, 0, true));
                }
            }
            CastPlan::Stabilize { target } => {
                if let Some(member) = party.get_mut(target) {
                    let affected = member.stabilize();
                    report.targets.push(member_report(member, 0, affected));
                }
            }
        }

        tracing::debug!(
            caster = %report.caster,
            %spell,
            damage = report.total_damage,
            healing = report.total_healing,
            defeated = report.defeated.len(),
            "spell cast"
        );
        report.state = self.check_terminal(party);
        Ok(report)
    }

    fn spell_attack<R: RollSource + ?Sized>(
        &mut self,
        target: MonsterId,
        bonus: i32,
        damage: &str,
        rolls: &mut R,
        report: &mut SpellReport,
    ) {
        let Ok(monster) = self.living_monster_mut(target) else {
            return;
        };
        let attack = attack_roll(rolls, bonus, monster.armor_class, Advantage::Normal);
        let mut dealt = 0;
        if attack.hit {
            let dice = roll_damage(rolls, damage, attack.critical);
            dealt = monster.take_damage(dice.total.max(1));
            report.rolls.push(dice);
        }
        report.push_monster(monster, Some(attack), None, dealt);
    }

    /// Spends the rolled pool on targets in ascending current-HP order. A target sleeps
    /// (drops to 0 HP) when the remaining pool covers its current HP.
    fn sleep<R: RollSource + ?Sized>(
        &mut self,
        targets: Vec<MonsterId>,
        pool: &str,
        rolls: &mut R,
        report: &mut SpellReport,
    ) {
        let dice = roll_notation(rolls, pool);
        let mut remaining = dice.total;
        report.rolls.push(dice);

        let mut sleepers: Vec<(MonsterId, i32)> = targets
            .into_iter()
            .filter_map(|id| self.living_monster(id).ok().map(|monster| (id, monster.current_hp)))
            .collect();
        sleepers.sort_by_key(|&(_, hp)| hp);

        for (id, hp) in sleepers {
            let Ok(monster) = self.living_monster_mut(id) else {
                continue;
            };
            let affected = remaining >= hp;
            if affected {
                remaining -= hp;
                monster.knock_out();
                report.defeated.push(monster.name.clone());
            }
            report.targets.push(SpellTargetReport {
                target: monster.name.clone(),
                attack: None,
                save: None,
                damage: 0,
                healed: 0,
                hp: monster.current_hp,
                affected,
                down: !monster.is_alive(),
            });
        }
    }

    fn plan_cast(
        &self,
        party: &Party,
        caster: CharacterId,
        spell: SpellKind,
        targeting: SpellTargeting,
    ) -> Result<CastPlan, CombatError> {
        let def = get_spell(spell);
        let plan = match def.effect {
            SpellEffect::AttackRoll { damage } => CastPlan::Attack {
                targets: self.enemy_targets(def.target, spell, targeting)?,
                damage,
            },
            SpellEffect::SavingThrow { ability, damage, half_on_save } => CastPlan::Save {
                targets: self.enemy_targets(def.target, spell, targeting)?,
                ability,
                damage,
                half_on_save,
            },
            SpellEffect::AutoHit(AutoHit::Damage { missiles, per_missile }) => CastPlan::Missiles {
                targets: self.enemy_targets(def.target, spell, targeting)?,
                missiles,
                per_missile,
            },
            SpellEffect::AutoHit(AutoHit::Sleep { pool }) => {
                CastPlan::Sleep { targets: self.enemy_targets(def.target, spell, targeting)?, pool }
            }
            SpellEffect::Healing { dice } => {
                let target = match targeting {
                    SpellTargeting::Ally(id) => id,
                    SpellTargeting::Caster => caster,
                    _ => return Err(CombatError::InvalidTarget { spell }),
                };
                party
                    .get(target)
                    .filter(|member| !member.is_dead())
                    .ok_or(CombatError::CharacterNotFound(target))?;
                CastPlan::Heal { target, dice }
            }
            SpellEffect::SelfBuff(buff) => match targeting {
                SpellTargeting::Caster => CastPlan::Buff { target: caster, buff },
                _ => return Err(CombatError::InvalidTarget { spell }),
            },
            SpellEffect::Utility(Utility::Stabilize) => {
                let SpellTargeting::Ally(target) = targeting else {
                    return Err(CombatError::InvalidTarget { spell });
                };
                let member = party.get(target).ok_or(CombatError::CharacterNotFound(target))?;
                if !member.is_dying() {
                    return Err(CombatError::NotDying(member.name.clone()));
                }
                CastPlan::Stabilize { target }
            }
        };
        Ok(plan)
    }

    fn enemy_targets(
        &self,
        shape: SpellTarget,
        spell: SpellKind,
        targeting: SpellTargeting,
    ) -> Result<Vec<MonsterId>, CombatError> {
        let mut ids = match (shape, targeting) {
            (SpellTarget::SingleEnemy | SpellTarget::Enemies, SpellTargeting::Enemy(id)) => {
                vec![id]
            }
            (SpellTarget::Enemies, SpellTargeting::Enemies(ids)) => ids,
            _ => return Err(CombatError::InvalidTarget { spell }),
        };
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(CombatError::NoTarget);
        }
        for &id in &ids {
            self.living_monster(id)?;
        }
        Ok(ids)
    }
}

impl SpellReport {
    fn push_monster(
        &mut self,
        monster: &Monster,
        attack: Option<AttackRoll>,
        save: Option<SavingThrow>,
        dealt: i32,
    ) {
        self.total_damage += dealt;
        let down = !monster.is_alive();
        if down && dealt > 0 {
            self.defeated.push(monster.name.clone());
        }
        self.targets.push(SpellTargetReport {
            target: monster.name.clone(),
            attack,
            save,
            damage: dealt,
            healed: 0,
            hp: monster.current_hp,
            affected: dealt > 0,
            down,
        });
    }
}

fn member_report(member: &Character, healed: i32, affected: bool) -> SpellTargetReport {
    SpellTargetReport {
        target: member.name.clone(),
        attack: None,
        save: None,
        damage: 0,
        healed,
        hp: member.current_hp,
        affected,
        down: !member.is_conscious(),
    }
}
