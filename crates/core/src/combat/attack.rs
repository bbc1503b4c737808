//! Weapon attacks in both directions plus the simple monster turn policy.

use super::*;

use crate::dice::{Advantage, attack_roll, pick_index, roll_damage, roll_n};

const SNEAK_ATTACK_DIE: u32 = 6;
const HUNTERS_MARK_DIE: u32 = 6;

impl CombatSession {
    /// Weapon attack: ability modifier plus proficiency to hit, weapon dice plus the same
    /// modifier on a hit. Sneak attack dice are doubled on a critical; hunter's mark is not.
    pub fn player_attack<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        attacker: CharacterId,
        target: MonsterId,
        rolls: &mut R,
    ) -> Result<AttackReport, CombatError> {
        self.ensure_ongoing()?;
        let member = conscious_member(party, attacker)?;
        let armor_class = self.living_monster(target)?.armor_class;

        let weapon = member.weapon();
        let ability_modifier = member.weapon_ability_modifier();
        let to_hit = ability_modifier + member.proficiency_bonus();
        let attack = attack_roll(rolls, to_hit, armor_class, Advantage::Normal);

        let damage = attack.hit.then(|| {
            let dice = roll_damage(rolls, weapon.damage, attack.critical);
            let mut extras = Vec::new();

            let sneak_dice = member.sneak_attack_dice();
            if sneak_dice > 0 {
                let count = if attack.critical { sneak_dice * 2 } else { sneak_dice };
                let faces = roll_n(rolls, count, SNEAK_ATTACK_DIE);
                let amount = faces.iter().sum::<u32>() as i32;
                extras.push(ExtraDamage {
                    source: ExtraDamageSource::SneakAttack,
                    rolls: faces,
                    amount,
                });
            }
            let rage = member.rage_damage_bonus();
            if rage > 0 {
                extras.push(ExtraDamage {
                    source: ExtraDamageSource::Rage,
                    rolls: Vec::new(),
                    amount: rage,
                });
            }
            if member.features.hunters_mark_active {
                let face = roll(rolls, HUNTERS_MARK_DIE);
                extras.push(ExtraDamage {
                    source: ExtraDamageSource::HuntersMark,
                    rolls: vec![face],
                    amount: face as i32,
                });
            }

            let extra_total: i32 = extras.iter().map(|extra| extra.amount).sum();
            let total = (dice.total + ability_modifier + extra_total).max(1);
            DamageReport { dice, ability_modifier, extras, resisted: false, total }
        });

        let attacker_name = member.name.clone();
        let monster = self.living_monster_mut(target)?;
        if let Some(damage) = &damage {
            monster.take_damage(damage.total);
        }
        let (target_name, target_hp, target_max_hp, target_down) =
            (monster.name.clone(), monster.current_hp, monster.max_hp, !monster.is_alive());

        tracing::debug!(
            attacker = %attacker_name,
            target = %target_name,
            natural = attack.natural,
            hit = attack.hit,
            damage = damage.as_ref().map_or(0, |damage| damage.total),
            "player attack"
        );
        let state = self.check_terminal(party);
        Ok(AttackReport {
            attacker: attacker_name,
            target: target_name,
            attack_name: weapon.name.to_string(),
            roll: attack,
            damage,
            target_hp,
            target_max_hp,
            target_down,
            target_killed: false,
            state,
        })
    }

    /// Monster attack against a living party member. A raging target halves the damage,
    /// rounded down; a critical against a downed target costs two death saves.
    pub fn monster_attack<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        attacker: MonsterId,
        target: CharacterId,
        rolls: &mut R,
    ) -> Result<AttackReport, CombatError> {
        self.ensure_ongoing()?;
        let monster = self.living_monster(attacker)?;
        let member = party
            .get_mut(target)
            .filter(|member| !member.is_dead())
            .ok_or(CombatError::CharacterNotFound(target))?;

        let attack =
            attack_roll(rolls, monster.attack_bonus, member.armor_class(), Advantage::Normal);
        let damage = attack.hit.then(|| {
            let dice = roll_damage(rolls, &monster.damage, attack.critical);
            let raw = dice.total.max(1);
            let resisted = member.features.raging;
            let total = if resisted { raw / 2 } else { raw };
            DamageReport { dice, ability_modifier: 0, extras: Vec::new(), resisted, total }
        });

        let outcome = damage
            .as_ref()
            .map(|damage| member.take_damage(damage.total, attack.critical))
            .unwrap_or_default();

        tracing::debug!(
            attacker = %monster.name,
            target = %member.name,
            natural = attack.natural,
            hit = attack.hit,
            damage = damage.as_ref().map_or(0, |damage| damage.total),
            "monster attack"
        );
        let report = AttackReport {
            attacker: monster.name.clone(),
            target: member.name.clone(),
            attack_name: monster.attack_name.clone(),
            roll: attack,
            damage,
            target_hp: member.current_hp,
            target_max_hp: member.max_hp,
            target_down: outcome.knocked_out || !member.is_conscious(),
            target_killed: member.is_dead(),
            state: CombatState::Ongoing,
        };
        let state = self.check_terminal(party);
        Ok(AttackReport { state, ..report })
    }

    /// Attacks a random conscious party member, falling back to a random dying one.
    /// `Ok(None)` when nobody is left to attack.
    pub fn monster_turn<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        monster: MonsterId,
        rolls: &mut R,
    ) -> Result<Option<AttackReport>, CombatError> {
        self.ensure_ongoing()?;
        self.living_monster(monster)?;
        let Some(target) = random_target(party, rolls) else {
            return Ok(None);
        };
        self.monster_attack(party, monster, target, rolls).map(Some)
    }
}

pub(super) fn random_target<R: RollSource + ?Sized>(
    party: &Party,
    rolls: &mut R,
) -> Option<CharacterId> {
    let mut candidates = party.conscious_ids();
    if candidates.is_empty() {
        candidates = party.dying_ids();
    }
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[pick_index(rolls, candidates.len())])
}
