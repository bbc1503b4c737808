//! Party members and the party roster the combat core borrows per action.

mod class;
mod party;

use serde::{Deserialize, Serialize};

use crate::content::{
    ArmorKind, SHIELD_AC_BONUS, SpellKind, WeaponDef, WeaponKind, get_armor, get_spell, get_weapon,
};
use crate::dice::DeathSaveOutcome;
use crate::types::{Ability, AbilityScores};

pub use class::{CharacterClass, Kit};
pub use party::{Party, XpAward};

pub const MAX_LEVEL: u32 = 5;
pub const MAX_SLOT_LEVEL: usize = 3;
const LEVEL_THRESHOLDS: [u32; MAX_LEVEL as usize] = [0, 300, 900, 2700, 6500];
const RAGE_DAMAGE_BONUS: i32 = 2;

/// XP needed to reach `level`; levels past the cap report the cap's threshold.
pub fn xp_for_level(level: u32) -> u32 {
    LEVEL_THRESHOLDS[(level.clamp(1, MAX_LEVEL) - 1) as usize]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlots {
    max: [u32; MAX_SLOT_LEVEL],
    remaining: [u32; MAX_SLOT_LEVEL],
}

impl SpellSlots {
    pub fn new(max: [u32; MAX_SLOT_LEVEL]) -> Self {
        Self { max, remaining: max }
    }

    fn index(level: u8) -> Option<usize> {
        let level = usize::from(level);
        (1..=MAX_SLOT_LEVEL).contains(&level).then(|| level - 1)
    }

    pub fn max(&self, level: u8) -> u32 {
        Self::index(level).map_or(0, |index| self.max[index])
    }

    pub fn remaining(&self, level: u8) -> u32 {
        Self::index(level).map_or(0, |index| self.remaining[index])
    }

    pub fn consume(&mut self, level: u8) -> bool {
        match Self::index(level) {
            Some(index) if self.remaining[index] > 0 => {
                self.remaining[index] -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn restore_all(&mut self) {
        self.remaining = self.max;
    }

    /// Keeps spent slots spent while raising (or lowering) the ceiling.
    fn rescale(&mut self, max: [u32; MAX_SLOT_LEVEL]) {
        for index in 0..MAX_SLOT_LEVEL {
            let spent = self.max[index].saturating_sub(self.remaining[index]);
            self.remaining[index] = max[index].saturating_sub(spent);
        }
        self.max = max;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub second_wind_used: bool,
    pub rage_uses_remaining: u32,
    pub raging: bool,
    pub hunters_mark_active: bool,
    /// Temporary AC from spells such as Shield; cleared when combat ends.
    pub ac_bonus: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassFeature {
    Rage,
    SecondWind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub absorbed: i32,
    pub taken: i32,
    pub knocked_out: bool,
    pub killed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathSaveStatus {
    Dying,
    Stabilized,
    Revived,
    Dead,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub abilities: AbilityScores,
    pub max_hp: i32,
    pub current_hp: i32,
    pub temp_hp: i32,
    pub weapon: WeaponKind,
    pub armor: Option<ArmorKind>,
    pub shield: bool,
    pub death_saves: DeathSaves,
    pub stable: bool,
    pub features: FeatureFlags,
    slots: SpellSlots,
}

impl Character {
    pub fn new(name: impl Into<String>, class: CharacterClass, level: u32) -> Self {
        Self::with_abilities(name, class, level, class.default_abilities())
    }

    pub fn with_abilities(
        name: impl Into<String>,
        class: CharacterClass,
        level: u32,
        abilities: AbilityScores,
    ) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let kit = class.starting_kit();
        let mut character = Self {
            name: name.into(),
            class,
            level,
            experience: xp_for_level(level),
            abilities,
            max_hp: 1,
            current_hp: 1,
            temp_hp: 0,
            weapon: kit.weapon,
            armor: kit.armor,
            shield: kit.shield,
            death_saves: DeathSaves::default(),
            stable: false,
            features: FeatureFlags::default(),
            slots: SpellSlots::new(class.slot_table(level)),
        };
        character.max_hp = character.hit_point_maximum();
        character.current_hp = character.max_hp;
        character.features.rage_uses_remaining = class.rage_uses(level);
        character
    }

    fn hit_point_maximum(&self) -> i32 {
        let die = self.class.hit_die();
        let con = self.ability_modifier(Ability::Constitution);
        let first = (die + con).max(1);
        let later = (die / 2 + 1 + con).max(1);
        first + later * (self.level as i32 - 1)
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    pub fn proficiency_bonus(&self) -> i32 {
        2 + (self.level as i32 - 1) / 4
    }

    pub fn armor_class(&self) -> i32 {
        let dex = self.ability_modifier(Ability::Dexterity);
        let base = match self.armor {
            Some(kind) => {
                let armor = get_armor(kind);
                armor.base_ac + armor.max_dex.map_or(dex, |cap| dex.min(cap))
            }
            None if self.class == CharacterClass::Barbarian => {
                10 + dex + self.ability_modifier(Ability::Constitution)
            }
            None => 10 + dex,
        };
        let shield = if self.shield { SHIELD_AC_BONUS } else { 0 };
        base + shield + self.features.ac_bonus
    }

    pub fn weapon(&self) -> WeaponDef {
        get_weapon(self.weapon)
    }

    /// Finesse uses the better of STR and DEX, ranged uses DEX, everything else STR.
    pub fn weapon_ability_modifier(&self) -> i32 {
        let weapon = self.weapon();
        let strength = self.ability_modifier(Ability::Strength);
        let dexterity = self.ability_modifier(Ability::Dexterity);
        if weapon.finesse {
            strength.max(dexterity)
        } else if weapon.ranged {
            dexterity
        } else {
            strength
        }
    }

    pub fn rage_damage_bonus(&self) -> i32 {
        if self.features.raging && !self.weapon().ranged { RAGE_DAMAGE_BONUS } else { 0 }
    }

    pub fn initiative_modifier(&self) -> i32 {
        self.ability_modifier(Ability::Dexterity)
    }

    pub fn spellcasting_modifier(&self) -> Option<i32> {
        self.class.spellcasting_ability().map(|ability| self.ability_modifier(ability))
    }

    pub fn spell_attack_bonus(&self) -> Option<i32> {
        self.spellcasting_modifier().map(|modifier| modifier + self.proficiency_bonus())
    }

    pub fn spell_save_dc(&self) -> Option<i32> {
        self.spellcasting_modifier().map(|modifier| 8 + modifier + self.proficiency_bonus())
    }

    pub fn known_spells(&self) -> Vec<SpellKind> {
        self.class
            .spell_list()
            .iter()
            .copied()
            .filter(|&spell| {
                let level = get_spell(spell).level;
                level == 0 || self.slots.max(level) > 0
            })
            .collect()
    }

    pub fn knows_spell(&self, spell: SpellKind) -> bool {
        self.known_spells().contains(&spell)
    }

    pub fn spell_slots(&self) -> &SpellSlots {
        &self.slots
    }

    pub fn sneak_attack_dice(&self) -> u32 {
        if self.class == CharacterClass::Rogue { self.level.div_ceil(2) } else { 0 }
    }

    pub fn is_conscious(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_dead(&self) -> bool {
        self.death_saves.failures >= 3
    }

    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// At 0 HP and still rolling death saves.
    pub fn is_dying(&self) -> bool {
        self.current_hp == 0 && !self.is_dead() && !self.stable
    }

    pub fn can_take_turns(&self) -> bool {
        self.is_conscious() || self.is_dying()
    }

    /// Temporary HP absorbs first. A hit while already down adds death-save failures
    /// (two on a critical); overflow of at least max HP kills outright.
    pub fn take_damage(&mut self, amount: i32, critical: bool) -> DamageOutcome {
        let mut outcome = DamageOutcome::default();
        if self.is_dead() || amount <= 0 {
            return outcome;
        }

        outcome.absorbed = amount.min(self.temp_hp);
        self.temp_hp -= outcome.absorbed;
        let remaining = amount - outcome.absorbed;
        if remaining == 0 {
            return outcome;
        }

        if self.current_hp == 0 {
            self.stable = false;
            self.death_saves.failures = if remaining >= self.max_hp {
                3
            } else {
                (self.death_saves.failures + if critical { 2 } else { 1 }).min(3)
            };
            outcome.killed = self.is_dead();
            return outcome;
        }

        outcome.taken = remaining.min(self.current_hp);
        self.current_hp -= outcome.taken;
        if self.current_hp == 0 {
            outcome.knocked_out = true;
            self.death_saves = DeathSaves::default();
            self.stable = false;
            self.features.raging = false;
            if remaining - outcome.taken >= self.max_hp {
                self.death_saves.failures = 3;
                outcome.killed = true;
            }
        }
        outcome
    }

    /// Returns HP restored. Any healing that brings a character above 0 clears death saves.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead() || amount <= 0 {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
        if self.current_hp > 0 {
            self.death_saves = DeathSaves::default();
            self.stable = false;
        }
        self.current_hp - before
    }

    /// Temporary HP does not stack; the larger pool wins.
    pub fn grant_temp_hp(&mut self, amount: i32) {
        self.temp_hp = self.temp_hp.max(amount);
    }

    pub fn consume_slot(&mut self, level: u8) -> bool {
        self.slots.consume(level)
    }

    pub fn record_death_save(&mut self, outcome: DeathSaveOutcome) -> DeathSaveStatus {
        if !self.is_dying() {
            return self.death_save_status();
        }
        match outcome {
            DeathSaveOutcome::Revived => {
                self.current_hp = 1;
                self.death_saves = DeathSaves::default();
                return DeathSaveStatus::Revived;
            }
            DeathSaveOutcome::Success => {
                self.death_saves.successes += 1;
                if self.death_saves.successes >= 3 {
                    self.stabilize();
                }
            }
            DeathSaveOutcome::Failure => {
                self.death_saves.failures = (self.death_saves.failures + 1).min(3);
            }
            DeathSaveOutcome::DoubleFailure => {
                self.death_saves.failures = (self.death_saves.failures + 2).min(3);
            }
        }
        self.death_save_status()
    }

    fn death_save_status(&self) -> DeathSaveStatus {
        if self.is_dead() {
            DeathSaveStatus::Dead
        } else if self.stable {
            DeathSaveStatus::Stabilized
        } else if self.is_conscious() {
            DeathSaveStatus::Revived
        } else {
            DeathSaveStatus::Dying
        }
    }

    /// Dying characters stop rolling death saves; HP stays at 0.
    pub fn stabilize(&mut self) -> bool {
        if !self.is_dying() {
            return false;
        }
        self.stable = true;
        self.death_saves = DeathSaves::default();
        true
    }

    pub fn can_use_feature(&self, feature: ClassFeature) -> bool {
        if !self.is_conscious() {
            return false;
        }
        match feature {
            ClassFeature::Rage => {
                self.class == CharacterClass::Barbarian
                    && !self.features.raging
                    && self.features.rage_uses_remaining > 0
            }
            ClassFeature::SecondWind => {
                self.class == CharacterClass::Fighter && !self.features.second_wind_used
            }
        }
    }

    /// Drops raging, hunter's mark and spell AC bonuses.
    pub fn clear_combat_effects(&mut self) {
        self.features.raging = false;
        self.features.hunters_mark_active = false;
        self.features.ac_bonus = 0;
    }

    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, xp: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        self.experience += xp;
        let mut gained = 0;
        while self.level < MAX_LEVEL && self.experience >= xp_for_level(self.level + 1) {
            self.level += 1;
            gained += 1;
        }
        if gained > 0 {
            self.max_hp = self.hit_point_maximum();
            self.current_hp = self.max_hp;
            self.death_saves = DeathSaves::default();
            self.stable = false;
            self.slots.rescale(self.class.slot_table(self.level));
            let previous_rages = self.class.rage_uses(self.level - gained);
            self.features.rage_uses_remaining +=
                self.class.rage_uses(self.level).saturating_sub(previous_rages);
            tracing::info!(name = %self.name, level = self.level, "level up");
        }
        gained
    }

    pub fn long_rest(&mut self) {
        if self.is_dead() {
            return;
        }
        self.current_hp = self.max_hp;
        self.temp_hp = 0;
        self.death_saves = DeathSaves::default();
        self.stable = false;
        self.slots.restore_all();
        self.features = FeatureFlags {
            rage_uses_remaining: self.class.rage_uses(self.level),
            ..FeatureFlags::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DeathSaveOutcome;

    #[test]
    fn starting_fighter_matches_kit() {
        let fighter = Character::new("Bram", CharacterClass::Fighter, 1);
        assert_eq!(fighter.max_hp, 12);
        assert_eq!(fighter.armor_class(), 18, "chain mail 16 + shield 2");
        assert_eq!(fighter.proficiency_bonus(), 2);
        assert_eq!(fighter.weapon_ability_modifier(), 2);
        assert!(fighter.known_spells().is_empty());
    }

    #[test]
    fn armor_class_respects_dex_caps_and_unarmored_defense() {
        let barbarian = Character::new("Ulla", CharacterClass::Barbarian, 1);
        assert_eq!(barbarian.armor_class(), 13, "10 + dex 1 + con 2");

        let mut cleric = Character::new("Ansel", CharacterClass::Cleric, 1);
        cleric.abilities.dexterity = 18;
        assert_eq!(cleric.armor_class(), 18, "scale mail caps dex at +2, shield +2");

        let wizard = Character::new("Mira", CharacterClass::Wizard, 1);
        assert_eq!(wizard.armor_class(), 11);
    }

    #[test]
    fn finesse_picks_better_of_strength_and_dexterity() {
        let mut rogue = Character::new("Wren", CharacterClass::Rogue, 1);
        assert_eq!(rogue.weapon_ability_modifier(), 2);
        rogue.abilities.strength = 18;
        assert_eq!(rogue.weapon_ability_modifier(), 4);
        assert_eq!(rogue.sneak_attack_dice(), 1);

        let ranger = Character::new("Tamsin", CharacterClass::Ranger, 1);
        assert_eq!(ranger.weapon_ability_modifier(), 2, "longbow uses dex");
    }

    #[test]
    fn temp_hp_absorbs_before_real_damage() {
        let mut fighter = Character::new("Bram", CharacterClass::Fighter, 1);
        fighter.grant_temp_hp(5);
        let outcome = fighter.take_damage(8, false);
        assert_eq!(outcome.absorbed, 5);
        assert_eq!(outcome.taken, 3);
        assert_eq!(fighter.current_hp, 9);
        assert_eq!(fighter.temp_hp, 0);
    }

    #[test]
    fn massive_damage_kills_outright() {
        let mut wizard = Character::new("Mira", CharacterClass::Wizard, 1);
        let outcome = wizard.take_damage(wizard.current_hp + wizard.max_hp, false);
        assert!(outcome.knocked_out && outcome.killed);
        assert!(wizard.is_dead());
        assert!(!wizard.can_take_turns());
    }

    #[test]
    fn hits_while_down_add_failures_and_crits_add_two() {
        let mut wizard = Character::new("Mira", CharacterClass::Wizard, 1);
        wizard.take_damage(wizard.current_hp, false);
        assert!(wizard.is_dying());

        wizard.take_damage(1, false);
        assert_eq!(wizard.death_saves.failures, 1);
        let outcome = wizard.take_damage(1, true);
        assert_eq!(wizard.death_saves.failures, 3);
        assert!(outcome.killed);
    }

    #[test]
    fn three_successes_stabilize_without_healing() {
        let mut rogue = Character::new("Wren", CharacterClass::Rogue, 1);
        rogue.take_damage(rogue.current_hp, false);
        assert_eq!(rogue.record_death_save(DeathSaveOutcome::Success), DeathSaveStatus::Dying);
        assert_eq!(rogue.record_death_save(DeathSaveOutcome::Failure), DeathSaveStatus::Dying);
        assert_eq!(rogue.record_death_save(DeathSaveOutcome::Success), DeathSaveStatus::Dying);
        assert_eq!(rogue.record_death_save(DeathSaveOutcome::Success), DeathSaveStatus::Stabilized);
        assert_eq!(rogue.current_hp, 0);
        assert!(!rogue.can_take_turns());
        assert_eq!(rogue.death_saves, DeathSaves::default());
    }

    #[test]
    fn natural_twenty_revives_and_double_failure_counts_twice() {
        let mut cleric = Character::new("Ansel", CharacterClass::Cleric, 1);
        cleric.take_damage(cleric.current_hp, false);
        let status = cleric.record_death_save(DeathSaveOutcome::DoubleFailure);
        assert_eq!(status, DeathSaveStatus::Dying);
        assert_eq!(cleric.death_saves.failures, 2);
        assert_eq!(cleric.record_death_save(DeathSaveOutcome::Revived), DeathSaveStatus::Revived);
        assert_eq!(cleric.current_hp, 1);
        assert_eq!(cleric.death_saves, DeathSaves::default());
    }

    #[test]
    fn healing_clears_death_saves_and_restores_eligibility() {
        let mut ranger = Character::new("Tamsin", CharacterClass::Ranger, 1);
        ranger.take_damage(ranger.current_hp, false);
        ranger.record_death_save(DeathSaveOutcome::Failure);
        ranger.record_death_save(DeathSaveOutcome::Success);

        assert_eq!(ranger.heal(4), 4);
        assert!(ranger.is_conscious());
        assert_eq!(ranger.death_saves, DeathSaves::default());

        ranger.take_damage(100, false);
        assert!(ranger.is_dead());
        assert_eq!(ranger.heal(10), 0, "the dead stay dead");
    }

    #[test]
    fn spell_slots_follow_class_tables() {
        let wizard = Character::new("Mira", CharacterClass::Wizard, 3);
        assert_eq!(wizard.spell_slots().max(1), 4);
        assert_eq!(wizard.spell_slots().max(2), 2);
        assert!(!wizard.knows_spell(SpellKind::Fireball));
        assert!(Character::new("Mira", CharacterClass::Wizard, 5).knows_spell(SpellKind::Fireball));

        let ranger = Character::new("Tamsin", CharacterClass::Ranger, 1);
        assert!(!ranger.knows_spell(SpellKind::HuntersMark), "rangers cast from level 2");
        let ranger = Character::new("Tamsin", CharacterClass::Ranger, 2);
        assert!(ranger.knows_spell(SpellKind::HuntersMark));
    }

    #[test]
    fn spell_dc_and_attack_bonus_use_casting_ability() {
        let wizard = Character::new("Mira", CharacterClass::Wizard, 1);
        assert_eq!(wizard.spell_attack_bonus(), Some(4));
        assert_eq!(wizard.spell_save_dc(), Some(12));
        assert_eq!(Character::new("Bram", CharacterClass::Fighter, 1).spell_save_dc(), None);
    }

    #[test]
    fn leveling_up_raises_hp_and_slots_but_keeps_spent_slots_spent() {
        let mut wizard = Character::new("Mira", CharacterClass::Wizard, 1);
        assert!(wizard.consume_slot(1));
        assert_eq!(wizard.gain_experience(299), 0);
        assert_eq!(wizard.gain_experience(1), 1);
        assert_eq!(wizard.level, 2);
        assert_eq!(wizard.max_hp, 8 + 6);
        assert_eq!(wizard.spell_slots().max(1), 3);
        assert_eq!(wizard.spell_slots().remaining(1), 2);

        wizard.long_rest();
        assert_eq!(wizard.spell_slots().remaining(1), 3);
    }

    #[test]
    fn rage_needs_uses_and_ends_on_knockout() {
        let mut barbarian = Character::new("Ulla", CharacterClass::Barbarian, 1);
        assert!(barbarian.can_use_feature(ClassFeature::Rage));
        assert!(!barbarian.can_use_feature(ClassFeature::SecondWind));
        barbarian.features.raging = true;
        assert_eq!(barbarian.rage_damage_bonus(), 2);
        barbarian.take_damage(barbarian.current_hp, false);
        assert!(!barbarian.features.raging);
    }
}
