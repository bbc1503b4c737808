//! Fully populated result values handed back to the orchestrator for rendering.

use super::*;

use crate::character::DeathSaveStatus;
use crate::content::SpellEffectKind;
use crate::dice::{AttackRoll, DeathSaveRoll, DiceRoll, SavingThrow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtraDamageSource {
    SneakAttack,
    Rage,
    HuntersMark,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDamage {
    pub source: ExtraDamageSource,
    pub rolls: Vec<u32>,
    pub amount: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub dice: DiceRoll,
    pub ability_modifier: i32,
    pub extras: Vec<ExtraDamage>,
    /// Halved by a raging target.
    pub resisted: bool,
    pub total: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: String,
    pub target: String,
    pub attack_name: String,
    pub roll: AttackRoll,
    pub damage: Option<DamageReport>,
    pub target_hp: i32,
    pub target_max_hp: i32,
    /// Monster at 0 HP, or party member knocked unconscious.
    pub target_down: bool,
    /// Party member pushed past their last death save.
    pub target_killed: bool,
    pub state: CombatState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellTargetReport {
    pub target: String,
    pub attack: Option<AttackRoll>,
    pub save: Option<SavingThrow>,
    pub damage: i32,
    pub healed: i32,
    pub hp: i32,
    pub affected: bool,
    pub down: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellReport {
    pub caster: String,
    pub spell: SpellKind,
    pub effect: SpellEffectKind,
    pub slot_used: Option<u8>,
    pub rolls: Vec<DiceRoll>,
    pub targets: Vec<SpellTargetReport>,
    pub total_damage: i32,
    pub total_healing: i32,
    pub defeated: Vec<String>,
    pub state: CombatState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub name: String,
    pub feature: ClassFeature,
    pub roll: Option<DiceRoll>,
    pub healed: i32,
    pub hp: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaveReport {
    pub name: String,
    pub roll: DeathSaveRoll,
    pub status: DeathSaveStatus,
    pub successes: u8,
    pub failures: u8,
    pub state: CombatState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeCheck {
    pub name: String,
    pub save: SavingThrow,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeReport {
    pub dc: i32,
    pub checks: Vec<FleeCheck>,
    pub escaped: bool,
    /// The parting shot on escape, or the monsters' free round on failure.
    pub attacks: Vec<AttackReport>,
    pub state: CombatState,
}
