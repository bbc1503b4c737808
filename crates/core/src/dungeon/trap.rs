//! Room traps and the saving throws they force on the party.

use serde::{Deserialize, Serialize};

use crate::character::Party;
use crate::content::DamageType;
use crate::dice::{Advantage, RollSource, SavingThrow, pick_index, roll_notation, saving_throw};
use crate::types::{Ability, CharacterId};

const PASSIVE_PERCEPTION_BASE: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    Pit,
    PoisonDart,
    SwingingBlade,
    FireGlyph,
    CrushingWalls,
}

impl TrapKind {
    pub const ALL: [TrapKind; 5] = [
        TrapKind::Pit,
        TrapKind::PoisonDart,
        TrapKind::SwingingBlade,
        TrapKind::FireGlyph,
        TrapKind::CrushingWalls,
    ];

    pub fn draw<R: RollSource + ?Sized>(rolls: &mut R) -> TrapKind {
        TrapKind::ALL[pick_index(rolls, TrapKind::ALL.len())]
    }
}

pub struct TrapDef {
    pub name: &'static str,
    pub damage: &'static str,
    pub damage_type: DamageType,
    pub save_ability: Ability,
    pub save_dc: i32,
    pub detection_dc: i32,
}

pub fn get_trap(kind: TrapKind) -> TrapDef {
    match kind {
        TrapKind::Pit => TrapDef {
            name: "Pit Trap",
            damage: "2d10",
            damage_type: DamageType::Piercing,
            save_ability: Ability::Dexterity,
            save_dc: 12,
            detection_dc: 12,
        },
        TrapKind::PoisonDart => TrapDef {
            name: "Poison Dart",
            damage: "1d4",
            damage_type: DamageType::Piercing,
            save_ability: Ability::Dexterity,
            save_dc: 11,
            detection_dc: 14,
        },
        TrapKind::SwingingBlade => TrapDef {
            name: "Swinging Blade",
            damage: "2d6",
            damage_type: DamageType::Slashing,
            save_ability: Ability::Dexterity,
            save_dc: 13,
            detection_dc: 13,
        },
        TrapKind::FireGlyph => TrapDef {
            name: "Fire Glyph",
            damage: "3d6",
            damage_type: DamageType::Fire,
            save_ability: Ability::Dexterity,
            save_dc: 14,
            detection_dc: 15,
        },
        TrapKind::CrushingWalls => TrapDef {
            name: "Crushing Walls",
            damage: "4d6",
            damage_type: DamageType::Bludgeoning,
            save_ability: Ability::Strength,
            save_dc: 15,
            detection_dc: 10,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    pub triggered: bool,
    pub disarmed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapSave {
    pub character: CharacterId,
    pub name: String,
    pub save: SavingThrow,
    pub damage: i32,
    pub knocked_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapReport {
    pub kind: TrapKind,
    pub name: String,
    /// Spotted by the party's best passive perception and disarmed without harm.
    pub noticed: bool,
    pub saves: Vec<TrapSave>,
}

impl Trap {
    pub fn new(kind: TrapKind) -> Self {
        Self { kind, triggered: false, disarmed: false }
    }

    pub fn is_armed(&self) -> bool {
        !self.triggered && !self.disarmed
    }

    /// A trap the party's best passive perception (`10 + WIS`) spots is disarmed. Otherwise
    /// it fires once: every conscious member saves, taking full damage on a failure and half
    /// on a success.
    pub fn spring<R: RollSource + ?Sized>(
        &mut self,
        party: &mut Party,
        rolls: &mut R,
    ) -> TrapReport {
        let def = get_trap(self.kind);
        let mut report = TrapReport {
            kind: self.kind,
            name: def.name.to_string(),
            noticed: false,
            saves: Vec::new(),
        };
        if !self.is_armed() {
            return report;
        }

        let perception = party
            .iter()
            .filter(|(_, member)| member.is_conscious())
            .map(|(_, member)| PASSIVE_PERCEPTION_BASE + member.ability_modifier(Ability::Wisdom))
            .max()
            .unwrap_or(0);
        if perception >= def.detection_dc {
            self.disarmed = true;
            report.noticed = true;
            tracing::debug!(trap = def.name, perception, "trap spotted");
            return report;
        }

        self.triggered = true;
        for id in party.conscious_ids() {
            let Some(member) = party.get_mut(id) else {
                continue;
            };
            let modifier = member.ability_modifier(def.save_ability);
            let save = saving_throw(rolls, modifier, def.save_dc, Advantage::Normal);
            let rolled = roll_notation(rolls, def.damage).total;
            let damage = if save.success { rolled / 2 } else { rolled };
            let outcome = member.take_damage(damage, false);
            report.saves.push(TrapSave {
                character: id,
                name: member.name.clone(),
                save,
                damage,
                knocked_out: outcome.knocked_out,
            });
        }
        tracing::debug!(
            trap = def.name,
            total = report.saves.iter().map(|save| save.damage).sum::<i32>(),
            "trap sprung"
        );
        report
    }
}
