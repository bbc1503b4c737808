//! Read-only catalogs: weapons, armor, spells and potions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Ability;

pub const SHIELD_AC_BONUS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Force,
    Radiant,
    Thunder,
    Poison,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Longsword,
    Shortsword,
    Greatsword,
    Greataxe,
    Rapier,
    Dagger,
    Handaxe,
    Mace,
    Quarterstaff,
    Longbow,
    Shortbow,
    LightCrossbow,
}

pub struct WeaponDef {
    pub name: &'static str,
    pub damage: &'static str,
    pub damage_type: DamageType,
    pub finesse: bool,
    pub ranged: bool,
    pub two_handed: bool,
}

const fn def(name: &'static str, damage: &'static str, damage_type: DamageType) -> WeaponDef {
    WeaponDef { name, damage, damage_type, finesse: false, ranged: false, two_handed: false }
}

pub fn get_weapon(kind: WeaponKind) -> WeaponDef {
    use DamageType::{Bludgeoning, Piercing, Slashing};

    match kind {
        WeaponKind::Longsword => def("Longsword", "1d8", Slashing),
        WeaponKind::Shortsword => WeaponDef { finesse: true, ..def("Shortsword", "1d6", Piercing) },
        WeaponKind::Greatsword => {
            WeaponDef { two_handed: true, ..def("Greatsword", "2d6", Slashing) }
        }
        WeaponKind::Greataxe => WeaponDef { two_handed: true, ..def("Greataxe", "1d12", Slashing) },
        WeaponKind::Rapier => WeaponDef { finesse: true, ..def("Rapier", "1d8", Piercing) },
        WeaponKind::Dagger => WeaponDef { finesse: true, ..def("Dagger", "1d4", Piercing) },
        WeaponKind::Handaxe => def("Handaxe", "1d6", Slashing),
        WeaponKind::Mace => def("Mace", "1d6", Bludgeoning),
        WeaponKind::Quarterstaff => def("Quarterstaff", "1d6", Bludgeoning),
        WeaponKind::Longbow => {
            WeaponDef { ranged: true, two_handed: true, ..def("Longbow", "1d8", Piercing) }
        }
        WeaponKind::Shortbow => {
            WeaponDef { ranged: true, two_handed: true, ..def("Shortbow", "1d6", Piercing) }
        }
        WeaponKind::LightCrossbow => {
            WeaponDef { ranged: true, two_handed: true, ..def("Light Crossbow", "1d8", Piercing) }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorKind {
    Leather,
    StuddedLeather,
    ChainShirt,
    ScaleMail,
    ChainMail,
    Plate,
}

pub struct ArmorDef {
    pub name: &'static str,
    pub base_ac: i32,
    /// `None` means the full DEX modifier applies.
    pub max_dex: Option<i32>,
}

pub fn get_armor(kind: ArmorKind) -> ArmorDef {
    match kind {
        ArmorKind::Leather => ArmorDef { name: "Leather Armor", base_ac: 11, max_dex: None },
        ArmorKind::StuddedLeather => {
            ArmorDef { name: "Studded Leather", base_ac: 12, max_dex: None }
        }
        ArmorKind::ChainShirt => ArmorDef { name: "Chain Shirt", base_ac: 13, max_dex: Some(2) },
        ArmorKind::ScaleMail => ArmorDef { name: "Scale Mail", base_ac: 14, max_dex: Some(2) },
        ArmorKind::ChainMail => ArmorDef { name: "Chain Mail", base_ac: 16, max_dex: Some(0) },
        ArmorKind::Plate => ArmorDef { name: "Plate Armor", base_ac: 18, max_dex: Some(0) },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    FireBolt,
    RayOfFrost,
    SacredFlame,
    SpareTheDying,
    MagicMissile,
    Sleep,
    BurningHands,
    Thunderwave,
    Shield,
    CureWounds,
    HealingWord,
    GuidingBolt,
    HuntersMark,
    Fireball,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellTarget {
    SingleEnemy,
    /// One or many living monsters; an empty selection means all of them.
    Enemies,
    Ally,
    Caster,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AutoHit {
    Damage { missiles: u32, per_missile: &'static str },
    /// Knocks out monsters in ascending current-HP order while the rolled pool covers them.
    Sleep { pool: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfBuff {
    HuntersMark,
    Shield { ac_bonus: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Utility {
    Stabilize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SpellEffect {
    AttackRoll { damage: &'static str },
    SavingThrow { ability: Ability, damage: &'static str, half_on_save: bool },
    AutoHit(AutoHit),
    /// Heal dice plus the caster's spellcasting modifier.
    Healing { dice: &'static str },
    SelfBuff(SelfBuff),
    Utility(Utility),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellEffectKind {
    AttackRoll,
    SavingThrow,
    AutoHit,
    Healing,
    SelfBuff,
    Utility,
}

impl SpellEffect {
    pub fn kind(&self) -> SpellEffectKind {
        match self {
            SpellEffect::AttackRoll { .. } => SpellEffectKind::AttackRoll,
            SpellEffect::SavingThrow { .. } => SpellEffectKind::SavingThrow,
            SpellEffect::AutoHit(_) => SpellEffectKind::AutoHit,
            SpellEffect::Healing { .. } => SpellEffectKind::Healing,
            SpellEffect::SelfBuff(_) => SpellEffectKind::SelfBuff,
            SpellEffect::Utility(_) => SpellEffectKind::Utility,
        }
    }
}

pub struct SpellDef {
    pub name: &'static str,
    /// 0 for cantrips, which never use a slot.
    pub level: u8,
    pub target: SpellTarget,
    pub effect: SpellEffect,
    pub damage_type: Option<DamageType>,
}

pub fn get_spell(kind: SpellKind) -> SpellDef {
    match kind {
        SpellKind::FireBolt => SpellDef {
            name: "Fire Bolt",
            level: 0,
            target: SpellTarget::SingleEnemy,
            effect: SpellEffect::AttackRoll { damage: "1d10" },
            damage_type: Some(DamageType::Fire),
        },
        SpellKind::RayOfFrost => SpellDef {
            name: "Ray of Frost",
            level: 0,
            target: SpellTarget::SingleEnemy,
            effect: SpellEffect::AttackRoll { damage: "1d8" },
            damage_type: Some(DamageType::Cold),
        },
        SpellKind::SacredFlame => SpellDef {
            name: "Sacred Flame",
            level: 0,
            target: SpellTarget::SingleEnemy,
            effect: SpellEffect::SavingThrow {
                ability: Ability::Dexterity,
                damage: "1d8",
                half_on_save: false,
            },
            damage_type: Some(DamageType::Radiant),
        },
        SpellKind::SpareTheDying => SpellDef {
            name: "Spare the Dying",
            level: 0,
            target: SpellTarget::Ally,
            effect: SpellEffect::Utility(Utility::Stabilize),
            damage_type: None,
        },
        SpellKind::MagicMissile => SpellDef {
            name: "Magic Missile",
            level: 1,
            target: SpellTarget::SingleEnemy,
            effect: SpellEffect::AutoHit(AutoHit::Damage { missiles: 3, per_missile: "1d4+1" }),
            damage_type: Some(DamageType::Force),
        },
        SpellKind::Sleep => SpellDef {
            name: "Sleep",
            level: 1,
            target: SpellTarget::Enemies,
            effect: SpellEffect::AutoHit(AutoHit::Sleep { pool: "5d8" }),
            damage_type: None,
        },
        SpellKind::BurningHands => SpellDef {
            name: "Burning Hands",
            level: 1,
            target: SpellTarget::Enemies,
            effect: SpellEffect::SavingThrow {
                ability: Ability::Dexterity,
                damage: "3d6",
                half_on_save: true,
            },
            damage_type: Some(DamageType::Fire),
        },
        SpellKind::Thunderwave => SpellDef {
            name: "Thunderwave",
            level: 1,
            target: SpellTarget::Enemies,
            effect: SpellEffect::SavingThrow {
                ability: Ability::Constitution,
                damage: "2d8",
                half_on_save: true,
            },
            damage_type: Some(DamageType::Thunder),
        },
        SpellKind::Shield => SpellDef {
            name: "Shield",
            level: 1,
            target: SpellTarget::Caster,
            effect: SpellEffect::SelfBuff(SelfBuff::Shield { ac_bonus: 5 }),
            damage_type: None,
        },
        SpellKind::CureWounds => SpellDef {
            name: "Cure Wounds",
            level: 1,
            target: SpellTarget::Ally,
            effect: SpellEffect::Healing { dice: "1d8" },
            damage_type: None,
        },
        SpellKind::HealingWord => SpellDef {
            name: "Healing Word",
            level: 1,
            target: SpellTarget::Ally,
            effect: SpellEffect::Healing { dice: "1d4" },
            damage_type: None,
        },
        SpellKind::GuidingBolt => SpellDef {
            name: "Guiding Bolt",
            level: 1,
            target: SpellTarget::SingleEnemy,
            effect: SpellEffect::AttackRoll { damage: "4d6" },
            damage_type: Some(DamageType::Radiant),
        },
        SpellKind::HuntersMark => SpellDef {
            name: "Hunter's Mark",
            level: 1,
            target: SpellTarget::Caster,
            effect: SpellEffect::SelfBuff(SelfBuff::HuntersMark),
            damage_type: None,
        },
        SpellKind::Fireball => SpellDef {
            name: "Fireball",
            level: 3,
            target: SpellTarget::Enemies,
            effect: SpellEffect::SavingThrow {
                ability: Ability::Dexterity,
                damage: "8d6",
                half_on_save: true,
            },
            damage_type: Some(DamageType::Fire),
        },
    }
}

impl fmt::Display for SpellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(get_spell(*self).name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PotionKind {
    Healing,
    GreaterHealing,
}

pub struct PotionDef {
    pub name: &'static str,
    pub heal: &'static str,
    pub value_gp: u32,
}

pub fn get_potion(kind: PotionKind) -> PotionDef {
    match kind {
        PotionKind::Healing => {
            PotionDef { name: "Potion of Healing", heal: "2d4+2", value_gp: 50 }
        }
        PotionKind::GreaterHealing => {
            PotionDef { name: "Potion of Greater Healing", heal: "4d4+4", value_gp: 150 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DiceNotation;

    const ALL_WEAPONS: [WeaponKind; 12] = [
        WeaponKind::Longsword,
        WeaponKind::Shortsword,
        WeaponKind::Greatsword,
        WeaponKind::Greataxe,
        WeaponKind::Rapier,
        WeaponKind::Dagger,
        WeaponKind::Handaxe,
        WeaponKind::Mace,
        WeaponKind::Quarterstaff,
        WeaponKind::Longbow,
        WeaponKind::Shortbow,
        WeaponKind::LightCrossbow,
    ];

    const ALL_SPELLS: [SpellKind; 14] = [
        SpellKind::FireBolt,
        SpellKind::RayOfFrost,
        SpellKind::SacredFlame,
        SpellKind::SpareTheDying,
        SpellKind::MagicMissile,
        SpellKind::Sleep,
        SpellKind::BurningHands,
        SpellKind::Thunderwave,
        SpellKind::Shield,
        SpellKind::CureWounds,
        SpellKind::HealingWord,
        SpellKind::GuidingBolt,
        SpellKind::HuntersMark,
        SpellKind::Fireball,
    ];

    #[test]
    fn catalog_dice_all_parse() {
        for kind in ALL_WEAPONS {
            let weapon = get_weapon(kind);
            assert!(DiceNotation::parse(weapon.damage).is_ok(), "{}", weapon.name);
        }
        for kind in ALL_SPELLS {
            let notation = match get_spell(kind).effect {
                SpellEffect::AttackRoll { damage } => Some(damage),
                SpellEffect::SavingThrow { damage, .. } => Some(damage),
                SpellEffect::AutoHit(AutoHit::Damage { per_missile, .. }) => Some(per_missile),
                SpellEffect::AutoHit(AutoHit::Sleep { pool }) => Some(pool),
                SpellEffect::Healing { dice } => Some(dice),
                SpellEffect::SelfBuff(_) | SpellEffect::Utility(_) => None,
            };
            if let Some(notation) = notation {
                assert!(DiceNotation::parse(notation).is_ok(), "{kind}");
            }
        }
    }

    #[test]
    fn ranged_weapons_are_never_finesse() {
        for kind in ALL_WEAPONS {
            let weapon = get_weapon(kind);
            assert!(!(weapon.ranged && weapon.finesse), "{}", weapon.name);
        }
    }

    #[test]
    fn every_effect_kind_is_represented() {
        let kinds: Vec<SpellEffectKind> =
            ALL_SPELLS.iter().map(|&spell| get_spell(spell).effect.kind()).collect();
        for expected in [
            SpellEffectKind::AttackRoll,
            SpellEffectKind::SavingThrow,
            SpellEffectKind::AutoHit,
            SpellEffectKind::Healing,
            SpellEffectKind::SelfBuff,
            SpellEffectKind::Utility,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
    }
}
