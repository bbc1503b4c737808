//! Class tables: hit dice, starting kits, spell lists and slot progressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{ArmorKind, SpellKind, WeaponKind};
use crate::types::{Ability, AbilityScores};

use super::MAX_SLOT_LEVEL;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Fighter,
    Wizard,
    Rogue,
    Cleric,
    Ranger,
    Barbarian,
}

pub struct Kit {
    pub weapon: WeaponKind,
    pub armor: Option<ArmorKind>,
    pub shield: bool,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        CharacterClass::Fighter,
        CharacterClass::Wizard,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
        CharacterClass::Ranger,
        CharacterClass::Barbarian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Barbarian => "Barbarian",
        }
    }

    pub fn hit_die(self) -> i32 {
        match self {
            CharacterClass::Wizard => 6,
            CharacterClass::Rogue | CharacterClass::Cleric => 8,
            CharacterClass::Fighter | CharacterClass::Ranger => 10,
            CharacterClass::Barbarian => 12,
        }
    }

    pub fn spellcasting_ability(self) -> Option<Ability> {
        match self {
            CharacterClass::Wizard => Some(Ability::Intelligence),
            CharacterClass::Cleric | CharacterClass::Ranger => Some(Ability::Wisdom),
            CharacterClass::Fighter | CharacterClass::Rogue | CharacterClass::Barbarian => None,
        }
    }

    /// Standard array (15, 14, 13, 12, 10, 8) placed by class priority.
    pub fn default_abilities(self) -> AbilityScores {
        match self {
            CharacterClass::Fighter | CharacterClass::Barbarian => {
                AbilityScores::new(15, 13, 14, 8, 12, 10)
            }
            CharacterClass::Wizard => AbilityScores::new(8, 13, 14, 15, 12, 10),
            CharacterClass::Rogue => AbilityScores::new(8, 15, 14, 12, 13, 10),
            CharacterClass::Cleric => AbilityScores::new(13, 12, 14, 8, 15, 10),
            CharacterClass::Ranger => AbilityScores::new(12, 15, 13, 10, 14, 8),
        }
    }

    pub fn starting_kit(self) -> Kit {
        match self {
            CharacterClass::Fighter => Kit {
                weapon: WeaponKind::Longsword,
                armor: Some(ArmorKind::ChainMail),
                shield: true,
            },
            CharacterClass::Wizard => {
                Kit { weapon: WeaponKind::Quarterstaff, armor: None, shield: false }
            }
            CharacterClass::Rogue => {
                Kit { weapon: WeaponKind::Rapier, armor: Some(ArmorKind::Leather), shield: false }
            }
            CharacterClass::Cleric => {
                Kit { weapon: WeaponKind::Mace, armor: Some(ArmorKind::ScaleMail), shield: true }
            }
            CharacterClass::Ranger => Kit {
                weapon: WeaponKind::Longbow,
                armor: Some(ArmorKind::ScaleMail),
                shield: false,
            },
            CharacterClass::Barbarian => {
                Kit { weapon: WeaponKind::Greataxe, armor: None, shield: false }
            }
        }
    }

    pub fn spell_list(self) -> &'static [SpellKind] {
        match self {
            CharacterClass::Wizard => &[
                SpellKind::FireBolt,
                SpellKind::RayOfFrost,
                SpellKind::MagicMissile,
                SpellKind::Sleep,
                SpellKind::BurningHands,
                SpellKind::Thunderwave,
                SpellKind::Shield,
                SpellKind::Fireball,
            ],
            CharacterClass::Cleric => &[
                SpellKind::SacredFlame,
                SpellKind::SpareTheDying,
                SpellKind::CureWounds,
                SpellKind::HealingWord,
                SpellKind::GuidingBolt,
            ],
            CharacterClass::Ranger => &[SpellKind::HuntersMark, SpellKind::CureWounds],
            CharacterClass::Fighter | CharacterClass::Rogue | CharacterClass::Barbarian => &[],
        }
    }

    /// Maximum slots per spell level (1st..3rd) at a character level.
    pub fn slot_table(self, level: u32) -> [u32; MAX_SLOT_LEVEL] {
        match self {
            CharacterClass::Wizard | CharacterClass::Cleric => match level {
                0 | 1 => [2, 0, 0],
                2 => [3, 0, 0],
                3 => [4, 2, 0],
                4 => [4, 3, 0],
                _ => [4, 3, 2],
            },
            CharacterClass::Ranger => match level {
                0 | 1 => [0, 0, 0],
                2 => [2, 0, 0],
                3 | 4 => [3, 0, 0],
                _ => [4, 2, 0],
            },
            CharacterClass::Fighter | CharacterClass::Rogue | CharacterClass::Barbarian => [0; 3],
        }
    }

    pub fn rage_uses(self, level: u32) -> u32 {
        match (self, level) {
            (CharacterClass::Barbarian, 0..=2) => 2,
            (CharacterClass::Barbarian, _) => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
