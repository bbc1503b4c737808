pub mod autopilot;
pub mod character;
pub mod combat;
pub mod content;
pub mod dice;
pub mod dungeon;
pub mod encounter;
pub mod expedition;
pub mod monster;
pub mod types;

pub use autopilot::{ExpeditionResult, ExpeditionSummary, Policy, run_expedition};
pub use character::{Character, CharacterClass, Party};
pub use combat::{CombatOutcome, CombatSession, CombatState};
pub use dice::{RollSource, ScriptedRolls, SeededRolls};
pub use dungeon::{Dungeon, MapSnapshot, Room, RoomType};
pub use encounter::Encounter;
pub use expedition::{Expedition, ExpeditionEvent};
pub use monster::{Monster, MonsterKind};
pub use types::*;
