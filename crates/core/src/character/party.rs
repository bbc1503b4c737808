//! Owned party roster plus shared purse and potion stash.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::content::{PotionKind, get_potion};
use crate::dice::{RollSource, roll_notation};
use crate::types::CharacterId;

use super::Character;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Party {
    members: SlotMap<CharacterId, Character>,
    pub gold: u32,
    pub potions: Vec<PotionKind>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub total: u32,
    pub share: u32,
    pub recipients: Vec<CharacterId>,
    pub level_ups: Vec<(CharacterId, u32)>,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, character: Character) -> CharacterId {
        self.members.insert(character)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.members.get(id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.members.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CharacterId, &mut Character)> {
        self.members.iter_mut()
    }

    pub fn ids(&self) -> Vec<CharacterId> {
        self.members.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn conscious_ids(&self) -> Vec<CharacterId> {
        self.members.iter().filter(|(_, member)| member.is_conscious()).map(|(id, _)| id).collect()
    }

    pub fn dying_ids(&self) -> Vec<CharacterId> {
        self.members.iter().filter(|(_, member)| member.is_dying()).map(|(id, _)| id).collect()
    }

    /// Someone is still conscious or still rolling death saves.
    pub fn can_fight_on(&self) -> bool {
        self.members.values().any(Character::can_take_turns)
    }

    pub fn all_dead(&self) -> bool {
        self.members.values().all(Character::is_dead)
    }

    /// Splits `xp` evenly among members who are not dead; the remainder is dropped.
    pub fn award_experience(&mut self, xp: u32) -> XpAward {
        let recipients: Vec<CharacterId> =
            self.members.iter().filter(|(_, member)| !member.is_dead()).map(|(id, _)| id).collect();
        debug_assert!(!recipients.is_empty(), "experience awarded to an empty party");
        let share = xp / recipients.len().max(1) as u32;

        let mut level_ups = Vec::new();
        for &id in &recipients {
            if let Some(member) = self.members.get_mut(id) {
                let gained = member.gain_experience(share);
                if gained > 0 {
                    level_ups.push((id, member.level));
                }
            }
        }
        XpAward { total: xp, share, recipients, level_ups }
    }

    pub fn long_rest(&mut self) {
        for member in self.members.values_mut() {
            member.long_rest();
        }
    }

    /// Drinks a potion from the stash on `target`. Returns HP restored, or `None` when the
    /// potion is not stocked or the target is missing or dead.
    pub fn quaff<R: RollSource + ?Sized>(
        &mut self,
        kind: PotionKind,
        target: CharacterId,
        rolls: &mut R,
    ) -> Option<i32> {
        let slot = self.potions.iter().position(|&potion| potion == kind)?;
        let member = self.members.get_mut(target).filter(|member| !member.is_dead())?;
        self.potions.remove(slot);
        let heal = roll_notation(rolls, get_potion(kind).heal).total.max(1);
        Some(member.heal(heal))
    }
}
