//! Monster groups attached to rooms and resolved through combat.

pub mod balancer;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::monster::{Monster, MonsterKind};
use crate::types::{Difficulty, MonsterId};

pub use balancer::{base_xp, generate, generate_boss, max_monsters, xp_budget, xp_limit};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    monsters: Vec<Monster>,
    pub difficulty: Difficulty,
}

impl Encounter {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { monsters: Vec::new(), difficulty }
    }

    fn next_id(&self) -> MonsterId {
        MonsterId(self.monsters.len() as u32)
    }

    pub fn push(&mut self, kind: MonsterKind) -> MonsterId {
        let id = self.next_id();
        self.monsters.push(Monster::spawn(id, kind));
        id
    }

    pub fn push_boss(&mut self, kind: MonsterKind, level: u32) -> MonsterId {
        let id = self.next_id();
        self.monsters.push(Monster::spawn_boss(id, kind, level));
        id
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|monster| monster.id == id)
    }

    pub fn alive_monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(|monster| monster.is_alive())
    }

    pub fn alive_ids(&self) -> Vec<MonsterId> {
        self.alive_monsters().map(|monster| monster.id).collect()
    }

    pub fn total_xp(&self) -> u32 {
        self.monsters.iter().map(|monster| monster.xp).sum()
    }

    pub fn is_defeated(&self) -> bool {
        self.monsters.iter().all(|monster| !monster.is_alive())
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn has_boss(&self) -> bool {
        self.monsters.iter().any(|monster| monster.is_boss)
    }

    /// Living monster with the highest XP value; ties go to the earlier monster.
    pub fn toughest_alive(&self) -> Option<&Monster> {
        self.alive_monsters().fold(None, |best: Option<&Monster>, monster| match best {
            Some(current) if current.xp >= monster.xp => Some(current),
            _ => Some(monster),
        })
    }

    pub fn describe(&self) -> String {
        let names: BTreeSet<&str> =
            self.monsters.iter().map(|monster| monster.name.as_str()).collect();
        match (self.monsters.len(), names.len()) {
            (0, _) => "The room is quiet.".to_string(),
            (1, _) => format!("A lone {} blocks your path!", self.monsters[0].name),
            (count, 1) => format!("A group of {count} {}s attacks!", self.monsters[0].name),
            _ => {
                let listed: Vec<&str> = names.into_iter().collect();
                format!("You face {}!", listed.join(", "))
            }
        }
    }
}
