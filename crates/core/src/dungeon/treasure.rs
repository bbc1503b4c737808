//! Treasure hoards for vault rooms.

use serde::{Deserialize, Serialize};

use crate::content::{PotionKind, get_potion};
use crate::dice::{RollSource, chance, pick_index};

const GOLD_MIN_PER_LEVEL: u32 = 10;
const GOLD_MAX_PER_LEVEL: u32 = 50;
const POTION_CHANCE_PERCENT: u32 = 40;
const GEM_CHANCE_PERCENT: u32 = 20;
const GEM_VALUES: [u32; 4] = [10, 25, 50, 100];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureItem {
    Gold(u32),
    Gem { value: u32 },
    Potion(PotionKind),
}

impl TreasureItem {
    /// Coin value once carried out; potions go to the stash instead of the purse.
    pub fn gold_value(self) -> u32 {
        match self {
            TreasureItem::Gold(amount) => amount,
            TreasureItem::Gem { value } => value,
            TreasureItem::Potion(_) => 0,
        }
    }

    pub fn describe(self) -> String {
        match self {
            TreasureItem::Gold(amount) => format!("{amount} gold pieces"),
            TreasureItem::Gem { value } => format!("Gem worth {value} gp"),
            TreasureItem::Potion(kind) => get_potion(kind).name.to_string(),
        }
    }
}

/// Gold uniform in `[10 * level, 50 * level]`, then a potion on 40% and a gem on 20%.
pub fn generate_treasure<R: RollSource + ?Sized>(level: u32, rolls: &mut R) -> Vec<TreasureItem> {
    let level = level.max(1);
    let low = GOLD_MIN_PER_LEVEL * level;
    let span = (GOLD_MAX_PER_LEVEL - GOLD_MIN_PER_LEVEL) * level + 1;
    let mut items = vec![TreasureItem::Gold(low + rolls.roll_die(span) - 1)];

    if chance(rolls, POTION_CHANCE_PERCENT) {
        items.push(TreasureItem::Potion(PotionKind::Healing));
    }
    if chance(rolls, GEM_CHANCE_PERCENT) {
        items.push(TreasureItem::Gem { value: GEM_VALUES[pick_index(rolls, GEM_VALUES.len())] });
    }
    items
}
