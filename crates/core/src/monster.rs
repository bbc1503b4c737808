//! Monster species stat tables and live monster instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Ability, AbilityScores, MonsterId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Kobold,
    GiantRat,
    Cultist,
    Bandit,
    Goblin,
    Skeleton,
    Zombie,
    Wolf,
    Orc,
    Hobgoblin,
    Gnoll,
    Bugbear,
    Ghoul,
    GiantSpider,
    DireWolf,
    Ogre,
    Ghast,
    Owlbear,
    Minotaur,
    Wight,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 20] = [
        MonsterKind::Kobold,
        MonsterKind::GiantRat,
        MonsterKind::Cultist,
        MonsterKind::Bandit,
        MonsterKind::Goblin,
        MonsterKind::Skeleton,
        MonsterKind::Zombie,
        MonsterKind::Wolf,
        MonsterKind::Orc,
        MonsterKind::Hobgoblin,
        MonsterKind::Gnoll,
        MonsterKind::Bugbear,
        MonsterKind::Ghoul,
        MonsterKind::GiantSpider,
        MonsterKind::DireWolf,
        MonsterKind::Ogre,
        MonsterKind::Ghast,
        MonsterKind::Owlbear,
        MonsterKind::Minotaur,
        MonsterKind::Wight,
    ];

    pub fn stats(self) -> MonsterStats {
        get_monster_stats(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChallengeRating {
    Eighth,
    Quarter,
    Half,
    Whole(u8),
}

impl ChallengeRating {
    /// Rounded up to a whole number, so fractional ratings count as 1.
    pub fn ceil(self) -> i32 {
        match self {
            ChallengeRating::Eighth | ChallengeRating::Quarter | ChallengeRating::Half => 1,
            ChallengeRating::Whole(cr) => i32::from(cr),
        }
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeRating::Eighth => f.write_str("1/8"),
            ChallengeRating::Quarter => f.write_str("1/4"),
            ChallengeRating::Half => f.write_str("1/2"),
            ChallengeRating::Whole(cr) => write!(f, "{cr}"),
        }
    }
}

pub struct MonsterStats {
    pub name: &'static str,
    pub hp: i32,
    pub ac: i32,
    pub attack_bonus: i32,
    pub attack_name: &'static str,
    pub damage: &'static str,
    pub challenge: ChallengeRating,
    pub xp: u32,
    pub abilities: AbilityScores,
}

pub fn get_monster_stats(kind: MonsterKind) -> MonsterStats {
    use ChallengeRating::{Eighth, Half, Quarter, Whole};

    match kind {
        MonsterKind::Kobold => MonsterStats {
            name: "Kobold",
            hp: 5,
            ac: 12,
            attack_bonus: 4,
            attack_name: "Dagger",
            damage: "1d4+2",
            challenge: Eighth,
            xp: 25,
            abilities: AbilityScores::new(7, 15, 9, 8, 7, 8),
        },
        MonsterKind::GiantRat => MonsterStats {
            name: "Giant Rat",
            hp: 7,
            ac: 12,
            attack_bonus: 4,
            attack_name: "Bite",
            damage: "1d4+2",
            challenge: Eighth,
            xp: 25,
            abilities: AbilityScores::new(7, 15, 11, 2, 10, 4),
        },
        MonsterKind::Cultist => MonsterStats {
            name: "Cultist",
            hp: 9,
            ac: 12,
            attack_bonus: 3,
            attack_name: "Scimitar",
            damage: "1d6+1",
            challenge: Eighth,
            xp: 25,
            abilities: AbilityScores::new(11, 12, 10, 10, 11, 10),
        },
        MonsterKind::Bandit => MonsterStats {
            name: "Bandit",
            hp: 11,
            ac: 12,
            attack_bonus: 3,
            attack_name: "Scimitar",
            damage: "1d6+1",
            challenge: Eighth,
            xp: 25,
            abilities: AbilityScores::new(11, 12, 12, 10, 10, 10),
        },
        MonsterKind::Goblin => MonsterStats {
            name: "Goblin",
            hp: 7,
            ac: 15,
            attack_bonus: 4,
            attack_name: "Scimitar",
            damage: "1d6+2",
            challenge: Quarter,
            xp: 50,
            abilities: AbilityScores::new(8, 14, 10, 10, 8, 8),
        },
        MonsterKind::Skeleton => MonsterStats {
            name: "Skeleton",
            hp: 13,
            ac: 13,
            attack_bonus: 4,
            attack_name: "Shortsword",
            damage: "1d6+2",
            challenge: Quarter,
            xp: 50,
            abilities: AbilityScores::new(10, 14, 15, 6, 8, 5),
        },
        MonsterKind::Zombie => MonsterStats {
            name: "Zombie",
            hp: 22,
            ac: 8,
            attack_bonus: 3,
            attack_name: "Slam",
            damage: "1d6+1",
            challenge: Quarter,
            xp: 50,
            abilities: AbilityScores::new(13, 6, 16, 3, 6, 5),
        },
        MonsterKind::Wolf => MonsterStats {
            name: "Wolf",
            hp: 11,
            ac: 13,
            attack_bonus: 4,
            attack_name: "Bite",
            damage: "2d4+2",
            challenge: Quarter,
            xp: 50,
            abilities: AbilityScores::new(12, 15, 12, 3, 12, 6),
        },
        MonsterKind::Orc => MonsterStats {
            name: "Orc",
            hp: 15,
            ac: 13,
            attack_bonus: 5,
            attack_name: "Greataxe",
            damage: "1d12+3",
            challenge: Half,
            xp: 100,
            abilities: AbilityScores::new(16, 12, 16, 7, 11, 10),
        },
        MonsterKind::Hobgoblin => MonsterStats {
            name: "Hobgoblin",
            hp: 11,
            ac: 18,
            attack_bonus: 3,
            attack_name: "Longsword",
            damage: "1d10+1",
            challenge: Half,
            xp: 100,
            abilities: AbilityScores::new(13, 12, 12, 10, 10, 9),
        },
        MonsterKind::Gnoll => MonsterStats {
            name: "Gnoll",
            hp: 22,
            ac: 15,
            attack_bonus: 4,
            attack_name: "Spear",
            damage: "1d6+2",
            challenge: Half,
            xp: 100,
            abilities: AbilityScores::new(14, 12, 11, 6, 10, 7),
        },
        MonsterKind::Bugbear => MonsterStats {
            name: "Bugbear",
            hp: 27,
            ac: 16,
            attack_bonus: 4,
            attack_name: "Morningstar",
            damage: "2d8+2",
            challenge: Whole(1),
            xp: 200,
            abilities: AbilityScores::new(15, 14, 13, 8, 11, 9),
        },
        MonsterKind::Ghoul => MonsterStats {
            name: "Ghoul",
            hp: 22,
            ac: 12,
            attack_bonus: 4,
            attack_name: "Claws",
            damage: "2d4+2",
            challenge: Whole(1),
            xp: 200,
            abilities: AbilityScores::new(13, 15, 10, 7, 10, 6),
        },
        MonsterKind::GiantSpider => MonsterStats {
            name: "Giant Spider",
            hp: 26,
            ac: 14,
            attack_bonus: 5,
            attack_name: "Bite",
            damage: "1d8+3",
            challenge: Whole(1),
            xp: 200,
            abilities: AbilityScores::new(14, 16, 12, 2, 11, 4),
        },
        MonsterKind::DireWolf => MonsterStats {
            name: "Dire Wolf",
            hp: 37,
            ac: 14,
            attack_bonus: 5,
            attack_name: "Bite",
            damage: "2d6+3",
            challenge: Whole(1),
            xp: 200,
            abilities: AbilityScores::new(17, 15, 15, 3, 12, 7),
        },
        MonsterKind::Ogre => MonsterStats {
            name: "Ogre",
            hp: 59,
            ac: 11,
            attack_bonus: 6,
            attack_name: "Greatclub",
            damage: "2d8+4",
            challenge: Whole(2),
            xp: 450,
            abilities: AbilityScores::new(19, 8, 16, 5, 7, 7),
        },
        MonsterKind::Ghast => MonsterStats {
            name: "Ghast",
            hp: 36,
            ac: 13,
            attack_bonus: 5,
            attack_name: "Claws",
            damage: "2d6+3",
            challenge: Whole(2),
            xp: 450,
            abilities: AbilityScores::new(16, 17, 10, 11, 10, 8),
        },
        MonsterKind::Owlbear => MonsterStats {
            name: "Owlbear",
            hp: 59,
            ac: 13,
            attack_bonus: 7,
            attack_name: "Claws",
            damage: "2d8+5",
            challenge: Whole(3),
            xp: 700,
            abilities: AbilityScores::new(20, 12, 17, 3, 12, 7),
        },
        MonsterKind::Minotaur => MonsterStats {
            name: "Minotaur",
            hp: 76,
            ac: 14,
            attack_bonus: 6,
            attack_name: "Greataxe",
            damage: "2d12+4",
            challenge: Whole(3),
            xp: 700,
            abilities: AbilityScores::new(18, 11, 16, 6, 16, 9),
        },
        MonsterKind::Wight => MonsterStats {
            name: "Wight",
            hp: 45,
            ac: 14,
            attack_bonus: 4,
            attack_name: "Longsword",
            damage: "1d8+2",
            challenge: Whole(3),
            xp: 700,
            abilities: AbilityScores::new(15, 14, 16, 10, 13, 15),
        },
    }
}

/// Species that may appear in ordinary encounters at a dungeon level.
pub fn level_roster(level: u32) -> &'static [MonsterKind] {
    use MonsterKind::*;

    match level {
        0 | 1 => &[Kobold, GiantRat, Cultist, Bandit, Goblin, Skeleton, Zombie, Wolf],
        2 => &[Goblin, Skeleton, Zombie, Wolf, Orc, Hobgoblin, Gnoll],
        3 => &[Orc, Hobgoblin, Gnoll, Bugbear, Ghoul, GiantSpider, DireWolf],
        4 => &[Bugbear, Ghoul, GiantSpider, DireWolf, Ogre, Ghast],
        _ => &[Ogre, Ghast, Owlbear, Minotaur, Wight],
    }
}

/// Species eligible to anchor a boss room at a dungeon level.
pub fn boss_roster(level: u32) -> &'static [MonsterKind] {
    use MonsterKind::*;

    match level {
        0 | 1 => &[Hobgoblin, Orc],
        2 => &[Bugbear, Gnoll],
        3 => &[Ogre, Ghoul],
        4 => &[Owlbear, Ghast],
        _ => &[Minotaur, Wight],
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub attack_name: String,
    pub damage: String,
    pub challenge: ChallengeRating,
    pub xp: u32,
    pub abilities: AbilityScores,
    pub is_boss: bool,
}

impl Monster {
    pub fn spawn(id: MonsterId, kind: MonsterKind) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            name: stats.name.to_string(),
            max_hp: stats.hp,
            current_hp: stats.hp,
            armor_class: stats.ac,
            attack_bonus: stats.attack_bonus,
            attack_name: stats.attack_name.to_string(),
            damage: stats.damage.to_string(),
            challenge: stats.challenge,
            xp: stats.xp,
            abilities: stats.abilities,
            is_boss: false,
        }
    }

    /// Boss variant: HP x1.5 (x2 from level 3), AC and attack +1 (+2 from level 3), XP x3.
    pub fn spawn_boss(id: MonsterId, kind: MonsterKind, level: u32) -> Self {
        let mut boss = Self::spawn(id, kind);
        let veteran = level >= 3;
        boss.max_hp = if veteran { boss.max_hp * 2 } else { boss.max_hp * 3 / 2 };
        boss.current_hp = boss.max_hp;
        let bump = if veteran { 2 } else { 1 };
        boss.armor_class += bump;
        boss.attack_bonus += bump;
        boss.xp *= 3;
        boss.name = format!("{} Warlord", boss.name);
        boss.is_boss = true;
        boss
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn save_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp - amount.max(0)).max(0);
        before - self.current_hp
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0)).min(self.max_hp);
        self.current_hp - before
    }

    pub fn knock_out(&mut self) {
        self.current_hp = 0;
    }
}
