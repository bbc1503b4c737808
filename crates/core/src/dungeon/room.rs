//! Room types with their display tables and the weighted type draw.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::{RollSource, pick_index};
use crate::types::{GridPos, RoomId};

use super::Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Entrance,
    Corridor,
    Chamber,
    Treasure,
    Trap,
    Boss,
    Shrine,
    Library,
    Armory,
    Prison,
    Empty,
}

impl RoomType {
    pub const ALL: [RoomType; 11] = [
        RoomType::Entrance,
        RoomType::Corridor,
        RoomType::Chamber,
        RoomType::Treasure,
        RoomType::Trap,
        RoomType::Boss,
        RoomType::Shrine,
        RoomType::Library,
        RoomType::Armory,
        RoomType::Prison,
        RoomType::Empty,
    ];

    /// Type for any non-entrance, non-boss room from one d100.
    pub fn draw<R: RollSource + ?Sized>(rolls: &mut R) -> RoomType {
        match rolls.roll_die(100) {
            1..=20 => RoomType::Corridor,
            21..=40 => RoomType::Chamber,
            41..=50 => RoomType::Empty,
            51..=60 => RoomType::Treasure,
            61..=70 => RoomType::Trap,
            71..=80 => RoomType::Armory,
            81..=85 => RoomType::Library,
            86..=90 => RoomType::Shrine,
            91..=95 => RoomType::Prison,
            _ => RoomType::Chamber,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            RoomType::Entrance => 'E',
            RoomType::Corridor => '-',
            RoomType::Chamber => 'C',
            RoomType::Treasure => '$',
            RoomType::Trap => '^',
            RoomType::Boss => 'B',
            RoomType::Shrine => '+',
            RoomType::Library => 'L',
            RoomType::Armory => 'A',
            RoomType::Prison => 'P',
            RoomType::Empty => ' ',
        }
    }

    /// Whether rooms of this type may roll a wandering encounter.
    pub fn hosts_encounters(self) -> bool {
        !matches!(self, RoomType::Entrance | RoomType::Shrine | RoomType::Empty)
    }

    pub fn names(self) -> &'static [&'static str] {
        match self {
            RoomType::Entrance => &["Dungeon Entrance", "Entry Hall", "Gateway"],
            RoomType::Corridor => &["Corridor", "Passage", "Hallway"],
            RoomType::Chamber => &["Chamber", "Hall", "Room"],
            RoomType::Treasure => &["Treasury", "Vault", "Strongroom"],
            RoomType::Trap => &["Suspicious Chamber", "Trapped Room", "Danger Zone"],
            RoomType::Boss => &["Throne Room", "Grand Chamber", "Lair"],
            RoomType::Shrine => &["Shrine", "Chapel", "Sanctum"],
            RoomType::Library => &["Library", "Archives", "Study"],
            RoomType::Armory => &["Armory", "Arsenal", "Weapon Store"],
            RoomType::Prison => &["Prison", "Dungeon Cells", "Holding Area"],
            RoomType::Empty => &["Empty Room", "Abandoned Chamber", "Vacant Space"],
        }
    }

    pub fn descriptions(self) -> &'static [&'static str] {
        match self {
            RoomType::Entrance => &[
                "A weathered stone archway marks the dungeon entrance. Cobwebs drape the walls.",
                "Crumbling steps lead down into darkness. The air is musty and cold.",
                "An iron portcullis hangs overhead, its mechanism long rusted.",
            ],
            RoomType::Corridor => &[
                "A narrow passage stretches ahead, its walls damp with moisture.",
                "Faded murals of ancient battles line the corridor.",
                "Torchlight flickers against rough-hewn stone walls.",
            ],
            RoomType::Chamber => &[
                "Pillars hold up the vaulted ceiling of a large chamber.",
                "This room was once grand, but now lies in dusty disrepair.",
                "Broken furniture and debris litter this abandoned chamber.",
            ],
            RoomType::Treasure => &[
                "A small room with reinforced walls. Something valuable was kept here.",
                "Glittering dust motes dance in the air of this vault.",
                "Iron-bound chests line the walls of this secure room.",
            ],
            RoomType::Trap => &[
                "The floor here seems newer than the surrounding stonework.",
                "Strange symbols are carved into the walls.",
                "The air feels tense, as if something is waiting.",
            ],
            RoomType::Boss => &[
                "A massive chamber dominates this section of the dungeon.",
                "The ceiling soars overhead in this grand hall.",
                "This room radiates an oppressive aura of power.",
            ],
            RoomType::Shrine => &[
                "An ancient altar dominates this sacred space.",
                "Religious iconography covers the walls of this small shrine.",
                "The air here feels charged with divine energy.",
            ],
            RoomType::Library => &[
                "Dusty bookshelves line the walls, their contents moldering with age.",
                "A scholar's study, with scattered papers and dried inkwells.",
                "Ancient tomes fill this chamber with the scent of old parchment.",
            ],
            RoomType::Armory => &[
                "Weapon racks and armor stands fill this military storage room.",
                "Metal clangs underfoot as the armory door swings open.",
                "Rusted weapons and dented shields suggest former glory.",
            ],
            RoomType::Prison => &[
                "Iron bars divide this room into cramped cells.",
                "Chains and manacles hang from the walls of this grim prison.",
                "The despair of past prisoners seems to seep from the stones.",
            ],
            RoomType::Empty => &[
                "An unremarkable room with nothing of obvious interest.",
                "This chamber appears to have been thoroughly looted.",
                "Dust and silence fill this empty space.",
            ],
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Room {
    /// A bare room with a drawn name and description; exits and contents come later.
    pub(super) fn new<R: RollSource + ?Sized>(
        id: RoomId,
        pos: GridPos,
        kind: RoomType,
        rolls: &mut R,
    ) -> Room {
        let names = kind.names();
        let descriptions = kind.descriptions();
        let name = names[pick_index(rolls, names.len())].to_string();
        let description = descriptions[pick_index(rolls, descriptions.len())].to_string();
        Room {
            id,
            pos,
            kind,
            name,
            description,
            exits: BTreeMap::new(),
            visited: false,
            cleared: false,
            encounter: None,
            treasure: Vec::new(),
            trap: None,
        }
    }
}
