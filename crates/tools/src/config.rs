//! Run settings loaded from a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use delve_core::types::AbilityScores;
use delve_core::{Character, CharacterClass, Party};
use serde::Deserialize;

pub const MAX_PARTY_SIZE: usize = 4;
pub const DEFAULT_DUNGEON_NAME: &str = "The Dark Depths";

const DEFAULT_PARTY: [CharacterClass; 4] = [
    CharacterClass::Fighter,
    CharacterClass::Wizard,
    CharacterClass::Rogue,
    CharacterClass::Cleric,
];

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub seed: Option<u64>,
    pub level: Option<u32>,
    pub dungeon_name: Option<String>,
    #[serde(default)]
    pub party: Vec<MemberConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberConfig {
    pub name: String,
    pub class: CharacterClass,
    /// Falls back to the dungeon level.
    pub level: Option<u32>,
    pub abilities: Option<AbilityScores>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// An empty party list means the default roster, so only an oversized one is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.party.len() > MAX_PARTY_SIZE {
            bail!(
                "party has {} members; at most {MAX_PARTY_SIZE} may enter a dungeon",
                self.party.len()
            );
        }
        if let Some(member) = self.party.iter().find(|member| member.name.trim().is_empty()) {
            bail!("a {} in the party has no name", member.class);
        }
        if self.level == Some(0) {
            bail!("dungeon level starts at 1");
        }
        Ok(())
    }

    pub fn dungeon_name(&self) -> &str {
        self.dungeon_name.as_deref().unwrap_or(DEFAULT_DUNGEON_NAME)
    }

    /// Builds the configured party, or a fighter, wizard, rogue and cleric at `level`.
    pub fn build_party(&self, level: u32) -> Party {
        let mut party = Party::new();
        if self.party.is_empty() {
            for class in DEFAULT_PARTY {
                party.add(Character::new(class.name(), class, level));
            }
            return party;
        }
        for member in &self.party {
            let level = member.level.unwrap_or(level);
            let abilities = member.abilities.unwrap_or_else(|| member.class.default_abilities());
            party.add(Character::with_abilities(&member.name, member.class, level, abilities));
        }
        party
    }
}
