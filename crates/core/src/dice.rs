//! Dice primitives over an injectable roll source.

mod notation;

use std::collections::VecDeque;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use notation::{DiceError, DiceNotation};

pub trait RollSource {
    /// Returns a face in `1..=sides`. Dice with fewer than two sides always show 1.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: RollSource + ?Sized> RollSource for &mut R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

pub struct SeededRolls {
    rng: ChaCha8Rng,
}

static ENTROPY_COUNTER: AtomicU64 = AtomicU64::new(0);

impl SeededRolls {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self::new(runtime_seed())
    }
}

impl RollSource for SeededRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        1 + (self.rng.next_u64() % u64::from(sides)) as u32
    }
}

pub fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = ENTROPY_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut value = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

/// Replays queued faces first, then falls back to a seeded stream.
pub struct ScriptedRolls {
    queue: VecDeque<u32>,
    fallback: SeededRolls,
}

impl ScriptedRolls {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self { queue: faces.into_iter().collect(), fallback: SeededRolls::new(0) }
    }

    pub fn push(&mut self, face: u32) {
        self.queue.push_back(face);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.queue.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => self.fallback.roll_die(sides),
        }
    }
}

pub fn roll<R: RollSource + ?Sized>(rolls: &mut R, sides: u32) -> u32 {
    rolls.roll_die(sides)
}

pub fn roll_n<R: RollSource + ?Sized>(rolls: &mut R, count: u32, sides: u32) -> Vec<u32> {
    (0..count).map(|_| rolls.roll_die(sides)).collect()
}

pub fn roll_sum<R: RollSource + ?Sized>(rolls: &mut R, count: u32, sides: u32) -> u32 {
    (0..count).map(|_| rolls.roll_die(sides)).sum()
}

/// Uniform index into a non-empty collection of `len` entries.
pub fn pick_index<R: RollSource + ?Sized>(rolls: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    if len <= 1 {
        return 0;
    }
    (rolls.roll_die(len as u32) - 1) as usize
}

pub fn shuffle<R: RollSource + ?Sized, T>(rolls: &mut R, items: &mut [T]) {
    for upper in (1..items.len()).rev() {
        let swap_with = pick_index(rolls, upper + 1);
        items.swap(upper, swap_with);
    }
}

/// `true` with `percent`% probability, drawn from a d100.
pub fn chance<R: RollSource + ?Sized>(rolls: &mut R, percent: u32) -> bool {
    rolls.roll_die(100) <= percent
}

/// 4d6, drop the lowest, six times.
pub fn roll_ability_scores<R: RollSource + ?Sized>(rolls: &mut R) -> [i32; 6] {
    let mut scores = [0; 6];
    for score in &mut scores {
        let mut faces = roll_n(rolls, 4, 6);
        faces.sort_unstable();
        *score = faces[1..].iter().sum::<u32>() as i32;
    }
    scores
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub notation: String,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
}

pub fn roll_notation<R: RollSource + ?Sized>(rolls: &mut R, notation: &str) -> DiceRoll {
    roll_damage(rolls, notation, false)
}

/// Rolls `notation`, doubling the die count (never the modifier) on a critical.
///
/// Malformed notation never fails resolution: it is logged and degrades to the
/// trailing modifier with zero dice.
pub fn roll_damage<R: RollSource + ?Sized>(
    rolls: &mut R,
    notation: &str,
    critical: bool,
) -> DiceRoll {
    match DiceNotation::parse(notation) {
        Ok(parsed) => parsed.roll(rolls, critical),
        Err(error) => {
            tracing::warn!(%notation, %error, "malformed dice notation; using modifier only");
            let modifier = notation::trailing_modifier(notation);
            DiceRoll {
                notation: notation.to_string(),
                rolls: Vec::new(),
                modifier,
                total: modifier,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

pub fn roll_d20<R: RollSource + ?Sized>(rolls: &mut R, advantage: Advantage) -> u32 {
    match advantage {
        Advantage::Normal => rolls.roll_die(20),
        Advantage::Advantage => rolls.roll_die(20).max(rolls.roll_die(20)),
        Advantage::Disadvantage => rolls.roll_die(20).min(rolls.roll_die(20)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    pub natural: u32,
    pub modifier: i32,
    pub total: i32,
    pub target_ac: i32,
    pub hit: bool,
    pub critical: bool,
    pub fumble: bool,
}

pub fn attack_roll<R: RollSource + ?Sized>(
    rolls: &mut R,
    modifier: i32,
    target_ac: i32,
    advantage: Advantage,
) -> AttackRoll {
    let natural = roll_d20(rolls, advantage);
    let total = natural as i32 + modifier;
    let critical = natural == 20;
    let fumble = natural == 1;
    let hit = critical || (!fumble && total >= target_ac);
    AttackRoll { natural, modifier, total, target_ac, hit, critical, fumble }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub natural: u32,
    pub modifier: i32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

pub fn saving_throw<R: RollSource + ?Sized>(
    rolls: &mut R,
    modifier: i32,
    dc: i32,
    advantage: Advantage,
) -> SavingThrow {
    let natural = roll_d20(rolls, advantage);
    let total = natural as i32 + modifier;
    let success = match natural {
        20 => true,
        1 => false,
        _ => total >= dc,
    };
    SavingThrow { natural, modifier, total, dc, success }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathSaveOutcome {
    /// Natural 20: back on their feet at 1 HP.
    Revived,
    Success,
    Failure,
    /// Natural 1 counts as two failures.
    DoubleFailure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaveRoll {
    pub natural: u32,
    pub outcome: DeathSaveOutcome,
}

pub fn death_save<R: RollSource + ?Sized>(rolls: &mut R) -> DeathSaveRoll {
    let natural = rolls.roll_die(20);
    let outcome = match natural {
        20 => DeathSaveOutcome::Revived,
        1 => DeathSaveOutcome::DoubleFailure,
        n if n >= 10 => DeathSaveOutcome::Success,
        _ => DeathSaveOutcome::Failure,
    };
    DeathSaveRoll { natural, outcome }
}
