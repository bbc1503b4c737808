//! `NdS±M` notation parsing.

use std::fmt;

use super::{DiceRoll, RollSource, roll_n};

/// Upper bound on dice per notation; catalog entries past it are rejected.
const MAX_DICE: u32 = 100;
/// Largest die face accepted by the parser.
const MAX_SIDES: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("empty dice notation")]
    Empty,
    #[error("dice notation `{0}` has no `d` separator")]
    MissingSeparator(String),
    #[error("invalid die count in `{0}`")]
    InvalidCount(String),
    #[error("invalid die size in `{0}`")]
    InvalidSides(String),
    #[error("invalid modifier in `{0}`")]
    InvalidModifier(String),
    #[error("too many dice or too large a die in `{0}`")]
    TooManyDice(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceNotation {
    /// Accepts `2d6+3`, `d8`, `1d4-1` and bare constants such as `5`.
    pub fn parse(raw: &str) -> Result<Self, DiceError> {
        let cleaned: String =
            raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
        if cleaned.is_empty() {
            return Err(DiceError::Empty);
        }
        if let Ok(constant) = cleaned.parse::<i32>() {
            return Ok(Self { count: 0, sides: 0, modifier: constant });
        }

        let (dice_part, modifier) = match cleaned.find(['+', '-']) {
            Some(index) => {
                let (dice, tail) = cleaned.split_at(index);
                let modifier = tail
                    .parse::<i32>()
                    .map_err(|_| DiceError::InvalidModifier(raw.to_string()))?;
                (dice, modifier)
            }
            None => (cleaned.as_str(), 0),
        };

        let Some((count, sides)) = dice_part.split_once('d') else {
            return Err(DiceError::MissingSeparator(raw.to_string()));
        };
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| DiceError::InvalidCount(raw.to_string()))?
        };
        let sides = sides
            .parse::<u32>()
            .ok()
            .filter(|&sides| sides > 0)
            .ok_or_else(|| DiceError::InvalidSides(raw.to_string()))?;
        if count > MAX_DICE || sides > MAX_SIDES {
            return Err(DiceError::TooManyDice(raw.to_string()));
        }

        Ok(Self { count, sides, modifier })
    }

    pub fn roll<R: RollSource + ?Sized>(&self, rolls: &mut R, critical: bool) -> DiceRoll {
        let count = if critical { self.count.saturating_mul(2) } else { self.count };
        let faces = roll_n(rolls, count, self.sides);
        let total = faces.iter().sum::<u32>() as i32 + self.modifier;
        DiceRoll { notation: self.to_string(), rolls: faces, modifier: self.modifier, total }
    }

    /// Mean total, rounded down.
    pub fn average(&self) -> i32 {
        let doubled = u64::from(self.count) * (u64::from(self.sides) + 1);
        i32::try_from(doubled / 2).unwrap_or(i32::MAX).saturating_add(self.modifier)
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Best-effort modifier salvage for notation that failed to parse.
pub(super) fn trailing_modifier(raw: &str) -> i32 {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned
        .rfind(['+', '-'])
        .and_then(|index| cleaned[index..].parse::<i32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_shapes() {
        assert_eq!(
            DiceNotation::parse("2d6+3"),
            Ok(DiceNotation { count: 2, sides: 6, modifier: 3 })
        );
        assert_eq!(
            DiceNotation::parse("1D20 - 1"),
            Ok(DiceNotation { count: 1, sides: 20, modifier: -1 })
        );
        assert_eq!(DiceNotation::parse("d8"), Ok(DiceNotation { count: 1, sides: 8, modifier: 0 }));
        assert_eq!(DiceNotation::parse("7"), Ok(DiceNotation { count: 0, sides: 0, modifier: 7 }));
    }

    #[test]
    fn rejects_malformed_notation_with_specific_errors() {
        assert_eq!(DiceNotation::parse("  "), Err(DiceError::Empty));
        assert!(matches!(DiceNotation::parse("2x6"), Err(DiceError::MissingSeparator(_))));
        assert!(matches!(DiceNotation::parse("ad6"), Err(DiceError::InvalidCount(_))));
        assert!(matches!(DiceNotation::parse("2d0"), Err(DiceError::InvalidSides(_))));
        assert!(matches!(DiceNotation::parse("2d6+x"), Err(DiceError::InvalidModifier(_))));
    }

    #[test]
    fn rejects_oversized_pools_and_dice() {
        assert!(matches!(DiceNotation::parse("3000000000d6"), Err(DiceError::TooManyDice(_))));
        assert!(matches!(DiceNotation::parse("101d6"), Err(DiceError::TooManyDice(_))));
        assert!(matches!(DiceNotation::parse("1d1001"), Err(DiceError::TooManyDice(_))));
        assert_eq!(
            DiceNotation::parse("100d1000"),
            Ok(DiceNotation { count: 100, sides: 1_000, modifier: 0 })
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["2d6+3", "1d4-1", "3d8", "5"] {
            let parsed = DiceNotation::parse(raw).expect("notation should parse");
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn trailing_modifier_salvages_signed_suffix() {
        assert_eq!(trailing_modifier("??+4"), 4);
        assert_eq!(trailing_modifier("zz-2"), -2);
        assert_eq!(trailing_modifier("nothing"), 0);
    }

    #[test]
    fn average_rounds_down() {
        let notation = DiceNotation::parse("2d6+3").expect("notation should parse");
        assert_eq!(notation.average(), 10);
    }

    #[test]
    fn average_saturates_on_hand_built_notation() {
        let huge = DiceNotation { count: u32::MAX, sides: u32::MAX, modifier: 5 };
        assert_eq!(huge.average(), i32::MAX);
        let large = DiceNotation { count: 3_000_000_000, sides: 6, modifier: 2 };
        assert_eq!(large.average(), i32::MAX);
        assert_eq!(DiceNotation { count: 0, sides: 0, modifier: -3 }.average(), -3);
    }
}
