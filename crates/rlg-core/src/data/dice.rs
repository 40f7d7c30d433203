//! Dice expressions of the form `base+NdS`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

use super::ParseError;

/// A dice roll descriptor: `base` plus `count` dice of `sides` sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub base: i32,
    pub count: u32,
    pub sides: u32,
}

impl Dice {
    pub const fn new(base: i32, count: u32, sides: u32) -> Self {
        Self { base, count, sides }
    }

    /// Parse an expression like `"0+1d4"` or `"-1+2d6"`
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let bad = || ParseError::BadDice(s.to_string());

        let (base_str, roll_str) = s.split_once('+').ok_or_else(bad)?;
        let (count_str, sides_str) = roll_str.split_once('d').ok_or_else(bad)?;

        let base = base_str.parse::<i32>().map_err(|_| bad())?;
        let count = count_str.parse::<u32>().map_err(|_| bad())?;
        let sides = sides_str.parse::<u32>().map_err(|_| bad())?;

        Ok(Self { base, count, sides })
    }

    /// Roll the dice
    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        let mut total = self.base;
        for _ in 0..self.count {
            total += rng.rnd(self.sides) as i32;
        }
        total
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}d{}", self.base, self.count, self.sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Dice::parse("0+1d4").unwrap(), Dice::new(0, 1, 4));
        assert_eq!(Dice::parse("-1+2d6").unwrap(), Dice::new(-1, 2, 6));
        assert_eq!(Dice::parse("100+0d1").unwrap(), Dice::new(100, 0, 1));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Dice::parse("2d6").is_err());
        assert!(Dice::parse("1+2x6").is_err());
        assert!(Dice::parse("a+1d4").is_err());
        assert!(Dice::parse("").is_err());
    }

    #[test]
    fn test_roll_bounds() {
        let mut rng = GameRng::new(42);
        let dice = Dice::new(2, 3, 4);
        for _ in 0..1000 {
            let roll = dice.roll(&mut rng);
            assert!((5..=14).contains(&roll), "roll {} out of range", roll);
        }
    }

    #[test]
    fn test_roll_constant() {
        let mut rng = GameRng::new(42);
        assert_eq!(Dice::new(7, 0, 1).roll(&mut rng), 7);
    }

    #[test]
    fn test_display_round_trips() {
        let dice = Dice::new(-1, 2, 6);
        assert_eq!(Dice::parse(&dice.to_string()).unwrap(), dice);
    }
}
