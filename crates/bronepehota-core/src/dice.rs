//! Dice notation parsing and evaluation.
//!
//! Weapon profiles describe range and power as compact notation strings:
//! `D6`, `2D12`, `D6+2`, `3D6+1`. The grammar is `[count]D<sides>[+bonus]`.
//! A weapon without a ranged profile uses the melee sentinel [`MELEE_RANGE`]
//! instead, which is recognised verbatim and never reaches the parser.
//!
//! Randomness is injected through [`DiceSource`]. Every [`rand::RngCore`]
//! is a dice source, and [`LoadedDice`] replays fixed faces.

use rand::{Rng, RngCore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

/// Notation meaning "contact range": the weapon is always in range
pub const MELEE_RANGE: &str = "ББ";

static NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)?[Dd]([0-9]+)(?:\s*\+\s*([0-9]+))?").expect("dice notation regex")
});

/// Most dice a single notation may roll
pub const MAX_DICE: u32 = 1000;

/// A source of uniformly distributed die faces
pub trait DiceSource {
    /// Roll one die, returning a face in `[1, sides]`
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: RngCore + ?Sized> DiceSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of faces, cycling when exhausted.
///
/// Faces are clamped into `[1, sides]` of the die being rolled. An empty
/// sequence always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct LoadedDice {
    faces: Vec<u32>,
    next: usize,
}

impl LoadedDice {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
        }
    }

    /// Number of faces handed out so far
    pub fn rolled(&self) -> usize {
        self.next
    }
}

impl DiceSource for LoadedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = if self.faces.is_empty() {
            1
        } else {
            self.faces[self.next % self.faces.len()]
        };
        self.next += 1;
        face.clamp(1, sides.max(1))
    }
}

/// Roll a single die with the given number of sides
pub fn roll_die(sides: u32, dice: &mut dyn DiceSource) -> u32 {
    dice.roll_die(sides)
}

/// A parsed dice expression: `count` dice of `sides` faces, plus `bonus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
    pub bonus: u32,
}

impl DiceNotation {
    /// What unparseable notation resolves to: a single plain D6
    pub const FALLBACK: DiceNotation = DiceNotation {
        count: 1,
        sides: 6,
        bonus: 0,
    };

    pub fn new(count: u32, sides: u32, bonus: u32) -> Self {
        Self {
            count,
            sides,
            bonus,
        }
    }

    /// Parse notation such as `2D12+2`.
    ///
    /// WARNING: this never fails. Anything that does not match the grammar
    /// (including `D0` and the melee sentinel) silently becomes
    /// [`DiceNotation::FALLBACK`]; a typo in weapon data rolls as `1D6`.
    /// So does notation whose count exceeds [`MAX_DICE`] or whose highest
    /// total does not fit in an `i32`.
    /// The fallback is logged at `warn` level.
    pub fn parse(notation: &str) -> Self {
        match Self::try_parse(notation) {
            Some(parsed) => parsed,
            None => {
                warn!(notation, "unrecognised dice notation, rolling 1D6 instead");
                Self::FALLBACK
            }
        }
    }

    fn try_parse(notation: &str) -> Option<Self> {
        let caps = NOTATION.captures(notation)?;
        let count = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 1,
        };
        let sides: u32 = caps[2].parse().ok()?;
        if sides == 0 {
            return None;
        }
        let bonus = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let parsed = Self::new(count, sides, bonus);
        if count > MAX_DICE || i32::try_from(parsed.highest()).is_err() {
            return None;
        }
        Some(parsed)
    }

    fn highest(&self) -> u64 {
        u64::from(self.count) * u64::from(self.sides) + u64::from(self.bonus)
    }

    /// Lowest possible total
    pub fn min(&self) -> i32 {
        saturate(u64::from(self.count) + u64::from(self.bonus))
    }

    /// Highest possible total
    pub fn max(&self) -> i32 {
        saturate(self.highest())
    }

    /// Roll all dice and sum them with the bonus
    pub fn roll(&self, dice: &mut dyn DiceSource) -> RollOutcome {
        let rolls: Vec<u32> = (0..self.count).map(|_| dice.roll_die(self.sides)).collect();
        let sum = rolls
            .iter()
            .fold(u64::from(self.bonus), |acc, &r| acc.saturating_add(u64::from(r)));
        RollOutcome {
            total: saturate(sum),
            rolls,
        }
    }

    /// Roll each die separately, adding the bonus to every face.
    ///
    /// This is how power rolls are read: each die is compared to the
    /// target on its own.
    pub fn roll_each(&self, dice: &mut dyn DiceSource) -> Vec<i32> {
        (0..self.count)
            .map(|_| saturate(u64::from(dice.roll_die(self.sides)) + u64::from(self.bonus)))
            .collect()
    }

    pub fn die_type(&self) -> DieType {
        DieType::from_sides(self.sides)
    }
}

fn saturate(n: u64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "D{}", self.sides)?;
        if self.bonus > 0 {
            write!(f, "+{}", self.bonus)?;
        }
        Ok(())
    }
}

/// Parse notation into its count, sides and bonus
pub fn parse(notation: &str) -> DiceNotation {
    DiceNotation::parse(notation)
}

/// Result of evaluating a notation string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Sum of all faces plus the bonus
    pub total: i32,
    /// Raw faces in roll order, without the bonus
    pub rolls: Vec<u32>,
}

/// Evaluate notation.
///
/// The melee sentinel yields `{ total: 0, rolls: [] }`. That zero is a
/// convention, not a miss.
pub fn roll(notation: &str, dice: &mut dyn DiceSource) -> RollOutcome {
    if notation == MELEE_RANGE {
        return RollOutcome {
            total: 0,
            rolls: Vec::new(),
        };
    }
    DiceNotation::parse(notation).roll(dice)
}

/// The three die sizes weapons use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D6,
    D12,
    D20,
}

impl DieType {
    /// Classify a die by face count; anything unusual counts as a D6
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            20 => DieType::D20,
            12 => DieType::D12,
            _ => DieType::D6,
        }
    }

    /// Classify the dice named in a notation string
    pub fn of_notation(notation: &str) -> Self {
        if notation.contains("D20") {
            DieType::D20
        } else if notation.contains("D12") {
            DieType::D12
        } else {
            DieType::D6
        }
    }

}
