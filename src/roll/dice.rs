use rand::Rng;
use std::fmt;

/// Die size used whenever a spec is missing or cannot be read
pub const DEFAULT_SIDES: u32 = 20;

/// A single die to roll, e.g. `d20`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSpec {
    sides: u32,
}

impl DiceSpec {
    /// Returns `None` for a die without sides
    pub fn new(sides: u32) -> Option<Self> {
        (sides >= 1).then_some(Self { sides })
    }

    /// Reads specs like `d6`, `D12` or `8`, falling back to a d20
    ///
    /// Parsing never fails: missing, blank, malformed or zero-sided specs all
    /// yield the default die.
    pub fn parse(input: Option<&str>) -> Self {
        input
            .map(str::trim)
            .map(|s| s.strip_prefix(['d', 'D']).unwrap_or(s))
            .and_then(|digits| digits.parse::<u32>().ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Draws a uniformly distributed result in `1..=sides`
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(1..=self.sides)
    }
}

impl Default for DiceSpec {
    fn default() -> Self {
        Self {
            sides: DEFAULT_SIDES,
        }
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides)
    }
}
