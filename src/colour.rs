//! Colours, the named palettes the games draw their targets from, and the accuracy score.

use crate::maths;
pub use smart_leds::RGB8;

/// Largest possible distance between two colours, rounded the way the score tables were built
pub const MAX_ERROR: f64 = 441.67;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// A target colour with the name the player is asked to mix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedColour {
    pub name: &'static str,
    pub colour: RGB8,
}

impl NamedColour {
    pub const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            colour: RGB8 { r, g, b },
        }
    }
}

/// Targets for the memory game, shown one after another
pub const PRIMARIES: [NamedColour; 5] = [
    NamedColour::new("Red", 255, 0, 0),
    NamedColour::new("Green", 0, 255, 0),
    NamedColour::new("Blue", 0, 0, 255),
    NamedColour::new("Yellow", 255, 255, 0),
    NamedColour::new("Cyan", 0, 255, 255),
];

/// Targets for the sequence challenge, matched strictly in this order
pub const RAINBOW: [NamedColour; 10] = [
    NamedColour::new("Red", 255, 0, 0),
    NamedColour::new("Orange", 255, 128, 0),
    NamedColour::new("Yellow", 255, 255, 0),
    NamedColour::new("Yellow-Green", 128, 255, 0),
    NamedColour::new("Green", 0, 255, 0),
    NamedColour::new("Cyan", 0, 255, 255),
    NamedColour::new("Blue", 0, 0, 255),
    NamedColour::new("Indigo", 75, 0, 130),
    NamedColour::new("Purple", 128, 0, 255),
    NamedColour::new("Magenta", 255, 0, 255),
];

/// Accuracy in percent of `current` against `target`, 100 for an exact match
pub fn score(target: RGB8, current: RGB8) -> u8 {
    let error = maths::distance(channels(target), channels(current));
    maths::accuracy(error, MAX_ERROR)
}

/// Uniform random colour, each channel drawn independently
pub fn random(rng: &mut fastrand::Rng) -> RGB8 {
    RGB8 {
        r: rng.u8(..),
        g: rng.u8(..),
        b: rng.u8(..),
    }
}

/// True if any channel moved by more than `deadband`
pub fn differs(a: RGB8, b: RGB8, deadband: u8) -> bool {
    a.r.abs_diff(b.r) > deadband || a.g.abs_diff(b.g) > deadband || a.b.abs_diff(b.b) > deadband
}

pub const fn channels(c: RGB8) -> [u8; 3] {
    [c.r, c.g, c.b]
}
