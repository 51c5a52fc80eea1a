#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every other module.
mod fmt;

pub mod animations;
pub mod colour;
pub mod config;
pub mod drivers;
pub mod events;
pub mod match_play;
pub mod maths;
pub mod render;
pub mod round;
pub mod session;
#[cfg(feature = "esp32c3")]
pub mod tasks;

pub use colour::{NamedColour, RGB8, score};
pub use config::{ConfigError, GameConfig, Hints, MatchConfig};
pub use events::{GameEvent, StatusSink};
pub use match_play::{MatchEngine, MatchTotals, Outcome};
pub use round::{RoundEngine, RoundState, Step, TickInput};
pub use session::{GameSession, RoundRecord};

/// Index of a player within a match, zero based. Displayed one based.
pub type PlayerId = u8;

/// The control loop poll interval in milliseconds
pub const POLL_INTERVAL: u64 = 50;

/// Debounce window applied to every button in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// The LED animation update interval in milliseconds
pub const ANIMATION_UPDATE: u64 = 50;

/// Minimum change on any channel before a new mix is reported
pub const LED_DEADBAND: u8 = 5;

/// The colour shown on the LED while idle (green)
pub const DEFAULT_COLOUR: [u8; 3] = [0, 255, 0];

/// The number of LEDs in the string we are driving
pub const LED_STRING_SIZE: usize = 1;

/// The maximum number of pending animations in the animation queue
pub const MAX_PENDING_ANIMATIONS: usize = 4;

/// Upper bound on rounds per game, sizes the per-session score history
pub const MAX_ROUNDS: usize = 16;

/// Upper bound on players in one match
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RgbBrightness {
    Low = 10,
    Medium = 100,
    High = 200,
    Max = 255,
}
