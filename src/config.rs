//! Game rules. Every game is the same round engine with a different [`GameConfig`].

use core::fmt;

use embassy_time::Duration;

use crate::{
    MAX_PLAYERS, MAX_ROUNDS,
    colour::{NamedColour, PRIMARIES, RAINBOW},
};

/// Which game a configuration describes, used for titles and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameKind {
    /// Random targets, hints allowed, score penalised per hint
    Classic,
    /// Target flashed on the LED then hidden, pass or fail per round
    Memory,
    /// Named colours in a fixed order against the clock
    Sequence,
}

impl GameKind {
    pub const fn title(self) -> &'static str {
        match self {
            GameKind::Classic => "SPECTRAL MIXER",
            GameKind::Memory => "SCAVENGER HUNT",
            GameKind::Sequence => "COLOUR SEQUENCE",
        }
    }
}

/// How a locked-in colour turns into points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scoring {
    /// Points are the accuracy less `penalty_per_hint` percent for each hint
    Continuous { penalty_per_hint: u8 },
    /// `points` when the accuracy reaches `pass` percent, nothing otherwise
    Threshold { pass: u8, points: u32 },
}

/// Where the next target comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Targets {
    Random,
    /// Consumed strictly in order
    Ordered(&'static [NamedColour]),
}

/// What a failed attempt does to the round count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnMiss {
    /// The round is over regardless
    Advance,
    /// The same target is presented again until matched
    Retry,
}

/// What happens after a result has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// Wait for the continue button
    OnContinue,
    /// Go straight to the next target
    Immediate,
}

/// What the hint button does while mixing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hints {
    /// Each press shows the comparison and counts against the score
    Allowed,
    /// Presses are answered with a hints disabled notice
    Refused,
    /// Presses do nothing at all
    Ignored,
}

/// How much of the target the player gets to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Channel values are shown for the whole round
    Always,
    /// Shown on the LED for the given time, then hidden
    Presented(Duration),
    /// Only the colour name is shown
    NameOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub kind: GameKind,
    /// Rounds that must be completed to finish the series
    pub rounds: u8,
    pub scoring: Scoring,
    pub targets: Targets,
    pub on_miss: OnMiss,
    pub advance: Advance,
    pub hints: Hints,
    pub reveal: Reveal,
    /// The whole series ends once this much time has passed since it started
    pub time_limit: Option<Duration>,
}

impl GameConfig {
    pub const CLASSIC: Self = Self {
        kind: GameKind::Classic,
        rounds: 2,
        scoring: Scoring::Continuous {
            penalty_per_hint: 5,
        },
        targets: Targets::Random,
        on_miss: OnMiss::Advance,
        advance: Advance::OnContinue,
        hints: Hints::Allowed,
        reveal: Reveal::Always,
        time_limit: None,
    };

    pub const MEMORY: Self = Self {
        kind: GameKind::Memory,
        rounds: PRIMARIES.len() as u8,
        scoring: Scoring::Threshold {
            pass: 80,
            points: 1,
        },
        targets: Targets::Ordered(&PRIMARIES),
        on_miss: OnMiss::Advance,
        advance: Advance::Immediate,
        hints: Hints::Refused,
        reveal: Reveal::Presented(Duration::from_secs(5)),
        time_limit: None,
    };

    pub const SEQUENCE: Self = Self {
        kind: GameKind::Sequence,
        rounds: RAINBOW.len() as u8,
        scoring: Scoring::Threshold {
            pass: 80,
            points: 10,
        },
        targets: Targets::Ordered(&RAINBOW),
        on_miss: OnMiss::Retry,
        advance: Advance::Immediate,
        hints: Hints::Ignored,
        reveal: Reveal::NameOnly,
        time_limit: Some(Duration::from_secs(60)),
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.rounds as usize > MAX_ROUNDS {
            return Err(ConfigError::TooManyRounds {
                rounds: self.rounds,
                max: MAX_ROUNDS as u8,
            });
        }
        if let Targets::Ordered(colours) = self.targets {
            if colours.len() < self.rounds as usize {
                return Err(ConfigError::SequenceTooShort {
                    rounds: self.rounds,
                    available: colours.len().min(u8::MAX as usize) as u8,
                });
            }
        }
        match self.scoring {
            Scoring::Continuous { penalty_per_hint } if penalty_per_hint > 100 => {
                return Err(ConfigError::PercentOutOfRange(penalty_per_hint));
            }
            Scoring::Threshold { pass, .. } if pass > 100 => {
                return Err(ConfigError::PercentOutOfRange(pass));
            }
            _ => {}
        }
        // A continuous score always completes the round, so retrying would never happen
        if self.on_miss == OnMiss::Retry && !matches!(self.scoring, Scoring::Threshold { .. }) {
            return Err(ConfigError::RetryWithoutThreshold);
        }
        if matches!(self.time_limit, Some(limit) if limit.as_ticks() == 0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}

/// The games played in a match and by how many players
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    pub games: &'static [GameConfig],
    pub players: u8,
}

impl MatchConfig {
    /// Two players through all three games
    pub const ARCADE: Self = Self {
        games: &[GameConfig::CLASSIC, GameConfig::MEMORY, GameConfig::SEQUENCE],
        players: 2,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 || self.players as usize > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount {
                players: self.players,
                max: MAX_PLAYERS as u8,
            });
        }
        if self.games.is_empty() {
            return Err(ConfigError::NoGames);
        }
        self.games.iter().try_for_each(GameConfig::validate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    NoRounds,
    TooManyRounds { rounds: u8, max: u8 },
    SequenceTooShort { rounds: u8, available: u8 },
    PercentOutOfRange(u8),
    RetryWithoutThreshold,
    ZeroTimeLimit,
    PlayerCount { players: u8, max: u8 },
    NoGames,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoRounds => write!(f, "a game needs at least one round"),
            ConfigError::TooManyRounds { rounds, max } => {
                write!(f, "{rounds} rounds configured, at most {max} supported")
            }
            ConfigError::SequenceTooShort { rounds, available } => {
                write!(f, "{rounds} rounds configured but only {available} target colours")
            }
            ConfigError::PercentOutOfRange(pct) => write!(f, "{pct}% is not a valid percentage"),
            ConfigError::RetryWithoutThreshold => {
                write!(f, "retrying a miss needs a pass threshold")
            }
            ConfigError::ZeroTimeLimit => write!(f, "time limit must be longer than zero"),
            ConfigError::PlayerCount { players, max } => {
                write!(f, "{players} players configured, between 1 and {max} supported")
            }
            ConfigError::NoGames => write!(f, "a match needs at least one game"),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(GameConfig::CLASSIC.validate(), Ok(()));
        assert_eq!(GameConfig::MEMORY.validate(), Ok(()));
        assert_eq!(GameConfig::SEQUENCE.validate(), Ok(()));
        assert_eq!(MatchConfig::ARCADE.validate(), Ok(()));
    }

    #[test]
    fn rejects_more_rounds_than_colours() {
        let config = GameConfig {
            rounds: 6,
            ..GameConfig::MEMORY
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SequenceTooShort {
                rounds: 6,
                available: 5
            })
        );
    }

    #[test]
    fn rejects_empty_and_oversized_games() {
        let none = GameConfig {
            rounds: 0,
            ..GameConfig::CLASSIC
        };
        assert_eq!(none.validate(), Err(ConfigError::NoRounds));
        let huge = GameConfig {
            rounds: MAX_ROUNDS as u8 + 1,
            ..GameConfig::CLASSIC
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::TooManyRounds { .. })
        ));
    }

    #[test]
    fn rejects_retry_on_continuous_scoring() {
        let config = GameConfig {
            on_miss: OnMiss::Retry,
            ..GameConfig::CLASSIC
        };
        assert_eq!(config.validate(), Err(ConfigError::RetryWithoutThreshold));
    }

    #[test]
    fn rejects_bad_player_counts() {
        let solo_nobody = MatchConfig {
            players: 0,
            ..MatchConfig::ARCADE
        };
        assert!(matches!(
            solo_nobody.validate(),
            Err(ConfigError::PlayerCount { .. })
        ));
        let empty = MatchConfig {
            games: &[],
            players: 2,
        };
        assert_eq!(empty.validate(), Err(ConfigError::NoGames));
    }
}
