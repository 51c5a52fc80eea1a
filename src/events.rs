//! Everything the game tells the outside world goes through [`StatusSink`] as a [`GameEvent`].
//! The engines never draw or light anything themselves.

use smart_leds::RGB8;

use crate::{PlayerId, config::GameKind, match_play::{MatchTotals, Outcome}};

/// The scored outcome of one locked-in attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResult {
    pub player: PlayerId,
    /// Zero based round within the series
    pub round: u8,
    pub target: RGB8,
    pub name: Option<&'static str>,
    pub current: RGB8,
    /// Accuracy before any penalty, 0–100
    pub accuracy: u8,
    /// Percentage taken off for hints, 0–100
    pub penalty: u8,
    pub hints: u32,
    /// Points this attempt adds to the session total
    pub points: u32,
    /// Whether the attempt completes the round. Always true for continuous scoring
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Everything was cleared by the restart button
    Restarted,
    GameStarted {
        kind: GameKind,
        player: PlayerId,
        rounds: u8,
        time_limit_s: Option<u32>,
    },
    /// A new target was picked. `reveal` says whether its values may be shown
    TargetReady {
        player: PlayerId,
        round: u8,
        rounds: u8,
        target: RGB8,
        name: Option<&'static str>,
        reveal: bool,
    },
    /// The target is on the LED for another `remaining_s` seconds
    Presenting { target: RGB8, remaining_s: u32 },
    TargetHidden,
    /// The player's mix moved by more than the deadband
    Mix(RGB8),
    Hint {
        count: u32,
        target: RGB8,
        current: RGB8,
    },
    /// Live comparison while the hint button is held
    Compare { target: RGB8, current: RGB8 },
    HintsDisabled,
    Result(RoundResult),
    TimeRemaining { seconds: u32 },
    SeriesComplete {
        kind: GameKind,
        player: PlayerId,
        total: u32,
        completed: u8,
        rounds: u8,
    },
    MatchComplete { totals: MatchTotals, outcome: Outcome },
}

/// Receiver for status updates, typically the display task
pub trait StatusSink {
    fn report(&mut self, event: GameEvent);
}

/// Collects events until full, dropping the rest
impl<const N: usize> StatusSink for heapless::Vec<GameEvent, N> {
    fn report(&mut self, event: GameEvent) {
        if self.push(event).is_err() {
            warn!("EVENTS: Event buffer full, dropping event");
        }
    }
}

#[cfg(test)]
impl StatusSink for std::vec::Vec<GameEvent> {
    fn report(&mut self, event: GameEvent) {
        self.push(event);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for GameEvent {
    fn format(&self, fmt: defmt::Formatter) {
        use defmt::write;
        match self {
            GameEvent::Restarted => write!(fmt, "Restarted"),
            GameEvent::GameStarted { kind, player, .. } => {
                write!(fmt, "GameStarted({}, P{})", kind, player + 1)
            }
            GameEvent::TargetReady { round, target, .. } => write!(
                fmt,
                "TargetReady(R{}, {},{},{})",
                round + 1,
                target.r,
                target.g,
                target.b
            ),
            GameEvent::Presenting { remaining_s, .. } => {
                write!(fmt, "Presenting({}s)", remaining_s)
            }
            GameEvent::TargetHidden => write!(fmt, "TargetHidden"),
            GameEvent::Mix(c) => write!(fmt, "Mix({},{},{})", c.r, c.g, c.b),
            GameEvent::Hint { count, .. } => write!(fmt, "Hint(#{})", count),
            GameEvent::Compare { .. } => write!(fmt, "Compare"),
            GameEvent::HintsDisabled => write!(fmt, "HintsDisabled"),
            GameEvent::Result(r) => write!(
                fmt,
                "Result(R{}, {}%, -{}%, {} pts)",
                r.round + 1,
                r.accuracy,
                r.penalty,
                r.points
            ),
            GameEvent::TimeRemaining { seconds } => write!(fmt, "TimeRemaining({}s)", seconds),
            GameEvent::SeriesComplete { player, total, .. } => {
                write!(fmt, "SeriesComplete(P{}, {})", player + 1, total)
            }
            GameEvent::MatchComplete { outcome, .. } => write!(fmt, "MatchComplete({})", outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_sink_drops_overflow() {
        let mut sink: heapless::Vec<GameEvent, 2> = heapless::Vec::new();
        sink.report(GameEvent::Restarted);
        sink.report(GameEvent::TargetHidden);
        sink.report(GameEvent::HintsDisabled);
        assert_eq!(
            sink.as_slice(),
            &[GameEvent::Restarted, GameEvent::TargetHidden]
        );
    }
}
