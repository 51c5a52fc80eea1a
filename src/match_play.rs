//! Several games played by several players, with the scores added up at the end.

use crate::{
    MAX_PLAYERS, PlayerId,
    config::{ConfigError, GameConfig, MatchConfig},
    events::{GameEvent, StatusSink},
    round::{RoundEngine, Step, TickInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Winner(PlayerId),
    /// Two or more players share the top total
    Tie,
}

/// Accumulated score per player across every game of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatchTotals {
    totals: [u32; MAX_PLAYERS],
    players: u8,
}

impl MatchTotals {
    pub const fn new(players: u8) -> Self {
        Self {
            totals: [0; MAX_PLAYERS],
            players,
        }
    }

    pub fn add(&mut self, player: PlayerId, points: u32) {
        if let Some(total) = self.active_mut().get_mut(player as usize) {
            *total = total.saturating_add(points);
        } else {
            warn!("MATCH: No such player P{}", player + 1);
        }
    }

    pub fn get(&self, player: PlayerId) -> u32 {
        self.active().get(player as usize).copied().unwrap_or(0)
    }

    pub fn players(&self) -> u8 {
        self.players
    }

    pub fn reset(&mut self) {
        self.totals = [0; MAX_PLAYERS];
    }

    /// The player with the strictly greatest total, or a tie if the top is shared
    pub fn outcome(&self) -> Outcome {
        let mut best: Option<(PlayerId, u32)> = None;
        let mut tied = false;
        for (player, &total) in self.active().iter().enumerate() {
            match best {
                Some((_, top)) if total == top => tied = true,
                Some((_, top)) if total < top => {}
                _ => {
                    best = Some((player as PlayerId, total));
                    tied = false;
                }
            }
        }
        match best {
            Some((player, _)) if !tied => Outcome::Winner(player),
            _ => Outcome::Tie,
        }
    }

    fn active(&self) -> &[u32] {
        &self.totals[..(self.players as usize).min(MAX_PLAYERS)]
    }

    fn active_mut(&mut self) -> &mut [u32] {
        let players = (self.players as usize).min(MAX_PLAYERS);
        &mut self.totals[..players]
    }
}

/// Runs one [`RoundEngine`] after another, game-major: every player plays the first game
/// before anyone plays the second.
pub struct MatchEngine {
    config: MatchConfig,
    game: usize,
    player: PlayerId,
    series: RoundEngine,
    totals: MatchTotals,
    outcome: Option<Outcome>,
    rng: fastrand::Rng,
}

impl MatchEngine {
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let series = RoundEngine::new(config.games[0], 0, rng.u64(..));
        Ok(Self {
            config,
            game: 0,
            player: 0,
            series,
            totals: MatchTotals::new(config.players),
            outcome: None,
            rng,
        })
    }

    pub fn series(&self) -> &RoundEngine {
        &self.series
    }

    pub fn totals(&self) -> &MatchTotals {
        &self.totals
    }

    /// Set once the last series of the match is done
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The game being played and the player playing it
    pub fn current(&self) -> (&GameConfig, PlayerId) {
        (&self.config.games[self.game], self.player)
    }

    pub fn step(&mut self, input: &TickInput, sink: &mut impl StatusSink) {
        if self.outcome.is_some() {
            if input.restart {
                self.reset();
                sink.report(GameEvent::Restarted);
            } else if input.hint {
                info!("MATCH: Starting a new match");
                self.reset();
            }
            return;
        }

        match self.series.step(input, sink) {
            Step::Running => {}
            Step::Restarted => self.reset(),
            Step::Finished(total) => {
                self.totals.add(self.player, total);
                self.next_series(sink);
            }
        }
    }

    /// Clear the totals and go back to the first game for the first player
    pub fn reset(&mut self) {
        self.game = 0;
        self.player = 0;
        self.totals.reset();
        self.outcome = None;
        self.series = RoundEngine::new(self.config.games[0], 0, self.rng.u64(..));
    }

    fn next_series(&mut self, sink: &mut impl StatusSink) {
        self.player += 1;
        if self.player >= self.config.players {
            self.player = 0;
            self.game += 1;
        }
        if self.game >= self.config.games.len() {
            self.game = self.config.games.len() - 1;
            let outcome = self.totals.outcome();
            match outcome {
                Outcome::Winner(player) => info!("MATCH: Player {} wins", player + 1),
                Outcome::Tie => info!("MATCH: Tie"),
            }
            self.outcome = Some(outcome);
            sink.report(GameEvent::MatchComplete {
                totals: self.totals,
                outcome,
            });
            return;
        }
        debug!("MATCH: Game {} for P{}", self.game + 1, self.player + 1);
        let seed = self.rng.u64(..);
        self.series = RoundEngine::new(self.config.games[self.game], self.player, seed);
    }
}
