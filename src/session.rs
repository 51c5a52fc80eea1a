use heapless::Vec;

use crate::{MAX_ROUNDS, PlayerId, events::RoundResult};

/// One completed round in a player's history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundRecord {
    pub round: u8,
    pub player: PlayerId,
    pub score: u32,
    pub hints: u32,
    pub accuracy: u8,
}

/// Scores of one player through one game
#[derive(Debug, Clone)]
pub struct GameSession {
    player: PlayerId,
    history: Vec<RoundRecord, MAX_ROUNDS>,
    total: u32,
    misses: u32,
}

impl GameSession {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            history: Vec::new(),
            total: 0,
            misses: 0,
        }
    }

    /// Append a completed round and add its points to the total
    pub fn record(&mut self, result: &RoundResult) {
        let record = RoundRecord {
            round: result.round,
            player: result.player,
            score: result.points,
            hints: result.hints,
            accuracy: result.accuracy,
        };
        self.total = self.total.saturating_add(result.points);
        if self.history.push(record).is_err() {
            // Round counts are validated against the capacity, so only the history is lost
            warn!("SESSION: History full, round {} not kept", result.round);
        }
    }

    /// Count a failed attempt at a round that will be retried
    pub fn miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.total = 0;
        self.misses = 0;
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_leds::RGB8;

    fn result(round: u8, points: u32, hints: u32) -> RoundResult {
        RoundResult {
            player: 1,
            round,
            target: RGB8::default(),
            name: None,
            current: RGB8::default(),
            accuracy: 90,
            penalty: 0,
            hints,
            points,
            passed: true,
        }
    }

    #[test]
    fn records_accumulate_in_order() {
        let mut session = GameSession::new(1);
        session.record(&result(0, 86, 2));
        session.record(&result(1, 40, 0));
        assert_eq!(session.total(), 126);
        let rounds: std::vec::Vec<u8> = session.history().iter().map(|r| r.round).collect();
        assert_eq!(rounds, [0, 1]);
        assert_eq!(session.history()[0].hints, 2);
        assert_eq!(session.history()[0].player, 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut session = GameSession::new(0);
        session.record(&result(0, 10, 0));
        session.miss();
        session.clear();
        assert_eq!(session.total(), 0);
        assert_eq!(session.misses(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn overflowing_history_still_counts_points() {
        let mut session = GameSession::new(0);
        for round in 0..(MAX_ROUNDS as u8 + 2) {
            session.record(&result(round, 1, 0));
        }
        assert_eq!(session.history().len(), MAX_ROUNDS);
        assert_eq!(session.total(), MAX_ROUNDS as u32 + 2);
    }
}
