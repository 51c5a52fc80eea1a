//! The round state machine shared by every game.
//!
//! One [`RoundEngine`] plays one series of rounds for one player. It is stepped once per poll
//! tick with a [`TickInput`] snapshot and reports what happened through a [`StatusSink`].
//! It never blocks: timed phases are states with deadlines, so the restart button is honoured
//! on the very next tick whatever the engine is doing.

use embassy_time::Instant;
use smart_leds::RGB8;

use crate::{
    LED_DEADBAND, PlayerId,
    colour::{self, NamedColour},
    config::{Advance, GameConfig, Hints, OnMiss, Reveal, Scoring, Targets},
    events::{GameEvent, RoundResult, StatusSink},
    maths,
    session::GameSession,
};

/// Everything the control loop sampled during one poll tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub now: Instant,
    /// The colour currently mixed on the pots
    pub mix: RGB8,
    /// RIGHT button pressed: hint while mixing, continue otherwise
    pub hint: bool,
    /// RIGHT button currently held down
    pub hint_held: bool,
    /// MIDDLE button pressed
    pub lock: bool,
    /// LEFT button pressed
    pub restart: bool,
}

impl TickInput {
    /// A tick with no buttons touched
    pub const fn idle(now: Instant, mix: RGB8) -> Self {
        Self {
            now,
            mix,
            hint: false,
            hint_held: false,
            lock: false,
            restart: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundState {
    /// About to pick the next target
    AwaitingTarget,
    /// Target on show until the deadline
    Presenting { until: Instant },
    /// The player is turning the knobs
    Mixing,
    /// Result on show, waiting for continue
    Locked(RoundResult),
    /// All rounds done or out of time
    SeriesComplete,
}

/// What a step did, as far as the owner of the engine is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Running,
    /// The restart button cleared the engine
    Restarted,
    /// The player confirmed the end of the series. Carries the session total
    Finished(u32),
}

/// A single scoring attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Round {
    index: u8,
    target: RGB8,
    name: Option<&'static str>,
    current: RGB8,
    hints: u32,
    locked: bool,
}

impl Round {
    fn new(index: u8, target: RGB8, name: Option<&'static str>) -> Self {
        Self {
            index,
            target,
            name,
            current: colour::OFF,
            hints: 0,
            locked: false,
        }
    }

    fn hint(&mut self) -> u32 {
        self.hints = self.hints.saturating_add(1);
        self.hints
    }

    /// Freeze the current colour and score it. Returns None if already locked
    fn lock(&mut self, player: PlayerId, scoring: Scoring) -> Option<RoundResult> {
        if self.locked {
            return None;
        }
        self.locked = true;
        let accuracy = colour::score(self.target, self.current);
        let (penalty, points, passed) = match scoring {
            Scoring::Continuous { penalty_per_hint } => {
                let penalty = maths::penalty_percentage(self.hints, penalty_per_hint);
                (penalty, maths::apply_penalty(accuracy, penalty) as u32, true)
            }
            Scoring::Threshold { pass, points } => {
                let passed = accuracy >= pass;
                (0, if passed { points } else { 0 }, passed)
            }
        };
        Some(RoundResult {
            player,
            round: self.index,
            target: self.target,
            name: self.name,
            current: self.current,
            accuracy,
            penalty,
            hints: self.hints,
            points,
            passed,
        })
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn target(&self) -> RGB8 {
        self.target
    }

    pub fn current(&self) -> RGB8 {
        self.current
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

pub struct RoundEngine {
    config: GameConfig,
    player: PlayerId,
    state: RoundState,
    round: Option<Round>,
    session: GameSession,
    /// Rounds completed so far, also the cursor into an ordered target list
    completed: u8,
    started: Option<Instant>,
    last_mix: Option<RGB8>,
    last_countdown: Option<u32>,
    rng: fastrand::Rng,
}

impl RoundEngine {
    /// # Parameters
    /// * `config` - The rules of the game, expected to have passed [`GameConfig::validate`]
    /// * `player` - Whose series this is
    /// * `seed` - Seed for random targets
    pub fn new(config: GameConfig, player: PlayerId, seed: u64) -> Self {
        Self {
            config,
            player,
            state: RoundState::AwaitingTarget,
            round: None,
            session: GameSession::new(player),
            completed: 0,
            started: None,
            last_mix: None,
            last_countdown: None,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn completed(&self) -> u8 {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoundState::SeriesComplete
    }

    /// Drop the round, the scores and the clock and go back to the very beginning
    pub fn restart(&mut self) {
        info!("GAME: Restarting series for P{}", self.player + 1);
        self.state = RoundState::AwaitingTarget;
        self.round = None;
        self.session.clear();
        self.completed = 0;
        self.started = None;
        self.last_mix = None;
        self.last_countdown = None;
    }

    /// Advance the engine by one poll tick. At most one state transition happens per call.
    pub fn step(&mut self, input: &TickInput, sink: &mut impl StatusSink) -> Step {
        if input.restart {
            self.restart();
            sink.report(GameEvent::Restarted);
            return Step::Restarted;
        }

        let started = match self.started {
            Some(at) => at,
            None => {
                self.start(input.now, sink);
                input.now
            }
        };

        if self.state != RoundState::SeriesComplete && self.out_of_time(started, input.now, sink)
        {
            info!("GAME: Time is up for P{}", self.player + 1);
            self.finish(sink);
            return Step::Running;
        }

        match self.state {
            RoundState::AwaitingTarget => self.next_target(input.now, sink),
            RoundState::Presenting { until } => {
                if input.now >= until {
                    sink.report(GameEvent::TargetHidden);
                    self.last_countdown = None;
                    self.state = RoundState::Mixing;
                } else if let Some(round) = self.round {
                    let remaining = until.saturating_duration_since(input.now);
                    let seconds = remaining.as_millis().div_ceil(1000) as u32;
                    if self.last_countdown != Some(seconds) {
                        self.last_countdown = Some(seconds);
                        sink.report(GameEvent::Presenting {
                            target: round.target,
                            remaining_s: seconds,
                        });
                    }
                }
            }
            RoundState::Mixing => self.mix(input, sink),
            RoundState::Locked(_) => {
                if input.hint {
                    self.after_result(sink);
                }
            }
            RoundState::SeriesComplete => {
                if input.hint {
                    return Step::Finished(self.session.total());
                }
            }
        }
        Step::Running
    }

    fn start(&mut self, now: Instant, sink: &mut impl StatusSink) {
        info!(
            "GAME: Starting {} for P{}",
            self.config.kind.title(),
            self.player + 1
        );
        self.started = Some(now);
        sink.report(GameEvent::GameStarted {
            kind: self.config.kind,
            player: self.player,
            rounds: self.config.rounds,
            time_limit_s: self.config.time_limit.map(|t| t.as_secs() as u32),
        });
    }

    /// Check the series deadline, reporting the whole seconds left whenever they change
    fn out_of_time(&mut self, started: Instant, now: Instant, sink: &mut impl StatusSink) -> bool {
        let Some(limit) = self.config.time_limit else {
            return false;
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= limit {
            return true;
        }
        // Presenting owns the countdown while it runs
        if !matches!(self.state, RoundState::Presenting { .. }) {
            let seconds = (limit - elapsed).as_secs() as u32;
            if self.last_countdown != Some(seconds) {
                self.last_countdown = Some(seconds);
                sink.report(GameEvent::TimeRemaining { seconds });
            }
        }
        false
    }

    fn next_target(&mut self, now: Instant, sink: &mut impl StatusSink) {
        if self.completed >= self.config.rounds {
            self.finish(sink);
            return;
        }
        let (target, name) = match self.config.targets {
            Targets::Random => (colour::random(&mut self.rng), None),
            Targets::Ordered(colours) => match colours.get(self.completed as usize) {
                Some(&NamedColour { name, colour }) => (colour, Some(name)),
                None => {
                    warn!(
                        "GAME: Only {} target colours for {} rounds",
                        colours.len(),
                        self.config.rounds
                    );
                    self.finish(sink);
                    return;
                }
            },
        };
        self.present(Round::new(self.completed, target, name), now, sink);
    }

    /// Make `round` the live round and show its target as the rules allow
    fn present(&mut self, round: Round, now: Instant, sink: &mut impl StatusSink) {
        debug!(
            "GAME: Round {} target {},{},{}",
            round.index + 1,
            round.target.r,
            round.target.g,
            round.target.b
        );
        let reveal = matches!(self.config.reveal, Reveal::Always);
        sink.report(GameEvent::TargetReady {
            player: self.player,
            round: round.index,
            rounds: self.config.rounds,
            target: round.target,
            name: round.name,
            reveal,
        });
        self.round = Some(round);
        self.last_mix = None;
        self.state = match self.config.reveal {
            Reveal::Presented(duration) => {
                self.last_countdown = None;
                RoundState::Presenting {
                    until: now + duration,
                }
            }
            Reveal::Always | Reveal::NameOnly => RoundState::Mixing,
        };
    }

    fn mix(&mut self, input: &TickInput, sink: &mut impl StatusSink) {
        let Some(mut round) = self.round else {
            // Mixing without a round cannot be reached, start over from target selection
            self.state = RoundState::AwaitingTarget;
            return;
        };
        round.current = input.mix;

        let moved = self
            .last_mix
            .is_none_or(|last| colour::differs(last, input.mix, LED_DEADBAND));
        if moved {
            self.last_mix = Some(input.mix);
            sink.report(GameEvent::Mix(input.mix));
            if input.hint_held && round.hints > 0 && !input.hint {
                sink.report(GameEvent::Compare {
                    target: round.target,
                    current: input.mix,
                });
            }
        }

        if input.hint {
            match self.config.hints {
                Hints::Allowed => {
                    let count = round.hint();
                    info!("GAME: Hint {} used", count);
                    sink.report(GameEvent::Hint {
                        count,
                        target: round.target,
                        current: round.current,
                    });
                }
                Hints::Refused => sink.report(GameEvent::HintsDisabled),
                Hints::Ignored => {}
            }
        }

        if input.lock {
            let result = round.lock(self.player, self.config.scoring);
            self.round = Some(round);
            if let Some(result) = result {
                self.locked(result, input.now, sink);
            }
            return;
        }
        self.round = Some(round);
    }

    fn locked(&mut self, result: RoundResult, now: Instant, sink: &mut impl StatusSink) {
        info!(
            "GAME: Round {} locked, {}% accuracy, {} points",
            result.round + 1,
            result.accuracy,
            result.points
        );
        sink.report(GameEvent::Result(result));

        if !result.passed && self.config.on_miss == OnMiss::Retry {
            // Same target again, nothing moves on until it is matched
            self.session.miss();
            self.present(Round::new(result.round, result.target, result.name), now, sink);
            return;
        }

        self.session.record(&result);
        self.completed = self.completed.saturating_add(1);
        match self.config.advance {
            Advance::OnContinue => self.state = RoundState::Locked(result),
            Advance::Immediate => self.after_result(sink),
        }
    }

    fn after_result(&mut self, sink: &mut impl StatusSink) {
        self.round = None;
        if self.completed >= self.config.rounds {
            self.finish(sink);
        } else {
            self.state = RoundState::AwaitingTarget;
        }
    }

    fn finish(&mut self, sink: &mut impl StatusSink) {
        self.round = None;
        self.state = RoundState::SeriesComplete;
        info!(
            "GAME: Series complete for P{}, total {}",
            self.player + 1,
            self.session.total()
        );
        sink.report(GameEvent::SeriesComplete {
            kind: self.config.kind,
            player: self.player,
            total: self.session.total(),
            completed: self.completed,
            rounds: self.config.rounds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::RAINBOW;

    type Events = std::vec::Vec<GameEvent>;

    const GREY: RGB8 = RGB8 {
        r: 128,
        g: 128,
        b: 128,
    };

    /// Drives an engine with a fake clock advancing one poll period per tick
    struct Harness {
        engine: RoundEngine,
        events: Events,
        now: u64,
        mix: RGB8,
    }

    impl Harness {
        fn new(config: GameConfig) -> Self {
            Self {
                engine: RoundEngine::new(config, 0, 42),
                events: Events::new(),
                now: 0,
                mix: GREY,
            }
        }

        fn tick_with(&mut self, f: impl FnOnce(&mut TickInput)) -> Step {
            let mut input = TickInput::idle(Instant::from_millis(self.now), self.mix);
            f(&mut input);
            self.now += crate::POLL_INTERVAL;
            self.engine.step(&input, &mut self.events)
        }

        fn tick(&mut self) -> Step {
            self.tick_with(|_| {})
        }

        fn hint(&mut self) -> Step {
            self.tick_with(|i| i.hint = true)
        }

        fn lock(&mut self) -> Step {
            self.tick_with(|i| i.lock = true)
        }

        fn target(&self) -> RGB8 {
            self.engine.round().map(|r| r.target()).unwrap()
        }

        fn results(&self) -> std::vec::Vec<RoundResult> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::Result(r) => Some(*r),
                    _ => None,
                })
                .collect()
        }
    }

    fn fixed_target(colours: &'static [NamedColour]) -> GameConfig {
        GameConfig {
            targets: Targets::Ordered(colours),
            rounds: colours.len() as u8,
            ..GameConfig::CLASSIC
        }
    }

    static ORANGE_BROWN: [NamedColour; 2] = [
        NamedColour::new("Rust", 200, 100, 50),
        NamedColour::new("Rust", 200, 100, 50),
    ];

    #[test]
    fn first_tick_starts_the_series_and_picks_a_target() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        assert_eq!(h.tick(), Step::Running);
        assert_eq!(*h.engine.state(), RoundState::Mixing);
        assert!(matches!(
            h.events[0],
            GameEvent::GameStarted {
                rounds: 2,
                time_limit_s: None,
                ..
            }
        ));
        assert!(matches!(
            h.events[1],
            GameEvent::TargetReady {
                round: 0,
                reveal: true,
                ..
            }
        ));
        assert_eq!(h.engine.round().map(|r| r.hints()), Some(0));
    }

    #[test]
    fn hinted_round_scores_with_penalty() {
        let mut h = Harness::new(fixed_target(&ORANGE_BROWN));
        h.tick();
        h.mix = RGB8::new(190, 110, 60);
        h.hint();
        h.hint();
        h.lock();
        let results = h.results();
        assert_eq!(results.len(), 1);
        let r = results[0];
        assert_eq!(r.accuracy, 96);
        assert_eq!(r.hints, 2);
        assert_eq!(r.penalty, 10);
        assert_eq!(r.points, 86);
        assert!(matches!(h.engine.state(), RoundState::Locked(_)));
        assert_eq!(h.engine.session().total(), 86);
        assert_eq!(h.engine.session().history()[0].score, 86);
    }

    #[test]
    fn twenty_hints_zero_the_score() {
        let mut h = Harness::new(fixed_target(&ORANGE_BROWN));
        h.tick();
        h.mix = RGB8::new(200, 100, 50);
        for _ in 0..25 {
            h.hint();
        }
        assert_eq!(h.engine.round().map(|r| r.hints()), Some(25));
        h.lock();
        let r = h.results()[0];
        assert_eq!(r.accuracy, 100);
        assert_eq!(r.penalty, 100);
        assert_eq!(r.points, 0);
    }

    #[test]
    fn hint_reports_comparison() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        let target = h.target();
        h.hint();
        assert!(h.events.contains(&GameEvent::Hint {
            count: 1,
            target,
            current: GREY
        }));
    }

    #[test]
    fn holding_hint_keeps_comparison_live() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        let target = h.target();
        // Held without a hint paid for shows nothing
        h.mix = RGB8::new(10, 10, 10);
        h.tick_with(|i| i.hint_held = true);
        assert!(!h.events.iter().any(|e| matches!(e, GameEvent::Compare { .. })));

        h.hint();
        h.mix = RGB8::new(60, 10, 10);
        h.tick_with(|i| i.hint_held = true);
        assert_eq!(
            h.events.last(),
            Some(&GameEvent::Compare {
                target,
                current: RGB8::new(60, 10, 10)
            })
        );
    }

    #[test]
    fn mix_is_only_reported_outside_the_deadband() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        h.tick();
        h.mix = RGB8::new(130, 125, 128);
        h.tick();
        h.mix = RGB8::new(140, 128, 128);
        h.tick();
        let mixes: std::vec::Vec<RGB8> = h
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Mix(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(mixes, [GREY, RGB8::new(140, 128, 128)]);
    }

    #[test]
    fn continue_moves_to_next_round_then_completes() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        h.lock();
        // Lock again while the result is shown does nothing
        h.lock();
        assert_eq!(h.results().len(), 1);
        h.hint();
        assert_eq!(*h.engine.state(), RoundState::AwaitingTarget);
        h.tick();
        assert_eq!(h.engine.round().map(|r| r.index()), Some(1));
        h.lock();
        h.hint();
        assert!(h.engine.is_finished());
        let total = h.engine.session().total();
        assert!(matches!(
            h.events.last(),
            Some(GameEvent::SeriesComplete { completed: 2, .. })
        ));
        assert_eq!(h.tick(), Step::Running);
        assert_eq!(h.hint(), Step::Finished(total));
    }

    #[test]
    fn hints_reset_each_round() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        h.hint();
        h.hint();
        h.lock();
        h.hint();
        h.tick();
        assert_eq!(h.engine.round().map(|r| r.hints()), Some(0));
    }

    #[test]
    fn memory_game_presents_then_hides_the_target() {
        let mut h = Harness::new(GameConfig::MEMORY);
        h.tick();
        assert!(matches!(h.engine.state(), RoundState::Presenting { .. }));
        assert!(matches!(
            h.events[1],
            GameEvent::TargetReady {
                reveal: false,
                name: Some("Red"),
                ..
            }
        ));
        // Locking while the target is on show is ignored
        h.lock();
        assert!(h.results().is_empty());

        // 5 seconds of 50 ms ticks
        while matches!(h.engine.state(), RoundState::Presenting { .. }) {
            h.tick();
            assert!(h.now <= 5_100);
        }
        let countdown: std::vec::Vec<u32> = h
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Presenting { remaining_s, .. } => Some(*remaining_s),
                _ => None,
            })
            .collect();
        assert_eq!(countdown, [5, 4, 3, 2, 1]);
        assert!(h.events.contains(&GameEvent::TargetHidden));
        assert_eq!(*h.engine.state(), RoundState::Mixing);
    }

    #[test]
    fn memory_game_counts_passes_and_moves_on_after_a_miss() {
        let mut h = Harness::new(GameConfig::MEMORY);
        for i in 0..5 {
            h.tick();
            while !matches!(h.engine.state(), RoundState::Mixing) {
                h.tick();
            }
            // Match the first three, miss the rest
            h.mix = if i < 3 { RAINBOW_ISH[i] } else { RGB8::new(0, 0, 0) };
            h.lock();
        }
        assert!(h.engine.is_finished());
        assert_eq!(h.engine.session().total(), 3);
        assert_eq!(h.engine.session().history().len(), 5);
        let passed: std::vec::Vec<bool> = h.results().iter().map(|r| r.passed).collect();
        assert_eq!(passed, [true, true, true, false, false]);
    }

    const RAINBOW_ISH: [RGB8; 3] = [
        RGB8 { r: 250, g: 5, b: 0 },
        RGB8 { r: 0, g: 250, b: 10 },
        RGB8 { r: 0, g: 0, b: 240 },
    ];

    #[test]
    fn memory_game_has_no_hints() {
        let mut h = Harness::new(GameConfig::MEMORY);
        h.tick();
        while !matches!(h.engine.state(), RoundState::Mixing) {
            h.tick();
        }
        h.hint();
        assert_eq!(h.events.last(), Some(&GameEvent::HintsDisabled));
        assert_eq!(h.engine.round().map(|r| r.hints()), Some(0));
    }

    #[test]
    fn sequence_ignores_the_hint_button() {
        let mut h = Harness::new(GameConfig::SEQUENCE);
        h.tick();
        h.hint();
        h.hint();
        assert!(
            !h.events
                .iter()
                .any(|e| matches!(e, GameEvent::Hint { .. } | GameEvent::HintsDisabled))
        );
        assert_eq!(h.engine.round().map(|r| r.hints()), Some(0));
        assert_eq!(*h.engine.state(), RoundState::Mixing);
    }

    #[test]
    fn short_colour_list_ends_the_series() {
        let mut h = Harness::new(GameConfig {
            targets: Targets::Ordered(&ORANGE_BROWN[..1]),
            rounds: 3,
            ..GameConfig::CLASSIC
        });
        h.tick();
        h.lock();
        h.hint();
        h.tick();
        assert!(h.engine.is_finished());
        assert!(matches!(
            h.events.last(),
            Some(GameEvent::SeriesComplete {
                completed: 1,
                rounds: 3,
                ..
            })
        ));
    }

    #[test]
    fn sequence_never_skips_an_unmatched_colour() {
        let mut h = Harness::new(GameConfig::SEQUENCE);
        h.tick();
        assert_eq!(h.target(), RAINBOW[0].colour);
        // Miss the first colour three times
        h.mix = RGB8::new(0, 0, 255);
        for _ in 0..3 {
            h.lock();
            assert_eq!(h.target(), RAINBOW[0].colour);
            assert_eq!(h.engine.completed(), 0);
        }
        assert_eq!(h.engine.session().misses(), 3);
        assert_eq!(h.engine.session().total(), 0);

        for (k, colour) in RAINBOW.iter().enumerate().take(4) {
            assert_eq!(h.target(), colour.colour);
            h.mix = colour.colour;
            h.lock();
            assert_eq!(h.engine.completed() as usize, k + 1);
            h.tick();
        }
        assert_eq!(h.target(), RAINBOW[4].colour);
        assert_eq!(h.engine.session().total(), 40);

        let presented: std::vec::Vec<u8> = h
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TargetReady { round, .. } => Some(*round),
                _ => None,
            })
            .collect();
        assert!(presented.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
    }

    #[test]
    fn sequence_finishes_when_every_colour_is_matched() {
        let mut h = Harness::new(GameConfig::SEQUENCE);
        h.tick();
        for colour in RAINBOW.iter() {
            h.mix = colour.colour;
            h.lock();
            h.tick();
        }
        assert!(h.engine.is_finished());
        assert_eq!(h.engine.session().total(), 100);
    }

    #[test]
    fn time_limit_ends_the_series_mid_round() {
        let mut h = Harness::new(GameConfig::SEQUENCE);
        h.tick();
        // Run the clock to just before the limit
        while h.now < 60_000 {
            h.tick();
            assert!(!h.engine.is_finished(), "finished early at {}", h.now);
        }
        assert_eq!(h.now, 60_000);
        assert!(h.engine.round().is_some());
        h.tick();
        assert!(h.engine.is_finished());
        assert!(matches!(
            h.events.last(),
            Some(GameEvent::SeriesComplete {
                completed: 0,
                total: 0,
                ..
            })
        ));
    }

    #[test]
    fn time_remaining_is_reported_once_per_second() {
        let mut h = Harness::new(GameConfig::SEQUENCE);
        for _ in 0..41 {
            h.tick();
        }
        let seconds: std::vec::Vec<u32> = h
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TimeRemaining { seconds } => Some(*seconds),
                _ => None,
            })
            .collect();
        assert_eq!(seconds, [60, 59, 58]);
    }

    #[test]
    fn restart_clears_from_any_state() {
        let mut h = Harness::new(GameConfig::CLASSIC);
        h.tick();
        h.hint();
        h.lock();
        assert!(matches!(h.engine.state(), RoundState::Locked(_)));
        assert_eq!(h.tick_with(|i| i.restart = true), Step::Restarted);
        assert_eq!(*h.engine.state(), RoundState::AwaitingTarget);
        assert_eq!(h.engine.session().total(), 0);
        assert!(h.engine.session().history().is_empty());
        assert!(h.engine.round().is_none());
        assert_eq!(h.events.last(), Some(&GameEvent::Restarted));

        // Restart wins over a simultaneous lock
        h.tick();
        assert_eq!(
            h.tick_with(|i| {
                i.lock = true;
                i.restart = true;
            }),
            Step::Restarted
        );
        assert!(h.results().len() == 1);
    }

    #[test]
    fn restart_interrupts_presenting_and_completed_series() {
        let mut h = Harness::new(GameConfig::MEMORY);
        h.tick();
        assert!(matches!(h.engine.state(), RoundState::Presenting { .. }));
        assert_eq!(h.tick_with(|i| i.restart = true), Step::Restarted);
        assert_eq!(*h.engine.state(), RoundState::AwaitingTarget);

        let mut h = Harness::new(GameConfig::SEQUENCE);
        h.tick();
        h.now = 70_000;
        h.tick();
        assert!(h.engine.is_finished());
        assert_eq!(h.tick_with(|i| i.restart = true), Step::Restarted);
        assert!(!h.engine.is_finished());
        // The clock starts over as well
        h.tick();
        assert!(!h.engine.is_finished());
    }

    #[test]
    fn random_targets_depend_on_the_seed() {
        let mut a = RoundEngine::new(GameConfig::CLASSIC, 0, 1);
        let mut b = RoundEngine::new(GameConfig::CLASSIC, 0, 1);
        let mut events = Events::new();
        let input = TickInput::idle(Instant::from_millis(0), GREY);
        a.step(&input, &mut events);
        b.step(&input, &mut events);
        assert_eq!(
            a.round().map(|r| r.target()),
            b.round().map(|r| r.target())
        );

        let first = a.round().map(|r| r.target());
        let differs = (2..=8).any(|seed| {
            let mut other = RoundEngine::new(GameConfig::CLASSIC, 0, seed);
            other.step(&input, &mut events);
            other.round().map(|r| r.target()) != first
        });
        assert!(differs);
    }
}
