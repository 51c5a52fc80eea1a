//! Turns game events into lines of text for the OLED.
//!
//! Everything is formatted with `ufmt` into fixed capacity `heapless` strings, so the display
//! task never allocates. A 128x64 panel with a 6x10 font fits [`MAX_LINES`] lines of 21
//! characters.

use heapless::{String, Vec};
use smart_leds::RGB8;
use ufmt::uwrite;

use crate::{
    LED_DEADBAND,
    colour::channels,
    events::{GameEvent, RoundResult},
    match_play::{MatchTotals, Outcome},
};

pub const LINE_LEN: usize = 21;
pub const MAX_LINES: usize = 6;
/// Cells inside the brackets of an accuracy bar
pub const BAR_WIDTH: usize = 16;

pub type Line = String<LINE_LEN>;
pub type Screen = Vec<Line, MAX_LINES>;

/// Appends one formatted line, silently truncating anything that does not fit
macro_rules! push_line {
    ($screen:expr, $($arg:tt)*) => {{
        let mut line = Line::new();
        let _ = uwrite!(line, $($arg)*);
        let _ = $screen.push(line);
    }};
}

/// The screen to show for `event`, or None if the event leaves the screen alone
pub fn screen(event: &GameEvent) -> Option<Screen> {
    let mut s = Screen::new();
    match event {
        GameEvent::Restarted => {
            push_line!(s, "RESTARTED");
            push_line!(s, "");
            push_line!(s, "MIDDLE locks a colour");
            push_line!(s, "RIGHT for a hint");
        }
        GameEvent::GameStarted {
            kind,
            player,
            rounds,
            time_limit_s,
        } => {
            push_line!(s, "{}", kind.title());
            push_line!(s, "Player {}", player + 1);
            push_line!(s, "{} rounds", rounds);
            if let Some(limit) = time_limit_s {
                push_line!(s, "Time limit {}", clock(*limit).as_str());
            }
        }
        GameEvent::TargetReady {
            player,
            round,
            rounds,
            target,
            name,
            reveal,
        } => {
            push_line!(s, "P{} Round {}/{}", player + 1, round + 1, rounds);
            if let Some(name) = name {
                push_line!(s, "Match: {}", *name);
            }
            if *reveal {
                let [r, g, b] = channels(*target);
                push_line!(s, "R{} G{} B{}", r, g, b);
            }
            push_line!(s, "");
            push_line!(s, "MIDDLE to lock");
        }
        GameEvent::Presenting { remaining_s, .. } => {
            push_line!(s, "REMEMBER THIS COLOUR");
            push_line!(s, "");
            push_line!(s, "Hidden in {}s", remaining_s);
        }
        GameEvent::TargetHidden => {
            push_line!(s, "Now mix it!");
            push_line!(s, "");
            push_line!(s, "MIDDLE to lock");
        }
        GameEvent::Mix(_) | GameEvent::TimeRemaining { .. } => return None,
        GameEvent::Hint {
            count,
            target,
            current,
        } => {
            push_line!(s, "HINT {}", count);
            comparison(&mut s, *target, *current);
        }
        GameEvent::Compare { target, current } => {
            push_line!(s, "COMPARE");
            comparison(&mut s, *target, *current);
        }
        GameEvent::HintsDisabled => {
            push_line!(s, "No hints in");
            push_line!(s, "this game!");
        }
        GameEvent::Result(result) => result_card(&mut s, result),
        GameEvent::SeriesComplete {
            kind,
            player,
            total,
            completed,
            rounds,
        } => {
            push_line!(s, "{}", kind.title());
            push_line!(s, "Player {} finished", player + 1);
            push_line!(s, "Rounds {}/{}", completed, rounds);
            push_line!(s, "Total {}", total);
            push_line!(s, "");
            push_line!(s, "RIGHT to continue");
        }
        GameEvent::MatchComplete { totals, outcome } => match_card(&mut s, totals, *outcome),
    }
    Some(s)
}

/// Whole seconds as `mm:ss`
pub fn clock(seconds: u32) -> Line {
    let (m, s) = (seconds / 60, seconds % 60);
    let mut line = Line::new();
    let _ = uwrite!(line, "{}{}:{}{}", m / 10, m % 10, s / 10, s % 10);
    line
}

/// A bracketed bar filled in proportion to `percent`
pub fn bar(percent: u8) -> Line {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    let mut line = Line::new();
    let _ = line.push('[');
    for cell in 0..BAR_WIDTH {
        let _ = line.push(if cell < filled { '#' } else { '.' });
    }
    let _ = line.push(']');
    line
}

/// Which way a channel has to go to reach its target
fn direction(target: u8, current: u8) -> char {
    if target.abs_diff(current) <= LED_DEADBAND {
        '='
    } else if current < target {
        '+'
    } else {
        '-'
    }
}

fn comparison(s: &mut Screen, target: RGB8, current: RGB8) {
    push_line!(s, "  Target  You");
    for (label, t, c) in [
        ("R", target.r, current.r),
        ("G", target.g, current.g),
        ("B", target.b, current.b),
    ] {
        let mut line = Line::new();
        let _ = uwrite!(line, "{} {} / {} ", label, t, c);
        let _ = line.push(direction(t, c));
        let _ = s.push(line);
    }
}

fn result_card(s: &mut Screen, r: &RoundResult) {
    push_line!(s, "Round {}: {}%", r.round + 1, r.accuracy);
    let _ = s.push(bar(r.accuracy));
    if r.hints > 0 {
        push_line!(s, "Hints x{} -{}%", r.hints, r.penalty);
    }
    if r.passed {
        push_line!(s, "Points +{}", r.points);
    } else {
        push_line!(s, "Missed!");
    }
}

fn match_card(s: &mut Screen, totals: &MatchTotals, outcome: Outcome) {
    push_line!(s, "MATCH OVER");
    for player in 0..totals.players() {
        push_line!(s, "Player {}: {}", player + 1, totals.get(player));
    }
    match outcome {
        Outcome::Winner(player) => push_line!(s, "Player {} wins!", player + 1),
        Outcome::Tie => push_line!(s, "It's a tie!"),
    }
}
