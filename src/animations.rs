//! LED patterns played by the display task.
//!
//! A solid colour follows the player's mix or shows the target, a sparkle celebrates a
//! matched round or the end of a match.

use crate::LED_STRING_SIZE;
use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

/// One frame for the whole LED string
pub type LedBuffer = [RGB8; LED_STRING_SIZE];

/// Represents different types of animations that can be displayed on the LED
#[derive(Debug, Clone)]
pub enum Animation {
    /// A steady colour, replaced as soon as anything else is queued
    Solid(RGB8),
    /// Animation that creates a sparkling effect with random brightness variations
    Sparkle(SparkleAnimation),
}

/// Checks if the given animation can be interrupted
pub fn is_interruptable(anim: &Animation) -> bool {
    match anim {
        Animation::Solid(_) => true,
        Animation::Sparkle(s) => s.is_interruptable(),
    }
}

/// Helper function to get the new buffer regardless of animation. This is because we cannot use
/// [dyn traits](https://doc.rust-lang.org/rust-by-example/trait/dyn.html) in a `no_std` without
/// setting up a heap.
///
/// # Arguments
/// * `anim` - A mutable reference to the Animation enum that will generate the next buffer state
/// # Returns
/// The next frame, or None once the animation has run its course
pub fn next_buffer(anim: &mut Animation) -> Option<LedBuffer> {
    match anim {
        Animation::Solid(colour) => Some([*colour; LED_STRING_SIZE]),
        Animation::Sparkle(s) => s.next(),
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Animation {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Animation::Solid(c) => defmt::write!(fmt, "Solid({},{},{})", c.r, c.g, c.b),
            Animation::Sparkle(_) => defmt::write!(fmt, "Sparkle"),
        }
    }
}

pub trait Interruptable {
    /// If this is true then the animation is interruptable before its iterator returns None.
    /// A celebration sparkle must not be cut short by the next mix update, those wait in the
    /// queue until it is done.
    fn is_interruptable(&self) -> bool;
}

/// Takes one colour and generates a random brightness up to the maximum brightness
/// specified. It will continue to return `Some(buffer)` until the expiry time is reached
/// if one was specified
#[derive(Debug, Clone)]
pub struct SparkleAnimation {
    /// The colour to sparkle
    colour: RGB8,
    /// The system time at which the animation should expire. If it is None, the animation
    /// will run but will mark itself as interruptable.
    expires: Option<Instant>,
    /// Random number generator for the sparkle effect
    rng: fastrand::Rng,
}

impl Iterator for SparkleAnimation {
    type Item = LedBuffer;

    fn next(&mut self) -> Option<Self::Item> {
        let done = match self.expires {
            Some(exp) => Instant::now() >= exp,
            None => false,
        };
        if done {
            return None;
        }
        let mut buffer = LedBuffer::default();
        for led in buffer.iter_mut() {
            let b = self.rng.u8(0..255);
            *led = set_brightness(b, self.colour);
        }
        Some(buffer)
    }
}

impl Interruptable for SparkleAnimation {
    fn is_interruptable(&self) -> bool {
        self.expires.is_none()
    }
}

impl SparkleAnimation {
    /// Creates a new SparkleAnimation that flickers the brightness of a base colour
    ///
    /// # Arguments
    /// * `colour` - The base RGB colour to be used for the sparkle effect
    /// * `ttl` - How long the animation should run. None implies indefinitely
    pub fn new(colour: RGB8, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            colour,
            expires: ttl.map(|t| now + t),
            rng: fastrand::Rng::with_seed(now.as_ticks()),
        }
    }
}

/// Scales every channel of `pixel` by `brightness / 255`
pub fn set_brightness(brightness: u8, pixel: RGB8) -> RGB8 {
    if brightness == 0 {
        return RGB8::default();
    }
    if brightness == 255 {
        return pixel;
    }
    // Use u16 for the multiplication to avoid overflow before the division.
    let r = ((pixel.r as u16 * brightness as u16) / 255) as u8;
    let g = ((pixel.g as u16 * brightness as u16) / 255) as u8;
    let b = ((pixel.b as u16 * brightness as u16) / 255) as u8;

    RGB8::new(r, g, b)
}
