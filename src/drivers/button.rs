use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

/// Active-low push button polled from the control loop.
///
/// Only the previously sampled level is kept, so bounces faster than the poll period are never
/// seen. The debounce reference moves on every observed transition, so a falling edge counts as
/// a press only when the line has been quiet for longer than the debounce window.
pub struct DebouncedButton<P> {
    pin: P,
    debounce: Duration,
    was_low: bool,
    last_transition: Option<Instant>,
}

impl<P: InputPin> DebouncedButton<P> {
    /// Wrap an input pin (configured with a pull-up) with the given debounce window
    pub fn new(pin: P, debounce: Duration) -> Self {
        Self {
            pin,
            debounce,
            was_low: false,
            last_transition: None,
        }
    }

    /// Returns true exactly once for each qualifying press.
    ///
    /// # Parameters
    /// * `now` - The time of this poll, used to measure the quiet period before the edge
    pub fn was_pressed(&mut self, now: Instant) -> bool {
        let low = self.is_low();
        if low == self.was_low {
            return false;
        }
        let settled = match self.last_transition {
            Some(at) => now.saturating_duration_since(at) > self.debounce,
            None => true,
        };
        self.was_low = low;
        self.last_transition = Some(now);
        low && settled
    }

    /// True for as long as the button is held down. Not debounced and does not disturb the
    /// edge detection of [`Self::was_pressed`]
    pub fn is_held(&mut self) -> bool {
        self.is_low()
    }

    fn is_low(&mut self) -> bool {
        // A pin that cannot be read is treated as released
        self.pin.is_low().unwrap_or(false)
    }
}
