use embedded_hal::pwm::SetDutyCycle;
use smart_leds::RGB8;

use crate::maths::scale;

/// Full scale of the 12-bit potentiometer inputs
pub const ADC_MAX: u16 = 4095;

/// Full scale of a colour channel
pub const CHANNEL_MAX: u8 = 255;

/// Bring a reading into the 0–255 colour channel domain.
///
/// Values that already fit are taken as pre-scaled and pass through untouched, anything
/// larger is treated as a raw 12-bit sample and rescaled.
pub fn normalize(value: u16) -> u8 {
    if value <= CHANNEL_MAX as u16 {
        return value as u8;
    }
    let value = value.min(ADC_MAX);
    (value as f64 / ADC_MAX as f64 * CHANNEL_MAX as f64) as u8
}

/// The three colour channels, used to index the mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// One potentiometer driving one dimmer LED
pub struct AnalogChannel<P> {
    pwm: P,
    raw_max: u16,
    duty: u16,
    level: u8,
}

impl<P: SetDutyCycle> AnalogChannel<P> {
    /// # Parameters
    /// * `pwm` - The dimmer output. Its maximum duty sets the output resolution
    /// * `raw_max` - Full scale of the samples that will be passed to [`Self::update`]
    pub fn new(pwm: P, raw_max: u16) -> Self {
        Self {
            pwm,
            raw_max,
            duty: 0,
            level: 0,
        }
    }

    /// Map a raw sample onto the dimmer duty range, drive the dimmer and return the duty.
    pub fn update(&mut self, raw: u16) -> u16 {
        let duty_max = self.pwm.max_duty_cycle();
        let duty = scale(raw as u32, self.raw_max as u32, duty_max as u32) as u16;
        if self.pwm.set_duty_cycle(duty).is_err() {
            warn!("MIXER: Failed to set dimmer duty {}", duty);
        }
        self.duty = duty;
        self.level = scale(raw as u32, self.raw_max as u32, CHANNEL_MAX as u32) as u8;
        duty
    }

    /// The duty written by the last update
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// The last sample as an 8-bit colour channel, independent of the dimmer resolution
    pub fn level(&self) -> u8 {
        self.level
    }
}

/// Exactly three analog channels, red, green and blue
pub struct Mixer<P> {
    channels: [AnalogChannel<P>; 3],
}

impl<P: SetDutyCycle> Mixer<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        Self {
            channels: [
                AnalogChannel::new(red, ADC_MAX),
                AnalogChannel::new(green, ADC_MAX),
                AnalogChannel::new(blue, ADC_MAX),
            ],
        }
    }

    /// Drive all three dimmers from raw 12-bit samples (ordered red, green, blue) and return
    /// the mixed colour in the 0–255 domain
    pub fn update(&mut self, raw: [u16; 3]) -> RGB8 {
        let mut mix = [0u8; 3];
        for ch in Channel::ALL {
            let i = ch as usize;
            self.channels[i].update(raw[i]);
            mix[i] = normalize(self.channels[i].level() as u16);
        }
        RGB8::new(mix[0], mix[1], mix[2])
    }

    pub fn channel(&self, ch: Channel) -> &AnalogChannel<P> {
        &self.channels[ch as usize]
    }
}
