use esp_hal::{
    Async,
    analog::adc::{Adc, AdcPin},
    peripherals::{ADC1, GPIO0, GPIO1, GPIO4},
};

/// The three mixing potentiometers on ADC1, read as raw 12-bit samples
pub struct Pots {
    adc: Adc<'static, ADC1<'static>, Async>,
    red: AdcPin<GPIO0<'static>, ADC1<'static>>,
    green: AdcPin<GPIO1<'static>, ADC1<'static>>,
    blue: AdcPin<GPIO4<'static>, ADC1<'static>>,
}

impl Pots {
    /// # Parameters
    /// * `adc` - ADC1 in async mode, with all three pins enabled at 11dB attenuation
    pub fn new(
        adc: Adc<'static, ADC1<'static>, Async>,
        red: AdcPin<GPIO0<'static>, ADC1<'static>>,
        green: AdcPin<GPIO1<'static>, ADC1<'static>>,
        blue: AdcPin<GPIO4<'static>, ADC1<'static>>,
    ) -> Self {
        Self {
            adc,
            red,
            green,
            blue,
        }
    }

    /// Sample all three pots, ordered red, green, blue
    pub async fn read(&mut self) -> [u16; 3] {
        let r = self.adc.read_oneshot(&mut self.red).await;
        let g = self.adc.read_oneshot(&mut self.green).await;
        let b = self.adc.read_oneshot(&mut self.blue).await;
        [r, g, b]
    }
}
