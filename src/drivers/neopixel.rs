use crate::{LED_STRING_SIZE, animations::LedBuffer};
use esp_hal::{
    Async,
    gpio::interconnect::PeripheralOutput,
    rmt::{ConstChannelAccess, Rmt, Tx},
};
use esp_hal_smartled::{SmartLedsAdapterAsync, buffer_size_async};
use smart_leds::SmartLedsWriteAsync;

/// We must know what the LED TX buffer size is as a constant for the types involved here
const LED_INTERNAL_BUF_LEN: usize = buffer_size_async(LED_STRING_SIZE);

/// Holds the state needed to drive the RGB indicator LED
pub struct LedDriver {
    /// Sized to exactly what `SmartLedsAdapterAsync::new()` hands back for our string length
    led: SmartLedsAdapterAsync<ConstChannelAccess<Tx, 0>, LED_INTERNAL_BUF_LEN>,
}

impl LedDriver {
    /// Create a new driver for the LED string.
    ///
    /// # Parameters
    /// * `rmt` - The RMT peripheral device to use for driving the LED
    /// * `pin` - The GPIO pin to which the LED data line is connected
    pub fn new<'a>(rmt: Rmt<Async>, pin: impl PeripheralOutput<'a>) -> Self {
        let channel = rmt.channel0;
        let buffer = [0_u32; buffer_size_async(LED_STRING_SIZE)];
        let led = SmartLedsAdapterAsync::new(channel, pin, buffer);
        Self { led }
    }
}

impl LedDriver {
    /// Write the buffer to the LED string, applying gamma correction and brightness.
    ///
    /// # Parameters
    /// * `led_buffer` - Buffer containing LED values to write to the string
    /// * `brightness` - Global brightness level from 0 (off) to 255 (max brightness)
    pub async fn update_from_buffer(&mut self, led_buffer: &mut LedBuffer, brightness: u8) {
        let source = *led_buffer;
        let adjust_iter =
            smart_leds::brightness(smart_leds::gamma(source.iter().cloned()), brightness);
        for (pix, corrected) in led_buffer.iter_mut().zip(adjust_iter) {
            *pix = corrected;
        }
        if self.led.write(*led_buffer).await.is_err() {
            warn!("LED: Failed to update LED driver");
        }
    }

    /// Switches all the LEDs off
    pub async fn all_off(&mut self) {
        self.update_from_buffer(&mut LedBuffer::default(), 0).await;
    }
}
