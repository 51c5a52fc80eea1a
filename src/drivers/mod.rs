pub mod button;
pub mod mixer;
#[cfg(feature = "esp32c3")]
pub mod neopixel;
#[cfg(feature = "esp32c3")]
pub mod pots;

pub use button::DebouncedButton;
pub use mixer::{AnalogChannel, Channel, Mixer, normalize};
