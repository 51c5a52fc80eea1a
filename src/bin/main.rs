#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use defmt::info;
use embassy_executor::Spawner;
use embassy_sync::channel::Channel;
use embassy_time::Duration;
use esp_hal::{
    Config,
    analog::adc::{Adc, AdcConfig, Attenuation},
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    ledc::{
        LSGlobalClkSource, Ledc, LowSpeed,
        channel::{self, ChannelIFace},
        timer::{self, TimerIFace},
    },
    rmt::Rmt,
    time::Rate,
    timer::systimer::SystemTimer,
};
use panic_rtt_target as _;
use spectral_mixer::{
    DEBOUNCE_MS,
    drivers::{DebouncedButton, Mixer, neopixel::LedDriver, pots::Pots},
    tasks::{Controls, DisplayChannel, display_task, game_task},
};
use static_cell::StaticCell;

/// Game events flow from the game task to the display task over this channel
static DISPLAY_CHANNEL: StaticCell<DisplayChannel> = StaticCell::new();

/// Our LED driver that underlies the display task
static LED_DRIVER: StaticCell<LedDriver> = StaticCell::new();

/// The dimmer channels borrow the LEDC peripheral and its timer for the life of the program
static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
static DIMMER_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    rtt_target::rtt_init_defmt!();

    let peripherals = esp_hal::init(Config::default().with_cpu_clock(CpuClock::max()));
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let display_channel: &'static DisplayChannel = DISPLAY_CHANNEL.init(Channel::new());

    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80))
        .expect("Failed to initialise RMT0")
        .into_async();
    let led_driver = LED_DRIVER.init(LedDriver::new(rmt, peripherals.GPIO2));
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .expect("Failed to initialise I2C0")
        .with_scl(peripherals.GPIO6)
        .with_sda(peripherals.GPIO5)
        .into_async();
    // Start the display manager task
    spawner
        .spawn(display_task(display_channel.receiver(), led_driver, i2c))
        .expect("Failed to spawn display task");

    // Dimmer LEDs, 8 bit PWM at 1kHz
    let ledc = LEDC.init(Ledc::new(peripherals.LEDC));
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
    let dimmer_timer = DIMMER_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    dimmer_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(1),
        })
        .expect("Failed to configure dimmer timer");
    let dimmer_timer: &'static timer::Timer<'static, LowSpeed> = dimmer_timer;
    let mut red = ledc.channel(channel::Number::Channel0, peripherals.GPIO7);
    let mut green = ledc.channel(channel::Number::Channel1, peripherals.GPIO8);
    let mut blue = ledc.channel(channel::Number::Channel2, peripherals.GPIO21);
    for dimmer in [&mut red, &mut green, &mut blue] {
        dimmer
            .configure(channel::config::Config {
                timer: dimmer_timer,
                duty_pct: 0,
                pin_config: channel::config::PinConfig::PushPull,
            })
            .expect("Failed to configure dimmer channel");
    }
    let mixer = Mixer::new(red, green, blue);

    // Pots on ADC1, full range needs 11dB attenuation
    let mut adc_config = AdcConfig::new();
    let pot_red = adc_config.enable_pin(peripherals.GPIO0, Attenuation::_11dB);
    let pot_green = adc_config.enable_pin(peripherals.GPIO1, Attenuation::_11dB);
    let pot_blue = adc_config.enable_pin(peripherals.GPIO4, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config).into_async();
    let pots = Pots::new(adc, pot_red, pot_green, pot_blue);

    // Set up buttons for the functions we need
    let config = InputConfig::default().with_pull(Pull::Up);
    let debounce = Duration::from_millis(DEBOUNCE_MS);
    let controls = Controls {
        restart: DebouncedButton::new(Input::new(peripherals.GPIO9, config), debounce),
        lock: DebouncedButton::new(Input::new(peripherals.GPIO10, config), debounce),
        hint: DebouncedButton::new(Input::new(peripherals.GPIO3, config), debounce),
    };

    info!("MAIN: Starting game");
    spawner
        .spawn(game_task(controls, pots, mixer, display_channel.sender()))
        .expect("Failed to spawn game task");
}
