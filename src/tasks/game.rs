use embassy_time::{Duration, Instant, Ticker};
use esp_hal::{
    gpio::Input,
    ledc::{LowSpeed, channel::Channel},
};
use smart_leds::RGB8;

use crate::{
    POLL_INTERVAL,
    config::MatchConfig,
    drivers::{DebouncedButton, Mixer, pots::Pots},
    match_play::MatchEngine,
    round::TickInput,
    tasks::display::DisplayChannelSender,
};

/// The three dimmer LEDs on LEDC low speed channels
pub type Dimmers = Mixer<Channel<'static, LowSpeed>>;

/// The three player buttons, all active low
pub struct Controls {
    /// LEFT
    pub restart: DebouncedButton<Input<'static>>,
    /// MIDDLE
    pub lock: DebouncedButton<Input<'static>>,
    /// RIGHT, also continue
    pub hint: DebouncedButton<Input<'static>>,
}

impl Controls {
    /// Sample every button and the current mix into one tick
    pub fn sample(&mut self, now: Instant, mix: RGB8) -> TickInput {
        TickInput {
            now,
            mix,
            hint: self.hint.was_pressed(now),
            hint_held: self.hint.is_held(),
            lock: self.lock.was_pressed(now),
            restart: self.restart.was_pressed(now),
        }
    }
}

/// The control loop. Owns all game state and steps it once per poll interval, so every button
/// is seen within one interval whatever the game is doing.
///
/// # Parameters
/// * `controls` - The player buttons
/// * `pots` - The mixing potentiometers
/// * `mixer` - Dimmers that follow the pots
/// * `sender` - Where game events go, usually the display task
#[embassy_executor::task]
pub async fn game_task(
    mut controls: Controls,
    mut pots: Pots,
    mut mixer: Dimmers,
    mut sender: DisplayChannelSender,
) {
    let seed = Instant::now().as_ticks();
    let mut game = match MatchEngine::new(MatchConfig::ARCADE, seed) {
        Ok(game) => game,
        Err(e) => {
            error!("GAME_TASK: Invalid match configuration: {}", e);
            return;
        }
    };
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL));

    info!("GAME_TASK: Task started");
    loop {
        let raw = pots.read().await;
        let mix = mixer.update(raw);
        let input = controls.sample(Instant::now(), mix);
        game.step(&input, &mut sender);
        ticker.next().await;
    }
}
