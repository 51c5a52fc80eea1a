use crate::animations::{Animation, SparkleAnimation, is_interruptable, next_buffer};
use crate::{
    ANIMATION_UPDATE, DEFAULT_COLOUR, MAX_PENDING_ANIMATIONS, RgbBrightness,
    animations::LedBuffer,
    colour::OFF,
    drivers::neopixel::LedDriver,
    events::{GameEvent, StatusSink},
    render::{self, Screen},
};
use embassy_futures::select::{Either, select};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Duration, Ticker};
use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::Point,
    text::{Baseline, Text},
};
use esp_hal::{Async, i2c::master::I2c};
use heapless::Deque;
use smart_leds::RGB8;
use ssd1306::{
    I2CDisplayInterface, Ssd1306Async,
    mode::{BufferedGraphicsModeAsync, DisplayConfigAsync},
    prelude::{DisplayRotation, I2CInterface},
    size::DisplaySize128x64,
};

const DISPLAY_QUEUE_SIZE: usize = 16;
/// Channel types for the display task.
pub type DisplayChannel = Channel<CriticalSectionRawMutex, GameEvent, DISPLAY_QUEUE_SIZE>;
pub type DisplayChannelSender =
    Sender<'static, CriticalSectionRawMutex, GameEvent, DISPLAY_QUEUE_SIZE>;
pub type DisplayChannelReceiver =
    Receiver<'static, CriticalSectionRawMutex, GameEvent, DISPLAY_QUEUE_SIZE>;

type Oled = Ssd1306Async<
    I2CInterface<I2c<'static, Async>>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Height of one text row in pixels
const LINE_HEIGHT: i32 = 10;
/// The clock goes in the last row when the screen leaves it free
const FOOTER_ROW: usize = render::MAX_LINES - 1;

/// How long a matched round sparkles for
const ROUND_CELEBRATION: Duration = Duration::from_secs(2);
/// How long the match result sparkles for
const MATCH_CELEBRATION: Duration = Duration::from_secs(5);

/// The game loop never waits on the display, a full channel drops the event
impl StatusSink for DisplayChannelSender {
    fn report(&mut self, event: GameEvent) {
        if self.try_send(event).is_err() {
            warn!("DISPLAY: Channel full, dropping event");
        }
    }
}

/// The LED animation for an event, if it changes what the LED shows
fn animation_for(event: &GameEvent) -> Option<Animation> {
    match event {
        GameEvent::Restarted | GameEvent::TargetHidden => Some(Animation::Solid(OFF)),
        GameEvent::Presenting { target, .. } => Some(Animation::Solid(*target)),
        GameEvent::Mix(colour) => Some(Animation::Solid(*colour)),
        GameEvent::Result(result) if result.passed => Some(Animation::Sparkle(
            SparkleAnimation::new(result.target, Some(ROUND_CELEBRATION)),
        )),
        GameEvent::MatchComplete { .. } => Some(Animation::Sparkle(SparkleAnimation::new(
            RGB8::from(DEFAULT_COLOUR),
            Some(MATCH_CELEBRATION),
        ))),
        _ => None,
    }
}

/// Queue an animation. A steady colour only matters until the next one arrives, so it replaces
/// a steady colour still waiting at the back of the queue.
fn enqueue(queue: &mut Deque<Animation, MAX_PENDING_ANIMATIONS>, animation: Animation) {
    if let (Animation::Solid(colour), Some(Animation::Solid(pending))) =
        (&animation, queue.back_mut())
    {
        *pending = *colour;
        return;
    }
    if queue.push_back(animation).is_err() {
        warn!("DISPLAY_TASK: Animation queue full");
    }
}

async fn draw(
    display: &mut Oled,
    style: MonoTextStyle<'_, BinaryColor>,
    screen: &Screen,
    clock: Option<u32>,
) {
    display.clear_buffer();
    for (row, line) in screen.iter().enumerate() {
        let origin = Point::new(0, row as i32 * LINE_HEIGHT);
        let _ = Text::with_baseline(line.as_str(), origin, style, Baseline::Top).draw(display);
    }
    if let Some(seconds) = clock
        && screen.len() <= FOOTER_ROW
    {
        let clock = render::clock(seconds);
        let origin = Point::new(0, FOOTER_ROW as i32 * LINE_HEIGHT);
        let _ = Text::with_baseline(clock.as_str(), origin, style, Baseline::Top).draw(display);
    }
    if display.flush().await.is_err() {
        warn!("DISPLAY_TASK: Failed to flush display");
    }
}

/// Display driver main task.
/// The screen and the LED are fully managed from this task. Game events arrive over the channel,
/// text screens are drawn as they come and LED animations are stepped on a ticker.
///
/// # Parameters
/// * `channel` - Channel receiver for game events
/// * `led` - LED driver instance for controlling the RGB LED
/// * `i2c` - The bus the SSD1306 sits on
#[embassy_executor::task]
pub async fn display_task(
    channel: DisplayChannelReceiver,
    led: &'static mut LedDriver,
    i2c: I2c<'static, Async>,
) {
    let mut animation = Ticker::every(Duration::from_millis(ANIMATION_UPDATE));
    let mut animation_queue: Deque<Animation, MAX_PENDING_ANIMATIONS> = Deque::new();
    let mut current_animation = Animation::Sparkle(SparkleAnimation::new(
        RGB8::from(DEFAULT_COLOUR),
        Some(Duration::from_secs(2)),
    ));
    let brightness = RgbBrightness::Medium as u8;

    let interface = I2CDisplayInterface::new(i2c);
    let mut display: Oled =
        Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
    let mut display_ok = display.init().await.is_ok();
    if !display_ok {
        // The LED still works without a screen
        error!("DISPLAY_TASK: Display couldn't be initialised");
    }
    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build();

    let mut screen = Screen::new();
    let mut clock: Option<u32> = None;

    info!("DISPLAY_TASK: Task started. Waiting for events...");
    loop {
        match select(animation.next(), channel.receive()).await {
            // Animation update timer
            Either::First(_) => {
                // Peek into the queue because an uninterruptible animation must leave the next
                // one waiting until it terminates.
                let mut new_buf: Option<LedBuffer> = match (
                    next_buffer(&mut current_animation),
                    animation_queue.front(),
                    is_interruptable(&current_animation),
                ) {
                    // A new animation and the current one is interruptable, set up the new one.
                    (_, Some(_), true) | (None, Some(_), _) => {
                        match animation_queue.pop_front() {
                            Some(next) => {
                                debug!(
                                    "DISPLAY_TASK: Animation {} replaced by {}",
                                    current_animation, next
                                );
                                current_animation = next;
                            }
                            None => current_animation = Animation::Solid(OFF),
                        }
                        next_buffer(&mut current_animation)
                    }
                    // Just one animation running, or an uninterruptible one holding the LED
                    (Some(buf), _, _) => Some(buf),
                    // Current animation terminates, nothing queued so switch off
                    (None, None, _) => {
                        debug!("DISPLAY_TASK: Animation finished, LED off");
                        current_animation = Animation::Solid(OFF);
                        led.all_off().await;
                        None
                    }
                };
                if let Some(ref mut b) = new_buf {
                    led.update_from_buffer(b, brightness).await;
                }
            }
            // Game event from the control loop
            Either::Second(event) => {
                debug!("DISPLAY_TASK: {}", event);
                if let Some(anim) = animation_for(&event) {
                    enqueue(&mut animation_queue, anim);
                }
                let redraw = match &event {
                    GameEvent::TimeRemaining { seconds } => {
                        clock = Some(*seconds);
                        true
                    }
                    GameEvent::GameStarted { time_limit_s, .. } => {
                        clock = *time_limit_s;
                        false
                    }
                    GameEvent::Restarted | GameEvent::SeriesComplete { .. } => {
                        clock = None;
                        false
                    }
                    _ => false,
                };
                if let Some(next) = render::screen(&event) {
                    screen = next;
                } else if !redraw {
                    continue;
                }
                if display_ok {
                    draw(&mut display, text_style, &screen, clock).await;
                } else {
                    display_ok = display.init().await.is_ok();
                }
            }
        };
    }
}
