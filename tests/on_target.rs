//! Runs on the ESP32-C3 with the runner from `.cargo/config.toml`: `cargo target-test`
#![no_std]
#![no_main]

use panic_rtt_target as _;

#[cfg(test)]
#[embedded_test::tests(executor = esp_hal_embassy::Executor::new())]
mod tests {
    use defmt::assert_eq;
    use embassy_time::{Duration, Instant, Timer};
    use esp_hal::timer::systimer::SystemTimer;
    use spectral_mixer::{
        GameConfig, GameEvent, RGB8, RoundEngine, Step, TickInput, drivers::normalize, score,
    };

    #[init]
    fn init() {
        rtt_target::rtt_init_defmt!();
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timer0 = SystemTimer::new(peripherals.SYSTIMER);
        esp_hal_embassy::init(timer0.alarm0);
    }

    #[test]
    fn scores_match_on_soft_float() {
        assert_eq!(score(RGB8::new(200, 100, 50), RGB8::new(190, 110, 60)), 96);
        assert_eq!(score(RGB8::new(255, 0, 0), RGB8::new(0, 0, 255)), 18);
        assert_eq!(score(RGB8::new(0, 0, 0), RGB8::new(255, 255, 255)), 0);
    }

    #[test]
    fn raw_samples_normalise() {
        assert_eq!(normalize(4095), 255);
        assert_eq!(normalize(2048), 127);
        assert_eq!(normalize(200), 200);
    }

    #[test]
    async fn series_runs_against_the_real_clock() {
        let mut events: heapless::Vec<GameEvent, 32> = heapless::Vec::new();
        let config = GameConfig {
            rounds: 1,
            ..GameConfig::CLASSIC
        };
        let mut engine = RoundEngine::new(config, 0, Instant::now().as_ticks());
        let mix = RGB8::new(10, 20, 30);

        engine.step(&TickInput::idle(Instant::now(), mix), &mut events);
        Timer::after(Duration::from_millis(50)).await;
        let lock = TickInput {
            lock: true,
            ..TickInput::idle(Instant::now(), mix)
        };
        engine.step(&lock, &mut events);
        let cont = TickInput {
            hint: true,
            ..TickInput::idle(Instant::now(), mix)
        };
        engine.step(&cont, &mut events);
        assert!(engine.is_finished());

        let total = engine.session().total();
        assert_eq!(engine.step(&cont, &mut events), Step::Finished(total));
    }
}
