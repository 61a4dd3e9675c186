//! Motion-gated operating loop
//!
//! The device idles dark until the presence sensor reports somebody near. On
//! wake-up it plays a greeting on the indicator LEDs and then measures and
//! displays distance continuously for a monitoring window, after which
//! presence is checked again. Without presence the indicators are held dark
//! and no ultrasonic pulses are fired.

use defmt::info;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs as DelayNsAsync;
use embedded_hal_async::digital::Wait;

use crate::filter::SampleFilter;
use crate::indicator::IndicatorBank;
use crate::rangefinder::Rangefinder;
use crate::zone::classify;
use crate::Clock;

/// Greeting flashes played when presence is first seen.
pub const GREETING_FLASHES: u8 = 3;
/// Default length of one monitoring session, in ms.
pub const MONITOR_WINDOW_MS: u64 = 60_000;

/// Reports how strongly the presence sensor is firing.
///
/// Any level above zero counts as present. The firmware samples a motion
/// sensor through the ADC; tests script the levels directly.
#[allow(async_fn_in_trait)]
pub trait PresenceSensor {
    async fn level(&mut self) -> u16;
}

/// Operating policy for the assistant.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Greeting flashes played on wake-up.
    pub greeting_flashes: u8,
    /// Length of the monitoring session that follows a greeting, in ms.
    /// `None` skips monitoring, so the device only ever greets.
    pub monitor_window_ms: Option<u64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            greeting_flashes: GREETING_FLASHES,
            monitor_window_ms: Some(MONITOR_WINDOW_MS),
        }
    }
}

/// The complete pipeline from presence sensor to indicator LEDs.
pub struct ParkingAssistant<TRIG, ECHO, MOTION, LED, CLOCK, DELAY> {
    rangefinder: Rangefinder<TRIG, ECHO, CLOCK, DELAY>,
    filter: SampleFilter<DELAY>,
    motion: MOTION,
    indicators: IndicatorBank<LED>,
    clock: CLOCK,
    delay: DELAY,
    config: GateConfig,
}

impl<TRIG, ECHO, MOTION, LED, CLOCK, DELAY>
    ParkingAssistant<TRIG, ECHO, MOTION, LED, CLOCK, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin + Wait,
    MOTION: PresenceSensor,
    LED: OutputPin,
    CLOCK: Clock,
    DELAY: DelayNs + DelayNsAsync,
{
    pub fn new(
        rangefinder: Rangefinder<TRIG, ECHO, CLOCK, DELAY>,
        filter: SampleFilter<DELAY>,
        motion: MOTION,
        indicators: IndicatorBank<LED>,
        clock: CLOCK,
        delay: DELAY,
        config: GateConfig,
    ) -> Self {
        Self {
            rangefinder,
            filter,
            motion,
            indicators,
            clock,
            delay,
            config,
        }
    }

    /// Runs one gate decision.
    ///
    /// With presence this greets and then monitors for the configured
    /// window, returning once the window has elapsed. Without presence it
    /// darkens the indicators and returns immediately, so the caller
    /// controls the idle polling pace.
    pub async fn poll(&mut self) {
        if self.motion.level().await > 0 {
            info!("presence detected, greeting");
            self.indicators
                .greeting(self.config.greeting_flashes, &mut self.delay)
                .await;
            if let Some(window_ms) = self.config.monitor_window_ms {
                self.monitor(window_ms).await;
            }
        } else {
            self.indicators.all_off();
        }
    }

    /// Measures, classifies and displays until the window runs out.
    ///
    /// The window is checked between passes, so a session always runs at
    /// least one full batch and never cuts one short. The last displayed
    /// zone stays lit when the session ends.
    async fn monitor(&mut self, window_ms: u64) {
        info!("monitoring for {}ms", window_ms);
        let started = self.clock.now_micros();
        while self.clock.now_micros() - started <= window_ms * 1_000 {
            let distance = self.filter.filtered_distance(&mut self.rangefinder).await;
            let zone = classify(distance);
            info!("obstacle at {}cm, {}", distance, zone);
            self.indicators.show(zone);
        }
        info!("monitoring window over");
    }
}
