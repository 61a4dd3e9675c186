//! Parking assist control task
//!
//! Owns every pin of the device and runs the motion-gated measurement loop:
//! wait for presence, greet, then measure and display proximity zones for
//! the monitoring window. Presence is polled at a fixed pace while idle.

use defmt::info;
use embassy_rp::adc::{Adc, Async, Channel, Config};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};

use crate::filter::SampleFilter;
use crate::gate::{GateConfig, ParkingAssistant, PresenceSensor};
use crate::indicator::IndicatorBank;
use crate::rangefinder::Rangefinder;
use crate::resources::{Irqs, ParkAssistResources};
use crate::Clock;

/// Pace of presence checks while the device idles.
const PRESENCE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Microsecond clock backed by the embassy time driver.
struct UptimeClock;

impl Clock for UptimeClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Motion sensor sampled through the ADC.
struct MotionInput {
    adc: Adc<'static, Async>,
    channel: Channel<'static>,
}

impl PresenceSensor for MotionInput {
    async fn level(&mut self) -> u16 {
        self.adc.read(&mut self.channel).await.unwrap_or(0)
    }
}

#[embassy_executor::task]
pub async fn park_assist(r: ParkAssistResources) {
    let rangefinder = Rangefinder::new(
        Output::new(r.trigger_pin, Level::Low),
        Input::new(r.echo_pin, Pull::None),
        UptimeClock,
        Delay,
    );
    let motion = MotionInput {
        adc: Adc::new(r.adc, Irqs, Config::default()),
        channel: Channel::new_pin(r.motion_pin, Pull::None),
    };
    let indicators = IndicatorBank::new(
        Output::new(r.red_pin, Level::Low),
        Output::new(r.yellow_pin, Level::Low),
        Output::new(r.green_pin, Level::Low),
    );
    let mut assistant = ParkingAssistant::new(
        rangefinder,
        SampleFilter::new(Delay),
        motion,
        indicators,
        UptimeClock,
        Delay,
        GateConfig::default(),
    );

    info!("parking assist task started");

    loop {
        assistant.poll().await;
        Timer::after(PRESENCE_POLL_INTERVAL).await;
    }
}
