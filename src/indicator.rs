//! Three-LED proximity indicator
//!
//! Red, yellow and green LEDs display the current proximity zone, one lit at
//! a time. All three flash together as a greeting when the device wakes up.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::zone::ProximityZone;

/// How long the LEDs hold each on and off phase of a greeting flash, in ms.
pub const GREETING_HALF_PERIOD_MS: u32 = 500;

/// The red, yellow and green indicator LEDs driven as one unit.
pub struct IndicatorBank<LED> {
    red: LED,
    yellow: LED,
    green: LED,
}

impl<LED: OutputPin> IndicatorBank<LED> {
    pub fn new(red: LED, yellow: LED, green: LED) -> Self {
        Self { red, yellow, green }
    }

    /// Lights exactly the LED matching the zone.
    pub fn show(&mut self, zone: ProximityZone) {
        let _ = self.red.set_state((zone == ProximityZone::Near).into());
        let _ = self.yellow.set_state((zone == ProximityZone::Medium).into());
        let _ = self.green.set_state((zone == ProximityZone::Far).into());
    }

    pub fn all_on(&mut self) {
        let _ = self.red.set_high();
        let _ = self.yellow.set_high();
        let _ = self.green.set_high();
    }

    pub fn all_off(&mut self) {
        let _ = self.red.set_low();
        let _ = self.yellow.set_low();
        let _ = self.green.set_low();
    }

    /// Flashes all three LEDs together, leaving them dark afterwards.
    pub async fn greeting<DELAY: DelayNs>(&mut self, flashes: u8, delay: &mut DELAY) {
        for _ in 0..flashes {
            self.all_on();
            delay.delay_ms(GREETING_HALF_PERIOD_MS).await;
            self.all_off();
            delay.delay_ms(GREETING_HALF_PERIOD_MS).await;
        }
    }
}
