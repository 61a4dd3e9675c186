//! HC-SR04 ultrasonic rangefinder driver
//!
//! Fires a 10µs trigger pulse and times the resulting echo pulse. The sensor
//! encodes round-trip flight time as the echo pulse width, so the obstacle
//! distance is the width in µs scaled by half the speed of sound.
//!
//! The driver is generic over pin, delay and clock so it runs against real
//! GPIOs on the target and against scripted mocks in host tests.

use defmt::Format;
use embassy_futures::select::{select, Either};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs as DelayNsAsync;
use embedded_hal_async::digital::Wait;

use crate::Clock;

/// Settle time holding the trigger low before the pulse, in µs.
const TRIGGER_SETTLE_US: u32 = 2;
/// Trigger pulse width the sensor requires to start a measurement, in µs.
const TRIGGER_PULSE_US: u32 = 10;
/// How long to wait for each echo edge before giving up, in ms.
const ECHO_TIMEOUT_MS: u32 = 1000;
/// Conversion from echo pulse width to obstacle distance, in cm per µs.
/// Half the speed of sound, since the pulse covers the distance twice.
pub const CM_PER_US: f64 = 0.017;

/// Reasons a single measurement can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum MeasureError {
    /// Echo line was already high before the trigger fired, so a pulse
    /// width could not be attributed to this measurement.
    EchoStuckHigh,
    /// An echo edge did not arrive within the one second timeout.
    EchoTimeout,
    /// A pin operation failed.
    Pin,
}

/// HC-SR04 attached to a trigger output and an echo input.
pub struct Rangefinder<TRIG, ECHO, CLOCK, DELAY> {
    trigger: TRIG,
    echo: ECHO,
    clock: CLOCK,
    delay: DELAY,
}

impl<TRIG, ECHO, CLOCK, DELAY> Rangefinder<TRIG, ECHO, CLOCK, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin + Wait,
    CLOCK: Clock,
    DELAY: DelayNs + DelayNsAsync,
{
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLOCK, delay: DELAY) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
        }
    }

    /// Runs one measurement and returns the obstacle distance in cm.
    ///
    /// Whatever the echo width works out to is returned as is, including
    /// zero; range limits are the caller's concern. The trigger pulse is
    /// driven with blocking delays since its 10µs width is far below timer
    /// resolution, the echo edges are awaited asynchronously.
    pub async fn measure_cm(&mut self) -> Result<f64, MeasureError> {
        if self.echo.is_high().map_err(|_| MeasureError::Pin)? {
            return Err(MeasureError::EchoStuckHigh);
        }

        self.trigger.set_low().map_err(|_| MeasureError::Pin)?;
        DelayNs::delay_us(&mut self.delay, TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(|_| MeasureError::Pin)?;
        DelayNs::delay_us(&mut self.delay, TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| MeasureError::Pin)?;

        let rising = select(
            self.echo.wait_for_high(),
            DelayNsAsync::delay_ms(&mut self.delay, ECHO_TIMEOUT_MS),
        )
        .await;
        let start = match rising {
            Either::First(Ok(())) => self.clock.now_micros(),
            Either::First(Err(_)) => return Err(MeasureError::Pin),
            Either::Second(()) => return Err(MeasureError::EchoTimeout),
        };

        let falling = select(
            self.echo.wait_for_low(),
            DelayNsAsync::delay_ms(&mut self.delay, ECHO_TIMEOUT_MS),
        )
        .await;
        let end = match falling {
            Either::First(Ok(())) => self.clock.now_micros(),
            Either::First(Err(_)) => return Err(MeasureError::Pin),
            Either::Second(()) => return Err(MeasureError::EchoTimeout),
        };

        Ok((end - start) as f64 * CM_PER_US)
    }
}
