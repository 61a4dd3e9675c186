//! # parking-assistant
//!
//! Control logic for a motion-gated parking distance indicator.
//!
//! A presence sensor arms the device, an HC-SR04 ultrasonic rangefinder
//! measures the distance to the nearest obstacle, and a trimmed-mean filter
//! condenses bursts of 20 raw samples into one stable reading. The reading is
//! classified into one of three proximity zones, each driving a dedicated
//! indicator LED.
//!
//! The pipeline is generic over [`embedded_hal`]/[`embedded_hal_async`] pin
//! and delay traits plus the [`Clock`] trait below, so everything up to the
//! pin level runs unchanged in host tests. The `rp2350` feature adds the
//! RP2350 pin map, the embassy task and the firmware entry point.
#![cfg_attr(not(test), no_std)]

pub mod filter;
pub mod gate;
pub mod indicator;
pub mod rangefinder;
pub mod zone;

#[cfg(feature = "rp2350")]
pub mod resources;
#[cfg(feature = "rp2350")]
pub mod task;

#[cfg(test)]
pub(crate) mod sim;

/// Monotonic microsecond clock.
///
/// Firmware backs this with the embassy time driver, host tests with a
/// virtual timeline that only advances through delays.
pub trait Clock {
    /// Microseconds elapsed since an arbitrary fixed point (typically boot).
    fn now_micros(&self) -> u64;
}
