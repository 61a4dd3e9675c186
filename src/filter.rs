//! Trimmed-mean distance filtering
//!
//! A single ultrasonic reading is noisy: stray reflections produce spikes and
//! missed echoes produce dropouts. Each displayed distance is therefore the
//! mean of the middle ten out of a burst of twenty raw samples, which ignores
//! up to five outliers on either end.
//!
//! Failed measurements are folded into the batch as 0.0cm samples rather
//! than aborting it. A handful of dropouts lands in the trimmed low end and
//! vanishes; only when more than five samples fail do zeros reach the mean
//! and drag the result toward the near zone, which errs on the cautious side.

use defmt::{debug, warn};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs as DelayNsAsync;
use embedded_hal_async::digital::Wait;

use crate::rangefinder::Rangefinder;
use crate::Clock;

/// Raw samples per filtered reading.
pub const BATCH_SIZE: usize = 20;
/// Samples discarded from each end of the sorted batch.
pub const TRIMMED_EACH_END: usize = 5;
/// Pause between consecutive raw samples, in ms. Keeps one measurement's
/// late reflections from being picked up by the next.
pub const SAMPLE_SPACING_MS: u32 = 30;

/// Sorts a batch and averages its middle ten samples.
pub fn trimmed_mean(mut samples: [f64; BATCH_SIZE]) -> f64 {
    samples.sort_unstable_by(f64::total_cmp);
    let kept = &samples[TRIMMED_EACH_END..BATCH_SIZE - TRIMMED_EACH_END];
    kept.iter().sum::<f64>() / kept.len() as f64
}

/// Acquires sample batches and condenses them into filtered readings.
pub struct SampleFilter<DELAY> {
    delay: DELAY,
}

impl<DELAY> SampleFilter<DELAY>
where
    DELAY: DelayNs + DelayNsAsync,
{
    pub fn new(delay: DELAY) -> Self {
        Self { delay }
    }

    /// Collects one batch from the rangefinder and returns its trimmed mean.
    ///
    /// Takes around 600ms: twenty samples at 30ms spacing, longer when
    /// measurements run into the echo timeout.
    pub async fn filtered_distance<TRIG, ECHO, CLOCK>(
        &mut self,
        rangefinder: &mut Rangefinder<TRIG, ECHO, CLOCK, DELAY>,
    ) -> f64
    where
        TRIG: OutputPin,
        ECHO: InputPin + Wait,
        CLOCK: Clock,
    {
        let mut samples = [0.0; BATCH_SIZE];
        for slot in samples.iter_mut() {
            match rangefinder.measure_cm().await {
                Ok(distance) => *slot = distance,
                Err(e) => debug!("measurement failed ({}), keeping empty sample", e),
            }
            DelayNsAsync::delay_ms(&mut self.delay, SAMPLE_SPACING_MS).await;
        }

        let empty = samples.iter().filter(|s| **s == 0.0).count();
        if empty > TRIMMED_EACH_END {
            warn!(
                "{} of {} samples empty, filtered distance will read low",
                empty, BATCH_SIZE
            );
        }

        trimmed_mean(samples)
    }
}
