//! Scripted test doubles for the hardware seams
//!
//! All doubles share one virtual timeline: delays advance it, the clock
//! reads it, and the echo double spends it while playing back scripted pulse
//! widths. Futures here are either immediately ready or pending forever,
//! which makes `block_on` deterministic and instant.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use core::future::pending;
use core::sync::atomic::{AtomicU32, Ordering};
use std::collections::VecDeque;
use std::rc::Rc;

use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs as DelayNsAsync;
use embedded_hal_async::digital::Wait;

use crate::gate::PresenceSensor;
use crate::Clock;

static COUNT: AtomicU32 = AtomicU32::new(0);
defmt::timestamp!("{=u32:us}", COUNT.fetch_add(1, Ordering::Relaxed));

/// A pin transition: timestamp in µs and the level driven.
pub type PinEvent = (u64, bool);
/// An LED transition: LED name and whether it turned on.
pub type LedEvent = (&'static str, bool);

/// Shared virtual timeline in µs.
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn micros(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, micros: u64) {
        self.0.set(self.0.get() + micros);
    }
}

impl Clock for SimTime {
    fn now_micros(&self) -> u64 {
        self.micros()
    }
}

/// Delay provider that advances the timeline instead of sleeping.
#[derive(Clone)]
pub struct SimDelay {
    time: SimTime,
}

impl SimDelay {
    pub fn new(time: SimTime) -> Self {
        Self { time }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.time.advance(u64::from(ns).div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.time.advance(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.time.advance(u64::from(ms) * 1_000);
    }
}

impl DelayNsAsync for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        DelayNs::delay_ns(self, ns);
    }

    async fn delay_us(&mut self, us: u32) {
        DelayNs::delay_us(self, us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(self, ms);
    }
}

/// Trigger output that records every transition with its timestamp.
pub struct SimTrigger {
    time: SimTime,
    log: Rc<RefCell<Vec<PinEvent>>>,
}

impl SimTrigger {
    pub fn new(time: SimTime) -> Self {
        Self {
            time,
            log: Rc::default(),
        }
    }

    pub fn log(&self) -> Rc<RefCell<Vec<PinEvent>>> {
        self.log.clone()
    }
}

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.time.micros(), false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.time.micros(), true));
        Ok(())
    }
}

enum EchoStep {
    Pulse(u64),
    Silent,
    RiseOnly,
}

/// Echo input that plays back one scripted behavior per measurement.
///
/// An exhausted script behaves like a silent sensor: edge waits pend
/// forever and the measurement runs into its timeout.
pub struct SimEcho {
    time: SimTime,
    script: VecDeque<EchoStep>,
    active: Option<u64>,
    stuck_high: bool,
}

impl SimEcho {
    pub fn new(time: SimTime) -> Self {
        Self {
            time,
            script: VecDeque::new(),
            active: None,
            stuck_high: false,
        }
    }

    /// Queues an echo pulse of the given width in µs.
    pub fn pulse(mut self, width_us: u64) -> Self {
        self.script.push_back(EchoStep::Pulse(width_us));
        self
    }

    /// Queues `count` pulses of the same width.
    pub fn repeat_pulse(mut self, width_us: u64, count: usize) -> Self {
        for _ in 0..count {
            self.script.push_back(EchoStep::Pulse(width_us));
        }
        self
    }

    /// Queues a measurement that gets no echo at all.
    pub fn silent(mut self) -> Self {
        self.script.push_back(EchoStep::Silent);
        self
    }

    /// Queues an echo that rises but never falls.
    pub fn rise_only(mut self) -> Self {
        self.script.push_back(EchoStep::RiseOnly);
        self
    }

    /// Reports the line as already high before the trigger fires.
    pub fn stuck_high(mut self) -> Self {
        self.stuck_high = true;
        self
    }
}

impl ErrorType for SimEcho {
    type Error = Infallible;
}

impl InputPin for SimEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.stuck_high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.stuck_high)
    }
}

impl Wait for SimEcho {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        match self.script.pop_front() {
            Some(EchoStep::Pulse(width)) => {
                self.active = Some(width);
                Ok(())
            }
            Some(EchoStep::RiseOnly) => {
                self.active = None;
                Ok(())
            }
            Some(EchoStep::Silent) | None => pending().await,
        }
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        match self.active.take() {
            Some(width) => {
                self.time.advance(width);
                Ok(())
            }
            None => pending().await,
        }
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_low().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await
    }
}

/// Shared record of LED transitions across a whole indicator bank.
#[derive(Clone, Default)]
pub struct SimJournal(Rc<RefCell<Vec<LedEvent>>>);

impl SimJournal {
    /// Every transition in the order it was driven.
    pub fn events(&self) -> Vec<LedEvent> {
        self.0.borrow().clone()
    }

    /// Names of the LEDs currently on, in the order they were lit.
    pub fn lit(&self) -> Vec<&'static str> {
        let mut on = Vec::new();
        for (name, state) in self.0.borrow().iter().copied() {
            if state {
                if !on.contains(&name) {
                    on.push(name);
                }
            } else {
                on.retain(|&n| n != name);
            }
        }
        on
    }

    fn push(&self, event: LedEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// Indicator LED that reports its transitions to a journal.
pub struct SimLed {
    name: &'static str,
    journal: SimJournal,
}

impl SimLed {
    pub fn new(name: &'static str, journal: SimJournal) -> Self {
        Self { name, journal }
    }
}

impl ErrorType for SimLed {
    type Error = Infallible;
}

impl OutputPin for SimLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.journal.push((self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.journal.push((self.name, true));
        Ok(())
    }
}

/// Presence sensor fed from scripted levels. Reads as absent once the
/// script runs out.
pub struct SimMotion {
    levels: VecDeque<u16>,
}

impl SimMotion {
    pub fn new(levels: &[u16]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
        }
    }
}

impl PresenceSensor for SimMotion {
    async fn level(&mut self) -> u16 {
        self.levels.pop_front().unwrap_or(0)
    }
}
