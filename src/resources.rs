//! Hardware resource map
//!
//! Allocates the RP2350 pins and peripherals to the parking assist task.
//! All sensor and indicator wiring lives here so a board revision only ever
//! touches this file.

use assign_resources::assign_resources;
use embassy_rp::adc::InterruptHandler as AdcInterruptHandler;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals;

assign_resources! {
    /// Ultrasonic rangefinder, motion sensor and indicator LED pins
    park_assist: ParkAssistResources {
        trigger_pin: PIN_19,
        echo_pin: PIN_18,
        motion_pin: PIN_26,
        red_pin: PIN_8,
        yellow_pin: PIN_9,
        green_pin: PIN_10,
        adc: ADC,
    },
}

bind_interrupts!(pub struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});
