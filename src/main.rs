//! Parking assistant firmware entry point
//!
//! Initializes the RP2350 and spawns the parking assist task.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use parking_assistant::resources::{AssignedResources, ParkAssistResources};
use parking_assistant::split_resources;
use parking_assistant::task::park_assist::park_assist;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);
    spawner.spawn(park_assist(r.park_assist)).unwrap();
}
