use anyhow::Result;
use esp_idf_hal::reset::restart;
use log::error;
use std::{convert::Infallible, thread, time::Duration};

/// Handles program failure by restarting the device.
///
/// This function waits for a second and then restarts the device if the program encounters an error.
pub fn failure() -> ! {
    // This program should run forever, until the device is powered off.
    // If something goes wrong and the program dies, we wait for a second and
    // then restart the device.
    thread::sleep(Duration::from_secs(1));
    restart();
}

/// Runs the main application logic with automatic error logging and device restart on exit.
///
/// Any error is logged with its full chain before the restart occurs. This
/// is the only error recovery the firmware has: every failed driver call
/// during start-up, and any failure of the blink loop, ends up here.
///
/// # Arguments
/// * `f` - A closure that only ever returns with an error.
///
/// # Returns
/// Never returns normally - either runs forever or restarts the device.
pub fn main<F>(f: F) -> !
where
    F: FnOnce() -> Result<Infallible>,
{
    let Err(e) = f();
    error!("Fatal error: {e:#}");

    failure()
}
