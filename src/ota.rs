use anyhow::{ensure, Result};
use blink_core::ota::{validate, Progress};
use embedded_svc::io::Write;
use esp_idf_hal::reset::restart;
use esp_idf_svc::ota::EspOta;
use log::{info, warn};
use std::convert::Infallible;

use crate::http::Client;

/// Marks the running firmware as good so the bootloader does not roll back.
///
/// # Errors
/// Returns an error if the OTA partitions cannot be accessed.
pub fn confirm() -> Result<()> {
    let mut ota = EspOta::new()?;
    ota.mark_running_slot_valid()?;

    Ok(())
}

/// Downloads a firmware image into the next OTA slot and boots it.
///
/// # Arguments
/// * `client` - The HTTPS client to download with.
/// * `url` - Location of the firmware image.
///
/// # Returns
/// Never returns on success: the device restarts into the new image.
///
/// # Errors
/// Returns an error if the URL is invalid, the download fails or is empty, or
/// the image cannot be written. The partially written slot is discarded.
pub fn perform(client: &mut Client, url: &str) -> Result<Infallible> {
    validate(url)?;
    info!("Starting OTA update from {url}");

    let mut ota = EspOta::new()?;
    let mut update = ota.initiate_update()?;

    let mut progress: Option<Progress> = None;
    let mut reported = 0_u8;
    let downloaded = client
        .get(url, |chunk, total| {
            let progress = progress.get_or_insert_with(|| Progress::new(total));
            update.write_all(chunk)?;
            progress.advance(chunk.len());

            if let Some(pct) = progress.percent().filter(|pct| pct / 10 > reported / 10) {
                info!("OTA progress: {pct}%");
                reported = pct;
            }

            Ok(())
        })
        .and_then(|written| {
            ensure!(written > 0, "OTA download body is empty");
            Ok(written)
        });

    let written = match downloaded {
        Ok(written) => written,
        Err(e) => {
            if let Err(abort) = update.abort() {
                warn!("Failed to abort OTA update: {abort:?}");
            }
            return Err(e);
        }
    };

    update.complete()?;
    info!("OTA successful ({written} bytes), restarting...");

    restart();
}
