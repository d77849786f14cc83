/// ESP-IDF side of the blink firmware.
///
/// Glue between the hardware-independent logic in `blink_core` and the
/// ESP-IDF drivers.
///
/// # Modules
/// * `http` - HTTP server and client.
/// * `light` - RMT and SPI transports for addressable LEDs.
/// * `ota` - Over-the-air firmware update.
/// * `thread` - Fail-fast supervision of the main task.
/// * `wifi` - Wi-Fi station bring-up and reconnection.
pub mod http;
pub mod light;
pub mod ota;
pub mod thread;
pub mod wifi;
