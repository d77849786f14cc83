/// Hardware-independent part of the blink firmware.
///
/// Everything here builds and tests on the host; the vendor drivers live in
/// the `esp-blink` crate and plug in through the `Output` and `Pixel` traits.
///
/// # Modules
/// * `color` - RGB color utilities.
/// * `infra` - Infrastructure traits and the LED state.
/// * `light` - LED outputs and the blink loop.
/// * `link` - Wi-Fi event policy.
/// * `ota` - Firmware update bookkeeping.
/// * `page` - The HTML status page.
/// * `ws2812` - Addressable LED wire format.
pub mod color;
pub mod infra;
pub mod light;
pub mod link;
pub mod ota;
pub mod page;
pub mod ws2812;
