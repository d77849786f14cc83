//! WS2812 ("`NeoPixel`") wire format.
//!
//! A pixel takes a 24-bit GRB word, most significant bit first. Each bit is a
//! high pulse followed by a low pulse whose lengths tell `0` from `1`. The RMT
//! peripheral is handed the pulse lengths directly; the SPI peripheral is made
//! to produce them by clocking three SPI bits per data bit.

use std::time::Duration;

use crate::color::Rgb;

/// Number of data bits per pixel.
pub const BITS_PER_PIXEL: u32 = 24;

/// High time of a `0` bit.
pub const T0H: Duration = Duration::from_nanos(350);
/// Low time of a `0` bit.
pub const T0L: Duration = Duration::from_nanos(800);
/// High time of a `1` bit.
pub const T1H: Duration = Duration::from_nanos(700);
/// Low time of a `1` bit.
pub const T1L: Duration = Duration::from_nanos(600);

/// SPI clock producing ~417 ns per SPI bit.
pub const SPI_BAUDRATE_HZ: u32 = 2_400_000;

const SPI_BITS_PER_BIT: usize = 3;
const SPI_ZERO: u8 = 0b100;
const SPI_ONE: u8 = 0b110;
const SPI_DATA_LEN: usize = BITS_PER_PIXEL as usize * SPI_BITS_PER_BIT / 8;
// Newer WS2812B parts latch after 280 us low; 91 bytes at 2.4 MHz is ~303 us.
// The odd length pads the frame to a multiple of 4, as the SPI DMA requires.
const SPI_RESET_LEN: usize = 91;

/// Length of the buffer produced by [`spi_frame`]. Also used as the SPI DMA
/// transfer size, which must be a multiple of 4.
pub const SPI_FRAME_LEN: usize = SPI_DATA_LEN + SPI_RESET_LEN;

/// Yields the data bits of a pixel, most significant first.
///
/// # Arguments
/// * `rgb` - The color to encode.
pub fn bits(rgb: &Rgb) -> impl Iterator<Item = bool> {
    let color: u32 = rgb.into();
    (0..BITS_PER_PIXEL)
        .rev()
        .map(move |i| color & (1 << i) != 0)
}

/// Encodes one pixel as an SPI transfer.
///
/// Every data bit becomes three SPI bits (`100` for `0`, `110` for `1`),
/// followed by a low tail that latches the color.
///
/// # Arguments
/// * `rgb` - The color to encode.
///
/// # Returns
/// The bytes to clock out on MOSI at [`SPI_BAUDRATE_HZ`].
#[must_use]
pub fn spi_frame(rgb: &Rgb) -> [u8; SPI_FRAME_LEN] {
    let mut frame = [0_u8; SPI_FRAME_LEN];
    for (i, bit) in bits(rgb).enumerate() {
        let symbol = if bit { SPI_ONE } else { SPI_ZERO };
        for j in 0..SPI_BITS_PER_BIT {
            if symbol & (0b100 >> j) != 0 {
                let pos = i * SPI_BITS_PER_BIT + j;
                frame[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    frame
}
