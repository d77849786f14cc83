use anyhow::Result;
use blink_core::{
    color::Rgb,
    light::Pixel,
    ws2812::{self, T0H, T0L, T1H, T1L},
};
use esp_idf_hal::{
    gpio::{AnyIOPin, AnyOutputPin, OutputPin},
    peripheral::Peripheral,
    rmt::{FixedLengthSignal, PinState, Pulse, TxRmtDriver},
    spi::{
        config::{Config, DriverConfig},
        Dma, SpiAnyPins, SpiDeviceDriver, SpiDriver,
    },
    units::Hertz,
};

const PIXEL_BITS: usize = ws2812::BITS_PER_PIXEL as usize;

/// Drives a `NeoPixel` LED with the RMT peripheral.
///
/// # Type Parameters
/// * `'a` - Lifetime of the RMT driver.
pub struct Rmt<'a> {
    tx: TxRmtDriver<'a>,
}

impl<'a> Rmt<'a> {
    /// Creates a new `Rmt` pixel writer.
    ///
    /// # Arguments
    /// * `tx` - A `TxRmtDriver` bound to the LED data pin.
    #[must_use]
    pub fn new(tx: TxRmtDriver<'a>) -> Self {
        Self { tx }
    }
}

impl Pixel for Rmt<'_> {
    /// Sends an RGB color value to the LED.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * There is an issue with the RMT driver, such as failing to retrieve the counter clock frequency.
    /// * There is an issue creating the pulses with the specified durations.
    /// * There is an issue setting the signal pulses.
    /// * There is an issue starting the transmission.
    fn write(&mut self, rgb: &Rgb) -> Result<()> {
        let ticks_hz = self.tx.counter_clock()?;
        let (t0_high, t0_low, t1_high, t1_low) = (
            Pulse::new_with_duration(ticks_hz, PinState::High, &T0H)?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &T0L)?,
            Pulse::new_with_duration(ticks_hz, PinState::High, &T1H)?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &T1L)?,
        );
        let mut signal = FixedLengthSignal::<PIXEL_BITS>::new();
        for (i, bit) in ws2812::bits(rgb).enumerate() {
            let pulses = if bit {
                (t1_high, t1_low)
            } else {
                (t0_high, t0_low)
            };
            signal.set(i, &pulses)?;
        }
        self.tx.start_blocking(&signal)?;

        Ok(())
    }
}

/// Drives a `NeoPixel` LED by clocking an encoded bit stream out of MOSI.
///
/// # Type Parameters
/// * `'a` - Lifetime of the SPI driver.
pub struct Spi<'a> {
    device: SpiDeviceDriver<'a, SpiDriver<'a>>,
}

impl<'a> Spi<'a> {
    /// Creates a new `Spi` pixel writer on a DMA-capable SPI host.
    ///
    /// Only MOSI is routed; the clock and chip select stay unconnected.
    ///
    /// # Arguments
    /// * `spi` - The SPI host peripheral.
    /// * `sdo` - The LED data pin.
    ///
    /// # Errors
    /// Returns an error if the SPI bus or device cannot be configured.
    pub fn new<S: SpiAnyPins>(
        spi: impl Peripheral<P = S> + 'a,
        sdo: impl Peripheral<P = impl OutputPin> + 'a,
    ) -> Result<Self> {
        let driver = SpiDriver::new_without_sclk(
            spi,
            sdo,
            None::<AnyIOPin>,
            &DriverConfig::new().dma(Dma::Auto(ws2812::SPI_FRAME_LEN)),
        )?;
        let config = Config::new().baudrate(Hertz(ws2812::SPI_BAUDRATE_HZ));
        let device = SpiDeviceDriver::new(driver, None::<AnyOutputPin>, &config)?;

        Ok(Self { device })
    }
}

impl Pixel for Spi<'_> {
    fn write(&mut self, rgb: &Rgb) -> Result<()> {
        self.device.write(&ws2812::spi_frame(rgb))?;

        Ok(())
    }
}
