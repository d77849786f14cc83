use blink_core::{
    infra::Poller,
    light::{self, Blinker},
};
use esp_idf_hal::prelude::Peripherals;
use esp_idf_svc::{
    eventloop::EspSystemEventLoop, log::EspLogger, nvs::EspDefaultNvsPartition,
};
use log::{info, warn};
use std::time::Duration;

#[cfg(feature = "led-gpio")]
use blink_core::light::Gpio;
#[cfg(any(feature = "led-strip-rmt", feature = "led-strip-spi"))]
use blink_core::light::Strip;
#[cfg(feature = "led-gpio")]
use esp_idf_hal::gpio::PinDriver;
#[cfg(feature = "led-strip-rmt")]
use esp_idf_hal::rmt::{config::TransmitConfig, TxRmtDriver};

#[cfg(feature = "led-strip-rmt")]
use esp_blink::light::Rmt;
#[cfg(feature = "led-strip-spi")]
use esp_blink::light::Spi;
use esp_blink::{
    http::Server,
    ota, thread,
    wifi::{Config as WifiConfig, Station},
};

#[cfg(not(any(
    feature = "led-gpio",
    feature = "led-strip-rmt",
    feature = "led-strip-spi"
)))]
compile_error!("unsupported LED type: enable one of led-gpio, led-strip-rmt, led-strip-spi");

#[cfg(any(
    all(feature = "led-gpio", feature = "led-strip-rmt"),
    all(feature = "led-gpio", feature = "led-strip-spi"),
    all(feature = "led-strip-rmt", feature = "led-strip-spi"),
))]
compile_error!("only one LED type can be enabled at a time");

// Give DHCP a chance before the web server comes up.
const STARTUP_GRACE: Duration = Duration::from_secs(5);

fn main() -> ! {
    thread::main(|| {
        // It is necessary to call this function once. Otherwise some patches to the runtime
        // implemented by esp-idf-sys might not link properly.
        esp_idf_hal::sys::link_patches();
        EspLogger::initialize_default();

        let period = light::period(option_env!("BLINK_PERIOD_MS"))?;
        let peripherals = Peripherals::take()?;

        // RGB LED of the ESP32-S3-DevKitC-1.
        #[cfg(feature = "led-strip-rmt")]
        let led = {
            info!("Example configured to blink addressable LED!");
            let tx_rmt_cfg = TransmitConfig::new().clock_divider(1);
            let tx_rmt_driver = TxRmtDriver::new(
                peripherals.rmt.channel0,
                peripherals.pins.gpio48,
                &tx_rmt_cfg,
            )?;
            Strip::new(Rmt::new(tx_rmt_driver))?
        };

        #[cfg(feature = "led-strip-spi")]
        let led = {
            info!("Example configured to blink addressable LED!");
            Strip::new(Spi::new(peripherals.spi2, peripherals.pins.gpio48)?)?
        };

        #[cfg(feature = "led-gpio")]
        let led = {
            info!("Example configured to blink GPIO LED!");
            Gpio::new(PinDriver::output(peripherals.pins.gpio48)?)
        };

        let nvs = EspDefaultNvsPartition::take()?;
        let sys_loop = EspSystemEventLoop::take()?;
        let wifi_config = WifiConfig::from_env()?;
        let station = Station::new(peripherals.modem, &sys_loop, nvs, &wifi_config)?;

        station.settle(STARTUP_GRACE)?;
        let _server = Server::new(station.handle(), option_env!("OTA_URL"))?;

        if let Err(e) = ota::confirm() {
            warn!("Failed to mark running OTA slot valid: {e:#}");
        }

        let mut blinker = Blinker::new(led, period);
        blinker.poll()
    })
}
