use anyhow::{anyhow, ensure, Result};
use embedded_hal::digital::OutputPin;
use log::info;
use std::{convert::Infallible, thread, time::Duration};

use crate::{
    color::{Rgb, BLACK, RED},
    infra::{Poller, State},
};

/// Blink period used when `BLINK_PERIOD_MS` is not set at build time.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// Parses the blink period.
///
/// # Arguments
/// * `raw` - The period in milliseconds, usually `option_env!("BLINK_PERIOD_MS")`.
///
/// # Returns
/// The parsed period, or [`DEFAULT_PERIOD`] if `raw` is `None`.
///
/// # Errors
/// Returns an error if `raw` is not a number or is zero.
pub fn period(raw: Option<&str>) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PERIOD);
    };

    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid BLINK_PERIOD_MS {raw:?}: {e}"))?;
    ensure!(ms > 0, "BLINK_PERIOD_MS must be greater than zero");

    Ok(Duration::from_millis(ms))
}

/// Something that can show the on/off state of the LED.
pub trait Output {
    /// Drives the LED to the given state.
    ///
    /// # Errors
    /// Returns an error if the underlying driver fails.
    fn show(&mut self, state: State) -> Result<()>;
}

/// A plain LED on a push-pull GPIO.
///
/// # Type Parameters
/// * `P` - The output pin driving the LED.
pub struct Gpio<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> Gpio<P> {
    /// Creates a new `Gpio` LED.
    ///
    /// The pin is expected to be reset and configured as an output already,
    /// which is what creating the HAL pin driver does.
    ///
    /// # Arguments
    /// * `pin` - The output pin.
    #[must_use]
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> Output for Gpio<P>
where
    P: OutputPin,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    fn show(&mut self, state: State) -> Result<()> {
        match state {
            State::On => self.pin.set_high()?,
            State::Off => self.pin.set_low()?,
        }

        Ok(())
    }
}

/// Transport writing the first pixel of an addressable LED strip.
pub trait Pixel {
    /// Sends a color to the pixel.
    ///
    /// # Errors
    /// Returns an error if the transmission fails.
    fn write(&mut self, rgb: &Rgb) -> Result<()>;
}

/// An addressable LED strip of which only the first pixel is used.
///
/// # Type Parameters
/// * `W` - The pixel transport (RMT or SPI).
pub struct Strip<W: Pixel> {
    writer: W,
}

impl<W: Pixel> Strip<W> {
    /// Creates a new `Strip` and clears it.
    ///
    /// # Arguments
    /// * `writer` - The pixel transport.
    ///
    /// # Errors
    /// Returns an error if the strip cannot be cleared.
    pub fn new(writer: W) -> Result<Self> {
        let mut ret = Self { writer };
        ret.writer.write(&BLACK)?;

        Ok(ret)
    }
}

impl<W: Pixel> Output for Strip<W> {
    fn show(&mut self, state: State) -> Result<()> {
        match state {
            State::On => self.writer.write(&RED),
            State::Off => self.writer.write(&BLACK),
        }
    }
}

/// Blinks an LED at a fixed period.
///
/// # Type Parameters
/// * `O` - The LED output.
pub struct Blinker<O: Output> {
    output: O,
    state: State,
    period: Duration,
}

impl<O: Output> Blinker<O> {
    /// Creates a new `Blinker`, starting with the LED off.
    ///
    /// # Arguments
    /// * `output` - The LED to blink.
    /// * `period` - Time between two toggles.
    ///
    /// # Returns
    /// A new `Blinker` instance.
    #[must_use]
    pub fn new(output: O, period: Duration) -> Self {
        Self {
            output,
            state: State::Off,
            period,
        }
    }

    /// Returns the state the next step will show.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Shows the current state on the LED, then toggles it.
    ///
    /// # Returns
    /// The state that was shown.
    ///
    /// # Errors
    /// Returns an error if the LED cannot be driven.
    pub fn step(&mut self) -> Result<State> {
        let shown = self.state;
        info!("Turning the LED {shown}!");
        self.output.show(shown)?;
        self.state.toggle();

        Ok(shown)
    }
}

impl<O: Output> Poller for Blinker<O> {
    /// Blinks forever.
    ///
    /// # Errors
    /// Returns the first error raised by the LED output.
    fn poll(&mut self) -> Result<Infallible> {
        loop {
            self.step()?;
            thread::sleep(self.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        shown: Vec<State>,
    }

    impl Output for &mut Recorder {
        fn show(&mut self, state: State) -> Result<()> {
            self.shown.push(state);
            Ok(())
        }
    }

    #[test]
    fn period_defaults_to_one_second() {
        assert_eq!(period(None).unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn period_parses_milliseconds() {
        assert_eq!(period(Some("250")).unwrap(), Duration::from_millis(250));
        assert_eq!(period(Some(" 40 ")).unwrap(), Duration::from_millis(40));
    }

    #[test]
    fn period_rejects_garbage_and_zero() {
        assert!(period(Some("fast")).is_err());
        assert!(period(Some("0")).is_err());
        assert!(period(Some("-5")).is_err());
    }

    #[test]
    fn first_step_shows_off() {
        let mut recorder = Recorder::default();
        let mut blinker = Blinker::new(&mut recorder, DEFAULT_PERIOD);

        assert_eq!(blinker.step().unwrap(), State::Off);
        assert_eq!(blinker.state(), State::On);
    }

    #[test]
    fn steps_alternate() {
        let mut recorder = Recorder::default();
        let mut blinker = Blinker::new(&mut recorder, DEFAULT_PERIOD);
        for _ in 0..4 {
            blinker.step().unwrap();
        }
        drop(blinker);

        assert_eq!(
            recorder.shown,
            [State::Off, State::On, State::Off, State::On]
        );
    }
}
