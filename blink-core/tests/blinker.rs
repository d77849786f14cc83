//! Blink loop driven against mock hardware.

use anyhow::{bail, Result};
use blink_core::{
    color::{Rgb, BLACK, RED},
    infra::{Poller, State},
    light::{Blinker, Gpio, Output, Pixel, Strip, DEFAULT_PERIOD},
};
use embedded_hal::digital::{ErrorType, OutputPin};
use std::{cell::RefCell, convert::Infallible, rc::Rc, time::Duration};

// ============================================================================
// Mocks
// ============================================================================

#[derive(Clone, Default)]
struct MockPin {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MockPixel {
    written: Rc<RefCell<Vec<Rgb>>>,
    fail_after: Option<usize>,
}

impl Pixel for MockPixel {
    fn write(&mut self, rgb: &Rgb) -> Result<()> {
        if self.fail_after == Some(self.written.borrow().len()) {
            bail!("transmission failed");
        }
        self.written.borrow_mut().push(*rgb);
        Ok(())
    }
}

// ============================================================================
// Tests: GPIO LED
// ============================================================================

#[test]
fn gpio_level_follows_state() {
    let pin = MockPin::default();
    let mut blinker = Blinker::new(Gpio::new(pin.clone()), DEFAULT_PERIOD);

    for _ in 0..3 {
        blinker.step().unwrap();
    }

    assert_eq!(*pin.levels.borrow(), [false, true, false]);
}

#[test]
fn gpio_creation_leaves_pin_alone() {
    let pin = MockPin::default();
    let _led = Gpio::new(pin.clone());

    assert!(pin.levels.borrow().is_empty());
}

// ============================================================================
// Tests: LED strip
// ============================================================================

#[test]
fn strip_is_cleared_on_creation() {
    let pixel = MockPixel::default();
    let _strip = Strip::new(pixel.clone()).unwrap();

    assert_eq!(*pixel.written.borrow(), [BLACK]);
}

#[test]
fn strip_shows_red_when_on_and_clears_when_off() {
    let pixel = MockPixel::default();
    let mut strip = Strip::new(pixel.clone()).unwrap();

    strip.show(State::On).unwrap();
    strip.show(State::Off).unwrap();

    assert_eq!(*pixel.written.borrow(), [BLACK, RED, BLACK]);
}

#[test]
fn strip_blinks_from_off() {
    let pixel = MockPixel::default();
    let mut blinker =
        Blinker::new(Strip::new(pixel.clone()).unwrap(), DEFAULT_PERIOD);

    assert_eq!(blinker.step().unwrap(), State::Off);
    assert_eq!(blinker.step().unwrap(), State::On);

    assert_eq!(*pixel.written.borrow(), [BLACK, BLACK, RED]);
}

#[test]
fn failed_write_stops_the_step() {
    let pixel = MockPixel {
        fail_after: Some(2),
        ..MockPixel::default()
    };
    let mut blinker =
        Blinker::new(Strip::new(pixel.clone()).unwrap(), DEFAULT_PERIOD);

    blinker.step().unwrap();
    assert!(blinker.step().is_err());
    // The state is not toggled when the LED could not be driven.
    assert_eq!(blinker.state(), State::On);
}

#[test]
fn poll_ends_on_first_failed_write() {
    let pixel = MockPixel {
        fail_after: Some(3),
        ..MockPixel::default()
    };
    let mut blinker = Blinker::new(
        Strip::new(pixel.clone()).unwrap(),
        Duration::from_millis(1),
    );

    let err = blinker.poll().unwrap_err();

    assert_eq!(err.to_string(), "transmission failed");
    // Clear, then OFF and ON before the third step fails.
    assert_eq!(*pixel.written.borrow(), [BLACK, BLACK, RED]);
    assert_eq!(blinker.state(), State::Off);
}

#[test]
fn failed_clear_fails_creation() {
    let pixel = MockPixel {
        fail_after: Some(0),
        ..MockPixel::default()
    };

    assert!(Strip::new(pixel).is_err());
}
