use anyhow::Result;
use std::{convert::Infallible, fmt};

/// A trait representing a poller that performs periodic tasks forever.
///
/// # Errors
/// This trait's `poll` method returns an error if the polling operation fails.
pub trait Poller {
    /// Polls for periodic tasks.
    ///
    /// # Errors
    /// Returns an error if the polling operation fails.
    fn poll(&mut self) -> Result<Infallible>;
}

/// Represents the state of the LED.
///
/// # Variants
/// * `On` - The LED is lit.
/// * `Off` - The LED is dark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    On,
    #[default]
    Off,
}

impl State {
    /// Flips the state in place.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        };
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "ON",
            Self::Off => "OFF",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_off() {
        assert_eq!(State::default(), State::Off);
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let mut state = State::Off;
        state.toggle();
        assert_eq!(state, State::On);
        state.toggle();
        assert_eq!(state, State::Off);
    }

    #[test]
    fn displays_as_upper_case() {
        assert_eq!(State::On.to_string(), "ON");
        assert_eq!(State::Off.to_string(), "OFF");
    }
}
