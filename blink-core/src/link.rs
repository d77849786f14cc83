//! What to do when the Wi-Fi driver or the IP stack reports something.
//!
//! The station reconnects immediately and unconditionally every time the
//! access point goes away. There is no backoff and no retry limit.

use std::net::Ipv4Addr;

/// Notification from the network stack, stripped of vendor types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The station interface has started.
    Started,
    /// The station lost (or never got) its association.
    Disconnected,
    /// DHCP handed out an address.
    GotIp(Ipv4Addr),
    /// Anything else; ignored.
    Other,
}

/// What the station should do about an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Connect,
    /// Connect again; `attempt` counts reconnects since the last lease.
    Reconnect { attempt: u32 },
    Announce(Ipv4Addr),
    Ignore,
}

/// Tracks reconnect attempts and maps events to reactions.
#[derive(Debug, Default)]
pub struct Supervisor {
    attempts: u32,
}

impl Supervisor {
    /// Decides how to react to an event.
    ///
    /// # Arguments
    /// * `event` - The event reported by the network stack.
    ///
    /// # Returns
    /// The reaction to apply.
    pub fn handle(&mut self, event: &Event) -> Reaction {
        match *event {
            Event::Started => Reaction::Connect,
            Event::Disconnected => {
                self.attempts = self.attempts.saturating_add(1);
                Reaction::Reconnect {
                    attempt: self.attempts,
                }
            }
            Event::GotIp(ip) => {
                self.attempts = 0;
                Reaction::Announce(ip)
            }
            Event::Other => Reaction::Ignore,
        }
    }

    /// Returns the number of reconnects since the last lease.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_connects() {
        assert_eq!(Supervisor::default().handle(&Event::Started), Reaction::Connect);
    }

    #[test]
    fn disconnect_always_reconnects() {
        let mut supervisor = Supervisor::default();
        for attempt in 1..=100 {
            assert_eq!(
                supervisor.handle(&Event::Disconnected),
                Reaction::Reconnect { attempt }
            );
        }
    }

    #[test]
    fn lease_resets_attempts() {
        let mut supervisor = Supervisor::default();
        supervisor.handle(&Event::Disconnected);
        supervisor.handle(&Event::Disconnected);
        let ip = Ipv4Addr::new(192, 168, 1, 42);

        assert_eq!(supervisor.handle(&Event::GotIp(ip)), Reaction::Announce(ip));
        assert_eq!(supervisor.attempts(), 0);
        assert_eq!(
            supervisor.handle(&Event::Disconnected),
            Reaction::Reconnect { attempt: 1 }
        );
    }

    #[test]
    fn other_events_are_ignored() {
        let mut supervisor = Supervisor::default();
        assert_eq!(supervisor.handle(&Event::Other), Reaction::Ignore);
        assert_eq!(supervisor.attempts(), 0);
    }
}
