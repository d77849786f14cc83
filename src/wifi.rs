use anyhow::{anyhow, Result};
use blink_core::link::{Event, Reaction, Supervisor};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::{
    eventloop::{EspSubscription, EspSystemEventLoop, System},
    netif::IpEvent,
    nvs::EspDefaultNvsPartition,
    wifi::{EspWifi, WifiEvent},
};
use log::{error, info, warn};
use std::{
    net::Ipv4Addr,
    sync::{Arc, Mutex, MutexGuard},
    thread,
    time::{Duration, Instant},
};

const SETTLE_POLL: Duration = Duration::from_millis(100);

/// Wi-Fi network configuration containing SSID, password, and authentication method.
///
/// # Fields
/// * `ssid` - The network SSID.
/// * `password` - The network password.
/// * `auth` - The authentication method (e.g., `WPA2Personal`).
pub struct Config {
    ssid: &'static str,
    password: &'static str,
    auth: AuthMethod,
}

impl Config {
    fn new(ssid: &'static str, password: &'static str, auth: AuthMethod) -> Self {
        Self {
            ssid,
            password,
            auth,
        }
    }

    /// Returns the configured Wi-Fi SSID.
    #[must_use]
    pub fn ssid(&self) -> &str {
        self.ssid
    }

    /// Returns the configured Wi-Fi password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password
    }

    /// Returns the configured authentication method.
    #[must_use]
    pub fn auth(&self) -> AuthMethod {
        self.auth
    }

    /// Creates a `Config` from compile-time environment variables.
    ///
    /// Reads `WIFI_SSID` and `WIFI_PASSWORD` via `option_env!` and defaults
    /// to `WPA2Personal` authentication.
    ///
    /// # Returns
    /// A `Config` populated from environment variables.
    ///
    /// # Errors
    /// Returns an error if `WIFI_SSID` or `WIFI_PASSWORD` is not set at compile time.
    pub fn from_env() -> Result<Self> {
        let ssid = option_env!("WIFI_SSID")
            .ok_or_else(|| anyhow!("WIFI_SSID environment variable not set"))?;
        let password = option_env!("WIFI_PASSWORD")
            .ok_or_else(|| anyhow!("WIFI_PASSWORD environment variable not set"))?;

        Ok(Self::new(ssid, password, AuthMethod::WPA2Personal))
    }

    fn to_configuration(&self) -> Result<Configuration> {
        Ok(Configuration::Client(ClientConfiguration {
            auth_method: self.auth(),
            ssid: self
                .ssid()
                .try_into()
                .map_err(|()| anyhow!("Failed to convert SSID"))?,
            password: self
                .password()
                .try_into()
                .map_err(|()| anyhow!("Failed to convert password"))?,
            ..Default::default()
        }))
    }
}

/// Shared access to the Wi-Fi driver.
///
/// Cheap to clone; the HTTP handlers and the event subscriptions each hold one.
#[derive(Clone)]
pub struct Handle {
    wifi: Arc<Mutex<EspWifi<'static>>>,
}

impl Handle {
    fn lock(&self) -> Result<MutexGuard<'_, EspWifi<'static>>> {
        self.wifi
            .lock()
            .map_err(|e| anyhow!("Mutex lock error: {e:?}"))
    }

    /// Returns the current IPv4 address of the station interface.
    ///
    /// The address is `0.0.0.0` until DHCP hands out a lease.
    ///
    /// # Errors
    /// Returns an error if the interface cannot be queried.
    pub fn ip(&self) -> Result<Ipv4Addr> {
        Ok(self.lock()?.sta_netif().get_ip_info()?.ip)
    }

    /// Checks if the station interface is up.
    ///
    /// # Errors
    /// Returns an error if the interface cannot be queried.
    pub fn is_up(&self) -> Result<bool> {
        Ok(self.lock()?.sta_netif().is_up()?)
    }

    /// Checks if the station is associated with the access point.
    ///
    /// # Errors
    /// Returns an error if checking the state fails.
    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.lock()?.is_connected()?)
    }

    fn apply(&self, supervisor: &Mutex<Supervisor>, event: &Event) -> Result<()> {
        let reaction = supervisor
            .lock()
            .map_err(|e| anyhow!("Mutex lock error: {e:?}"))?
            .handle(event);

        match reaction {
            Reaction::Connect => self.lock()?.connect()?,
            Reaction::Reconnect { attempt } => {
                self.lock()?.connect()?;
                info!("Retrying WiFi connection... (attempt {attempt})");
            }
            Reaction::Announce(ip) => info!("Connected, got IP: {ip}"),
            Reaction::Ignore => {}
        }

        Ok(())
    }
}

/// A Wi-Fi station that keeps itself connected.
///
/// Connects as soon as the driver starts and reconnects every time the
/// access point goes away, for as long as the `Station` lives.
pub struct Station {
    handle: Handle,
    _wifi_events: EspSubscription<'static, System>,
    _ip_events: EspSubscription<'static, System>,
}

impl Station {
    /// Brings up the Wi-Fi driver in station mode.
    ///
    /// # Arguments
    /// * `modem` - The radio peripheral.
    /// * `sys_loop` - The system event loop Wi-Fi and IP events arrive on.
    /// * `nvs` - The default NVS partition, used by the driver for calibration data.
    /// * `config` - The network to join.
    ///
    /// # Returns
    /// A started `Station`. The connection completes in the background.
    ///
    /// # Errors
    /// Returns an error if the driver cannot be created, configured, subscribed to or started.
    pub fn new(
        modem: Modem,
        sys_loop: &EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &Config,
    ) -> Result<Self> {
        let mut wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs))?;
        wifi.set_configuration(&config.to_configuration()?)?;

        let handle = Handle {
            wifi: Arc::new(Mutex::new(wifi)),
        };
        let supervisor = Arc::new(Mutex::new(Supervisor::default()));

        let wifi_events = {
            let handle = handle.clone();
            let supervisor = Arc::clone(&supervisor);
            sys_loop.subscribe::<WifiEvent, _>(move |event| {
                let event = match event {
                    WifiEvent::StaStarted => Event::Started,
                    WifiEvent::StaDisconnected => Event::Disconnected,
                    _ => Event::Other,
                };
                if let Err(e) = handle.apply(&supervisor, &event) {
                    error!("Failed to handle {event:?}: {e:#}");
                }
            })?
        };

        let ip_events = {
            let handle = handle.clone();
            sys_loop.subscribe::<IpEvent, _>(move |event| {
                if let IpEvent::DhcpIpAssigned(assignment) = event {
                    let event = Event::GotIp(assignment.ip());
                    if let Err(e) = handle.apply(&supervisor, &event) {
                        error!("Failed to handle {event:?}: {e:#}");
                    }
                }
            })?
        };

        handle.lock()?.start()?;
        info!(
            "WiFi initialization complete. Connecting to SSID:{}",
            config.ssid()
        );

        Ok(Self {
            handle,
            _wifi_events: wifi_events,
            _ip_events: ip_events,
        })
    }

    /// Returns a handle to the driver.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Waits for the station interface to come up.
    ///
    /// # Arguments
    /// * `grace` - How long to wait at most.
    ///
    /// # Returns
    /// `true` if the interface came up in time, `false` otherwise.
    ///
    /// # Errors
    /// Returns an error if the interface cannot be queried.
    pub fn settle(&self, grace: Duration) -> Result<bool> {
        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.handle.is_up()? {
                return Ok(true);
            }
            thread::sleep(SETTLE_POLL);
        }

        warn!("WiFi not up after {grace:?}, carrying on");
        Ok(false)
    }
}
