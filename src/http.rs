use anyhow::{ensure, Result};
use blink_core::page;
use embedded_svc::{
    http::{client::Client as HttpClient, Headers, Method},
    io::{Read, Write},
};
use esp_idf_svc::http::{
    client::{Configuration as ClientConfiguration, EspHttpConnection},
    server::{Configuration as ServerConfiguration, EspHttpServer},
};
use log::{error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use crate::{ota, wifi::Handle};

const CHUNK_SIZE: usize = 4096;
// TLS plus a 4 KiB read buffer do not fit in the default pthread stack.
const OTA_STACK_SIZE: usize = 16 * 1024;

/// The device's web server.
///
/// Serves the status page on `GET /`. When built with `OTA_URL`, also
/// accepts `POST /ota` to flash the image found there. The server stops
/// when this value is dropped.
pub struct Server {
    _server: EspHttpServer<'static>,
}

impl Server {
    /// Starts the web server and registers its routes.
    ///
    /// # Arguments
    /// * `wifi` - Handle used to read the station address.
    /// * `ota_url` - Firmware image location; `None` disables `POST /ota`.
    ///
    /// # Errors
    /// Returns an error if the server cannot be started or a route cannot be registered.
    pub fn new(wifi: Handle, ota_url: Option<&'static str>) -> Result<Self> {
        let mut server = EspHttpServer::new(&ServerConfiguration::default())?;

        {
            let wifi = wifi.clone();
            server.fn_handler::<anyhow::Error, _>("/", Method::Get, move |req| {
                let ip = wifi
                    .ip()
                    .inspect_err(|e| warn!("Network interface not found: {e:#}"))?;
                req.into_response(200, Some("OK"), &[("Content-Type", page::CONTENT_TYPE)])?
                    .write_all(page::render(ip).as_bytes())?;

                Ok(())
            })?;
        }

        if let Some(url) = ota_url {
            let busy = Arc::new(AtomicBool::new(false));
            server.fn_handler::<anyhow::Error, _>("/ota", Method::Post, move |req| {
                if busy.swap(true, Ordering::AcqRel) {
                    req.into_status_response(409)?;
                    return Ok(());
                }

                let wifi = wifi.clone();
                let done = Arc::clone(&busy);
                let spawned = thread::Builder::new()
                    .name("ota".into())
                    .stack_size(OTA_STACK_SIZE)
                    .spawn(move || {
                        let Err(e) = Client::new(wifi)
                            .and_then(|mut client| ota::perform(&mut client, url));
                        error!("OTA failed: {e:#}");
                        done.store(false, Ordering::Release);
                    });
                if let Err(e) = spawned {
                    busy.store(false, Ordering::Release);
                    return Err(e.into());
                }

                req.into_status_response(202)?;
                Ok(())
            })?;
        }

        info!("Web server started");

        Ok(Self { _server: server })
    }
}

/// Represents an HTTPS client that fetches resources over Wi-Fi.
///
/// Server certificates are checked against the ESP-IDF certificate bundle.
pub struct Client {
    client: HttpClient<EspHttpConnection>,
    wifi: Handle,
}

impl Client {
    /// Creates a new `Client` instance with the given Wi-Fi handle.
    ///
    /// # Arguments
    ///
    /// * `wifi` - Handle on the Wi-Fi station.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(wifi: Handle) -> Result<Self> {
        let config = ClientConfiguration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let client = HttpClient::wrap(EspHttpConnection::new(&config)?);

        Ok(Self { client, wifi })
    }

    /// Sends a GET request and streams the response body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch.
    /// * `sink` - Called with each chunk of the body and the announced content length.
    ///
    /// # Returns
    ///
    /// The number of body bytes read.
    ///
    /// # Errors
    ///
    /// Returns an error if the Wi-Fi is not connected, the request fails, the response status
    /// is not in the success range, or `sink` fails.
    pub fn get<F>(&mut self, url: &str, mut sink: F) -> Result<u64>
    where
        F: FnMut(&[u8], Option<u64>) -> Result<()>,
    {
        ensure!(self.wifi.is_connected()?, "WIFI is off");

        let request = self.client.get(url)?;
        let mut response = request.submit()?;
        let status = response.status();
        ensure!(
            (200..300).contains(&status),
            "Request failed with status: {status}"
        );

        let length = response
            .header("Content-Length")
            .and_then(|value| value.parse::<u64>().ok());

        let mut buf = [0_u8; CHUNK_SIZE];
        let mut total = 0_u64;
        loop {
            let read = response.read(&mut buf)?;
            if read == 0 {
                break;
            }
            sink(&buf[..read], length)?;
            total += read as u64;
        }

        Ok(total)
    }
}
