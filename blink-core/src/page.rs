use std::net::Ipv4Addr;

/// Content type of the status page.
pub const CONTENT_TYPE: &str = "text/html";

/// Renders the status page served on `/`.
///
/// # Arguments
/// * `ip` - The current IPv4 address of the station interface.
///
/// # Returns
/// The HTML document.
#[must_use]
pub fn render(ip: Ipv4Addr) -> String {
    format!(
        "<!DOCTYPE html><html>\
         <head><title>ESP32S3 Info</title></head>\
         <body><h1>ESP32S3 Web Server</h1>\
         <p>IP Address: {ip}</p>\
         </body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_dotted_quad() {
        let page = render(Ipv4Addr::new(192, 168, 0, 17));
        assert_eq!(
            page,
            "<!DOCTYPE html><html><head><title>ESP32S3 Info</title></head>\
             <body><h1>ESP32S3 Web Server</h1><p>IP Address: 192.168.0.17</p>\
             </body></html>"
        );
    }

    #[test]
    fn unassigned_address_is_zeroes() {
        assert!(render(Ipv4Addr::UNSPECIFIED).contains("<p>IP Address: 0.0.0.0</p>"));
    }
}
