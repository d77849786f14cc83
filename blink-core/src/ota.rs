use anyhow::{ensure, Result};

/// Checks that a firmware URL can be fetched over TLS.
///
/// # Arguments
/// * `url` - The firmware image location.
///
/// # Errors
/// Returns an error if the URL is empty, is not `https://`, or has no host.
pub fn validate(url: &str) -> Result<()> {
    let url = url.trim();
    ensure!(!url.is_empty(), "OTA URL is empty");

    let rest = url
        .strip_prefix("https://")
        .ok_or_else(|| anyhow::anyhow!("OTA URL must use https: {url}"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    ensure!(!host.is_empty(), "OTA URL has no host: {url}");

    Ok(())
}

/// Tracks how much of a firmware image has been written.
#[derive(Debug, Default)]
pub struct Progress {
    written: u64,
    total: Option<u64>,
}

impl Progress {
    /// Creates a new `Progress`.
    ///
    /// # Arguments
    /// * `total` - The image size if the server announced one. A zero size
    ///   is treated as unknown.
    #[must_use]
    pub fn new(total: Option<u64>) -> Self {
        Self {
            written: 0,
            total: total.filter(|t| *t > 0),
        }
    }

    /// Records `n` more bytes written.
    pub fn advance(&mut self, n: usize) {
        self.written = self.written.saturating_add(n as u64);
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Returns the completion percentage, clamped to 100.
    ///
    /// # Returns
    /// `None` if the total size is unknown.
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        self.total.map(|total| {
            let pct = (self.written.saturating_mul(100) / total).min(100);
            u8::try_from(pct).unwrap_or(100)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_urls() {
        assert!(validate("https://things.example.com/api/v1/token/firmware.bin").is_ok());
        assert!(validate("  https://host ").is_ok());
    }

    #[test]
    fn rejects_plain_http_and_empty() {
        assert!(validate("").is_err());
        assert!(validate("http://host/fw.bin").is_err());
        assert!(validate("https:///fw.bin").is_err());
    }

    #[test]
    fn percent_needs_a_total() {
        let mut progress = Progress::new(None);
        progress.advance(10);
        assert_eq!(progress.percent(), None);
        assert_eq!(Progress::new(Some(0)).percent(), None);
    }

    #[test]
    fn percent_is_clamped() {
        let mut progress = Progress::new(Some(200));
        progress.advance(50);
        assert_eq!(progress.percent(), Some(25));
        progress.advance(500);
        assert_eq!(progress.percent(), Some(100));
        assert_eq!(progress.written(), 550);
    }
}
