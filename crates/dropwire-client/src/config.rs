//! Client configuration.

use std::time::Duration;

/// How long to wait before re-opening a lost event stream.
///
/// Matches the default retry interval of browser `EventSource`
/// implementations.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Connection parameters shared by the stream and the dispatcher.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `http://192.168.1.20:5001`.
    pub base_url: String,
    /// Delay between reconnect attempts on the event stream.
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Create a config for the given base URL with the default retry
    /// delay. A trailing slash on the base is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, retry_delay: DEFAULT_RETRY_DELAY }
    }

    /// Resolve a possibly-relative URL (as found in file messages)
    /// against the server base.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_owned()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://localhost:5001/");
        assert_eq!(config.base_url, "http://localhost:5001");
    }

    #[test]
    fn relative_url_resolves_against_base() {
        let config = ClientConfig::new("http://localhost:5001");
        assert_eq!(config.resolve("/files/x/a.txt"), "http://localhost:5001/files/x/a.txt");
        assert_eq!(config.resolve("files/x/a.txt"), "http://localhost:5001/files/x/a.txt");
    }

    #[test]
    fn absolute_url_passes_through() {
        let config = ClientConfig::new("http://localhost:5001");
        assert_eq!(config.resolve("http://other/a.txt"), "http://other/a.txt");
    }
}
