//! Runtime configuration shared by the session and the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default HTTPS port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Default host name used when building public URLs.
pub const DEFAULT_HOST: &str = "localhost";

/// Process-wide settings fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host name advertised in generated links.
    pub host: String,
    /// Port the HTTPS listener binds to and advertises.
    pub port: u16,
    /// Interface address to listen on.
    pub bind: IpAddr,
    /// Installation root holding `ssl/` and `results/`.
    pub root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            root: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Socket address for the listener.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Base URL artifacts are served under, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

/// Joins a base URL and a file name, percent-encoding the name.
pub fn artifact_url(base_url: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url(), "https://localhost:3000");
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_artifact_url_encodes_name() {
        let config = AppConfig {
            host: "preview.lan".to_string(),
            port: 8443,
            ..AppConfig::default()
        };
        assert_eq!(
            artifact_url(&config.base_url(), "my page.html"),
            "https://preview.lan:8443/my%20page.html"
        );
    }

    #[test]
    fn test_artifact_url_tolerates_trailing_slash() {
        assert_eq!(artifact_url("https://h:1/", "a.html"), "https://h:1/a.html");
    }
}
