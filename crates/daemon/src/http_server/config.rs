use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Base URL advertised in collection locations. Falls back to the
    //  request's Host header when unset.
    pub public_url: Option<Url>,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, public_url: Option<Url>, log_level: tracing::Level) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, public_url={:?}",
            listen_addr,
            public_url.as_ref().map(Url::as_str)
        );
        Self {
            listen_addr,
            public_url,
            log_level,
        }
    }

    /// Base that request paths are appended to, without a trailing slash.
    pub fn public_base(&self) -> Option<&str> {
        self.public_url
            .as_ref()
            .map(|url| url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_base_trims_slash() {
        let config = Config::new(
            "127.0.0.1:8082".parse().unwrap(),
            Some(Url::parse("https://sword.example.org/").unwrap()),
            tracing::Level::INFO,
        );
        assert_eq!(config.public_base(), Some("https://sword.example.org"));

        let config = Config::new(
            "127.0.0.1:8082".parse().unwrap(),
            None,
            tracing::Level::INFO,
        );
        assert_eq!(config.public_base(), None);
    }
}
