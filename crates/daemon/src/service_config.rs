use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// address for the SWORD server to listen on
    pub listen_addr: SocketAddr,
    /// externally visible base URL (e.g. "https://sword.example.org"),
    ///  if not set then request locations are derived from the Host header
    pub public_url: Option<Url>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
