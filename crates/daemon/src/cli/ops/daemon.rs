use std::net::SocketAddr;

use clap::Args;

use mocksword_daemon::state::{AppState, StateError};
use mocksword_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the server port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the public URL used in collection locations
    #[arg(long)]
    pub public_url: Option<url::Url>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let port = self.port.unwrap_or(state.config.port);
        let public_url = match &self.public_url {
            Some(url) => Some(url.clone()),
            None => state.config.public_url()?,
        };

        let config = ServiceConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            public_url,
            log_level: state.config.log_level()?,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
