use clap::Args;

use mocksword_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the SWORD server
    #[arg(long)]
    pub port: Option<u16>,

    /// Externally visible base URL for collection locations
    #[arg(long)]
    pub public_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            port: self.port.unwrap_or(defaults.port),
            public_url: self.public_url.clone(),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized mocksword directory at {}\n  config: {}\n  port:   {}",
            state.app_dir.display(),
            state.config_path.display(),
            state.config.port
        ))
    }
}
