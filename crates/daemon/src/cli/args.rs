pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mocksword")]
#[command(about = "A mock SWORD 1.3 deposit server for exercising deposit clients")]
pub struct Args {
    /// Address of a running server (defaults to localhost on the configured port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the mocksword config directory (defaults to ~/.mocksword)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
