use std::path::PathBuf;

use clap::Args;
use url::Url;

use mocksword_daemon::http_server::api::client::{ApiError, DepositUpload};

use crate::cli::op::UserArgs;

/// Post a zip package to a collection and print the returned entry
#[derive(Args, Debug, Clone)]
pub struct Deposit {
    /// Collection URL, as listed in the service document
    #[arg(long)]
    pub collection: Url,

    /// Path to the zip package
    #[arg(long)]
    pub file: PathBuf,

    /// Suggested identifier for the new item
    #[arg(long)]
    pub slug: Option<String>,

    /// Validate without claiming a deposit number
    #[arg(long)]
    pub no_op: bool,

    /// Ask for a verbose description in the receipt
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub user: UserArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Deposit {
    type Error = DepositError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let package = tokio::fs::read(&self.file)
            .await
            .map_err(|e| DepositError::Read(self.file.clone(), e))?;

        let upload = DepositUpload {
            collection: self.collection.clone(),
            package,
            filename: self
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            slug: self.slug.clone(),
            no_op: self.no_op,
            verbose: self.verbose,
        };

        let receipt = ctx.client.deposit(&(&self.user).into(), upload).await?;

        let mut output = String::new();
        if let Some(location) = &receipt.location {
            output.push_str(&format!("Location: {}\n", location));
        }
        output.push_str(&receipt.entry);
        Ok(output)
    }
}
