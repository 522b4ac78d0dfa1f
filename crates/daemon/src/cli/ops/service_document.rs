use clap::Args;

use mocksword_daemon::http_server::api::client::ApiError;

use crate::cli::op::UserArgs;

/// Fetch the service document and print it
#[derive(Args, Debug, Clone)]
pub struct ServiceDocument {
    #[command(flatten)]
    pub user: UserArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceDocumentError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for ServiceDocument {
    type Error = ServiceDocumentError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(ctx.client.service_document(&(&self.user).into()).await?)
    }
}
