#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::{ApiClient, DepositReceipt, DepositUpload, UserContext};
pub use error::ApiError;
