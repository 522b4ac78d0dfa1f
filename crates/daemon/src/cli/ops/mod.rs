pub mod daemon;
pub mod deposit;
pub mod health;
pub mod init;
pub mod service_document;
pub mod version;

pub use daemon::Daemon;
pub use deposit::Deposit;
pub use health::Health;
pub use init::Init;
pub use service_document::ServiceDocument;
pub use version::Version;
