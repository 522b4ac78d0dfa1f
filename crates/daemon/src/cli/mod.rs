pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Daemon, Deposit, Health, Init, ServiceDocument, Version};
