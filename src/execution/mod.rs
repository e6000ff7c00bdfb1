pub mod batcher;
pub mod clock;
pub mod config;
pub mod error;
pub mod providers;
pub mod service;
pub mod transaction;

pub use batcher::*;
pub use clock::*;
pub use config::TransactionOptions;
pub use error::*;
pub use providers::*;
pub use service::*;
pub use transaction::*;
