//! Rustle Onchain - Declarative deployment orchestrator for on-chain contracts
//!
//! Modules describe contract deployments, calls and event reads as a graph of
//! futures. The graph is validated against compiled artifacts, stored and
//! restored without losing shared references, and executed transaction by
//! transaction with confirmation polling and gas-bumped retries.

pub mod builder;
pub mod config;
pub mod execution;
pub mod serialization;
pub mod types;
pub mod validation;

pub use builder::{build_module, define_module, ModuleBuilder, ModuleConstructor, ModuleDefinition};
pub use config::DeployConfig;
pub use execution::{TransactionOptions, TransactionService};
pub use serialization::{StoredDeploymentDeserializer, StoredDeploymentSerializer};
pub use types::*;
