use thiserror::Error;

use crate::execution::transaction::TxHash;

/// Failure reported by a ledger collaborator
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to the ledger failed: {reason}")]
    Request { reason: String },

    #[error("No signer available")]
    NoSigner,

    #[error("Transaction was rejected: {reason}")]
    Rejected { reason: String },
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Transaction not confirmed within max retry limit: {tx_hash} after {retries} retries")]
    MaxRetriesExceeded { tx_hash: TxHash, retries: u32 },

    #[error("Transaction {tx_hash} not found while preparing its replacement")]
    TransactionNotFound { tx_hash: TxHash },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Circular dependency detected between futures: {cycle:?}")]
    DependencyCycle { cycle: Vec<String> },

    #[error("Future {future_id} depends on {dependency}, which is not part of the deployment")]
    MissingDependency {
        future_id: String,
        dependency: String,
    },
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
