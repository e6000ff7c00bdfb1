//! Ledger collaborators the transaction service talks to

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::execution::error::ProviderError;
use crate::execution::transaction::{TransactionInfo, TransactionRequest, TransactionResponse, TxHash};

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[async_trait]
pub trait TxSender: Send + Sync {
    /// Broadcast a transaction, returning the current block number and its hash
    async fn send(&self, request: &TransactionRequest) -> ProviderResult<(u64, TxHash)>;

    /// Broadcast a transaction superseding the pending one with the same nonce
    async fn send_and_replace(&self, request: &TransactionRequest) -> ProviderResult<TxHash>;
}

#[async_trait]
pub trait LedgerProvider: Send + Sync {
    async fn get_block_number(&self) -> ProviderResult<u64>;

    async fn get_transaction(&self, tx_hash: &str) -> ProviderResult<Option<TransactionInfo>>;
}

#[async_trait]
pub trait TransactionsProvider: Send + Sync {
    async fn is_mined(&self, tx_hash: &str) -> ProviderResult<bool>;

    async fn is_confirmed(&self, tx_hash: &str) -> ProviderResult<bool>;
}

#[async_trait]
pub trait GasProvider: Send + Sync {
    async fn estimate_gas_limit(&self, request: &TransactionRequest) -> ProviderResult<u64>;

    async fn estimate_gas_price(&self) -> ProviderResult<u128>;
}

#[async_trait]
pub trait Signer: Send + Sync {
    async fn address(&self) -> ProviderResult<String>;

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> ProviderResult<TransactionResponse>;
}

#[async_trait]
pub trait SignersProvider: Send + Sync {
    async fn get_default_signer(&self) -> ProviderResult<Arc<dyn Signer>>;
}

/// Everything the transaction service needs from the ledger
#[derive(Clone)]
pub struct Providers {
    pub ledger: Arc<dyn LedgerProvider>,
    pub transactions: Arc<dyn TransactionsProvider>,
    pub gas: Arc<dyn GasProvider>,
    pub signers: Arc<dyn SignersProvider>,
}

/// [`TxSender`] that signs with the default signer
pub struct SignerTxSender {
    signers: Arc<dyn SignersProvider>,
    ledger: Arc<dyn LedgerProvider>,
}

impl SignerTxSender {
    pub fn new(signers: Arc<dyn SignersProvider>, ledger: Arc<dyn LedgerProvider>) -> Self {
        Self { signers, ledger }
    }

    pub fn from_providers(providers: &Providers) -> Self {
        Self::new(Arc::clone(&providers.signers), Arc::clone(&providers.ledger))
    }
}

#[async_trait]
impl TxSender for SignerTxSender {
    async fn send(&self, request: &TransactionRequest) -> ProviderResult<(u64, TxHash)> {
        let signer = self.signers.get_default_signer().await?;
        let response = signer.send_transaction(request).await?;
        let block_number = match response.block_number {
            Some(block_number) => block_number,
            None => self.ledger.get_block_number().await?,
        };
        debug!("Sent transaction {} at block {}", response.hash, block_number);
        Ok((block_number, response.hash))
    }

    async fn send_and_replace(&self, request: &TransactionRequest) -> ProviderResult<TxHash> {
        if request.nonce.is_none() {
            return Err(ProviderError::Rejected {
                reason: "a replacement transaction needs the nonce of the one it replaces"
                    .to_string(),
            });
        }
        let signer = self.signers.get_default_signer().await?;
        let response = signer.send_transaction(request).await?;
        debug!(
            "Replaced transaction at nonce {} with {}",
            response.nonce, response.hash
        );
        Ok(response.hash)
    }
}
