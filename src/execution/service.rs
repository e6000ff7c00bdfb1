use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::execution::clock::{Clock, TokioClock};
use crate::execution::config::TransactionOptions;
use crate::execution::error::{ExecutionError, Result};
use crate::execution::providers::{Providers, SignerTxSender, TxSender};
use crate::execution::transaction::{TransactionRequest, TxHash};

/// Where a submitted transaction is in its confirmation loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionState {
    Pending { tx_hash: TxHash, attempt: u32 },
    Retrying { tx_hash: TxHash, attempt: u32 },
    Replaced { tx_hash: TxHash, attempt: u32 },
    Confirmed { tx_hash: TxHash },
    Failed { tx_hash: TxHash, attempt: u32 },
}

/// Submits transactions and drives them to confirmation.
///
/// Holds no per-transaction state, so one service can serve concurrent
/// `send_tx` calls for independent futures.
pub struct TransactionService {
    providers: Providers,
    tx_sender: Arc<dyn TxSender>,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    pub fn new(providers: Providers, tx_sender: Arc<dyn TxSender>) -> Self {
        Self::with_clock(providers, tx_sender, Arc::new(TokioClock))
    }

    pub fn with_clock(
        providers: Providers,
        tx_sender: Arc<dyn TxSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            tx_sender,
            clock,
        }
    }

    /// Service sending through the default signer
    pub fn with_default_signer(providers: Providers) -> Self {
        let tx_sender = Arc::new(SignerTxSender::from_providers(&providers));
        Self::new(providers, tx_sender)
    }

    /// Send `request` and wait until it is confirmed, returning the block
    /// number and hash of the transaction that made it
    pub async fn send_tx(
        &self,
        request: TransactionRequest,
        options: &TransactionOptions,
    ) -> Result<(u64, TxHash)> {
        let request = self.prepare(request).await?;
        let (mut block_number, tx_hash) = self.tx_sender.send(&request).await?;
        info!("Submitted transaction {} at block {}", tx_hash, block_number);

        let max_retries = options.max_retries.max(1);
        let mut state = TransactionState::Pending {
            tx_hash,
            attempt: 1,
        };

        loop {
            state = match state {
                TransactionState::Pending { tx_hash, attempt } => {
                    self.clock.sleep(options.polling_interval).await;
                    if self.providers.transactions.is_confirmed(&tx_hash).await? {
                        TransactionState::Confirmed { tx_hash }
                    } else if attempt >= max_retries {
                        TransactionState::Failed { tx_hash, attempt }
                    } else {
                        debug!(
                            "Transaction {} not confirmed after attempt {}/{}",
                            tx_hash, attempt, max_retries
                        );
                        TransactionState::Retrying {
                            tx_hash,
                            attempt: attempt + 1,
                        }
                    }
                }
                TransactionState::Retrying { tx_hash, attempt } => {
                    match options.gas_increment_per_retry {
                        Some(increment) => {
                            if self.providers.transactions.is_mined(&tx_hash).await? {
                                debug!("Transaction {} mined, awaiting confirmations", tx_hash);
                                TransactionState::Pending { tx_hash, attempt }
                            } else {
                                let replacement =
                                    self.replace(&request, &tx_hash, increment).await?;
                                block_number = self.providers.ledger.get_block_number().await?;
                                TransactionState::Replaced {
                                    tx_hash: replacement,
                                    attempt,
                                }
                            }
                        }
                        None => TransactionState::Pending { tx_hash, attempt },
                    }
                }
                TransactionState::Replaced { tx_hash, attempt } => {
                    TransactionState::Pending { tx_hash, attempt }
                }
                TransactionState::Confirmed { tx_hash } => {
                    info!("Transaction {} confirmed", tx_hash);
                    return Ok((block_number, tx_hash));
                }
                TransactionState::Failed { tx_hash, attempt } => {
                    warn!(
                        "Giving up on transaction {} after {} attempts",
                        tx_hash, attempt
                    );
                    return Err(ExecutionError::MaxRetriesExceeded {
                        tx_hash,
                        retries: attempt,
                    });
                }
            };
        }
    }

    async fn prepare(&self, mut request: TransactionRequest) -> Result<TransactionRequest> {
        if request.gas_limit.is_none() {
            request.gas_limit = Some(self.providers.gas.estimate_gas_limit(&request).await?);
        }
        if request.gas_price.is_none() {
            request.gas_price = Some(self.providers.gas.estimate_gas_price().await?);
        }
        Ok(request)
    }

    /// Resubmit at the same nonce with a higher gas price
    async fn replace(
        &self,
        request: &TransactionRequest,
        tx_hash: &str,
        increment: u128,
    ) -> Result<TxHash> {
        let previous = self
            .providers
            .ledger
            .get_transaction(tx_hash)
            .await?
            .ok_or_else(|| ExecutionError::TransactionNotFound {
                tx_hash: tx_hash.to_string(),
            })?;

        let replacement = TransactionRequest {
            nonce: Some(previous.nonce),
            gas_limit: Some(previous.gas_limit),
            gas_price: Some(previous.gas_price.saturating_add(increment)),
            ..request.clone()
        };
        warn!(
            "Replacing transaction {} at nonce {} with gas price {}",
            tx_hash,
            previous.nonce,
            previous.gas_price.saturating_add(increment)
        );

        Ok(self.tx_sender.send_and_replace(&replacement).await?)
    }
}
