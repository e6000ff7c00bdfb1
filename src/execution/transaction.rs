use serde::{Deserialize, Serialize};

pub type TxHash = String;

/// Transaction as handed to a sender. Gas fields left empty are estimated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub value: u128,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub nonce: Option<u64>,
}

impl TransactionRequest {
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }
}

/// Ledger view of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub hash: TxHash,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// What a signer returns after broadcasting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub nonce: u64,
}
