use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionOptions {
    /// Polling cycles allowed before giving up; zero still polls once
    pub max_retries: u32,
    /// Gas price added on every replacement; `None` keeps polling the
    /// original transaction
    pub gas_increment_per_retry: Option<u128>,
    #[serde(with = "serde_duration_ms")]
    pub polling_interval: Duration,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            max_retries: 4,
            gas_increment_per_retry: None,
            polling_interval: Duration::from_millis(300),
        }
    }
}

pub(crate) mod serde_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
