pub mod deserializer;
pub mod error;
pub mod format;
pub mod serializer;

pub use deserializer::*;
pub use error::*;
pub use format::*;
pub use serializer::*;

use crate::types::StoredDeployment;

/// Pretty JSON with stable key order; identical deployments give identical bytes
pub fn to_json_string(deployment: &StoredDeployment) -> Result<String> {
    let serialized = StoredDeploymentSerializer::serialize(deployment);
    Ok(serde_json::to_string_pretty(&serialized)?)
}

pub fn from_json_str(json: &str) -> Result<StoredDeployment> {
    let serialized: SerializedStoredDeployment = serde_json::from_str(json)?;
    StoredDeploymentDeserializer::deserialize(&serialized)
}
