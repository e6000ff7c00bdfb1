use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::module::Module;

/// Network the deployment targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDetails {
    pub network_name: String,
    pub chain_id: u64,
}

/// A constructed module together with its deployment metadata
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDeployment {
    pub details: DeploymentDetails,
    pub module: Arc<Module>,
}

impl StoredDeployment {
    pub fn new(details: DeploymentDetails, module: Arc<Module>) -> Self {
        Self { details, module }
    }
}
