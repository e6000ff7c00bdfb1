use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::execution::TransactionOptions;
use crate::serialization::{parameter_value, SerializedParameterValue};
use crate::types::DeploymentDetails;
use crate::validation::DeploymentParameters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format: {reason}")]
    InvalidJson { reason: String },

    #[error("Invalid YAML format: {reason}")]
    InvalidYaml { reason: String },

    #[error("Invalid parameter {module_id}.{name}: {reason}")]
    InvalidParameter {
        module_id: String,
        name: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.json` is JSON, anything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Settings for one deployment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployConfig {
    pub network_name: String,
    pub chain_id: u64,
    /// Addresses available to `getAccount`
    pub accounts: Vec<String>,
    pub artifacts_dir: Option<PathBuf>,
    pub transaction: TransactionOptions,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            network_name: "hardhat".to_string(),
            chain_id: 31337,
            accounts: Vec::new(),
            artifacts_dir: None,
            transaction: TransactionOptions::default(),
        }
    }
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let config = parse(&content, ConfigFormat::from_path(path))?;
        debug!("Loaded deployment config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        parse(content, format)
    }

    pub fn details(&self) -> DeploymentDetails {
        DeploymentDetails {
            network_name: self.network_name.clone(),
            chain_id: self.chain_id,
        }
    }
}

/// Read `module id → parameter name → value` from a JSON or YAML file.
///
/// Big integers are written as `{"_kind": "bigint", "value": "<decimal>"}`.
pub fn load_parameters(path: &Path) -> Result<DeploymentParameters, ConfigError> {
    let content = read(path)?;
    let raw: BTreeMap<String, BTreeMap<String, SerializedParameterValue>> =
        parse(&content, ConfigFormat::from_path(path))?;

    let mut parameters = DeploymentParameters::new();
    for (module_id, values) in raw {
        let mut module_parameters = BTreeMap::new();
        for (name, value) in values {
            let value = parameter_value(&value).map_err(|e| ConfigError::InvalidParameter {
                module_id: module_id.clone(),
                name: name.clone(),
                reason: e.to_string(),
            })?;
            module_parameters.insert(name, value);
        }
        parameters.insert(module_id, module_parameters);
    }
    Ok(parameters)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T>(content: &str, format: ConfigFormat) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::InvalidJson {
            reason: e.to_string(),
        }),
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterValue;
    use num_bigint::BigInt;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = DeployConfig::parse("networkName: sepolia\nchainId: 11155111\n", ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.network_name, "sepolia");
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.transaction, TransactionOptions::default());
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_transaction_options_in_milliseconds() {
        let config = DeployConfig::parse(
            r#"{"transaction": {"maxRetries": 10, "gasIncrementPerRetry": 1000, "pollingInterval": 50}}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.transaction.max_retries, 10);
        assert_eq!(config.transaction.gas_increment_per_retry, Some(1000));
        assert_eq!(config.transaction.polling_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = DeployConfig::parse("chainId: [", ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_parameters_from_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "Token:\n  name: Gold\n  decimals: 18\n  supply:\n    _kind: bigint\n    value: \"1000000000000000000000\"\n  paused: false"
        )
        .unwrap();

        let parameters = load_parameters(file.path()).unwrap();
        let token = &parameters["Token"];

        assert_eq!(token["name"], ParameterValue::from("Gold"));
        assert_eq!(token["decimals"], ParameterValue::from(18));
        assert_eq!(
            token["supply"],
            ParameterValue::BigInt("1000000000000000000000".parse::<BigInt>().unwrap())
        );
        assert_eq!(token["paused"], ParameterValue::Bool(false));
    }

    #[test]
    fn test_load_parameters_rejects_bad_bigint() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"Token": {{"supply": {{"_kind": "bigint", "value": "12abc"}}}}}}"#).unwrap();

        let err = load_parameters(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { ref name, .. } if name == "supply"));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = DeployConfig::load(Path::new("/nonexistent/rustle-onchain.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
