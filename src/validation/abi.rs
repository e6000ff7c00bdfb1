//! The slice of a contract ABI that validation needs: arities, parameter
//! types, mutability and event inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::types::{Artifact, ParameterValue};
use crate::validation::error::{ArtifactError, ValidationError};

static BYTECODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0x)?([0-9a-fA-F]|__\$[0-9a-fA-F]{34}\$__)*$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum AbiItem {
    Constructor {
        #[serde(default)]
        inputs: Vec<AbiParameter>,
    },
    Function {
        name: String,
        #[serde(default)]
        inputs: Vec<AbiParameter>,
        #[serde(default, rename = "stateMutability")]
        state_mutability: Option<String>,
        #[serde(default)]
        constant: Option<bool>,
    },
    Event {
        name: String,
        #[serde(default)]
        inputs: Vec<AbiParameter>,
    },
    Error {},
    Fallback {},
    Receive {},
}

#[derive(Debug, Clone)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiParameter>,
    pub state_mutability: Option<String>,
    constant: bool,
}

impl AbiFunction {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn is_static(&self) -> bool {
        self.constant
            || matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }
}

#[derive(Debug, Clone)]
pub struct AbiEvent {
    pub name: String,
    pub inputs: Vec<AbiParameter>,
}

#[derive(Debug, Clone)]
pub struct ContractAbi {
    pub contract_name: String,
    pub constructor_inputs: Vec<AbiParameter>,
    pub functions: Vec<AbiFunction>,
    pub events: Vec<AbiEvent>,
}

impl ContractAbi {
    /// Parse and structurally check an artifact
    pub fn from_artifact(contract_name: &str, artifact: &Artifact) -> Result<Self, ArtifactError> {
        if !BYTECODE_PATTERN.is_match(&artifact.bytecode) {
            return Err(ArtifactError::Invalid {
                contract_name: contract_name.to_string(),
                reason: "bytecode is not a hex string".to_string(),
            });
        }

        let mut abi = ContractAbi {
            contract_name: contract_name.to_string(),
            constructor_inputs: Vec::new(),
            functions: Vec::new(),
            events: Vec::new(),
        };

        for entry in &artifact.abi {
            let item: AbiItem =
                serde_json::from_value(entry.clone()).map_err(|e| ArtifactError::Invalid {
                    contract_name: contract_name.to_string(),
                    reason: format!("malformed abi entry: {e}"),
                })?;
            match item {
                AbiItem::Constructor { inputs } => abi.constructor_inputs = inputs,
                AbiItem::Function {
                    name,
                    inputs,
                    state_mutability,
                    constant,
                } => abi.functions.push(AbiFunction {
                    name,
                    inputs,
                    state_mutability,
                    constant: constant.unwrap_or(false),
                }),
                AbiItem::Event { name, inputs } => abi.events.push(AbiEvent { name, inputs }),
                AbiItem::Error {} | AbiItem::Fallback {} | AbiItem::Receive {} => {}
            }
        }

        Ok(abi)
    }

    /// Look a function up by bare name or by full signature
    pub fn function(&self, name_or_signature: &str) -> Result<&AbiFunction, ValidationError> {
        if name_or_signature.contains('(') {
            return self
                .functions
                .iter()
                .find(|f| f.signature() == name_or_signature)
                .ok_or_else(|| self.unknown_function(name_or_signature));
        }

        let mut matches = self.functions.iter().filter(|f| f.name == name_or_signature);
        match (matches.next(), matches.next()) {
            (Some(function), None) => Ok(function),
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousFunction {
                contract_name: self.contract_name.clone(),
                function_name: name_or_signature.to_string(),
            }),
            (None, _) => Err(self.unknown_function(name_or_signature)),
        }
    }

    pub fn event(&self, event_name: &str) -> Option<&AbiEvent> {
        self.events.iter().find(|e| e.name == event_name)
    }

    fn unknown_function(&self, function_name: &str) -> ValidationError {
        ValidationError::UnknownFunction {
            contract_name: self.contract_name.clone(),
            function_name: function_name.to_string(),
        }
    }
}

/// Type name a parameter value must have where the ABI declares `abi_type`
pub fn expected_parameter_type(abi_type: &str) -> &'static str {
    if abi_type.starts_with("uint") || abi_type.starts_with("int") {
        "bigint"
    } else if abi_type == "bool" {
        "boolean"
    } else if abi_type.ends_with(']') || abi_type.starts_with("tuple") {
        "array"
    } else {
        "string"
    }
}

pub fn parameter_matches(abi_type: &str, value: &ParameterValue) -> bool {
    match (expected_parameter_type(abi_type), value) {
        ("bigint", ParameterValue::BigInt(_)) | ("bigint", ParameterValue::Number(_)) => true,
        ("boolean", ParameterValue::Bool(_)) => true,
        ("string", ParameterValue::String(_)) => true,
        _ => false,
    }
}
