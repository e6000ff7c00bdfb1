//! Storable form of a deployment.
//!
//! Every reference to a future is a [`FutureToken`] carrying only the id, so
//! shared futures are stored once and the stored tree is acyclic.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

use crate::types::{Artifact, DeploymentDetails};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedStoredDeployment {
    pub details: DeploymentDetails,
    pub start_module: String,
    pub modules: BTreeMap<String, SerializedModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedModule {
    pub id: String,
    pub submodules: Vec<String>,
    pub futures: BTreeMap<String, SerializedFuture>,
    pub results: BTreeMap<String, SerializedResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedResult {
    Future(FutureToken),
    Nested(BTreeMap<String, SerializedResult>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FutureTokenKind {
    FutureToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BigIntKind {
    #[serde(rename = "bigint")]
    BigInt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    AccountRuntimeValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleParameterKind {
    ModuleParameterRuntimeValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FutureToken {
    #[serde(rename = "_kind")]
    pub kind: FutureTokenKind,
    pub future_id: String,
}

impl FutureToken {
    pub fn new(future_id: impl Into<String>) -> Self {
        Self {
            kind: FutureTokenKind::FutureToken,
            future_id: future_id.into(),
        }
    }
}

/// Big integer as a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializedBigInt {
    #[serde(rename = "_kind")]
    pub kind: BigIntKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedAccount {
    #[serde(rename = "_kind")]
    pub kind: AccountKind,
    pub account_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SerializedModuleParameter {
    #[serde(rename = "_kind")]
    pub kind: ModuleParameterKind,
    pub module_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<SerializedParameterValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedParameterValue {
    Bool(bool),
    Number(Number),
    String(String),
    BigInt(SerializedBigInt),
}

/// Variant order matters: untagged deserialization takes the first match,
/// so the tagged shapes are tried before plain objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedArgumentValue {
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<SerializedArgumentValue>),
    Future(FutureToken),
    BigInt(SerializedBigInt),
    Account(SerializedAccount),
    ModuleParameter(SerializedModuleParameter),
    Object(BTreeMap<String, SerializedArgumentValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedPayableValue {
    Amount(SerializedBigInt),
    Parameter(SerializedModuleParameter),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedFromAddress {
    Address(String),
    Account(SerializedAccount),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedContractAddress {
    Literal(String),
    Future(FutureToken),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedEventArgument {
    Index(u64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedFuture {
    pub id: String,
    pub module_id: String,
    pub dependencies: Vec<FutureToken>,
    #[serde(flatten)]
    pub kind: SerializedFutureKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SerializedFutureKind {
    NamedContractDeployment {
        contract_name: String,
        constructor_args: Vec<SerializedArgumentValue>,
        libraries: BTreeMap<String, FutureToken>,
        value: SerializedPayableValue,
        from: Option<SerializedFromAddress>,
    },
    ArtifactContractDeployment {
        contract_name: String,
        artifact: Artifact,
        constructor_args: Vec<SerializedArgumentValue>,
        libraries: BTreeMap<String, FutureToken>,
        value: SerializedPayableValue,
        from: Option<SerializedFromAddress>,
    },
    NamedLibraryDeployment {
        contract_name: String,
        libraries: BTreeMap<String, FutureToken>,
        from: Option<SerializedFromAddress>,
    },
    ArtifactLibraryDeployment {
        contract_name: String,
        artifact: Artifact,
        libraries: BTreeMap<String, FutureToken>,
        from: Option<SerializedFromAddress>,
    },
    ContractAt {
        contract_name: String,
        address: SerializedContractAddress,
    },
    ArtifactContractAt {
        contract_name: String,
        address: SerializedContractAddress,
        artifact: Artifact,
    },
    NamedContractCall {
        function_name: String,
        contract: FutureToken,
        args: Vec<SerializedArgumentValue>,
        value: SerializedPayableValue,
        from: Option<SerializedFromAddress>,
    },
    NamedStaticCall {
        function_name: String,
        contract: FutureToken,
        args: Vec<SerializedArgumentValue>,
        from: Option<SerializedFromAddress>,
    },
    ReadEventArgument {
        event_name: String,
        name_or_index: SerializedEventArgument,
        future_to_read_from: FutureToken,
        emitter: FutureToken,
        event_index: u64,
    },
}
