use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::types::artifact::Artifact;
use crate::types::value::{
    ArgumentValue, ContractAddress, EventArgument, FromAddress, PayableValue,
};

/// One deferred on-chain action and the futures it depends on
#[derive(Debug, Clone, PartialEq)]
pub struct Future {
    /// `<moduleId>:<localId>`
    pub id: String,
    /// Owning module, resolved against the module tree
    pub module_id: String,
    /// De-duplicated, in first-seen order
    pub dependencies: Vec<Arc<Future>>,
    pub kind: FutureKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FutureKind {
    NamedContractDeployment {
        contract_name: String,
        constructor_args: Vec<ArgumentValue>,
        libraries: BTreeMap<String, Arc<Future>>,
        value: PayableValue,
        from: Option<FromAddress>,
    },
    ArtifactContractDeployment {
        contract_name: String,
        artifact: Artifact,
        constructor_args: Vec<ArgumentValue>,
        libraries: BTreeMap<String, Arc<Future>>,
        value: PayableValue,
        from: Option<FromAddress>,
    },
    NamedLibraryDeployment {
        contract_name: String,
        libraries: BTreeMap<String, Arc<Future>>,
        from: Option<FromAddress>,
    },
    ArtifactLibraryDeployment {
        contract_name: String,
        artifact: Artifact,
        libraries: BTreeMap<String, Arc<Future>>,
        from: Option<FromAddress>,
    },
    ContractAt {
        contract_name: String,
        address: ContractAddress,
    },
    ArtifactContractAt {
        contract_name: String,
        address: ContractAddress,
        artifact: Artifact,
    },
    NamedContractCall {
        function_name: String,
        contract: Arc<Future>,
        args: Vec<ArgumentValue>,
        value: PayableValue,
        from: Option<FromAddress>,
    },
    NamedStaticCall {
        function_name: String,
        contract: Arc<Future>,
        args: Vec<ArgumentValue>,
        from: Option<FromAddress>,
    },
    ReadEventArgument {
        event_name: String,
        argument: EventArgument,
        future_to_read_from: Arc<Future>,
        emitter: Arc<Future>,
        event_index: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FutureType {
    NamedContractDeployment,
    ArtifactContractDeployment,
    NamedLibraryDeployment,
    ArtifactLibraryDeployment,
    ContractAt,
    ArtifactContractAt,
    NamedContractCall,
    NamedStaticCall,
    ReadEventArgument,
}

impl fmt::Display for FutureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FutureType::NamedContractDeployment => "NAMED_CONTRACT_DEPLOYMENT",
            FutureType::ArtifactContractDeployment => "ARTIFACT_CONTRACT_DEPLOYMENT",
            FutureType::NamedLibraryDeployment => "NAMED_LIBRARY_DEPLOYMENT",
            FutureType::ArtifactLibraryDeployment => "ARTIFACT_LIBRARY_DEPLOYMENT",
            FutureType::ContractAt => "CONTRACT_AT",
            FutureType::ArtifactContractAt => "ARTIFACT_CONTRACT_AT",
            FutureType::NamedContractCall => "NAMED_CONTRACT_CALL",
            FutureType::NamedStaticCall => "NAMED_STATIC_CALL",
            FutureType::ReadEventArgument => "READ_EVENT_ARGUMENT",
        };
        write!(f, "{name}")
    }
}

impl Future {
    pub fn future_type(&self) -> FutureType {
        match &self.kind {
            FutureKind::NamedContractDeployment { .. } => FutureType::NamedContractDeployment,
            FutureKind::ArtifactContractDeployment { .. } => {
                FutureType::ArtifactContractDeployment
            }
            FutureKind::NamedLibraryDeployment { .. } => FutureType::NamedLibraryDeployment,
            FutureKind::ArtifactLibraryDeployment { .. } => FutureType::ArtifactLibraryDeployment,
            FutureKind::ContractAt { .. } => FutureType::ContractAt,
            FutureKind::ArtifactContractAt { .. } => FutureType::ArtifactContractAt,
            FutureKind::NamedContractCall { .. } => FutureType::NamedContractCall,
            FutureKind::NamedStaticCall { .. } => FutureType::NamedStaticCall,
            FutureKind::ReadEventArgument { .. } => FutureType::ReadEventArgument,
        }
    }

    /// Contract name for futures that resolve to a contract instance
    pub fn contract_name(&self) -> Option<&str> {
        match &self.kind {
            FutureKind::NamedContractDeployment { contract_name, .. }
            | FutureKind::ArtifactContractDeployment { contract_name, .. }
            | FutureKind::NamedLibraryDeployment { contract_name, .. }
            | FutureKind::ArtifactLibraryDeployment { contract_name, .. }
            | FutureKind::ContractAt { contract_name, .. }
            | FutureKind::ArtifactContractAt { contract_name, .. } => Some(contract_name),
            FutureKind::NamedContractCall { .. }
            | FutureKind::NamedStaticCall { .. }
            | FutureKind::ReadEventArgument { .. } => None,
        }
    }

    pub fn is_contract(&self) -> bool {
        self.contract_name().is_some()
    }

    pub fn is_deployment(&self) -> bool {
        matches!(
            self.kind,
            FutureKind::NamedContractDeployment { .. }
                | FutureKind::ArtifactContractDeployment { .. }
                | FutureKind::NamedLibraryDeployment { .. }
                | FutureKind::ArtifactLibraryDeployment { .. }
        )
    }

    /// Artifact carried by the future itself, if any
    pub fn embedded_artifact(&self) -> Option<&Artifact> {
        match &self.kind {
            FutureKind::ArtifactContractDeployment { artifact, .. }
            | FutureKind::ArtifactLibraryDeployment { artifact, .. }
            | FutureKind::ArtifactContractAt { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn depends_on(&self, other: &Future) -> bool {
        self.dependencies.iter().any(|dep| dep.id == other.id)
    }

    pub fn dependency_ids(&self) -> Vec<&str> {
        self.dependencies.iter().map(|dep| dep.id.as_str()).collect()
    }
}

impl fmt::Display for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.future_type())
    }
}
