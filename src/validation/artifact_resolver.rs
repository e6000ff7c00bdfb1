use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{Artifact, Future, FutureKind};
use crate::validation::error::ArtifactError;

/// Source of compiled artifacts for named futures
pub trait ArtifactResolver {
    fn resolve(&self, contract_name: &str) -> Result<Artifact, ArtifactError>;
}

impl ArtifactResolver for HashMap<String, Artifact> {
    fn resolve(&self, contract_name: &str) -> Result<Artifact, ArtifactError> {
        self.get(contract_name)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                contract_name: contract_name.to_string(),
            })
    }
}

/// Reads `<dir>/<ContractName>.json`
#[derive(Debug, Clone)]
pub struct FsArtifactResolver {
    root: PathBuf,
}

impl FsArtifactResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_path(&self, contract_name: &str) -> PathBuf {
        self.root.join(format!("{contract_name}.json"))
    }
}

impl ArtifactResolver for FsArtifactResolver {
    fn resolve(&self, contract_name: &str) -> Result<Artifact, ArtifactError> {
        let path = self.artifact_path(contract_name);
        if !path.exists() {
            return Err(ArtifactError::NotFound {
                contract_name: contract_name.to_string(),
            });
        }

        debug!("Loading artifact {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| ArtifactError::Invalid {
            contract_name: contract_name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Artifact describing the contract behind a contract future: the embedded
/// one for artifact futures, otherwise whatever the resolver has
pub fn contract_artifact<R>(future: &Future, resolver: &R) -> Result<Artifact, ArtifactError>
where
    R: ArtifactResolver + ?Sized,
{
    if let Some(artifact) = future.embedded_artifact() {
        return Ok(artifact.clone());
    }
    match &future.kind {
        FutureKind::NamedContractDeployment { contract_name, .. }
        | FutureKind::NamedLibraryDeployment { contract_name, .. }
        | FutureKind::ContractAt { contract_name, .. } => resolver.resolve(contract_name),
        _ => Err(ArtifactError::Invalid {
            contract_name: future.id.clone(),
            reason: format!("{} does not describe a contract", future.future_type()),
        }),
    }
}
