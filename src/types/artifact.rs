use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compiled contract as produced by the host toolchain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub bytecode: String,
    pub abi: Vec<serde_json::Value>,
    /// source file → library name → placeholder offsets
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<LinkReference>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReference {
    pub start: u64,
    pub length: u64,
}

impl Artifact {
    pub fn new(contract_name: impl Into<String>, bytecode: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            bytecode: bytecode.into(),
            abi: Vec::new(),
            link_references: BTreeMap::new(),
        }
    }

    pub fn with_abi(mut self, abi: Vec<serde_json::Value>) -> Self {
        self.abi = abi;
        self
    }

    /// Names of every library the bytecode needs linked
    pub fn library_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .link_references
            .values()
            .flat_map(|libraries| libraries.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
