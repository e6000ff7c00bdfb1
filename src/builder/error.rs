use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("Duplicated id {id} found in module {module_id}")]
    DuplicateId { id: String, module_id: String },

    #[error("Module id {module_id} is used by two different module definitions")]
    DuplicateModuleId { module_id: String },

    #[error("Module {module_id} uses itself through {}", .chain.join(" -> "))]
    CyclicModuleUse {
        module_id: String,
        chain: Vec<String>,
    },

    #[error("Given library '{name}' is not a valid Future")]
    InvalidLibrary { name: String },

    #[error("Future '{future_id}' is not a contract and cannot be used as {role}")]
    InvalidContractFuture { future_id: String, role: String },

    #[error("Invalid address '{address}' given for option \"{option}\"")]
    InvalidAddress { address: String, option: String },

    #[error("Future '{future_id}' cannot provide an address, only static calls can")]
    InvalidAddressFuture { future_id: String },

    #[error("Module {module_id} has no result named '{name}'")]
    UnknownResult { module_id: String, name: String },

    #[error("Result '{name}' of module {module_id} references future '{future_id}' outside of the module")]
    ForeignResult {
        module_id: String,
        name: String,
        future_id: String,
    },
}

pub type Result<T> = std::result::Result<T, ConstructionError>;
