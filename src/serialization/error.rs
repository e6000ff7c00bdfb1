use thiserror::Error;

/// Inconsistencies found while restoring a serialized deployment
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Start module {module_id} is not part of the deployment")]
    UnknownStartModule { module_id: String },

    #[error("Module {module_id} referenced by {referenced_by} is not part of the deployment")]
    UnknownModule {
        module_id: String,
        referenced_by: String,
    },

    #[error("Module stored under key {key} has id {module_id}")]
    ModuleKeyMismatch { key: String, module_id: String },

    #[error("Future {future_id} is stored in module {stored_in} but claims module {module_id}")]
    FutureModuleMismatch {
        future_id: String,
        module_id: String,
        stored_in: String,
    },

    #[error("Future {future_id} appears in more than one module")]
    DuplicateFuture { future_id: String },

    #[error("Future token {future_id} referenced by {referenced_by} does not resolve")]
    UnresolvedToken {
        future_id: String,
        referenced_by: String,
    },

    #[error("Future {future_id} depends on itself through its tokens")]
    FutureCycle { future_id: String },

    #[error("Module {module_id} contains itself")]
    ModuleCycle { module_id: String },

    #[error("Future {future_id} was never resolved")]
    UnresolvedFuture { future_id: String },

    #[error("Invalid bigint value '{value}'")]
    InvalidBigInt { value: String },

    #[error("Invalid serialized deployment JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerializationError>;
