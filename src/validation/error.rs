use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found for contract '{contract_name}'")]
    NotFound { contract_name: String },

    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact for contract '{contract_name}' is invalid")]
    Invalid {
        contract_name: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("The {subject} expects {expected} arguments but {given} were given")]
    ArgumentCount {
        subject: String,
        expected: usize,
        given: usize,
    },

    #[error("Contract '{contract_name}' doesn't have a function {function_name}")]
    UnknownFunction {
        contract_name: String,
        function_name: String,
    },

    #[error("Function {function_name} in contract '{contract_name}' is overloaded, use its full signature")]
    AmbiguousFunction {
        contract_name: String,
        function_name: String,
    },

    #[error("Function {function_name} in contract '{contract_name}' is not 'pure' or 'view' and cannot be statically called")]
    NotStaticFunction {
        contract_name: String,
        function_name: String,
    },

    #[error("Contract '{contract_name}' doesn't have an event {event_name}")]
    UnknownEvent {
        contract_name: String,
        event_name: String,
    },

    #[error("Event {event_name} of contract '{contract_name}' has no argument {argument}")]
    UnknownEventArgument {
        contract_name: String,
        event_name: String,
        argument: String,
    },

    #[error("Contract '{contract_name}' needs libraries that were not provided: {}", .missing.join(", "))]
    MissingLibraries {
        contract_name: String,
        missing: Vec<String>,
    },

    #[error("Module parameter '{name}' requires a value but was given none")]
    MissingParameter { module_id: String, name: String },

    #[error("Module parameter '{name}' must be of type '{expected}' but is '{actual}'")]
    ParameterType {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Account index cannot be a negative number")]
    NegativeAccountIndex { account_index: i64 },

    #[error("Requested account index '{account_index}' is greater than the total number of available accounts '{available}'")]
    AccountIndexOutOfRange { account_index: i64, available: usize },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
