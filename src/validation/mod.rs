pub mod abi;
pub mod artifact_resolver;
pub mod error;
pub mod stage_one;
pub mod stage_two;

pub use abi::{AbiEvent, AbiFunction, AbiParameter, ContractAbi};
pub use artifact_resolver::*;
pub use error::*;
pub use stage_one::*;
pub use stage_two::*;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::types::Module;

/// One future that did not pass validation
#[derive(Debug)]
pub struct ValidationFailure {
    pub future_id: String,
    pub error: ValidationError,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub validated: usize,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// First failure, for callers that stop at the first problem
    pub fn into_result(self) -> Result<()> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }

    fn record(&mut self, future_id: &str, outcome: Result<()>) {
        self.validated += 1;
        if let Err(error) = outcome {
            warn!("Future {} failed validation: {}", future_id, error);
            self.failures.push(ValidationFailure {
                future_id: future_id.to_string(),
                error,
            });
        }
    }
}

/// Run stage one over every future in the module tree
pub fn validate_module_stage_one<R>(module: &Arc<Module>, resolver: &R) -> ValidationReport
where
    R: ArtifactResolver + ?Sized,
{
    let mut report = ValidationReport::default();
    for future in module.all_futures() {
        debug!("Stage one validation of {}", future);
        report.record(&future.id, validate_stage_one(&future, resolver));
    }
    report
}

/// Run both stages over every future; stage two only runs for futures that
/// passed stage one
pub fn validate_module<R>(
    module: &Arc<Module>,
    resolver: &R,
    parameters: &DeploymentParameters,
    accounts: &[String],
) -> ValidationReport
where
    R: ArtifactResolver + ?Sized,
{
    info!("Validating module {}", module.id);

    let mut report = ValidationReport::default();
    for future in module.all_futures() {
        debug!("Validating {}", future);
        let outcome = validate_stage_one(&future, resolver)
            .and_then(|()| validate_stage_two(&future, resolver, parameters, accounts));
        report.record(&future.id, outcome);
    }

    info!(
        "Validated {} futures, {} failures",
        report.validated,
        report.failures.len()
    );
    report
}
