//! Artifact-level checks. Only the future and the artifacts it touches are
//! needed, no parameters or accounts.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{Artifact, EventArgument, Future, FutureKind};
use crate::validation::abi::ContractAbi;
use crate::validation::artifact_resolver::{contract_artifact, ArtifactResolver};
use crate::validation::error::{Result, ValidationError};

pub fn validate_stage_one<R>(future: &Future, resolver: &R) -> Result<()>
where
    R: ArtifactResolver + ?Sized,
{
    match &future.kind {
        FutureKind::NamedContractDeployment {
            contract_name,
            constructor_args,
            libraries,
            ..
        } => {
            let artifact = resolver.resolve(contract_name)?;
            validate_deployment(contract_name, &artifact, constructor_args.len(), libraries)
        }
        FutureKind::ArtifactContractDeployment {
            contract_name,
            artifact,
            constructor_args,
            libraries,
            ..
        } => validate_deployment(contract_name, artifact, constructor_args.len(), libraries),
        FutureKind::NamedLibraryDeployment {
            contract_name,
            libraries,
            ..
        } => {
            let artifact = resolver.resolve(contract_name)?;
            validate_deployment(contract_name, &artifact, 0, libraries)
        }
        FutureKind::ArtifactLibraryDeployment {
            contract_name,
            artifact,
            libraries,
            ..
        } => validate_deployment(contract_name, artifact, 0, libraries),
        FutureKind::ContractAt { contract_name, .. } => {
            let artifact = resolver.resolve(contract_name)?;
            ContractAbi::from_artifact(contract_name, &artifact)?;
            Ok(())
        }
        FutureKind::ArtifactContractAt {
            contract_name,
            artifact,
            ..
        } => {
            ContractAbi::from_artifact(contract_name, artifact)?;
            Ok(())
        }
        FutureKind::NamedContractCall {
            function_name,
            contract,
            args,
            ..
        } => validate_call(contract, function_name, args.len(), false, resolver),
        FutureKind::NamedStaticCall {
            function_name,
            contract,
            args,
            ..
        } => validate_call(contract, function_name, args.len(), true, resolver),
        FutureKind::ReadEventArgument {
            event_name,
            argument,
            emitter,
            ..
        } => validate_event_argument(emitter, event_name, argument, resolver),
    }
}

fn validate_deployment(
    contract_name: &str,
    artifact: &Artifact,
    given_args: usize,
    libraries: &BTreeMap<String, Arc<Future>>,
) -> Result<()> {
    let abi = ContractAbi::from_artifact(contract_name, artifact)?;

    if abi.constructor_inputs.len() != given_args {
        return Err(ValidationError::ArgumentCount {
            subject: format!("constructor of the contract '{contract_name}'"),
            expected: abi.constructor_inputs.len(),
            given: given_args,
        });
    }

    let missing: Vec<String> = artifact
        .library_names()
        .into_iter()
        .filter(|name| !libraries.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingLibraries {
            contract_name: contract_name.to_string(),
            missing,
        });
    }

    Ok(())
}

fn validate_call<R>(
    contract: &Future,
    function_name: &str,
    given_args: usize,
    must_be_static: bool,
    resolver: &R,
) -> Result<()>
where
    R: ArtifactResolver + ?Sized,
{
    let contract_name = contract.contract_name().unwrap_or(&contract.id);
    let artifact = contract_artifact(contract, resolver)?;
    let abi = ContractAbi::from_artifact(contract_name, &artifact)?;
    let function = abi.function(function_name)?;

    if function.inputs.len() != given_args {
        return Err(ValidationError::ArgumentCount {
            subject: format!("function {function_name} in contract '{contract_name}'"),
            expected: function.inputs.len(),
            given: given_args,
        });
    }

    if must_be_static && !function.is_static() {
        return Err(ValidationError::NotStaticFunction {
            contract_name: contract_name.to_string(),
            function_name: function_name.to_string(),
        });
    }

    Ok(())
}

fn validate_event_argument<R>(
    emitter: &Future,
    event_name: &str,
    argument: &EventArgument,
    resolver: &R,
) -> Result<()>
where
    R: ArtifactResolver + ?Sized,
{
    let contract_name = emitter.contract_name().unwrap_or(&emitter.id);
    let artifact = contract_artifact(emitter, resolver)?;
    let abi = ContractAbi::from_artifact(contract_name, &artifact)?;

    let event = abi
        .event(event_name)
        .ok_or_else(|| ValidationError::UnknownEvent {
            contract_name: contract_name.to_string(),
            event_name: event_name.to_string(),
        })?;

    let known = match argument {
        EventArgument::Name(name) => event.inputs.iter().any(|input| &input.name == name),
        EventArgument::Index(index) => (*index as usize) < event.inputs.len(),
    };
    if !known {
        return Err(ValidationError::UnknownEventArgument {
            contract_name: contract_name.to_string(),
            event_name: event_name.to_string(),
            argument: argument.to_string(),
        });
    }

    Ok(())
}
