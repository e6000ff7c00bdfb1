//! Runtime value checks against concrete parameters and accounts

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{
    fold_arguments, AccountRuntimeValue, ArgumentFold, ArgumentValue, Future, FutureKind,
    FromAddress, Literal, ModuleParameterRuntimeValue, ParameterValue, PayableValue,
};
use crate::validation::abi::{expected_parameter_type, parameter_matches, AbiParameter, ContractAbi};
use crate::validation::artifact_resolver::{contract_artifact, ArtifactResolver};
use crate::validation::error::{Result, ValidationError};

/// Parameter values supplied for a deployment: module id → name → value
pub type DeploymentParameters = BTreeMap<String, BTreeMap<String, ParameterValue>>;

pub fn validate_stage_two<R>(
    future: &Future,
    resolver: &R,
    parameters: &DeploymentParameters,
    accounts: &[String],
) -> Result<()>
where
    R: ArtifactResolver + ?Sized,
{
    let context = RuntimeValues {
        parameters,
        accounts,
    };

    match &future.kind {
        FutureKind::NamedContractDeployment {
            contract_name,
            constructor_args,
            value,
            from,
            ..
        } => {
            let artifact = resolver.resolve(contract_name)?;
            let abi = ContractAbi::from_artifact(contract_name, &artifact)?;
            context.check_from(from.as_ref())?;
            context.check_value(value)?;
            context.check_args(constructor_args, &abi.constructor_inputs)
        }
        FutureKind::ArtifactContractDeployment {
            contract_name,
            artifact,
            constructor_args,
            value,
            from,
            ..
        } => {
            let abi = ContractAbi::from_artifact(contract_name, artifact)?;
            context.check_from(from.as_ref())?;
            context.check_value(value)?;
            context.check_args(constructor_args, &abi.constructor_inputs)
        }
        FutureKind::NamedLibraryDeployment { from, .. }
        | FutureKind::ArtifactLibraryDeployment { from, .. } => context.check_from(from.as_ref()),
        FutureKind::ContractAt { .. }
        | FutureKind::ArtifactContractAt { .. }
        | FutureKind::ReadEventArgument { .. } => Ok(()),
        FutureKind::NamedContractCall {
            function_name,
            contract,
            args,
            value,
            from,
        } => {
            let inputs = function_inputs(contract, function_name, resolver)?;
            context.check_from(from.as_ref())?;
            context.check_value(value)?;
            context.check_args(args, &inputs)
        }
        FutureKind::NamedStaticCall {
            function_name,
            contract,
            args,
            from,
        } => {
            let inputs = function_inputs(contract, function_name, resolver)?;
            context.check_from(from.as_ref())?;
            context.check_args(args, &inputs)
        }
    }
}

fn function_inputs<R>(
    contract: &Arc<Future>,
    function_name: &str,
    resolver: &R,
) -> Result<Vec<AbiParameter>>
where
    R: ArtifactResolver + ?Sized,
{
    let contract_name = contract.contract_name().unwrap_or(&contract.id);
    let artifact = contract_artifact(contract, resolver)?;
    let abi = ContractAbi::from_artifact(contract_name, &artifact)?;
    Ok(abi.function(function_name)?.inputs.clone())
}

/// Look a parameter up, falling back to its default
pub fn resolve_parameter(
    parameter: &ModuleParameterRuntimeValue,
    parameters: &DeploymentParameters,
) -> Result<ParameterValue> {
    parameters
        .get(&parameter.module_id)
        .and_then(|values| values.get(&parameter.name))
        .or(parameter.default_value.as_ref())
        .cloned()
        .ok_or_else(|| ValidationError::MissingParameter {
            module_id: parameter.module_id.clone(),
            name: parameter.name.clone(),
        })
}

pub fn check_account_index(account: &AccountRuntimeValue, accounts: &[String]) -> Result<()> {
    if account.account_index < 0 {
        return Err(ValidationError::NegativeAccountIndex {
            account_index: account.account_index,
        });
    }
    if account.account_index as usize >= accounts.len() {
        return Err(ValidationError::AccountIndexOutOfRange {
            account_index: account.account_index,
            available: accounts.len(),
        });
    }
    Ok(())
}

struct RuntimeValues<'a> {
    parameters: &'a DeploymentParameters,
    accounts: &'a [String],
}

impl RuntimeValues<'_> {
    fn check_from(&self, from: Option<&FromAddress>) -> Result<()> {
        match from {
            Some(FromAddress::Account(account)) => check_account_index(account, self.accounts),
            _ => Ok(()),
        }
    }

    fn check_value(&self, value: &PayableValue) -> Result<()> {
        let PayableValue::Parameter(parameter) = value else {
            return Ok(());
        };
        match resolve_parameter(parameter, self.parameters)? {
            ParameterValue::BigInt(_) => Ok(()),
            other => Err(ValidationError::ParameterType {
                name: parameter.name.clone(),
                expected: "bigint".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Resolve every runtime value at any depth, then type-check parameters
    /// passed directly in an argument position
    fn check_args(&self, args: &[ArgumentValue], inputs: &[AbiParameter]) -> Result<()> {
        let mut checker = RuntimeValueChecker { values: self };
        fold_arguments(args, &mut checker)?;

        for (arg, input) in args.iter().zip(inputs) {
            if let ArgumentValue::ModuleParameter(parameter) = arg {
                let resolved = resolve_parameter(parameter, self.parameters)?;
                if !parameter_matches(&input.kind, &resolved) {
                    return Err(ValidationError::ParameterType {
                        name: parameter.name.clone(),
                        expected: expected_parameter_type(&input.kind).to_string(),
                        actual: resolved.type_name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

struct RuntimeValueChecker<'v, 'a> {
    values: &'v RuntimeValues<'a>,
}

impl ArgumentFold for RuntimeValueChecker<'_, '_> {
    type Output = ();
    type Error = ValidationError;

    fn fold_literal(&mut self, _literal: Literal<'_>) -> Result<()> {
        Ok(())
    }

    fn fold_future(&mut self, _future: &Arc<Future>) -> Result<()> {
        Ok(())
    }

    fn fold_account(&mut self, account: &AccountRuntimeValue) -> Result<()> {
        check_account_index(account, self.values.accounts)
    }

    fn fold_parameter(&mut self, parameter: &ModuleParameterRuntimeValue) -> Result<()> {
        resolve_parameter(parameter, self.values.parameters).map(|_| ())
    }

    fn fold_array(&mut self, _items: Vec<()>) -> Result<()> {
        Ok(())
    }

    fn fold_object(&mut self, _entries: BTreeMap<String, ()>) -> Result<()> {
        Ok(())
    }
}
