use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

use crate::serialization::format::*;
use crate::types::{
    fold_arguments, AccountRuntimeValue, ArgumentFold, ArgumentValue, ContractAddress,
    EventArgument, FromAddress, Future, FutureKind, Literal, Module, ModuleParameterRuntimeValue,
    ModuleResult, ModuleResults, ParameterValue, PayableValue, StoredDeployment,
};

pub struct StoredDeploymentSerializer;

impl StoredDeploymentSerializer {
    pub fn serialize(deployment: &StoredDeployment) -> SerializedStoredDeployment {
        let modules: BTreeMap<String, SerializedModule> = deployment
            .module
            .all_modules()
            .iter()
            .map(|module| (module.id.clone(), serialize_module(module)))
            .collect();

        debug!(
            "Serialized deployment of {} with {} modules",
            deployment.module.id,
            modules.len()
        );

        SerializedStoredDeployment {
            details: deployment.details.clone(),
            start_module: deployment.module.id.clone(),
            modules,
        }
    }
}

fn serialize_module(module: &Arc<Module>) -> SerializedModule {
    SerializedModule {
        id: module.id.clone(),
        submodules: module.submodules.keys().cloned().collect(),
        futures: module
            .futures
            .iter()
            .map(|(id, future)| (id.clone(), serialize_future(future)))
            .collect(),
        results: serialize_results(&module.results),
    }
}

fn serialize_results(results: &ModuleResults) -> BTreeMap<String, SerializedResult> {
    results
        .iter()
        .map(|(name, result)| {
            let serialized = match result {
                ModuleResult::Future(future) => SerializedResult::Future(token(future)),
                ModuleResult::Nested(nested) => SerializedResult::Nested(serialize_results(nested)),
            };
            (name.clone(), serialized)
        })
        .collect()
}

fn serialize_future(future: &Future) -> SerializedFuture {
    let kind = match &future.kind {
        FutureKind::NamedContractDeployment {
            contract_name,
            constructor_args,
            libraries,
            value,
            from,
        } => SerializedFutureKind::NamedContractDeployment {
            contract_name: contract_name.clone(),
            constructor_args: serialize_arguments(constructor_args),
            libraries: serialize_libraries(libraries),
            value: serialize_payable(value),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::ArtifactContractDeployment {
            contract_name,
            artifact,
            constructor_args,
            libraries,
            value,
            from,
        } => SerializedFutureKind::ArtifactContractDeployment {
            contract_name: contract_name.clone(),
            artifact: artifact.clone(),
            constructor_args: serialize_arguments(constructor_args),
            libraries: serialize_libraries(libraries),
            value: serialize_payable(value),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::NamedLibraryDeployment {
            contract_name,
            libraries,
            from,
        } => SerializedFutureKind::NamedLibraryDeployment {
            contract_name: contract_name.clone(),
            libraries: serialize_libraries(libraries),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::ArtifactLibraryDeployment {
            contract_name,
            artifact,
            libraries,
            from,
        } => SerializedFutureKind::ArtifactLibraryDeployment {
            contract_name: contract_name.clone(),
            artifact: artifact.clone(),
            libraries: serialize_libraries(libraries),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::ContractAt {
            contract_name,
            address,
        } => SerializedFutureKind::ContractAt {
            contract_name: contract_name.clone(),
            address: serialize_address(address),
        },
        FutureKind::ArtifactContractAt {
            contract_name,
            address,
            artifact,
        } => SerializedFutureKind::ArtifactContractAt {
            contract_name: contract_name.clone(),
            address: serialize_address(address),
            artifact: artifact.clone(),
        },
        FutureKind::NamedContractCall {
            function_name,
            contract,
            args,
            value,
            from,
        } => SerializedFutureKind::NamedContractCall {
            function_name: function_name.clone(),
            contract: token(contract),
            args: serialize_arguments(args),
            value: serialize_payable(value),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::NamedStaticCall {
            function_name,
            contract,
            args,
            from,
        } => SerializedFutureKind::NamedStaticCall {
            function_name: function_name.clone(),
            contract: token(contract),
            args: serialize_arguments(args),
            from: from.as_ref().map(serialize_from),
        },
        FutureKind::ReadEventArgument {
            event_name,
            argument,
            future_to_read_from,
            emitter,
            event_index,
        } => SerializedFutureKind::ReadEventArgument {
            event_name: event_name.clone(),
            name_or_index: match argument {
                EventArgument::Name(name) => SerializedEventArgument::Name(name.clone()),
                EventArgument::Index(index) => SerializedEventArgument::Index(*index),
            },
            future_to_read_from: token(future_to_read_from),
            emitter: token(emitter),
            event_index: *event_index,
        },
    };

    SerializedFuture {
        id: future.id.clone(),
        module_id: future.module_id.clone(),
        dependencies: future.dependencies.iter().map(|dep| token(dep)).collect(),
        kind,
    }
}

fn token(future: &Future) -> FutureToken {
    FutureToken::new(future.id.clone())
}

fn serialize_libraries(libraries: &BTreeMap<String, Arc<Future>>) -> BTreeMap<String, FutureToken> {
    libraries
        .iter()
        .map(|(name, library)| (name.clone(), token(library)))
        .collect()
}

fn serialize_arguments(args: &[ArgumentValue]) -> Vec<SerializedArgumentValue> {
    match fold_arguments(args, &mut ArgumentSerializer) {
        Ok(serialized) => serialized,
        Err(never) => match never {},
    }
}

pub(crate) fn serialize_bigint(value: &num_bigint::BigInt) -> SerializedBigInt {
    SerializedBigInt {
        kind: BigIntKind::BigInt,
        value: value.to_string(),
    }
}

fn serialize_account(account: &AccountRuntimeValue) -> SerializedAccount {
    SerializedAccount {
        kind: AccountKind::AccountRuntimeValue,
        account_index: account.account_index,
    }
}

fn serialize_parameter(parameter: &ModuleParameterRuntimeValue) -> SerializedModuleParameter {
    SerializedModuleParameter {
        kind: ModuleParameterKind::ModuleParameterRuntimeValue,
        module_id: parameter.module_id.clone(),
        name: parameter.name.clone(),
        default_value: parameter.default_value.as_ref().map(|value| match value {
            ParameterValue::Bool(b) => SerializedParameterValue::Bool(*b),
            ParameterValue::Number(n) => SerializedParameterValue::Number(n.clone()),
            ParameterValue::String(s) => SerializedParameterValue::String(s.clone()),
            ParameterValue::BigInt(b) => SerializedParameterValue::BigInt(serialize_bigint(b)),
        }),
    }
}

fn serialize_payable(value: &PayableValue) -> SerializedPayableValue {
    match value {
        PayableValue::Amount(amount) => SerializedPayableValue::Amount(serialize_bigint(amount)),
        PayableValue::Parameter(parameter) => {
            SerializedPayableValue::Parameter(serialize_parameter(parameter))
        }
    }
}

fn serialize_from(from: &FromAddress) -> SerializedFromAddress {
    match from {
        FromAddress::Address(address) => SerializedFromAddress::Address(address.clone()),
        FromAddress::Account(account) => SerializedFromAddress::Account(serialize_account(account)),
    }
}

fn serialize_address(address: &ContractAddress) -> SerializedContractAddress {
    match address {
        ContractAddress::Literal(literal) => SerializedContractAddress::Literal(literal.clone()),
        ContractAddress::Future(future) => SerializedContractAddress::Future(token(future)),
    }
}

struct ArgumentSerializer;

impl ArgumentFold for ArgumentSerializer {
    type Output = SerializedArgumentValue;
    type Error = Infallible;

    fn fold_literal(&mut self, literal: Literal<'_>) -> Result<Self::Output, Infallible> {
        Ok(match literal {
            Literal::Bool(b) => SerializedArgumentValue::Bool(b),
            Literal::Number(n) => SerializedArgumentValue::Number(n.clone()),
            Literal::BigInt(b) => SerializedArgumentValue::BigInt(serialize_bigint(b)),
            Literal::String(s) => SerializedArgumentValue::String(s.to_string()),
        })
    }

    fn fold_future(&mut self, future: &Arc<Future>) -> Result<Self::Output, Infallible> {
        Ok(SerializedArgumentValue::Future(token(future)))
    }

    fn fold_account(&mut self, account: &AccountRuntimeValue) -> Result<Self::Output, Infallible> {
        Ok(SerializedArgumentValue::Account(serialize_account(account)))
    }

    fn fold_parameter(
        &mut self,
        parameter: &ModuleParameterRuntimeValue,
    ) -> Result<Self::Output, Infallible> {
        Ok(SerializedArgumentValue::ModuleParameter(serialize_parameter(
            parameter,
        )))
    }

    fn fold_array(&mut self, items: Vec<Self::Output>) -> Result<Self::Output, Infallible> {
        Ok(SerializedArgumentValue::Array(items))
    }

    fn fold_object(
        &mut self,
        entries: BTreeMap<String, Self::Output>,
    ) -> Result<Self::Output, Infallible> {
        Ok(SerializedArgumentValue::Object(entries))
    }
}
