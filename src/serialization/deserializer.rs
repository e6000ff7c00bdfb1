use num_bigint::BigInt;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::serialization::error::{Result, SerializationError};
use crate::serialization::format::*;
use crate::types::{
    AccountRuntimeValue, ArgumentValue, ContractAddress, EventArgument, FromAddress, Future,
    FutureKind, Module, ModuleParameterRuntimeValue, ModuleResult, ModuleResults,
    ParameterValue, PayableValue, StoredDeployment,
};

pub struct StoredDeploymentDeserializer;

impl StoredDeploymentDeserializer {
    pub fn deserialize(serialized: &SerializedStoredDeployment) -> Result<StoredDeployment> {
        let mut context = DeserializationContext::index(serialized)?;
        let module = context.module(&serialized.start_module, "startModule")?;
        context.ensure_fully_resolved()?;

        debug!(
            "Deserialized deployment of {} with {} futures",
            module.id,
            context.futures.len()
        );

        Ok(StoredDeployment::new(serialized.details.clone(), module))
    }
}

/// Id tables shared by the whole deployment, so a future referenced from
/// several places is built once
struct DeserializationContext<'s> {
    serialized_modules: &'s BTreeMap<String, SerializedModule>,
    serialized_futures: HashMap<&'s str, &'s SerializedFuture>,
    futures: HashMap<String, Arc<Future>>,
    modules: HashMap<String, Arc<Module>>,
    futures_in_progress: HashSet<String>,
    modules_in_progress: HashSet<String>,
}

impl<'s> DeserializationContext<'s> {
    /// First pass: index every module and future by id
    fn index(serialized: &'s SerializedStoredDeployment) -> Result<Self> {
        if !serialized.modules.contains_key(&serialized.start_module) {
            return Err(SerializationError::UnknownStartModule {
                module_id: serialized.start_module.clone(),
            });
        }

        let mut serialized_futures = HashMap::new();
        for (key, module) in &serialized.modules {
            if key != &module.id {
                return Err(SerializationError::ModuleKeyMismatch {
                    key: key.clone(),
                    module_id: module.id.clone(),
                });
            }
            for submodule_id in &module.submodules {
                if !serialized.modules.contains_key(submodule_id) {
                    return Err(SerializationError::UnknownModule {
                        module_id: submodule_id.clone(),
                        referenced_by: module.id.clone(),
                    });
                }
            }
            for future in module.futures.values() {
                if future.module_id != module.id {
                    return Err(SerializationError::FutureModuleMismatch {
                        future_id: future.id.clone(),
                        module_id: future.module_id.clone(),
                        stored_in: module.id.clone(),
                    });
                }
                if serialized_futures.insert(future.id.as_str(), future).is_some() {
                    return Err(SerializationError::DuplicateFuture {
                        future_id: future.id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            serialized_modules: &serialized.modules,
            serialized_futures,
            futures: HashMap::new(),
            modules: HashMap::new(),
            futures_in_progress: HashSet::new(),
            modules_in_progress: HashSet::new(),
        })
    }

    fn module(&mut self, module_id: &str, referenced_by: &str) -> Result<Arc<Module>> {
        if let Some(module) = self.modules.get(module_id) {
            return Ok(Arc::clone(module));
        }
        let serialized_modules = self.serialized_modules;
        let serialized = serialized_modules.get(module_id).ok_or_else(|| {
            SerializationError::UnknownModule {
                module_id: module_id.to_string(),
                referenced_by: referenced_by.to_string(),
            }
        })?;
        if !self.modules_in_progress.insert(module_id.to_string()) {
            return Err(SerializationError::ModuleCycle {
                module_id: module_id.to_string(),
            });
        }

        let mut submodules = BTreeMap::new();
        for submodule_id in &serialized.submodules {
            let submodule = self.module(submodule_id, module_id)?;
            submodules.insert(submodule_id.clone(), submodule);
        }

        let mut futures = BTreeMap::new();
        for future_id in serialized.futures.keys() {
            futures.insert(future_id.clone(), self.future(future_id, module_id)?);
        }

        let results = self.results(&serialized.results, module_id)?;

        self.modules_in_progress.remove(module_id);
        let module = Arc::new(Module {
            id: module_id.to_string(),
            futures,
            submodules,
            results,
        });
        self.modules
            .insert(module_id.to_string(), Arc::clone(&module));
        Ok(module)
    }

    fn results(
        &mut self,
        results: &BTreeMap<String, SerializedResult>,
        module_id: &str,
    ) -> Result<ModuleResults> {
        let mut restored = ModuleResults::new();
        for (name, result) in results {
            let result = match result {
                SerializedResult::Future(token) => {
                    ModuleResult::Future(self.resolve(token, module_id)?)
                }
                SerializedResult::Nested(nested) => {
                    ModuleResult::Nested(self.results(nested, module_id)?)
                }
            };
            restored.insert(name.clone(), result);
        }
        Ok(restored)
    }

    fn resolve(&mut self, token: &FutureToken, referenced_by: &str) -> Result<Arc<Future>> {
        self.future(&token.future_id, referenced_by)
    }

    /// Second pass: build a future after everything it references
    fn future(&mut self, future_id: &str, referenced_by: &str) -> Result<Arc<Future>> {
        if let Some(future) = self.futures.get(future_id) {
            return Ok(Arc::clone(future));
        }
        let serialized = *self.serialized_futures.get(future_id).ok_or_else(|| {
            SerializationError::UnresolvedToken {
                future_id: future_id.to_string(),
                referenced_by: referenced_by.to_string(),
            }
        })?;
        if !self.futures_in_progress.insert(future_id.to_string()) {
            return Err(SerializationError::FutureCycle {
                future_id: future_id.to_string(),
            });
        }

        let id = serialized.id.as_str();
        let dependencies = serialized
            .dependencies
            .iter()
            .map(|token| self.resolve(token, id))
            .collect::<Result<Vec<_>>>()?;
        let kind = self.future_kind(&serialized.kind, id)?;

        self.futures_in_progress.remove(future_id);
        let future = Arc::new(Future {
            id: serialized.id.clone(),
            module_id: serialized.module_id.clone(),
            dependencies,
            kind,
        });
        self.futures
            .insert(future.id.clone(), Arc::clone(&future));
        Ok(future)
    }

    fn future_kind(&mut self, kind: &SerializedFutureKind, id: &str) -> Result<FutureKind> {
        Ok(match kind {
            SerializedFutureKind::NamedContractDeployment {
                contract_name,
                constructor_args,
                libraries,
                value,
                from,
            } => FutureKind::NamedContractDeployment {
                contract_name: contract_name.clone(),
                constructor_args: self.arguments(constructor_args, id)?,
                libraries: self.libraries(libraries, id)?,
                value: payable(value)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::ArtifactContractDeployment {
                contract_name,
                artifact,
                constructor_args,
                libraries,
                value,
                from,
            } => FutureKind::ArtifactContractDeployment {
                contract_name: contract_name.clone(),
                artifact: artifact.clone(),
                constructor_args: self.arguments(constructor_args, id)?,
                libraries: self.libraries(libraries, id)?,
                value: payable(value)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::NamedLibraryDeployment {
                contract_name,
                libraries,
                from,
            } => FutureKind::NamedLibraryDeployment {
                contract_name: contract_name.clone(),
                libraries: self.libraries(libraries, id)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::ArtifactLibraryDeployment {
                contract_name,
                artifact,
                libraries,
                from,
            } => FutureKind::ArtifactLibraryDeployment {
                contract_name: contract_name.clone(),
                artifact: artifact.clone(),
                libraries: self.libraries(libraries, id)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::ContractAt {
                contract_name,
                address,
            } => FutureKind::ContractAt {
                contract_name: contract_name.clone(),
                address: self.address(address, id)?,
            },
            SerializedFutureKind::ArtifactContractAt {
                contract_name,
                address,
                artifact,
            } => FutureKind::ArtifactContractAt {
                contract_name: contract_name.clone(),
                address: self.address(address, id)?,
                artifact: artifact.clone(),
            },
            SerializedFutureKind::NamedContractCall {
                function_name,
                contract,
                args,
                value,
                from,
            } => FutureKind::NamedContractCall {
                function_name: function_name.clone(),
                contract: self.resolve(contract, id)?,
                args: self.arguments(args, id)?,
                value: payable(value)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::NamedStaticCall {
                function_name,
                contract,
                args,
                from,
            } => FutureKind::NamedStaticCall {
                function_name: function_name.clone(),
                contract: self.resolve(contract, id)?,
                args: self.arguments(args, id)?,
                from: from.as_ref().map(from_address),
            },
            SerializedFutureKind::ReadEventArgument {
                event_name,
                name_or_index,
                future_to_read_from,
                emitter,
                event_index,
            } => FutureKind::ReadEventArgument {
                event_name: event_name.clone(),
                argument: match name_or_index {
                    SerializedEventArgument::Name(name) => EventArgument::Name(name.clone()),
                    SerializedEventArgument::Index(index) => EventArgument::Index(*index),
                },
                future_to_read_from: self.resolve(future_to_read_from, id)?,
                emitter: self.resolve(emitter, id)?,
                event_index: *event_index,
            },
        })
    }

    fn libraries(
        &mut self,
        libraries: &BTreeMap<String, FutureToken>,
        id: &str,
    ) -> Result<BTreeMap<String, Arc<Future>>> {
        libraries
            .iter()
            .map(|(name, token)| Ok((name.clone(), self.resolve(token, id)?)))
            .collect()
    }

    fn address(&mut self, address: &SerializedContractAddress, id: &str) -> Result<ContractAddress> {
        Ok(match address {
            SerializedContractAddress::Literal(literal) => ContractAddress::Literal(literal.clone()),
            SerializedContractAddress::Future(token) => ContractAddress::Future(self.resolve(token, id)?),
        })
    }

    fn arguments(&mut self, args: &[SerializedArgumentValue], id: &str) -> Result<Vec<ArgumentValue>> {
        args.iter().map(|arg| self.argument(arg, id)).collect()
    }

    fn argument(&mut self, arg: &SerializedArgumentValue, id: &str) -> Result<ArgumentValue> {
        Ok(match arg {
            SerializedArgumentValue::Bool(b) => ArgumentValue::Bool(*b),
            SerializedArgumentValue::Number(n) => ArgumentValue::Number(n.clone()),
            SerializedArgumentValue::String(s) => ArgumentValue::String(s.clone()),
            SerializedArgumentValue::BigInt(b) => ArgumentValue::BigInt(bigint(b)?),
            SerializedArgumentValue::Array(items) => ArgumentValue::Array(self.arguments(items, id)?),
            SerializedArgumentValue::Object(entries) => ArgumentValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.argument(value, id)?)))
                    .collect::<Result<_>>()?,
            ),
            SerializedArgumentValue::Future(token) => ArgumentValue::Future(self.resolve(token, id)?),
            SerializedArgumentValue::Account(account) => {
                ArgumentValue::Account(AccountRuntimeValue::new(account.account_index))
            }
            SerializedArgumentValue::ModuleParameter(parameter) => {
                ArgumentValue::ModuleParameter(module_parameter(parameter)?)
            }
        })
    }

    /// Every indexed future must have been reached from the start module
    fn ensure_fully_resolved(&self) -> Result<()> {
        let mut unresolved: Vec<&&str> = self
            .serialized_futures
            .keys()
            .filter(|id| !self.futures.contains_key(**id))
            .collect();
        unresolved.sort();
        match unresolved.first() {
            Some(future_id) => Err(SerializationError::UnresolvedFuture {
                future_id: future_id.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn bigint(value: &SerializedBigInt) -> Result<BigInt> {
    value
        .value
        .parse()
        .map_err(|_| SerializationError::InvalidBigInt {
            value: value.value.clone(),
        })
}

pub fn parameter_value(value: &SerializedParameterValue) -> Result<ParameterValue> {
    Ok(match value {
        SerializedParameterValue::Bool(b) => ParameterValue::Bool(*b),
        SerializedParameterValue::Number(n) => ParameterValue::Number(n.clone()),
        SerializedParameterValue::String(s) => ParameterValue::String(s.clone()),
        SerializedParameterValue::BigInt(b) => ParameterValue::BigInt(bigint(b)?),
    })
}

fn module_parameter(parameter: &SerializedModuleParameter) -> Result<ModuleParameterRuntimeValue> {
    Ok(ModuleParameterRuntimeValue {
        module_id: parameter.module_id.clone(),
        name: parameter.name.clone(),
        default_value: parameter
            .default_value
            .as_ref()
            .map(parameter_value)
            .transpose()?,
    })
}

fn payable(value: &SerializedPayableValue) -> Result<PayableValue> {
    Ok(match value {
        SerializedPayableValue::Amount(amount) => PayableValue::Amount(bigint(amount)?),
        SerializedPayableValue::Parameter(parameter) => {
            PayableValue::Parameter(module_parameter(parameter)?)
        }
    })
}

fn from_address(from: &SerializedFromAddress) -> FromAddress {
    match from {
        SerializedFromAddress::Address(address) => FromAddress::Address(address.clone()),
        SerializedFromAddress::Account(account) => {
            FromAddress::Account(AccountRuntimeValue::new(account.account_index))
        }
    }
}
