use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::builder::constructor::{ModuleConstructor, ModuleDefinition};
use crate::builder::error::{ConstructionError, Result};
use crate::builder::options::{
    CallOptions, ContractAtOptions, ContractOptions, LibraryOptions, ReadEventArgumentOptions,
    StaticCallOptions,
};
use crate::types::{
    collect_futures, AccountRuntimeValue, ArgumentValue, Artifact, ContractAddress,
    EventArgument, FromAddress, Future, FutureKind, Module, ModuleParameterRuntimeValue,
    ParameterValue,
};

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").unwrap());

/// API handed to a module definition callback
pub struct ModuleBuilder<'c> {
    constructor: &'c mut ModuleConstructor,
    module_id: String,
    futures: BTreeMap<String, Arc<Future>>,
    submodules: BTreeMap<String, Arc<Module>>,
}

impl<'c> ModuleBuilder<'c> {
    pub(crate) fn new(constructor: &'c mut ModuleConstructor, module_id: &str) -> Self {
        Self {
            constructor,
            module_id: module_id.to_string(),
            futures: BTreeMap::new(),
            submodules: BTreeMap::new(),
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Arc<Future>>,
        BTreeMap<String, Arc<Module>>,
    ) {
        (self.futures, self.submodules)
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    /// Accounts known to the constructor
    pub fn accounts(&self) -> &[String] {
        self.constructor.accounts()
    }

    pub fn contract(
        &mut self,
        contract_name: &str,
        args: Vec<ArgumentValue>,
        options: ContractOptions,
    ) -> Result<Arc<Future>> {
        let id = self.future_id(options.id.as_deref(), contract_name);
        self.check_libraries(&options.libraries)?;
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.extend(collect_futures(&args));
        dependencies.extend(options.libraries.values().cloned());
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::NamedContractDeployment {
                contract_name: contract_name.to_string(),
                constructor_args: args,
                libraries: options.libraries,
                value: options.value.unwrap_or_default(),
                from: options.from,
            },
        )
    }

    pub fn contract_from_artifact(
        &mut self,
        contract_name: &str,
        artifact: Artifact,
        args: Vec<ArgumentValue>,
        options: ContractOptions,
    ) -> Result<Arc<Future>> {
        let id = self.future_id(options.id.as_deref(), contract_name);
        self.check_libraries(&options.libraries)?;
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.extend(collect_futures(&args));
        dependencies.extend(options.libraries.values().cloned());
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::ArtifactContractDeployment {
                contract_name: contract_name.to_string(),
                artifact,
                constructor_args: args,
                libraries: options.libraries,
                value: options.value.unwrap_or_default(),
                from: options.from,
            },
        )
    }

    pub fn library(&mut self, library_name: &str, options: LibraryOptions) -> Result<Arc<Future>> {
        let id = self.future_id(options.id.as_deref(), library_name);
        self.check_libraries(&options.libraries)?;
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.extend(options.libraries.values().cloned());
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::NamedLibraryDeployment {
                contract_name: library_name.to_string(),
                libraries: options.libraries,
                from: options.from,
            },
        )
    }

    pub fn library_from_artifact(
        &mut self,
        library_name: &str,
        artifact: Artifact,
        options: LibraryOptions,
    ) -> Result<Arc<Future>> {
        let id = self.future_id(options.id.as_deref(), library_name);
        self.check_libraries(&options.libraries)?;
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.extend(options.libraries.values().cloned());
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::ArtifactLibraryDeployment {
                contract_name: library_name.to_string(),
                artifact,
                libraries: options.libraries,
                from: options.from,
            },
        )
    }

    pub fn call(
        &mut self,
        contract: &Arc<Future>,
        function_name: &str,
        args: Vec<ArgumentValue>,
        options: CallOptions,
    ) -> Result<Arc<Future>> {
        let contract_name = contract_name_of(contract, "the target of a call")?;
        let id = self.future_id(
            options.id.as_deref(),
            &format!("{contract_name}#{function_name}"),
        );
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.push(Arc::clone(contract));
        dependencies.extend(collect_futures(&args));
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::NamedContractCall {
                function_name: function_name.to_string(),
                contract: Arc::clone(contract),
                args,
                value: options.value.unwrap_or_default(),
                from: options.from,
            },
        )
    }

    pub fn static_call(
        &mut self,
        contract: &Arc<Future>,
        function_name: &str,
        args: Vec<ArgumentValue>,
        options: StaticCallOptions,
    ) -> Result<Arc<Future>> {
        let contract_name = contract_name_of(contract, "the target of a static call")?;
        let id = self.future_id(
            options.id.as_deref(),
            &format!("{contract_name}#{function_name}"),
        );
        self.check_from(options.from.as_ref())?;

        let mut dependencies = DependencySet::default();
        dependencies.push(Arc::clone(contract));
        dependencies.extend(collect_futures(&args));
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::NamedStaticCall {
                function_name: function_name.to_string(),
                contract: Arc::clone(contract),
                args,
                from: options.from,
            },
        )
    }

    pub fn contract_at(
        &mut self,
        contract_name: &str,
        address: impl Into<ContractAddress>,
        options: ContractAtOptions,
    ) -> Result<Arc<Future>> {
        let address = address.into();
        let id = self.future_id(options.id.as_deref(), contract_name);
        check_contract_address(&address)?;

        let mut dependencies = DependencySet::default();
        if let ContractAddress::Future(future) = &address {
            dependencies.push(Arc::clone(future));
        }
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::ContractAt {
                contract_name: contract_name.to_string(),
                address,
            },
        )
    }

    pub fn contract_at_from_artifact(
        &mut self,
        contract_name: &str,
        address: impl Into<ContractAddress>,
        artifact: Artifact,
        options: ContractAtOptions,
    ) -> Result<Arc<Future>> {
        let address = address.into();
        let id = self.future_id(options.id.as_deref(), contract_name);
        check_contract_address(&address)?;

        let mut dependencies = DependencySet::default();
        if let ContractAddress::Future(future) = &address {
            dependencies.push(Arc::clone(future));
        }
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::ArtifactContractAt {
                contract_name: contract_name.to_string(),
                address,
                artifact,
            },
        )
    }

    /// Read an argument of an event emitted while executing `future`
    pub fn read_event_argument(
        &mut self,
        future: &Arc<Future>,
        event_name: &str,
        argument: impl Into<EventArgument>,
        options: ReadEventArgumentOptions,
    ) -> Result<Arc<Future>> {
        let argument = argument.into();
        let emitter = match (options.emitter, &future.kind) {
            (Some(emitter), _) => emitter,
            (None, FutureKind::NamedContractCall { contract, .. }) => Arc::clone(contract),
            (None, _) if future.is_deployment() => Arc::clone(future),
            (None, _) => {
                return Err(ConstructionError::InvalidContractFuture {
                    future_id: future.id.clone(),
                    role: "the source of an event".to_string(),
                })
            }
        };
        let emitter_name = contract_name_of(&emitter, "an event emitter")?;

        let id = self.future_id(
            options.id.as_deref(),
            &format!(
                "{emitter_name}#{event_name}#{argument}#{}",
                options.event_index
            ),
        );

        let mut dependencies = DependencySet::default();
        dependencies.push(Arc::clone(future));
        dependencies.push(Arc::clone(&emitter));
        dependencies.extend(options.after);

        self.add_future(
            id,
            dependencies,
            FutureKind::ReadEventArgument {
                event_name: event_name.to_string(),
                argument,
                future_to_read_from: Arc::clone(future),
                emitter,
                event_index: options.event_index,
            },
        )
    }

    /// Construct (or reuse) a submodule and attach it to this module
    pub fn use_module(&mut self, definition: &ModuleDefinition) -> Result<Arc<Module>> {
        let submodule = self.constructor.construct(definition)?;
        self.submodules
            .insert(submodule.id.clone(), Arc::clone(&submodule));
        Ok(submodule)
    }

    /// Future exported by a submodule under `name`
    pub fn result_of(&self, submodule: &Module, name: &str) -> Result<Arc<Future>> {
        submodule
            .result(name)
            .cloned()
            .ok_or_else(|| ConstructionError::UnknownResult {
                module_id: submodule.id.clone(),
                name: name.to_string(),
            })
    }

    pub fn get_account(&self, account_index: i64) -> AccountRuntimeValue {
        AccountRuntimeValue::new(account_index)
    }

    pub fn get_parameter(&self, name: &str) -> ModuleParameterRuntimeValue {
        ModuleParameterRuntimeValue {
            module_id: self.module_id.clone(),
            name: name.to_string(),
            default_value: None,
        }
    }

    pub fn get_parameter_or(
        &self,
        name: &str,
        default_value: impl Into<ParameterValue>,
    ) -> ModuleParameterRuntimeValue {
        ModuleParameterRuntimeValue {
            module_id: self.module_id.clone(),
            name: name.to_string(),
            default_value: Some(default_value.into()),
        }
    }

    fn future_id(&self, explicit: Option<&str>, local_id: &str) -> String {
        format!("{}:{}", self.module_id, explicit.unwrap_or(local_id))
    }

    fn check_libraries(&self, libraries: &BTreeMap<String, Arc<Future>>) -> Result<()> {
        for (name, library) in libraries {
            if !library.is_contract() {
                return Err(ConstructionError::InvalidLibrary { name: name.clone() });
            }
        }
        Ok(())
    }

    fn check_from(&self, from: Option<&FromAddress>) -> Result<()> {
        match from {
            Some(FromAddress::Address(address)) => check_address(address, "from"),
            _ => Ok(()),
        }
    }

    fn add_future(
        &mut self,
        id: String,
        dependencies: DependencySet,
        kind: FutureKind,
    ) -> Result<Arc<Future>> {
        if self.futures.contains_key(&id) {
            return Err(ConstructionError::DuplicateId {
                id,
                module_id: self.module_id.clone(),
            });
        }
        self.constructor.register_future_id(&id, &self.module_id)?;

        let future = Arc::new(Future {
            id: id.clone(),
            module_id: self.module_id.clone(),
            dependencies: dependencies.into_vec(),
            kind,
        });
        debug!(
            "Added future {} with {} dependencies",
            future,
            future.dependencies.len()
        );

        self.futures.insert(id, Arc::clone(&future));
        Ok(future)
    }
}

fn contract_name_of<'f>(future: &'f Future, role: &str) -> Result<&'f str> {
    future
        .contract_name()
        .ok_or_else(|| ConstructionError::InvalidContractFuture {
            future_id: future.id.clone(),
            role: role.to_string(),
        })
}

fn check_address(address: &str, option: &str) -> Result<()> {
    if ADDRESS_PATTERN.is_match(address) {
        Ok(())
    } else {
        Err(ConstructionError::InvalidAddress {
            address: address.to_string(),
            option: option.to_string(),
        })
    }
}

fn check_contract_address(address: &ContractAddress) -> Result<()> {
    match address {
        ContractAddress::Literal(literal) => check_address(literal, "address"),
        ContractAddress::Future(future) => match future.kind {
            FutureKind::NamedStaticCall { .. } => Ok(()),
            _ => Err(ConstructionError::InvalidAddressFuture {
                future_id: future.id.clone(),
            }),
        },
    }
}

/// Ordered set of dependencies, keyed by future id
#[derive(Default)]
struct DependencySet {
    seen: HashSet<String>,
    futures: Vec<Arc<Future>>,
}

impl DependencySet {
    fn push(&mut self, future: Arc<Future>) {
        if self.seen.insert(future.id.clone()) {
            self.futures.push(future);
        }
    }

    fn extend(&mut self, futures: impl IntoIterator<Item = Arc<Future>>) {
        for future in futures {
            self.push(future);
        }
    }

    fn into_vec(self) -> Vec<Arc<Future>> {
        self.futures
    }
}
