use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::builder::error::{ConstructionError, Result};
use crate::builder::module_builder::ModuleBuilder;
use crate::types::{Module, ModuleResult, ModuleResults};

pub type ModuleCallback =
    dyn Fn(&mut ModuleBuilder<'_>) -> Result<ModuleResults> + Send + Sync + 'static;

/// A named definition callback, turned into a [`Module`] by [`ModuleConstructor`]
#[derive(Clone)]
pub struct ModuleDefinition {
    id: String,
    callback: Arc<ModuleCallback>,
}

impl ModuleDefinition {
    pub fn id(&self) -> &str {
        &self.id
    }

    fn same_callback(&self, other: &Arc<ModuleCallback>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.callback) as *const (),
            Arc::as_ptr(other) as *const (),
        )
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

pub fn define_module<F>(id: impl Into<String>, callback: F) -> ModuleDefinition
where
    F: Fn(&mut ModuleBuilder<'_>) -> Result<ModuleResults> + Send + Sync + 'static,
{
    ModuleDefinition {
        id: id.into(),
        callback: Arc::new(callback),
    }
}

/// Construct a module with no known accounts
pub fn build_module(definition: &ModuleDefinition) -> Result<Arc<Module>> {
    ModuleConstructor::new(Vec::new()).construct(definition)
}

struct ConstructedModule {
    callback: Arc<ModuleCallback>,
    module: Arc<Module>,
}

/// Single construction pass over a tree of module definitions.
///
/// Submodules are memoized by id, so a definition used from several parents
/// yields one shared [`Module`] and one set of futures.
pub struct ModuleConstructor {
    accounts: Vec<String>,
    modules: HashMap<String, ConstructedModule>,
    in_progress: Vec<String>,
    future_owners: HashMap<String, String>,
}

impl ModuleConstructor {
    pub fn new(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            modules: HashMap::new(),
            in_progress: Vec::new(),
            future_owners: HashMap::new(),
        }
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    pub fn construct(&mut self, definition: &ModuleDefinition) -> Result<Arc<Module>> {
        if let Some(constructed) = self.modules.get(definition.id()) {
            if !definition.same_callback(&constructed.callback) {
                return Err(ConstructionError::DuplicateModuleId {
                    module_id: definition.id().to_string(),
                });
            }
            debug!("Reusing constructed module {}", definition.id());
            return Ok(Arc::clone(&constructed.module));
        }

        if self.in_progress.iter().any(|id| id == definition.id()) {
            let mut chain = self.in_progress.clone();
            chain.push(definition.id().to_string());
            return Err(ConstructionError::CyclicModuleUse {
                module_id: definition.id().to_string(),
                chain,
            });
        }

        info!("Constructing module {}", definition.id());
        self.in_progress.push(definition.id().to_string());

        let mut builder = ModuleBuilder::new(self, definition.id());
        let outcome = (definition.callback)(&mut builder);
        let (futures, submodules) = builder.into_parts();

        self.in_progress.pop();
        let results = outcome?;

        let module = Module {
            id: definition.id().to_string(),
            futures,
            submodules,
            results,
        };
        check_results(&module, &module.results)?;

        let module = Arc::new(module);
        debug!(
            "Module {} constructed with {} futures and {} submodules",
            module.id,
            module.futures.len(),
            module.submodules.len()
        );

        self.modules.insert(
            module.id.clone(),
            ConstructedModule {
                callback: Arc::clone(&definition.callback),
                module: Arc::clone(&module),
            },
        );

        Ok(module)
    }

    /// Claim a future id for the whole tree
    pub(crate) fn register_future_id(&mut self, id: &str, module_id: &str) -> Result<()> {
        if self.future_owners.contains_key(id) {
            return Err(ConstructionError::DuplicateId {
                id: id.to_string(),
                module_id: module_id.to_string(),
            });
        }
        self.future_owners
            .insert(id.to_string(), module_id.to_string());
        Ok(())
    }
}

fn check_results(module: &Module, results: &BTreeMap<String, ModuleResult>) -> Result<()> {
    for (name, result) in results {
        match result {
            ModuleResult::Future(future) => {
                if !module.contains_future(&future.id) {
                    return Err(ConstructionError::ForeignResult {
                        module_id: module.id.clone(),
                        name: name.clone(),
                        future_id: future.id.clone(),
                    });
                }
            }
            ModuleResult::Nested(nested) => check_results(module, nested)?,
        }
    }
    Ok(())
}
