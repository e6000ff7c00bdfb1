use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::types::future::Future;

/// Exported result of a module: a future or a nested mapping of results
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleResult {
    Future(Arc<Future>),
    Nested(ModuleResults),
}

pub type ModuleResults = BTreeMap<String, ModuleResult>;

impl From<Arc<Future>> for ModuleResult {
    fn from(future: Arc<Future>) -> Self {
        ModuleResult::Future(future)
    }
}

impl From<&Arc<Future>> for ModuleResult {
    fn from(future: &Arc<Future>) -> Self {
        ModuleResult::Future(Arc::clone(future))
    }
}

impl From<ModuleResults> for ModuleResult {
    fn from(results: ModuleResults) -> Self {
        ModuleResult::Nested(results)
    }
}

/// Build a result mapping from `(name, future)` pairs
pub fn results<I, K, V>(entries: I) -> ModuleResults
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ModuleResult>,
{
    entries
        .into_iter()
        .map(|(name, result)| (name.into(), result.into()))
        .collect()
}

impl ModuleResult {
    /// Every future reachable through this result, depth first
    pub fn futures(&self) -> Vec<&Arc<Future>> {
        match self {
            ModuleResult::Future(future) => vec![future],
            ModuleResult::Nested(nested) => nested.values().flat_map(|r| r.futures()).collect(),
        }
    }
}

/// Self-contained graph of futures and submodules with exported results.
///
/// Futures and submodules are keyed by id so iteration order is stable,
/// which keeps serialized output deterministic.
#[derive(Debug, PartialEq)]
pub struct Module {
    pub id: String,
    pub futures: BTreeMap<String, Arc<Future>>,
    pub submodules: BTreeMap<String, Arc<Module>>,
    pub results: ModuleResults,
}

impl Module {
    /// Top-level result that is a future
    pub fn result(&self, name: &str) -> Option<&Arc<Future>> {
        match self.results.get(name) {
            Some(ModuleResult::Future(future)) => Some(future),
            _ => None,
        }
    }

    /// Result reached by walking nested result mappings
    pub fn result_at(&self, path: &[&str]) -> Option<&Arc<Future>> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.results;
        for segment in parents {
            match current.get(*segment)? {
                ModuleResult::Nested(nested) => current = nested,
                ModuleResult::Future(_) => return None,
            }
        }
        match current.get(*last)? {
            ModuleResult::Future(future) => Some(future),
            ModuleResult::Nested(_) => None,
        }
    }

    /// Whether the future belongs to this module or a transitive submodule
    pub fn contains_future(&self, future_id: &str) -> bool {
        self.futures.contains_key(future_id)
            || self
                .submodules
                .values()
                .any(|submodule| submodule.contains_future(future_id))
    }

    /// This module and every transitive submodule, each exactly once
    pub fn all_modules(self: &Arc<Self>) -> Vec<Arc<Module>> {
        let mut seen = HashSet::new();
        let mut modules = Vec::new();
        collect_modules(self, &mut seen, &mut modules);
        modules
    }

    /// Every future in the module tree, each exactly once, submodules first
    pub fn all_futures(self: &Arc<Self>) -> Vec<Arc<Future>> {
        let mut seen = HashSet::new();
        let mut futures = Vec::new();
        for module in self.all_modules().iter().rev() {
            for future in module.futures.values() {
                if seen.insert(future.id.clone()) {
                    futures.push(Arc::clone(future));
                }
            }
        }
        futures
    }

    pub fn find_module(self: &Arc<Self>, module_id: &str) -> Option<Arc<Module>> {
        self.all_modules()
            .into_iter()
            .find(|module| module.id == module_id)
    }
}

fn collect_modules(module: &Arc<Module>, seen: &mut HashSet<String>, out: &mut Vec<Arc<Module>>) {
    if !seen.insert(module.id.clone()) {
        return;
    }
    out.push(Arc::clone(module));
    for submodule in module.submodules.values() {
        collect_modules(submodule, seen, out);
    }
}
