//! Per-action options accepted by [`ModuleBuilder`](super::ModuleBuilder)

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{FromAddress, Future, PayableValue};

#[derive(Debug, Clone, Default)]
pub struct ContractOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
    pub libraries: BTreeMap<String, Arc<Future>>,
    pub value: Option<PayableValue>,
    pub from: Option<FromAddress>,
}

impl ContractOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }

    pub fn library(mut self, name: impl Into<String>, library: &Arc<Future>) -> Self {
        self.libraries.insert(name.into(), Arc::clone(library));
        self
    }

    pub fn value(mut self, value: impl Into<PayableValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn from(mut self, from: impl Into<FromAddress>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LibraryOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
    pub libraries: BTreeMap<String, Arc<Future>>,
    pub from: Option<FromAddress>,
}

impl LibraryOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }

    pub fn library(mut self, name: impl Into<String>, library: &Arc<Future>) -> Self {
        self.libraries.insert(name.into(), Arc::clone(library));
        self
    }

    pub fn from(mut self, from: impl Into<FromAddress>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
    pub value: Option<PayableValue>,
    pub from: Option<FromAddress>,
}

impl CallOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }

    pub fn value(mut self, value: impl Into<PayableValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn from(mut self, from: impl Into<FromAddress>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCallOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
    pub from: Option<FromAddress>,
}

impl StaticCallOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }

    pub fn from(mut self, from: impl Into<FromAddress>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContractAtOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
}

impl ContractAtOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadEventArgumentOptions {
    pub id: Option<String>,
    pub after: Vec<Arc<Future>>,
    /// Contract emitting the event, defaults to the contract behind the read future
    pub emitter: Option<Arc<Future>>,
    pub event_index: u64,
}

impl ReadEventArgumentOptions {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after<'a>(mut self, futures: impl IntoIterator<Item = &'a Arc<Future>>) -> Self {
        self.after.extend(futures.into_iter().cloned());
        self
    }

    pub fn emitter(mut self, emitter: &Arc<Future>) -> Self {
        self.emitter = Some(Arc::clone(emitter));
        self
    }

    pub fn event_index(mut self, event_index: u64) -> Self {
        self.event_index = event_index;
        self
    }
}
