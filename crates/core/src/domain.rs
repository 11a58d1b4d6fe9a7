//! The set of modules loaded into the running program.

use dashmap::DashMap;
use indexmap::IndexMap;
use retrieve_api::{ModuleId, TypeDef, TypeName, TypeUniverse};
use retrieve_plugin::ModuleSource;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Loaded modules plus a type lookup across all of them.
///
/// Modules are only ever added. When two modules define the same type name
/// the first one loaded wins.
#[derive(Default)]
pub struct Domain {
    modules: RwLock<IndexMap<ModuleId, Arc<dyn ModuleSource>>>,
    type_index: DashMap<TypeName, Arc<TypeDef>>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modules<I>(modules: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Arc<dyn ModuleSource>>,
    {
        let domain = Self::new();
        for module in modules {
            domain.load(module);
        }
        Arc::new(domain)
    }

    /// Returns false if a module with the same id is already loaded.
    pub fn load(&self, module: Arc<dyn ModuleSource>) -> bool {
        let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
        if modules.contains_key(module.id()) {
            return false;
        }
        for def in module.types() {
            self.type_index.entry(def.name.clone()).or_insert(def);
        }
        debug!(module = %module.id(), instrumented = module.is_instrumented(), "module loaded");
        modules.insert(module.id().clone(), module);
        true
    }

    pub fn module(&self, id: &ModuleId) -> Option<Arc<dyn ModuleSource>> {
        let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
        modules.get(id).cloned()
    }

    /// Snapshot of the loaded modules in load order.
    pub fn modules(&self) -> Vec<Arc<dyn ModuleSource>> {
        let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
        modules.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeUniverse for Domain {
    fn find_type(&self, name: &TypeName) -> Option<Arc<TypeDef>> {
        self.type_index.get(name).map(|entry| entry.value().clone())
    }
}
