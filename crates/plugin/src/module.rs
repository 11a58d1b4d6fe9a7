use crate::record::{Record, RecordTable};
use indexmap::IndexMap;
use retrieve_api::{ModuleId, TypeDef, TypeName};
use std::sync::Arc;

/// A loaded unit of compiled code, as seen by the index.
///
/// Modules expose their live type definitions and, when the analyzer processed
/// them, a record table.
pub trait ModuleSource: Send + Sync {
    fn id(&self) -> &ModuleId;

    /// Module-level marker: the analyzer ran over this module.
    fn is_instrumented(&self) -> bool;

    /// Analyzer records, in emission order. Empty for uninstrumented modules.
    fn records(&self) -> &[Record];

    fn find_type(&self, name: &TypeName) -> Option<Arc<TypeDef>>;

    fn types(&self) -> Vec<Arc<TypeDef>>;
}

/// In-memory module backed by explicit definitions.
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    instrumented: bool,
    types: IndexMap<TypeName, Arc<TypeDef>>,
    records: RecordTable,
}

impl Module {
    pub fn builder(id: impl Into<ModuleId>) -> ModuleBuilder {
        ModuleBuilder::new(id.into())
    }
}

impl ModuleSource for Module {
    fn id(&self) -> &ModuleId {
        &self.id
    }

    fn is_instrumented(&self) -> bool {
        self.instrumented
    }

    fn records(&self) -> &[Record] {
        if self.instrumented {
            self.records.get()
        } else {
            &[]
        }
    }

    fn find_type(&self, name: &TypeName) -> Option<Arc<TypeDef>> {
        self.types.get(name).cloned()
    }

    fn types(&self) -> Vec<Arc<TypeDef>> {
        self.types.values().cloned().collect()
    }
}

pub struct ModuleBuilder {
    id: ModuleId,
    instrumented: bool,
    types: IndexMap<TypeName, Arc<TypeDef>>,
    records: RecordTable,
}

impl ModuleBuilder {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            instrumented: false,
            types: IndexMap::new(),
            records: RecordTable::default(),
        }
    }

    /// Carry the analyzer marker.
    pub fn instrumented(mut self) -> Self {
        self.instrumented = true;
        self
    }

    /// Add a type definition; later definitions with the same name replace earlier ones.
    pub fn define(mut self, mut def: TypeDef) -> Self {
        def.module = self.id.clone();
        self.types.insert(def.name.clone(), Arc::new(def));
        self
    }

    pub fn records(mut self, records: Vec<Record>) -> Self {
        self.records = RecordTable::eager(records);
        self.instrumented = true;
        self
    }

    /// Records produced on first access.
    pub fn lazy_records<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> Vec<Record> + Send + Sync + 'static,
    {
        self.records = RecordTable::lazy(generator);
        self.instrumented = true;
        self
    }

    pub fn build(self) -> Arc<Module> {
        Arc::new(Module {
            id: self.id,
            instrumented: self.instrumented,
            types: self.types,
            records: self.records,
        })
    }
}
