use indexmap::IndexSet;
use retrieve_api::{Declaration, ModuleId, TypeName};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    InheritsFrom,
    Implements,
}

/// One direct `base -> derived` edge. `base` is always a definition name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubtypeEdge {
    pub base: TypeName,
    pub derived: TypeName,
    pub kind: EdgeKind,
}

/// Relations derived from one module's records, or the union of many.
#[derive(Debug, Clone, Default)]
pub struct ModuleContribution {
    /// Modules folded into this contribution.
    pub modules: Vec<ModuleId>,
    pub edges: IndexSet<SubtypeEdge>,
    /// Base definition -> direct subtypes.
    pub subtypes: HashMap<TypeName, IndexSet<TypeName>>,
    /// Marker annotation type -> declarations carrying it.
    pub marked: HashMap<TypeName, IndexSet<Declaration>>,
    /// Every type named by a record.
    pub types: IndexSet<TypeName>,
}

impl ModuleContribution {
    pub fn for_module(module: ModuleId) -> Self {
        Self {
            modules: vec![module],
            ..Default::default()
        }
    }

    /// Returns true if the edge is new.
    pub fn add_edge(&mut self, base: TypeName, derived: TypeName, kind: EdgeKind) -> bool {
        if base == derived {
            return false;
        }
        let edge = SubtypeEdge {
            base: base.clone(),
            derived: derived.clone(),
            kind,
        };
        if !self.edges.insert(edge) {
            return false;
        }
        self.subtypes.entry(base).or_default().insert(derived);
        true
    }

    pub fn mark(&mut self, marker: TypeName, declaration: Declaration) -> bool {
        self.marked.entry(marker).or_default().insert(declaration)
    }

    pub fn direct_subtypes(&self, base: &TypeName) -> Option<&IndexSet<TypeName>> {
        self.subtypes.get(base)
    }

    pub fn marked_with(&self, marker: &TypeName) -> Option<&IndexSet<Declaration>> {
        self.marked.get(marker)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.values().map(IndexSet::len).sum()
    }

    /// Fold `other` into `self`. Order of merges does not affect the result sets.
    pub fn merge(&mut self, other: &ModuleContribution) -> usize {
        let mut added = 0;
        for module in &other.modules {
            if !self.modules.contains(module) {
                self.modules.push(module.clone());
            }
        }
        for edge in &other.edges {
            if self.add_edge(edge.base.clone(), edge.derived.clone(), edge.kind) {
                added += 1;
            }
        }
        for (marker, decls) in &other.marked {
            for decl in decls {
                if self.mark(marker.clone(), decl.clone()) {
                    added += 1;
                }
            }
        }
        self.types.extend(other.types.iter().cloned());
        added
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.marked.is_empty() && self.types.is_empty()
    }
}
