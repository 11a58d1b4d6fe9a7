use super::decl::{TypeDef, TypeKind};
use super::types::TypeName;
use std::sync::Arc;

/// Lookup of live type definitions across every loaded module.
pub trait TypeUniverse: Send + Sync {
    fn find_type(&self, name: &TypeName) -> Option<Arc<TypeDef>>;

    /// `name` followed by its base-class chain, stopping at the first
    /// definition that cannot be found.
    fn base_lineage(&self, name: &TypeName) -> Vec<Arc<TypeDef>> {
        let mut lineage: Vec<Arc<TypeDef>> = Vec::new();
        let mut next = self.find_type(name);
        while let Some(def) = next {
            // Guard against malformed cyclic metadata.
            if lineage.iter().any(|d| d.name == def.name) {
                break;
            }
            next = def.base.as_ref().and_then(|b| self.find_type(&b.def));
            lineage.push(def);
        }
        lineage
    }

    fn is_annotation(&self, name: &TypeName) -> bool {
        self.find_type(name)
            .is_some_and(|def| def.kind == TypeKind::Annotation)
    }

    /// An annotation type whose lineage contains a retrievable root.
    fn is_retrievable_annotation(&self, name: &TypeName) -> bool {
        self.is_annotation(name) && self.base_lineage(name).iter().any(|d| d.retrievable)
    }
}
