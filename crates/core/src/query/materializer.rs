//! Turns indexed declarations into bound annotation instances.

use super::resolver::is_assignable;
use crate::error::{Result, RetrieveError};
use retrieve_api::{AnnotationInstance, Declaration, TypeName, TypeRef, TypeUniverse};
use retrieve_ingest::ModuleContribution;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

pub struct Materializer<'a> {
    universe: &'a dyn TypeUniverse,
    seen: HashSet<(Declaration, TypeName)>,
    out: Vec<Arc<AnnotationInstance>>,
}

impl<'a> Materializer<'a> {
    pub fn new(universe: &'a dyn TypeUniverse) -> Self {
        Self {
            universe,
            seen: HashSet::new(),
            out: Vec::new(),
        }
    }

    /// Materialize, for every declaration indexed under `key`, each attached
    /// annotation assignable to `query`.
    ///
    /// A declaration that carries no annotation assignable to `key` means the
    /// index and the live metadata disagree; that is reported as an error
    /// rather than silently skipped.
    pub fn collect(&mut self, table: &ModuleContribution, key: &TypeName, query: &TypeName) -> Result<()> {
        let Some(declarations) = table.marked_with(key) else {
            return Ok(());
        };
        let key_ref = TypeRef::plain(key.clone());
        let query_ref = TypeRef::plain(query.clone());

        for decl in declarations {
            let attached = decl.annotations();
            if !attached
                .iter()
                .any(|a| is_assignable(self.universe, a.annotation_type(), &key_ref))
            {
                warn!(declaration = %decl, annotation = %key, "indexed declaration lost its annotation");
                return Err(RetrieveError::MetadataSkew {
                    declaration: decl.to_string(),
                    annotation: key.clone(),
                });
            }

            for annotation in attached {
                let ty = annotation.annotation_type();
                if !is_assignable(self.universe, ty, &query_ref) {
                    continue;
                }
                if self.seen.insert((decl.clone(), ty.clone())) {
                    self.out
                        .push(Arc::new(AnnotationInstance::bind(annotation, decl.clone())));
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<Arc<AnnotationInstance>> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrieve_api::{AttachedAnnotation, MemberDef, PlainAnnotation, TypeDef};
    use std::collections::HashMap;

    struct Universe(HashMap<TypeName, Arc<TypeDef>>);

    impl TypeUniverse for Universe {
        fn find_type(&self, name: &TypeName) -> Option<Arc<TypeDef>> {
            self.0.get(name).cloned()
        }
    }

    fn universe() -> Universe {
        let defs = vec![
            TypeDef::annotation("Retrieve").retrievable(),
            TypeDef::annotation("Tag").extends("Retrieve"),
            TypeDef::annotation("Other").extends("Retrieve"),
        ];
        Universe(defs.into_iter().map(|d| (d.name.clone(), Arc::new(d))).collect())
    }

    fn owner() -> Arc<TypeDef> {
        Arc::new(
            TypeDef::class("T")
                .member(
                    MemberDef::method("M")
                        .annotate(AttachedAnnotation::plain("Tag"))
                        .annotate(AttachedAnnotation::plain("Tag"))
                        .annotate(AttachedAnnotation::new("Other", PlainAnnotation::preserved())),
                )
                .member(MemberDef::method("Bare")),
        )
    }

    #[test]
    fn test_one_instance_per_declaration_and_type() {
        let universe = universe();
        let decl = Declaration::of_member(owner(), 0).unwrap();
        let mut table = ModuleContribution::default();
        table.mark(TypeName::new("Tag"), decl.clone());
        table.mark(TypeName::new("Other"), decl.clone());

        let mut m = Materializer::new(&universe);
        let root = TypeName::new("Retrieve");
        m.collect(&table, &TypeName::new("Tag"), &root).unwrap();
        m.collect(&table, &TypeName::new("Other"), &root).unwrap();
        let instances = m.finish();

        assert_eq!(instances.len(), 2);
        assert!(instances.iter().all(|i| i.target() == &decl));
        assert!(instances
            .iter()
            .any(|i| i.annotation_type().as_str() == "Other" && i.value().preserve_target()));
    }

    #[test]
    fn test_query_narrows_instances() {
        let universe = universe();
        let decl = Declaration::of_member(owner(), 0).unwrap();
        let mut table = ModuleContribution::default();
        table.mark(TypeName::new("Tag"), decl);

        let mut m = Materializer::new(&universe);
        m.collect(&table, &TypeName::new("Tag"), &TypeName::new("Tag")).unwrap();
        let instances = m.finish();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].annotation_type().as_str(), "Tag");
    }

    #[test]
    fn test_missing_annotation_is_skew() {
        let universe = universe();
        let mut table = ModuleContribution::default();
        table.mark(TypeName::new("Tag"), Declaration::of_member(owner(), 1).unwrap());

        let mut m = Materializer::new(&universe);
        let err = m
            .collect(&table, &TypeName::new("Tag"), &TypeName::new("Tag"))
            .unwrap_err();
        assert!(matches!(err, RetrieveError::MetadataSkew { .. }));
    }
}
