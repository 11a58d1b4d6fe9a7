use super::Snapshot;
use crate::error::Result;
use crate::query::Materializer;
use crate::registry::RegistryState;
use indexmap::{IndexMap, IndexSet};
use retrieve_api::{AnnotationInstance, TypeName, TypeUniverse};
use std::sync::Arc;

/// Every distinct type named by an ingested record.
#[derive(Debug)]
pub struct TypeSetView {
    generation: u64,
    types: IndexSet<TypeName>,
}

impl TypeSetView {
    pub fn build(state: &RegistryState) -> Self {
        Self {
            generation: state.generation,
            types: state.global.types.clone(),
        }
    }

    pub fn types(&self) -> &IndexSet<TypeName> {
        &self.types
    }

    pub fn contains(&self, ty: &TypeName) -> bool {
        self.types.contains(ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Snapshot for TypeSetView {
    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Every materialized annotation instance, grouped by concrete annotation type.
#[derive(Debug)]
pub struct AttributeGroupView {
    generation: u64,
    groups: IndexMap<TypeName, Vec<Arc<AnnotationInstance>>>,
}

impl AttributeGroupView {
    pub fn build(state: &RegistryState, universe: &dyn TypeUniverse) -> Result<Self> {
        let mut keys: Vec<&TypeName> = state.global.marked.keys().collect();
        keys.sort();

        let mut materializer = Materializer::new(universe);
        for key in keys {
            materializer.collect(&state.global, key, key)?;
        }

        let mut groups: IndexMap<TypeName, Vec<Arc<AnnotationInstance>>> = IndexMap::new();
        for instance in materializer.finish() {
            groups
                .entry(instance.annotation_type().clone())
                .or_default()
                .push(instance);
        }
        Ok(Self {
            generation: state.generation,
            groups,
        })
    }

    /// Instances whose concrete type is exactly `ty`.
    pub fn of_type(&self, ty: &TypeName) -> &[Arc<AnnotationInstance>] {
        self.groups.get(ty).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&TypeName, &[Arc<AnnotationInstance>])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn instances(&self) -> impl Iterator<Item = &Arc<AnnotationInstance>> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Snapshot for AttributeGroupView {
    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Both global views, taken together.
#[derive(Debug, Clone)]
pub struct FlattenedView {
    pub types: Arc<TypeSetView>,
    pub attributes: Arc<AttributeGroupView>,
}
