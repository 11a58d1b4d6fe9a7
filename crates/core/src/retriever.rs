//! The retrieval engine: ingestion on demand, queries and cached views.

use crate::cache::{AttributeGroupView, FlattenedView, SnapshotCache, TypeSetView};
use crate::config::RetrieverConfig;
use crate::domain::Domain;
use crate::error::{Result, RetrieveError};
use crate::query::{Materializer, SubtypeResolver, supertype_closure};
use crate::registry::Registry;
use retrieve_api::{
    AnnotationInstance, GenericShape, ModuleId, TypeKind, TypeName, TypeRef, TypeUniverse,
};
use retrieve_ingest::ModuleContribution;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Retriever {
    domain: Arc<Domain>,
    registry: Registry,
    config: RetrieverConfig,
    type_view: SnapshotCache<TypeSetView>,
    attribute_view: SnapshotCache<AttributeGroupView>,
}

pub struct RetrieverBuilder {
    domain: Arc<Domain>,
    config: RetrieverConfig,
}

impl RetrieverBuilder {
    pub fn new(domain: Arc<Domain>) -> Self {
        Self {
            domain,
            config: RetrieverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RetrieverConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the configuration from `RETRIEVE_CONFIG` and `RETRIEVE_*` variables.
    pub fn with_env_config(self) -> Result<Self> {
        Ok(self.with_config(RetrieverConfig::from_env()?))
    }

    pub fn build(self) -> Retriever {
        Retriever {
            domain: self.domain,
            registry: Registry::new(),
            type_view: SnapshotCache::new(self.config.retain_views),
            attribute_view: SnapshotCache::new(self.config.retain_views),
            config: self.config,
        }
    }
}

impl Retriever {
    pub fn builder(domain: Arc<Domain>) -> RetrieverBuilder {
        RetrieverBuilder::new(domain)
    }

    pub fn new(domain: Arc<Domain>) -> Self {
        Self::builder(domain).build()
    }

    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Ingest eligible modules loaded since the last call.
    pub fn sync(&self) -> Result<usize> {
        self.registry.sync(&self.domain, self.config.parallel_ingest)
    }

    // ---- Subtype queries ----

    pub fn subtypes_of(&self, base: &TypeRef) -> Result<Vec<TypeName>> {
        self.check_subtype_query(base)?;
        self.sync()?;
        let state = self.registry.read();
        SubtypeResolver::new(&state.graph, self.domain.as_ref()).subtypes_of(base, &state.global)
    }

    pub fn subtypes_of_in(&self, base: &TypeRef, module: &ModuleId) -> Result<Vec<TypeName>> {
        self.check_subtype_query(base)?;
        let Some(contribution) = self.module_contribution(module)? else {
            return Ok(Vec::new());
        };
        let state = self.registry.read();
        SubtypeResolver::new(&state.graph, self.domain.as_ref()).subtypes_of(base, &contribution)
    }

    // ---- Annotation queries ----

    pub fn attributes_of(&self, annotation_type: &TypeName) -> Result<Vec<Arc<AnnotationInstance>>> {
        self.check_annotation_query(annotation_type)?;
        self.sync()?;
        let view = self.attribute_view()?;
        let candidates = self.annotation_candidates(annotation_type)?;
        Ok(candidates
            .iter()
            .flat_map(|c| view.of_type(c).iter().cloned())
            .collect())
    }

    pub fn attributes_of_in(
        &self,
        annotation_type: &TypeName,
        module: &ModuleId,
    ) -> Result<Vec<Arc<AnnotationInstance>>> {
        self.check_annotation_query(annotation_type)?;
        let Some(contribution) = self.module_contribution(module)? else {
            return Ok(Vec::new());
        };
        let candidates = self.annotation_candidates(annotation_type)?;
        let mut materializer = Materializer::new(self.domain.as_ref());
        for candidate in &candidates {
            materializer.collect(&contribution, candidate, annotation_type)?;
        }
        Ok(materializer.finish())
    }

    // ---- Flattened views ----

    pub fn flattened_view(&self) -> Result<FlattenedView> {
        self.sync()?;
        Ok(FlattenedView {
            types: self.type_view()?,
            attributes: self.attribute_view()?,
        })
    }

    /// Every type named by a record of an ingested module.
    pub fn get_all_indexed_types(&self) -> Result<Vec<TypeName>> {
        self.sync()?;
        Ok(self.type_view()?.types().iter().cloned().collect())
    }

    /// Every annotation instance reachable through the index.
    pub fn get_all_attribute_instances(&self) -> Result<Vec<Arc<AnnotationInstance>>> {
        self.sync()?;
        Ok(self.attribute_view()?.instances().cloned().collect())
    }

    /// Whether `ty` sits in a subtype-collecting lineage or is a retrievable
    /// annotation type.
    pub fn is_type_retrievable(&self, ty: &TypeName) -> bool {
        self.domain.is_retrievable_annotation(ty)
            || supertype_closure(self.domain.as_ref(), ty)
                .iter()
                .any(|def| def.collect_subtypes.is_some())
    }

    /// Drop strong references to the flattened views. Callers holding a view
    /// keep it; the next query rebuilds what is gone.
    pub fn release_views(&self) {
        debug!("releasing flattened views");
        self.type_view.release();
        self.attribute_view.release();
    }

    /// Discard the flattened views so the next query rebuilds them.
    pub fn invalidate(&self) {
        info!("invalidating flattened views");
        self.type_view.invalidate();
        self.attribute_view.invalidate();
    }

    // ---- Internals ----

    fn type_view(&self) -> Result<Arc<TypeSetView>> {
        let generation = self.registry.generation();
        self.type_view.get_or_build(generation, || {
            Ok::<_, RetrieveError>(TypeSetView::build(&self.registry.read()))
        })
    }

    fn attribute_view(&self) -> Result<Arc<AttributeGroupView>> {
        let generation = self.registry.generation();
        self.attribute_view.get_or_build(generation, || {
            let state = self.registry.read();
            AttributeGroupView::build(&state, self.domain.as_ref())
        })
    }

    /// Sync, then the contribution of `module`; `None` if it is not loaded or
    /// not eligible.
    fn module_contribution(&self, module: &ModuleId) -> Result<Option<Arc<ModuleContribution>>> {
        let Some(source) = self.domain.module(module) else {
            return Ok(None);
        };
        if !Registry::is_eligible(source.as_ref()) {
            return Ok(None);
        }
        self.sync()?;
        self.registry.ensure_ingested(source.as_ref(), self.domain.as_ref())
    }

    /// `annotation_type` followed by all of its subtypes.
    fn annotation_candidates(&self, annotation_type: &TypeName) -> Result<Vec<TypeName>> {
        let state = self.registry.read();
        let subtypes = SubtypeResolver::new(&state.graph, self.domain.as_ref())
            .descendants_of(&TypeRef::plain(annotation_type.clone()), &state.global)?;
        let mut candidates = Vec::with_capacity(subtypes.len() + 1);
        candidates.push(annotation_type.clone());
        candidates.extend(subtypes);
        Ok(candidates)
    }

    fn check_subtype_query(&self, base: &TypeRef) -> Result<()> {
        if base.shape() == GenericShape::Partial {
            return Err(RetrieveError::UnsupportedGenericQuery(base.clone()));
        }
        if self.config.strict {
            if self.domain.find_type(&base.def).is_none() {
                return Err(RetrieveError::UnknownType(base.def.clone()));
            }
            if !self.is_type_retrievable(&base.def) {
                return Err(RetrieveError::NotRetrievable(base.def.clone()));
            }
        }
        Ok(())
    }

    fn check_annotation_query(&self, annotation_type: &TypeName) -> Result<()> {
        let def = self
            .domain
            .find_type(annotation_type)
            .ok_or_else(|| RetrieveError::UnknownType(annotation_type.clone()))?;
        if def.kind != TypeKind::Annotation {
            return Err(RetrieveError::NotAnAnnotation(annotation_type.clone()));
        }
        if self.config.strict && !self.domain.is_retrievable_annotation(annotation_type) {
            return Err(RetrieveError::NotRetrievable(annotation_type.clone()));
        }
        Ok(())
    }
}
