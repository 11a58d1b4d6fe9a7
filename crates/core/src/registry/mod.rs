//! Per-module ingestion slots and the merged global index.
//!
//! Each eligible module is ingested at most once. Ingestion of one module is
//! serialized on its slot; different modules ingest concurrently. Merging into
//! the global state happens under a single write lock, so readers observe a
//! module either fully merged or not at all.

mod graph;

pub use graph::SubtypeGraph;

use crate::domain::Domain;
use crate::error::Result;
use dashmap::DashMap;
use rayon::prelude::*;
use retrieve_api::{ModuleId, TypeUniverse};
use retrieve_ingest::{ContributionSink, IngestError, ModuleContribution, derive_contribution};
use retrieve_plugin::ModuleSource;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info};

type Slot = Arc<Mutex<Option<Arc<ModuleContribution>>>>;

/// Merged view over every ingested module.
#[derive(Debug, Default)]
pub struct RegistryState {
    pub graph: SubtypeGraph,
    pub global: ModuleContribution,
    /// Bumped on every merge that added something.
    pub generation: u64,
}

#[derive(Default)]
pub struct Registry {
    slots: DashMap<ModuleId, Slot>,
    state: RwLock<RegistryState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only modules carrying the analyzer marker take part in indexing.
    pub fn is_eligible(module: &dyn ModuleSource) -> bool {
        module.is_instrumented()
    }

    /// Ingest `module` if it has not been ingested yet.
    ///
    /// Returns `None` for ineligible modules. Concurrent callers for the same
    /// module block until the first one finishes and then share its result.
    pub fn ensure_ingested(
        &self,
        module: &dyn ModuleSource,
        universe: &dyn TypeUniverse,
    ) -> Result<Option<Arc<ModuleContribution>>> {
        if !Self::is_eligible(module) {
            return Ok(None);
        }

        let slot: Slot = self.slots.entry(module.id().clone()).or_default().clone();
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = guard.as_ref() {
            return Ok(Some(existing.clone()));
        }

        let contribution = derive_contribution(module, universe)?;
        let added = self.commit(&contribution)?;
        info!(module = %module.id(), added, "module ingested");

        let contribution = Arc::new(contribution);
        *guard = Some(contribution.clone());
        Ok(Some(contribution))
    }

    /// Ingest every eligible module of `domain` not seen yet.
    ///
    /// Returns the number of modules ingested by this call.
    pub fn sync(&self, domain: &Domain, parallel: bool) -> Result<usize> {
        let pending: Vec<Arc<dyn ModuleSource>> = domain
            .modules()
            .into_iter()
            .filter(|m| Self::is_eligible(m.as_ref()) && !self.is_ingested(m.id()))
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }

        debug!(count = pending.len(), parallel, "syncing modules");
        let ingest = |m: &Arc<dyn ModuleSource>| self.ensure_ingested(m.as_ref(), domain);
        if parallel {
            pending.par_iter().map(ingest).collect::<Result<Vec<_>>>()?;
        } else {
            pending.iter().map(ingest).collect::<Result<Vec<_>>>()?;
        }
        Ok(pending.len())
    }

    pub fn is_ingested(&self, id: &ModuleId) -> bool {
        self.contribution(id).is_some()
    }

    /// The contribution of an already ingested module.
    pub fn contribution(&self, id: &ModuleId) -> Option<Arc<ModuleContribution>> {
        let slot = self.slots.get(id)?.value().clone();
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }
}

impl ContributionSink for Registry {
    fn commit(&self, contribution: &ModuleContribution) -> std::result::Result<usize, IngestError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let known_modules = state.global.modules.len();
        let added = state.global.merge(contribution);
        for edge in &contribution.edges {
            state.graph.add_edge(edge);
        }
        if added > 0 || state.global.modules.len() > known_modules {
            state.generation += 1;
        }
        Ok(added)
    }
}
