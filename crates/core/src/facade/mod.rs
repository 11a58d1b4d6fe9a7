use std::sync::Arc;

use crate::domain::Domain;
use crate::retriever::Retriever;

mod attribute;
mod subtype;

/// Retriever handle - the query surface exposed to clients
///
/// Cheap to clone; every clone shares the same registry and view caches.
#[derive(Clone)]
pub struct RetrieverHandle {
    pub(crate) retriever: Arc<Retriever>,
}

impl RetrieverHandle {
    pub fn new(domain: Arc<Domain>) -> Self {
        Self {
            retriever: Arc::new(Retriever::new(domain)),
        }
    }

    /// Create a handle from an existing retriever (useful for testing)
    pub fn from_retriever(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }
}
