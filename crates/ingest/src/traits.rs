use crate::error::IngestError;
use crate::types::ModuleContribution;

/// Destination of derived contributions.
pub trait ContributionSink: Send + Sync {
    /// Merge one module's contribution; returns the number of new relation entries.
    fn commit(&self, contribution: &ModuleContribution) -> Result<usize, IngestError>;
}
