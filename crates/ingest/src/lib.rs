pub mod derive;
pub mod error;
pub mod traits;
pub mod types;

pub use derive::derive_contribution;
pub use error::IngestError;
pub use traits::ContributionSink;
pub use types::{EdgeKind, ModuleContribution, SubtypeEdge};
