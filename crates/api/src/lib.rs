pub mod error;
pub mod models;
pub mod query;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use query::{AttributeService, SubtypeService};

/// Composite trait representing the full query surface.
/// This allows clients to depend on a single trait instead of multiple individual ones.
pub trait RetrieveEngine: SubtypeService + AttributeService {}

impl<T: SubtypeService + AttributeService> RetrieveEngine for T {}
