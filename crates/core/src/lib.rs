//! Explicit-metadata index over loaded modules.
//!
//! Modules processed by the analyzer carry a record table naming the types
//! and members worth finding. The [`Retriever`] ingests those tables on
//! demand and answers two questions without scanning live metadata: which
//! types derive from a given base, and which annotation instances of a given
//! type exist.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod preserve;
pub mod query;
pub mod registry;
pub mod retriever;

pub mod facade;

pub use config::RetrieverConfig;
pub use domain::Domain;
pub use error::{Result, RetrieveError};
pub use facade::RetrieverHandle;
pub use preserve::{PreserveManifest, preserved_roots};
pub use retriever::{Retriever, RetrieverBuilder};
