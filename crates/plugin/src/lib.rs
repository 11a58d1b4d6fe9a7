//! Module-side boundary of the index: what each loaded module exposes.

pub mod module;
pub mod record;

pub use module::{Module, ModuleBuilder, ModuleSource};
pub use record::{Record, RecordTable};
