pub mod annotation;
pub mod decl;
pub mod types;
pub mod universe;

pub use annotation::*;
pub use decl::*;
pub use types::*;
pub use universe::*;
