pub mod materializer;
pub mod resolver;
mod scratch;

pub use materializer::Materializer;
pub use resolver::{SubtypeResolver, is_assignable, supertype_closure};
