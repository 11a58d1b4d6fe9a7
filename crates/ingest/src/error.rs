use retrieve_api::{ModuleId, TypeName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("module {module}: record names unknown type {type_name}")]
    UnresolvedType { module: ModuleId, type_name: TypeName },
    #[error("module {module}: type {owner} has no member named {member}")]
    UnresolvedMember {
        module: ModuleId,
        owner: TypeName,
        member: String,
    },
    #[error("module {module}: marker {marker} on {record} is not a known annotation type")]
    UnresolvedMarker {
        module: ModuleId,
        record: String,
        marker: TypeName,
    },
    #[error("module {module}: {record} carries no retrievable annotation, check strip settings")]
    MissingAnnotation { module: ModuleId, record: String },
    #[error("commit failed: {0}")]
    Commit(String),
}
