use retrieve_api::{ApiError, TypeName, TypeRef};
use retrieve_ingest::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("Unsupported generic query: {0} is only partially bound")]
    UnsupportedGenericQuery(TypeRef),
    #[error("Type {0} is not an annotation type")]
    NotAnAnnotation(TypeName),
    #[error("Type {0} is not retrievable")]
    NotRetrievable(TypeName),
    #[error("Unknown type: {0}")]
    UnknownType(TypeName),
    #[error("Metadata skew: {declaration} is indexed with {annotation} but carries none")]
    MetadataSkew {
        declaration: String,
        annotation: TypeName,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logging error: {0}")]
    Logging(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RetrieveError> for ApiError {
    fn from(err: RetrieveError) -> Self {
        match err {
            RetrieveError::UnsupportedGenericQuery(ty) => ApiError::UnsupportedGenericQuery(ty.to_string()),
            RetrieveError::NotAnAnnotation(ty) => ApiError::NotAnAnnotation(ty.to_string()),
            RetrieveError::NotRetrievable(ty) => ApiError::NotRetrievable(ty.to_string()),
            RetrieveError::UnknownType(ty) => ApiError::UnknownType(ty.to_string()),
            RetrieveError::MetadataSkew {
                declaration,
                annotation,
            } => ApiError::MetadataSkew {
                declaration,
                annotation: annotation.to_string(),
            },
            RetrieveError::Ingest(e) => ApiError::Ingestion(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RetrieveError>;
