#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unsupported generic query: {0} is only partially bound")]
    UnsupportedGenericQuery(String),
    #[error("Type {0} is not an annotation type")]
    NotAnAnnotation(String),
    #[error("Type {0} is not retrievable")]
    NotRetrievable(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Metadata skew: {declaration} is indexed with {annotation} but carries none")]
    MetadataSkew {
        declaration: String,
        annotation: String,
    },
    #[error("Ingestion failed: {0}")]
    Ingestion(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
