use crate::error::ApiResult;
use crate::models::{AnnotationInstance, ModuleId, TypeName, TypeRef};
use std::sync::Arc;

/// Subtype closure queries.
///
/// Results never contain the queried type itself. For a constructed generic
/// base only types assignable to that exact instantiation are returned.
pub trait SubtypeService: Send + Sync {
    /// Subtypes contributed by every eligible loaded module.
    fn get_all_subtypes(&self, base: &TypeRef) -> ApiResult<Vec<TypeName>>;

    /// Subtypes contributed by `module` only. Empty for ineligible modules.
    fn get_all_subtypes_in(&self, base: &TypeRef, module: &ModuleId) -> ApiResult<Vec<TypeName>>;
}

/// Annotation retrieval queries.
pub trait AttributeService: Send + Sync {
    /// Instances of `annotation_type` or any of its subtypes, across all modules.
    fn get_all_attributes(
        &self,
        annotation_type: &TypeName,
    ) -> ApiResult<Vec<Arc<AnnotationInstance>>>;

    /// Same as [`AttributeService::get_all_attributes`], restricted to `module`.
    fn get_all_attributes_in(
        &self,
        annotation_type: &TypeName,
        module: &ModuleId,
    ) -> ApiResult<Vec<Arc<AnnotationInstance>>>;
}
