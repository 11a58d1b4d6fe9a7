use crate::facade::RetrieverHandle;
use retrieve_api::{ApiResult, ModuleId, SubtypeService, TypeName, TypeRef};

impl SubtypeService for RetrieverHandle {
    fn get_all_subtypes(&self, base: &TypeRef) -> ApiResult<Vec<TypeName>> {
        Ok(self.retriever.subtypes_of(base)?)
    }

    fn get_all_subtypes_in(&self, base: &TypeRef, module: &ModuleId) -> ApiResult<Vec<TypeName>> {
        Ok(self.retriever.subtypes_of_in(base, module)?)
    }
}
