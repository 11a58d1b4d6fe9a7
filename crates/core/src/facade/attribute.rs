use crate::facade::RetrieverHandle;
use retrieve_api::{AnnotationInstance, ApiResult, AttributeService, ModuleId, TypeName};
use std::sync::Arc;

impl AttributeService for RetrieverHandle {
    fn get_all_attributes(
        &self,
        annotation_type: &TypeName,
    ) -> ApiResult<Vec<Arc<AnnotationInstance>>> {
        Ok(self.retriever.attributes_of(annotation_type)?)
    }

    fn get_all_attributes_in(
        &self,
        annotation_type: &TypeName,
        module: &ModuleId,
    ) -> ApiResult<Vec<Arc<AnnotationInstance>>> {
        Ok(self.retriever.attributes_of_in(annotation_type, module)?)
    }
}
