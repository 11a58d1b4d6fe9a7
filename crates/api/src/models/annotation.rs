use super::decl::Declaration;
use super::types::TypeName;
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Runtime value of a retrievable annotation.
///
/// Implementors receive their target through [`Annotation::on_receive_target`]
/// once the materializer has bound them to a declaration.
pub trait Annotation: Any + Send + Sync + Debug {
    /// Called exactly once, right after the target is bound.
    fn on_receive_target(&mut self, _target: &Declaration) {}

    /// Whether the annotated declaration must survive linker stripping.
    fn preserve_target(&self) -> bool {
        false
    }

    /// Cast to Any for downcasting to concrete types.
    fn as_any(&self) -> &dyn Any;
}

/// Annotation value without payload.
#[derive(Debug, Clone, Default)]
pub struct PlainAnnotation {
    pub preserve_target: bool,
}

impl PlainAnnotation {
    pub fn preserved() -> Self {
        Self {
            preserve_target: true,
        }
    }
}

impl Annotation for PlainAnnotation {
    fn preserve_target(&self) -> bool {
        self.preserve_target
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type AnnotationFactory = dyn Fn() -> Box<dyn Annotation> + Send + Sync;

/// An annotation as it appears in a declaration's live metadata.
///
/// Each call to [`AttachedAnnotation::instantiate`] produces a fresh value,
/// the same way reflection hands out a new attribute object per lookup.
#[derive(Clone)]
pub struct AttachedAnnotation {
    annotation_type: TypeName,
    factory: Arc<AnnotationFactory>,
}

impl AttachedAnnotation {
    /// Attach a clone of `prototype` on every instantiation.
    pub fn new<A>(annotation_type: impl Into<TypeName>, prototype: A) -> Self
    where
        A: Annotation + Clone,
    {
        Self {
            annotation_type: annotation_type.into(),
            factory: Arc::new(move || Box::new(prototype.clone()) as Box<dyn Annotation>),
        }
    }

    pub fn plain(annotation_type: impl Into<TypeName>) -> Self {
        Self::new(annotation_type, PlainAnnotation::default())
    }

    pub fn with_factory<F>(annotation_type: impl Into<TypeName>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Annotation> + Send + Sync + 'static,
    {
        Self {
            annotation_type: annotation_type.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn annotation_type(&self) -> &TypeName {
        &self.annotation_type
    }

    pub fn instantiate(&self) -> Box<dyn Annotation> {
        (self.factory)()
    }
}

impl Debug for AttachedAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedAnnotation")
            .field("annotation_type", &self.annotation_type)
            .finish_non_exhaustive()
    }
}

/// A materialized annotation bound to its target declaration.
///
/// The target is fixed at construction; there is no way to rebind it.
#[derive(Debug)]
pub struct AnnotationInstance {
    annotation_type: TypeName,
    target: Declaration,
    value: Box<dyn Annotation>,
}

impl AnnotationInstance {
    /// Instantiate `attached`, bind it to `target` and run the target hook.
    pub fn bind(attached: &AttachedAnnotation, target: Declaration) -> Self {
        let mut value = attached.instantiate();
        value.on_receive_target(&target);
        Self {
            annotation_type: attached.annotation_type.clone(),
            target,
            value,
        }
    }

    /// Concrete annotation type of the value.
    pub fn annotation_type(&self) -> &TypeName {
        &self.annotation_type
    }

    pub fn target(&self) -> &Declaration {
        &self.target
    }

    pub fn value(&self) -> &dyn Annotation {
        self.value.as_ref()
    }

    pub fn downcast_ref<T: Annotation>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Identity used for de-duplication: one instance per target and type.
    pub fn key(&self) -> (&Declaration, &TypeName) {
        (&self.target, &self.annotation_type)
    }
}
