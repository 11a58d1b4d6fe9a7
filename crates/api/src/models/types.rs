use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Fully qualified name of a type definition (e.g. `NameA.Repo`).
///
/// Generic definitions are named without their arguments; arity lives on the
/// [`TypeDef`](super::decl::TypeDef).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(SmolStr);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment, e.g. `Repo` for `NameA.Repo`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single generic argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericArg {
    /// Unbound slot of a generic definition (`Repo<>`).
    Unbound,
    /// Reference to a generic parameter of the enclosing definition (`T`).
    Param(SmolStr),
    /// A concrete type argument.
    Type(TypeRef),
}

impl GenericArg {
    pub fn param(name: impl AsRef<str>) -> Self {
        GenericArg::Param(SmolStr::new(name.as_ref()))
    }

    fn is_closed(&self) -> bool {
        match self {
            GenericArg::Type(ty) => ty.is_closed(),
            GenericArg::Unbound | GenericArg::Param(_) => false,
        }
    }
}

/// How a [`TypeRef`] binds its generic arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericShape {
    NonGeneric,
    /// Every slot unbound: the generic type definition itself.
    Definition,
    /// Every slot bound to a closed type.
    Constructed,
    /// A mix of bound and unbound slots, or slots that refer to parameters.
    Partial,
}

/// Reference to a type, possibly an instantiation of a generic definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub def: TypeName,
    pub args: Vec<GenericArg>,
}

impl TypeRef {
    /// A non-generic type.
    pub fn plain(name: impl Into<TypeName>) -> Self {
        Self {
            def: name.into(),
            args: Vec::new(),
        }
    }

    /// The open definition of a generic type with `arity` parameters.
    pub fn definition(name: impl Into<TypeName>, arity: usize) -> Self {
        Self {
            def: name.into(),
            args: vec![GenericArg::Unbound; arity],
        }
    }

    pub fn generic(name: impl Into<TypeName>, args: impl IntoIterator<Item = GenericArg>) -> Self {
        Self {
            def: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Instantiation with concrete type arguments.
    pub fn constructed(name: impl Into<TypeName>, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::generic(name, args.into_iter().map(GenericArg::Type))
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// True when no slot (recursively) is unbound or a parameter.
    pub fn is_closed(&self) -> bool {
        self.args.iter().all(GenericArg::is_closed)
    }

    pub fn shape(&self) -> GenericShape {
        if self.args.is_empty() {
            GenericShape::NonGeneric
        } else if self.args.iter().all(|a| matches!(a, GenericArg::Unbound)) {
            GenericShape::Definition
        } else if self.is_closed() {
            GenericShape::Constructed
        } else {
            GenericShape::Partial
        }
    }

    /// Replace parameter references using `lookup`; unknown parameters are kept.
    pub fn substitute(&self, lookup: &dyn Fn(&str) -> Option<GenericArg>) -> TypeRef {
        TypeRef {
            def: self.def.clone(),
            args: self
                .args
                .iter()
                .map(|arg| match arg {
                    GenericArg::Param(name) => lookup(name).unwrap_or_else(|| arg.clone()),
                    GenericArg::Type(ty) => GenericArg::Type(ty.substitute(lookup)),
                    GenericArg::Unbound => GenericArg::Unbound,
                })
                .collect(),
        }
    }
}

impl From<TypeName> for TypeRef {
    fn from(name: TypeName) -> Self {
        TypeRef::plain(name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::plain(name)
    }
}

impl fmt::Display for GenericArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericArg::Unbound => Ok(()),
            GenericArg::Param(name) => write!(f, "{}", name),
            GenericArg::Type(ty) => write!(f, "{}", ty),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.def)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_classification() {
        assert_eq!(TypeRef::plain("A").shape(), GenericShape::NonGeneric);
        assert_eq!(TypeRef::definition("Repo", 1).shape(), GenericShape::Definition);
        assert_eq!(
            TypeRef::constructed("Repo", [TypeRef::plain("int")]).shape(),
            GenericShape::Constructed
        );

        let half_bound = TypeRef::generic(
            "Map",
            [GenericArg::Type(TypeRef::plain("int")), GenericArg::Unbound],
        );
        assert_eq!(half_bound.shape(), GenericShape::Partial);

        let with_param = TypeRef::generic("Repo", [GenericArg::param("T")]);
        assert_eq!(with_param.shape(), GenericShape::Partial);
    }

    #[test]
    fn test_nested_open_argument_is_partial() {
        let inner = TypeRef::generic("List", [GenericArg::param("T")]);
        let outer = TypeRef::constructed("Repo", [inner]);
        assert_eq!(outer.shape(), GenericShape::Partial);
    }

    #[test]
    fn test_substitute_replaces_params() {
        let base = TypeRef::generic("Repo", [GenericArg::param("T")]);
        let bound = base.substitute(&|name| {
            (name == "T").then(|| GenericArg::Type(TypeRef::plain("int")))
        });
        assert_eq!(bound, TypeRef::constructed("Repo", [TypeRef::plain("int")]));
    }

    #[test]
    fn test_display() {
        let ty = TypeRef::constructed("NameA.Repo", [TypeRef::plain("int")]);
        assert_eq!(ty.to_string(), "NameA.Repo<int>");
        assert_eq!(TypeRef::definition("Map", 2).to_string(), "Map<,>");
        assert_eq!(TypeName::new("NameA.Repo").simple_name(), "Repo");
    }
}
