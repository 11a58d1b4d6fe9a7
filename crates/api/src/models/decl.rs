use super::annotation::AttachedAnnotation;
use super::types::{TypeName, TypeRef};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a loaded module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(SmolStr);

impl ModuleId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Annotation,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Method,
    Property,
    Event,
    Constructor,
    EnumConstant,
}

/// Subtype-collection marker placed on a base class or interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubtypeCollection {
    /// Subtypes of this type are linker roots.
    pub preserve_subtypes: bool,
}

/// A member declared directly on a type.
#[derive(Debug, Clone)]
pub struct MemberDef {
    pub name: SmolStr,
    pub kind: MemberKind,
    pub annotations: Vec<AttachedAnnotation>,
}

impl MemberDef {
    pub fn new(name: impl AsRef<str>, kind: MemberKind) -> Self {
        Self {
            name: SmolStr::new(name.as_ref()),
            kind,
            annotations: Vec::new(),
        }
    }

    pub fn field(name: impl AsRef<str>) -> Self {
        Self::new(name, MemberKind::Field)
    }

    pub fn method(name: impl AsRef<str>) -> Self {
        Self::new(name, MemberKind::Method)
    }

    pub fn property(name: impl AsRef<str>) -> Self {
        Self::new(name, MemberKind::Property)
    }

    pub fn enum_constant(name: impl AsRef<str>) -> Self {
        Self::new(name, MemberKind::EnumConstant)
    }

    pub fn annotate(mut self, annotation: AttachedAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Live metadata of a type definition as seen by the running program.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: TypeName,
    /// Owning module; filled in when the definition is added to a module.
    pub module: ModuleId,
    pub kind: TypeKind,
    pub params: Vec<SmolStr>,
    pub base: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub members: Vec<MemberDef>,
    pub annotations: Vec<AttachedAnnotation>,
    pub collect_subtypes: Option<SubtypeCollection>,
    /// Root of a retrievable annotation hierarchy.
    pub retrievable: bool,
}

impl TypeDef {
    pub fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            module: ModuleId::new(""),
            kind,
            params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            annotations: Vec::new(),
            collect_subtypes: None,
            retrievable: false,
        }
    }

    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn enumeration(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Enum)
    }

    pub fn annotation(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Annotation)
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.params = params.into_iter().map(|p| SmolStr::new(p.as_ref())).collect();
        self
    }

    pub fn extends(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn annotate(mut self, annotation: AttachedAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn collect_subtypes(mut self, preserve_subtypes: bool) -> Self {
        self.collect_subtypes = Some(SubtypeCollection { preserve_subtypes });
        self
    }

    pub fn retrievable(mut self) -> Self {
        self.retrievable = true;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    /// The definition viewed as an open type: parameters refer to themselves.
    pub fn self_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.params.iter().map(|p| super::types::GenericArg::Param(p.clone())),
        )
    }

    /// Direct base class followed by directly implemented interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.base.iter().chain(self.interfaces.iter())
    }

    /// Ordinals of all members named `name` (overloads share a name).
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.members
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.name == name)
            .map(|(i, _)| i)
    }
}

/// A type or a member of a type that can carry annotations.
///
/// Declarations only reference live metadata; equality is by owner name and
/// member ordinal.
#[derive(Clone)]
pub struct Declaration {
    owner: Arc<TypeDef>,
    member: Option<usize>,
}

impl Declaration {
    pub fn of_type(owner: Arc<TypeDef>) -> Self {
        Self {
            owner,
            member: None,
        }
    }

    /// Returns `None` if `ordinal` is out of range.
    pub fn of_member(owner: Arc<TypeDef>, ordinal: usize) -> Option<Self> {
        if ordinal < owner.members.len() {
            Some(Self {
                owner,
                member: Some(ordinal),
            })
        } else {
            None
        }
    }

    pub fn owner(&self) -> &Arc<TypeDef> {
        &self.owner
    }

    pub fn owner_name(&self) -> &TypeName {
        &self.owner.name
    }

    pub fn module(&self) -> &ModuleId {
        &self.owner.module
    }

    pub fn member(&self) -> Option<&MemberDef> {
        self.member.and_then(|i| self.owner.members.get(i))
    }

    pub fn member_ordinal(&self) -> Option<usize> {
        self.member
    }

    pub fn is_type(&self) -> bool {
        self.member.is_none()
    }

    /// Simple name of the declared element.
    pub fn name(&self) -> &str {
        match self.member() {
            Some(m) => &m.name,
            None => self.owner.name.simple_name(),
        }
    }

    pub fn annotations(&self) -> &[AttachedAnnotation] {
        match self.member() {
            Some(m) => &m.annotations,
            None => &self.owner.annotations,
        }
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.owner.module == other.owner.module
            && self.owner.name == other.owner.name
            && self.member == other.member
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.module.hash(state);
        self.owner.name.hash(state);
        self.member.hash(state);
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.member() {
            Some(m) => write!(f, "{}.{}", self.owner.name, m.name),
            None => write!(f, "{}", self.owner.name),
        }
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Declaration({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Arc<TypeDef> {
        Arc::new(
            TypeDef::class("NameA.Widget")
                .member(MemberDef::method("Run"))
                .member(MemberDef::method("Run"))
                .member(MemberDef::field("count")),
        )
    }

    #[test]
    fn test_overloads_are_distinct_declarations() {
        let owner = sample();
        let ordinals: Vec<_> = owner.members_named("Run").collect();
        assert_eq!(ordinals, vec![0, 1]);

        let a = Declaration::of_member(owner.clone(), 0).unwrap();
        let b = Declaration::of_member(owner.clone(), 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "NameA.Widget.Run");
    }

    #[test]
    fn test_member_ordinal_out_of_range() {
        assert!(Declaration::of_member(sample(), 7).is_none());
    }

    #[test]
    fn test_type_declaration_name() {
        let decl = Declaration::of_type(sample());
        assert!(decl.is_type());
        assert_eq!(decl.name(), "Widget");
        assert_eq!(decl, Declaration::of_type(sample()));
    }

    #[test]
    fn test_same_name_in_different_modules_differs() {
        use std::collections::HashSet;

        let in_module = |id: &str| {
            let mut def = TypeDef::class("shared.Widget").member(MemberDef::method("Run"));
            def.module = ModuleId::new(id);
            Arc::new(def)
        };
        let a = Declaration::of_member(in_module("A"), 0).unwrap();
        let b = Declaration::of_member(in_module("B"), 0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Declaration::of_member(in_module("A"), 0).unwrap());

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
