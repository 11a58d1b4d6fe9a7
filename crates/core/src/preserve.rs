//! Linker preservation roots.
//!
//! Declarations reached only through the index look unused to a tree-shaking
//! linker. Two sources mark them as roots: annotation instances whose value
//! asks for its target to be kept, and indexed types that derive from a
//! subtype-collecting base with `preserve_subtypes` set.

use crate::error::Result;
use crate::query::supertype_closure;
use crate::retriever::Retriever;
use indexmap::{IndexMap, IndexSet};
use retrieve_api::{Declaration, MemberKind, ModuleId, TypeName, TypeUniverse};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// All declarations that must survive stripping, without duplicates.
pub fn preserved_roots(retriever: &Retriever) -> Result<Vec<Declaration>> {
    let view = retriever.flattened_view()?;
    let domain = retriever.domain().as_ref();
    let mut roots: IndexSet<Declaration> = IndexSet::new();

    for instance in view.attributes.instances() {
        if instance.value().preserve_target() {
            roots.insert(instance.target().clone());
        }
    }

    for ty in view.types.types() {
        let preserved = supertype_closure(domain, ty)
            .iter()
            .any(|def| def.collect_subtypes.is_some_and(|c| c.preserve_subtypes));
        if !preserved {
            continue;
        }
        if let Some(def) = domain.find_type(ty) {
            roots.insert(Declaration::of_type(def));
        }
    }

    debug!(roots = roots.len(), "collected preserved roots");
    Ok(roots.into_iter().collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreserveManifest {
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub module: ModuleId,
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: TypeName,
    /// The type itself is a root, not only some of its members.
    pub whole_type: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    pub kind: MemberKind,
    pub name: String,
}

impl PreserveManifest {
    /// Group roots by module and owning type, sorted by name.
    pub fn from_roots(roots: &[Declaration]) -> Self {
        let mut grouped: IndexMap<ModuleId, IndexMap<TypeName, TypeEntry>> = IndexMap::new();
        for decl in roots {
            let entry = grouped
                .entry(decl.module().clone())
                .or_default()
                .entry(decl.owner_name().clone())
                .or_insert_with(|| TypeEntry {
                    name: decl.owner_name().clone(),
                    whole_type: false,
                    members: Vec::new(),
                });
            match decl.member() {
                None => entry.whole_type = true,
                Some(member) => {
                    let member = MemberEntry {
                        kind: member.kind,
                        name: member.name.to_string(),
                    };
                    if !entry.members.contains(&member) {
                        entry.members.push(member);
                    }
                }
            }
        }

        let mut modules: Vec<ModuleEntry> = grouped
            .into_iter()
            .map(|(module, types)| {
                let mut types: Vec<TypeEntry> = types.into_values().collect();
                types.sort_by(|a, b| a.name.cmp(&b.name));
                ModuleEntry { module, types }
            })
            .collect();
        modules.sort_by(|a, b| a.module.cmp(&b.module));
        Self { modules }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn root_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.types)
            .map(|t| usize::from(t.whole_type) + t.members.len())
            .sum()
    }
}
