//! Transitive subtype resolution over the global graph.

use super::scratch::with_scratch;
use crate::error::{Result, RetrieveError};
use crate::registry::SubtypeGraph;
use indexmap::IndexSet;
use retrieve_api::{GenericArg, GenericShape, TypeDef, TypeName, TypeRef, TypeUniverse};
use retrieve_ingest::ModuleContribution;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub struct SubtypeResolver<'a> {
    graph: &'a SubtypeGraph,
    universe: &'a dyn TypeUniverse,
}

impl<'a> SubtypeResolver<'a> {
    pub fn new(graph: &'a SubtypeGraph, universe: &'a dyn TypeUniverse) -> Self {
        Self { graph, universe }
    }

    /// Every type in `scope` that transitively derives from `base`.
    ///
    /// The walk always follows the global graph, so chains that pass through
    /// other modules are honoured; only the reported subtypes are restricted
    /// to `scope`. `base` itself is never reported.
    ///
    /// A constructed generic `base` keeps only candidates assignable to that
    /// exact instantiation. A generic definition matches every instantiation.
    /// Intermediate types that were never recorded are walked through but not
    /// reported.
    pub fn subtypes_of(&self, base: &TypeRef, scope: &ModuleContribution) -> Result<Vec<TypeName>> {
        self.walk(base, scope, true)
    }

    /// Like [`subtypes_of`](Self::subtypes_of) but reports every edge target,
    /// recorded or not. Used to expand annotation lineages.
    pub fn descendants_of(&self, base: &TypeRef, scope: &ModuleContribution) -> Result<Vec<TypeName>> {
        self.walk(base, scope, false)
    }

    fn walk(&self, base: &TypeRef, scope: &ModuleContribution, recorded_only: bool) -> Result<Vec<TypeName>> {
        let constructed = match base.shape() {
            GenericShape::NonGeneric | GenericShape::Definition => false,
            GenericShape::Constructed => true,
            GenericShape::Partial => return Err(RetrieveError::UnsupportedGenericQuery(base.clone())),
        };
        let Some(start) = self.graph.find_node(&base.def) else {
            return Ok(Vec::new());
        };

        let found = with_scratch(|scratch| {
            let mut found: IndexSet<TypeName> = IndexSet::new();
            scratch.visited.insert(start);
            scratch.queue.push_back(start);

            while let Some(node) = scratch.queue.pop_front() {
                let Some(name) = self.graph.name(node) else {
                    continue;
                };
                if let Some(direct) = scope.direct_subtypes(name) {
                    for candidate in direct {
                        if candidate == &base.def {
                            continue;
                        }
                        if recorded_only && !scope.types.contains(candidate) {
                            continue;
                        }
                        if constructed && !is_assignable(self.universe, candidate, base) {
                            continue;
                        }
                        found.insert(candidate.clone());
                    }
                }
                for next in self.graph.direct_subtypes(node) {
                    if scratch.visited.insert(next) {
                        scratch.queue.push_back(next);
                    }
                }
            }
            found
        });

        Ok(found.into_iter().collect())
    }
}

/// Whether `candidate` (viewed as its open definition) is assignable to
/// `target`, following base classes and interfaces with generic arguments
/// substituted along the way.
pub fn is_assignable(universe: &dyn TypeUniverse, candidate: &TypeName, target: &TypeRef) -> bool {
    let Some(def) = universe.find_type(candidate) else {
        return false;
    };
    let mut pending = vec![def.self_ref()];
    let mut seen: HashSet<TypeRef> = HashSet::new();

    while let Some(current) = pending.pop() {
        if &current == target {
            return true;
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(def) = universe.find_type(&current.def) else {
            continue;
        };
        let bindings: HashMap<&str, &GenericArg> = def
            .params
            .iter()
            .map(|p| p.as_str())
            .zip(current.args.iter())
            .collect();
        let lookup = |param: &str| bindings.get(param).map(|arg| (*arg).clone());
        for supertype in def.direct_supertypes() {
            pending.push(supertype.substitute(&lookup));
        }
    }
    false
}

/// `name` and every definition it derives from, base classes and interfaces
/// alike. Missing definitions end their branch.
pub fn supertype_closure(universe: &dyn TypeUniverse, name: &TypeName) -> Vec<Arc<TypeDef>> {
    let mut out: Vec<Arc<TypeDef>> = Vec::new();
    let mut seen: HashSet<TypeName> = HashSet::new();
    let mut pending = vec![name.clone()];

    while let Some(current) = pending.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(def) = universe.find_type(&current) else {
            continue;
        };
        pending.extend(def.direct_supertypes().map(|s| s.def.clone()));
        out.push(def);
    }
    out
}
