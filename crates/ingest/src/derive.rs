//! Derivation of a [`ModuleContribution`] from a module's record table.
//!
//! Derivation only reads the module and the type universe, so it can run on
//! any thread; merging the result is the caller's business.

use crate::error::IngestError;
use crate::types::{EdgeKind, ModuleContribution};
use retrieve_api::{Declaration, TypeDef, TypeName, TypeUniverse};
use retrieve_plugin::{ModuleSource, Record};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

pub fn derive_contribution(
    module: &dyn ModuleSource,
    universe: &dyn TypeUniverse,
) -> Result<ModuleContribution, IngestError> {
    let mut contribution = ModuleContribution::for_module(module.id().clone());
    let records = module.records();

    for record in records {
        let owner = module
            .find_type(&record.type_name)
            .ok_or_else(|| IngestError::UnresolvedType {
                module: module.id().clone(),
                type_name: record.type_name.clone(),
            })?;
        contribution.types.insert(owner.name.clone());

        match &record.member {
            None => {
                add_supertype_edges(&mut contribution, universe, &owner);
                let decl = Declaration::of_type(owner.clone());
                mark_declaration(&mut contribution, module, universe, record, decl, false)?;
            }
            Some(member) => {
                let ordinals: Vec<usize> = owner.members_named(member).collect();
                if ordinals.is_empty() {
                    return Err(IngestError::UnresolvedMember {
                        module: module.id().clone(),
                        owner: owner.name.clone(),
                        member: member.to_string(),
                    });
                }
                for ordinal in ordinals {
                    if let Some(decl) = Declaration::of_member(owner.clone(), ordinal) {
                        mark_declaration(&mut contribution, module, universe, record, decl, true)?;
                    }
                }
            }
        }
    }

    debug!(
        module = %module.id(),
        records = records.len(),
        edges = contribution.edges.len(),
        marked = contribution.marked_count(),
        "derived module contribution"
    );
    Ok(contribution)
}

/// Edges for the whole base and interface lineage of `owner`, so recorded
/// types stay reachable when an intermediate base lives in a module without
/// records.
fn add_supertype_edges(
    contribution: &mut ModuleContribution,
    universe: &dyn TypeUniverse,
    owner: &Arc<TypeDef>,
) {
    let mut seen: HashSet<TypeName> = HashSet::new();
    let mut pending: Vec<Arc<TypeDef>> = vec![owner.clone()];

    while let Some(def) = pending.pop() {
        if !seen.insert(def.name.clone()) {
            continue;
        }
        if let Some(base) = &def.base {
            contribution.add_edge(base.def.clone(), def.name.clone(), EdgeKind::InheritsFrom);
        }
        for interface in &def.interfaces {
            contribution.add_edge(interface.def.clone(), def.name.clone(), EdgeKind::Implements);
        }
        pending.extend(def.direct_supertypes().filter_map(|s| universe.find_type(&s.def)));
    }
}

/// Register `decl` under its marker(s).
///
/// A claimed marker is trusted here and checked against the live declaration
/// at query time. Without a claim the markers come from the declaration's
/// retrievable annotations; member records must yield at least one.
fn mark_declaration(
    contribution: &mut ModuleContribution,
    module: &dyn ModuleSource,
    universe: &dyn TypeUniverse,
    record: &Record,
    decl: Declaration,
    require_marker: bool,
) -> Result<(), IngestError> {
    let markers: Vec<TypeName> = match &record.marker {
        Some(marker) => {
            if !universe.is_annotation(marker) {
                return Err(IngestError::UnresolvedMarker {
                    module: module.id().clone(),
                    record: record.to_string(),
                    marker: marker.clone(),
                });
            }
            vec![marker.clone()]
        }
        None => decl
            .annotations()
            .iter()
            .map(|a| a.annotation_type().clone())
            .filter(|ty| universe.is_retrievable_annotation(ty))
            .collect(),
    };

    if markers.is_empty() {
        if require_marker {
            return Err(IngestError::MissingAnnotation {
                module: module.id().clone(),
                record: format!("{} ({})", record, decl),
            });
        }
        return Ok(());
    }

    for marker in markers {
        trace!(%marker, declaration = %decl, "marking declaration");
        add_annotation_lineage(contribution, universe, &marker);
        contribution.mark(marker, decl.clone());
    }
    // Live annotations may be narrower than a claimed marker.
    for attached in decl.annotations() {
        if universe.is_retrievable_annotation(attached.annotation_type()) {
            add_annotation_lineage(contribution, universe, attached.annotation_type());
        }
    }
    Ok(())
}

/// Annotation types join the subtype relation through their base chain.
fn add_annotation_lineage(
    contribution: &mut ModuleContribution,
    universe: &dyn TypeUniverse,
    marker: &TypeName,
) {
    let lineage: Vec<Arc<TypeDef>> = universe.base_lineage(marker);
    for pair in lineage.windows(2) {
        contribution.add_edge(pair[1].name.clone(), pair[0].name.clone(), EdgeKind::InheritsFrom);
    }
}
