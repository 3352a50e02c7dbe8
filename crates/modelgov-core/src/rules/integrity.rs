//! Dependency integrity checker
//!
//! Validates a single proposed edge against the current graph: endpoints
//! resolve, pinned versions belong to their models, the edge is new, and for
//! dependencies the relation stays acyclic.

use std::collections::{HashMap, HashSet};

use modelgov_core_types::ModelId;

use crate::errors::{GovError, Result};
use crate::graph::{EdgeProposal, EntityGraph};
use crate::model::{DatasetLink, EntityKind, ModelDependency, ModelRef};

/// Check any proposed edge
///
/// # Errors
///
/// See [`check_dependency`] and [`check_link`].
pub fn check_edge(graph: &EntityGraph, edge: &EdgeProposal) -> Result<()> {
    match edge {
        EdgeProposal::Dependency(dependency) => check_dependency(graph, dependency),
        EdgeProposal::DatasetLink(link) => check_link(graph, link),
    }
}

/// Check a proposed dependency edge
///
/// The child is the model being mutated and must not be retired; a retired
/// parent is still a valid lineage source.
///
/// # Errors
///
/// - `CycleDetected` for a self-dependency or an edge closing a cycle
/// - `UnknownEntity` / `VersionNotOwned` for unresolved endpoints
/// - `EntityRetired` if the child model is retired
/// - `DuplicateEdge` if the same edge already exists
pub fn check_dependency(graph: &EntityGraph, dependency: &ModelDependency) -> Result<()> {
    let parent = dependency.parent.model_id;
    let child = dependency.child.model_id;
    if parent == child {
        return Err(GovError::CycleDetected {
            path: vec![parent, child],
        });
    }

    resolve_ref(graph, &dependency.parent)?;
    resolve_ref(graph, &dependency.child)?;
    graph.get_live_model(child)?;

    if graph.dependencies().iter().any(|d| d.same_edge(dependency)) {
        return Err(GovError::DuplicateEdge {
            description: dependency.to_string(),
        });
    }

    check_acyclic(graph, parent, child)
}

/// Check a proposed dataset link
///
/// # Errors
///
/// - `UnknownEntity` / `VersionNotOwned` for unresolved endpoints
/// - `EntityRetired` if the model or the dataset is retired
/// - `DuplicateEdge` if the same link already exists
pub fn check_link(graph: &EntityGraph, link: &DatasetLink) -> Result<()> {
    graph.get_live_model(link.model_id)?;
    if let Some(version_id) = link.version_id {
        graph.get_owned_version(link.model_id, version_id)?;
    }

    let dataset = graph.get_dataset(link.dataset_id)?;
    if dataset.is_retired() {
        return Err(GovError::EntityRetired {
            kind: EntityKind::Dataset,
            id: dataset.id.get(),
        });
    }

    if graph.links().iter().any(|l| l.same_edge(link)) {
        return Err(GovError::DuplicateEdge {
            description: format!(
                "model {} already uses dataset {} for {}",
                link.model_id, link.dataset_id, link.dataset_type
            ),
        });
    }
    Ok(())
}

/// Check that adding `parent -> child` keeps the dependency relation acyclic
///
/// Searches depth-first from `child` along existing parent-to-child edges for
/// a way back to `parent`. Only edges reachable from `child` are visited.
/// On failure the returned path starts at `parent`, crosses the new edge to
/// `child` and follows existing edges back to `parent`.
///
/// # Errors
///
/// Returns `CycleDetected` naming the cycle path.
pub fn check_acyclic(graph: &EntityGraph, parent: ModelId, child: ModelId) -> Result<()> {
    if parent == child {
        return Err(GovError::CycleDetected {
            path: vec![parent, child],
        });
    }

    let mut came_from: HashMap<ModelId, ModelId> = HashMap::new();
    let mut visited: HashSet<ModelId> = HashSet::from([child]);
    let mut stack = vec![child];

    while let Some(node) = stack.pop() {
        for next in graph.dependent_ids(node) {
            if !visited.insert(next) {
                continue;
            }
            came_from.insert(next, node);
            if next == parent {
                return Err(GovError::CycleDetected {
                    path: cycle_path(&came_from, parent, child),
                });
            }
            stack.push(next);
        }
    }

    Ok(())
}

fn cycle_path(came_from: &HashMap<ModelId, ModelId>, parent: ModelId, child: ModelId) -> Vec<ModelId> {
    // walk back from parent to child, then prepend the new edge's source
    let mut back = vec![parent];
    let mut current = parent;
    while current != child {
        match came_from.get(&current) {
            Some(&previous) => {
                back.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    back.push(parent);
    back.reverse();
    back
}

fn resolve_ref(graph: &EntityGraph, model_ref: &ModelRef) -> Result<()> {
    graph.get_model(model_ref.model_id)?;
    if let Some(version_id) = model_ref.version_id {
        graph.get_owned_version(model_ref.model_id, version_id)?;
    }
    Ok(())
}
