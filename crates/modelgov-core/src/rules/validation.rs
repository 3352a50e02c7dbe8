use crate::errors::{GovError, Result};
use crate::graph::EntityGraph;
use crate::model::EntityKind;

use super::invariants;

/// Validate a hydrated graph
///
/// Checks, in order:
///
/// 1. Every version belongs to a model in the graph
/// 2. Every edge endpoint resolves and pinned versions belong to their model
/// 3. No edge appears twice
/// 4. Approval metadata agrees with compliance status
/// 5. The dependency relation is acyclic
///
/// # Errors
/// Returns the first violation encountered. For exhaustive reporting, call
/// the individual invariant functions directly.
pub fn validate_graph(graph: &EntityGraph) -> Result<()> {
    if let Some((_, model_id)) = invariants::find_orphan_versions(graph).first() {
        return Err(GovError::unknown(EntityKind::Model, *model_id));
    }

    if let Some(&position) = invariants::find_dangling_dependencies(graph).first() {
        let dep = &graph.dependencies()[position];
        for end in [dep.parent, dep.child] {
            graph.get_model(end.model_id)?;
            if let Some(version_id) = end.version_id {
                graph.get_owned_version(end.model_id, version_id)?;
            }
        }
        return Err(GovError::Internal {
            message: format!("dependency {} reported dangling but resolves", position),
        });
    }

    if let Some(&position) = invariants::find_dangling_links(graph).first() {
        let link = &graph.links()[position];
        graph.get_model(link.model_id)?;
        graph.get_dataset(link.dataset_id)?;
        if let Some(version_id) = link.version_id {
            graph.get_owned_version(link.model_id, version_id)?;
        }
        return Err(GovError::Internal {
            message: format!("dataset link {} reported dangling but resolves", position),
        });
    }

    if let Some(&position) = invariants::find_duplicate_edges(graph).first() {
        let description = match graph.dependencies().get(position) {
            Some(dep) => dep.to_string(),
            None => {
                let link = &graph.links()[position - graph.dependencies().len()];
                format!(
                    "model {} uses dataset {} for {} more than once",
                    link.model_id, link.dataset_id, link.dataset_type
                )
            }
        };
        return Err(GovError::DuplicateEdge { description });
    }

    if let Some((model_id, status)) = invariants::find_approval_mismatches(graph).first() {
        return Err(GovError::ApprovalInvariantBroken {
            model_id: *model_id,
            status: *status,
        });
    }

    if let Some(path) = invariants::find_cycle(graph) {
        return Err(GovError::CycleDetected { path });
    }

    Ok(())
}
