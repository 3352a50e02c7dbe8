use std::collections::{HashMap, HashSet};

use modelgov_core_types::{ModelId, VersionId};

use crate::graph::EntityGraph;
use crate::model::ComplianceStatus;

/// Find versions whose owning model is not in the graph
///
/// Returns list of (version_id, model_id) tuples
pub fn find_orphan_versions(graph: &EntityGraph) -> Vec<(VersionId, ModelId)> {
    let mut orphans: Vec<(VersionId, ModelId)> = graph
        .versions
        .values()
        .filter(|v| !graph.models.contains_key(&v.model_id))
        .map(|v| (v.id, v.model_id))
        .collect();
    orphans.sort();
    orphans
}

/// Find dependency edges that reference a missing model or a version owned by someone else
///
/// Returns positions into `graph.dependencies()`
pub fn find_dangling_dependencies(graph: &EntityGraph) -> Vec<usize> {
    graph
        .dependencies()
        .iter()
        .enumerate()
        .filter(|(_, dep)| {
            [dep.parent, dep.child].iter().any(|end| {
                !graph.models.contains_key(&end.model_id)
                    || end
                        .version_id
                        .is_some_and(|v| graph.get_owned_version(end.model_id, v).is_err())
            })
        })
        .map(|(i, _)| i)
        .collect()
}

/// Find dataset links whose model, pinned version or dataset does not resolve
///
/// Returns positions into `graph.links()`
pub fn find_dangling_links(graph: &EntityGraph) -> Vec<usize> {
    graph
        .links()
        .iter()
        .enumerate()
        .filter(|(_, link)| {
            !graph.models.contains_key(&link.model_id)
                || !graph.datasets.contains_key(&link.dataset_id)
                || link
                    .version_id
                    .is_some_and(|v| graph.get_owned_version(link.model_id, v).is_err())
        })
        .map(|(i, _)| i)
        .collect()
}

/// Find models whose approval metadata disagrees with their status
///
/// Returns list of (model_id, status) tuples in ascending id order
pub fn find_approval_mismatches(graph: &EntityGraph) -> Vec<(ModelId, ComplianceStatus)> {
    graph
        .list_models()
        .into_iter()
        .filter(|m| !m.approval_consistent())
        .map(|m| (m.id, m.compliance_status))
        .collect()
}

/// Find positions of edges that repeat an earlier edge
///
/// Link positions follow the dependencies: link `i` is reported as
/// `dependencies().len() + i`.
pub fn find_duplicate_edges(graph: &EntityGraph) -> Vec<usize> {
    let deps = graph.dependencies();
    let mut seen_deps = HashSet::with_capacity(deps.len());
    let mut duplicates: Vec<usize> = deps
        .iter()
        .enumerate()
        .filter(|(_, d)| !seen_deps.insert((d.parent, d.child, d.dependency_type)))
        .map(|(i, _)| i)
        .collect();

    let links = graph.links();
    let mut seen_links = HashSet::with_capacity(links.len());
    duplicates.extend(
        links
            .iter()
            .enumerate()
            .filter(|(_, l)| {
                !seen_links.insert((l.model_id, l.version_id, l.dataset_id, l.dataset_type))
            })
            .map(|(i, _)| deps.len() + i),
    );
    duplicates
}

/// Find one cycle in the dependency relation, if any
///
/// Returns the cycle as a closed path (first id repeated at the end).
/// Roots are visited in ascending id order so the reported cycle is stable.
pub fn find_cycle(graph: &EntityGraph) -> Option<Vec<ModelId>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    let mut marks: HashMap<ModelId, Mark> = HashMap::new();
    let mut roots: Vec<ModelId> = graph
        .dependencies()
        .iter()
        .map(|d| d.parent.model_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    roots.sort();

    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }
        // (node, next child index) frames; `trail` mirrors the in-progress path
        let mut stack: Vec<(ModelId, usize)> = vec![(root, 0)];
        let mut trail: Vec<ModelId> = vec![root];
        marks.insert(root, Mark::InProgress);

        while let Some((node, cursor)) = stack.last_mut() {
            let node = *node;
            let next = graph.dependent_ids(node).nth(*cursor);
            *cursor += 1;
            match next {
                Some(child) => match marks.get(&child) {
                    Some(Mark::InProgress) => {
                        let start = trail.iter().position(|&id| id == child).unwrap_or(0);
                        let mut path = trail[start..].to_vec();
                        path.push(child);
                        return Some(path);
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child, Mark::InProgress);
                        stack.push((child, 0));
                        trail.push(child);
                    }
                },
                None => {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    trail.pop();
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Dataset, DatasetLink, DatasetType, DependencyType, Model, ModelDependency, ModelRef,
        ModelVersion,
    };
    use modelgov_core_types::DatasetId;

    fn dep(parent: u64, child: u64) -> ModelDependency {
        ModelDependency::new(
            ModelRef::model(ModelId(parent)),
            ModelRef::model(ModelId(child)),
            DependencyType::DerivedFrom,
        )
    }

    fn models(ids: &[u64]) -> EntityGraph {
        let mut graph = EntityGraph::new();
        for &id in ids {
            graph.insert_model(Model::new(ModelId(id), format!("m{}", id), "team"));
        }
        graph
    }

    #[test]
    fn test_find_cycle_none_for_dag() {
        let mut graph = models(&[1, 2, 3]);
        graph.insert_dependency(dep(1, 2));
        graph.insert_dependency(dep(1, 3));
        graph.insert_dependency(dep(2, 3));
        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_find_cycle_reports_closed_path() {
        let mut graph = models(&[1, 2, 3]);
        graph.insert_dependency(dep(1, 2));
        graph.insert_dependency(dep(2, 3));
        graph.insert_dependency(dep(3, 2));
        assert_eq!(
            find_cycle(&graph),
            Some(vec![ModelId(2), ModelId(3), ModelId(2)])
        );
    }

    #[test]
    fn test_find_cycle_self_loop() {
        let mut graph = models(&[4]);
        graph.insert_dependency(dep(4, 4));
        assert_eq!(find_cycle(&graph), Some(vec![ModelId(4), ModelId(4)]));
    }

    #[test]
    fn test_find_orphans_and_dangling() {
        let mut graph = models(&[1]);
        graph.insert_version(ModelVersion::new(VersionId(9), ModelId(7), "v1"));
        graph.insert_dependency(dep(1, 7));
        graph.insert_link(DatasetLink::new(ModelId(1), DatasetId(3), DatasetType::Training));

        assert_eq!(find_orphan_versions(&graph), vec![(VersionId(9), ModelId(7))]);
        assert_eq!(find_dangling_dependencies(&graph), vec![0]);
        assert_eq!(find_dangling_links(&graph), vec![0]);

        graph.insert_dataset(Dataset::new(DatasetId(3), "events"));
        assert!(find_dangling_links(&graph).is_empty());
    }

    #[test]
    fn test_find_approval_mismatches() {
        let mut graph = models(&[1, 2]);
        let mut approved = Model::new(ModelId(2), "m2", "team");
        approved.compliance_status = ComplianceStatus::Approved;
        graph.insert_model(approved);

        assert_eq!(
            find_approval_mismatches(&graph),
            vec![(ModelId(2), ComplianceStatus::Approved)]
        );
    }

    #[test]
    fn test_find_duplicate_edges() {
        let mut graph = models(&[1, 2]);
        graph.insert_dependency(dep(1, 2));
        graph.insert_dependency(dep(1, 2));
        assert_eq!(find_duplicate_edges(&graph), vec![1]);
    }

    #[test]
    fn test_find_dangling_link_behind_valid_twin() {
        let mut graph = models(&[1, 2]);
        graph.insert_version(ModelVersion::new(VersionId(10), ModelId(1), "v1"));
        graph.insert_version(ModelVersion::new(VersionId(20), ModelId(2), "v1"));
        graph.insert_dataset(Dataset::new(DatasetId(5), "claims"));
        graph.insert_link(
            DatasetLink::new(ModelId(1), DatasetId(5), DatasetType::Training).pinned_to(VersionId(10)),
        );
        graph.insert_link(
            DatasetLink::new(ModelId(1), DatasetId(5), DatasetType::Training).pinned_to(VersionId(20)),
        );

        assert_eq!(find_dangling_links(&graph), vec![1]);
    }

    #[test]
    fn test_find_duplicate_links_offset_past_dependencies() {
        let mut graph = models(&[1, 2]);
        graph.insert_dataset(Dataset::new(DatasetId(5), "claims"));
        graph.insert_dependency(dep(1, 2));
        graph.insert_link(DatasetLink::new(ModelId(1), DatasetId(5), DatasetType::Training));
        graph.insert_link(DatasetLink::new(ModelId(1), DatasetId(5), DatasetType::Validation));
        graph.insert_link(DatasetLink::new(ModelId(1), DatasetId(5), DatasetType::Training));

        assert_eq!(find_duplicate_edges(&graph), vec![3]);
    }
}
