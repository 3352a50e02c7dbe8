//! Read-only traversal over the entity graph
//!
//! Every query here is side-effect free and may run concurrently against the
//! same immutable snapshot. Results follow edge insertion order.

use modelgov_core_types::{ModelId, VersionId};

use super::store::EntityGraph;
use crate::errors::Result;
use crate::model::{Dataset, DatasetLink, DatasetType, ModelDependency};

/// A dataset link resolved together with its dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkedDataset<'a> {
    pub link: &'a DatasetLink,
    pub dataset: &'a Dataset,
}

/// Direct lineage of a model: its data and its neighbouring models
#[derive(Debug, Clone, PartialEq)]
pub struct Lineage<'a> {
    pub model_id: ModelId,
    pub datasets: Vec<LinkedDataset<'a>>,
    /// Edges where this model is the child (models it was derived from)
    pub parents: Vec<&'a ModelDependency>,
    /// Edges where this model is the parent (models derived from it)
    pub children: Vec<&'a ModelDependency>,
}

impl EntityGraph {
    /// Dependency edges whose parent is `model_id`
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the model is not in the snapshot.
    pub fn children_of(&self, model_id: ModelId) -> Result<Vec<&ModelDependency>> {
        self.get_model(model_id)?;
        Ok(self.edges_at(self.children_index.get(&model_id)))
    }

    /// Dependency edges whose child is `model_id`
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the model is not in the snapshot.
    pub fn parents_of(&self, model_id: ModelId) -> Result<Vec<&ModelDependency>> {
        self.get_model(model_id)?;
        Ok(self.edges_at(self.parents_index.get(&model_id)))
    }

    /// Datasets linked to a model
    ///
    /// With a `version_id`, returns links pinned to that version plus links
    /// made at model level (which apply to every version). With a
    /// `dataset_type`, only links of that role are returned.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` for an absent model, version or linked dataset,
    /// and `VersionNotOwned` if the version belongs to another model.
    pub fn datasets_of(
        &self,
        model_id: ModelId,
        version_id: Option<VersionId>,
        dataset_type: Option<DatasetType>,
    ) -> Result<Vec<LinkedDataset<'_>>> {
        self.get_model(model_id)?;
        if let Some(version_id) = version_id {
            self.get_owned_version(model_id, version_id)?;
        }

        let positions = self
            .links_index
            .get(&model_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut found = Vec::new();
        for link in positions.iter().map(|&i| &self.links[i]) {
            let version_matches = match (version_id, link.version_id) {
                (None, _) | (_, None) => true,
                (Some(wanted), Some(pinned)) => wanted == pinned,
            };
            let type_matches = dataset_type.map_or(true, |t| t == link.dataset_type);
            if version_matches && type_matches {
                found.push(LinkedDataset {
                    link,
                    dataset: self.get_dataset(link.dataset_id)?,
                });
            }
        }
        Ok(found)
    }

    /// Full direct lineage of a model
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the model or a linked dataset is absent.
    pub fn lineage(&self, model_id: ModelId) -> Result<Lineage<'_>> {
        Ok(Lineage {
            model_id,
            datasets: self.datasets_of(model_id, None, None)?,
            parents: self.parents_of(model_id)?,
            children: self.children_of(model_id)?,
        })
    }

    /// Ids of models that directly depend on `model_id`; unchecked, used by integrity traversal
    pub(crate) fn dependent_ids(&self, model_id: ModelId) -> impl Iterator<Item = ModelId> + '_ {
        self.children_index
            .get(&model_id)
            .into_iter()
            .flatten()
            .map(|&i| self.dependencies[i].child.model_id)
    }

    fn edges_at(&self, positions: Option<&Vec<usize>>) -> Vec<&ModelDependency> {
        positions
            .map(|ps| ps.iter().map(|&i| &self.dependencies[i]).collect())
            .unwrap_or_default()
    }
}
