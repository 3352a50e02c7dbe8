use std::collections::HashMap;

use modelgov_core_types::{DatasetId, ModelId, VersionId};

use crate::errors::{GovError, Result};
use crate::model::{Dataset, DatasetLink, EntityKind, Model, ModelDependency, ModelVersion};

/// In-memory snapshot of governed entities and their typed edges
///
/// Entities live in id-indexed maps and edges refer to them by id only, so a
/// cycle in the dependency relation never becomes a cycle in ownership.
/// Edge vectors are append-only; the side indexes hold positions into them.
///
/// The graph carries no business logic. It is built from a caller-supplied
/// snapshot and only changes through `propose_*`, which return a new graph
/// rather than touching this one.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    pub(crate) models: HashMap<ModelId, Model>,
    pub(crate) versions: HashMap<VersionId, ModelVersion>,
    pub(crate) datasets: HashMap<DatasetId, Dataset>,
    pub(crate) links: Vec<DatasetLink>,
    pub(crate) dependencies: Vec<ModelDependency>,

    versions_by_model: HashMap<ModelId, Vec<VersionId>>,
    /// parent model -> positions in `dependencies`
    pub(crate) children_index: HashMap<ModelId, Vec<usize>>,
    /// child model -> positions in `dependencies`
    pub(crate) parents_index: HashMap<ModelId, Vec<usize>>,
    /// model -> positions in `links`
    pub(crate) links_index: HashMap<ModelId, Vec<usize>>,
}

impl EntityGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a model by ID
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the model is not in the snapshot.
    pub fn get_model(&self, id: ModelId) -> Result<&Model> {
        self.models
            .get(&id)
            .ok_or_else(|| GovError::unknown(EntityKind::Model, id))
    }

    /// Get a model that may still be mutated
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if absent, `EntityRetired` if the model is retired.
    pub fn get_live_model(&self, id: ModelId) -> Result<&Model> {
        let model = self.get_model(id)?;
        if model.is_retired() {
            return Err(GovError::EntityRetired {
                kind: EntityKind::Model,
                id: id.get(),
            });
        }
        Ok(model)
    }

    /// # Errors
    ///
    /// Returns `UnknownEntity` if the version is not in the snapshot.
    pub fn get_version(&self, id: VersionId) -> Result<&ModelVersion> {
        self.versions
            .get(&id)
            .ok_or_else(|| GovError::unknown(EntityKind::ModelVersion, id))
    }

    /// # Errors
    ///
    /// Returns `UnknownEntity` if the dataset is not in the snapshot.
    pub fn get_dataset(&self, id: DatasetId) -> Result<&Dataset> {
        self.datasets
            .get(&id)
            .ok_or_else(|| GovError::unknown(EntityKind::Dataset, id))
    }

    /// Resolve a version and check it belongs to `model_id`
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if absent, `VersionNotOwned` if owned by another model.
    pub fn get_owned_version(&self, model_id: ModelId, id: VersionId) -> Result<&ModelVersion> {
        let version = self.get_version(id)?;
        if version.model_id != model_id {
            return Err(GovError::VersionNotOwned {
                version_id: id,
                model_id,
            });
        }
        Ok(version)
    }

    /// All models in ascending id order
    pub fn list_models(&self) -> Vec<&Model> {
        let mut models: Vec<&Model> = self.models.values().collect();
        models.sort_by_key(|m| m.id);
        models
    }

    /// Versions of a model in ascending id order
    pub fn versions_of(&self, model_id: ModelId) -> Vec<&ModelVersion> {
        let mut versions: Vec<&ModelVersion> = self
            .versions_by_model
            .get(&model_id)
            .map(|ids| ids.iter().filter_map(|id| self.versions.get(id)).collect())
            .unwrap_or_default();
        versions.sort_by_key(|v| v.id);
        versions
    }

    /// The model's current version: the one with the highest id
    pub fn latest_version(&self, model_id: ModelId) -> Option<&ModelVersion> {
        self.versions_of(model_id).into_iter().last()
    }

    pub fn dependencies(&self) -> &[ModelDependency] {
        &self.dependencies
    }

    pub fn links(&self) -> &[DatasetLink] {
        &self.links
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Insert or replace a model
    ///
    /// Raw insertion used by snapshot hydration and test setup; no checks.
    pub fn insert_model(&mut self, model: Model) {
        self.models.insert(model.id, model);
    }

    /// Insert a version and index it under its owning model
    pub fn insert_version(&mut self, version: ModelVersion) {
        if let Some(previous) = self.versions.get(&version.id) {
            if let Some(ids) = self.versions_by_model.get_mut(&previous.model_id) {
                ids.retain(|id| *id != version.id);
            }
        }
        self.versions_by_model
            .entry(version.model_id)
            .or_default()
            .push(version.id);
        self.versions.insert(version.id, version);
    }

    pub fn insert_dataset(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.id, dataset);
    }

    /// Append a dataset link
    pub fn insert_link(&mut self, link: DatasetLink) {
        let position = self.links.len();
        self.links_index
            .entry(link.model_id)
            .or_default()
            .push(position);
        self.links.push(link);
    }

    /// Append a dependency edge
    pub fn insert_dependency(&mut self, dependency: ModelDependency) {
        let position = self.dependencies.len();
        self.children_index
            .entry(dependency.parent.model_id)
            .or_default()
            .push(position);
        self.parents_index
            .entry(dependency.child.model_id)
            .or_default()
            .push(position);
        self.dependencies.push(dependency);
    }
}
