//! Snapshot hydration
//!
//! The persistence collaborator hands the engine a fully materialized,
//! consistent snapshot. `GraphSnapshot` is its serde form.

use serde::{Deserialize, Serialize};

use super::store::EntityGraph;
use crate::errors::Result;
use crate::model::{Dataset, DatasetLink, Model, ModelDependency, ModelVersion};
use crate::rules::validation;

/// Serializable form of an [`EntityGraph`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub versions: Vec<ModelVersion>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub links: Vec<DatasetLink>,
    #[serde(default)]
    pub dependencies: Vec<ModelDependency>,
}

impl GraphSnapshot {
    /// Parse a snapshot from JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the JSON does not match the snapshot shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl EntityGraph {
    /// Hydrate a graph from a snapshot and validate its structure
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found by
    /// [`validation::validate_graph`].
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = EntityGraph::new();
        for model in snapshot.models {
            graph.insert_model(model);
        }
        for version in snapshot.versions {
            graph.insert_version(version);
        }
        for dataset in snapshot.datasets {
            graph.insert_dataset(dataset);
        }
        for link in snapshot.links {
            graph.insert_link(link);
        }
        for dependency in snapshot.dependencies {
            graph.insert_dependency(dependency);
        }

        validation::validate_graph(&graph)?;
        tracing::debug!(
            models = graph.model_count(),
            dependencies = graph.dependencies().len(),
            links = graph.links().len(),
            "hydrated entity graph"
        );
        Ok(graph)
    }

    /// Export the graph; entities in ascending id order, edges in insertion order
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut versions: Vec<ModelVersion> = self.versions.values().cloned().collect();
        versions.sort_by_key(|v| v.id);
        let mut datasets: Vec<Dataset> = self.datasets.values().cloned().collect();
        datasets.sort_by_key(|d| d.id);

        GraphSnapshot {
            models: self.list_models().into_iter().cloned().collect(),
            versions,
            datasets,
            links: self.links.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}
