//! Hypothetical mutations
//!
//! Nothing here modifies the receiving graph. Each `propose_*` validates the
//! change and returns the post-mutation graph; the caller commits it through
//! its persistence layer or drops it.

use super::store::EntityGraph;
use crate::errors::Result;
use crate::model::{DatasetLink, Model, ModelDependency};
use crate::rules::integrity;

/// A new edge to add to the graph
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeProposal {
    /// `child` depends on `parent`
    Dependency(ModelDependency),
    /// Model (or version) uses a dataset
    DatasetLink(DatasetLink),
}

impl EdgeProposal {
    /// Name used for this edge kind in audit records and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            EdgeProposal::Dependency(_) => "model_dependency",
            EdgeProposal::DatasetLink(_) => "model_dataset_link",
        }
    }
}

impl EntityGraph {
    /// Validate an edge and return the graph as it would be with the edge added
    ///
    /// This is the single entry point for structural edge mutation. The edge
    /// passes the dependency integrity checks before it is applied to a copy.
    ///
    /// # Errors
    ///
    /// Returns `CycleDetected`, `UnknownEntity`, `EntityRetired`,
    /// `VersionNotOwned` or `DuplicateEdge` from the integrity checker.
    pub fn propose_edge(&self, edge: EdgeProposal) -> Result<EntityGraph> {
        integrity::check_edge(self, &edge)?;

        let mut next = self.clone();
        match edge {
            EdgeProposal::Dependency(dependency) => next.insert_dependency(dependency),
            EdgeProposal::DatasetLink(link) => next.insert_link(link),
        }
        Ok(next)
    }

    /// Return the graph with an existing model replaced by `updated`
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the model is not in the graph and
    /// `ApprovalInvariantBroken` if `updated` breaks the approval invariant.
    pub fn propose_model_update(&self, updated: Model) -> Result<EntityGraph> {
        self.get_model(updated.id)?;
        updated.check_approval_invariant()?;

        let mut next = self.clone();
        next.insert_model(updated);
        Ok(next)
    }
}
