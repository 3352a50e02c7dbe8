//! Evaluation metrics collaborator
//!
//! The engine never owns evaluation results; it asks a `MetricsSource`
//! whether any have been recorded for a version.

use std::collections::HashMap;

use modelgov_core_types::VersionId;

use crate::model::EvaluationMetric;

/// Read-only access to recorded evaluation metrics
///
/// Injected into the governance engine so approval checks stay a pure
/// function of their inputs.
///
/// # Example
/// ```
/// use modelgov_core::metrics::{InMemoryMetrics, MetricsSource};
/// use modelgov_core::model::EvaluationMetric;
/// use modelgov_core_types::{MetricId, VersionId};
///
/// let mut metrics = InMemoryMetrics::new();
/// metrics.record(EvaluationMetric::new(MetricId(1), VersionId(3), "auc", 0.91));
/// assert_eq!(metrics.count_for_version(VersionId(3)), 1);
/// assert_eq!(metrics.count_for_version(VersionId(4)), 0);
/// ```
pub trait MetricsSource: Send + Sync {
    /// Number of metrics recorded against `version_id`
    fn count_for_version(&self, version_id: VersionId) -> usize;
}

/// Metrics held in memory, grouped by version
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetrics {
    by_version: HashMap<VersionId, Vec<EvaluationMetric>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metric: EvaluationMetric) {
        self.by_version
            .entry(metric.version_id)
            .or_default()
            .push(metric);
    }

    /// Metrics for a version in recording order
    pub fn for_version(&self, version_id: VersionId) -> &[EvaluationMetric] {
        self.by_version
            .get(&version_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl FromIterator<EvaluationMetric> for InMemoryMetrics {
    fn from_iter<I: IntoIterator<Item = EvaluationMetric>>(iter: I) -> Self {
        let mut metrics = Self::new();
        for metric in iter {
            metrics.record(metric);
        }
        metrics
    }
}

impl MetricsSource for InMemoryMetrics {
    fn count_for_version(&self, version_id: VersionId) -> usize {
        self.for_version(version_id).len()
    }
}
