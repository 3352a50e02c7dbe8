use chrono::{DateTime, Utc};
use modelgov_core_types::{MetricId, ModelId, VersionId};
use serde::{Deserialize, Serialize};

/// A concrete trained artefact of a model
///
/// Versions are owned by exactly one model and are immutable once created,
/// except for where the artefact is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub id: VersionId,

    /// Owning model
    pub model_id: ModelId,

    pub version_tag: String,

    /// Artefact location (e.g. an object-store URI)
    #[serde(default)]
    pub storage_location: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl ModelVersion {
    pub fn new(id: VersionId, model_id: ModelId, version_tag: impl Into<String>) -> Self {
        Self {
            id,
            model_id,
            version_tag: version_tag.into(),
            storage_location: None,
            created_at: Utc::now(),
        }
    }

    /// Move the stored artefact; the only permitted mutation of a version
    pub fn relocate(&mut self, location: impl Into<String>) {
        self.storage_location = Some(location.into());
    }
}

/// A recorded evaluation result for a model version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetric {
    pub id: MetricId,
    pub version_id: VersionId,
    pub metric_name: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl EvaluationMetric {
    pub fn new(
        id: MetricId,
        version_id: VersionId,
        metric_name: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id,
            version_id,
            metric_name: metric_name.into(),
            value,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_only_touches_location() {
        let mut version = ModelVersion::new(VersionId(10), ModelId(1), "v1.0.0");
        let before = version.clone();

        version.relocate("s3://models/fraud/v1.0.0");

        assert_eq!(
            version.storage_location.as_deref(),
            Some("s3://models/fraud/v1.0.0")
        );
        assert_eq!(version.id, before.id);
        assert_eq!(version.model_id, before.model_id);
        assert_eq!(version.version_tag, before.version_tag);
        assert_eq!(version.created_at, before.created_at);
    }
}
