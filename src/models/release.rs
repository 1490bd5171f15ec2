use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A reaction kind attached to a release, grouped with its count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub total_count: u32,
}

/// A commit author within one release's commit range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

/// A published release with its free-text body and engagement data.
///
/// Immutable once fetched; the analyzers never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNote {
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub reactions: Vec<Reaction>,
    pub contributors: Vec<Contributor>,
}

impl ReleaseNote {
    pub fn validate(&self) -> Result<()> {
        if self.tag_name.is_empty() {
            return Err(Error::InvalidInput(
                "release is missing a tag name".to_string(),
            ));
        }
        Ok(())
    }
}

/// Externally supplied snapshot of repository-level metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetrics {
    pub code_quality: CodeQualityMetrics,
    pub activity_metrics: ActivityMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeQualityMetrics {
    pub test_coverage: f64,
    pub documentation_ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    pub commit_frequency: f64,
    pub issue_velocity: f64,
}

impl RepositoryMetrics {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("codeQuality.testCoverage", self.code_quality.test_coverage),
            (
                "codeQuality.documentationRatio",
                self.code_quality.documentation_ratio,
            ),
            (
                "activityMetrics.commitFrequency",
                self.activity_metrics.commit_frequency,
            ),
            (
                "activityMetrics.issueVelocity",
                self.activity_metrics.issue_velocity,
            ),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "repository metric {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Engagement rating for one release: contributors weigh 10 points each,
/// reactions 5 points each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRating {
    pub version: String,
    pub score: u32,
    pub contributor_count: u32,
    pub reaction_count: u32,
    pub date: String,
}

/// Extracted change summary for one version bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStory {
    pub version: String,
    pub date: String,
    pub major_features: Vec<String>,
    pub breaking_changes: Vec<String>,
    pub deprecations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_validation_rejects_nan() {
        let mut metrics = RepositoryMetrics::default();
        metrics.code_quality.test_coverage = f64::NAN;
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn test_metrics_validation_rejects_negative() {
        let mut metrics = RepositoryMetrics::default();
        metrics.activity_metrics.issue_velocity = -1.0;
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn test_default_metrics_are_valid() {
        assert!(RepositoryMetrics::default().validate().is_ok());
    }
}
