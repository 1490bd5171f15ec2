use std::collections::HashMap;

use chrono::{DateTime, Months, Utc};
use regex::Regex;

use crate::models::metrics::ProjectMaturityIndicators;
use crate::models::release::{ReleaseNote, RepositoryMetrics};

/// Scores codebase stability, documentation, test coverage, community
/// health and maintenance level, each normalized to [0,1].
///
/// Expects `releases` sorted newest-first.
pub struct MaturityAnalyzer<'a> {
    releases: &'a [ReleaseNote],
    repo_metrics: &'a RepositoryMetrics,
    breaking_pattern: Regex,
    bugfix_pattern: Regex,
    reference_time: DateTime<Utc>,
}

impl<'a> MaturityAnalyzer<'a> {
    pub fn new(
        releases: &'a [ReleaseNote],
        repo_metrics: &'a RepositoryMetrics,
        reference_time: DateTime<Utc>,
    ) -> Self {
        Self {
            releases,
            repo_metrics,
            breaking_pattern: Regex::new(r"(?i)breaking change").unwrap(),
            bugfix_pattern: Regex::new(r"(?i)fix|bug|issue|resolve").unwrap(),
            reference_time,
        }
    }

    pub fn analyze(&self) -> ProjectMaturityIndicators {
        ProjectMaturityIndicators {
            codebase_stability: self.codebase_stability(),
            documentation_completeness: self.documentation_completeness(),
            test_coverage: self.test_coverage(),
            community_health: self.community_health(),
            maintenance_level: self.maintenance_level(),
        }
    }

    fn recent_releases(&self, months: u32) -> Vec<&'a ReleaseNote> {
        let cutoff = self
            .reference_time
            .checked_sub_months(Months::new(months))
            .unwrap_or(self.reference_time);

        self.releases
            .iter()
            .filter(|release| release.created_at >= cutoff)
            .collect()
    }

    fn codebase_stability(&self) -> f64 {
        let recent = self.recent_releases(6);

        // Factor 1: breaking-change frequency (30% weight)
        let breaking_count: usize = recent
            .iter()
            .map(|release| self.count_matches(&self.breaking_pattern, release.body.as_deref()))
            .sum();
        let breaking_score = (10.0 - breaking_count as f64).max(0.0) * 3.0;

        // Factor 2: bug-fix frequency (30% weight)
        let bugfix_count: usize = recent
            .iter()
            .map(|release| self.count_matches(&self.bugfix_pattern, release.body.as_deref()))
            .sum();
        let bugfix_score = (10.0 - bugfix_count as f64).max(0.0) * 3.0;

        // Factor 3: release consistency (40% weight)
        let consistency_score = self.release_consistency(&recent) * 4.0;

        let stability = breaking_score + bugfix_score + consistency_score;
        (stability.min(100.0) / 100.0).clamp(0.0, 1.0)
    }

    fn documentation_completeness(&self) -> f64 {
        // Factor 1: documentation coverage (50% weight)
        let coverage_score = self.repo_metrics.code_quality.documentation_ratio * 50.0;

        // Factor 2: documentation update frequency (30% weight)
        let update_score = self.documentation_update_frequency() * 30.0;

        // Factor 3: documentation quality (20% weight)
        let quality_score = self.documentation_quality() * 20.0;

        ((coverage_score + update_score + quality_score) / 100.0).clamp(0.0, 1.0)
    }

    fn test_coverage(&self) -> f64 {
        self.repo_metrics.code_quality.test_coverage.clamp(0.0, 1.0)
    }

    fn community_health(&self) -> f64 {
        // Factor 1: contributor diversity (40% weight)
        let diversity_score = self.contributor_diversity() * 40.0;

        // Factor 2: activity level (30% weight)
        let activity_score = self.activity_level() * 30.0;

        // Factor 3: responsiveness (30% weight)
        let responsiveness_score = self.responsiveness() * 30.0;

        ((diversity_score + activity_score + responsiveness_score) / 100.0).clamp(0.0, 1.0)
    }

    fn maintenance_level(&self) -> f64 {
        // Factor 1: release frequency (40% weight)
        let release_score = self.release_frequency_score() * 40.0;

        // Factor 2: issue resolution rate (30% weight)
        let issue_score = (self.repo_metrics.activity_metrics.issue_velocity / 10.0) * 30.0;

        // Factor 3: commit frequency (30% weight)
        let commit_score = (self.repo_metrics.activity_metrics.commit_frequency / 10.0) * 30.0;

        ((release_score + issue_score + commit_score) / 100.0).clamp(0.0, 1.0)
    }

    fn count_matches(&self, pattern: &Regex, body: Option<&str>) -> usize {
        match body {
            Some(body) => pattern.find_iter(body).count(),
            None => 0,
        }
    }

    /// 1 minus the coefficient of variation of inter-release gaps, floored
    /// at 0. Fewer than two recent releases, or a degenerate zero mean gap,
    /// scores 0.
    fn release_consistency(&self, recent: &[&ReleaseNote]) -> f64 {
        if recent.len() < 2 {
            return 0.0;
        }

        let intervals: Vec<f64> = recent
            .windows(2)
            .map(|pair| {
                (pair[0].created_at - pair[1].created_at)
                    .num_milliseconds()
                    .abs() as f64
            })
            .collect();

        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if mean == 0.0 {
            return 0.0;
        }

        let variance = intervals
            .iter()
            .map(|interval| (interval - mean).powi(2))
            .sum::<f64>()
            / intervals.len() as f64;
        let cv = variance.sqrt() / mean;

        (1.0 - cv).max(0.0)
    }

    fn documentation_update_frequency(&self) -> f64 {
        let recent = self.recent_releases(6);
        if recent.is_empty() {
            return 0.0;
        }

        let doc_update_count = recent
            .iter()
            .filter(|release| {
                release
                    .body
                    .as_deref()
                    .map(|body| body.to_lowercase().contains("doc"))
                    .unwrap_or(false)
            })
            .count();

        (doc_update_count as f64 / recent.len() as f64).min(1.0)
    }

    /// Structured-documentation markers over the last 3 months, 0.2 per
    /// marker per release, capped at 1.
    fn documentation_quality(&self) -> f64 {
        let recent = self.recent_releases(3);
        let mut quality_score: f64 = 0.0;

        for release in recent {
            let Some(body) = release.body.as_deref() else {
                continue;
            };

            for marker in ["##", "example", "usage", "migration", "guide"] {
                if body.contains(marker) {
                    quality_score += 0.2;
                }
            }
        }

        quality_score.min(1.0)
    }

    /// 1 minus the Gini coefficient of per-contributor release-appearance
    /// counts across all releases; 0 when there are no contributors.
    fn contributor_diversity(&self) -> f64 {
        let mut appearance_counts: HashMap<&str, u32> = HashMap::new();
        for release in self.releases {
            for contributor in &release.contributors {
                *appearance_counts.entry(contributor.login.as_str()).or_insert(0) += 1;
            }
        }

        let mut values: Vec<f64> = appearance_counts.values().map(|&v| v as f64).collect();
        values.sort_by(f64::total_cmp);

        let n = values.len();
        if n == 0 {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        if mean == 0.0 {
            return 0.0;
        }

        let total_diff: f64 = values
            .iter()
            .map(|a| values.iter().map(|b| (a - b).abs()).sum::<f64>())
            .sum();

        let gini = total_diff / (2.0 * (n * n) as f64 * mean);
        1.0 - gini
    }

    fn activity_level(&self) -> f64 {
        // Expect roughly 2 releases per month over the last quarter.
        (self.recent_releases(3).len() as f64 / 6.0).min(1.0)
    }

    fn responsiveness(&self) -> f64 {
        (self.repo_metrics.activity_metrics.commit_frequency / 10.0).min(1.0)
    }

    fn release_frequency_score(&self) -> f64 {
        (self.recent_releases(6).len() as f64 / 12.0).min(1.0)
    }
}
