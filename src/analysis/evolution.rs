use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::analysis::extractor::SectionExtractor;
use crate::models::metrics::{
    CommunityEngagement, DevelopmentVelocity, FocusArea, ProjectEvolutionMetrics, Trend,
};
use crate::models::release::ReleaseNote;

/// Trailing window for all trend analysis, in days.
const ANALYSIS_WINDOW_DAYS: i64 = 180;

/// Fixed focus-area keyword table; a feature may tag several categories.
const FOCUS_PATTERNS: &[(&str, &str)] = &[
    ("API", r"(?i)api|endpoint|rest|graphql"),
    ("UI/UX", r"(?i)ui|interface|design|css|style"),
    ("Performance", r"(?i)performance|optimize|speed|faster"),
    ("Security", r"(?i)security|auth|permission|role"),
    ("Testing", r"(?i)test|coverage|spec|assertion"),
    ("Documentation", r"(?i)doc|readme|guide|tutorial"),
    ("Bug Fixes", r"(?i)bug|fix|issue|resolve"),
    ("Code Quality", r"(?i)refactor|clean|improve|enhance"),
];

/// Computes development velocity, focus-area trends and community growth
/// over the trailing analysis window.
///
/// Expects `releases` sorted newest-first; the window boundary is anchored
/// on the explicit reference instant rather than the ambient clock.
pub struct EvolutionAnalyzer<'a> {
    releases: &'a [ReleaseNote],
    extractor: &'a SectionExtractor,
    focus_patterns: Vec<(&'static str, Regex)>,
    reference_time: DateTime<Utc>,
}

impl<'a> EvolutionAnalyzer<'a> {
    pub fn new(
        releases: &'a [ReleaseNote],
        extractor: &'a SectionExtractor,
        reference_time: DateTime<Utc>,
    ) -> Self {
        let focus_patterns = FOCUS_PATTERNS
            .iter()
            .map(|(category, pattern)| (*category, Regex::new(pattern).unwrap()))
            .collect();

        Self {
            releases,
            extractor,
            focus_patterns,
            reference_time,
        }
    }

    pub fn analyze(&self) -> ProjectEvolutionMetrics {
        ProjectEvolutionMetrics {
            development_velocity: self.development_velocity(),
            focus_areas: self.focus_areas(),
            community_engagement: self.community_engagement(),
        }
    }

    fn recent_releases(&self) -> Vec<&'a ReleaseNote> {
        let cutoff = self.reference_time - Duration::days(ANALYSIS_WINDOW_DAYS);
        self.releases
            .iter()
            .filter(|release| release.created_at >= cutoff)
            .collect()
    }

    fn development_velocity(&self) -> DevelopmentVelocity {
        let recent = self.recent_releases();
        let months = ANALYSIS_WINDOW_DAYS as f64 / 30.0;

        let feature_count: usize = recent
            .iter()
            .map(|release| self.extractor.features(release.body.as_deref()).len())
            .sum();

        let breaking_count: usize = recent
            .iter()
            .map(|release| self.extractor.breaking_changes(release.body.as_deref()).len())
            .sum();

        DevelopmentVelocity {
            release_frequency: recent.len() as f64 / months,
            feature_velocity: feature_count as f64 / months,
            breaking_change_frequency: breaking_count as f64 / months,
        }
    }

    /// Tags each release's extracted features against the focus-area table
    /// and counts, per category, the releases that touched it.
    fn focus_areas(&self) -> Vec<FocusArea> {
        let mut frequency = vec![0u32; self.focus_patterns.len()];
        let mut trends: Vec<Vec<f64>> = vec![Vec::new(); self.focus_patterns.len()];
        let mut seen_order: Vec<usize> = Vec::new();

        for release in self.recent_releases() {
            let features = self.extractor.features(release.body.as_deref());

            let mut categories = HashSet::new();
            for feature in &features {
                for (index, (_, pattern)) in self.focus_patterns.iter().enumerate() {
                    if pattern.is_match(feature) {
                        categories.insert(index);
                    }
                }
            }

            // Deterministic accumulation order across the table.
            for index in 0..self.focus_patterns.len() {
                if categories.contains(&index) {
                    if frequency[index] == 0 {
                        seen_order.push(index);
                    }
                    frequency[index] += 1;
                    trends[index].push(1.0);
                }
            }
        }

        let mut areas: Vec<FocusArea> = seen_order
            .into_iter()
            .map(|index| FocusArea {
                category: self.focus_patterns[index].0.to_string(),
                frequency: frequency[index],
                trend: classify_trend(&trends[index]),
            })
            .collect();

        areas.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        areas
    }

    fn community_engagement(&self) -> CommunityEngagement {
        let recent = self.recent_releases();

        // Cumulative distinct contributors, oldest release first.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut series: Vec<f64> = Vec::new();
        for release in recent.iter().rev() {
            for contributor in &release.contributors {
                seen.insert(contributor.login.as_str());
            }
            series.push(seen.len() as f64);
        }

        CommunityEngagement {
            contributor_growth: compound_growth_rate(&series),
            // No issue or PR data source is wired in; reported as 0 rather
            // than omitted.
            issue_resolution_time: 0.0,
            pr_merge_rate: 0.0,
        }
    }
}

fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }

    let slope = linear_regression_slope(values);
    if slope > 0.1 {
        Trend::Increasing
    } else if slope < -0.1 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn linear_regression_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();

    (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x)
}

/// Compound growth rate in percent; 0 for short series or a zero start so
/// the result is never NaN or infinite.
fn compound_growth_rate(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let initial = values[0];
    if initial == 0.0 {
        return 0.0;
    }

    let last = values[values.len() - 1];
    let periods = (values.len() - 1) as f64;
    ((last / initial).powf(1.0 / periods) - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::release::Contributor;

    fn release(tag: &str, days_ago: i64, body: Option<&str>, logins: &[&str]) -> ReleaseNote {
        ReleaseNote {
            tag_name: tag.to_string(),
            name: None,
            body: body.map(|b| b.to_string()),
            created_at: Utc::now() - Duration::days(days_ago),
            url: format!("https://example.com/{}", tag),
            reactions: Vec::new(),
            contributors: logins
                .iter()
                .map(|login| Contributor {
                    login: login.to_string(),
                    contributions: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_growth_rate_guards() {
        assert_eq!(compound_growth_rate(&[]), 0.0);
        assert_eq!(compound_growth_rate(&[3.0]), 0.0);
        assert_eq!(compound_growth_rate(&[0.0, 5.0]), 0.0);
    }

    #[test]
    fn test_growth_rate_doubling() {
        // 1 -> 4 over two periods doubles each period.
        let rate = compound_growth_rate(&[1.0, 2.0, 4.0]);
        assert!((rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_indicator_series_is_stable() {
        assert_eq!(classify_trend(&[1.0, 1.0, 1.0]), Trend::Stable);
        assert_eq!(classify_trend(&[1.0]), Trend::Stable);
    }

    #[test]
    fn test_release_frequency_per_month() {
        let releases = vec![
            release("v1.2.0", 10, None, &[]),
            release("v1.1.0", 40, None, &[]),
            release("v1.0.0", 70, None, &[]),
        ];
        let extractor = SectionExtractor::new();
        let analyzer = EvolutionAnalyzer::new(&releases, &extractor, Utc::now());
        let velocity = analyzer.development_velocity();
        assert!((velocity.release_frequency - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_old_releases_fall_outside_window() {
        let releases = vec![
            release("v2.0.0", 10, Some("### Features\n- New API endpoint\n"), &[]),
            release("v1.0.0", 400, Some("### Features\n- Ancient UI work\n"), &[]),
        ];
        let extractor = SectionExtractor::new();
        let analyzer = EvolutionAnalyzer::new(&releases, &extractor, Utc::now());
        let areas = analyzer.focus_areas();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].category, "API");
        assert_eq!(areas[0].frequency, 1);
    }

    #[test]
    fn test_focus_areas_sorted_by_frequency() {
        let body_api = "### Features\n- Add API endpoint\n";
        let body_both = "### Features\n- Add API pagination\n- Improve test coverage\n";
        let releases = vec![
            release("v3", 5, Some(body_api), &[]),
            release("v2", 15, Some(body_both), &[]),
            release("v1", 25, Some(body_api), &[]),
        ];
        let extractor = SectionExtractor::new();
        let analyzer = EvolutionAnalyzer::new(&releases, &extractor, Utc::now());
        let areas = analyzer.focus_areas();
        assert_eq!(areas[0].category, "API");
        assert_eq!(areas[0].frequency, 3);
    }

    #[test]
    fn test_contributor_growth_single_release_is_zero() {
        let releases = vec![release("v1", 5, None, &["alice", "bob"])];
        let extractor = SectionExtractor::new();
        let analyzer = EvolutionAnalyzer::new(&releases, &extractor, Utc::now());
        let engagement = analyzer.community_engagement();
        assert_eq!(engagement.contributor_growth, 0.0);
        assert_eq!(engagement.issue_resolution_time, 0.0);
        assert_eq!(engagement.pr_merge_rate, 0.0);
    }
}
