use std::cmp::Ordering;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::analysis::community::CommunityAnalyzer;
use crate::analysis::contribution::ContributionAnalyzer;
use crate::analysis::evolution::EvolutionAnalyzer;
use crate::analysis::extractor::SectionExtractor;
use crate::analysis::maturity::MaturityAnalyzer;
use crate::analysis::strategic::StrategicAnalyzer;
use crate::error::Result;
use crate::models::metrics::ComprehensiveAnalysis;
use crate::models::release::{
    Contributor, FeatureStory, ReleaseNote, ReleaseRating, RepositoryMetrics,
};

/// Entry point for all release analytics over one repository.
///
/// Holds the release list sorted newest-first and fans out to the
/// specialized analyzers. Window-relative calculations are anchored on a
/// reference instant that defaults to construction time and can be pinned
/// for reproducible runs.
pub struct ReleaseAnalyzer {
    releases: Vec<ReleaseNote>,
    repo_name: String,
    repo_metrics: RepositoryMetrics,
    extractor: SectionExtractor,
    reference_time: DateTime<Utc>,
}

impl ReleaseAnalyzer {
    pub fn new(
        releases: Vec<ReleaseNote>,
        repo_name: impl Into<String>,
        repo_metrics: RepositoryMetrics,
    ) -> Result<Self> {
        for release in &releases {
            release.validate()?;
        }
        repo_metrics.validate()?;

        let mut releases = releases;
        releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Self {
            releases,
            repo_name: repo_name.into(),
            repo_metrics,
            extractor: SectionExtractor::new(),
            reference_time: Utc::now(),
        })
    }

    /// Pins the instant that anchors trailing-window calculations.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn releases(&self) -> &[ReleaseNote] {
        &self.releases
    }

    pub fn analyze_comprehensively(&self) -> ComprehensiveAnalysis {
        let evolution_analyzer =
            EvolutionAnalyzer::new(&self.releases, &self.extractor, self.reference_time);
        let maturity_analyzer =
            MaturityAnalyzer::new(&self.releases, &self.repo_metrics, self.reference_time);
        let contribution_analyzer = ContributionAnalyzer::new();
        let strategic_analyzer = StrategicAnalyzer::new();
        let community_analyzer = CommunityAnalyzer::new();

        let evolution = evolution_analyzer.analyze();
        let maturity = maturity_analyzer.analyze();
        let opportunities = contribution_analyzer.identify_opportunities(&evolution, &self.releases);
        let insights = strategic_analyzer.generate_insights(&evolution, &maturity);

        // The community roster counts a login once per release it shipped in.
        let roster: Vec<Contributor> = self
            .releases
            .iter()
            .flat_map(|release| release.contributors.iter().cloned())
            .collect();
        let community = community_analyzer.analyze_community_dynamics(&self.releases, &roster);

        ComprehensiveAnalysis {
            ratings: self.calculate_release_ratings(),
            feature_story: self.generate_feature_story(),
            evolution,
            opportunities,
            maturity,
            insights,
            community,
        }
    }

    /// Scores every release from engagement: 10 points per contributor and
    /// 5 per reaction, returned best-first.
    pub fn calculate_release_ratings(&self) -> Vec<ReleaseRating> {
        let mut ratings: Vec<ReleaseRating> = self
            .releases
            .iter()
            .map(|release| {
                let reaction_count: u32 = release
                    .reactions
                    .iter()
                    .map(|reaction| reaction.total_count)
                    .sum();
                let contributor_count = release.contributors.len() as u32;

                ReleaseRating {
                    version: self.extractor.extract_version(&release.tag_name),
                    score: contributor_count * 10 + reaction_count * 5,
                    contributor_count,
                    reaction_count,
                    date: format_long_date(release.created_at),
                }
            })
            .collect();

        // Stable, so equal scores keep the newest-first release order.
        ratings.sort_by(|a, b| b.score.cmp(&a.score));
        ratings
    }

    pub fn rating_markdown(&self) -> String {
        let ratings = self.calculate_release_ratings();
        let mut markdown = format!("# {} Release Ratings\n\n", self.repo_name);

        markdown.push_str(
            "This document presents release ratings based on community engagement metrics (contributors and reactions).\n\n",
        );
        markdown.push_str("## Rating Methodology\n");
        markdown.push_str("- Each contributor adds 10 points to the release score\n");
        markdown.push_str("- Each reaction adds 5 points to the release score\n\n");
        markdown.push_str("## Release Ratings\n\n");

        for rating in &ratings {
            let _ = writeln!(markdown, "### Version {} ({})", rating.version, rating.date);
            let _ = writeln!(markdown, "- Overall Score: {}", rating.score);
            let _ = writeln!(markdown, "- Contributors: {}", rating.contributor_count);
            let _ = writeln!(markdown, "- Reactions: {}\n", rating.reaction_count);
        }

        markdown
    }

    /// Collapses releases that share an extracted version, keeping the most
    /// recent one per version, and orders the stories newest version first.
    ///
    /// Distinct tags that extract to distinct strings stay separate even
    /// when they compare numerically equal, "2.0" next to "2.0.0" included.
    pub fn generate_feature_story(&self) -> Vec<FeatureStory> {
        // First-seen bucket order is preserved for numerically equal versions.
        let mut buckets: Vec<(String, &ReleaseNote)> = Vec::new();

        for release in &self.releases {
            let version = self.extractor.extract_version(&release.tag_name);
            match buckets.iter_mut().find(|(v, _)| *v == version) {
                Some((_, kept)) => {
                    if release.created_at > kept.created_at {
                        *kept = release;
                    }
                }
                None => buckets.push((version, release)),
            }
        }

        let mut stories: Vec<FeatureStory> = buckets
            .into_iter()
            .map(|(version, release)| {
                let body = release.body.as_deref();
                let mut features = self.extractor.features(body);
                features.extend(self.extractor.plus_changes(body));

                FeatureStory {
                    version,
                    date: format_long_date(release.created_at),
                    major_features: features,
                    breaking_changes: self.extractor.breaking_changes(body),
                    deprecations: self.extractor.deprecations(body),
                }
            })
            .collect();

        stories.sort_by(|a, b| compare_versions_desc(&a.version, &b.version));
        stories
    }

    pub fn feature_story_markdown(&self) -> String {
        let stories = self.generate_feature_story();
        let mut markdown = format!("# {} Evolution: A Feature Story\n\n", self.repo_name);

        let _ = writeln!(
            markdown,
            "This document presents a chronological story of {}'s evolution, highlighting major features, breaking changes, and deprecations across versions.\n",
            self.repo_name
        );

        for story in &stories {
            let _ = writeln!(markdown, "## Version {} ({})\n", story.version, story.date);

            if !story.major_features.is_empty() {
                markdown.push_str("### Major Features & Improvements\n");
                for feature in &story.major_features {
                    let _ = writeln!(markdown, "- {}", feature);
                }
                markdown.push('\n');
            }

            if !story.breaking_changes.is_empty() {
                markdown.push_str("### Breaking Changes\n");
                for change in &story.breaking_changes {
                    let _ = writeln!(markdown, "- {}", change);
                }
                markdown.push('\n');
            }

            if !story.deprecations.is_empty() {
                markdown.push_str("### Deprecations & Removals\n");
                for deprecation in &story.deprecations {
                    let _ = writeln!(markdown, "- {}", deprecation);
                }
                markdown.push('\n');
            }

            if story.major_features.is_empty()
                && story.breaking_changes.is_empty()
                && story.deprecations.is_empty()
            {
                markdown.push_str("*No major changes documented for this version.*\n\n");
            }
        }

        markdown
    }
}

/// "March 5, 2024" style dates for the human-facing reports.
fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Newest version first, comparing dotted segments numerically with missing
/// segments treated as zero. Non-numeric tags compare as zero throughout.
fn compare_versions_desc(a: &str, b: &str) -> Ordering {
    let seg_a: Vec<u64> = a.split('.').map(|s| s.parse().unwrap_or(0)).collect();
    let seg_b: Vec<u64> = b.split('.').map(|s| s.parse().unwrap_or(0)).collect();

    for i in 0..seg_a.len().max(seg_b.len()) {
        let num_a = seg_a.get(i).copied().unwrap_or(0);
        let num_b = seg_b.get(i).copied().unwrap_or(0);
        match num_b.cmp(&num_a) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::release::{
        ActivityMetrics, CodeQualityMetrics, Contributor, Reaction,
    };

    fn metrics() -> RepositoryMetrics {
        RepositoryMetrics {
            code_quality: CodeQualityMetrics {
                test_coverage: 0.8,
                documentation_ratio: 0.5,
            },
            activity_metrics: ActivityMetrics {
                commit_frequency: 5.0,
                issue_velocity: 3.0,
            },
        }
    }

    fn release(tag: &str, days_ago: i64, body: Option<&str>) -> ReleaseNote {
        ReleaseNote {
            tag_name: tag.to_string(),
            name: None,
            body: body.map(|b| b.to_string()),
            created_at: Utc::now() - Duration::days(days_ago),
            url: format!("https://example.com/{}", tag),
            reactions: Vec::new(),
            contributors: Vec::new(),
        }
    }

    #[test]
    fn test_score_from_contributors_and_reactions() {
        let mut note = release("v1.0.0", 10, None);
        note.contributors = vec![
            Contributor {
                login: "alice".to_string(),
                contributions: 4,
            },
            Contributor {
                login: "bob".to_string(),
                contributions: 1,
            },
        ];
        note.reactions = vec![
            Reaction {
                kind: "+1".to_string(),
                total_count: 2,
            },
            Reaction {
                kind: "heart".to_string(),
                total_count: 1,
            },
        ];

        let analyzer = ReleaseAnalyzer::new(vec![note], "demo", metrics()).unwrap();
        let ratings = analyzer.calculate_release_ratings();
        assert_eq!(ratings[0].score, 35);
        assert_eq!(ratings[0].contributor_count, 2);
        assert_eq!(ratings[0].reaction_count, 3);
    }

    #[test]
    fn test_ratings_sorted_by_score_then_recency() {
        let mut high = release("v2.0.0", 5, None);
        high.contributors = vec![Contributor {
            login: "alice".to_string(),
            contributions: 1,
        }];
        let newer_zero = release("v1.1.0", 10, None);
        let older_zero = release("v1.0.0", 20, None);

        let analyzer =
            ReleaseAnalyzer::new(vec![older_zero, high, newer_zero], "demo", metrics()).unwrap();
        let ratings = analyzer.calculate_release_ratings();
        assert_eq!(ratings[0].version, "2.0.0");
        assert_eq!(ratings[1].version, "1.1.0");
        assert_eq!(ratings[2].version, "1.0.0");
    }

    #[test]
    fn test_patch_versions_not_collapsed() {
        let releases = vec![
            release("v1.0.1", 5, Some("### Features\n- Patch feature\n")),
            release("v1.0.0", 15, Some("### Features\n- Initial feature\n")),
        ];
        let analyzer = ReleaseAnalyzer::new(releases, "demo", metrics()).unwrap();
        let stories = analyzer.generate_feature_story();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].version, "1.0.1");
        assert_eq!(stories[1].version, "1.0.0");
    }

    #[test]
    fn test_numerically_equal_versions_stay_distinct() {
        let releases = vec![release("v2.0", 5, None), release("2.0.0", 15, None)];
        let analyzer = ReleaseAnalyzer::new(releases, "demo", metrics()).unwrap();
        let stories = analyzer.generate_feature_story();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].version, "2.0");
        assert_eq!(stories[1].version, "2.0.0");
    }

    #[test]
    fn test_same_version_keeps_latest_release() {
        let releases = vec![
            release("v1.0.0", 5, Some("### Features\n- Reissued notes\n")),
            release("1.0.0", 30, Some("### Features\n- Original notes\n")),
        ];
        let analyzer = ReleaseAnalyzer::new(releases, "demo", metrics()).unwrap();
        let stories = analyzer.generate_feature_story();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].major_features, vec!["Reissued notes"]);
    }

    #[test]
    fn test_two_segment_version_sorts_numerically() {
        let releases = vec![release("v2.9", 15, None), release("v2.10", 5, None)];
        let analyzer = ReleaseAnalyzer::new(releases, "demo", metrics()).unwrap();
        let stories = analyzer.generate_feature_story();
        assert_eq!(stories[0].version, "2.10");
        assert_eq!(stories[1].version, "2.9");
    }

    #[test]
    fn test_empty_story_gets_placeholder_text() {
        let releases = vec![release("v1.0.0", 5, Some("Just prose, no sections."))];
        let analyzer = ReleaseAnalyzer::new(releases, "demo", metrics()).unwrap();
        let markdown = analyzer.feature_story_markdown();
        assert!(markdown.contains("*No major changes documented for this version.*"));
    }

    #[test]
    fn test_invalid_release_rejected() {
        let bad = release("", 5, None);
        assert!(ReleaseAnalyzer::new(vec![bad], "demo", metrics()).is_err());
    }

    #[test]
    fn test_comprehensive_analysis_wires_all_sections() {
        let body = "### Features\n- New API endpoint\n- Improve test coverage\n";
        let mut first = release("v1.1.0", 10, Some(body));
        first.contributors = vec![Contributor {
            login: "alice".to_string(),
            contributions: 20,
        }];
        let mut second = release("v1.0.0", 40, Some(body));
        second.contributors = vec![Contributor {
            login: "alice".to_string(),
            contributions: 20,
        }];

        let analyzer = ReleaseAnalyzer::new(vec![first, second], "demo", metrics()).unwrap();
        let analysis = analyzer.analyze_comprehensively();

        assert_eq!(analysis.ratings.len(), 2);
        assert_eq!(analysis.feature_story.len(), 2);
        assert!(!analysis.evolution.focus_areas.is_empty());
        // alice appears in two releases, so she is counted twice.
        let total_tiered: u32 = analysis
            .community
            .contributor_demographics
            .experience_level
            .values()
            .sum();
        assert_eq!(total_tiered, 2);
    }
}
