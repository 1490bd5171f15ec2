use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::metrics::{
    CollaborationPatterns, CommunityMetrics, ContributorDemographics, ExperienceTier,
};
use crate::models::release::{Contributor, ReleaseNote};

/// Fixed expertise category table; matching is case-insensitive over the
/// full release body.
const EXPERTISE_CATEGORIES: &[&str] = &[
    "Documentation",
    "Testing",
    "Frontend",
    "Backend",
    "DevOps",
    "Security",
    "Performance",
];

const REVIEW_INDICATORS: &[&str] = &["review", "approved", "feedback", "suggestion", "comment"];

const KNOWLEDGE_SHARING_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)documentation added|docs added", "Documentation Contribution"),
    (r"(?i)tutorial|guide|how-to", "Educational Content"),
    (r"(?i)example|sample|demo", "Code Examples"),
    (r"(?i)wiki|knowledge base", "Knowledge Base"),
    (r"(?i)workshop|presentation", "Community Education"),
];

/// Profiles the contributor base behind a release list: experience tiers,
/// expertise areas, activity cadence and collaboration signals.
///
/// `contributors` is the flat per-release roster, so a login active in
/// several releases appears once per release and weighs accordingly.
pub struct CommunityAnalyzer {
    expertise_patterns: Vec<(&'static str, Regex)>,
    review_patterns: Vec<Regex>,
    knowledge_patterns: Vec<(Regex, &'static str)>,
}

impl CommunityAnalyzer {
    pub fn new() -> Self {
        Self {
            expertise_patterns: EXPERTISE_CATEGORIES
                .iter()
                .map(|category| {
                    (*category, Regex::new(&format!("(?i){}", category)).unwrap())
                })
                .collect(),
            review_patterns: REVIEW_INDICATORS
                .iter()
                .map(|indicator| Regex::new(&format!("(?i){}", indicator)).unwrap())
                .collect(),
            knowledge_patterns: KNOWLEDGE_SHARING_PATTERNS
                .iter()
                .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), *kind))
                .collect(),
        }
    }

    pub fn analyze_community_dynamics(
        &self,
        releases: &[ReleaseNote],
        contributors: &[Contributor],
    ) -> CommunityMetrics {
        CommunityMetrics {
            contributor_demographics: ContributorDemographics {
                experience_level: self.experience_levels(contributors, releases),
                expertise_areas: self.expertise_areas(contributors, releases),
                activity_patterns: self.activity_patterns(contributors, releases),
            },
            collaboration_patterns: CollaborationPatterns {
                mentorship: self.mentorship_patterns(releases, contributors),
                code_review_dynamics: self.code_review_patterns(releases),
                knowledge_sharing: self.knowledge_sharing_patterns(releases),
            },
        }
    }

    /// Tiers each roster entry by distinct releases touched and raw
    /// contribution count, then tallies entries per tier.
    fn experience_levels(
        &self,
        contributors: &[Contributor],
        releases: &[ReleaseNote],
    ) -> HashMap<ExperienceTier, u32> {
        let mut history: HashMap<&str, HashSet<&str>> = HashMap::new();
        for release in releases {
            for contributor in &release.contributors {
                history
                    .entry(contributor.login.as_str())
                    .or_default()
                    .insert(release.tag_name.as_str());
            }
        }

        let mut levels: HashMap<ExperienceTier, u32> = HashMap::new();
        for contributor in contributors {
            let release_count = history
                .get(contributor.login.as_str())
                .map_or(0, |tags| tags.len());
            let tier = classify_tier(release_count, contributor.contributions);
            *levels.entry(tier).or_insert(0) += 1;
        }

        levels
    }

    /// A contributor earns a category by appearing in at least two releases
    /// whose bodies mention it; the top three categories are kept.
    fn expertise_areas(
        &self,
        contributors: &[Contributor],
        releases: &[ReleaseNote],
    ) -> HashMap<String, Vec<String>> {
        // Per-login counts indexed by the fixed category table.
        let mut counts: HashMap<&str, Vec<u32>> = HashMap::new();

        for release in releases {
            let Some(body) = release.body.as_deref() else {
                continue;
            };

            for (index, (_, pattern)) in self.expertise_patterns.iter().enumerate() {
                if pattern.is_match(body) {
                    for contributor in &release.contributors {
                        counts
                            .entry(contributor.login.as_str())
                            .or_insert_with(|| vec![0; self.expertise_patterns.len()])[index] += 1;
                    }
                }
            }
        }

        let mut expertise = HashMap::new();
        for contributor in contributors {
            let Some(category_counts) = counts.get(contributor.login.as_str()) else {
                continue;
            };

            let mut ranked: Vec<(usize, u32)> = category_counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count >= 2)
                .map(|(index, count)| (index, *count))
                .collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));

            let areas: Vec<String> = ranked
                .into_iter()
                .take(3)
                .map(|(index, _)| self.expertise_patterns[index].0.to_string())
                .collect();

            if !areas.is_empty() {
                expertise.insert(contributor.login.clone(), areas);
            }
        }

        expertise
    }

    /// Normalized monthly cadence per login: 1.0 means a contribution at
    /// least every 30 days, 0 means a single-release contributor.
    fn activity_patterns(
        &self,
        contributors: &[Contributor],
        releases: &[ReleaseNote],
    ) -> HashMap<String, f64> {
        let mut timeline: HashMap<&str, HashMap<&str, DateTime<Utc>>> = HashMap::new();
        for release in releases {
            for contributor in &release.contributors {
                timeline
                    .entry(contributor.login.as_str())
                    .or_default()
                    .insert(release.tag_name.as_str(), release.created_at);
            }
        }

        let mut patterns = HashMap::new();
        for contributor in contributors {
            let Some(timestamps) = timeline.get(contributor.login.as_str()) else {
                patterns.insert(contributor.login.clone(), 0.0);
                continue;
            };
            if timestamps.len() < 2 {
                patterns.insert(contributor.login.clone(), 0.0);
                continue;
            }

            let mut dates: Vec<DateTime<Utc>> = timestamps.values().copied().collect();
            dates.sort();

            let intervals: Vec<f64> = dates
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).num_milliseconds() as f64)
                .collect();
            let avg_interval = intervals.iter().sum::<f64>() / intervals.len() as f64;

            let month_ms = 1000.0 * 60.0 * 60.0 * 24.0 * 30.0;
            let normalized = (1.0 / (avg_interval / month_ms)).min(1.0);
            patterns.insert(contributor.login.clone(), normalized);
        }

        patterns
    }

    /// Pairs experts with novices that shipped in the same release.
    fn mentorship_patterns(
        &self,
        releases: &[ReleaseNote],
        contributors: &[Contributor],
    ) -> HashMap<String, Vec<String>> {
        let mut tiers: HashMap<&str, ExperienceTier> = HashMap::new();
        for contributor in contributors {
            let release_count = releases
                .iter()
                .filter(|release| {
                    release
                        .contributors
                        .iter()
                        .any(|c| c.login == contributor.login)
                })
                .count();
            tiers.insert(
                contributor.login.as_str(),
                classify_tier(release_count, contributor.contributions),
            );
        }

        let mut mentorship: HashMap<String, Vec<String>> = HashMap::new();
        for release in releases {
            let experts: Vec<&str> = release
                .contributors
                .iter()
                .filter(|c| tiers.get(c.login.as_str()) == Some(&ExperienceTier::Expert))
                .map(|c| c.login.as_str())
                .collect();
            let novices: Vec<&str> = release
                .contributors
                .iter()
                .filter(|c| tiers.get(c.login.as_str()) == Some(&ExperienceTier::Novice))
                .map(|c| c.login.as_str())
                .collect();

            for expert in &experts {
                let mentees = mentorship.entry(expert.to_string()).or_default();
                for novice in &novices {
                    if !mentees.iter().any(|m| m == novice) {
                        mentees.push(novice.to_string());
                    }
                }
            }
        }

        mentorship
    }

    /// Credits every contributor of a release once when its body mentions
    /// review activity, regardless of how many mentions it contains.
    fn code_review_patterns(&self, releases: &[ReleaseNote]) -> HashMap<String, u32> {
        let mut patterns: HashMap<String, u32> = HashMap::new();

        for release in releases {
            let Some(body) = release.body.as_deref() else {
                continue;
            };

            let mentions: usize = self
                .review_patterns
                .iter()
                .map(|pattern| pattern.find_iter(body).count())
                .sum();
            let credit = u32::from(mentions > 0);

            for contributor in &release.contributors {
                *patterns.entry(contributor.login.clone()).or_insert(0) += credit;
            }
        }

        patterns
    }

    fn knowledge_sharing_patterns(&self, releases: &[ReleaseNote]) -> Vec<String> {
        let mut kinds: Vec<String> = Vec::new();

        for release in releases {
            let Some(body) = release.body.as_deref() else {
                continue;
            };

            for (pattern, kind) in &self.knowledge_patterns {
                if pattern.is_match(body) && !kinds.iter().any(|k| k == kind) {
                    kinds.push(kind.to_string());
                }
            }
        }

        kinds
    }
}

impl Default for CommunityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_tier(release_count: usize, contributions: u32) -> ExperienceTier {
    if release_count > 10 || contributions > 50 {
        ExperienceTier::Expert
    } else if release_count > 3 || contributions > 10 {
        ExperienceTier::Intermediate
    } else {
        ExperienceTier::Novice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn contributor(login: &str, contributions: u32) -> Contributor {
        Contributor {
            login: login.to_string(),
            contributions,
        }
    }

    fn release(tag: &str, days_ago: i64, body: Option<&str>, roster: &[(&str, u32)]) -> ReleaseNote {
        ReleaseNote {
            tag_name: tag.to_string(),
            name: None,
            body: body.map(|b| b.to_string()),
            created_at: Utc::now() - Duration::days(days_ago),
            url: format!("https://example.com/{}", tag),
            reactions: Vec::new(),
            contributors: roster
                .iter()
                .map(|(login, contributions)| contributor(login, *contributions))
                .collect(),
        }
    }

    fn flatten(releases: &[ReleaseNote]) -> Vec<Contributor> {
        releases
            .iter()
            .flat_map(|release| release.contributors.iter().cloned())
            .collect()
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(classify_tier(11, 0), ExperienceTier::Expert);
        assert_eq!(classify_tier(0, 51), ExperienceTier::Expert);
        assert_eq!(classify_tier(4, 0), ExperienceTier::Intermediate);
        assert_eq!(classify_tier(0, 11), ExperienceTier::Intermediate);
        assert_eq!(classify_tier(3, 10), ExperienceTier::Novice);
    }

    #[test]
    fn test_repeat_roster_entries_are_counted_each_time() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![
            release("v2", 5, None, &[("alice", 60)]),
            release("v1", 35, None, &[("alice", 60)]),
        ];
        let roster = flatten(&releases);
        let levels = analyzer.experience_levels(&roster, &releases);
        assert_eq!(levels.get(&ExperienceTier::Expert), Some(&2));
    }

    #[test]
    fn test_expertise_requires_two_mentioning_releases() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![
            release("v3", 5, Some("Improved testing harness"), &[("bob", 1)]),
            release("v2", 35, Some("More testing fixes"), &[("bob", 1)]),
            release("v1", 65, Some("Security hardening"), &[("bob", 1)]),
        ];
        let roster = flatten(&releases);
        let areas = analyzer.expertise_areas(&roster, &releases);
        assert_eq!(areas.get("bob"), Some(&vec!["Testing".to_string()]));
    }

    #[test]
    fn test_monthly_cadence_saturates_at_one() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![
            release("v2", 5, None, &[("carol", 1)]),
            release("v1", 15, None, &[("carol", 1)]),
        ];
        let roster = flatten(&releases);
        let patterns = analyzer.activity_patterns(&roster, &releases);
        assert_eq!(patterns.get("carol"), Some(&1.0));
    }

    #[test]
    fn test_single_release_contributor_has_zero_activity() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![release("v1", 5, None, &[("dave", 1)])];
        let roster = flatten(&releases);
        let patterns = analyzer.activity_patterns(&roster, &releases);
        assert_eq!(patterns.get("dave"), Some(&0.0));
    }

    #[test]
    fn test_mentorship_links_expert_to_novice_in_shared_release() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![release(
            "v1",
            5,
            None,
            &[("expert", 100), ("newbie", 1)],
        )];
        let roster = flatten(&releases);
        let mentorship = analyzer.mentorship_patterns(&releases, &roster);
        assert_eq!(
            mentorship.get("expert"),
            Some(&vec!["newbie".to_string()])
        );
        assert!(!mentorship.contains_key("newbie"));
    }

    #[test]
    fn test_review_credit_is_per_release_not_per_mention() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![
            release(
                "v2",
                5,
                Some("Addressed review feedback and more review comments"),
                &[("erin", 1)],
            ),
            release("v1", 35, Some("No related wording here"), &[("erin", 1)]),
        ];
        let dynamics = analyzer.code_review_patterns(&releases);
        assert_eq!(dynamics.get("erin"), Some(&1));
    }

    #[test]
    fn test_knowledge_sharing_kinds_deduplicated_in_order() {
        let analyzer = CommunityAnalyzer::new();
        let releases = vec![
            release("v2", 5, Some("New tutorial and demo app"), &[]),
            release("v1", 35, Some("Another guide published"), &[]),
        ];
        let kinds = analyzer.knowledge_sharing_patterns(&releases);
        assert_eq!(kinds, vec!["Educational Content", "Code Examples"]);
    }
}
