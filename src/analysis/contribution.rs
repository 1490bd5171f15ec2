use crate::models::metrics::{
    ContributionOpportunity, OpportunityKind, ProjectEvolutionMetrics, Trend,
};
use crate::models::release::ReleaseNote;

const COMPLEXITY_LOW: u8 = 3;
const COMPLEXITY_MEDIUM: u8 = 6;
const COMPLEXITY_HIGH: u8 = 9;

struct Gap {
    area: String,
    severity: u8,
}

/// Turns evolution gaps and underserved topics into ranked opportunity
/// records.
pub struct ContributionAnalyzer;

impl ContributionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn identify_opportunities(
        &self,
        evolution: &ProjectEvolutionMetrics,
        releases: &[ReleaseNote],
    ) -> Vec<ContributionOpportunity> {
        let mut opportunities = Vec::new();

        for gap in self.project_gaps(evolution) {
            let mut opportunity = self.base_opportunity(&gap.area);
            opportunity.priority = gap.severity;
            opportunity.contextual_insights =
                "This area shows significant gaps in recent project history and needs attention."
                    .to_string();
            opportunities.push(opportunity);
        }

        for area in self.underserved_areas(releases) {
            let mut opportunity = self.base_opportunity(area);
            opportunity.priority = 5;
            opportunity.contextual_insights =
                "This area has been identified as underserved in recent releases.".to_string();
            opportunities.push(opportunity);
        }

        // Highest priority first; among equals, prefer the simpler work.
        opportunities.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.complexity.cmp(&b.complexity))
        });

        opportunities
    }

    fn project_gaps(&self, evolution: &ProjectEvolutionMetrics) -> Vec<Gap> {
        let mut gaps = Vec::new();

        // Less than one release per month.
        if evolution.development_velocity.release_frequency < 1.0 {
            gaps.push(Gap {
                area: "Release Management".to_string(),
                severity: 8,
            });
        }

        for area in &evolution.focus_areas {
            if area.frequency < 2 && area.trend != Trend::Increasing {
                gaps.push(Gap {
                    area: area.category.clone(),
                    severity: 7,
                });
            }
        }

        // Less than 5% contributor growth.
        if evolution.community_engagement.contributor_growth < 5.0 {
            gaps.push(Gap {
                area: "Community Growth".to_string(),
                severity: 9,
            });
        }

        gaps
    }

    /// Flags a topic once any release body omits its keyword. Deliberately
    /// broad; see the product note in DESIGN.md before tightening.
    fn underserved_areas(&self, releases: &[ReleaseNote]) -> Vec<&'static str> {
        let mut areas: Vec<&'static str> = Vec::new();

        for release in releases {
            let body = release.body.as_deref();

            if !body.is_some_and(|b| b.contains("documentation")) && !areas.contains(&"Documentation")
            {
                areas.push("Documentation");
            }
            if !body.is_some_and(|b| b.contains("test")) && !areas.contains(&"Testing") {
                areas.push("Testing");
            }
            if !body.is_some_and(|b| b.to_lowercase().contains("performance"))
                && !areas.contains(&"Performance")
            {
                areas.push("Performance");
            }
        }

        areas
    }

    fn base_opportunity(&self, area: &str) -> ContributionOpportunity {
        ContributionOpportunity {
            kind: self.opportunity_kind(area),
            complexity: self.complexity(area),
            priority: 0,
            relevant_skills: self.required_skills(area),
            // Would be populated from the GitHub Issues API.
            related_issues: Vec::new(),
            contextual_insights: String::new(),
        }
    }

    fn opportunity_kind(&self, area: &str) -> OpportunityKind {
        match area {
            "Documentation" => OpportunityKind::Documentation,
            "Testing" | "Performance" => OpportunityKind::Improvement,
            "Bug Fixes" => OpportunityKind::Bugfix,
            "Feature Requests" => OpportunityKind::Feature,
            _ => OpportunityKind::Improvement,
        }
    }

    fn complexity(&self, area: &str) -> u8 {
        match area {
            "Documentation" => COMPLEXITY_LOW,
            "Testing" | "Bug Fixes" => COMPLEXITY_MEDIUM,
            "Performance" | "Feature Requests" => COMPLEXITY_HIGH,
            _ => COMPLEXITY_MEDIUM,
        }
    }

    fn required_skills(&self, area: &str) -> Vec<String> {
        let skills: &[&str] = match area {
            "Documentation" => &["Technical Writing", "Markdown"],
            "Testing" => &["Unit Testing", "Test Frameworks", "Code Coverage Tools"],
            "Performance" => &["Performance Optimization", "Profiling Tools", "Algorithms"],
            "Bug Fixes" => &["Debugging", "Problem Solving", "Code Review"],
            "Feature Requests" => &["Software Design", "Full Stack Development"],
            _ => &["General Development"],
        };

        skills.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for ContributionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::models::metrics::{
        CommunityEngagement, DevelopmentVelocity, FocusArea,
    };

    fn evolution(
        release_frequency: f64,
        contributor_growth: f64,
        focus_areas: Vec<FocusArea>,
    ) -> ProjectEvolutionMetrics {
        ProjectEvolutionMetrics {
            development_velocity: DevelopmentVelocity {
                release_frequency,
                feature_velocity: 0.0,
                breaking_change_frequency: 0.0,
            },
            focus_areas,
            community_engagement: CommunityEngagement {
                contributor_growth,
                issue_resolution_time: 0.0,
                pr_merge_rate: 0.0,
            },
        }
    }

    fn release(body: Option<&str>) -> ReleaseNote {
        ReleaseNote {
            tag_name: "v1.0.0".to_string(),
            name: None,
            body: body.map(|b| b.to_string()),
            created_at: Utc::now() - Duration::days(10),
            url: "https://example.com/v1.0.0".to_string(),
            reactions: Vec::new(),
            contributors: Vec::new(),
        }
    }

    #[test]
    fn test_low_release_frequency_gap_has_priority_8() {
        let analyzer = ContributionAnalyzer::new();
        let metrics = evolution(0.5, 50.0, Vec::new());
        let body = "documentation test performance";
        let releases = vec![release(Some(body))];
        let opportunities = analyzer.identify_opportunities(&metrics, &releases);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].priority, 8);
        assert_eq!(opportunities[0].kind, OpportunityKind::Improvement);
    }

    #[test]
    fn test_equal_priority_prefers_lower_complexity() {
        let analyzer = ContributionAnalyzer::new();
        let focus_areas = vec![
            FocusArea {
                category: "Performance".to_string(),
                frequency: 1,
                trend: Trend::Stable,
            },
            FocusArea {
                category: "Documentation".to_string(),
                frequency: 1,
                trend: Trend::Decreasing,
            },
        ];
        let metrics = evolution(2.0, 50.0, focus_areas);
        let releases = vec![release(Some("documentation test performance"))];
        let opportunities = analyzer.identify_opportunities(&metrics, &releases);
        assert_eq!(opportunities.len(), 2);
        assert_eq!(opportunities[0].priority, 7);
        assert_eq!(opportunities[1].priority, 7);
        // Documentation (complexity 3) sorts ahead of Performance (9).
        assert_eq!(opportunities[0].complexity, COMPLEXITY_LOW);
        assert_eq!(opportunities[1].complexity, COMPLEXITY_HIGH);
    }

    #[test]
    fn test_bodyless_release_flags_all_underserved_areas() {
        let analyzer = ContributionAnalyzer::new();
        let areas = analyzer.underserved_areas(&[release(None)]);
        assert_eq!(areas, vec!["Documentation", "Testing", "Performance"]);
    }

    #[test]
    fn test_increasing_focus_area_is_not_a_gap() {
        let analyzer = ContributionAnalyzer::new();
        let focus_areas = vec![FocusArea {
            category: "API".to_string(),
            frequency: 1,
            trend: Trend::Increasing,
        }];
        let metrics = evolution(2.0, 50.0, focus_areas);
        let gaps = analyzer.project_gaps(&metrics);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_low_growth_gap_outranks_everything() {
        let analyzer = ContributionAnalyzer::new();
        let metrics = evolution(0.5, 0.0, Vec::new());
        let releases = vec![release(Some("documentation test performance"))];
        let opportunities = analyzer.identify_opportunities(&metrics, &releases);
        assert_eq!(opportunities[0].priority, 9);
        assert_eq!(opportunities[1].priority, 8);
    }
}
