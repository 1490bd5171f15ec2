use serde_json::json;

use crate::models::metrics::{
    ProjectEvolutionMetrics, ProjectMaturityIndicators, StrategicInsight, Trend,
};

/// Synthesizes evolution and maturity metrics into prioritized
/// human-readable observations with recommended actions.
pub struct StrategicAnalyzer;

impl StrategicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_insights(
        &self,
        evolution: &ProjectEvolutionMetrics,
        maturity: &ProjectMaturityIndicators,
    ) -> Vec<StrategicInsight> {
        let mut insights = Vec::new();

        insights.extend(self.development_pattern_insights(evolution));
        insights.extend(self.growth_opportunity_insights(maturity));
        insights.extend(self.contribution_strategy_insights(evolution, maturity));

        self.prioritize(insights)
    }

    fn development_pattern_insights(
        &self,
        evolution: &ProjectEvolutionMetrics,
    ) -> Vec<StrategicInsight> {
        let mut insights = Vec::new();
        let velocity = &evolution.development_velocity;

        if velocity.release_frequency < 1.0 {
            insights.push(StrategicInsight {
                observation: "Low release frequency detected".to_string(),
                impact: "May indicate development bottlenecks or integration challenges"
                    .to_string(),
                recommended_actions: vec![
                    "Consider implementing automated release processes".to_string(),
                    "Break down large changes into smaller, more manageable releases".to_string(),
                    "Establish regular release schedule with smaller increments".to_string(),
                ],
                supporting_data: json!({
                    "currentFrequency": velocity.release_frequency,
                    "recommendedMinimum": 1,
                }),
            });
        }

        if let Some(insight) = self.feature_velocity_insight(evolution) {
            insights.push(insight);
        }

        if velocity.breaking_change_frequency > 0.5 {
            insights.push(StrategicInsight {
                observation: "High frequency of breaking changes".to_string(),
                impact: "May discourage adoption and create upgrade barriers for users"
                    .to_string(),
                recommended_actions: vec![
                    "Implement more comprehensive API versioning".to_string(),
                    "Provide better migration guides and tools".to_string(),
                    "Consider longer deprecation cycles".to_string(),
                ],
                supporting_data: json!({
                    "breakingChangeFrequency": velocity.breaking_change_frequency,
                    "threshold": 0.5,
                }),
            });
        }

        insights.extend(self.focus_area_insights(evolution));
        insights
    }

    fn feature_velocity_insight(
        &self,
        evolution: &ProjectEvolutionMetrics,
    ) -> Option<StrategicInsight> {
        let feature_velocity = evolution.development_velocity.feature_velocity;

        if feature_velocity < 2.0 {
            return Some(StrategicInsight {
                observation: "Low feature development velocity".to_string(),
                impact: "Project may be losing momentum or facing resource constraints"
                    .to_string(),
                recommended_actions: vec![
                    "Review and streamline feature development process".to_string(),
                    "Consider increasing community engagement for feature contributions"
                        .to_string(),
                    "Evaluate resource allocation and priorities".to_string(),
                ],
                supporting_data: json!({
                    "currentVelocity": feature_velocity,
                    "recommendedMinimum": 2,
                }),
            });
        }

        if feature_velocity > 10.0 {
            return Some(StrategicInsight {
                observation: "Very high feature velocity".to_string(),
                impact: "Rapid development may impact stability and maintenance".to_string(),
                recommended_actions: vec![
                    "Ensure adequate testing coverage for new features".to_string(),
                    "Balance feature development with stability improvements".to_string(),
                    "Consider impact on documentation and maintenance".to_string(),
                ],
                supporting_data: json!({
                    "currentVelocity": feature_velocity,
                    "recommendedMaximum": 10,
                }),
            });
        }

        None
    }

    fn focus_area_insights(&self, evolution: &ProjectEvolutionMetrics) -> Vec<StrategicInsight> {
        let mut insights = Vec::new();

        let neglected: Vec<&str> = evolution
            .focus_areas
            .iter()
            .filter(|area| area.frequency < 2 && area.trend == Trend::Decreasing)
            .map(|area| area.category.as_str())
            .collect();

        if !neglected.is_empty() {
            insights.push(StrategicInsight {
                observation: "Some important areas are receiving decreased attention".to_string(),
                impact: "May create technical debt or user experience gaps".to_string(),
                recommended_actions: vec![
                    "Review resource allocation across different areas".to_string(),
                    "Create dedicated maintenance schedules for neglected areas".to_string(),
                    "Consider recruiting contributors with specific expertise".to_string(),
                ],
                supporting_data: json!({ "neglectedAreas": neglected }),
            });
        }

        let trending: Vec<&str> = evolution
            .focus_areas
            .iter()
            .filter(|area| area.trend == Trend::Increasing && area.frequency > 3)
            .map(|area| area.category.as_str())
            .collect();

        if !trending.is_empty() {
            insights.push(StrategicInsight {
                observation: "Strong focus on specific development areas".to_string(),
                impact: "Indicates project direction and potential specialization".to_string(),
                recommended_actions: vec![
                    "Document best practices in these areas".to_string(),
                    "Consider creating specialized working groups".to_string(),
                    "Leverage expertise to attract more contributors".to_string(),
                ],
                supporting_data: json!({ "trendingAreas": trending }),
            });
        }

        insights
    }

    fn growth_opportunity_insights(
        &self,
        maturity: &ProjectMaturityIndicators,
    ) -> Vec<StrategicInsight> {
        let mut insights = Vec::new();

        if maturity.documentation_completeness < 0.7 {
            insights.push(StrategicInsight {
                observation: "Documentation coverage could be improved".to_string(),
                impact: "May hinder new contributor onboarding and user adoption".to_string(),
                recommended_actions: vec![
                    "Create a documentation improvement plan".to_string(),
                    "Add more code examples and tutorials".to_string(),
                    "Implement documentation review in PR process".to_string(),
                ],
                supporting_data: json!({
                    "currentCoverage": maturity.documentation_completeness,
                    "target": 0.7,
                }),
            });
        }

        if maturity.test_coverage < 0.8 {
            insights.push(StrategicInsight {
                observation: "Test coverage below recommended threshold".to_string(),
                impact: "May lead to reliability issues and harder maintenance".to_string(),
                recommended_actions: vec![
                    "Set up coverage reporting in CI pipeline".to_string(),
                    "Create testing guidelines for contributors".to_string(),
                    "Prioritize tests for critical components".to_string(),
                ],
                supporting_data: json!({
                    "currentCoverage": maturity.test_coverage,
                    "target": 0.8,
                }),
            });
        }

        if maturity.community_health < 0.6 {
            insights.push(StrategicInsight {
                observation: "Community health metrics indicate room for improvement".to_string(),
                impact: "May affect project sustainability and growth".to_string(),
                recommended_actions: vec![
                    "Implement mentorship programs".to_string(),
                    "Create more good first issues".to_string(),
                    "Improve response time to community contributions".to_string(),
                ],
                supporting_data: json!({
                    "healthScore": maturity.community_health,
                    "target": 0.6,
                }),
            });
        }

        insights
    }

    fn contribution_strategy_insights(
        &self,
        evolution: &ProjectEvolutionMetrics,
        maturity: &ProjectMaturityIndicators,
    ) -> Vec<StrategicInsight> {
        let mut insights = Vec::new();

        if maturity.community_health < 0.7
            && evolution.community_engagement.contributor_growth < 10.0
        {
            insights.push(StrategicInsight {
                observation: "Potential barriers to contribution identified".to_string(),
                impact: "Limiting project growth and community expansion".to_string(),
                recommended_actions: vec![
                    "Streamline contribution process".to_string(),
                    "Create better contributing guidelines".to_string(),
                    "Set up automated checks for common issues".to_string(),
                ],
                supporting_data: json!({
                    "communityHealth": maturity.community_health,
                    "contributorGrowth": evolution.community_engagement.contributor_growth,
                }),
            });
        }

        if maturity.maintenance_level < 0.6 {
            insights.push(StrategicInsight {
                observation: "Maintenance attention needed".to_string(),
                impact: "May accumulate technical debt and reduce project quality".to_string(),
                recommended_actions: vec![
                    "Schedule regular maintenance sprints".to_string(),
                    "Create maintenance-focused contributor roles".to_string(),
                    "Implement automated maintenance checks".to_string(),
                ],
                supporting_data: json!({
                    "maintenanceLevel": maturity.maintenance_level,
                    "target": 0.6,
                }),
            });
        }

        insights
    }

    /// Ranks insights by the average of impact and actionability scores;
    /// the transient score never leaks into the output.
    fn prioritize(&self, insights: Vec<StrategicInsight>) -> Vec<StrategicInsight> {
        let mut scored: Vec<(f64, StrategicInsight)> = insights
            .into_iter()
            .map(|insight| {
                let priority =
                    (self.impact_score(&insight) + self.actionability_score(&insight)) / 2.0;
                (priority, insight)
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, insight)| insight).collect()
    }

    fn impact_score(&self, insight: &StrategicInsight) -> f64 {
        let mut score = 0.0;

        // Quantifiable supporting metrics.
        if insight.supporting_data.is_object() {
            score += 0.3;
        }

        // Impact spanning multiple areas.
        if insight.impact.contains(" and ") {
            score += 0.2;
        }

        let observation = insight.observation.to_lowercase();
        let impact = insight.impact.to_lowercase();
        let critical_terms = ["security", "stability", "breaking", "critical"];
        if critical_terms
            .iter()
            .any(|term| observation.contains(term) || impact.contains(term))
        {
            score += 0.5;
        }

        score
    }

    fn actionability_score(&self, insight: &StrategicInsight) -> f64 {
        let mut score = (insight.recommended_actions.len() as f64 * 0.1).min(0.5);

        let automation_terms = ["automat", "tool", "ci", "script"];
        let automated = insight
            .recommended_actions
            .iter()
            .filter(|action| {
                let lower = action.to_lowercase();
                automation_terms.iter().any(|term| lower.contains(term))
            })
            .count();
        score += 0.3 * automated as f64;

        let vague_terms = ["consider", "evaluate", "review"];
        let vague = insight
            .recommended_actions
            .iter()
            .filter(|action| {
                let lower = action.to_lowercase();
                vague_terms.iter().any(|term| lower.contains(term))
            })
            .count();
        score -= 0.1 * vague as f64;

        score.clamp(0.0, 1.0)
    }
}

impl Default for StrategicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::{CommunityEngagement, DevelopmentVelocity, FocusArea};

    fn evolution(
        release_frequency: f64,
        feature_velocity: f64,
        breaking_change_frequency: f64,
    ) -> ProjectEvolutionMetrics {
        ProjectEvolutionMetrics {
            development_velocity: DevelopmentVelocity {
                release_frequency,
                feature_velocity,
                breaking_change_frequency,
            },
            focus_areas: Vec::new(),
            community_engagement: CommunityEngagement {
                contributor_growth: 50.0,
                issue_resolution_time: 0.0,
                pr_merge_rate: 0.0,
            },
        }
    }

    fn healthy_maturity() -> ProjectMaturityIndicators {
        ProjectMaturityIndicators {
            codebase_stability: 0.9,
            documentation_completeness: 0.9,
            test_coverage: 0.9,
            community_health: 0.9,
            maintenance_level: 0.9,
        }
    }

    #[test]
    fn test_healthy_project_in_steady_state_yields_no_insights() {
        let analyzer = StrategicAnalyzer::new();
        let insights = analyzer.generate_insights(&evolution(2.0, 5.0, 0.1), &healthy_maturity());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_breaking_change_insight_ranks_above_documentation() {
        let analyzer = StrategicAnalyzer::new();
        let mut maturity = healthy_maturity();
        maturity.documentation_completeness = 0.5;
        let insights = analyzer.generate_insights(&evolution(2.0, 5.0, 1.0), &maturity);
        assert_eq!(insights.len(), 2);
        // "breaking" is a critical term, lifting the impact score.
        assert_eq!(insights[0].observation, "High frequency of breaking changes");
    }

    #[test]
    fn test_feature_velocity_bounds() {
        let analyzer = StrategicAnalyzer::new();

        let low = analyzer.feature_velocity_insight(&evolution(2.0, 1.0, 0.0));
        assert_eq!(
            low.map(|i| i.observation),
            Some("Low feature development velocity".to_string())
        );

        let high = analyzer.feature_velocity_insight(&evolution(2.0, 11.0, 0.0));
        assert_eq!(
            high.map(|i| i.observation),
            Some("Very high feature velocity".to_string())
        );

        assert!(analyzer.feature_velocity_insight(&evolution(2.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_neglected_focus_areas_trigger_insight() {
        let analyzer = StrategicAnalyzer::new();
        let mut metrics = evolution(2.0, 5.0, 0.0);
        metrics.focus_areas = vec![FocusArea {
            category: "Security".to_string(),
            frequency: 1,
            trend: Trend::Decreasing,
        }];
        let insights = analyzer.generate_insights(&metrics, &healthy_maturity());
        assert_eq!(insights.len(), 1);
        assert_eq!(
            insights[0].supporting_data["neglectedAreas"],
            serde_json::json!(["Security"])
        );
    }

    #[test]
    fn test_actionability_rewards_automation_and_penalizes_vagueness() {
        let analyzer = StrategicAnalyzer::new();
        let insight = StrategicInsight {
            observation: "x".to_string(),
            impact: "y".to_string(),
            recommended_actions: vec![
                "Set up automated checks".to_string(),
                "Consider a rewrite".to_string(),
            ],
            supporting_data: serde_json::Value::Null,
        };
        // 0.2 base + 0.3 automation - 0.1 vague
        let score = analyzer.actionability_score(&insight);
        assert!((score - 0.4).abs() < 1e-9, "got {}", score);
    }
}
