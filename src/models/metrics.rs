use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::release::{FeatureStory, ReleaseRating};

/// Trend classification from a linear-regression slope over an
/// occurrence series: > 0.1 increasing, < -0.1 decreasing, else stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Stable => write!(f, "stable"),
            Trend::Decreasing => write!(f, "decreasing"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentVelocity {
    pub release_frequency: f64,
    pub feature_velocity: f64,
    pub breaking_change_frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusArea {
    pub category: String,
    pub frequency: u32,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEngagement {
    pub contributor_growth: f64,
    pub issue_resolution_time: f64,
    pub pr_merge_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvolutionMetrics {
    pub development_velocity: DevelopmentVelocity,
    pub focus_areas: Vec<FocusArea>,
    pub community_engagement: CommunityEngagement,
}

/// Five maturity scores, each normalized to [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMaturityIndicators {
    pub codebase_stability: f64,
    pub documentation_completeness: f64,
    pub test_coverage: f64,
    pub community_health: f64,
    pub maintenance_level: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    Documentation,
    Improvement,
    Bugfix,
    Feature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionOpportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub complexity: u8,
    pub priority: u8,
    pub relevant_skills: Vec<String>,
    pub related_issues: Vec<String>,
    pub contextual_insights: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicInsight {
    pub observation: String,
    pub impact: String,
    pub recommended_actions: Vec<String>,
    pub supporting_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
    Novice,
    Intermediate,
    Expert,
}

impl std::fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceTier::Novice => write!(f, "novice"),
            ExperienceTier::Intermediate => write!(f, "intermediate"),
            ExperienceTier::Expert => write!(f, "expert"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorDemographics {
    /// Contributor count per experience tier.
    pub experience_level: HashMap<ExperienceTier, u32>,
    /// Top expertise categories per contributor login.
    pub expertise_areas: HashMap<String, Vec<String>>,
    /// Normalized monthly activity per contributor login.
    pub activity_patterns: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationPatterns {
    /// Expert login mapped to the novices they shared releases with.
    pub mentorship: HashMap<String, Vec<String>>,
    /// Releases with review-related wording, counted per contributor login.
    pub code_review_dynamics: HashMap<String, u32>,
    pub knowledge_sharing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMetrics {
    pub contributor_demographics: ContributorDemographics,
    pub collaboration_patterns: CollaborationPatterns,
}

/// Composite result of one analysis run over a release list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveAnalysis {
    pub ratings: Vec<ReleaseRating>,
    pub feature_story: Vec<FeatureStory>,
    pub evolution: ProjectEvolutionMetrics,
    pub opportunities: Vec<ContributionOpportunity>,
    pub maturity: ProjectMaturityIndicators,
    pub insights: Vec<StrategicInsight>,
    pub community: CommunityMetrics,
}
