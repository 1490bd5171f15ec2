pub mod github;
pub mod metrics;
pub mod release;

pub use github::{CommitEntry, GitHubRelease, ReactionItem};
pub use metrics::{
    CommunityMetrics, ComprehensiveAnalysis, ContributionOpportunity, ProjectEvolutionMetrics,
    ProjectMaturityIndicators, StrategicInsight,
};
pub use release::{
    Contributor, FeatureStory, Reaction, ReleaseNote, ReleaseRating, RepositoryMetrics,
};
