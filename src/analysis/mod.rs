pub mod community;
pub mod contribution;
pub mod evolution;
pub mod extractor;
pub mod maturity;
pub mod orchestrator;
pub mod strategic;

pub use community::CommunityAnalyzer;
pub use contribution::ContributionAnalyzer;
pub use evolution::EvolutionAnalyzer;
pub use extractor::SectionExtractor;
pub use maturity::MaturityAnalyzer;
pub use orchestrator::ReleaseAnalyzer;
pub use strategic::StrategicAnalyzer;
