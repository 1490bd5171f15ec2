pub mod analysis;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod report;

pub use analysis::ReleaseAnalyzer;
pub use config::Config;
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use report::ReportWriter;
