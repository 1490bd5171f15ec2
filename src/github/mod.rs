pub mod client;
pub mod paginator;
pub mod rate_limiter;

pub use client::GitHubClient;
