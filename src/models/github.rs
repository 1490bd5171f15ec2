use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Release object as returned by the GitHub REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub id: u64,
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

/// A single reaction row; the client groups these by content kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionItem {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub author: Option<CommitAuthorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthorInfo {
    pub login: String,
}
