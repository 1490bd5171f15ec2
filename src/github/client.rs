use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client};
use tokio::sync::Semaphore;

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::github::{CommitEntry, GitHubRelease, ReactionItem};
use crate::models::release::{Contributor, Reaction, ReleaseNote};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("releaselens/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: "https://api.github.com".to_string(),
        })
    }

    pub async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<GitHubRelease>> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/{}/releases?per_page=100", self.base_url, owner, repo);
        tracing::info!("Fetching releases for: {}/{}", owner, repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.record(&response).await;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound(format!("{}/{}", owner, repo)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch releases for {}/{}: {} - {}",
                owner, repo, status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Reactions for one release, grouped by content kind in first-seen
    /// order.
    pub async fn release_reactions(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> Result<Vec<Reaction>> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/reactions",
            self.base_url, owner, repo, release_id
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        let items: Vec<ReactionItem> = paginator.fetch_capped(&url, 100).await?;

        let mut grouped: Vec<Reaction> = Vec::new();
        for item in items {
            match grouped.iter_mut().find(|r| r.kind == item.content) {
                Some(reaction) => reaction.total_count += 1,
                None => grouped.push(Reaction {
                    kind: item.content,
                    total_count: 1,
                }),
            }
        }

        Ok(grouped)
    }

    /// Commit authors reachable from a release tag, with per-login commit
    /// counts in first-seen order. Commits without a linked GitHub account
    /// are skipped.
    pub async fn release_contributors(
        &self,
        owner: &str,
        repo: &str,
        tag_name: &str,
    ) -> Result<Vec<Contributor>> {
        let url = format!(
            "{}/repos/{}/{}/commits?sha={}",
            self.base_url, owner, repo, tag_name
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        let commits: Vec<CommitEntry> = paginator.fetch_capped(&url, 100).await?;

        let mut contributors: Vec<Contributor> = Vec::new();
        for commit in commits {
            let Some(author) = commit.author else {
                continue;
            };
            match contributors.iter_mut().find(|c| c.login == author.login) {
                Some(contributor) => contributor.contributions += 1,
                None => contributors.push(Contributor {
                    login: author.login,
                    contributions: 1,
                }),
            }
        }

        Ok(contributors)
    }

    /// Fetches every release with its engagement data. Reaction or
    /// contributor lookups that fail degrade to empty lists so one flaky
    /// tag cannot sink the whole run.
    pub async fn fetch_release_notes(
        self: &Arc<Self>,
        owner: &str,
        repo: &str,
        concurrency_limit: usize,
    ) -> Result<Vec<ReleaseNote>> {
        let releases = self.list_releases(owner, repo).await?;
        tracing::info!("Found {} releases", releases.len());

        let semaphore = Arc::new(Semaphore::new(concurrency_limit));

        let pb = ProgressBar::new(releases.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} releases")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut note_futures = Vec::new();

        for release in releases {
            let github = self.clone();
            let sem = semaphore.clone();
            let owner = owner.to_string();
            let repo = repo.to_string();
            let pb_clone = pb.clone();

            note_futures.push(async move {
                let _permit = sem.acquire().await.ok()?;

                let (reactions, contributors) = tokio::join!(
                    github.release_reactions(&owner, &repo, release.id),
                    github.release_contributors(&owner, &repo, &release.tag_name),
                );

                let reactions = reactions.unwrap_or_else(|e| {
                    tracing::warn!(
                        "Could not fetch reactions for release {}: {}",
                        release.id,
                        e
                    );
                    Vec::new()
                });
                let contributors = contributors.unwrap_or_else(|e| {
                    tracing::warn!(
                        "Could not fetch contributors for tag {}: {}",
                        release.tag_name,
                        e
                    );
                    Vec::new()
                });

                pb_clone.inc(1);
                Some(ReleaseNote {
                    tag_name: release.tag_name,
                    name: release.name,
                    body: release.body,
                    created_at: release.created_at,
                    url: release.html_url,
                    reactions,
                    contributors,
                })
            });
        }

        let results = join_all(note_futures).await;
        pb.finish_with_message("Fetched all releases");

        Ok(results.into_iter().flatten().collect())
    }
}
