use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::rate_limiter::RateLimiter;

const PER_PAGE: u32 = 100;

/// Walks a paginated GitHub list endpoint, following the Link header until
/// the last page or an optional item cap.
pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    pub async fn fetch_capped<T: DeserializeOwned>(
        &self,
        base_url: &str,
        max_items: usize,
    ) -> Result<Vec<T>> {
        self.fetch(base_url, Some(max_items)).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        base_url: &str,
        cap: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut items: Vec<T> = Vec::new();

        for page in 1.. {
            self.rate_limiter.wait().await;

            let separator = if base_url.contains('?') { '&' } else { '?' };
            let url = format!("{}{}per_page={}&page={}", base_url, separator, PER_PAGE, page);
            tracing::debug!("Fetching: {}", url);

            let response = self.client.get(&url).send().await?;
            self.rate_limiter.record(&response).await;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(Error::GitHubApi(format!("not found: {}", base_url)));
            }
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitHubApi(format!(
                    "request to {} failed: {} - {}",
                    base_url, status, body
                )));
            }

            let has_next = response
                .headers()
                .get("link")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("rel=\"next\""))
                .unwrap_or(false);

            let page_items: Vec<T> = response.json().await?;
            let short_page = page_items.len() < PER_PAGE as usize;
            items.extend(page_items);

            let capped = cap.is_some_and(|cap| items.len() >= cap);
            if capped || short_page || !has_next {
                break;
            }
        }

        if let Some(cap) = cap {
            items.truncate(cap);
        }
        Ok(items)
    }
}
