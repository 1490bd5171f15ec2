use reqwest::Response;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Minimum spacing between requests so bursts stay polite.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(120);

/// Tracks the GitHub rate-limit headers and spaces requests out.
///
/// `wait` blocks until a request may be sent; `record` must be called with
/// every response so the remaining-quota view stays current.
pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

struct LimiterState {
    remaining: u32,
    reset_at: Option<Instant>,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LimiterState {
                remaining: 5000,
                reset_at: None,
                last_request: None,
            }),
        }
    }

    pub async fn wait(&self) {
        loop {
            let pause = {
                let mut state = self.state.lock().await;

                let pause = if state.remaining == 0 {
                    match state.reset_at {
                        Some(reset_at) if reset_at > Instant::now() => {
                            let wait = reset_at - Instant::now();
                            tracing::info!("GitHub rate limit exhausted, waiting {:?}", wait);
                            Some(wait)
                        }
                        _ => {
                            // Reset window passed, assume quota is back.
                            state.remaining = 1;
                            None
                        }
                    }
                } else if let Some(last) = state.last_request {
                    let elapsed = last.elapsed();
                    (elapsed < MIN_REQUEST_INTERVAL).then(|| MIN_REQUEST_INTERVAL - elapsed)
                } else {
                    None
                };

                if pause.is_none() {
                    state.last_request = Some(Instant::now());
                    return;
                }
                pause
            };

            if let Some(wait) = pause {
                sleep(wait).await;
            }
        }
    }

    pub async fn record(&self, response: &Response) {
        let headers = response.headers();
        let remaining: Option<u32> = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let Some(remaining) = remaining else {
            return;
        };

        let reset_epoch: Option<u64> = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let mut state = self.state.lock().await;
        state.remaining = remaining;

        if let Some(reset_epoch) = reset_epoch {
            let now_epoch = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            if reset_epoch > now_epoch {
                state.reset_at =
                    Some(Instant::now() + Duration::from_secs(reset_epoch - now_epoch));
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
