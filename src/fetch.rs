//! HTTP retrieval with a bounded number of attempts and a fixed pause between them.
//!
//! Every network call in the tool goes through [`Fetcher::get`]. A non-success
//! status and a transport failure are treated the same way: the attempt is
//! logged, the fetcher sleeps for [`FetchPolicy::backoff`] and tries again,
//! and once [`FetchPolicy::max_attempts`] is spent the caller receives
//! [`FetchError::Exhausted`] instead of a response.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(
    "jar-license-inspector/",
    env!("CARGO_PKG_VERSION"),
    " (license audit tool)"
);

/// Retry settings for a [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total attempts, including the first one. Never less than 1.
    pub max_attempts: u32,
    /// Timeout applied to each individual attempt.
    pub timeout: Duration,
    /// Pause between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff: Duration::from_secs(2),
        }
    }
}

/// Failure of a single attempt, or of the whole retry budget.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

/// A successful response with its body fully read.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Fetched {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Blocking-in-sequence HTTP getter shared by every resolver.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(policy: FetchPolicy) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, policy))
    }

    pub fn with_client(client: Client, policy: FetchPolicy) -> Self {
        let policy = FetchPolicy {
            max_attempts: policy.max_attempts.max(1),
            ..policy
        };
        Self { client, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// GET `url`, retrying failed attempts until the policy is exhausted.
    pub async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        let max = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            match self.attempt(url).await {
                Ok(fetched) => {
                    debug!(url, attempt, status = %fetched.status, "fetched");
                    return Ok(fetched);
                }
                Err(err) => {
                    warn!(url, attempt, max_attempts = max, error = %err, "fetch attempt failed");
                    if attempt >= max {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                }
            }

            tokio::time::sleep(self.policy.backoff).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str) -> Result<Fetched, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.policy.timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?.to_vec();
        Ok(Fetched { status, body })
    }
}
