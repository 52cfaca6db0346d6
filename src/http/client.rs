//! Gateway transport
//!
//! Every request is a POST of one XML envelope. Throttling (429), gateway
//! 5xx responses, timeouts and connect failures are retried with backoff;
//! everything else is returned to the caller on the first attempt.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Content type the XML gateway expects for request bodies
pub const XML_REQUEST_CONTENT_TYPE: &str = "x-intacct-xml-request";

/// Wait used for a 429 without a usable `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Backoff strategy between retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffType {
    Constant,
    Linear,
    #[default]
    Exponential,
}

/// Transport settings
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    /// Client-side throttle shared by every request of this client
    pub rate_limit: Option<RateLimiterConfig>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            user_agent: format!("intacct-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// What one POST attempt came to
enum Attempt {
    Done(Result<String>),
    Retry { delay: Duration, error: Error },
}

/// HTTP client posting envelopes to the gateway
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// POST an XML request body and return the response body
    pub async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            match self.attempt(url, &body, attempt).await {
                Attempt::Done(result) => return result,
                Attempt::Retry { error, .. } if attempt >= max_retries => return Err(error),
                Attempt::Retry { delay, error } => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "Retrying gateway request"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str, body: &str, attempt: u32) -> Attempt {
        let sent = self
            .client
            .post(url)
            .header(CONTENT_TYPE, XML_REQUEST_CONTENT_TYPE)
            .body(body.to_owned())
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry {
                    delay: self.calculate_backoff(attempt),
                    error: Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    },
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Retry {
                    delay: self.calculate_backoff(attempt),
                    error: Error::Http(e),
                }
            }
            Err(e) => return Attempt::Done(Err(Error::Http(e))),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response);
            return Attempt::Retry {
                delay: Duration::from_secs(retry_after),
                error: Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
            };
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Attempt::Done(Err(Error::Http(e))),
        };
        if !(status.is_client_error() || status.is_server_error()) {
            debug!(status = status.as_u16(), bytes = text.len(), "Gateway responded");
            return Attempt::Done(Ok(text));
        }

        let error = Error::http_status(status.as_u16(), text);
        if error.is_retryable() {
            Attempt::Retry {
                delay: self.calculate_backoff(attempt),
                error,
            }
        } else {
            Attempt::Done(Err(error))
        }
    }

    /// Delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
