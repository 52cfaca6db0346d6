//! Request handler traits and the HTTP-backed implementation

use super::envelope::build_request;
use crate::config::DEFAULT_ENDPOINT_URL;
use crate::content::Content;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::response::{parse_response, Operation};
use crate::types::Params;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Executes request content against the gateway
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Send `content` using the credentials and request options in `config`
    async fn execute_content(&self, config: &Params, content: &Content) -> Result<Operation>;
}

/// Builds request handlers from a configuration
///
/// Only transport settings (`endpoint_url`, `max_retries`, `timeout_secs`,
/// `requests_per_second`, `burst_size`) are read at construction time;
/// credentials travel with each `execute_content` call.
pub trait HandlerFactory: Send + Sync {
    fn create(&self, config: &Params) -> Result<Box<dyn RequestHandler>>;
}

/// Transport settings that select an HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TransportSettings {
    max_retries: u32,
    timeout: Duration,
    rate_limit: Option<RateLimiterConfig>,
}

impl TransportSettings {
    fn from_params(config: &Params) -> Result<Self> {
        let defaults = HttpClientConfig::default();
        let rate_limit = match get_u32(config, "requests_per_second")? {
            Some(rps) => Some(RateLimiterConfig::new(
                rps,
                get_u32(config, "burst_size")?.unwrap_or(1),
            )),
            None => None,
        };

        Ok(Self {
            max_retries: get_u32(config, "max_retries")?.unwrap_or(defaults.max_retries),
            timeout: config
                .get_u64("timeout_secs")?
                .map_or(defaults.timeout, Duration::from_secs),
            rate_limit,
        })
    }

    fn http_client(self) -> Result<HttpClient> {
        let mut builder = HttpClientConfig::builder()
            .max_retries(self.max_retries)
            .timeout(self.timeout);
        if let Some(rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        HttpClient::with_config(builder.build())
    }
}

fn get_u32(config: &Params, key: &str) -> Result<Option<u32>> {
    config
        .get_u64(key)?
        .map(|n| {
            u32::try_from(n)
                .map_err(|_| Error::invalid_value(key, format!("{n} is larger than {}", u32::MAX)))
        })
        .transpose()
}

fn endpoint_url_from(config: &Params) -> Result<String> {
    let endpoint_url = config
        .get_str("endpoint_url")?
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());
    url::Url::parse(&endpoint_url)?;
    Ok(endpoint_url)
}

/// Factory producing [`XmlRequestHandler`]s
///
/// Handlers created with the same transport settings share one
/// [`HttpClient`], so its connection pool and rate limiter cover every
/// request made through this factory.
#[derive(Debug, Default)]
pub struct XmlHandlerFactory {
    transports: Mutex<HashMap<TransportSettings, Arc<HttpClient>>>,
}

impl XmlHandlerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn transport(&self, settings: TransportSettings) -> Result<Arc<HttpClient>> {
        let mut transports = self
            .transports
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(http) = transports.get(&settings) {
            return Ok(Arc::clone(http));
        }

        debug!(?settings, "Creating gateway transport");
        let http = Arc::new(settings.http_client()?);
        transports.insert(settings, Arc::clone(&http));
        Ok(http)
    }
}

impl HandlerFactory for XmlHandlerFactory {
    fn create(&self, config: &Params) -> Result<Box<dyn RequestHandler>> {
        let endpoint_url = endpoint_url_from(config)?;
        let http = self.transport(TransportSettings::from_params(config)?)?;
        Ok(Box::new(XmlRequestHandler { endpoint_url, http }))
    }
}

/// Request handler that posts XML envelopes over HTTP
#[derive(Debug)]
pub struct XmlRequestHandler {
    endpoint_url: String,
    http: Arc<HttpClient>,
}

impl XmlRequestHandler {
    /// Build a standalone handler from transport settings, defaulting the endpoint
    pub fn from_config(config: &Params) -> Result<Self> {
        let endpoint_url = endpoint_url_from(config)?;
        let http = TransportSettings::from_params(config)?.http_client()?;

        Ok(Self {
            endpoint_url,
            http: Arc::new(http),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl RequestHandler for XmlRequestHandler {
    async fn execute_content(&self, config: &Params, content: &Content) -> Result<Operation> {
        let body = build_request(config, content)?;
        debug!(
            endpoint = %self.endpoint_url,
            functions = content.len(),
            "Posting request to gateway"
        );

        let response_body = self.http.post_xml(&self.endpoint_url, body).await?;
        let response = parse_response(&response_body, content)?;
        Ok(response.operation)
    }
}
