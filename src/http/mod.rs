//! HTTP transport module
//!
//! Posts request envelopes to the XML gateway.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connect errors with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{
    BackoffType, HttpClient, HttpClientConfig, HttpClientConfigBuilder, XML_REQUEST_CONTENT_TYPE,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
