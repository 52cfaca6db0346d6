// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Intacct SDK
//!
//! Async client for the Intacct XML gateway, covering custom object reads:
//! single-page view reads, fully paginated view reads and related-record
//! reads.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use intacct_sdk::{ClientConfig, CustomObjects, IntacctClient, Params, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = IntacctClient::connect(ClientConfig::from_env())?;
//!     let objects = CustomObjects::new();
//!
//!     let params = Params::new().with("view", "CUSTOMER#10").with("page_size", 500);
//!     let records = objects.get_view_records(&params, &client).await?;
//!     println!("{} records", records.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller params ──┐
//!                 ├─ merge ─► content (readView / readRelated / readMore)
//! session config ─┘                │
//!                                  ▼
//!                 RequestHandler ─► envelope XML ─► HTTP POST ─► response XML
//!                                  │
//!                                  ▼
//!                 OperationResult (status, errors, data + pagination metadata)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Parameter sets and common types
pub mod types;

/// Client configuration
pub mod config;

/// Client handle with session defaults
pub mod client;

/// Minimal XML writer and reader
pub mod xml;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Request content nodes
pub mod content;

/// Gateway response parsing
pub mod response;

/// Request handler collaborator
pub mod request;

/// Object operations
pub mod objects;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::IntacctClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use objects::{CustomObjects, IntacctObject};
pub use types::{Params, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
