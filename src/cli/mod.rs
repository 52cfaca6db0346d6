//! CLI module
//!
//! Command-line interface over the custom object operations.
//!
//! # Commands
//!
//! - `read-view` - Read one page of a custom view
//! - `view-records` - Read every page of a custom view
//! - `read-related` - Read records related to object keys

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
