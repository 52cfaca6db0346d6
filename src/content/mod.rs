//! Request content module
//!
//! Content nodes are the request payload fragments that describe one
//! gateway function each (`readView`, `readRelated`, `readMore`).
//!
//! # Overview
//!
//! - [`Function`] - one gateway function with its control id
//! - [`Content`] - the ordered list of functions sent in one operation
//!
//! Functions are built from a [`Params`](crate::types::Params) set with
//! `from_params`, which validates required options and applies defaults.

mod functions;
mod types;

pub use functions::{ReadMore, ReadMoreTarget, ReadRelated, ReadView, ReturnFormat, DEFAULT_PAGE_SIZE};
pub use types::{Content, Function};
