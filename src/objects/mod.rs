//! Object operations module
//!
//! # Overview
//!
//! - [`IntacctObject`] - behaviour shared by every object type: building a
//!   request handler, dispatching content, continuing reads with `readMore`
//! - [`CustomObjects`] - custom view and related-record reads, including the
//!   paginated [`CustomObjects::get_view_records`]
//!
//! Object types compose an `IntacctObject` rather than reimplementing its
//! dispatch logic.

mod custom;
mod intacct_object;

pub use custom::{CustomObjects, MAX_QUERY_TOTAL_COUNT};
pub use intacct_object::IntacctObject;
