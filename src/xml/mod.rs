//! Minimal XML support for the gateway protocol
//!
//! # Overview
//!
//! - [`XmlWriter`] builds request envelopes with escaped text and attributes.
//! - [`XmlNode`] is a small element tree parsed from gateway responses.
//!   Element order is preserved so records come back in server order.

mod reader;
mod writer;

pub use reader::XmlNode;
pub use writer::{escape_xml, XmlWriter};
