//! Request handler module
//!
//! The request handler is the collaborator that turns [`Content`](crate::content::Content)
//! into a gateway call and hands back the parsed [`Operation`](crate::response::Operation).
//!
//! # Overview
//!
//! - [`RequestHandler`] - executes content with a configuration
//! - [`HandlerFactory`] - builds a handler from transport settings
//! - [`XmlRequestHandler`] - the HTTP implementation used by default
//! - [`build_request`] - renders the request envelope

mod envelope;
mod handler;

pub use envelope::{build_request, DTD_VERSION};
pub use handler::{HandlerFactory, RequestHandler, XmlHandlerFactory, XmlRequestHandler};
