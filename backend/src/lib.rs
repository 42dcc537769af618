//! Gate pass submission service.
//!
//! Accepts gate pass requests over HTTP, appends them to a JSON store and
//! emails the requester. Records older than the retention window are purged
//! at startup.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use doc::ApiDoc;
pub use middleware::trace_request;
