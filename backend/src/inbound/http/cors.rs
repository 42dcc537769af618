//! Cross-origin policy for the submission API.
//!
//! The gate pass form is served from elsewhere and posts JSON, so any origin
//! may send `POST` with a `Content-Type` header. Nothing else is allowed.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Preflight answers are cached by browsers for this many seconds.
pub const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS middleware for the `/api` scope.
#[must_use]
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([Method::POST, Method::OPTIONS])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}
