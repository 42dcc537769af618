//! Request tracing: one UUID per request, propagated via task-local storage.
//!
//! [`trace_request`] opens a `request` span carrying the trace id, method and
//! path, echoes the id in the [`TRACE_ID_HEADER`] response header and logs
//! completion with status and latency. Domain errors built while the request
//! is in flight pick the id up through [`TraceId::current`].
//!
//! Task-local values are not inherited by spawned tasks; wrap such work in
//! [`TraceId::scope`].

use std::future::Future;
use std::time::Instant;

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use tokio::task_local;
use tracing::{Instrument, error, field, info, info_span};
use uuid::Uuid;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Function middleware tagging each request with a fresh [`TraceId`].
///
/// ```
/// use actix_web::App;
/// use actix_web::middleware::from_fn;
/// use gatepass::middleware::trace::trace_request;
///
/// let app = App::new().wrap(from_fn(trace_request));
/// # let _ = app;
/// ```
///
/// # Errors
///
/// Passes through errors from the wrapped service unchanged.
pub async fn trace_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let trace_id = TraceId::generate();
    let span = info_span!(
        "request",
        %trace_id,
        method = %req.method(),
        path = %req.path(),
        status = field::Empty,
    );
    let started = Instant::now();

    let mut res = TraceId::scope(trace_id, next.call(req))
        .instrument(span.clone())
        .await?;

    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => {
            error!(parent: &span, %error, "failed to encode trace identifier header");
        }
    }
    let status = res.status().as_u16();
    span.record("status", status);
    info!(
        parent: &span,
        status,
        elapsed_ms = started.elapsed().as_millis(),
        "request completed"
    );
    Ok(res)
}
