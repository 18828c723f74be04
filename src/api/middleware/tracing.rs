//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Request tracing for every route, redirects included.
///
/// Each request gets an `INFO` span carrying method, URI and version. The
/// start of a request is logged at `DEBUG`, the response at `INFO` with its
/// status and latency in milliseconds, and 5xx responses at `ERROR`.
///
/// ```text
/// INFO request{method=GET uri=/promo version=HTTP/1.1}: finished processing request latency=3 ms status=307
/// INFO request{method=POST uri=/api/links version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// ```
///
/// Applied outermost in [`crate::routes::app_routes`], so rate-limited and
/// unauthenticated requests are logged too.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
