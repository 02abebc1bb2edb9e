//! Per-request spans, request ids, metrics and outcome logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, field, info, info_span, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use self::request_ids::{REQUEST_ID_HEADER, RequestId};
use super::{metrics, settings};

/// Paths scraped by infrastructure, served without spans or access logs.
const UNTRACKED_PATHS: &[&str] = &["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNTRACKED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let request_id = RequestId::resolve(req.header::<String>(REQUEST_ID_HEADER));

    request_id.write_header(res);

    let method = req.method().as_str().to_owned();
    let route = spans::route_label(req.uri().path());
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = info_span!(
        parent: None,
        "http.request",
        otel.name = %format!("{method} {route}"),
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %req.uri().path(),
        route = %route,
        remote_addr = %req.remote_addr(),
        user_uuid = field::Empty,
        status = field::Empty,
        duration_ms = field::Empty
    );

    if settings::otel_parent_propagation_enabled() {
        continue_upstream_trace(&span, req);
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let status = res.status_code.unwrap_or(StatusCode::OK);
    let elapsed = started.elapsed();

    metrics::observe_request(&method, &route, status.as_u16(), elapsed.as_secs_f64());

    span.in_scope(|| log_outcome(&span, status, elapsed));
}

fn continue_upstream_trace(span: &Span, req: &Request) {
    let Some(upstream) = parent_context::upstream_context(req.headers()) else {
        return;
    };

    if let Err(source) = span.set_parent(upstream) {
        warn!("failed to continue upstream trace: {source}");
    }
}

fn log_outcome(span: &Span, status: StatusCode, elapsed: Duration) {
    let status = status.as_u16();
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    let threshold_ms = settings::slow_request_threshold_ms();

    span.record("status", status);
    span.record("duration_ms", duration_ms);

    match status {
        500.. => error!(status, duration_ms, "request failed"),
        400..=499 => warn!(status, duration_ms, "request rejected"),
        _ => info!(status, duration_ms, "request completed"),
    }

    if duration_ms > threshold_ms {
        warn!(duration_ms, threshold_ms, "slow request");
    }
}
