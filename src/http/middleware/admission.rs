//! Admission Middleware.
//! Rejects requests the admission policy terminates, before any handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::http::request::request_id_of;
use crate::observability::metrics;
use crate::policy::{AdmissionPolicy, Decision};

pub async fn admission_middleware(
    State(policy): State<Arc<AdmissionPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match policy.evaluate(req.method(), req.uri().path()) {
        Decision::Continue => next.run(req).await,
        Decision::Terminate(denial) => {
            warn!(
                request_id = %request_id_of(&req),
                method = %req.method(),
                path = %req.uri().path(),
                code = denial.code,
                surface = denial.surface.map(|s| s.as_str()).unwrap_or("none"),
                status = denial.status.as_u16(),
                "Request rejected by admission policy"
            );
            metrics::record_denial(&denial);
            denial.into_response()
        }
    }
}
