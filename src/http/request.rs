//! Request handling and transformation.
//!
//! # Responsibilities
//! - Assign a unique request ID (UUID v4) as early as possible
//! - Rewrite the request target to the upstream authority
//! - Strip hop-by-hop headers before forwarding
//!
//! # Design Decisions
//! - Request ID generated by tower-http and carried in `x-request-id`
//! - Method, path, query, remaining headers and body are forwarded untouched

use axum::http::{
    header,
    uri::{Authority, InvalidUriParts, Parts, PathAndQuery, Scheme},
    HeaderMap, HeaderName, Request, Uri,
};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers that only make sense for a single connection.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Layer that assigns `x-request-id` when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Request ID for logging, `"unknown"` when none was assigned.
pub fn request_id_of<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .or_else(|| req.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok()))
        .unwrap_or("unknown")
        .to_string()
}

/// Point `uri` at the upstream, keeping path and query.
pub fn upstream_uri(uri: &Uri, upstream: &Authority) -> Result<Uri, InvalidUriParts> {
    let mut parts = Parts::default();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(upstream.clone());
    parts.path_and_query = Some(
        uri.path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/")),
    );
    Uri::from_parts(parts)
}

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_upstream_uri_keeps_path_and_query() {
        let upstream: Authority = "127.0.0.1:8090".parse().unwrap();
        let uri: Uri = "/api/collections/posts/records?page=2".parse().unwrap();
        let rewritten = upstream_uri(&uri, &upstream).unwrap();
        assert_eq!(
            rewritten.to_string(),
            "http://127.0.0.1:8090/api/collections/posts/records?page=2"
        );

        let absolute: Uri = "http://example.com".parse().unwrap();
        let rewritten = upstream_uri(&absolute, &upstream).unwrap();
        assert_eq!(rewritten.path(), "/");
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-secret"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-secret", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        strip_hop_by_hop(&mut headers);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn test_request_id_of() {
        let req = Request::builder()
            .header("x-request-id", "abc")
            .body(())
            .unwrap();
        assert_eq!(request_id_of(&req), "abc");

        let req = Request::builder().body(()).unwrap();
        assert_eq!(request_id_of(&req), "unknown");
    }
}
