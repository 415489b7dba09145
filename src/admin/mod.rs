//! Guard introspection endpoints.
//!
//! Served by the guard itself and never forwarded upstream. Read-only, so no
//! authentication is layered on.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::{get_rules, get_status};
use crate::http::server::AppState;

pub const STATUS_PATH: &str = "/_guard/status";
pub const RULES_PATH: &str = "/_guard/rules";

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route(STATUS_PATH, get(get_status))
        .route(RULES_PATH, get(get_rules))
}
