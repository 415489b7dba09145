use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct GuardStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub read_only: bool,
    pub schema_locked: bool,
}

#[derive(Debug, Serialize)]
pub struct RuleView {
    pub surface: &'static str,
    pub pattern: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<GuardStatus> {
    Json(GuardStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        read_only: state.policy.read_only().mode().is_enforced(),
        schema_locked: state.policy.schema_lock().is_engaged(),
    })
}

/// Protected rule table in evaluation order.
pub async fn get_rules(State(state): State<AppState>) -> Json<Vec<RuleView>> {
    let rules = state
        .policy
        .read_only()
        .routes()
        .iter()
        .map(|rule| RuleView {
            surface: rule.surface().as_str(),
            pattern: rule.pattern().to_string(),
        })
        .collect();
    Json(rules)
}
