//! Policy outcomes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::policy::rules::ProtectedSurface;

/// Machine-readable code returned when a protected mutation is rejected.
pub const READ_ONLY_CODE: &str = "read_only_admin";

/// Human-readable message paired with [`READ_ONLY_CODE`].
pub const READ_ONLY_MESSAGE: &str = "Schema/config changes are disabled in this environment.";

/// Machine-readable code returned while the schema lock is engaged.
pub const SCHEMA_MISMATCH_CODE: &str = "schema_mismatch";

pub const SCHEMA_MISMATCH_MESSAGE: &str = "This database schema differs from the running image. \
Deploy a build whose migrations match this schema to re-enable Admin UI.";

/// Outcome of a pipeline stage: forward the request or answer it here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Terminate(Denial),
}

impl Decision {
    pub fn is_continue(&self) -> bool {
        matches!(self, Decision::Continue)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Continue => None,
            Decision::Terminate(denial) => Some(denial),
        }
    }
}

/// Hashes reported alongside a schema mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaHashes {
    pub expected_schema: String,
    pub running_schema: String,
}

/// Structured rejection. Serializes to the JSON response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    #[serde(skip)]
    pub status: StatusCode,
    #[serde(skip)]
    pub surface: Option<ProtectedSurface>,
    pub code: &'static str,
    pub message: &'static str,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaHashes>,
}

impl Denial {
    /// The fixed 403 answer for a protected mutation.
    pub fn read_only(surface: ProtectedSurface) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            surface: Some(surface),
            code: READ_ONLY_CODE,
            message: READ_ONLY_MESSAGE,
            schema: None,
        }
    }

    /// The 409 answer while image and data schemas disagree.
    pub fn schema_mismatch(hashes: SchemaHashes) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            surface: None,
            code: SCHEMA_MISMATCH_CODE,
            message: SCHEMA_MISMATCH_MESSAGE,
            schema: Some(hashes),
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_body_has_exactly_two_fields() {
        let body = serde_json::to_value(Denial::read_only(ProtectedSurface::Settings)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "code": "read_only_admin",
                "message": READ_ONLY_MESSAGE,
            })
        );
    }

    #[test]
    fn test_schema_mismatch_body_includes_hashes() {
        let denial = Denial::schema_mismatch(SchemaHashes {
            expected_schema: "db".into(),
            running_schema: "img".into(),
        });
        assert_eq!(denial.status, StatusCode::CONFLICT);
        let body = serde_json::to_value(&denial).unwrap();
        assert_eq!(body["code"], "schema_mismatch");
        assert_eq!(body["expected_schema"], "db");
        assert_eq!(body["running_schema"], "img");
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_decision_helpers() {
        assert!(Decision::Continue.is_continue());
        assert!(Decision::Continue.denial().is_none());
        let d = Decision::Terminate(Denial::read_only(ProtectedSurface::Logs));
        assert_eq!(d.denial().unwrap().status, StatusCode::FORBIDDEN);
    }
}
