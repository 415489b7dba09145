//! Read-only admin policy: mode gate, method filter and route table combined.

use axum::http::Method;

use crate::policy::decision::{Decision, Denial};
use crate::policy::mode::EnforcementMode;
use crate::policy::rules::ProtectedRoutes;

/// Returns true for methods that create, replace, update or delete state.
pub fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Immutable policy built once at startup and shared via Arc.
#[derive(Debug, Clone)]
pub struct ReadOnlyPolicy {
    mode: EnforcementMode,
    routes: ProtectedRoutes,
}

impl ReadOnlyPolicy {
    pub fn new(mode: EnforcementMode, routes: ProtectedRoutes) -> Self {
        Self { mode, routes }
    }

    /// Policy over the built-in protected surfaces.
    pub fn with_builtin_routes(mode: EnforcementMode) -> Result<Self, regex::Error> {
        Ok(Self::new(mode, ProtectedRoutes::builtin()?))
    }

    pub fn mode(&self) -> EnforcementMode {
        self.mode
    }

    pub fn routes(&self) -> &ProtectedRoutes {
        &self.routes
    }

    /// Decide whether `method path` may proceed.
    pub fn evaluate(&self, method: &Method, path: &str) -> Decision {
        if !self.mode.is_enforced() || !is_mutating(method) {
            return Decision::Continue;
        }

        match self.routes.classify(path) {
            Some(surface) => Decision::Terminate(Denial::read_only(surface)),
            None => Decision::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::decision::READ_ONLY_CODE;
    use crate::policy::rules::ProtectedSurface;
    use axum::http::StatusCode;

    fn policy(mode: EnforcementMode) -> ReadOnlyPolicy {
        ReadOnlyPolicy::with_builtin_routes(mode).unwrap()
    }

    fn scenarios() -> Vec<(Method, &'static str, bool)> {
        vec![
            (Method::POST, "/api/collections", true),
            (Method::PATCH, "/api/collections/abc123", true),
            (Method::POST, "/api/collections/import", true),
            (Method::GET, "/api/collections/abc123", false),
            (Method::PATCH, "/api/settings", true),
            (Method::DELETE, "/api/admins/xyz", true),
            (Method::POST, "/api/collections/posts/records", false),
        ]
    }

    #[test]
    fn test_enforced_scenarios() {
        let p = policy(EnforcementMode::ENFORCED);
        for (method, path, denied) in scenarios() {
            let decision = p.evaluate(&method, path);
            match decision.denial() {
                Some(d) => {
                    assert!(denied, "{method} {path} should pass");
                    assert_eq!(d.status, StatusCode::FORBIDDEN);
                    assert_eq!(d.code, READ_ONLY_CODE);
                }
                None => assert!(!denied, "{method} {path} should be denied"),
            }
        }
    }

    #[test]
    fn test_permissive_allows_everything() {
        let p = policy(EnforcementMode::PERMISSIVE);
        for (method, path, _) in scenarios() {
            assert!(p.evaluate(&method, path).is_continue(), "{method} {path}");
        }
    }

    #[test]
    fn test_read_methods_always_pass() {
        let p = policy(EnforcementMode::ENFORCED);
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            for path in ["/api/collections", "/api/settings", "/api/admins/x", "/api/logs"] {
                assert!(p.evaluate(&method, path).is_continue(), "{method} {path}");
            }
        }
    }

    #[test]
    fn test_every_mutating_method_is_filtered() {
        let p = policy(EnforcementMode::ENFORCED);
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let decision = p.evaluate(&method, "/api/logs/settings");
            assert_eq!(
                decision.denial().and_then(|d| d.surface),
                Some(ProtectedSurface::Logs)
            );
        }
        assert!(!is_mutating(&Method::TRACE));
        assert!(!is_mutating(&Method::CONNECT));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let p = policy(EnforcementMode::ENFORCED);
        let first = p.evaluate(&Method::DELETE, "/api/collections/abc");
        let second = p.evaluate(&Method::DELETE, "/api/collections/abc");
        assert_eq!(first, second);
    }
}
