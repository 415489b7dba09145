//! Enforcement mode gate.
//!
//! # Responsibilities
//! - Interpret the read-only toggle value
//! - Resolve it once from the process environment at bootstrap
//!
//! # Design Decisions
//! - Only a case-insensitive `"true"` enables enforcement
//! - Unset, empty or malformed values resolve to "not enforced"
//! - The resolved value is copied into the policy; the environment is never re-read

use std::env;

/// Environment variable that switches the read-only mode on.
pub const DEFAULT_ENV_VAR: &str = "PB_READONLY_ADMIN";

/// Whether the read-only policy actively rejects requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnforcementMode {
    enforced: bool,
}

impl EnforcementMode {
    /// Enforcement switched on.
    pub const ENFORCED: Self = Self { enforced: true };

    /// Enforcement switched off (pass-through).
    pub const PERMISSIVE: Self = Self { enforced: false };

    /// Interpret a raw toggle value.
    pub fn from_value(raw: Option<&str>) -> Self {
        let enforced = raw
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        Self { enforced }
    }

    /// Read the toggle from the named environment variable.
    ///
    /// Non-unicode values are treated like any other malformed value.
    pub fn from_env(var: &str) -> Self {
        let value = env::var(var).ok();
        let mode = Self::from_value(value.as_deref());
        tracing::debug!(env_var = var, enforced = mode.enforced, "Read-only mode resolved");
        mode
    }

    pub fn is_enforced(&self) -> bool {
        self.enforced
    }
}
