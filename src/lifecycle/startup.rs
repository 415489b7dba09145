//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the enforcement mode from the environment (once)
//! - Compile the protected route table
//! - Read the schema hashes
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The environment is consulted here and nowhere else

use thiserror::Error;

use crate::config::{ConfigError, GuardConfig};
use crate::policy::{AdmissionPolicy, EnforcementMode, ReadOnlyPolicy, SchemaLock};

/// Error type for bootstrap and serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid protected route pattern: {0}")]
    Rules(#[from] regex::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the admission policy with the mode taken from the environment.
pub fn build_policy(config: &GuardConfig) -> Result<AdmissionPolicy, StartupError> {
    let mode = EnforcementMode::from_env(&config.read_only.env_var);
    build_policy_with_mode(config, mode)
}

/// Build the admission policy with an explicit mode.
pub fn build_policy_with_mode(
    config: &GuardConfig,
    mode: EnforcementMode,
) -> Result<AdmissionPolicy, StartupError> {
    let read_only = ReadOnlyPolicy::with_builtin_routes(mode)?;
    let schema_lock = SchemaLock::load(&config.schema_lock);

    tracing::info!(
        env_var = %config.read_only.env_var,
        read_only = mode.is_enforced(),
        protected_rules = read_only.routes().len(),
        schema_locked = schema_lock.is_engaged(),
        "Admission policy ready"
    );

    Ok(AdmissionPolicy::new(schema_lock, read_only))
}
