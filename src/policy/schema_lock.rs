//! Schema lock.
//!
//! Closes the admin UI and the admin API while the schema hash baked into the
//! running image disagrees with the hash recorded next to the data.
//!
//! # Design Decisions
//! - Hash files are read once at startup; missing files read as empty
//! - Engaged only when both hashes are present and differ
//! - Independent of the read-only toggle
//! - Paths are normalized and decoded the same way as the protected route table

use std::fs;
use std::path::Path;

use axum::http::Method;

use crate::config::SchemaLockConfig;
use crate::policy::decision::{Decision, Denial, SchemaHashes};
use crate::policy::rules::path_forms;

const ADMIN_UI: &str = "/_";
const ADMINS_API: &str = "/api/admins";

#[derive(Debug, Clone, Default)]
pub struct SchemaLock {
    hashes: Option<SchemaHashes>,
}

impl SchemaLock {
    /// A lock that never engages.
    pub fn disengaged() -> Self {
        Self::default()
    }

    /// Build from the two hash values.
    pub fn new(running_schema: &str, expected_schema: &str) -> Self {
        let running = running_schema.trim();
        let expected = expected_schema.trim();
        if running.is_empty() || expected.is_empty() || running == expected {
            return Self::disengaged();
        }
        Self {
            hashes: Some(SchemaHashes {
                expected_schema: expected.to_string(),
                running_schema: running.to_string(),
            }),
        }
    }

    /// Read both hash files as configured.
    pub fn load(config: &SchemaLockConfig) -> Self {
        if !config.enabled {
            return Self::disengaged();
        }

        let running = read_hash(&config.image_hash_path);
        let expected = read_hash(&config.data_hash_path);
        let lock = Self::new(&running, &expected);

        if let Some(hashes) = &lock.hashes {
            tracing::warn!(
                running_schema = %hashes.running_schema,
                expected_schema = %hashes.expected_schema,
                "Schema mismatch detected, admin surfaces closed"
            );
        }
        lock
    }

    pub fn is_engaged(&self) -> bool {
        self.hashes.is_some()
    }

    pub fn evaluate(&self, method: &Method, path: &str) -> Decision {
        let Some(hashes) = &self.hashes else {
            return Decision::Continue;
        };

        let reads_ui = *method == Method::GET || *method == Method::HEAD;
        let closed = path_forms(path).iter().any(|form| {
            (reads_ui && is_under(form, ADMIN_UI)) || is_under(form, ADMINS_API)
        });

        if closed {
            Decision::Terminate(Denial::schema_mismatch(hashes.clone()))
        } else {
            Decision::Continue
        }
    }
}

/// `path` is `prefix` itself or lies below it.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn read_hash(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content.trim().to_string(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Schema hash unavailable");
            String::new()
        }
    }
}
