//! Ordered chain of admission stages.

use axum::http::Method;

use crate::policy::decision::Decision;
use crate::policy::read_only::ReadOnlyPolicy;
use crate::policy::schema_lock::SchemaLock;

/// Schema lock first, then the read-only policy. First termination wins.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    schema_lock: SchemaLock,
    read_only: ReadOnlyPolicy,
}

impl AdmissionPolicy {
    pub fn new(schema_lock: SchemaLock, read_only: ReadOnlyPolicy) -> Self {
        Self {
            schema_lock,
            read_only,
        }
    }

    pub fn schema_lock(&self) -> &SchemaLock {
        &self.schema_lock
    }

    pub fn read_only(&self) -> &ReadOnlyPolicy {
        &self.read_only
    }

    pub fn evaluate(&self, method: &Method, path: &str) -> Decision {
        match self.schema_lock.evaluate(method, path) {
            Decision::Continue => self.read_only.evaluate(method, path),
            terminate => terminate,
        }
    }
}
