//! Admission policy subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     PB_READONLY_ADMIN → mode.rs (EnforcementMode, read once)
//!     BUILTIN_RULES     → rules.rs (compiled, ordered ProtectedRoutes)
//!     hash files        → schema_lock.rs (SchemaLock, read once)
//!
//! Per request (method, path):
//!     → schema_lock.rs  (409 schema_mismatch while engaged)
//!     → read_only.rs    (mode gate → method filter → route table)
//!     (admission.rs chains the two, first termination wins)
//!     → Decision::Continue | Decision::Terminate(Denial)
//! ```
//!
//! # Design Decisions
//! - Everything here is immutable after startup and free of I/O per request
//! - Evaluation is a pure function of (mode, method, path)
//! - Turning a Decision into an HTTP response is the middleware's job

pub mod admission;
pub mod decision;
pub mod mode;
pub mod read_only;
pub mod rules;
pub mod schema_lock;

pub use admission::AdmissionPolicy;
pub use decision::{Decision, Denial, SchemaHashes};
pub use mode::EnforcementMode;
pub use read_only::{is_mutating, ReadOnlyPolicy};
pub use rules::{ProtectedRoute, ProtectedRoutes, ProtectedSurface};
pub use schema_lock::SchemaLock;
