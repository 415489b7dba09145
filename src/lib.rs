//! Read-only admin guard.
//!
//! Admission policy that, when `PB_READONLY_ADMIN=true`, rejects schema and
//! configuration mutations before they reach the application, plus a small
//! reverse proxy that puts the policy in front of an upstream API.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;

pub use config::GuardConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use policy::{AdmissionPolicy, Decision, Denial, EnforcementMode, ReadOnlyPolicy};
