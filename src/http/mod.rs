//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → middleware/request_metrics.rs (count every response)
//!     → request.rs (assign request ID)
//!     → middleware/admission.rs (schema lock, read-only policy)
//!         → 403 / 409 answered here, or
//!     → /_guard/* introspection routes, or
//!     → server.rs proxy_handler (rewrite URI, forward upstream)
//!     → response.rs (strip hop-by-hop, stream body back)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::admission_middleware;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
