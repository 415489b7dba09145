pub mod admission;
pub mod request_metrics;

pub use admission::admission_middleware;
pub use request_metrics::track_requests;
