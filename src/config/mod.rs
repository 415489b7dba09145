//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → bootstrap resolves EnforcementMode and SchemaLock from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    GuardConfig, ListenerConfig, LogFormat, ObservabilityConfig, ReadOnlyConfig,
    SchemaLockConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
