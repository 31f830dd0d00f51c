//! # starboard-common
//!
//! Shared utilities: configuration loaded from the environment, and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, Environment, LinkPreviewConfig, NoticeConfig,
    ReconcileConfig, StorageConfig,
};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
