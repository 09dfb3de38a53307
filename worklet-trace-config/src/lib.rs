//! Configuration for worklet stack trace attribution.
//!
//! This crate provides the configuration types, default values and YAML
//! loading used by `worklet-trace`. It includes:
//!
//! - The synthetic marker prefix and fallback file name
//! - The type and engine tags placed on reconstructed errors
//! - Logging switches for unresolved markers

pub mod defaults;
pub mod error;
pub mod trace_config;

pub use error::ConfigError;
pub use trace_config::TraceConfig;
