//! Typed error types for worklet-trace.
//!
//! Rewriting and reporting never fail; only constructing a rewriter or
//! reporter from configuration can.

use thiserror::Error;
use worklet_trace_config::ConfigError;

/// Errors raised while building a [`crate::StackRewriter`] or
/// [`crate::FatalErrorReporter`] from configuration.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The supplied configuration failed validation.
    #[error("invalid trace configuration: {0}")]
    Config(#[from] ConfigError),

    /// The marker pattern could not be compiled.
    #[error("marker pattern failed to compile: {0}")]
    MarkerPattern(#[from] regex::Error),
}
