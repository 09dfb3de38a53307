//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `TraceConfig` fields.

pub fn bool_true() -> bool {
    true
}

// ── Marker grammar ─────────────────────────────────────────────────────────

/// Literal prefix emitted by worklet runtimes in place of a source file.
pub fn marker_prefix() -> String {
    "worklet".to_string()
}

/// File name reported when a bundle frame cannot be parsed.
pub fn unknown_file() -> String {
    "unknown".to_string()
}

// ── Reconstructed errors ───────────────────────────────────────────────────

pub fn error_name() -> String {
    "ReanimatedError".to_string()
}

pub fn js_engine() -> String {
    "reanimated".to_string()
}
