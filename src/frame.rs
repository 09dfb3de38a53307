//! Bundle frame extraction from captured error stacks.
//!
//! A captured error's first stack line looks like `fnName@path/to/file.js:12:3`.
//! [`FrameLocator`] pulls `(file, line, column)` out of that line and falls back
//! to a placeholder location when the line is missing or does not match.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// File name reported when no frame can be parsed.
pub const UNKNOWN_FILE: &str = "unknown";

/// Anything that exposes an optional multi-line stack text.
pub trait ErrorLike {
    fn stack(&self) -> Option<&str>;
}

/// A `file:line:column` triple recovered from a stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedLocation {
    pub file: String,
    pub line: u64,
    pub column: u64,
}

impl ResolvedLocation {
    /// The placeholder location `(file, 0, 0)`.
    pub fn fallback(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            column: 0,
        }
    }
}

impl Default for ResolvedLocation {
    fn default() -> Self {
        Self::fallback(UNKNOWN_FILE)
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Compiled frame header pattern: `@<file>:<line>:<column>`.
///
/// `[^@]+` is greedy, so the file runs up to the last two integer groups.
fn frame_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@([^@]+):([0-9]+):([0-9]+)")
            .expect("frame_header_regex: pattern is valid and should always compile")
    })
}

/// Parse a single stack line as a frame header.
///
/// Returns `None` when the line does not match or either integer overflows.
pub fn parse_frame_header(line: &str) -> Option<ResolvedLocation> {
    let caps = frame_header_regex().captures(line)?;
    let line_no = caps[2].parse::<u64>().ok()?;
    let column = caps[3].parse::<u64>().ok()?;
    Some(ResolvedLocation {
        file: caps[1].to_string(),
        line: line_no,
        column,
    })
}

/// Extracts the bundle frame from the first line of an error's stack.
#[derive(Debug, Clone)]
pub struct FrameLocator {
    unknown_file: String,
}

impl Default for FrameLocator {
    fn default() -> Self {
        Self::new(UNKNOWN_FILE)
    }
}

impl FrameLocator {
    /// Create a locator whose fallback location uses `unknown_file`.
    pub fn new(unknown_file: impl Into<String>) -> Self {
        Self {
            unknown_file: unknown_file.into(),
        }
    }

    /// Locate the first frame of `error`'s stack.
    ///
    /// Never fails: an absent or empty stack, or a first line that is not a
    /// frame header, yields `(unknown_file, 0, 0)`.
    pub fn locate_first_frame<E: ErrorLike + ?Sized>(&self, error: &E) -> ResolvedLocation {
        error
            .stack()
            .and_then(|stack| stack.split('\n').next())
            .filter(|frame| !frame.is_empty())
            .and_then(parse_frame_header)
            .unwrap_or_else(|| ResolvedLocation::fallback(self.unknown_file.as_str()))
    }
}

/// [`FrameLocator::locate_first_frame`] with the default `"unknown"` fallback.
pub fn locate_first_frame<E: ErrorLike + ?Sized>(error: &E) -> ResolvedLocation {
    FrameLocator::default().locate_first_frame(error)
}
