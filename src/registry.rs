//! Fragment registry.
//!
//! Maps each fragment id to the context captured when the fragment was
//! created: an error whose first stack frame points into the host bundle,
//! plus the line/column offset of the fragment within that frame.
//!
//! The registry is append-only. Entries live for the lifetime of the
//! registry and are never evicted, so memory grows with the number of
//! distinct fragments registered.

use crate::frame::ErrorLike;
use crate::marker::FragmentId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// An error value captured at fragment registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl CapturedError {
    /// An error whose stack text is `stack`.
    pub fn with_stack(stack: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            stack: Some(stack.into()),
        }
    }
}

impl ErrorLike for CapturedError {
    fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// Original-source context of one registered fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Error whose first stack frame is the bundle frame
    pub captured_error: CapturedError,
    /// Line offset of the fragment relative to the bundle frame
    pub line_offset: i64,
    /// Column offset of the fragment relative to the bundle frame
    pub column_offset: i64,
}

impl FragmentRecord {
    pub fn new(captured_error: CapturedError, line_offset: i64, column_offset: i64) -> Self {
        Self {
            captured_error,
            line_offset,
            column_offset,
        }
    }
}

/// The `[error, lineOffset, columnOffset]` triple handed over by the host.
impl From<(CapturedError, i64, i64)> for FragmentRecord {
    fn from((captured_error, line_offset, column_offset): (CapturedError, i64, i64)) -> Self {
        Self::new(captured_error, line_offset, column_offset)
    }
}

/// Thread-safe, append-only map from fragment id to [`FragmentRecord`].
///
/// Records are stored behind `Arc` and never mutated after insertion;
/// re-registering an id replaces the whole record (last write wins).
#[derive(Debug, Default)]
pub struct FragmentRegistry {
    records: RwLock<HashMap<FragmentId, Arc<FragmentRecord>>>,
}

impl FragmentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry. Never cleared.
    pub fn shared() -> Arc<FragmentRegistry> {
        static SHARED: OnceLock<Arc<FragmentRegistry>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(FragmentRegistry::new())))
    }

    /// Insert the record for `id`, replacing any earlier one.
    pub fn register(&self, id: FragmentId, record: impl Into<FragmentRecord>) {
        let record = Arc::new(record.into());
        let previous = self.records.write().insert(id, record);
        if previous.is_some() {
            log::debug!("Re-registered fragment {}", id);
        } else {
            log::debug!("Registered fragment {}", id);
        }
    }

    /// Look up the record for `id`.
    pub fn lookup(&self, id: FragmentId) -> Option<Arc<FragmentRecord>> {
        self.records.read().get(&id).cloned()
    }

    /// Check if the registry has any records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Get the number of registered fragments.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }
}
