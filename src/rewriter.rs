//! Stack rewriting.
//!
//! [`StackRewriter`] replaces every synthetic marker in a stack string with
//! the real `file:line:column` it stands for. The resolved position is the
//! sum of three layers:
//!
//! - the bundle frame captured when the fragment was registered,
//! - the fragment's registration offset within that frame,
//! - the origin coordinates carried by the marker itself.
//!
//! Markers whose id is not registered, or whose numbers do not fit, are
//! left in the output verbatim. Rewriting never fails.

use crate::error::TraceError;
use crate::frame::FrameLocator;
use crate::marker::{MarkerGrammar, MarkerMatch, SyntheticMarker};
use crate::registry::FragmentRegistry;
use std::sync::Arc;
use worklet_trace_config::TraceConfig;

/// Result of a rewrite, with per-marker bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    /// The rewritten stack text.
    pub text: String,
    /// Markers replaced with a resolved location.
    pub resolved: usize,
    /// Markers left verbatim.
    pub unresolved: usize,
}

/// Resolves synthetic markers against a [`FragmentRegistry`].
#[derive(Debug, Clone)]
pub struct StackRewriter {
    registry: Arc<FragmentRegistry>,
    grammar: MarkerGrammar,
    locator: FrameLocator,
    warn_unresolved: bool,
}

impl StackRewriter {
    /// Create a rewriter with the default marker grammar and fallback file.
    pub fn new(registry: Arc<FragmentRegistry>) -> Self {
        Self {
            registry,
            grammar: MarkerGrammar::default(),
            locator: FrameLocator::default(),
            warn_unresolved: true,
        }
    }

    /// Create a rewriter from validated configuration.
    pub fn with_config(
        registry: Arc<FragmentRegistry>,
        config: &TraceConfig,
    ) -> Result<Self, TraceError> {
        config.validate()?;
        Ok(Self {
            registry,
            grammar: MarkerGrammar::new(&config.marker_prefix)?,
            locator: FrameLocator::new(config.unknown_file.as_str()),
            warn_unresolved: config.warn_unresolved,
        })
    }

    pub fn registry(&self) -> &Arc<FragmentRegistry> {
        &self.registry
    }

    /// Rewrite all resolvable markers in `stack`.
    ///
    /// Text without markers is returned unchanged.
    pub fn rewrite(&self, stack: &str) -> String {
        self.rewrite_with_summary(stack).text
    }

    /// Rewrite all resolvable markers in `stack` and report how many were resolved.
    pub fn rewrite_with_summary(&self, stack: &str) -> RewriteSummary {
        let mut text = String::with_capacity(stack.len());
        let mut resolved = 0;
        let mut unresolved = 0;
        let mut last_end = 0;

        for found in self.grammar.find_iter(stack) {
            text.push_str(&stack[last_end..found.span.start]);
            match self.resolve_match(&found) {
                Some(location) => {
                    text.push_str(&location);
                    resolved += 1;
                }
                None => {
                    text.push_str(found.text);
                    unresolved += 1;
                }
            }
            last_end = found.span.end;
        }
        text.push_str(&stack[last_end..]);

        if resolved + unresolved > 0 {
            log::debug!(
                "Rewrote stack: {} marker(s) resolved, {} left as-is",
                resolved,
                unresolved
            );
        }

        RewriteSummary {
            text,
            resolved,
            unresolved,
        }
    }

    fn resolve_match(&self, found: &MarkerMatch<'_>) -> Option<String> {
        let Some(marker) = found.marker else {
            log::warn!("Marker '{}' has out-of-range numbers, leaving as-is", found.text);
            return None;
        };
        self.resolve(&marker)
    }

    /// Resolve one marker to its `file:line:column` replacement text.
    ///
    /// Returns `None` when the id is not registered or a coordinate overflows.
    pub fn resolve(&self, marker: &SyntheticMarker) -> Option<String> {
        let Some(record) = self.registry.lookup(marker.id) else {
            if self.warn_unresolved {
                log::warn!("No stack details registered for fragment {}", marker.id);
            }
            return None;
        };

        let bundle = self.locator.locate_first_frame(&record.captured_error);
        let line = add_layers(marker.origin_line, bundle.line, record.line_offset);
        let column = add_layers(marker.origin_column, bundle.column, record.column_offset);

        let (Some(line), Some(column)) = (line, column) else {
            log::warn!(
                "Resolved position for fragment {} overflows, leaving marker as-is",
                marker.id
            );
            return None;
        };

        log::debug!(
            "Fragment {} origin {}:{} -> {}:{}:{}",
            marker.id,
            marker.origin_line,
            marker.origin_column,
            bundle.file,
            line,
            column
        );
        Some(format!("{}:{}:{}", bundle.file, line, column))
    }
}

/// `origin + bundle + offset`, or `None` on `i64` overflow.
fn add_layers(origin: u64, bundle: u64, offset: i64) -> Option<i64> {
    let origin = i64::try_from(origin).ok()?;
    let bundle = i64::try_from(bundle).ok()?;
    origin.checked_add(bundle)?.checked_add(offset)
}
