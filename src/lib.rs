//! Source attribution for errors thrown inside worklets.
//!
//! Worklets are code fragments extracted from an application bundle and
//! compiled for a separate runtime. Their stack traces name synthetic
//! locations like `worklet_7:3:4` instead of the bundle file. This crate maps
//! those markers back to real `file:line:column` positions.
//!
//! - [`FragmentRegistry`] records, per fragment id, an error captured at
//!   registration time and the fragment's offset within that error's frame.
//! - [`StackRewriter`] finds markers in a stack string and substitutes the
//!   resolved locations.
//! - [`FatalErrorReporter`] is the entry point used when a worklet runtime
//!   reports a fatal error.
//!
//! ```
//! use std::sync::Arc;
//! use worklet_trace::{CapturedError, FragmentRecord, FragmentRegistry, StackRewriter};
//!
//! let registry = Arc::new(FragmentRegistry::new());
//! registry.register(
//!     7,
//!     FragmentRecord::new(CapturedError::with_stack("myFn@bundle.js:100:10"), 1, 2),
//! );
//!
//! let rewriter = StackRewriter::new(registry);
//! assert_eq!(rewriter.rewrite("at foo (worklet_7:3:4)"), "at foo (bundle.js:104:16)");
//! ```

pub mod error;
pub mod frame;
pub mod marker;
pub mod registry;
pub mod report;
pub mod rewriter;

pub use error::TraceError;
pub use frame::{ErrorLike, FrameLocator, ResolvedLocation, locate_first_frame, parse_frame_header};
pub use marker::{FragmentId, MarkerGrammar, MarkerMatch, SyntheticMarker};
pub use registry::{CapturedError, FragmentRecord, FragmentRegistry};
pub use report::{FatalErrorPayload, FatalErrorReporter, FatalErrorSink, ReconstructedError};
pub use rewriter::{RewriteSummary, StackRewriter};

// Configuration types
pub use worklet_trace_config::{ConfigError, TraceConfig};
