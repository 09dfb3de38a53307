//! Fatal error reporting for worklet runtimes.
//!
//! A worklet runtime hands over `{ message, stack? }` when it hits a fatal
//! error. [`FatalErrorReporter`] rewrites the stack's synthetic markers,
//! wraps the result in a [`ReconstructedError`] and passes it to the host's
//! [`FatalErrorSink`].

use crate::error::TraceError;
use crate::frame::ErrorLike;
use crate::registry::FragmentRegistry;
use crate::rewriter::StackRewriter;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use worklet_trace_config::TraceConfig;

/// What a worklet runtime reports on a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatalErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl FatalErrorPayload {
    pub fn new(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            message: message.into(),
            stack,
        }
    }

    /// Parse the JSON object sent across from the worklet runtime.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// The error delivered to the fatal error sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedError {
    /// Fixed type tag (e.g. `ReanimatedError`)
    pub name: String,
    pub message: String,
    /// Stack with synthetic markers resolved, if the runtime supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Engine the error originated from (e.g. `reanimated`)
    pub js_engine: String,
}

impl ErrorLike for ReconstructedError {
    fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// Receives reconstructed errors. Provided by the host.
pub trait FatalErrorSink: Send + Sync {
    fn report_fatal_error(&self, error: ReconstructedError);
}

impl<F> FatalErrorSink for F
where
    F: Fn(ReconstructedError) + Send + Sync,
{
    fn report_fatal_error(&self, error: ReconstructedError) {
        self(error)
    }
}

/// Public entry point: rewrite a reported stack and hand it to the sink.
pub struct FatalErrorReporter {
    rewriter: StackRewriter,
    sink: Box<dyn FatalErrorSink>,
    error_name: String,
    js_engine: String,
}

impl FatalErrorReporter {
    /// Create a reporter with default tags.
    pub fn new(registry: Arc<FragmentRegistry>, sink: impl FatalErrorSink + 'static) -> Self {
        let config = TraceConfig::default();
        Self {
            rewriter: StackRewriter::new(registry),
            sink: Box::new(sink),
            error_name: config.error_name,
            js_engine: config.js_engine,
        }
    }

    /// Create a reporter from validated configuration.
    pub fn with_config(
        registry: Arc<FragmentRegistry>,
        sink: impl FatalErrorSink + 'static,
        config: &TraceConfig,
    ) -> Result<Self, TraceError> {
        Ok(Self {
            rewriter: StackRewriter::with_config(registry, config)?,
            sink: Box::new(sink),
            error_name: config.error_name.clone(),
            js_engine: config.js_engine.clone(),
        })
    }

    pub fn rewriter(&self) -> &StackRewriter {
        &self.rewriter
    }

    /// Build the reconstructed error for `payload` without delivering it.
    ///
    /// An absent or empty stack is passed through as `None` without invoking
    /// the rewriter. If rewriting panics, the original stack is kept.
    pub fn reconstruct(&self, payload: FatalErrorPayload) -> ReconstructedError {
        let FatalErrorPayload { message, stack } = payload;
        let stack = stack
            .filter(|s| !s.is_empty())
            .map(|s| self.rewrite_or_original(s));

        ReconstructedError {
            name: self.error_name.clone(),
            message,
            stack,
            js_engine: self.js_engine.clone(),
        }
    }

    /// Rewrite `payload`'s stack and deliver the reconstructed error to the sink.
    pub fn report(&self, payload: FatalErrorPayload) {
        let error = self.reconstruct(payload);
        log::debug!("Reporting fatal {}: {}", error.name, error.message);
        self.sink.report_fatal_error(error);
    }

    fn rewrite_or_original(&self, stack: String) -> String {
        // Rewriting must never keep the original report from reaching the sink
        match panic::catch_unwind(AssertUnwindSafe(|| self.rewriter.rewrite(&stack))) {
            Ok(rewritten) => rewritten,
            Err(_) => {
                log::error!("Stack rewrite panicked, reporting original stack");
                stack
            }
        }
    }
}
