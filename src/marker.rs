//! Synthetic marker grammar.
//!
//! Worklet runtimes report frames as `<prefix>_<id>:<line>:<column>`
//! (`worklet_7:3:4` with the default prefix). [`MarkerGrammar`] finds every
//! such token in a stack string and decodes its three integers.

use regex::Regex;
use std::ops::Range;

/// Default literal prefix of synthetic markers.
pub const DEFAULT_MARKER_PREFIX: &str = "worklet";

/// Unique identifier of a registered fragment (the worklet hash).
pub type FragmentId = u64;

/// The three integers carried by a synthetic marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntheticMarker {
    pub id: FragmentId,
    pub origin_line: u64,
    pub origin_column: u64,
}

/// One occurrence of the marker grammar inside a larger string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch<'t> {
    /// Byte range of the whole token in the searched text.
    pub span: Range<usize>,
    /// The matched token, verbatim.
    pub text: &'t str,
    /// Decoded fields, or `None` if an integer does not fit in `u64`.
    pub marker: Option<SyntheticMarker>,
}

/// Compiled marker pattern for a given prefix.
#[derive(Debug, Clone)]
pub struct MarkerGrammar {
    prefix: String,
    regex: Regex,
}

impl Default for MarkerGrammar {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PREFIX)
            .expect("MarkerGrammar: default prefix is valid and should always compile")
    }
}

impl MarkerGrammar {
    /// Compile the grammar for `prefix`. The prefix is matched literally.
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"{}_([0-9]+):([0-9]+):([0-9]+)",
            regex::escape(prefix)
        );
        Ok(Self {
            prefix: prefix.to_string(),
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Find all non-overlapping markers in `text`, left to right.
    pub fn find_iter<'t>(&self, text: &'t str) -> impl Iterator<Item = MarkerMatch<'t>> {
        self.regex.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            let marker = decode_fields(&caps[1], &caps[2], &caps[3]);
            Some(MarkerMatch {
                span: whole.range(),
                text: whole.as_str(),
                marker,
            })
        })
    }

    /// Parse `token` as exactly one marker, with nothing before or after it.
    pub fn parse(&self, token: &str) -> Option<SyntheticMarker> {
        let m = self.find_iter(token).next()?;
        if m.span == (0..token.len()) {
            m.marker
        } else {
            None
        }
    }

    /// Whether `text` contains at least one marker token.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn decode_fields(id: &str, line: &str, column: &str) -> Option<SyntheticMarker> {
    Some(SyntheticMarker {
        id: id.parse().ok()?,
        origin_line: line.parse().ok()?,
        origin_column: column.parse().ok()?,
    })
}
