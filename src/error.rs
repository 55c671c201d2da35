//! Construction-time errors.
//!
//! Every variant here aborts building a [`Parser`](crate::Parser). Parsing a
//! user-agent string never fails: a match attempt that runs past the configured
//! bound is treated as a miss inside the facet parser and never reaches the
//! caller.

use crate::Facet;
use std::path::PathBuf;

/// Errors raised while loading a rule set or compiling its templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The rule-set text falls outside the supported markup subset.
    #[error("malformed rule set at line {line}: {reason}")]
    MalformedConfig { line: usize, reason: &'static str },

    /// A rule entry has no `regex` key.
    #[error("{facet} rule #{index} is missing regular expression specification")]
    MissingPattern { facet: Facet, index: usize },

    /// The (rewritten) pattern was rejected by the regex engine.
    #[error("{facet} rule #{index} has an invalid pattern `{pattern}`")]
    PatternCompile {
        facet: Facet,
        index: usize,
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// The rule-set file could not be read.
    #[error("failed to read rule set from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
