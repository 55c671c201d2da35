//! Parse traces.
//!
//! Returned by [`Parser::parse_verbose`](crate::Parser::parse_verbose) for
//! profiling rule sets and finding slow or shadowed templates. The plain parse
//! path collects the same counters but drops them.

use crate::Facet;
use std::time::Duration;

/// What one facet did for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetTrace {
    pub facet: Facet,
    /// Time spent trying templates and resolving the winner.
    pub duration: Duration,
    /// Number of templates tried, including the winner.
    pub attempted: usize,
    /// Position (0-based) of the winning template in the facet's sequence.
    pub matched_rule: Option<usize>,
    /// Attempts abandoned because they ran past the match bound.
    pub aborted: usize,
}

impl FacetTrace {
    pub(crate) fn new(facet: Facet) -> Self {
        FacetTrace { facet, duration: Duration::ZERO, attempted: 0, matched_rule: None, aborted: 0 }
    }
}

/// Traces for all three facets of one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDetails {
    /// Total elapsed time for the classification.
    pub total: Duration,
    pub os: FacetTrace,
    pub device: FacetTrace,
    pub user_agent: FacetTrace,
}
