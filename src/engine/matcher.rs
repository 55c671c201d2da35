//! Bounded match attempts.
//!
//! A pattern is matched against the whole input. When a match bound is
//! configured it is enforced twice: the regex engine gets a backtracking budget
//! derived from the bound (so a runaway attempt stops on its own), and a result
//! that arrives after the deadline is discarded. Either way the attempt is
//! reported as [`Attempt::Aborted`], which callers treat as a miss.

use super::substitute::MatchGroups;
use std::time::{Duration, Instant};

/// Backtracking steps granted per microsecond of match bound.
const BACKTRACK_STEPS_PER_MICRO: u128 = 20;

/// A compiled template regex plus its match bound.
#[derive(Debug)]
pub(crate) struct Pattern {
    regex: fancy_regex::Regex,
    timeout: Option<Duration>,
}

/// Outcome of matching one pattern against one input.
#[derive(Debug)]
pub(crate) enum Attempt<'t> {
    Matched(MatchGroups<'t>),
    Missed,
    /// The engine gave up or the bound elapsed.
    Aborted { elapsed: Duration },
}

impl Pattern {
    pub(crate) fn new(regex: fancy_regex::Regex, timeout: Option<Duration>) -> Self {
        Pattern { regex, timeout }
    }

    /// The pattern text as handed to the regex engine.
    pub(crate) fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub(crate) fn attempt<'t>(&self, input: &'t str) -> Attempt<'t> {
        let start = Instant::now();
        let outcome = self.regex.captures(input);
        let elapsed = start.elapsed();

        if self.timeout.is_some_and(|limit| elapsed > limit) {
            return Attempt::Aborted { elapsed };
        }

        match outcome {
            Ok(Some(caps)) => {
                let groups = (0..caps.len()).map(|i| caps.get(i).map(|m| m.as_str())).collect();
                Attempt::Matched(MatchGroups::new(groups))
            }
            Ok(None) => Attempt::Missed,
            Err(_) => Attempt::Aborted { elapsed },
        }
    }
}

/// Backtracking budget for a match bound of `timeout`.
pub(crate) fn backtrack_budget(timeout: Duration) -> usize {
    let steps = timeout.as_micros().saturating_mul(BACKTRACK_STEPS_PER_MICRO);
    usize::try_from(steps).unwrap_or(usize::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str, timeout: Option<Duration>) -> Pattern {
        Pattern::new(fancy_regex::Regex::new(source).unwrap(), timeout)
    }

    #[test]
    fn matched_keeps_non_participating_groups() {
        let p = pattern(r"(Foo)/(\d+)(?:\.(\d+)|)", None);
        match p.attempt("xx Foo/12 yy") {
            Attempt::Matched(groups) => {
                assert_eq!(groups.get(0), Some("Foo/12"));
                assert_eq!(groups.get(1), Some("Foo"));
                assert_eq!(groups.get(2), Some("12"));
                assert_eq!(groups.get(3), None);
                assert_eq!(groups.get(4), None);
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn missed_when_pattern_does_not_match() {
        assert!(matches!(pattern("Bar", None).attempt("Foo"), Attempt::Missed));
    }

    #[test]
    fn zero_bound_discards_late_results() {
        let p = pattern("Foo", Some(Duration::ZERO));
        // Any measurable matching time exceeds a zero bound.
        let haystack = "x".repeat(10_000);
        let outcome = p.attempt(&haystack);
        assert!(matches!(outcome, Attempt::Aborted { .. } | Attempt::Missed));
    }

    #[test]
    fn budget_scales_with_bound() {
        assert_eq!(backtrack_budget(Duration::ZERO), 1);
        assert_eq!(backtrack_budget(Duration::from_millis(1)), 20_000);
        assert_eq!(backtrack_budget(Duration::from_secs(1)), 20_000_000);
        assert_eq!(backtrack_budget(Duration::MAX), usize::MAX);
    }
}
