//! Per-facet ordered template evaluation.

use super::compiler::Compiler;
use super::matcher::{Attempt, Pattern};
use super::metrics::FacetTrace;
use super::substitute::MatchGroups;
use crate::error::Result;
use crate::{Device, Facet, Os, Rule, UserAgent};
use std::time::Instant;

/// A facet result: anything with a family.
pub(crate) trait FacetValue: Clone {
    fn family(&self) -> &str;
}

impl FacetValue for Os {
    fn family(&self) -> &str {
        &self.family
    }
}

impl FacetValue for Device {
    fn family(&self) -> &str {
        &self.family
    }
}

impl FacetValue for UserAgent {
    fn family(&self) -> &str {
        &self.family
    }
}

/// One compiled rule of a facet.
pub(crate) trait Template: Sized {
    type Output: FacetValue;

    const FACET: Facet;

    /// Build the template from the `index`-th rule of the facet's sequence.
    fn compile(compiler: &Compiler, index: usize, rule: &Rule) -> Result<Self>;

    fn pattern(&self) -> &Pattern;

    /// Fill the output fields from a successful match. `fallback_family` is used
    /// when the family resolves to nothing.
    fn resolve(&self, groups: &MatchGroups<'_>, fallback_family: &str) -> Self::Output;
}

/// Ordered templates for one facet plus the value returned when none match.
#[derive(Debug)]
pub(crate) struct FacetParser<T: Template> {
    templates: Vec<T>,
    default: T::Output,
}

impl<T: Template> FacetParser<T> {
    pub(crate) fn new(rules: &[Rule], compiler: &Compiler, default: T::Output) -> Result<Self> {
        let templates = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| T::compile(compiler, index, rule))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(facet = %T::FACET, templates = templates.len(), "compiled facet templates");
        Ok(FacetParser { templates, default })
    }

    pub(crate) fn len(&self) -> usize {
        self.templates.len()
    }

    /// First matching template's result, or the default.
    pub(crate) fn parse(&self, input: &str) -> T::Output {
        self.parse_traced(input).0
    }

    /// Same as [`parse`](Self::parse), also reporting what the attempt cost.
    pub(crate) fn parse_traced(&self, input: &str) -> (T::Output, FacetTrace) {
        let start = Instant::now();
        let mut trace = FacetTrace::new(T::FACET);

        for (index, template) in self.templates.iter().enumerate() {
            trace.attempted += 1;
            match template.pattern().attempt(input) {
                Attempt::Matched(groups) => {
                    tracing::trace!(facet = %T::FACET, rule = index, "template matched");
                    let value = template.resolve(&groups, self.default.family());
                    trace.matched_rule = Some(index);
                    trace.duration = start.elapsed();
                    return (value, trace);
                }
                Attempt::Missed => {}
                Attempt::Aborted { elapsed } => {
                    trace.aborted += 1;
                    tracing::debug!(
                        facet = %T::FACET,
                        rule = index,
                        pattern = template.pattern().as_str(),
                        ?elapsed,
                        "match attempt aborted, treating as no match"
                    );
                }
            }
        }

        trace.duration = start.elapsed();
        (self.default.clone(), trace)
    }
}
