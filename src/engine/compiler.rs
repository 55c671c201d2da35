//! Rule-to-pattern compilation.
//!
//! Every rule entry carries a raw pattern under `regex`. Before compiling:
//!
//! - `\_` is rewritten to `_` (rule files use it, the regex engine rejects it);
//!   no other rewriting happens.
//! - `.` is made to match any character, including line breaks, and `^`/`$`
//!   anchor to the whole input rather than to physical lines.
//! - Matching is case-sensitive unless the rule says `regex_flag: i` or the
//!   parser was built with [`ParserOptions::ignore_case`]. The global option
//!   can only add case-insensitivity, a rule cannot take it away.

use super::matcher::{Pattern, backtrack_budget};
use crate::error::{Error, Result};
use crate::{Facet, ParserOptions, Rule};
use std::borrow::Cow;
use std::time::Duration;

/// Delegate NFA size budget used with [`ParserOptions::compiled_matching`].
const COMPILED_SIZE_LIMIT: usize = 64 << 20;
/// Lazy DFA cache budget used with [`ParserOptions::compiled_matching`].
const COMPILED_DFA_SIZE_LIMIT: usize = 64 << 20;

bitflags::bitflags! {
    /// Engine flags applied to a template pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct PatternFlags: u8 {
        const CASE_INSENSITIVE     = 1 << 0;
        const DOT_MATCHES_NEW_LINE = 1 << 1;
    }
}

impl PatternFlags {
    /// Inline flag group understood by the regex engine.
    fn inline_group(self) -> &'static str {
        if self.contains(PatternFlags::CASE_INSENSITIVE | PatternFlags::DOT_MATCHES_NEW_LINE) {
            "(?is)"
        } else if self.contains(PatternFlags::CASE_INSENSITIVE) {
            "(?i)"
        } else if self.contains(PatternFlags::DOT_MATCHES_NEW_LINE) {
            "(?s)"
        } else {
            ""
        }
    }
}

/// Compiles rule entries into [`Pattern`]s under one set of parser options.
#[derive(Debug, Clone)]
pub(crate) struct Compiler {
    base: PatternFlags,
    match_timeout: Option<Duration>,
    compiled_matching: bool,
}

impl Compiler {
    pub(crate) fn new(options: &ParserOptions) -> Self {
        let mut base = PatternFlags::DOT_MATCHES_NEW_LINE;
        if options.ignore_case {
            base |= PatternFlags::CASE_INSENSITIVE;
        }
        Compiler { base, match_timeout: options.match_timeout, compiled_matching: options.compiled_matching }
    }

    /// Flags for `rule`: the parser-wide base plus the rule's own `regex_flag`.
    pub(crate) fn flags_for(&self, rule: &Rule) -> PatternFlags {
        let mut flags = self.base;
        if rule.get("regex_flag").map(String::as_str) == Some("i") {
            flags |= PatternFlags::CASE_INSENSITIVE;
        }
        flags
    }

    /// Compile the `regex` of the `index`-th (0-based) rule of `facet`.
    pub(crate) fn compile(&self, facet: Facet, index: usize, rule: &Rule) -> Result<Pattern> {
        let raw = rule.get("regex").ok_or(Error::MissingPattern { facet, index })?;
        let source = format!("{}{}", self.flags_for(rule).inline_group(), rewrite(raw));

        let mut builder = fancy_regex::RegexBuilder::new(&source);
        // Without a configured bound the engine must not give up on its own.
        builder.backtrack_limit(self.match_timeout.map_or(usize::MAX, backtrack_budget));
        if self.compiled_matching {
            builder.delegate_size_limit(COMPILED_SIZE_LIMIT);
            builder.delegate_dfa_size_limit(COMPILED_DFA_SIZE_LIMIT);
        }

        let regex = builder.build().map_err(|source| Error::PatternCompile {
            facet,
            index,
            pattern: raw.clone(),
            source: Box::new(source),
        })?;
        Ok(Pattern::new(regex, self.match_timeout))
    }
}

fn rewrite(pattern: &str) -> Cow<'_, str> {
    if pattern.contains(r"\_") { Cow::Owned(pattern.replace(r"\_", "_")) } else { Cow::Borrowed(pattern) }
}
