//! Minimal reader for the rule-set markup.
//!
//! The rule files are YAML, but only a narrow slice of YAML ever shows up in
//! them: top-level names introducing sequences of flat `key: value` mappings.
//!
//! ```text
//! user_agent_parsers:          <- unindented, starts sequence "user_agent_parsers"
//!   - regex: '(Foo)/(\d+)'     <- "-" starts a new entry, rest is a key/value pair
//!     family_replacement: Foo  <- key/value pair added to the current entry
//! ```
//!
//! Values may carry one matching pair of surrounding `'` or `"` quotes, which
//! are stripped. No escape processing happens inside quotes. A bare `null` or
//! `~` leaves the key out of the entry entirely.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// A single rule entry: flat string keys to string values.
pub type Rule = HashMap<String, String>;

/// Named, ordered sequences of rule entries.
///
/// The order of entries within a sequence is preserved; it is the order in
/// which the compiled templates are later tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    sequences: HashMap<String, Vec<Rule>>,
}

impl RuleSet {
    /// Read `text` into named sequences.
    ///
    /// A single malformed line aborts the whole read with
    /// [`Error::MalformedConfig`] carrying its 1-based line number.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sequences: Vec<(String, Vec<Rule>)> = Vec::new();
        let mut active: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if !is_indented(raw) {
                let (name, _) = trimmed.split_once(':').ok_or_else(|| malformed(line, "expected `name:`"))?;
                let name = name.trim();
                if sequences.iter().any(|(existing, _)| existing == name) {
                    return Err(malformed(line, "sequence name defined twice"));
                }
                sequences.push((name.to_string(), Vec::new()));
                active = Some(sequences.len() - 1);
                continue;
            }

            let Some(active) = active else {
                return Err(malformed(line, "indented entry before any sequence"));
            };
            let entries = &mut sequences[active].1;

            let mut body = trimmed;
            if let Some(rest) = body.strip_prefix('-') {
                entries.push(Rule::new());
                body = rest.trim_start();
            }

            let (key, value) = body.split_once(':').ok_or_else(|| malformed(line, "expected `key: value`"))?;
            let Some(entry) = entries.last_mut() else {
                return Err(malformed(line, "key/value pair before the first `-` entry"));
            };

            let value = value.trim();
            if value == "null" || value == "~" {
                continue;
            }
            entry.insert(key.trim().to_string(), unquote(value).to_string());
        }

        Ok(RuleSet { sequences: sequences.into_iter().collect() })
    }

    /// Entries of the sequence called `name`, in declaration order.
    ///
    /// An unknown name yields an empty slice.
    pub fn sequence(&self, name: &str) -> &[Rule] {
        self.sequences.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of every sequence in the set (unordered).
    pub fn sequence_names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn malformed(line: usize, reason: &'static str) -> Error {
    Error::MalformedConfig { line, reason }
}
