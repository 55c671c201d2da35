//! Replacement-template substitution.
//!
//! Once a template's regex has matched, each output field is resolved from the
//! captured groups and the field's (optional) replacement template. Two modes
//! exist.
//!
//! ## Positional mode (OS, user agent)
//!
//! Fields are visited in a fixed order and each one takes the *next* capture
//! group index from a shared cursor that starts at 1. The cursor moves once per
//! field, whether or not the field has a template:
//!
//! ```text
//! fields:    family   major   minor   patch
//! cursor:      1        2       3       4
//! token:      "$1"     "$2"    "$3"    "$4"
//! ```
//!
//! - no template: the raw group text (trimmed);
//! - template containing the field's token: the first occurrence of the token
//!   is replaced by the group text, a non-participating group contributes "";
//! - any other template: used verbatim as a constant.
//!
//! The visiting order itself is chosen by the facet (see `templates.rs`).
//!
//! ## Full-scan mode (device)
//!
//! A field template is scanned for every token `$1` to `$9`, each replaced by
//! its group text (or "" when the group did not take part). Fields resolve
//! independently; only template-less fields draw from the positional cursor.
//! Every occurrence of a token is replaced, so `"$1 $1"` repeats group 1 rather
//! than leaving the second token in place.
//!
//! Every resolved value is trimmed, and an empty result is reported as absent.

/// Highest group token recognised in full-scan templates.
pub(crate) const MAX_TOKEN: usize = 9;

/// Capture groups of one successful match. Index 0 is the whole match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatchGroups<'t> {
    groups: Vec<Option<&'t str>>,
}

impl<'t> MatchGroups<'t> {
    pub(crate) fn new(groups: Vec<Option<&'t str>>) -> Self {
        MatchGroups { groups }
    }

    /// Text of group `index`; `None` if it did not participate or does not exist.
    pub(crate) fn get(&self, index: usize) -> Option<&'t str> {
        self.groups.get(index).copied().flatten()
    }
}

/// Shared group cursor for positional substitution.
#[derive(Debug)]
pub(crate) struct Positional<'m, 't> {
    groups: &'m MatchGroups<'t>,
    next: usize,
}

impl<'m, 't> Positional<'m, 't> {
    pub(crate) fn new(groups: &'m MatchGroups<'t>) -> Self {
        Positional { groups, next: 1 }
    }

    /// Resolve the next field, advancing the cursor by exactly one.
    pub(crate) fn field(&mut self, template: Option<&str>) -> Option<String> {
        let index = self.next;
        self.next += 1;

        let captured = self.groups.get(index).map(str::trim);
        match template {
            None => captured.and_then(finish),
            Some(template) => {
                let token = token(index);
                if template.contains(&token) {
                    finish(&template.replacen(&token, captured.unwrap_or(""), 1))
                } else {
                    finish(template)
                }
            }
        }
    }
}

/// Resolve `template` by substituting every `$1`..`$9` token.
pub(crate) fn full_scan(groups: &MatchGroups<'_>, template: &str) -> Option<String> {
    let mut resolved = template.to_string();
    for index in 1..=MAX_TOKEN {
        if !resolved.contains('$') {
            break;
        }
        let token = token(index);
        if resolved.contains(&token) {
            resolved = resolved.replace(&token, groups.get(index).unwrap_or(""));
        }
    }
    finish(&resolved)
}

/// `$N` tokens in `template` that full-scan mode will not read as written
/// (`$0`, or multi-digit tokens such as `$91`, which scan as `$9` plus a digit).
pub(crate) fn unsupported_tokens(template: &str) -> impl Iterator<Item = &str> {
    regex!(r"\$\d+").find_iter(template).map(|m| m.as_str()).filter(|token| {
        token[1..].parse::<usize>().map(|n| n == 0 || n > MAX_TOKEN || token.len() > 2).unwrap_or(true)
    })
}

fn token(index: usize) -> String {
    format!("${index}")
}

fn finish(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
