//! Rule set bundled with the crate.

/// Text of `rules/regexes.yaml`, read by [`Parser::bundled`](crate::Parser::bundled).
pub(crate) const BUNDLED: &str = include_str!("rules/regexes.yaml");
