//! Template compilation, matching and substitution.
//!
//! ## How the parts work together
//!
//! ```text
//! RuleSet (rule_set.rs)
//!     │  one sequence per facet
//!     v
//! Compiler::compile            (compiler.rs)
//!     - `\_` rewrite, flags, match bound
//!     v
//! OsTemplate / DeviceTemplate / UserAgentTemplate   (templates.rs)
//!     │
//!     v
//! FacetParser::parse           (facet.rs)
//!     - try templates in declared order
//!     - Pattern::attempt       (matcher.rs)   Matched | Missed | Aborted
//!     - first match -> Template::resolve
//!                      positional / full-scan substitution (substitute.rs)
//!     - no match    -> facet default
//! ```
//!
//! Everything built here is immutable after construction, so a compiled
//! [`crate::Parser`] can be shared across threads without locking.
//!
//! `metrics.rs` holds the per-facet traces returned by verbose parsing.

#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/facet.rs"]
mod facet;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/substitute.rs"]
mod substitute;
#[path = "engine/templates.rs"]
mod templates;

pub(crate) use compiler::Compiler;
pub(crate) use facet::FacetParser;
pub use metrics::{FacetTrace, ParseDetails};
pub(crate) use templates::{DeviceTemplate, OsTemplate, UserAgentTemplate};
