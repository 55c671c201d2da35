//! Rule-driven user-agent classification.
//!
//! A user-agent string is classified along three independent facets (OS,
//! device, browser/user agent) by trying an ordered list of regex templates per
//! facet. The first template that matches wins, and its replacement templates
//! are filled from the captured groups.
//!
//! ```
//! let parser = uafacet::Parser::bundled(&uafacet::ParserOptions::default()).unwrap();
//! let client = parser.parse("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0");
//! assert_eq!(client.user_agent.family, "Firefox");
//! assert_eq!(client.user_agent.major.as_deref(), Some("121"));
//! assert_eq!(client.os.family, "Linux");
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod rule_set;
mod rules;

use std::fmt;

pub use api::{OTHER, ParseResultVerbose, Parser, ParserOptions, default_parser, parse};
pub use engine::{FacetTrace, ParseDetails};
pub use error::{Error, Result};
pub use rule_set::{Rule, RuleSet};

/// The three classification dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Os,
    Device,
    UserAgent,
}

impl Facet {
    /// Name of the rule-set sequence holding this facet's rules.
    pub const fn sequence_name(self) -> &'static str {
        match self {
            Facet::Os => "os_parsers",
            Facet::Device => "device_parsers",
            Facet::UserAgent => "user_agent_parsers",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Facet::Os => "OS",
            Facet::Device => "Device",
            Facet::UserAgent => "User agent",
        })
    }
}

/// Operating system facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Os {
    pub family: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
    pub patch_minor: Option<String>,
}

impl Os {
    /// An OS value with only a family.
    pub fn with_family(family: impl Into<String>) -> Self {
        Os { family: family.into(), major: None, minor: None, patch: None, patch_minor: None }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_versioned(f, &self.family, &[&self.major, &self.minor, &self.patch, &self.patch_minor])
    }
}

/// Device facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub family: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl Device {
    /// A device value with only a family.
    pub fn with_family(family: impl Into<String>) -> Self {
        Device { family: family.into(), brand: None, model: None }
    }

    /// Whether the device was classified as a crawler.
    pub fn is_spider(&self) -> bool {
        self.family.eq_ignore_ascii_case("Spider")
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)
    }
}

/// Browser / user-agent facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    pub family: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

impl UserAgent {
    /// A user-agent value with only a family.
    pub fn with_family(family: impl Into<String>) -> Self {
        UserAgent { family: family.into(), major: None, minor: None, patch: None }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_versioned(f, &self.family, &[&self.major, &self.minor, &self.patch])
    }
}

/// Full classification of one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// The classified input, unchanged.
    pub input: String,
    pub os: Os,
    pub device: Device,
    pub user_agent: UserAgent,
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.os, self.device, self.user_agent)
    }
}

/// `Family` followed by the present, non-empty parts joined with `.`.
fn write_versioned(f: &mut fmt::Formatter<'_>, family: &str, parts: &[&Option<String>]) -> fmt::Result {
    f.write_str(family)?;
    let mut present = parts.iter().filter_map(|p| p.as_deref()).filter(|p| !p.is_empty());
    if let Some(first) = present.next() {
        write!(f, " {first}")?;
        for part in present {
            write!(f, ".{part}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_display_skips_missing_parts() {
        let mut os = Os::with_family("Mac OS X");
        assert_eq!(os.to_string(), "Mac OS X");

        os.major = Some("10".into());
        os.minor = Some("15".into());
        os.patch_minor = Some("1".into());
        assert_eq!(os.to_string(), "Mac OS X 10.15.1");

        let ua = UserAgent {
            family: "Firefox".into(),
            major: Some("121".into()),
            minor: Some(String::new()),
            patch: Some("2".into()),
        };
        assert_eq!(ua.to_string(), "Firefox 121.2");
    }

    #[test]
    fn client_info_display_joins_facets() {
        let client = ClientInfo {
            input: "x".into(),
            os: Os::with_family("Other"),
            device: Device::with_family("Spider"),
            user_agent: UserAgent { major: Some("2".into()), ..UserAgent::with_family("Googlebot") },
        };
        assert_eq!(client.to_string(), "Other Spider Googlebot 2");
    }

    #[test]
    fn spider_detection_ignores_case() {
        assert!(Device::with_family("spider").is_spider());
        assert!(Device::with_family("Spider").is_spider());
        assert!(!Device::with_family("Spiderman").is_spider());
    }

    #[test]
    fn facet_names() {
        assert_eq!(Facet::Os.sequence_name(), "os_parsers");
        assert_eq!(Facet::Device.sequence_name(), "device_parsers");
        assert_eq!(Facet::UserAgent.sequence_name(), "user_agent_parsers");
        assert_eq!(Facet::UserAgent.to_string(), "User agent");
    }
}
