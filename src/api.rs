use crate::engine::{Compiler, DeviceTemplate, FacetParser, OsTemplate, ParseDetails, UserAgentTemplate};
use crate::error::{Error, Result};
use crate::{ClientInfo, Device, Facet, Os, RuleSet, UserAgent, rules};
use once_cell::sync::Lazy;
use std::path::Path;
use std::time::{Duration, Instant};

/// Family reported by a facet when no template matches.
pub const OTHER: &str = "Other";

static DEFAULT_PARSER: Lazy<Parser> =
    Lazy::new(|| Parser::bundled(&ParserOptions::default()).expect("bundled rule set compiles"));

/// Options applied while compiling a rule set.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Match every template case-insensitively, whatever its `regex_flag`.
    pub ignore_case: bool,
    /// Upper bound for a single match attempt. An attempt that exceeds it is
    /// treated as a miss and the next template is tried.
    pub match_timeout: Option<Duration>,
    /// Give the regex engine larger automaton budgets: more memory and slower
    /// warm-up in exchange for faster matching on long-lived parsers.
    pub compiled_matching: bool,
}

/// A compiled user-agent classifier.
///
/// Building compiles every template once; parsing only reads them, so one
/// `Parser` can serve any number of threads.
#[derive(Debug)]
pub struct Parser {
    os: FacetParser<OsTemplate>,
    device: FacetParser<DeviceTemplate>,
    user_agent: FacetParser<UserAgentTemplate>,
}

/// Result from [`Parser::parse_verbose`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub client: ClientInfo,
    pub details: ParseDetails,
}

impl Parser {
    /// Build from rule-set text.
    pub fn from_yaml(text: &str, options: &ParserOptions) -> Result<Self> {
        Self::from_rule_set(&RuleSet::parse(text)?, options)
    }

    /// Build from a rule-set file on disk.
    pub fn from_path(path: impl AsRef<Path>, options: &ParserOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml(&text, options)
    }

    /// Build from the rule set bundled with the crate.
    ///
    /// The bundled set is a small excerpt covering common browsers, operating
    /// systems, devices and crawlers. Anything outside it classifies as
    /// [`OTHER`]; load the full upstream `regexes.yaml` with
    /// [`from_path`](Self::from_path) for broad coverage.
    pub fn bundled(options: &ParserOptions) -> Result<Self> {
        Self::from_yaml(rules::BUNDLED, options)
    }

    /// Build from an already loaded rule set.
    pub fn from_rule_set(rules: &RuleSet, options: &ParserOptions) -> Result<Self> {
        let compiler = Compiler::new(options);
        Ok(Parser {
            os: FacetParser::new(rules.sequence(Facet::Os.sequence_name()), &compiler, Os::with_family(OTHER))?,
            device: FacetParser::new(
                rules.sequence(Facet::Device.sequence_name()),
                &compiler,
                Device::with_family(OTHER),
            )?,
            user_agent: FacetParser::new(
                rules.sequence(Facet::UserAgent.sequence_name()),
                &compiler,
                UserAgent::with_family(OTHER),
            )?,
        })
    }

    /// Classify `input` along all three facets.
    pub fn parse(&self, input: &str) -> ClientInfo {
        ClientInfo {
            input: input.to_string(),
            os: self.os.parse(input),
            device: self.device.parse(input),
            user_agent: self.user_agent.parse(input),
        }
    }

    pub fn parse_os(&self, input: &str) -> Os {
        self.os.parse(input)
    }

    pub fn parse_device(&self, input: &str) -> Device {
        self.device.parse(input)
    }

    pub fn parse_user_agent(&self, input: &str) -> UserAgent {
        self.user_agent.parse(input)
    }

    /// Classify `input` and report per-facet timings and winning templates.
    pub fn parse_verbose(&self, input: &str) -> ParseResultVerbose {
        let start = Instant::now();
        let (os, os_trace) = self.os.parse_traced(input);
        let (device, device_trace) = self.device.parse_traced(input);
        let (user_agent, user_agent_trace) = self.user_agent.parse_traced(input);

        ParseResultVerbose {
            client: ClientInfo { input: input.to_string(), os, device, user_agent },
            details: ParseDetails {
                total: start.elapsed(),
                os: os_trace,
                device: device_trace,
                user_agent: user_agent_trace,
            },
        }
    }

    /// Number of compiled templates for `facet`.
    pub fn template_count(&self, facet: Facet) -> usize {
        match facet {
            Facet::Os => self.os.len(),
            Facet::Device => self.device.len(),
            Facet::UserAgent => self.user_agent.len(),
        }
    }
}

/// Shared parser over the bundled rule set with default options.
pub fn default_parser() -> &'static Parser {
    &DEFAULT_PARSER
}

/// Classify `input` with the bundled rule set.
///
/// # Example
/// ```
/// let client = uafacet::parse("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)");
/// assert_eq!(client.user_agent.family, "Googlebot");
/// assert!(client.device.is_spider());
/// ```
pub fn parse(input: &str) -> ClientInfo {
    DEFAULT_PARSER.parse(input)
}
