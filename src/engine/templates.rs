//! The three facet templates.
//!
//! | facet      | keys                                                        | mode        |
//! |------------|-------------------------------------------------------------|-------------|
//! | OS         | `os_replacement`, `os_v1_replacement` .. `os_v4_replacement` | positional  |
//! | user agent | `family_replacement`, `v1_replacement` .. `v3_replacement`   | positional  |
//! | device     | `device_replacement`, `brand_replacement`, `model_replacement` | full-scan |
//!
//! A missing key means "no template" for that field, which is not the same as
//! an empty template.

use super::compiler::Compiler;
use super::facet::Template;
use super::matcher::Pattern;
use super::substitute::{MatchGroups, Positional, full_scan, unsupported_tokens};
use crate::error::Result;
use crate::{Device, Facet, Os, Rule, UserAgent};

fn replacement(rule: &Rule, key: &str) -> Option<String> {
    rule.get(key).cloned()
}

// --- OS -----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OsField {
    Family,
    Major,
    Minor,
    Patch,
    PatchMinor,
}

#[derive(Debug)]
pub(crate) struct OsTemplate {
    pattern: Pattern,
    family: Option<String>,
    major: Option<String>,
    minor: Option<String>,
    patch: Option<String>,
    patch_minor: Option<String>,
}

impl OsTemplate {
    /// Order in which the fields draw capture groups from the cursor.
    ///
    /// Left to right by default. Some rules pin the major version to `$1` (and
    /// possibly the minor version to `$2`) with the family group further right;
    /// the pinned fields then take the leading groups and the family follows
    /// directly after them. Only exact `"$1"` / `"$2"` templates trigger this.
    fn binding_order(&self) -> [OsField; 5] {
        use OsField::*;
        match (self.major.as_deref(), self.minor.as_deref()) {
            (Some("$1"), Some("$2")) => [Major, Minor, Family, Patch, PatchMinor],
            (Some("$1"), _) => [Major, Family, Minor, Patch, PatchMinor],
            _ => [Family, Major, Minor, Patch, PatchMinor],
        }
    }

    fn template(&self, field: OsField) -> Option<&str> {
        match field {
            OsField::Family => self.family.as_deref(),
            OsField::Major => self.major.as_deref(),
            OsField::Minor => self.minor.as_deref(),
            OsField::Patch => self.patch.as_deref(),
            OsField::PatchMinor => self.patch_minor.as_deref(),
        }
    }
}

impl Template for OsTemplate {
    type Output = Os;

    const FACET: Facet = Facet::Os;

    fn compile(compiler: &Compiler, index: usize, rule: &Rule) -> Result<Self> {
        Ok(OsTemplate {
            pattern: compiler.compile(Self::FACET, index, rule)?,
            family: replacement(rule, "os_replacement"),
            major: replacement(rule, "os_v1_replacement"),
            minor: replacement(rule, "os_v2_replacement"),
            patch: replacement(rule, "os_v3_replacement"),
            patch_minor: replacement(rule, "os_v4_replacement"),
        })
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn resolve(&self, groups: &MatchGroups<'_>, fallback_family: &str) -> Os {
        let mut cursor = Positional::new(groups);
        let mut os = Os::with_family(fallback_family);
        for field in self.binding_order() {
            let value = cursor.field(self.template(field));
            match field {
                OsField::Family => {
                    if let Some(family) = value {
                        os.family = family;
                    }
                }
                OsField::Major => os.major = value,
                OsField::Minor => os.minor = value,
                OsField::Patch => os.patch = value,
                OsField::PatchMinor => os.patch_minor = value,
            }
        }
        os
    }
}

// --- User agent ---------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct UserAgentTemplate {
    pattern: Pattern,
    family: Option<String>,
    major: Option<String>,
    minor: Option<String>,
    patch: Option<String>,
}

impl Template for UserAgentTemplate {
    type Output = UserAgent;

    const FACET: Facet = Facet::UserAgent;

    fn compile(compiler: &Compiler, index: usize, rule: &Rule) -> Result<Self> {
        Ok(UserAgentTemplate {
            pattern: compiler.compile(Self::FACET, index, rule)?,
            family: replacement(rule, "family_replacement"),
            major: replacement(rule, "v1_replacement"),
            minor: replacement(rule, "v2_replacement"),
            patch: replacement(rule, "v3_replacement"),
        })
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn resolve(&self, groups: &MatchGroups<'_>, fallback_family: &str) -> UserAgent {
        let mut cursor = Positional::new(groups);
        let family = cursor.field(self.family.as_deref()).unwrap_or_else(|| fallback_family.to_string());
        UserAgent {
            family,
            major: cursor.field(self.major.as_deref()),
            minor: cursor.field(self.minor.as_deref()),
            patch: cursor.field(self.patch.as_deref()),
        }
    }
}

// --- Device -------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct DeviceTemplate {
    pattern: Pattern,
    device: Option<String>,
    brand: Option<String>,
    model: Option<String>,
}

impl Template for DeviceTemplate {
    type Output = Device;

    const FACET: Facet = Facet::Device;

    fn compile(compiler: &Compiler, index: usize, rule: &Rule) -> Result<Self> {
        let template = DeviceTemplate {
            pattern: compiler.compile(Self::FACET, index, rule)?,
            device: replacement(rule, "device_replacement"),
            brand: replacement(rule, "brand_replacement"),
            model: replacement(rule, "model_replacement"),
        };

        for text in [&template.device, &template.brand, &template.model].into_iter().flatten() {
            for token in unsupported_tokens(text) {
                tracing::debug!(rule = index, template = %text, token, "replacement token outside $1..$9");
            }
        }
        Ok(template)
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Fields with a template are scanned independently; fields without one
    /// take the next raw group from a cursor only they advance.
    fn resolve(&self, groups: &MatchGroups<'_>, fallback_family: &str) -> Device {
        let mut cursor = Positional::new(groups);
        let mut resolve = |template: Option<&str>| match template {
            Some(template) => full_scan(groups, template),
            None => cursor.field(None),
        };

        let family = resolve(self.device.as_deref()).unwrap_or_else(|| fallback_family.to_string());
        let brand = resolve(self.brand.as_deref());
        let model = resolve(self.model.as_deref());
        Device { family, brand, model }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserOptions;
    use crate::engine::matcher::Attempt;

    fn rule(pairs: &[(&str, &str)]) -> Rule {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn run<T: Template>(pairs: &[(&str, &str)], input: &str) -> T::Output {
        let compiler = Compiler::new(&ParserOptions::default());
        let template = T::compile(&compiler, 0, &rule(pairs)).unwrap();
        match template.pattern().attempt(input) {
            Attempt::Matched(groups) => template.resolve(&groups, "Other"),
            other => panic!("expected {input:?} to match, got {other:?}"),
        }
    }

    #[test]
    fn user_agent_defaults_to_raw_groups() {
        let ua = run::<UserAgentTemplate>(&[("regex", r"(Foo)/(\d+)\.(\d+)")], "Foo/12.5");
        assert_eq!(ua, UserAgent {
            family: "Foo".into(),
            major: Some("12".into()),
            minor: Some("5".into()),
            patch: None
        });
    }

    #[test]
    fn user_agent_constant_family_still_consumes_group_one() {
        let ua = run::<UserAgentTemplate>(
            &[("regex", r"(Edge?)/(\d+)\.(\d+)"), ("family_replacement", "Edge")],
            "Edg/120.0",
        );
        assert_eq!(ua.family, "Edge");
        assert_eq!(ua.major.as_deref(), Some("120"));
        assert_eq!(ua.minor.as_deref(), Some("0"));

        // Without a dedicated family group the versions shift by one.
        let ua = run::<UserAgentTemplate>(&[("regex", r"Foo/(\d+)\.(\d+)"), ("family_replacement", "Foo")], "Foo/12.5");
        assert_eq!(ua.family, "Foo");
        assert_eq!(ua.major.as_deref(), Some("5"));
        assert_eq!(ua.minor, None);
    }

    #[test]
    fn user_agent_templates_substitute_their_own_token() {
        let ua = run::<UserAgentTemplate>(
            &[
                ("regex", r"(Chrome)/(\d+)\.(\d+)"),
                ("family_replacement", "$1 Mobile"),
                ("v1_replacement", "v$2"),
                ("v3_replacement", "beta"),
            ],
            "Chrome/99.1",
        );
        assert_eq!(ua.family, "Chrome Mobile");
        assert_eq!(ua.major.as_deref(), Some("v99"));
        assert_eq!(ua.minor.as_deref(), Some("1"));
        assert_eq!(ua.patch.as_deref(), Some("beta"));
    }

    #[test]
    fn user_agent_family_falls_back_when_empty() {
        let ua = run::<UserAgentTemplate>(&[("regex", r"(?:(Foo)|Bar)/(\d+)")], "Bar/3");
        assert_eq!(ua.family, "Other");
        assert_eq!(ua.major.as_deref(), Some("3"));
    }

    #[test]
    fn os_left_to_right_by_default() {
        let os = run::<OsTemplate>(&[("regex", r"(Android) (\d+)\.(\d+)\.(\d+)")], "Linux; Android 4.4.2; x");
        assert_eq!(os.family, "Android");
        assert_eq!(os.major.as_deref(), Some("4"));
        assert_eq!(os.minor.as_deref(), Some("4"));
        assert_eq!(os.patch.as_deref(), Some("2"));
        assert_eq!(os.patch_minor, None);
    }

    #[test]
    fn os_major_pinned_to_first_group() {
        let os = run::<OsTemplate>(
            &[("regex", r"(\d+)/(\w+) (\d+)"), ("os_v1_replacement", "$1")],
            "10/Darwin 3",
        );
        assert_eq!(os.major.as_deref(), Some("10"));
        assert_eq!(os.family, "Darwin");
        assert_eq!(os.minor.as_deref(), Some("3"));
    }

    #[test]
    fn os_major_and_minor_pinned() {
        let os = run::<OsTemplate>(
            &[("regex", r"(\d+)-(\d+)-(\w+)"), ("os_v1_replacement", "$1"), ("os_v2_replacement", "$2")],
            "7-1-Plan9",
        );
        assert_eq!(os.major.as_deref(), Some("7"));
        assert_eq!(os.minor.as_deref(), Some("1"));
        assert_eq!(os.family, "Plan9");
        assert_eq!(os.patch, None);
    }

    #[test]
    fn os_minor_pin_alone_does_not_reorder() {
        let os = run::<OsTemplate>(&[("regex", r"(\w+) (\d+)\.(\d+)"), ("os_v2_replacement", "$2")], "Foo 3.4");
        assert_eq!(os.family, "Foo");
        assert_eq!(os.major.as_deref(), Some("3"));
        // "$2" is not this field's token ("$3"), so it stays a constant.
        assert_eq!(os.minor.as_deref(), Some("$2"));
    }

    #[test]
    fn os_constants_without_groups() {
        let os = run::<OsTemplate>(
            &[("regex", r"Windows NT 10\.0"), ("os_replacement", "Windows"), ("os_v1_replacement", "10")],
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
        );
        assert_eq!(os, Os { major: Some("10".into()), ..Os::with_family("Windows") });
    }

    #[test]
    fn device_full_scan_combines_groups() {
        let device = run::<DeviceTemplate>(
            &[("regex", r"(\w+)/(\w+)"), ("device_replacement", "$1"), ("model_replacement", "$1 $2")],
            "Pixel/6",
        );
        assert_eq!(device.family, "Pixel");
        assert_eq!(device.model.as_deref(), Some("Pixel 6"));
        // Brand has no template and takes the first group from the cursor.
        assert_eq!(device.brand.as_deref(), Some("Pixel"));
    }

    #[test]
    fn device_template_less_fields_share_their_own_cursor() {
        let device = run::<DeviceTemplate>(&[("regex", r"(Nexus) (\d+)")], "Android; Nexus 5 Build");
        assert_eq!(device.family, "Nexus");
        assert_eq!(device.brand.as_deref(), Some("5"));
        assert_eq!(device.model, None);

        let device = run::<DeviceTemplate>(
            &[("regex", r"(Nexus) (\d+)"), ("device_replacement", "Google $1 $2"), ("brand_replacement", "Google")],
            "Android; Nexus 5 Build",
        );
        assert_eq!(device.family, "Google Nexus 5");
        assert_eq!(device.brand.as_deref(), Some("Google"));
        assert_eq!(device.model.as_deref(), Some("Nexus"));
    }

    #[test]
    fn device_missing_groups_become_empty() {
        let device = run::<DeviceTemplate>(
            &[("regex", r"(Foo)(?:-(\d+))?"), ("device_replacement", "$1 $2"), ("brand_replacement", "$2")],
            "Foo",
        );
        assert_eq!(device.family, "Foo");
        assert_eq!(device.brand, None);
    }
}
