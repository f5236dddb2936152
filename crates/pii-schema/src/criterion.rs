//! Schema criteria: patterns over families of schema keys.

use crate::error::SchemaParseError;
use crate::key::{parse_version_part, SchemaKey};
use crate::IGLU_PREFIX;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_SCHEMA_CRITERION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:iglu:)?([a-zA-Z0-9._-]+)/([a-zA-Z0-9_-]+)/([a-zA-Z0-9_-]+)/([0-9]+|\*)-([0-9]+|\*)-([0-9]+|\*)$",
    )
    .unwrap()
});

/// Pattern matching a family of schemas.
///
/// Vendor, name and format must match exactly. Each version component is
/// either an exact number or a wildcard (`None`, written `*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaCriterion {
    pub vendor: String,
    pub name: String,
    pub format: String,
    pub model: Option<u32>,
    pub revision: Option<u32>,
    pub addition: Option<u32>,
}

impl SchemaCriterion {
    /// Criterion pinned to a model, any revision and addition.
    pub fn new(vendor: &str, name: &str, format: &str, model: u32) -> Self {
        Self {
            vendor: vendor.to_string(),
            name: name.to_string(),
            format: format.to_string(),
            model: Some(model),
            revision: None,
            addition: None,
        }
    }

    /// Pin the revision.
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Pin the addition.
    pub fn with_addition(mut self, addition: u32) -> Self {
        self.addition = Some(addition);
        self
    }

    /// Parse a criterion such as `iglu:com.acme/ua/jsonschema/1-*-*`.
    pub fn parse(s: &str) -> Result<Self, SchemaParseError> {
        let caps = RE_SCHEMA_CRITERION
            .captures(s)
            .ok_or_else(|| SchemaParseError::InvalidCriterion(s.to_string()))?;

        Ok(Self {
            vendor: caps[1].to_string(),
            name: caps[2].to_string(),
            format: caps[3].to_string(),
            model: parse_wildcard(s, &caps[4])?,
            revision: parse_wildcard(s, &caps[5])?,
            addition: parse_wildcard(s, &caps[6])?,
        })
    }

    /// Whether the given key belongs to this family.
    pub fn matches(&self, key: &SchemaKey) -> bool {
        self.vendor == key.vendor
            && self.name == key.name
            && self.format == key.format
            && part_matches(self.model, key.version.model)
            && part_matches(self.revision, key.version.revision)
            && part_matches(self.addition, key.version.addition)
    }

    /// Parse `schema` as a key and match it. Unparseable keys never match.
    pub fn matches_str(&self, schema: &str) -> bool {
        SchemaKey::parse(schema)
            .map(|key| self.matches(&key))
            .unwrap_or(false)
    }
}

fn parse_wildcard(input: &str, part: &str) -> Result<Option<u32>, SchemaParseError> {
    if part == "*" {
        Ok(None)
    } else {
        parse_version_part(input, part).map(Some)
    }
}

fn part_matches(expected: Option<u32>, actual: u32) -> bool {
    expected.map_or(true, |e| e == actual)
}

fn fmt_part(part: Option<u32>) -> String {
    part.map_or_else(|| "*".to_string(), |p| p.to_string())
}

impl std::str::FromStr for SchemaCriterion {
    type Err = SchemaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaCriterion::parse(s)
    }
}

impl TryFrom<String> for SchemaCriterion {
    type Error = SchemaParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SchemaCriterion::parse(&s)
    }
}

impl From<SchemaCriterion> for String {
    fn from(criterion: SchemaCriterion) -> Self {
        criterion.to_string()
    }
}

impl std::fmt::Display for SchemaCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}/{}/{}/{}-{}-{}",
            IGLU_PREFIX,
            self.vendor,
            self.name,
            self.format,
            fmt_part(self.model),
            fmt_part(self.revision),
            fmt_part(self.addition)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaVer;

    fn key(s: &str) -> SchemaKey {
        SchemaKey::parse(s).unwrap()
    }

    #[test]
    fn test_parse_wildcards() {
        let c = SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/1-*-*").unwrap();
        assert_eq!(c.model, Some(1));
        assert_eq!(c.revision, None);
        assert_eq!(c.addition, None);
        assert_eq!(c.to_string(), "iglu:com.acme/ua/jsonschema/1-*-*");
    }

    #[test]
    fn test_parse_exact() {
        let c = SchemaCriterion::parse("com.acme/ua/jsonschema/1-0-2").unwrap();
        assert_eq!(c, SchemaCriterion::new("com.acme", "ua", "jsonschema", 1)
            .with_revision(0)
            .with_addition(2));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "not a criterion",
            "iglu:com.acme/ua/jsonschema",
            "iglu:com.acme/ua/jsonschema/1-*",
            "iglu:com.acme/ua/jsonschema/x-*-*",
            "iglu:com.acme/ua/jsonschema/1-**-*",
        ] {
            assert!(SchemaCriterion::parse(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_matches_family() {
        let c = SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/1-*-*").unwrap();
        assert!(c.matches(&key("iglu:com.acme/ua/jsonschema/1-0-0")));
        assert!(c.matches(&key("iglu:com.acme/ua/jsonschema/1-4-7")));
        assert!(!c.matches(&key("iglu:com.acme/ua/jsonschema/2-0-0")));
        assert!(!c.matches(&key("iglu:com.acme/other/jsonschema/1-0-0")));
        assert!(!c.matches(&key("iglu:com.other/ua/jsonschema/1-0-0")));
        assert!(!c.matches(&key("iglu:com.acme/ua/avro/1-0-0")));
    }

    #[test]
    fn test_matches_pinned_revision() {
        let c = SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/1-2-*").unwrap();
        assert!(c.matches(&key("iglu:com.acme/ua/jsonschema/1-2-9")));
        assert!(!c.matches(&key("iglu:com.acme/ua/jsonschema/1-3-0")));
    }

    #[test]
    fn test_full_wildcard() {
        let c = SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/*-*-*").unwrap();
        let mut k = key("iglu:com.acme/ua/jsonschema/1-0-0");
        k.version = SchemaVer::new(17, 3, 1);
        assert!(c.matches(&k));
    }

    #[test]
    fn test_matches_str_treats_garbage_as_no_match() {
        let c = SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/1-*-*").unwrap();
        assert!(c.matches_str("iglu:com.acme/ua/jsonschema/1-0-0"));
        assert!(!c.matches_str("garbage"));
        assert!(!c.matches_str(""));
    }
}
