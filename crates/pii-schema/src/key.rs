//! Concrete schema identifiers.

use crate::error::SchemaParseError;
use crate::IGLU_PREFIX;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_SCHEMA_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:iglu:)?([a-zA-Z0-9._-]+)/([a-zA-Z0-9_-]+)/([a-zA-Z0-9_-]+)/([0-9]+)-([0-9]+)-([0-9]+)$",
    )
    .unwrap()
});

/// Three-part schema version: `model-revision-addition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaVer {
    /// Breaking changes.
    pub model: u32,
    /// Changes that may invalidate some historical data.
    pub revision: u32,
    /// Backwards-compatible additions.
    pub addition: u32,
}

impl SchemaVer {
    pub fn new(model: u32, revision: u32, addition: u32) -> Self {
        Self {
            model,
            revision,
            addition,
        }
    }
}

impl std::fmt::Display for SchemaVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.model, self.revision, self.addition)
    }
}

/// Identifier of a single schema, e.g. `iglu:com.acme/ua/jsonschema/1-0-0`.
///
/// The `iglu:` prefix is optional when parsing and always present when
/// formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaKey {
    pub vendor: String,
    pub name: String,
    pub format: String,
    pub version: SchemaVer,
}

impl SchemaKey {
    /// Create a schema key from its parts.
    pub fn new(vendor: &str, name: &str, format: &str, version: SchemaVer) -> Self {
        Self {
            vendor: vendor.to_string(),
            name: name.to_string(),
            format: format.to_string(),
            version,
        }
    }

    /// Parse a schema key from its string form.
    pub fn parse(s: &str) -> Result<Self, SchemaParseError> {
        let caps = RE_SCHEMA_KEY
            .captures(s)
            .ok_or_else(|| SchemaParseError::InvalidKey(s.to_string()))?;

        let version = SchemaVer {
            model: parse_version_part(s, &caps[4])?,
            revision: parse_version_part(s, &caps[5])?,
            addition: parse_version_part(s, &caps[6])?,
        };

        Ok(Self {
            vendor: caps[1].to_string(),
            name: caps[2].to_string(),
            format: caps[3].to_string(),
            version,
        })
    }

    /// Render the key as a URI-like string with the `iglu:` prefix.
    pub fn to_schema_uri(&self) -> String {
        self.to_string()
    }
}

/// Parse a single numeric version component.
pub(crate) fn parse_version_part(input: &str, part: &str) -> Result<u32, SchemaParseError> {
    part.parse::<u32>()
        .map_err(|_| SchemaParseError::VersionOutOfRange {
            input: input.to_string(),
            component: part.to_string(),
        })
}

impl std::str::FromStr for SchemaKey {
    type Err = SchemaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaKey::parse(s)
    }
}

impl TryFrom<String> for SchemaKey {
    type Error = SchemaParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SchemaKey::parse(&s)
    }
}

impl From<SchemaKey> for String {
    fn from(key: SchemaKey) -> Self {
        key.to_string()
    }
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}/{}/{}/{}",
            IGLU_PREFIX, self.vendor, self.name, self.format, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_prefix() {
        let key = SchemaKey::parse("iglu:com.acme/ua/jsonschema/1-0-2").unwrap();
        assert_eq!(key.vendor, "com.acme");
        assert_eq!(key.name, "ua");
        assert_eq!(key.format, "jsonschema");
        assert_eq!(key.version, SchemaVer::new(1, 0, 2));
    }

    #[test]
    fn test_parse_without_prefix() {
        let key = SchemaKey::parse("com.acme/ua/jsonschema/2-1-0").unwrap();
        assert_eq!(key.version, SchemaVer::new(2, 1, 0));
        assert_eq!(key.to_string(), "iglu:com.acme/ua/jsonschema/2-1-0");
    }

    #[test]
    fn test_parse_rejects_wildcards() {
        assert!(SchemaKey::parse("iglu:com.acme/ua/jsonschema/1-*-*").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "iglu:",
            "iglu:com.acme/ua/jsonschema",
            "iglu:com.acme/ua/jsonschema/1-0",
            "iglu:com acme/ua/jsonschema/1-0-0",
            "iglu:com.acme/u.a/jsonschema/1-0-0",
            "http://com.acme/ua/jsonschema/1-0-0",
        ] {
            assert!(SchemaKey::parse(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_version_overflow() {
        let err = SchemaKey::parse("iglu:com.acme/ua/jsonschema/99999999999-0-0").unwrap_err();
        assert!(matches!(err, SchemaParseError::VersionOutOfRange { .. }));
    }

    #[test]
    fn test_serde_as_string() {
        let key = SchemaKey::parse("iglu:com.acme/ua/jsonschema/1-0-0").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"iglu:com.acme/ua/jsonschema/1-0-0\"");

        let parsed: SchemaKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_version_ordering() {
        assert!(SchemaVer::new(1, 0, 1) > SchemaVer::new(1, 0, 0));
        assert!(SchemaVer::new(2, 0, 0) > SchemaVer::new(1, 9, 9));
    }
}
