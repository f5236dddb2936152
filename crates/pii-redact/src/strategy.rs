//! Redaction strategies.

use crate::error::ConfigError;
use crate::hash::HashFunction;

/// How a matched value is replaced.
///
/// Strategies are deterministic: the same input always yields the same
/// output, which lets downstream consumers join and count redacted values.
/// New schemes are added as variants.
#[derive(Clone, PartialEq, Eq)]
pub enum RedactionStrategy {
    /// Replace the value with `hex(digest(value ++ salt))`.
    Pseudonymize {
        hash_function: HashFunction,
        salt: String,
    },
}

impl RedactionStrategy {
    /// Unsalted pseudonymization with the named hash function.
    pub fn pseudonymize(hash_function_name: &str) -> Result<Self, ConfigError> {
        let hash_function = HashFunction::from_name(hash_function_name).ok_or_else(|| {
            ConfigError::UnsupportedAlgorithm {
                name: hash_function_name.to_string(),
                supported: HashFunction::supported_names(),
            }
        })?;
        Ok(RedactionStrategy::Pseudonymize {
            hash_function,
            salt: String::new(),
        })
    }

    /// Replace the salt appended to every input before digesting.
    pub fn with_salt(self, salt: impl Into<String>) -> Self {
        match self {
            RedactionStrategy::Pseudonymize { hash_function, .. } => {
                RedactionStrategy::Pseudonymize {
                    hash_function,
                    salt: salt.into(),
                }
            }
        }
    }

    /// Compute the replacement for `input`.
    pub fn scramble(&self, input: &str) -> String {
        match self {
            RedactionStrategy::Pseudonymize {
                hash_function,
                salt,
            } => hash_function.hex_digest(&[input.as_bytes(), salt.as_bytes()]),
        }
    }

    /// Length of every value produced by [`scramble`](Self::scramble).
    pub fn digest_width(&self) -> usize {
        match self {
            RedactionStrategy::Pseudonymize { hash_function, .. } => hash_function.hex_width(),
        }
    }
}

// The salt is secret material and stays out of logs.
impl std::fmt::Debug for RedactionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedactionStrategy::Pseudonymize {
                hash_function,
                salt,
            } => f
                .debug_struct("Pseudonymize")
                .field("hash_function", hash_function)
                .field("salted", &!salt.is_empty())
                .finish(),
        }
    }
}

impl std::fmt::Display for RedactionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedactionStrategy::Pseudonymize {
                hash_function,
                salt,
            } if salt.is_empty() => write!(f, "pseudonymize({})", hash_function),
            RedactionStrategy::Pseudonymize { hash_function, .. } => {
                write!(f, "pseudonymize({}, salted)", hash_function)
            }
        }
    }
}
