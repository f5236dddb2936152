//! Digest algorithms used for pseudonymization.
//!
//! Every algorithm produces lowercase hex of a fixed width, so a redacted
//! value always has the same length regardless of the input.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_256};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_256,
    Blake3,
}

impl HashFunction {
    /// Every supported algorithm, in the order they are listed to operators.
    pub const ALL: [HashFunction; 8] = [
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Sha224,
        HashFunction::Sha256,
        HashFunction::Sha384,
        HashFunction::Sha512,
        HashFunction::Sha512_256,
        HashFunction::Blake3,
    ];

    /// Resolve an algorithm by name.
    ///
    /// Matching ignores case as well as `-` and `_`, so `SHA-256`,
    /// `sha256` and `SHA_256` are equivalent.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "MD5" => Some(HashFunction::Md5),
            "SHA1" => Some(HashFunction::Sha1),
            "SHA224" => Some(HashFunction::Sha224),
            "SHA256" => Some(HashFunction::Sha256),
            "SHA384" => Some(HashFunction::Sha384),
            "SHA512" => Some(HashFunction::Sha512),
            "SHA512/256" => Some(HashFunction::Sha512_256),
            "BLAKE3" => Some(HashFunction::Blake3),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::Md5 => "MD5",
            HashFunction::Sha1 => "SHA-1",
            HashFunction::Sha224 => "SHA-224",
            HashFunction::Sha256 => "SHA-256",
            HashFunction::Sha384 => "SHA-384",
            HashFunction::Sha512 => "SHA-512",
            HashFunction::Sha512_256 => "SHA-512/256",
            HashFunction::Blake3 => "BLAKE3",
        }
    }

    /// Comma-separated list of supported names, for error messages.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|h| h.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Digest size in bytes.
    pub fn output_bytes(&self) -> usize {
        match self {
            HashFunction::Md5 => 16,
            HashFunction::Sha1 => 20,
            HashFunction::Sha224 => 28,
            HashFunction::Sha256 | HashFunction::Sha512_256 | HashFunction::Blake3 => 32,
            HashFunction::Sha384 => 48,
            HashFunction::Sha512 => 64,
        }
    }

    /// Width of the hex encoding.
    pub fn hex_width(&self) -> usize {
        self.output_bytes() * 2
    }

    /// Digest the concatenation of `parts` and return lowercase hex.
    pub fn hex_digest(&self, parts: &[&[u8]]) -> String {
        match self {
            HashFunction::Md5 => digest_hex::<Md5>(parts),
            HashFunction::Sha1 => digest_hex::<Sha1>(parts),
            HashFunction::Sha224 => digest_hex::<Sha224>(parts),
            HashFunction::Sha256 => digest_hex::<Sha256>(parts),
            HashFunction::Sha384 => digest_hex::<Sha384>(parts),
            HashFunction::Sha512 => digest_hex::<Sha512>(parts),
            HashFunction::Sha512_256 => digest_hex::<Sha512_256>(parts),
            HashFunction::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                hex::encode(hasher.finalize().as_bytes())
            }
        }
    }
}

fn digest_hex<D: Digest>(parts: &[&[u8]]) -> String {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

impl std::str::FromStr for HashFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashFunction::from_name(s).ok_or_else(|| format!("unknown hash function: {}", s))
    }
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
