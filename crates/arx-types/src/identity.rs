use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum length of a digest rendered in hex (64 bits).
pub const MAX_DIGEST_HEX_LEN: usize = 16;

/// Content-addressed identifier for an article.
///
/// An `ArticleId` is the lowercase hex rendering of a 64-bit FNV-1a digest,
/// with no zero padding: a digest whose top nibbles are zero renders shorter
/// than 16 characters. The text form is the identity: it is the primary key
/// of the catalog and the stem of the payload file name, so it is kept
/// exactly as produced rather than re-padded.
///
/// Records loaded from an existing database are accepted with whatever id
/// text they carry; use [`ArticleId::parse`] when the input must be a
/// well-formed digest.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Wrap an id string without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Render a 64-bit digest value.
    pub fn from_digest(digest: u64) -> Self {
        Self(format!("{digest:x}"))
    }

    /// Parse a well-formed digest: 1 to 16 lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidDigest(s.to_string()));
        }
        if s.len() > MAX_DIGEST_HEX_LEN {
            return Err(TypeError::DigestTooLong {
                max: MAX_DIGEST_HEX_LEN,
                actual: s.len(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// The numeric digest, if this id is a well-formed digest.
    pub fn digest(&self) -> Result<u64, TypeError> {
        let parsed = Self::parse(&self.0)?;
        u64::from_str_radix(&parsed.0, 16).map_err(|_| TypeError::InvalidDigest(self.0.clone()))
    }

    /// Returns `true` if this id is a well-formed digest.
    pub fn is_digest(&self) -> bool {
        Self::parse(&self.0).is_ok()
    }

    /// The id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the id text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArticleId({})", self.0)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArticleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ArticleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
