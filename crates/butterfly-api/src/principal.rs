//! Principal handles.
//!
//! A principal is rendered as lowercase base32 text split into dash-separated
//! groups of five characters, the last group possibly shorter
//! (e.g. `rrkah-fqaaa-aaaaa-aaaaq-cai`). Validation is purely textual; the
//! checksum embedded in the first group is left to the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of a principal's text form.
pub const MAX_TEXT_LEN: usize = 63;

const GROUP_LEN: usize = 5;

/// Errors produced when parsing a principal from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    /// Nothing (or only whitespace) was supplied.
    #[error("principal text is empty")]
    Empty,
    /// Text exceeds [`MAX_TEXT_LEN`].
    #[error("principal text is too long ({0} > 63 characters)")]
    TooLong(usize),
    /// Text does not follow the grouped base32 layout.
    #[error("malformed principal text: {0}")]
    Malformed(String),
}

/// An authenticated principal's stable external handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Parse and validate a principal from its text form.
    ///
    /// Surrounding whitespace is ignored.
    pub fn from_text(text: &str) -> Result<Self, PrincipalError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PrincipalError::Empty);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(PrincipalError::TooLong(text.len()));
        }

        let groups: Vec<&str> = text.split('-').collect();
        let last = groups.len() - 1;
        for (i, group) in groups.iter().enumerate() {
            let len_ok = if i == last {
                (1..=GROUP_LEN).contains(&group.len())
            } else {
                group.len() == GROUP_LEN
            };
            if !len_ok || !group.bytes().all(is_base32_lower) {
                return Err(PrincipalError::Malformed(text.to_string()));
            }
        }

        Ok(Self(text.to_string()))
    }

    /// The canonical text form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `n` characters, for compact author labels.
    pub fn short(&self, n: usize) -> &str {
        match self.0.char_indices().nth(n) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

#[inline]
fn is_base32_lower(b: u8) -> bool {
    b.is_ascii_lowercase() || (b'2'..=b'7').contains(&b)
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = PrincipalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(&value)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
