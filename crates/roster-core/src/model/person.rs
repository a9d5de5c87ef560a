// ── Core identity types ──
//
// PersonId and Person form the foundation of the domain model.
// Directory backends serve either numeric ids or string handles;
// PersonId unifies both behind a single comparable, hashable type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── PersonId ────────────────────────────────────────────────────────

/// Canonical identifier for a directory entry.
///
/// Transparently wraps either a numeric id or a string handle,
/// whichever the backend serves. Consumers never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Num(u64),
    Text(String),
}

impl PersonId {
    pub fn as_num(&self) -> Option<u64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Num(_) => None,
        }
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for PersonId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<u64> for PersonId {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

// ── Person ──────────────────────────────────────────────────────────

/// One directory entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub display_name: String,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
