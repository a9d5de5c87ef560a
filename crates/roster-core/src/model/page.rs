// ── Paged fetch types ──
//
// Cursor and Page describe one round-trip against the directory source.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Person;

/// Opaque resume token for the next page of results.
///
/// The token value is backend-specific and must be handed back verbatim;
/// absence of a cursor means "start from the beginning", and a page whose
/// `next` is absent means "no more pages".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// One fetch response: a window of people plus where to resume.
///
/// `people` may be empty — that is a defined "no new data" signal,
/// distinct from a fetch failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub people: Vec<Person>,
    pub next: Option<Cursor>,
}

impl Page {
    pub fn new(people: Vec<Person>, next: Option<Cursor>) -> Self {
        Self { people, next }
    }
}
