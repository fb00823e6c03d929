//! Board identifiers derived from Jira page URLs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Prefix for per-board storage keys.
pub const STORAGE_KEY_PREFIX: &str = "board:";

/// Board identifier errors.
#[derive(Debug, Error)]
pub enum BoardIdError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Stable identifier for a Jira board, e.g. `board-123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the board identifier for a page URL.
    ///
    /// Jira Cloud boards (`/boards/123`) and Jira Server boards
    /// (`rapidView=123`) map to `board-123`. Anything else falls back to
    /// the path with non-alphanumerics replaced by `-`.
    pub fn from_url(page_url: &str) -> Result<Self, BoardIdError> {
        let url = Url::parse(page_url)?;
        let href = url.as_str();

        if let Some(id) = digits_after(href, "/boards/") {
            return Ok(Self(format!("board-{}", id)));
        }
        if let Some(id) = digits_after(href, "rapidView=") {
            return Ok(Self(format!("board-{}", id)));
        }

        let path: String = url
            .path()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        Ok(Self(format!("board-{}", path)))
    }

    /// Reconstruct an identifier from its storage key.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(STORAGE_KEY_PREFIX).map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key this board's data is stored under.
    pub fn storage_key(&self) -> String {
        format!("{}{}", STORAGE_KEY_PREFIX, self.0)
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Leading digits following the first occurrence of `marker` that has any.
fn digits_after<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    haystack.match_indices(marker).find_map(|(pos, _)| {
        let rest = &haystack[pos + marker.len()..];
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}
