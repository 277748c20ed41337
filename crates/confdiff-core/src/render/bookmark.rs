//! Bookmark anchors, jump links and TOC entries.
//!
//! An anchor id combines a stable identifier (usually a GUID) with the row's
//! change status, so a link from a summary row lands on the detail row of the
//! same colour.

use crate::diff::ChangeStatus;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Normalize a bookmark identifier into an HTML id fragment
///
/// Braces around the identifier are stripped. Identifiers made only of ASCII
/// alphanumerics, `-` and `_` are lower-cased; anything else is replaced by
/// `bm-` and the first 16 hex characters of its SHA-256. Returns `None` for
/// an empty identifier.
pub fn normalize_identifier(identifier: &str) -> Option<String> {
    let trimmed = identifier
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Some(trimmed.to_ascii_lowercase());
    }

    let mut hasher = Sha256::new();
    hasher.update(trimmed.as_bytes());
    let digest = hex::encode(hasher.finalize());
    Some(format!("bm-{}", &digest[..16]))
}

/// Anchor id for `identifier` in `status`: `<identifier>-<status>`
pub fn anchor_id(identifier: &str, status: ChangeStatus) -> Option<String> {
    normalize_identifier(identifier).map(|ident| format!("{}-{}", ident, status.token()))
}

/// One table-of-contents line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub label: String,
    pub status: ChangeStatus,
}

/// Anchors and jump targets seen across a report
///
/// Duplicate anchors and jumps without a target are reported, not rejected:
/// the browser still opens the document, the link just goes nowhere.
#[derive(Debug, Clone, Default)]
pub struct BookmarkRegistry {
    anchors: HashSet<String>,
    jumps: Vec<String>,
}

impl BookmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anchor; false if it was already present
    pub fn add_anchor(&mut self, id: &str) -> bool {
        let fresh = self.anchors.insert(id.to_string());
        if !fresh {
            tracing::warn!(anchor = id, "duplicate bookmark anchor");
        }
        fresh
    }

    pub fn add_jump(&mut self, id: &str) {
        self.jumps.push(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.anchors.contains(id)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Jump targets with no matching anchor, deduplicated, in first-seen order
    pub fn dangling(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.jumps
            .iter()
            .filter(|id| !self.anchors.contains(*id) && seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}
