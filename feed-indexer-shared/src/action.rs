//! Document action kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with a document when it reaches the backend.
///
/// The declaration order is a wire contract: delta-status columns reference
/// these variants by ordinal (`0 = Delete`, `1 = Update`, `2 = Index`), so
/// reordering the variants changes on-the-wire behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentAction {
    /// Remove the document from the index.
    Delete,
    /// Partially update an existing document.
    Update,
    /// Insert the document, replacing any document with the same id.
    Index,
}

impl DocumentAction {
    /// Resolve an action from its ordinal position.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Delete),
            1 => Some(Self::Update),
            2 => Some(Self::Index),
            _ => None,
        }
    }

    /// Resolve an action from a delta-status column value.
    ///
    /// The value is parsed as an integer and looked up by ordinal. Non-numeric
    /// or out-of-range values yield `None`; callers keep their current action
    /// in that case rather than raising an error.
    pub fn from_delta_status(value: &str) -> Option<Self> {
        value.trim().parse::<usize>().ok().and_then(Self::from_ordinal)
    }

    /// Resolve an action from its label.
    ///
    /// Labels are case-sensitive and must be one of `INDEX`, `UPDATE` or
    /// `DELETE`; anything else yields `None`.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "DELETE" => Some(Self::Delete),
            "UPDATE" => Some(Self::Update),
            "INDEX" => Some(Self::Index),
            _ => None,
        }
    }

    /// The canonical label for this action.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Index => "INDEX",
        }
    }
}

impl fmt::Display for DocumentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
