//! Need-id allocation. Ids look like `AYK-001`: the owning group's
//! super-group prefix, a dash, and a zero-padded sequence number.

use crate::model::need::Need;
use serde::{Deserialize, Serialize};

/// The id a new need for some group should get, plus the prefix it was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextId {
    pub next_id: String,
    pub prefix: String,
}

/// Errors from resolving a group to its id prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NextIdError {
    /// No user-group record with the given id.
    #[error("user group '{0}' not found")]
    UnknownGroup(String),

    /// The group exists but has no super group to take a prefix from.
    #[error("user group '{0}' has no super group")]
    NoSuperGroup(String),

    /// The group names a super group with no record.
    #[error("super group '{0}' not found")]
    UnknownSuperGroup(String),
}

/// Next id in the `{prefix}-NNN` sequence given the needs that already
/// exist.
///
/// Only ids starting with `{prefix}-` participate; the segment between
/// the first and second dash must parse as a number or the id is skipped.
/// The sequence starts at 1 and the number is zero-padded to three
/// digits, growing wider past 999.
#[must_use]
pub fn next_in_sequence(prefix: &str, needs: &[Need]) -> String {
    let lead = format!("{prefix}-");
    let highest = needs
        .iter()
        .filter_map(|need| need.id.strip_prefix(&lead))
        .filter_map(|rest| rest.split('-').next())
        .filter_map(|digits| digits.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}-{:03}", highest + 1)
}
