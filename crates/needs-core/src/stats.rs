//! Statistics aggregation: the upstream counts payload, the local
//! super-group rollup, and the ranked bucket views every chart renders
//! from.
//!
//! Upstream counts are passed through untouched. The only derived figure
//! is the super-group rollup, which is a pure function of the user-group
//! counts and the group records handed in.

use crate::model::need::Need;
use crate::model::reference::UserGroup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket used when a user-group count cannot be attributed to any super
/// group (missing group record, or a record with no super group).
pub const UNKNOWN_SUPER_GROUP: &str = "Unknown";

/// Canonical truncation for the entity view: only the busiest entities
/// are shown.
pub const TOP_ENTITIES: usize = 10;

/// Aggregate counts for the whole catalog, as served by the backend.
///
/// `by_super_group` is deliberately absent: the backend does not compute
/// it, and consumers derive it locally with [`rollup_by_super_group`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_needs: usize,
    pub by_user_group: HashMap<String, usize>,
    pub by_workflow_phase: HashMap<String, usize>,
    pub by_entity: HashMap<String, usize>,
}

impl Statistics {
    /// Recompute every count from scratch over a need list.
    ///
    /// This is the offline path for callers that hold the needs
    /// themselves. Each need contributes one count to its group and its
    /// phase, and one count per entity it references, so a need touching
    /// three entities shows up three times in `by_entity`. Keys are taken
    /// from the needs verbatim; nothing is validated against reference
    /// lists.
    #[must_use]
    pub fn tally(needs: &[Need]) -> Self {
        let mut stats = Self {
            total_needs: needs.len(),
            ..Self::default()
        };
        for need in needs {
            *stats
                .by_user_group
                .entry(need.user_group_id.clone())
                .or_insert(0) += 1;
            *stats
                .by_workflow_phase
                .entry(need.workflow_phase.clone())
                .or_insert(0) += 1;
            for entity in &need.entities {
                *stats.by_entity.entry(entity.clone()).or_insert(0) += 1;
            }
        }
        stats
    }
}

/// Roll user-group counts up into super-group buckets.
///
/// Each `(group_id, count)` entry lands under the owning group's
/// `super_group` value, taken as-is, or under [`UNKNOWN_SUPER_GROUP`] when
/// the group record is missing or carries no super group. The sum over
/// the result always equals the sum over the input; no other field of the
/// group records influences the outcome.
#[must_use]
pub fn rollup_by_super_group(
    by_user_group: &HashMap<String, usize>,
    groups: &[UserGroup],
) -> HashMap<String, usize> {
    let mut rollup: HashMap<String, usize> = HashMap::new();
    for (group_id, count) in by_user_group {
        let bucket = groups
            .iter()
            .find(|g| g.id == *group_id)
            .and_then(|g| g.super_group.as_deref())
            .unwrap_or(UNKNOWN_SUPER_GROUP);
        *rollup.entry(bucket.to_string()).or_insert(0) += *count;
    }
    rollup
}

// ---------------------------------------------------------------------------
// Ranked bucket views
// ---------------------------------------------------------------------------

/// One row of a rendered bucket view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRow {
    pub key: String,
    pub label: String,
    pub count: usize,
    /// Bar geometry as a percentage of the catalog total.
    pub width_pct: f64,
}

/// Rank a count map descending by count.
///
/// Ties break on ascending key so equal-count buckets render in the same
/// order on every run.
#[must_use]
pub fn ranked(counts: &HashMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> =
        counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Build the display rows for one chart: ranked buckets with labels and
/// bar geometry, truncated to `limit` when given.
///
/// All four dashboard charts are instances of this one function; only the
/// count map, the label resolution, and the truncation differ.
pub fn bucket_view<F>(
    counts: &HashMap<String, usize>,
    total: usize,
    label: F,
    limit: Option<usize>,
) -> Vec<BucketRow>
where
    F: Fn(&str) -> String,
{
    let mut rows: Vec<BucketRow> = ranked(counts)
        .into_iter()
        .map(|(key, count)| BucketRow {
            key: key.to_string(),
            label: label(key),
            count,
            width_pct: bar_width_pct(count, total),
        })
        .collect();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Bar width as a percentage of `total`. An empty catalog yields `0.0`
/// for every bucket rather than a division by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn bar_width_pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Human label for a super-group id: underscore-separated segments with
/// their first character uppercased, joined by spaces.
///
/// `medical_services_user` becomes `Medical Services User`; ids without
/// underscores, including the `Unknown` sentinel, pass through with only
/// the leading character uppercased.
#[must_use]
pub fn format_super_group_label(raw: &str) -> String {
    raw.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
