//! The catalog snapshot: every collection the backend serves, held as one
//! immutable in-memory document.
//!
//! This is the "offline" entry point. A snapshot is loaded once (or built
//! by hand in tests), and all selection, aggregation, and lookup work
//! happens against it without further I/O. Dangling references never
//! fail: lookups return `None` and the name helpers fall back to the raw
//! id so a half-consistent catalog still renders.

use crate::filter::NeedFilter;
use crate::id::{NextId, NextIdError, next_in_sequence};
use crate::model::need::Need;
use crate::model::reference::{Entity, SuperGroup, UserGroup, WorkflowPhase};
use crate::stats::Statistics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Errors from loading a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The file could not be read at all.
    #[error("failed to read snapshot {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid catalog document.
    #[error("failed to parse snapshot {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The complete catalog document.
///
/// Every collection defaults to empty so partial documents load;
/// `userSuperGroups` in particular is absent from older snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub user_groups: Vec<UserGroup>,
    pub user_super_groups: Vec<SuperGroup>,
    pub entities: Vec<Entity>,
    pub workflow_phases: Vec<WorkflowPhase>,
    pub user_needs: Vec<Need>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] when the file cannot be read and
    /// [`SnapshotError::Parse`] when its contents are not a valid
    /// catalog document.
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&raw).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            needs = snapshot.user_needs.len(),
            groups = snapshot.user_groups.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error when `raw` is not a valid
    /// catalog document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn user_group(&self, id: &str) -> Option<&UserGroup> {
        self.user_groups.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn super_group(&self, id: &str) -> Option<&SuperGroup> {
        self.user_super_groups.iter().find(|sg| sg.id == id)
    }

    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn workflow_phase(&self, id: &str) -> Option<&WorkflowPhase> {
        self.workflow_phases.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn need(&self, id: &str) -> Option<&Need> {
        self.user_needs.iter().find(|n| n.id == id)
    }

    /// Display name for a user group, or the raw id when no record exists.
    #[must_use]
    pub fn user_group_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.user_group(id).map_or(id, |g| g.name.as_str())
    }

    /// Display name for an entity, or the raw id when no record exists.
    #[must_use]
    pub fn entity_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.entity(id).map_or(id, |e| e.name.as_str())
    }

    /// Display name for a phase, or the raw id when no record exists.
    #[must_use]
    pub fn workflow_phase_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.workflow_phase(id).map_or(id, |p| p.name.as_str())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Phases in display order: ascending `order`, id as tiebreak.
    #[must_use]
    pub fn sorted_phases(&self) -> Vec<&WorkflowPhase> {
        let mut phases: Vec<&WorkflowPhase> = self.workflow_phases.iter().collect();
        phases.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        phases
    }

    /// Distinct super-group ids referenced by any group, sorted.
    #[must_use]
    pub fn super_groups_in_use(&self) -> Vec<&str> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for group in &self.user_groups {
            if let Some(sg) = group.super_group.as_deref() {
                seen.insert(sg);
            }
        }
        seen.into_iter().collect()
    }

    /// The needs this filter selects, in document order.
    #[must_use]
    pub fn select(&self, filter: &NeedFilter) -> Vec<&Need> {
        filter.select(&self.user_needs, &self.user_groups)
    }

    /// Tally all counts from the needs in this snapshot.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        Statistics::tally(&self.user_needs)
    }

    /// The id a need created for `group_id` should get.
    ///
    /// # Errors
    ///
    /// Fails when the group is unknown, has no super group, or names a
    /// super group with no record to take a prefix from.
    pub fn next_need_id(&self, group_id: &str) -> Result<NextId, NextIdError> {
        let group = self
            .user_group(group_id)
            .ok_or_else(|| NextIdError::UnknownGroup(group_id.to_string()))?;
        let super_id = group
            .super_group
            .as_deref()
            .ok_or_else(|| NextIdError::NoSuperGroup(group_id.to_string()))?;
        let super_group = self
            .super_group(super_id)
            .ok_or_else(|| NextIdError::UnknownSuperGroup(super_id.to_string()))?;
        Ok(NextId {
            next_id: next_in_sequence(&super_group.prefix, &self.user_needs),
            prefix: super_group.prefix.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::filter::NeedFilter;
    use crate::id::NextIdError;

    fn sample_snapshot() -> Snapshot {
        Snapshot::from_json(
            r#"{
                "userGroups": [
                    {"id": "patient", "name": "Patients", "superGroup": "aykua"},
                    {"id": "admin", "name": "Administrators", "superGroup": "aykua"},
                    {"id": "floating", "name": "Floating"}
                ],
                "userSuperGroups": [
                    {"id": "aykua", "name": "Aykua", "prefix": "AYK"}
                ],
                "entities": [
                    {"id": "appointment", "name": "Appointment"},
                    {"id": "record", "name": "Medical Record"}
                ],
                "workflowPhases": [
                    {"id": "visit", "name": "Visit", "order": 2},
                    {"id": "intake", "name": "Intake", "order": 1},
                    {"id": "billing", "name": "Billing", "order": 2}
                ],
                "userNeeds": [
                    {
                        "id": "AYK-001",
                        "userGroupId": "patient",
                        "title": "Book an appointment",
                        "description": "",
                        "entities": ["appointment"],
                        "workflowPhase": "intake",
                        "refined": true
                    },
                    {
                        "id": "AYK-002",
                        "userGroupId": "admin",
                        "title": "Audit records",
                        "description": "",
                        "entities": ["record", "appointment"],
                        "workflowPhase": "visit"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot = Snapshot::from_json(r#"{"userGroups": [], "userNeeds": []}"#).unwrap();
        assert!(snapshot.user_super_groups.is_empty());
        assert!(snapshot.entities.is_empty());
        assert!(snapshot.workflow_phases.is_empty());
    }

    #[test]
    fn name_helpers_fall_back_to_raw_ids() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.user_group_name("patient"), "Patients");
        assert_eq!(snapshot.user_group_name("ghost-group"), "ghost-group");
        assert_eq!(snapshot.entity_name("record"), "Medical Record");
        assert_eq!(snapshot.entity_name("unlisted"), "unlisted");
        assert_eq!(snapshot.workflow_phase_name("intake"), "Intake");
        assert_eq!(snapshot.workflow_phase_name("limbo"), "limbo");
    }

    #[test]
    fn phases_sort_by_order_then_id() {
        let snapshot = sample_snapshot();
        let ids: Vec<&str> = snapshot.sorted_phases().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["intake", "billing", "visit"]);
    }

    #[test]
    fn super_groups_in_use_are_distinct_and_sorted() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.super_groups_in_use(), vec!["aykua"]);
    }

    #[test]
    fn select_applies_the_filter_against_snapshot_groups() {
        let snapshot = sample_snapshot();
        let selected = snapshot.select(&NeedFilter::for_super_group("aykua"));
        assert_eq!(selected.len(), 2);
        let selected = snapshot.select(&NeedFilter::for_entity("record"));
        assert_eq!(selected[0].id, "AYK-002");
    }

    #[test]
    fn statistics_tally_matches_document_contents() {
        let stats = sample_snapshot().statistics();
        assert_eq!(stats.total_needs, 2);
        assert_eq!(stats.by_entity.get("appointment"), Some(&2));
    }

    #[test]
    fn next_need_id_resolves_through_the_super_group() {
        let snapshot = sample_snapshot();
        let next = snapshot.next_need_id("patient").unwrap();
        assert_eq!(next.next_id, "AYK-003");
        assert_eq!(next.prefix, "AYK");
    }

    #[test]
    fn next_need_id_error_paths() {
        let snapshot = sample_snapshot();
        assert_eq!(
            snapshot.next_need_id("ghost"),
            Err(NextIdError::UnknownGroup("ghost".to_string()))
        );
        assert_eq!(
            snapshot.next_need_id("floating"),
            Err(NextIdError::NoSuperGroup("floating".to_string()))
        );

        let mut without_registry = snapshot;
        without_registry.user_super_groups.clear();
        assert_eq!(
            without_registry.next_need_id("patient"),
            Err(NextIdError::UnknownSuperGroup("aykua".to_string()))
        );
    }

    #[test]
    fn from_path_reports_missing_file_with_path() {
        let err = Snapshot::from_path(std::path::Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(err.to_string().contains("not/here.json"));
    }
}
