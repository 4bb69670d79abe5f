use serde::{Deserialize, Serialize};

/// A single user-need record.
///
/// Needs belong to exactly one user group, sit in exactly one workflow
/// phase, and may reference any number of entities. The boolean-ish flags
/// are kept as `Option<bool>` because the wire format distinguishes a flag
/// that was never set from one set to `false`, and the refinement filter
/// treats both the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Need {
    pub id: String,
    pub user_group_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub entities: Vec<String>,
    pub workflow_phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers_state_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_feature: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
}

impl Need {
    /// Effective refinement status; an absent flag counts as unrefined.
    #[must_use]
    pub const fn is_refined(&self) -> bool {
        matches!(self.refined, Some(true))
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self.optional, Some(true))
    }

    #[must_use]
    pub const fn is_future_feature(&self) -> bool {
        matches!(self.future_feature, Some(true))
    }

    /// The `(from, to)` state pair, present only when this need actually
    /// triggers a state change and both endpoints are recorded.
    #[must_use]
    pub fn state_change(&self) -> Option<(&str, &str)> {
        if !matches!(self.triggers_state_change, Some(true)) {
            return None;
        }
        match (self.from_state.as_deref(), self.to_state.as_deref()) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// Whether this need references the given entity.
    #[must_use]
    pub fn uses_entity(&self, entity_id: &str) -> bool {
        self.entities.iter().any(|e| e == entity_id)
    }
}
