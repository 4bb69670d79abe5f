//! The five-dimension filter model shared by every view of the catalog.
//!
//! A [`NeedFilter`] is a complete selection state: four id dimensions plus
//! a refinement dimension, combined with AND semantics. The empty string
//! means "dimension inactive", mirroring the query parameters the backing
//! API accepts. Chart drill-ins build whole replacement states via the
//! `for_*` constructors rather than mutating individual dimensions.

use crate::model::need::Need;
use crate::model::reference::UserGroup;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The refinement-status dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefinedFilter {
    /// No constraint on refinement status.
    #[default]
    All,
    /// Only needs explicitly marked refined.
    Refined,
    /// Needs not marked refined, including those with no flag at all.
    NeedsRefinement,
}

impl RefinedFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Refined => "refined",
            Self::NeedsRefinement => "needsRefinement",
        }
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a need with the given effective refinement status passes.
    #[must_use]
    pub const fn accepts(self, refined: bool) -> bool {
        match self {
            Self::All => true,
            Self::Refined => refined,
            Self::NeedsRefinement => !refined,
        }
    }
}

impl fmt::Display for RefinedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for RefinedFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "refined" => Ok(Self::Refined),
            "needsrefinement" | "needs-refinement" | "needs_refinement" => {
                Ok(Self::NeedsRefinement)
            }
            _ => Err(ParseEnumError {
                expected: "refined filter (all, refined, needsRefinement)",
                got: s.to_string(),
            }),
        }
    }
}

/// A complete filter state over the catalog.
///
/// Dimensions are AND-ed: a need is selected only when every active
/// dimension accepts it. An id that matches no record is legal and simply
/// selects nothing for that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NeedFilter {
    /// Owning user group id; empty when inactive.
    pub user_group_id: String,
    /// Referenced entity id; empty when inactive.
    pub entity: String,
    /// Workflow phase id; empty when inactive.
    pub workflow_phase: String,
    /// Super group id, matched through the owning group; empty when inactive.
    pub super_group: String,
    pub refined: RefinedFilter,
}

impl NeedFilter {
    /// Replacement state selecting one user group and nothing else.
    #[must_use]
    pub fn for_user_group(id: impl Into<String>) -> Self {
        Self {
            user_group_id: id.into(),
            ..Self::default()
        }
    }

    /// Replacement state selecting one super group and nothing else.
    #[must_use]
    pub fn for_super_group(id: impl Into<String>) -> Self {
        Self {
            super_group: id.into(),
            ..Self::default()
        }
    }

    /// Replacement state selecting one entity and nothing else.
    #[must_use]
    pub fn for_entity(id: impl Into<String>) -> Self {
        Self {
            entity: id.into(),
            ..Self::default()
        }
    }

    /// Replacement state selecting one workflow phase and nothing else.
    #[must_use]
    pub fn for_workflow_phase(id: impl Into<String>) -> Self {
        Self {
            workflow_phase: id.into(),
            ..Self::default()
        }
    }

    /// Whether every dimension sits at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.user_group_id.is_empty()
            && self.entity.is_empty()
            && self.workflow_phase.is_empty()
            && self.super_group.is_empty()
            && self.refined.is_default()
    }

    /// Whether at least one dimension constrains the selection.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_default()
    }

    /// Restore the canonical default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Does `need` satisfy every active dimension?
    ///
    /// `groups` supplies the group records needed to resolve the
    /// super-group dimension; needs owned by a group that has no record,
    /// or whose record carries no super group, never match an active
    /// super-group constraint.
    #[must_use]
    pub fn matches(&self, need: &Need, groups: &[UserGroup]) -> bool {
        if !self.user_group_id.is_empty() && need.user_group_id != self.user_group_id {
            return false;
        }
        if !self.workflow_phase.is_empty() && need.workflow_phase != self.workflow_phase {
            return false;
        }
        if !self.entity.is_empty() && !need.uses_entity(&self.entity) {
            return false;
        }
        if !self.super_group.is_empty() {
            let owner_super = groups
                .iter()
                .find(|g| g.id == need.user_group_id)
                .and_then(|g| g.super_group.as_deref());
            if owner_super != Some(self.super_group.as_str()) {
                return false;
            }
        }
        self.refined.accepts(need.is_refined())
    }

    /// The subset of `needs` this filter selects, in input order.
    #[must_use]
    pub fn select<'a>(&self, needs: &'a [Need], groups: &[UserGroup]) -> Vec<&'a Need> {
        needs.iter().filter(|n| self.matches(n, groups)).collect()
    }

    /// The query parameters the backing API would receive for this state.
    ///
    /// Pairs appear in a fixed order and default-valued dimensions are
    /// omitted entirely, so the all-default filter produces no parameters.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.user_group_id.is_empty() {
            params.push(("userGroupId", self.user_group_id.clone()));
        }
        if !self.entity.is_empty() {
            params.push(("entity", self.entity.clone()));
        }
        if !self.workflow_phase.is_empty() {
            params.push(("workflowPhase", self.workflow_phase.clone()));
        }
        if !self.super_group.is_empty() {
            params.push(("superGroup", self.super_group.clone()));
        }
        if !self.refined.is_default() {
            params.push(("refined", self.refined.as_str().to_string()));
        }
        params
    }
}
