use serde::{Deserialize, Serialize};

/// A user group. Every need names exactly one as its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the super group this group rolls up into, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_group: Option<String>,
}

/// A super group: a coarse bucket over user groups. `prefix` is the
/// uppercase code used when minting need ids (`AYK-001`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperGroup {
    pub id: String,
    pub name: String,
    pub prefix: String,
}

/// A domain entity that needs may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A workflow phase. `order` drives display sorting; ids are free-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPhase {
    pub id: String,
    pub name: String,
    pub order: i64,
}

#[cfg(test)]
mod tests {
    use super::{SuperGroup, UserGroup, WorkflowPhase};

    #[test]
    fn user_group_super_group_is_optional() {
        let json = r#"{"id": "admin", "name": "Administrators"}"#;
        let group: UserGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.super_group, None);

        let json = r#"{"id": "patient", "name": "Patients", "superGroup": "aykua"}"#;
        let group: UserGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.super_group.as_deref(), Some("aykua"));
    }

    #[test]
    fn super_group_carries_prefix() {
        let json = r#"{"id": "aykua", "name": "Aykua", "prefix": "AYK"}"#;
        let sg: SuperGroup = serde_json::from_str(json).unwrap();
        assert_eq!(sg.prefix, "AYK");
    }

    #[test]
    fn phase_order_round_trips() {
        let phase = WorkflowPhase {
            id: "intake".to_string(),
            name: "Intake".to_string(),
            order: 3,
        };
        let json = serde_json::to_string(&phase).unwrap();
        let back: WorkflowPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, phase);
    }
}
