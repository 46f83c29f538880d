//! Convenience types shared by the service contract and the resources.

use serde::{Deserialize, Serialize};

/// One attribute that differs between prior and planned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute or nested block name, e.g. `labels` or `units`.
    pub path: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

impl AttributeChange {
    pub fn new(
        path: impl Into<String>,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }

    /// Set where it was null.
    pub fn added(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// Cleared where it was set.
    pub fn removed(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, Some(value), None)
    }

    pub fn modified(
        path: impl Into<String>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

/// Planned state plus the changes that lead to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// State after apply. Computed attributes not yet known hold the
    /// unknown sentinel.
    pub planned_state: serde_json::Value,
    pub changes: Vec<AttributeChange>,
    /// An identity attribute changed; the entity must be recreated.
    pub requires_replace: bool,
}

impl PlanResult {
    /// Nothing to apply; also used for destroy plans.
    pub fn no_change(state: serde_json::Value) -> Self {
        Self {
            planned_state: state,
            changes: Vec::new(),
            requires_replace: false,
        }
    }

    pub fn with_changes(
        planned_state: serde_json::Value,
        changes: Vec<AttributeChange>,
        requires_replace: bool,
    ) -> Self {
        Self {
            planned_state,
            changes,
            requires_replace,
        }
    }
}

/// State produced by importing an existing Akeneo entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    pub resource_type: String,
    /// Identity fields only; a read fills in the rest.
    pub state: serde_json::Value,
}

impl ImportedResource {
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata returned by `get_metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// Crate version of the provider binary.
    pub version: String,
    /// Registered `akeneo_*` type names, sorted.
    pub resources: Vec<String>,
}

/// Version of the line protocol announced in the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// First field of the handshake line printed on stdout.
pub const HANDSHAKE_PREFIX: &str = "AKENEO_PROVIDER";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_change_constructors() {
        let added = AttributeChange::added("code", serde_json::json!("color"));
        assert!(added.before.is_none());
        assert_eq!(added.after, Some(serde_json::json!("color")));

        let removed = AttributeChange::removed("group", serde_json::json!("marketing"));
        assert_eq!(removed.before, Some(serde_json::json!("marketing")));
        assert!(removed.after.is_none());

        let modified =
            AttributeChange::modified("sort_order", serde_json::json!(1), serde_json::json!(2));
        assert_eq!(modified.before, Some(serde_json::json!(1)));
        assert_eq!(modified.after, Some(serde_json::json!(2)));
    }

    #[test]
    fn test_plan_result() {
        let no_change = PlanResult::no_change(serde_json::json!({"code": "color"}));
        assert!(no_change.changes.is_empty());
        assert!(!no_change.requires_replace);

        let with_changes = PlanResult::with_changes(
            serde_json::json!({"code": "colour"}),
            vec![AttributeChange::modified(
                "code",
                serde_json::json!("color"),
                serde_json::json!("colour"),
            )],
            true,
        );
        assert_eq!(with_changes.changes.len(), 1);
        assert!(with_changes.requires_replace);
    }

    #[test]
    fn test_imported_resource() {
        let imported =
            ImportedResource::new("akeneo_attribute", serde_json::json!({"code": "color"}));
        assert_eq!(imported.resource_type, "akeneo_attribute");
        assert_eq!(imported.state["code"], "color");
    }

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, 1);
        assert_eq!(HANDSHAKE_PREFIX, "AKENEO_PROVIDER");
    }
}
