//! Result types shared by the provider operations.

use serde::{Deserialize, Serialize};

/// A change to a single attribute during a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// The path to the attribute that changed.
    pub path: String,
    /// The value before the change (None if creating).
    pub before: Option<serde_json::Value>,
    /// The value after the change (None if deleting).
    pub after: Option<serde_json::Value>,
}

impl AttributeChange {
    /// Create a new attribute change.
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

    /// A change for a new attribute.
    pub fn added(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// A change for a removed attribute.
    pub fn removed(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, Some(value), None)
    }

    /// A change for a modified attribute.
    pub fn modified(
        path: impl Into<String>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

/// The result of a plan operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// The planned state after the operation.
    pub planned_state: serde_json::Value,
    /// The list of attribute changes.
    pub changes: Vec<AttributeChange>,
    /// Whether the resource requires replacement.
    pub requires_replace: bool,
}

impl PlanResult {
    /// A plan result with no changes.
    pub fn no_change(state: serde_json::Value) -> Self {
        Self::with_changes(state, Vec::new(), false)
    }

    /// A plan result with changes.
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

/// A Storyblok entity brought under management by an import.
///
/// Imports take the composite `"<space_id>/<resource_id>"` token. The state is
/// what a read of that entity returns, so it carries the token as `id` plus the
/// split-out space and entity ids.
///
/// ```
/// use serde_json::json;
/// use storyblok_provider::ImportedResource;
///
/// let imported = ImportedResource::new(
///     "storyblok_component",
///     json!({"id": "233252/456", "space_id": 233252, "component_id": 456, "name": "banner"}),
/// );
/// assert_eq!(imported.resource_type, "storyblok_component");
/// assert_eq!(imported.state["space_id"], 233252);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// One of the `storyblok_*` resource type names.
    pub resource_type: String,
    /// The state read back from the management API.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// What the provider tells the host about itself.
///
/// For the Storyblok provider `resources` is the sorted list of the five
/// managed kinds, from `storyblok_asset_folder` to `storyblok_webhook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// Sorted resource type names.
    pub resources: Vec<String>,
    /// Optional protocol features.
    pub capabilities: ServerCapabilities,
}

/// Optional protocol features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// Destroy plans are computed, so a delete shows up as a plan before it
    /// reaches the management API.
    pub plan_destroy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_change_constructors() {
        let added = AttributeChange::added("name", json!("hero"));
        assert!(added.before.is_none());
        assert_eq!(added.after, Some(json!("hero")));

        let removed = AttributeChange::removed("name", json!("old"));
        assert_eq!(removed.before, Some(json!("old")));
        assert!(removed.after.is_none());

        let modified = AttributeChange::modified("parent_id", json!(1), json!(2));
        assert_eq!(modified.before, Some(json!(1)));
        assert_eq!(modified.after, Some(json!(2)));
    }

    #[test]
    fn test_plan_result() {
        let no_change = PlanResult::no_change(json!({"id": "1/2"}));
        assert!(no_change.changes.is_empty());
        assert!(!no_change.requires_replace);

        let with_changes = PlanResult::with_changes(
            json!({"id": "1/2", "name": "new"}),
            vec![AttributeChange::modified("name", json!("old"), json!("new"))],
            false,
        );
        assert_eq!(with_changes.changes.len(), 1);
    }

    #[test]
    fn test_provider_metadata_wire_shape() {
        let metadata = ProviderMetadata {
            resources: vec![
                "storyblok_asset_folder".to_string(),
                "storyblok_webhook".to_string(),
            ],
            capabilities: ServerCapabilities { plan_destroy: true },
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({
                "resources": ["storyblok_asset_folder", "storyblok_webhook"],
                "capabilities": {"plan_destroy": true}
            })
        );
        assert!(!ProviderMetadata::default().capabilities.plan_destroy);
    }

    #[test]
    fn test_imported_resource() {
        let imported = ImportedResource::new("storyblok_webhook", json!({"id": "1/2"}));
        assert_eq!(imported.resource_type, "storyblok_webhook");
        assert_eq!(imported.state["id"], "1/2");
    }
}
