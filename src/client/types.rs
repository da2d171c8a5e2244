//! Request and response bodies of the Storyblok management API.
//!
//! Optional request fields are omitted from the JSON body when unset, so an
//! update never clears a value the configuration leaves alone.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;

/// A single field in a component schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    /// The field type tag, e.g. `text` or `bloks`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Position of the field in the editor.
    #[serde(default)]
    pub pos: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_settings: Option<Vec<ConditionalSettings>>,
    /// Every other field setting.
    #[serde(flatten)]
    pub attributes: FieldAttributes,
}

/// Plain field settings, passed through between state and the API unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_https: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_target_blank: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_folder_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customize_toolbar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_datasource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetypes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_content_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_link_scope: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_crop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_image_size: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_options: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_options: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_translate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_components: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_content_types: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_markdown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translatable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_uuid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_anchor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_group_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_tag_whitelist: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_link_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_advanced_search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_custom_attributes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_external_url: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_link_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_empty_option: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_from_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_from_overwrite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_label: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_reference_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
}

/// A selectable entry of an `option`/`options` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub name: String,
    pub value: String,
}

/// Rules that show, hide or require a field based on other fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifications: Option<Vec<Modification>>,
    /// `any` or `all`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_conditions: Option<Vec<RuleCondition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// `hide` or `show`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_object: Option<ValidatedObject>,
}

/// The field a rule condition looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_attr: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ValidatedObject {
    /// A condition on the value of another field, the only kind the API accepts.
    pub fn field_value(field_key: Option<String>) -> Self {
        Self {
            field_key,
            field_attr: Some("value".to_string()),
            kind: Some("field".to_string()),
        }
    }
}

// =========================================================================
// Components
// =========================================================================

/// A component as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Component {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub preview_tmpl: Option<String>,
    #[serde(default)]
    pub preview_field: Option<String>,
    #[serde(default)]
    pub is_root: Option<bool>,
    #[serde(default)]
    pub is_nestable: Option<bool>,
    #[serde(default)]
    pub component_group_uuid: Option<Uuid>,
    /// Fields in the order the API returned them.
    #[serde(default)]
    pub schema: IndexMap<String, FieldInput>,
}

impl Entity for Component {
    const NAME: &'static str = "component";
    const COLLECTION: &'static str = "components";
    const ENVELOPE: &'static str = "component";
}

/// Writable component attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentBase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_tmpl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_root: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_nestable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_group_uuid: Option<Uuid>,
    /// Fields sorted by position; the editor uses the JSON order.
    pub schema: IndexMap<String, FieldInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentCreateInput {
    pub component: ComponentBase,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentUpdateInput {
    pub component: ComponentBase,
}

// =========================================================================
// Component groups
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComponentGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub uuid: Uuid,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Entity for ComponentGroup {
    const NAME: &'static str = "component group";
    const COLLECTION: &'static str = "component_groups";
    const ENVELOPE: &'static str = "component_group";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentGroupBase {
    pub name: String,
}

/// Body of both the create and the update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentGroupInput {
    pub component_group: ComponentGroupBase,
}

// =========================================================================
// Space roles
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SpaceRole {
    pub id: i64,
    pub role: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub ext_id: Option<String>,
    #[serde(default)]
    pub allowed_languages: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_paths: Option<Vec<String>>,
    #[serde(default)]
    pub resolved_allowed_paths: Option<Vec<String>>,
    #[serde(default)]
    pub field_permissions: Option<Vec<String>>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub readonly_field_permissions: Option<Vec<String>>,
    #[serde(default)]
    pub branch_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub component_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub datasource_ids: Option<Vec<i64>>,
}

impl Entity for SpaceRole {
    const NAME: &'static str = "space role";
    const COLLECTION: &'static str = "space_roles";
    const ENVELOPE: &'static str = "space_role";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpaceRoleBase {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_allowed_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly_field_permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_ids: Option<Vec<i64>>,
}

/// Body of both the create and the update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpaceRoleInput {
    pub space_role: SpaceRoleBase,
}

// =========================================================================
// Asset folders
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetFolder {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl Entity for AssetFolder {
    const NAME: &'static str = "asset folder";
    const COLLECTION: &'static str = "asset_folders";
    const ENVELOPE: &'static str = "asset_folder";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetFolderBase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Body of both the create and the update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetFolderInput {
    pub asset_folder: AssetFolderBase,
}

// =========================================================================
// Webhooks
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub activated: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

impl Entity for Webhook {
    const NAME: &'static str = "webhook";
    const COLLECTION: &'static str = "webhook_endpoints";
    const ENVELOPE: &'static str = "webhook_endpoint";
}

/// Writable webhook attributes. The secret is always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookBase {
    pub name: String,
    pub endpoint: String,
    pub actions: Vec<String>,
    pub activated: bool,
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of both the create and the update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookInput {
    pub webhook_endpoint: WebhookBase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_input_omits_unset_attributes() {
        let field = FieldInput {
            kind: "text".to_string(),
            pos: 2,
            attributes: FieldAttributes {
                required: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"type": "text", "pos": 2, "required": true})
        );
    }

    #[test]
    fn test_component_keeps_remote_field_order() {
        let component: Component = serde_json::from_value(json!({
            "id": 1,
            "name": "banner",
            "schema": {
                "zeta": {"type": "text", "pos": 0},
                "alpha": {"type": "text", "pos": 1}
            }
        }))
        .unwrap();
        let names: Vec<_> = component.schema.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_validated_object_field_value() {
        let object = ValidatedObject::field_value(Some("title".to_string()));
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({"field_key": "title", "field_attr": "value", "type": "field"})
        );
    }

    #[test]
    fn test_webhook_input_always_sends_secret() {
        let input = WebhookInput {
            webhook_endpoint: WebhookBase {
                name: "deploy".to_string(),
                endpoint: "https://example.com/hook".to_string(),
                actions: vec!["story.published".to_string()],
                activated: true,
                secret: String::new(),
                description: None,
            },
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["webhook_endpoint"]["secret"], "");
        assert!(value["webhook_endpoint"].get("description").is_none());
    }
}
