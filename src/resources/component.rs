//! The `storyblok_component` resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{base_schema, ResourceModel};
use crate::client::types::{
    Component, ComponentBase, ComponentCreateInput, ComponentUpdateInput, ConditionalSettings,
    FieldAttributes, FieldInput, FieldOption, Modification, RuleCondition, ValidatedObject,
};
use crate::client::Entity;
use crate::convert::{format_uuid, parse_uuid};
use crate::error::ProviderError;
use crate::identifier;
use crate::ordering::order_fields;
use crate::schema::{Attribute, AttributeType, Block, NestedBlock, Schema, StringValidator};

/// Field type tags accepted by the editor, with their meaning.
pub const COMPONENT_TYPES: &[(&str, &str)] = &[
    ("bloks", "Blocks: a field to interleave other components in your current one"),
    ("text", "Text: a text field"),
    ("textarea", "Textarea: a text area"),
    ("markdown", "Markdown: write markdown with a text area and additional formatting options"),
    ("richtext", "Richtext: write richtext with a text area and additional formatting options"),
    ("number", "Number: a number field"),
    ("datetime", "Date/Time: a date- and time picker"),
    ("boolean", "Boolean: a checkbox - true/false"),
    ("options", "Multi-Options: a list of checkboxes"),
    ("option", "Single-Option: a single dropdown"),
    ("asset", "Asset: Single asset (images, videos, audio, and documents)"),
    ("multiasset", "Multi-Assets: (images, videos, audio, and documents)"),
    ("multilink", "Link: an input field for internal linking to other stories"),
    ("section", "Group: no input possibility - allows you to group fields in sections"),
    ("tab", "Tab: no input possibility - allows you to group fields in tabs"),
    ("custom", "Plugin: Extend the editor yourself with a color picker or similar"),
    ("image", "Image (old): a upload field for a single image with cropping possibilities"),
    ("file", "File (old): a upload field for a single file"),
    ("table", "Table: a table field"),
];

/// Icons a component can show in the block picker.
pub const COMPONENT_ICONS: &[&str] = &[
    "block-@",
    "block-1-2block",
    "block-add",
    "block-arrow-pointer",
    "block-block",
    "block-buildin",
    "block-cart",
    "block-center-m",
    "block-comment",
    "block-doc",
    "block-dollar-sign",
    "block-email",
    "block-image",
    "block-keyboard",
    "block-locked",
    "block-map-pin",
    "block-mobile",
    "block-monitor",
    "block-paycard",
    "block-resize-fc",
    "block-share",
    "block-shield",
    "block-shield-2",
    "block-sticker",
    "block-suitcase",
    "block-table",
    "block-table-2",
    "block-tag",
    "block-text-c",
    "block-text-img-c",
    "block-text-img-l",
    "block-text-img-r",
    "block-text-img-r-l",
    "block-text-img-t-l",
    "block-text-img-t-r",
    "block-text-l",
    "block-text-r",
    "block-unlocked",
    "block-wallet",
];

#[derive(Clone, Copy)]
enum FieldAttributeKind {
    Bool,
    Int,
    Str,
    Strings,
    Ints,
}

use self::FieldAttributeKind::{Bool, Int, Ints, Str, Strings};

/// The plain field settings and their documentation.
#[rustfmt::skip]
const FIELD_ATTRIBUTES: &[(&str, FieldAttributeKind, &str)] = &[
    ("add_https", Bool, "Prepends https: to stop usage of relative protocol"),
    ("allow_target_blank", Bool, "Allows to open links in a new tab for Richtext; Default: false"),
    ("asset_folder_id", Int, "Default asset folder numeric id to store uploaded image of that field"),
    ("can_sync", Bool, "Advanced usage to sync with field in preview; Default: false"),
    ("component_whitelist", Strings, "Array of component/content type names: [\"post\",\"page\",\"product\"]"),
    ("customize_toolbar", Bool, "Allow to customize the Markdown or Richtext toolbar; Default: false"),
    ("datasource_slug", Str, "Define selectable datasources string; Effects editor only if source=internal"),
    ("default_value", Str, "Default value for the field; Can be an escaped JSON object"),
    ("description", Str, "Description shown in the editor interface"),
    ("disable_time", Bool, "Disables time selection from date picker; Default: false"),
    ("display_name", Str, "Display name shown in the editor interface"),
    ("external_datasource", Str, "Define external datasource JSON Url; Effects editor only if source=external"),
    ("field_type", Str, "Name of the custom field type plugin"),
    ("filetypes", Strings, "Array of file type names: [\"images\", \"videos\", \"audios\", \"texts\"]"),
    ("filter_content_type", Strings, "Filter on selectable stories by content type"),
    ("folder_slug", Str, "Filter on selectable stories path; Effects editor only if source=internal_stories"),
    ("force_link_scope", Bool, "Force link scope to be internal_stories; Default: false"),
    ("image_crop", Bool, "Activate force crop for images: (true/false)"),
    ("image_height", Str, "Define height in px or height ratio if keep_image_size is enabled"),
    ("image_width", Str, "Define width in px or width ratio if keep_image_size is enabled"),
    ("keep_image_size", Bool, "Keep original size: (true/false)"),
    ("keys", Strings, "Array of field keys to include in this section"),
    ("link_scope", Str, "A path to a folder to restrict the link scope"),
    ("maximum", Int, "Maximum amount of added bloks in this blok field"),
    ("max_length", Int, "Set the max length of the input string"),
    ("max_options", Int, "Maximum number of options that can be selected"),
    ("minimum", Int, "Minimum amount of added bloks in this blok field"),
    ("min_options", Int, "Minimum number of options that must be selected"),
    ("no_translate", Bool, "Should be excluded in translation export"),
    ("regex", Str, "Client Regex validation for the field"),
    ("required", Bool, "Is field required; Default: false"),
    ("restrict_components", Bool, "Activate restriction nestable component option; Default: false"),
    ("restrict_content_types", Bool, "Activate restriction content type option"),
    ("rich_markdown", Bool, "Enable rich markdown view by default (true/false)"),
    ("rtl", Bool, "Enable global RTL for this field"),
    ("source", Str, "Possible values: undefined, internal_stories, internal, external"),
    ("toolbar", Strings, "Array of toolbar keys to include in the Richtext or Markdown toolbar"),
    ("tooltip", Bool, "Show the description as a tooltip"),
    ("translatable", Bool, "Can field be translated; Default: false"),
    ("use_uuid", Bool, "Default: true; available in option and source=internal_stories"),
    ("steps", Int, "Step size of a number field"),
    ("show_anchor", Bool, "Show the anchor option of a link field"),
    ("restrict_type", Str, "Restrict a blocks field to components, groups or tags"),
    ("component_group_whitelist", Strings, "Array of component group UUIDs allowed in a blocks field"),
    ("component_tag_whitelist", Ints, "Array of component tag ids allowed in a blocks field"),
    ("asset_link_type", Bool, "Allow links to assets"),
    ("allow_advanced_search", Bool, "Enable the advanced search of a link field"),
    ("allow_custom_attributes", Bool, "Allow custom attributes on links"),
    ("allow_external_url", Bool, "Allow external URLs in an asset field"),
    ("allow_multiline", Bool, "Allow line breaks in a text field"),
    ("decimals", Int, "Number of decimals of a number field"),
    ("email_link_type", Bool, "Allow email links"),
    ("entry_appearance", Str, "Appearance of the entries of a references field"),
    ("exclude_empty_option", Bool, "Hide the empty option of a single-option field"),
    ("exclude_from_merge", Bool, "Exclude the field when merging content"),
    ("exclude_from_overwrite", Bool, "Exclude the field when overwriting content"),
    ("force_merge", Bool, "Always merge the field"),
    ("inline_label", Bool, "Show the label inline"),
    ("is_reference_type", Bool, "The field references other stories"),
    ("max_value", Int, "Maximum value of a number field"),
    ("min_value", Int, "Minimum value of a number field"),
];

/// State of a `storyblok_component`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentModel {
    /// Composite `"<space_id>/<component_id>"` identifier.
    pub id: Option<String>,
    /// Numeric id assigned by the API.
    pub component_id: Option<i64>,
    /// Space the component lives in.
    pub space_id: i64,
    /// Creation timestamp reported by the API.
    pub created_at: Option<String>,
    /// Technical name.
    pub name: String,
    /// Name shown in the editor.
    pub display_name: Option<String>,
    /// Background color of the icon.
    pub color: Option<String>,
    /// One of [`COMPONENT_ICONS`].
    pub icon: Option<String>,
    /// Preview image URL.
    pub image: Option<String>,
    /// Preview template.
    pub preview_tmpl: Option<String>,
    /// Field used as preview.
    pub preview_field: Option<String>,
    /// Usable as a content type.
    pub is_root: Option<bool>,
    /// Insertable in blocks fields.
    pub is_nestable: Option<bool>,
    /// UUID of the owning component group.
    pub component_group_uuid: Option<String>,
    /// Fields keyed by name.
    pub schema: BTreeMap<String, FieldModel>,
}

/// One entry of the component's `schema` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    /// One of the [`COMPONENT_TYPES`] tags.
    #[serde(rename = "type")]
    pub kind: String,
    /// Position in the editor; fields are sent in this order.
    #[serde(default)]
    pub position: i64,
    /// Selectable entries of option fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionModel>>,
    /// Display rules depending on other fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_settings: Option<Vec<ConditionalSettingsModel>>,
    /// Every other setting.
    #[serde(flatten)]
    pub attributes: FieldAttributes,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionModel {
    pub name: String,
    pub value: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSettingsModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifications: Option<Vec<ModificationModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_conditions: Option<Vec<RuleConditionModel>>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditionModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub validated_object: ValidatedObjectModel,
}

/// The field a rule condition reads. Only the key is configurable.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedObjectModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
}

fn map_list<T, U>(items: &Option<Vec<T>>, f: impl FnMut(&T) -> U) -> Option<Vec<U>> {
    items.as_ref().map(|items| items.iter().map(f).collect())
}

impl From<&FieldModel> for FieldInput {
    fn from(field: &FieldModel) -> Self {
        Self {
            kind: field.kind.clone(),
            pos: field.position,
            options: map_list(&field.options, |o| FieldOption {
                name: o.name.clone(),
                value: o.value.clone(),
            }),
            conditional_settings: map_list(&field.conditional_settings, |s| {
                ConditionalSettings::from(s)
            }),
            attributes: field.attributes.clone(),
        }
    }
}

impl From<&FieldInput> for FieldModel {
    fn from(field: &FieldInput) -> Self {
        Self {
            kind: field.kind.clone(),
            position: field.pos,
            options: map_list(&field.options, |o| OptionModel {
                name: o.name.clone(),
                value: o.value.clone(),
            }),
            conditional_settings: map_list(&field.conditional_settings, |s| {
                ConditionalSettingsModel::from(s)
            }),
            attributes: field.attributes.clone(),
        }
    }
}

impl From<&ConditionalSettingsModel> for ConditionalSettings {
    fn from(setting: &ConditionalSettingsModel) -> Self {
        Self {
            modifications: map_list(&setting.modifications, |m| Modification {
                display: m.display.clone(),
                required: m.required,
            }),
            rule_match: setting.rule_match.clone(),
            rule_conditions: map_list(&setting.rule_conditions, |c| RuleCondition {
                validation: c.validation.clone(),
                value: c.value.clone(),
                validated_object: Some(ValidatedObject::field_value(
                    c.validated_object.field_key.clone(),
                )),
            }),
        }
    }
}

impl From<&ConditionalSettings> for ConditionalSettingsModel {
    fn from(setting: &ConditionalSettings) -> Self {
        Self {
            modifications: map_list(&setting.modifications, |m| ModificationModel {
                display: m.display.clone(),
                required: m.required,
            }),
            rule_match: setting.rule_match.clone(),
            rule_conditions: map_list(&setting.rule_conditions, |c| RuleConditionModel {
                validation: c.validation.clone(),
                value: c.value.clone(),
                validated_object: ValidatedObjectModel {
                    field_key: c.validated_object.as_ref().and_then(|o| o.field_key.clone()),
                },
            }),
        }
    }
}

impl ComponentModel {
    fn to_base(&self) -> Result<ComponentBase, ProviderError> {
        let fields: BTreeMap<String, FieldInput> = self
            .schema
            .iter()
            .map(|(name, field)| (name.clone(), FieldInput::from(field)))
            .collect();

        Ok(ComponentBase {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
            image: self.image.clone(),
            preview_tmpl: self.preview_tmpl.clone(),
            preview_field: self.preview_field.clone(),
            is_root: self.is_root,
            is_nestable: self.is_nestable,
            component_group_uuid: parse_uuid(
                "component_group_uuid",
                self.component_group_uuid.as_deref(),
            )?,
            schema: order_fields(&fields),
        })
    }
}

fn field_attribute(kind: FieldAttributeKind) -> Attribute {
    match kind {
        Bool => Attribute::optional_bool(),
        Int => Attribute::optional_int64(),
        Str => Attribute::optional_string(),
        Strings => Attribute::optional_list(AttributeType::String),
        Ints => Attribute::optional_list(AttributeType::Int64),
    }
}

fn conditional_settings_block() -> Block {
    let modification = Block::new()
        .with_attribute(
            "display",
            Attribute::optional_string()
                .with_description("Hide or show the field")
                .with_validator(StringValidator::one_of(["hide", "show"])),
        )
        .with_attribute(
            "required",
            Attribute::optional_bool().with_description("Make the field required"),
        );

    let rule_condition = Block::new()
        .with_attribute(
            "validation",
            Attribute::optional_string()
                .with_description("How the value of the other field is compared")
                .with_validator(StringValidator::one_of([
                    "empty",
                    "not_empty",
                    "equals",
                    "not_equals",
                ])),
        )
        .with_attribute(
            "value",
            Attribute::optional_string().with_description("The value compared against"),
        )
        .with_block(
            "validated_object",
            NestedBlock::single(Block::new().with_attribute(
                "field_key",
                Attribute::optional_string().with_description("Key of the field to check"),
            )),
        );

    Block::new()
        .with_description("Conditionally show, hide or require this field")
        .with_attribute(
            "rule_match",
            Attribute::optional_string()
                .with_description("Whether any or all rule conditions must match")
                .with_validator(StringValidator::one_of(["any", "all"])),
        )
        .with_block("modifications", NestedBlock::list(modification))
        .with_block("rule_conditions", NestedBlock::list(rule_condition))
}

fn field_block() -> Block {
    let option = Block::new()
        .with_description(
            "Array of datasource entries [{name:\"\", value:\"\"}]; \
             Effects editor only if source=undefined",
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("Name of the datasource entry"),
        )
        .with_attribute(
            "value",
            Attribute::required_string().with_description("Value of the datasource entry"),
        );

    let block = Block::new()
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_description("The type of the field")
                .with_validator(StringValidator::one_of(
                    COMPONENT_TYPES.iter().map(|(name, _)| *name),
                )),
        )
        .with_attribute(
            "position",
            Attribute::required_int64().with_description("The position of the field"),
        )
        .with_block("options", NestedBlock::list(option))
        .with_block("conditional_settings", NestedBlock::list(conditional_settings_block()));

    FIELD_ATTRIBUTES
        .iter()
        .fold(block, |block, (name, kind, description)| {
            block.with_attribute(*name, field_attribute(*kind).with_description(*description))
        })
}

impl ResourceModel for ComponentModel {
    type Remote = Component;
    type CreateInput = ComponentCreateInput;
    type UpdateInput = ComponentUpdateInput;

    const TYPE_NAME: &'static str = "storyblok_component";

    fn schema() -> Schema {
        base_schema(
            "A component is a standalone entity that is meaningful in its own right. Each \
             component is a small piece of your data structure which can be filled with \
             content or nested by your content editor.",
        )
        .with_attribute(
            "component_id",
            Attribute::computed_int64().with_description("The ID of the component."),
        )
        .with_attribute(
            "created_at",
            Attribute::computed_string()
                .with_description("The creation timestamp of the component."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The technical name of the component."),
        )
        .with_attribute(
            "is_root",
            Attribute::optional_bool()
                .computed()
                .with_description("Component should be usable as a Content Type"),
        )
        .with_attribute(
            "is_nestable",
            Attribute::optional_bool()
                .computed()
                .with_description("Component should be insertable in blocks field type fields"),
        )
        .with_attribute(
            "component_group_uuid",
            Attribute::optional_string()
                .with_description("The UUID of the component group.")
                .with_validator(StringValidator::Uuid),
        )
        .with_attribute(
            "icon",
            Attribute::optional_string()
                .with_description("The Icon of the component")
                .with_validator(StringValidator::one_of(COMPONENT_ICONS.iter().copied())),
        )
        .with_attribute(
            "image",
            Attribute::optional_string().with_description("An image url of the component"),
        )
        .with_attribute(
            "preview_tmpl",
            Attribute::optional_string().with_description("The preview template of the component"),
        )
        .with_attribute(
            "preview_field",
            Attribute::optional_string().with_description("A preview field of the component"),
        )
        .with_attribute(
            "color",
            Attribute::optional_string()
                .with_description("The background color for the icon of the component"),
        )
        .with_attribute(
            "display_name",
            Attribute::optional_string().with_description("The display name of the component"),
        )
        .with_block(
            "schema",
            NestedBlock::map(field_block().with_description("Schema of this component."))
                .with_min_items(1),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn space_id(&self) -> i64 {
        self.space_id
    }

    fn to_create_input(&self) -> Result<ComponentCreateInput, ProviderError> {
        Ok(ComponentCreateInput {
            component: self.to_base()?,
        })
    }

    fn to_update_input(&self) -> Result<ComponentUpdateInput, ProviderError> {
        Ok(ComponentUpdateInput {
            component: self.to_base()?,
        })
    }

    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&Component>,
    ) -> Result<(), ProviderError> {
        let component = remote.ok_or(ProviderError::MissingEntity(Component::NAME))?;

        self.id = Some(identifier::encode(space_id, component.id));
        self.component_id = Some(component.id);
        self.space_id = space_id;
        self.name = component.name.clone();
        self.created_at = component.created_at.clone();
        self.is_root = component.is_root;
        self.is_nestable = component.is_nestable;
        self.component_group_uuid = format_uuid(component.component_group_uuid.as_ref());
        self.color = component.color.clone();
        self.display_name = component.display_name.clone();
        self.image = component.image.clone();
        self.preview_field = component.preview_field.clone();
        self.preview_tmpl = component.preview_tmpl.clone();
        if let Some(icon) = &component.icon {
            self.icon = Some(icon.clone());
        }
        self.schema = component
            .schema
            .iter()
            .map(|(name, field)| (name.clone(), FieldModel::from(field)))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    fn field(kind: &str, position: i64) -> FieldModel {
        FieldModel {
            kind: kind.to_string(),
            position,
            ..Default::default()
        }
    }

    fn banner() -> ComponentModel {
        let mut heading = field("text", 2);
        heading.attributes.required = Some(true);
        heading.attributes.max_length = Some(80);
        heading.conditional_settings = Some(vec![ConditionalSettingsModel {
            modifications: Some(vec![ModificationModel {
                display: Some("hide".to_string()),
                required: Some(false),
            }]),
            rule_match: Some("any".to_string()),
            rule_conditions: Some(vec![RuleConditionModel {
                validation: Some("equals".to_string()),
                value: Some("minimal".to_string()),
                validated_object: ValidatedObjectModel {
                    field_key: Some("layout".to_string()),
                },
            }]),
        }]);

        let mut layout = field("option", 1);
        layout.options = Some(vec![
            OptionModel {
                name: "Minimal".to_string(),
                value: "minimal".to_string(),
            },
            OptionModel {
                name: "Full".to_string(),
                value: "full".to_string(),
            },
        ]);

        let mut buttons = field("bloks", 3);
        buttons.attributes.component_whitelist = Some(vec!["button".to_string()]);
        buttons.attributes.component_tag_whitelist = Some(vec![]);

        ComponentModel {
            space_id: 233252,
            name: "banner".to_string(),
            display_name: Some("Banner".to_string()),
            icon: Some("block-image".to_string()),
            is_nestable: Some(true),
            component_group_uuid: Some("0f9ce1b4-3c7c-4fa6-9a1c-6d9c3fd0a4a1".to_string()),
            schema: BTreeMap::from([
                ("heading".to_string(), heading),
                ("layout".to_string(), layout),
                ("buttons".to_string(), buttons),
            ]),
            ..Default::default()
        }
    }

    /// The API echoes the component it was sent, plus an id and a timestamp.
    fn echo(base: &ComponentBase, id: i64) -> Component {
        let mut value = serde_json::to_value(base).unwrap();
        value["id"] = json!(id);
        value["created_at"] = json!("2024-01-18T10:00:00.000Z");
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_create_input_orders_fields_by_position() {
        let input = banner().to_create_input().unwrap();
        let names: Vec<_> = input.component.schema.keys().cloned().collect();
        assert_eq!(names, vec!["layout", "heading", "buttons"]);

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["component"]["name"], "banner");
        assert_eq!(body["component"]["schema"]["heading"]["pos"], 2);
        assert!(body["component"].get("color").is_none());
    }

    #[test]
    fn test_rule_conditions_target_field_values() {
        let input = banner().to_create_input().unwrap();
        let body = serde_json::to_value(&input).unwrap();
        let condition = &body["component"]["schema"]["heading"]["conditional_settings"][0]
            ["rule_conditions"][0];
        assert_eq!(
            condition["validated_object"],
            json!({"field_key": "layout", "field_attr": "value", "type": "field"})
        );
    }

    #[test]
    fn test_absent_nested_lists_stay_absent() {
        let input = banner().to_update_input().unwrap();
        let layout = &input.component.schema["layout"];
        assert!(layout.conditional_settings.is_none());
        assert!(layout.attributes.filetypes.is_none());

        let buttons = &input.component.schema["buttons"];
        assert_eq!(buttons.attributes.component_tag_whitelist, Some(vec![]));
    }

    #[test]
    fn test_round_trip_through_remote() {
        let model = banner();
        let remote = echo(&model.to_create_input().unwrap().component, 42);

        let mut state = model.clone();
        state.apply_remote(233252, Some(&remote)).unwrap();

        assert_eq!(state.id.as_deref(), Some("233252/42"));
        assert_eq!(state.component_id, Some(42));
        assert_eq!(state.created_at.as_deref(), Some("2024-01-18T10:00:00.000Z"));

        let expected = ComponentModel {
            id: state.id.clone(),
            component_id: state.component_id,
            created_at: state.created_at.clone(),
            ..model
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn test_apply_remote_keeps_icon_when_absent() {
        let mut state = banner();
        let remote = Component {
            id: 1,
            name: "banner".to_string(),
            ..Default::default()
        };
        state.apply_remote(1, Some(&remote)).unwrap();
        assert_eq!(state.icon.as_deref(), Some("block-image"));
        assert_eq!(state.component_group_uuid, None);
        assert!(state.schema.is_empty());
    }

    #[test]
    fn test_apply_remote_without_entity() {
        let err = ComponentModel::default().apply_remote(1, None).unwrap_err();
        assert_eq!(err.to_string(), "component is nil");
    }

    #[test]
    fn test_invalid_group_uuid() {
        let model = ComponentModel {
            component_group_uuid: Some("not-a-uuid".to_string()),
            ..banner()
        };
        assert!(matches!(
            model.to_create_input(),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_schema_validation() {
        let schema = ComponentModel::schema();
        let config = serde_json::to_value(banner()).unwrap();
        assert!(validate(&schema, &config).is_empty());

        let config = json!({
            "space_id": 1,
            "name": "banner",
            "icon": "block-unicorn",
            "schema": {"title": {"type": "headline", "position": 0}}
        });
        let attributes: Vec<_> = validate(&schema, &config)
            .into_iter()
            .filter_map(|d| d.attribute)
            .collect();
        assert!(attributes.contains(&"icon".to_string()));
        assert!(attributes.contains(&"schema.title.type".to_string()));
    }

    #[test]
    fn test_field_attribute_table_matches_the_wire_type() {
        let block = field_block();
        let mut sample = serde_json::Map::new();
        for (name, kind, _) in FIELD_ATTRIBUTES {
            assert!(block.attributes.contains_key(*name), "{}", name);
            let value = match kind {
                Bool => json!(true),
                Int => json!(1),
                Str => json!("x"),
                Strings => json!(["x"]),
                Ints => json!([1]),
            };
            sample.insert(name.to_string(), value);
        }
        let sample = serde_json::Value::Object(sample);

        let attributes: FieldAttributes = serde_json::from_value(sample.clone()).unwrap();
        assert_eq!(serde_json::to_value(&attributes).unwrap(), sample);
        assert_eq!(
            serde_json::to_value(FieldAttributes::default()).unwrap(),
            json!({})
        );
    }
}
