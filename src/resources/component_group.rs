//! The `storyblok_component_group` resource.

use serde::{Deserialize, Serialize};

use super::{base_schema, ResourceModel};
use crate::client::types::{ComponentGroup, ComponentGroupBase, ComponentGroupInput};
use crate::client::Entity;
use crate::error::ProviderError;
use crate::identifier;
use crate::schema::{Attribute, Schema};

/// State of a `storyblok_component_group`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentGroupModel {
    /// Composite `"<space_id>/<group_id>"` identifier.
    pub id: Option<String>,
    /// Numeric id assigned by the API.
    pub group_id: Option<i64>,
    /// Space the group lives in.
    pub space_id: i64,
    /// UUID referenced by `component_group_uuid` of components.
    pub uuid: Option<String>,
    /// Creation timestamp reported by the API.
    pub created_at: Option<String>,
    /// Last update timestamp reported by the API.
    pub updated_at: Option<String>,
    /// Name of the group.
    pub name: String,
}

impl ComponentGroupModel {
    fn to_input(&self) -> ComponentGroupInput {
        ComponentGroupInput {
            component_group: ComponentGroupBase {
                name: self.name.clone(),
            },
        }
    }
}

impl ResourceModel for ComponentGroupModel {
    type Remote = ComponentGroup;
    type CreateInput = ComponentGroupInput;
    type UpdateInput = ComponentGroupInput;

    const TYPE_NAME: &'static str = "storyblok_component_group";

    fn schema() -> Schema {
        base_schema("Manage a component group.")
            .with_attribute(
                "group_id",
                Attribute::computed_int64().with_description("The ID of the component group."),
            )
            .with_attribute(
                "uuid",
                Attribute::computed_string().with_description("The UUID of the component group."),
            )
            .with_attribute(
                "created_at",
                Attribute::computed_string()
                    .with_description("The creation timestamp of the component group."),
            )
            .with_attribute(
                "updated_at",
                Attribute::computed_string()
                    .with_description("The last update timestamp of the component group."),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("The name of the component group."),
            )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn space_id(&self) -> i64 {
        self.space_id
    }

    fn to_create_input(&self) -> Result<ComponentGroupInput, ProviderError> {
        Ok(self.to_input())
    }

    fn to_update_input(&self) -> Result<ComponentGroupInput, ProviderError> {
        Ok(self.to_input())
    }

    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&ComponentGroup>,
    ) -> Result<(), ProviderError> {
        let group = remote.ok_or(ProviderError::MissingEntity(ComponentGroup::NAME))?;

        self.id = Some(identifier::encode(space_id, group.id));
        self.group_id = Some(group.id);
        self.space_id = space_id;
        self.name = group.name.clone();
        self.uuid = Some(group.uuid.to_string());
        self.created_at = group.created_at.clone();
        self.updated_at = group.updated_at.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_input_carries_name_only() {
        let model = ComponentGroupModel {
            space_id: 12,
            name: "Layout".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(model.to_create_input().unwrap()).unwrap(),
            json!({"component_group": {"name": "Layout"}})
        );
        assert_eq!(
            model.to_create_input().unwrap(),
            model.to_update_input().unwrap()
        );
    }

    #[test]
    fn test_apply_remote() {
        let uuid = Uuid::parse_str("5b1c6b4e-1a3f-4c6e-9f43-2d6a0a9b8c11").unwrap();
        let remote = ComponentGroup {
            id: 301,
            name: "Layout".to_string(),
            uuid,
            created_at: Some("2024-01-18T10:00:00.000Z".to_string()),
            updated_at: Some("2024-01-19T10:00:00.000Z".to_string()),
        };
        let mut model = ComponentGroupModel::default();
        model.apply_remote(12, Some(&remote)).unwrap();

        assert_eq!(model.id.as_deref(), Some("12/301"));
        assert_eq!(model.group_id, Some(301));
        assert_eq!(model.space_id, 12);
        assert_eq!(model.uuid.as_deref(), Some("5b1c6b4e-1a3f-4c6e-9f43-2d6a0a9b8c11"));
        assert_eq!(model.name, "Layout");
        assert_eq!(model.updated_at.as_deref(), Some("2024-01-19T10:00:00.000Z"));
    }

    #[test]
    fn test_apply_remote_without_entity() {
        let err = ComponentGroupModel::default().apply_remote(1, None).unwrap_err();
        assert_eq!(err.to_string(), "component group is nil");
    }
}
