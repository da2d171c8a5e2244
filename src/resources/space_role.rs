//! The `storyblok_space_role` resource.

use serde::{Deserialize, Serialize};

use super::{base_schema, ResourceModel};
use crate::client::types::{SpaceRole, SpaceRoleBase, SpaceRoleInput};
use crate::client::Entity;
use crate::error::ProviderError;
use crate::identifier;
use crate::schema::{Attribute, AttributeType, Schema};

/// State of a `storyblok_space_role`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceRoleModel {
    pub id: Option<String>,
    pub role_id: Option<i64>,
    pub space_id: i64,
    pub role: String,
    pub subtitle: Option<String>,
    /// Sent to the API as `ext_id`.
    pub external_id: Option<String>,
    pub allowed_languages: Option<Vec<String>>,
    pub allowed_paths: Option<Vec<String>>,
    pub resolved_allowed_paths: Option<Vec<String>>,
    pub field_permissions: Option<Vec<String>>,
    pub permissions: Option<Vec<String>>,
    pub readonly_field_permissions: Option<Vec<String>>,
    pub branch_ids: Option<Vec<i64>>,
    pub component_ids: Option<Vec<i64>>,
    pub datasource_ids: Option<Vec<i64>>,
}

impl SpaceRoleModel {
    fn to_input(&self) -> SpaceRoleInput {
        SpaceRoleInput {
            space_role: SpaceRoleBase {
                role: self.role.clone(),
                subtitle: self.subtitle.clone(),
                ext_id: self.external_id.clone(),
                allowed_languages: self.allowed_languages.clone(),
                allowed_paths: self.allowed_paths.clone(),
                resolved_allowed_paths: self.resolved_allowed_paths.clone(),
                field_permissions: self.field_permissions.clone(),
                permissions: self.permissions.clone(),
                readonly_field_permissions: self.readonly_field_permissions.clone(),
                branch_ids: self.branch_ids.clone(),
                component_ids: self.component_ids.clone(),
                datasource_ids: self.datasource_ids.clone(),
            },
        }
    }
}

fn string_list(description: &str) -> Attribute {
    Attribute::optional_list(AttributeType::String).with_description(description)
}

fn id_list(description: &str) -> Attribute {
    Attribute::optional_list(AttributeType::Int64).with_description(description)
}

impl ResourceModel for SpaceRoleModel {
    type Remote = SpaceRole;
    type CreateInput = SpaceRoleInput;
    type UpdateInput = SpaceRoleInput;

    const TYPE_NAME: &'static str = "storyblok_space_role";

    fn schema() -> Schema {
        base_schema(
            "Space roles are custom permission sets that can be attached to collaborators to \
             define their roles and permissions in a specific space.",
        )
        .with_attribute(
            "role_id",
            Attribute::computed_int64().with_description("The ID of the role."),
        )
        .with_attribute(
            "external_id",
            Attribute::optional_string().with_description("External ID (used for SSO)"),
        )
        .with_attribute(
            "role",
            Attribute::required_string().with_description("Name used in the interface"),
        )
        .with_attribute(
            "subtitle",
            Attribute::optional_string().with_description("A short description of the role"),
        )
        .with_attribute(
            "allowed_languages",
            string_list(
                "Add languages the user should have access to (acts as allow list). If no \
                 item is selected the user has rights to edit all content.",
            ),
        )
        .with_attribute(
            "allowed_paths",
            string_list(
                "Story ids the user should have access to (acts as whitelist). If no item is \
                 selected the user has rights to access all content items.",
            ),
        )
        .with_attribute(
            "resolved_allowed_paths",
            string_list("Resolved allowed_paths for displaying paths"),
        )
        .with_attribute(
            "field_permissions",
            string_list(
                "Hide specific fields for this user with an array of strings with the schema: \
                 \"component_name.field_name\"",
            ),
        )
        .with_attribute(
            "permissions",
            string_list(
                "Allow specific actions in interface by adding the permission as array of strings",
            ),
        )
        .with_attribute(
            "readonly_field_permissions",
            string_list("Read only field permissions"),
        )
        .with_attribute(
            "branch_ids",
            id_list("Branch ids that the role is allowed access to"),
        )
        .with_attribute(
            "component_ids",
            id_list("Component ids that the role is allowed access to"),
        )
        .with_attribute(
            "datasource_ids",
            id_list("Datasource ids that the role is allowed access to"),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn space_id(&self) -> i64 {
        self.space_id
    }

    fn to_create_input(&self) -> Result<SpaceRoleInput, ProviderError> {
        Ok(self.to_input())
    }

    fn to_update_input(&self) -> Result<SpaceRoleInput, ProviderError> {
        Ok(self.to_input())
    }

    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&SpaceRole>,
    ) -> Result<(), ProviderError> {
        let role = remote.ok_or(ProviderError::MissingEntity(SpaceRole::NAME))?;

        self.id = Some(identifier::encode(space_id, role.id));
        self.role_id = Some(role.id);
        self.space_id = space_id;
        self.role = role.role.clone();
        self.subtitle = role.subtitle.clone();
        self.external_id = role.ext_id.clone();
        self.allowed_languages = role.allowed_languages.clone();
        self.allowed_paths = role.allowed_paths.clone();
        self.resolved_allowed_paths = role.resolved_allowed_paths.clone();
        self.field_permissions = role.field_permissions.clone();
        self.permissions = role.permissions.clone();
        self.readonly_field_permissions = role.readonly_field_permissions.clone();
        self.branch_ids = role.branch_ids.clone();
        self.component_ids = role.component_ids.clone();
        self.datasource_ids = role.datasource_ids.clone();
        Ok(())
    }
}
