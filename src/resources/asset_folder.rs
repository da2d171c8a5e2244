//! The `storyblok_asset_folder` resource.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{base_schema, ResourceModel};
use crate::client::types::{AssetFolder, AssetFolderBase, AssetFolderInput};
use crate::client::Entity;
use crate::error::ProviderError;
use crate::identifier;
use crate::schema::{Attribute, Schema};

/// State of a `storyblok_asset_folder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetFolderModel {
    /// Composite `"<space_id>/<asset_folder_id>"` identifier.
    pub id: Option<String>,
    /// Numeric id assigned by the API.
    pub asset_folder_id: Option<i64>,
    /// Space the folder lives in.
    pub space_id: i64,
    /// Name of the folder.
    pub name: String,
    /// Parent folder, unset for top-level folders.
    pub parent_id: Option<i64>,
}

impl AssetFolderModel {
    fn to_input(&self) -> AssetFolderInput {
        AssetFolderInput {
            asset_folder: AssetFolderBase {
                name: self.name.clone(),
                parent_id: self.parent_id,
            },
        }
    }
}

impl ResourceModel for AssetFolderModel {
    type Remote = AssetFolder;
    type CreateInput = AssetFolderInput;
    type UpdateInput = AssetFolderInput;

    const TYPE_NAME: &'static str = "storyblok_asset_folder";
    // The API answers updates and deletes without a body.
    const UPDATE_STATUS: StatusCode = StatusCode::NO_CONTENT;
    const DELETE_STATUS: StatusCode = StatusCode::NO_CONTENT;
    const REFRESH_AFTER_UPDATE: bool = true;

    fn schema() -> Schema {
        base_schema(
            "Asset folder allow you to group your assets. Besides the overall root folder you \
             can define nested folder structures.",
        )
        .with_attribute(
            "asset_folder_id",
            Attribute::computed_int64().with_description("The ID of the asset folder."),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The technical name of the asset folder."),
        )
        .with_attribute(
            "parent_id",
            Attribute::optional_int64().with_description("The ID of the parent asset folder."),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn space_id(&self) -> i64 {
        self.space_id
    }

    fn to_create_input(&self) -> Result<AssetFolderInput, ProviderError> {
        Ok(self.to_input())
    }

    fn to_update_input(&self) -> Result<AssetFolderInput, ProviderError> {
        Ok(self.to_input())
    }

    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&AssetFolder>,
    ) -> Result<(), ProviderError> {
        let folder = remote.ok_or(ProviderError::MissingEntity(AssetFolder::NAME))?;

        self.id = Some(identifier::encode(space_id, folder.id));
        self.asset_folder_id = Some(folder.id);
        self.space_id = space_id;
        self.name = folder.name.clone();
        if folder.parent_id.is_some() {
            self.parent_id = folder.parent_id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_omits_missing_parent() {
        let model = AssetFolderModel {
            space_id: 9,
            name: "images".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(model.to_create_input().unwrap()).unwrap(),
            json!({"asset_folder": {"name": "images"}})
        );

        let nested = AssetFolderModel {
            parent_id: Some(3),
            ..model
        };
        assert_eq!(
            serde_json::to_value(nested.to_update_input().unwrap()).unwrap(),
            json!({"asset_folder": {"name": "images", "parent_id": 3}})
        );
    }

    #[test]
    fn test_apply_remote() {
        let mut model = AssetFolderModel {
            parent_id: Some(3),
            ..Default::default()
        };
        let remote = AssetFolder {
            id: 51,
            name: "banners".to_string(),
            parent_id: None,
        };
        model.apply_remote(9, Some(&remote)).unwrap();

        assert_eq!(model.id.as_deref(), Some("9/51"));
        assert_eq!(model.asset_folder_id, Some(51));
        assert_eq!(model.space_id, 9);
        assert_eq!(model.name, "banners");
        assert_eq!(model.parent_id, Some(3));
    }

    #[test]
    fn test_apply_remote_without_entity() {
        let err = AssetFolderModel::default().apply_remote(1, None).unwrap_err();
        assert_eq!(err.to_string(), "asset folder is nil");
    }
}
