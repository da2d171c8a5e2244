//! Resource handlers for every Storyblok entity kind.
//!
//! Each kind is described by a [`ResourceModel`]: its state shape, its
//! schema and the mapping to and from the API entity. [`ManagedResource`]
//! turns any model into a [`ResourceHandler`] that runs the CRUD calls, so
//! the per-kind modules only hold the mapping.

pub mod asset_folder;
pub mod component;
pub mod component_group;
pub mod space_role;
pub mod webhook;

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiResult, Entity, ManagementClient};
use crate::error::{ApiOperation, ProviderError};
use crate::identifier::CompositeId;
use crate::schema::{Attribute, Schema};

pub use asset_folder::AssetFolderModel;
pub use component::ComponentModel;
pub use component_group::ComponentGroupModel;
pub use space_role::SpaceRoleModel;
pub use webhook::WebhookModel;

/// State of one resource kind and its mapping to the API.
pub trait ResourceModel: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// The API entity.
    type Remote: Entity + Sync;
    /// Body of the create call.
    type CreateInput: Serialize + Send + Sync;
    /// Body of the update call.
    type UpdateInput: Serialize + Send + Sync;

    /// Resource type name, e.g. `storyblok_component`.
    const TYPE_NAME: &'static str;
    /// Status of a successful update.
    const UPDATE_STATUS: StatusCode = StatusCode::OK;
    /// Status of a successful delete.
    const DELETE_STATUS: StatusCode = StatusCode::OK;
    /// Read the entity again after an update instead of using the PUT response.
    const REFRESH_AFTER_UPDATE: bool = false;

    /// Schema of the resource.
    fn schema() -> Schema;

    /// The composite identifier, once the resource exists.
    fn id(&self) -> Option<&str>;

    /// The space the resource belongs to.
    fn space_id(&self) -> i64;

    /// Build the create request.
    fn to_create_input(&self) -> Result<Self::CreateInput, ProviderError>;

    /// Build the update request.
    fn to_update_input(&self) -> Result<Self::UpdateInput, ProviderError>;

    /// Copy the API entity into the state.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingEntity`] when `remote` is `None`.
    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&Self::Remote>,
    ) -> Result<(), ProviderError>;
}

/// Attributes every resource carries: the composite `id` and its `space_id`.
pub(crate) fn base_schema(description: &str) -> Schema {
    Schema::v0()
        .with_description(description)
        .with_attribute(
            "id",
            Attribute::computed_string().with_description(
                "The terraform ID of the resource. This is a composite ID, \
                 and should not be used as reference",
            ),
        )
        .with_attribute(
            "space_id",
            Attribute::required_int64()
                .with_description("Numeric ID of a space.")
                .with_force_new(),
        )
}

/// CRUD operations on JSON state for one resource type.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Resource type name.
    fn type_name(&self) -> &'static str;

    /// Rewrite a state value in its canonical shape.
    ///
    /// Unset optional attributes become `null` at the top level and are
    /// omitted inside nested field objects, so two values describing the
    /// same resource compare equal.
    fn normalize(&self, value: Value) -> Result<Value, ProviderError>;

    /// Create the resource from its planned state.
    async fn create(&self, planned: Value) -> Result<Value, ProviderError>;

    /// Refresh the state from the API.
    async fn read(&self, current: Value) -> Result<Value, ProviderError>;

    /// Apply the planned state to the resource identified by the prior state.
    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError>;

    /// Delete the resource.
    async fn delete(&self, current: Value) -> Result<(), ProviderError>;

    /// Build state for an existing resource from its composite identifier.
    async fn import(&self, id: &str) -> Result<Value, ProviderError>;
}

/// A [`ResourceHandler`] driven by a [`ResourceModel`].
pub struct ManagedResource<M> {
    client: ManagementClient,
    _model: PhantomData<fn() -> M>,
}

impl<M: ResourceModel> ManagedResource<M> {
    /// Create a handler using the given client.
    pub fn new(client: ManagementClient) -> Self {
        Self {
            client,
            _model: PhantomData,
        }
    }

    fn composite_id(model: &M) -> Result<CompositeId, ProviderError> {
        model
            .id()
            .ok_or_else(|| ProviderError::Validation("state has no id".to_string()))?
            .parse()
    }

    async fn refresh(&self, model: &mut M, id: CompositeId) -> Result<(), ProviderError> {
        let name = M::Remote::NAME;
        let op = ApiOperation::Read(id.resource_id);
        let response = self
            .client
            .get::<M::Remote>(id.space_id, id.resource_id)
            .await
            .map_err(|e| op.transport_error(name, &e))?;
        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(format!("{} {}", name, id)));
        }
        check_status(op, name, &response, StatusCode::OK)?;
        model.apply_remote(id.space_id, response.entity())
    }
}

#[async_trait]
impl<M: ResourceModel> ResourceHandler for ManagedResource<M> {
    fn type_name(&self) -> &'static str {
        M::TYPE_NAME
    }

    fn normalize(&self, value: Value) -> Result<Value, ProviderError> {
        if value.is_null() {
            return Ok(value);
        }
        let model: M = serde_json::from_value(value)?;
        Ok(serde_json::to_value(&model)?)
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: M = serde_json::from_value(planned)?;
        let space_id = model.space_id();
        let input = model.to_create_input()?;

        let name = M::Remote::NAME;
        let op = ApiOperation::Create;
        let response = self
            .client
            .create::<M::Remote>(space_id, &input)
            .await
            .map_err(|e| op.transport_error(name, &e))?;
        check_status(op, name, &response, StatusCode::CREATED)?;

        model.apply_remote(space_id, response.entity())?;
        Ok(serde_json::to_value(&model)?)
    }

    async fn read(&self, current: Value) -> Result<Value, ProviderError> {
        let mut model: M = serde_json::from_value(current)?;
        let id = Self::composite_id(&model)?;
        self.refresh(&mut model, id).await?;
        Ok(serde_json::to_value(&model)?)
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let id = Self::composite_id(&serde_json::from_value::<M>(prior)?)?;
        let mut model: M = serde_json::from_value(planned)?;
        let input = model.to_update_input()?;

        let name = M::Remote::NAME;
        let op = ApiOperation::Update;
        let response = self
            .client
            .update::<M::Remote>(id.space_id, id.resource_id, &input)
            .await
            .map_err(|e| op.transport_error(name, &e))?;
        check_status(op, name, &response, M::UPDATE_STATUS)?;

        if M::REFRESH_AFTER_UPDATE {
            self.refresh(&mut model, id).await?;
        } else {
            model.apply_remote(id.space_id, response.entity())?;
        }
        Ok(serde_json::to_value(&model)?)
    }

    async fn delete(&self, current: Value) -> Result<(), ProviderError> {
        let model: M = serde_json::from_value(current)?;
        let id = Self::composite_id(&model)?;

        let name = M::Remote::NAME;
        let op = ApiOperation::Delete;
        let response = self
            .client
            .delete::<M::Remote>(id.space_id, id.resource_id)
            .await
            .map_err(|e| op.transport_error(name, &e))?;
        check_status(op, name, &response, M::DELETE_STATUS)
    }

    async fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let id: CompositeId = id.parse()?;
        let mut model = M::default();
        self.refresh(&mut model, id).await?;
        Ok(serde_json::to_value(&model)?)
    }
}

/// Fail with the operation's two-part error unless the status is `expected`.
pub fn check_status(
    op: ApiOperation,
    name: &str,
    response: &impl ApiResult,
    expected: StatusCode,
) -> Result<(), ProviderError> {
    let status = response.status_code();
    if status == expected {
        Ok(())
    } else {
        Err(op.status_error(name, status.as_u16(), response.body()))
    }
}

/// Schemas of every resource type, available before configuration.
pub fn schemas() -> Vec<(&'static str, Schema)> {
    vec![
        (ComponentModel::TYPE_NAME, ComponentModel::schema()),
        (ComponentGroupModel::TYPE_NAME, ComponentGroupModel::schema()),
        (SpaceRoleModel::TYPE_NAME, SpaceRoleModel::schema()),
        (AssetFolderModel::TYPE_NAME, AssetFolderModel::schema()),
        (WebhookModel::TYPE_NAME, WebhookModel::schema()),
    ]
}

/// The handlers of a configured provider, keyed by resource type.
pub struct Resources {
    handlers: HashMap<&'static str, Box<dyn ResourceHandler>>,
}

impl Resources {
    /// Create a handler for every resource type, all sharing `client`.
    pub fn new(client: ManagementClient) -> Self {
        let handlers: Vec<Box<dyn ResourceHandler>> = vec![
            Box::new(ManagedResource::<ComponentModel>::new(client.clone())),
            Box::new(ManagedResource::<ComponentGroupModel>::new(client.clone())),
            Box::new(ManagedResource::<SpaceRoleModel>::new(client.clone())),
            Box::new(ManagedResource::<AssetFolderModel>::new(client.clone())),
            Box::new(ManagedResource::<WebhookModel>::new(client)),
        ];
        Self {
            handlers: handlers.into_iter().map(|h| (h.type_name(), h)).collect(),
        }
    }

    /// Look up the handler of a resource type.
    pub fn get(&self, resource_type: &str) -> Result<&dyn ResourceHandler, ProviderError> {
        self.handlers
            .get(resource_type)
            .map(|h| h.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }
}
