//! The `storyblok_webhook` resource.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{base_schema, ResourceModel};
use crate::client::types::{Webhook, WebhookBase, WebhookInput};
use crate::client::Entity;
use crate::error::ProviderError;
use crate::identifier;
use crate::schema::{Attribute, AttributeType, Schema};

/// State of a `storyblok_webhook`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookModel {
    /// Composite `"<space_id>/<webhook_id>"` identifier.
    pub id: Option<String>,
    /// Numeric id assigned by the API.
    pub webhook_id: Option<i64>,
    /// Space the webhook belongs to.
    pub space_id: i64,
    /// Technical name.
    pub name: String,
    /// URL the events are posted to.
    pub endpoint: String,
    /// Events that trigger the webhook, e.g. `story.published`.
    pub actions: Vec<String>,
    /// Defaults to `true`.
    pub activated: Option<bool>,
    /// Signing secret. Never returned by the API.
    pub secret: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl WebhookModel {
    fn to_input(&self) -> WebhookInput {
        WebhookInput {
            webhook_endpoint: WebhookBase {
                name: self.name.clone(),
                endpoint: self.endpoint.clone(),
                actions: self.actions.clone(),
                activated: self.activated.unwrap_or(true),
                secret: self.secret.clone().unwrap_or_default(),
                description: self.description.clone(),
            },
        }
    }
}

impl ResourceModel for WebhookModel {
    type Remote = Webhook;
    type CreateInput = WebhookInput;
    type UpdateInput = WebhookInput;

    const TYPE_NAME: &'static str = "storyblok_webhook";
    const DELETE_STATUS: StatusCode = StatusCode::NO_CONTENT;
    const REFRESH_AFTER_UPDATE: bool = true;

    fn schema() -> Schema {
        base_schema(
            "Webhooks are used to send Storyblok events to other applications. There are some \
             default Storyblok events that you can listen to when they are triggered.",
        )
        .with_attribute(
            "webhook_id",
            Attribute::computed_int64().with_description("The ID of the webhook."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The technical name of the webhook."),
        )
        .with_attribute(
            "endpoint",
            Attribute::required_string()
                .with_description("The endpoint URL to send the webhook to."),
        )
        .with_attribute(
            "activated",
            Attribute::optional_bool()
                .with_default(json!(true))
                .with_description("Whether the webhook is activated."),
        )
        .with_attribute(
            "actions",
            Attribute::required_list(AttributeType::String)
                .with_description("The actions that should trigger the webhook."),
        )
        .with_attribute(
            "secret",
            Attribute::optional_string()
                .sensitive()
                .with_description("The secret to sign the webhook payload with."),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description("The description of the webhook."),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn space_id(&self) -> i64 {
        self.space_id
    }

    fn to_create_input(&self) -> Result<WebhookInput, ProviderError> {
        Ok(self.to_input())
    }

    fn to_update_input(&self) -> Result<WebhookInput, ProviderError> {
        Ok(self.to_input())
    }

    fn apply_remote(
        &mut self,
        space_id: i64,
        remote: Option<&Webhook>,
    ) -> Result<(), ProviderError> {
        let webhook = remote.ok_or(ProviderError::MissingEntity(Webhook::NAME))?;

        self.id = Some(identifier::encode(space_id, webhook.id));
        self.webhook_id = Some(webhook.id);
        self.space_id = space_id;
        self.name = webhook.name.clone();
        self.endpoint = webhook.endpoint.clone();
        self.actions = webhook.actions.clone();
        if webhook.activated.is_some() {
            self.activated = webhook.activated;
        }
        self.description = webhook.description.clone();
        Ok(())
    }
}
