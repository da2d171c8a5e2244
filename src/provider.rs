//! The Storyblok provider.
//!
//! [`StoryblokProvider`] implements [`ProviderService`]: it resolves the
//! provider configuration into a management API client and routes every
//! resource call to the handler of its type.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::client::{HttpClient, ManagementApi, ManagementClient, RetryPolicy};
use crate::config::{ProviderConfig, ProviderOptions};
use crate::error::ProviderError;
use crate::logging::TrafficLogger;
use crate::plan;
use crate::resources::{self, Resources};
use crate::schema::{Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};
use crate::validation;

/// Provider for Storyblok spaces.
pub struct StoryblokProvider {
    options: ProviderOptions,
    resources: RwLock<Option<Arc<Resources>>>,
}

impl Default for StoryblokProvider {
    fn default() -> Self {
        Self::new(ProviderOptions::default())
    }
}

impl StoryblokProvider {
    /// Create an unconfigured provider.
    pub fn new(options: ProviderOptions) -> Self {
        Self {
            options,
            resources: RwLock::new(None),
        }
    }

    /// Create a provider that is already configured to use `api`.
    pub fn with_api(api: Arc<dyn ManagementApi>) -> Self {
        Self {
            options: ProviderOptions::default(),
            resources: RwLock::new(Some(Arc::new(Resources::new(ManagementClient::new(api))))),
        }
    }

    async fn resources(&self) -> Result<Arc<Resources>, ProviderError> {
        self.resources
            .read()
            .await
            .clone()
            .ok_or_else(|| ProviderError::Configuration("provider is not configured".to_string()))
    }

    fn resource_schema(resource_type: &str) -> Result<Schema, ProviderError> {
        resources::schemas()
            .into_iter()
            .find(|(name, _)| *name == resource_type)
            .map(|(_, schema)| schema)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn build_client(&self, url: &str, token: &str) -> Result<HttpClient, ProviderError> {
        let mut builder = HttpClient::builder()
            .base_url(url)
            .token(token)
            .retry_policy(RetryPolicy {
                max_retries: self.options.max_retries,
                ..RetryPolicy::default()
            })
            .timeout(self.options.timeout);
        if self.options.log_traffic {
            builder = builder.observer(Arc::new(TrafficLogger));
        }
        builder.build()
    }
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

fn log_outcome<T>(operation: &str, resource_type: &str, result: &Result<T, ProviderError>) {
    match result {
        Ok(_) => info!(resource_type = %resource_type, "{} completed successfully", operation),
        Err(e) => error!(resource_type = %resource_type, error = %e, "{} failed", operation),
    }
}

#[async_trait]
impl ProviderService for StoryblokProvider {
    fn schema(&self) -> ProviderSchema {
        resources::schemas().into_iter().fold(
            ProviderSchema::new().with_provider_config(ProviderConfig::schema()),
            |schema, (name, resource)| schema.with_resource(name, resource),
        )
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        debug!("ValidateProviderConfig called");
        let mut diagnostics = validation::validate(&ProviderConfig::schema(), &config);
        if !has_errors(&diagnostics) {
            if let Err(e) = ProviderConfig::from_value(config) {
                diagnostics.push(e.to_diagnostic());
            }
        }
        Ok(diagnostics)
    }

    #[instrument(skip_all, name = "configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        info!("Configure called");
        let resolved = ProviderConfig::from_value(config)?.resolve();
        let diagnostics = resolved.diagnostics();
        if has_errors(&diagnostics) {
            warn!(count = diagnostics.len(), "Configure returned error diagnostics");
            return Ok(diagnostics);
        }

        let http = self.build_client(&resolved.url, &resolved.token)?;
        let resources = Resources::new(ManagementClient::new(Arc::new(http)));
        *self.resources.write().await = Some(Arc::new(resources));
        info!(url = %resolved.url, "Provider configured");
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        info!("Stop called");
        self.resources.write().await.take();
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        debug!(resource_type = %resource_type, "ValidateResourceConfig called");
        let schema = Self::resource_schema(resource_type)?;
        let diagnostics = validation::validate(&schema, &config);
        if has_errors(&diagnostics) {
            warn!(
                resource_type = %resource_type,
                count = diagnostics.len(),
                "Resource config has errors"
            );
        }
        Ok(diagnostics)
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        debug!(resource_type = %resource_type, "Plan called");
        let schema = Self::resource_schema(resource_type)?;
        let resources = self.resources().await?;
        let handler = resources.get(resource_type)?;

        let prior = prior_state.map(|s| handler.normalize(s)).transpose()?;
        let proposed = handler.normalize(proposed_state)?;
        let result = plan::plan(&schema, prior.as_ref(), &proposed)?;
        debug!(
            resource_type = %resource_type,
            changes = result.changes.len(),
            requires_replace = result.requires_replace,
            "Plan computed"
        );
        Ok(result)
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        info!(resource_type = %resource_type, "Create called");
        let resources = self.resources().await?;
        let result = resources.get(resource_type)?.create(planned_state).await;
        log_outcome("Create", resource_type, &result);
        result
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        debug!(resource_type = %resource_type, "Read called");
        let resources = self.resources().await?;
        let result = resources.get(resource_type)?.read(current_state).await;
        match &result {
            Ok(_) => debug!(resource_type = %resource_type, "Read completed"),
            Err(ProviderError::NotFound(what)) => {
                info!(resource_type = %resource_type, resource = %what, "Resource is gone")
            }
            Err(e) => error!(resource_type = %resource_type, error = %e, "Read failed"),
        }
        result
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        info!(resource_type = %resource_type, "Update called");
        let resources = self.resources().await?;
        let result = resources
            .get(resource_type)?
            .update(prior_state, planned_state)
            .await;
        log_outcome("Update", resource_type, &result);
        result
    }

    async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        info!(resource_type = %resource_type, "Delete called");
        let resources = self.resources().await?;
        let result = resources.get(resource_type)?.delete(current_state).await;
        log_outcome("Delete", resource_type, &result);
        result
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        info!(resource_type = %resource_type, id = %id, "ImportResource called");
        let resources = self.resources().await?;
        let result = resources.get(resource_type)?.import(id).await;
        log_outcome("ImportResource", resource_type, &result);
        Ok(vec![ImportedResource::new(resource_type, result?)])
    }
}
