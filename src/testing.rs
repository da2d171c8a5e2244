//! Testing utilities for the provider.
//!
//! [`ProviderTester`] drives any [`ProviderService`] through plan and CRUD
//! calls without a host. [`FakeManagementApi`] stands in for the Storyblok
//! management API so the provider can be exercised end to end in memory.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use storyblok_provider::testing::{FakeManagementApi, ProviderTester};
//! use storyblok_provider::StoryblokProvider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_folder() {
//!     let api = Arc::new(FakeManagementApi::new());
//!     let tester = ProviderTester::new(StoryblokProvider::with_api(api.clone()));
//!
//!     let state = tester
//!         .lifecycle_create("storyblok_asset_folder", json!({"space_id": 1, "name": "img"}))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(state["id"], "1/1");
//! }
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::client::types::{AssetFolder, Component, ComponentGroup, SpaceRole, Webhook};
use crate::client::{ApiRequest, Entity, ManagementApi, RawResponse};
use crate::error::ProviderError;
use crate::schema::{Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// A test harness around a [`ProviderService`].
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the sorted resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Validate provider configuration, failing on error diagnostics.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider, failing on error diagnostics.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Validate a resource configuration, failing on error diagnostics.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, proposed_state.clone(), proposed_state)
            .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(
                resource_type,
                Some(prior_state),
                proposed_state.clone(),
                proposed_state,
            )
            .await
    }

    /// Plan a resource deletion.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a new resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource by its composite identifier.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Plan, create and read back a resource. Returns the state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self.plan_create(resource_type, config).await?;
        let created = self.create(resource_type, plan.planned_state).await?;
        self.read(resource_type, created).await
    }

    /// Plan, update and read back a resource. Returns the state after read.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self
            .plan_update(resource_type, prior_state.clone(), proposed_state)
            .await?;
        let updated = self
            .update(resource_type, prior_state, plan.planned_state)
            .await?;
        self.read(resource_type, updated).await
    }

    /// Plan the deletion, then delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.plan_delete(resource_type, current_state.clone())
            .await?;
        self.delete(resource_type, current_state).await
    }

    /// Create, update and delete a resource.
    ///
    /// Returns the state after the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created = self.lifecycle_create(resource_type, initial_config).await?;
        let updated = self
            .lifecycle_update(resource_type, created, updated_config)
            .await?;
        self.lifecycle_delete(resource_type, updated.clone()).await?;
        Ok(updated)
    }
}

/// Failure of a tester call that reports diagnostics.
#[derive(Debug, Error)]
pub enum TestError {
    /// The call returned error diagnostics.
    #[error("operation failed with diagnostics: {}", summarize(.0))]
    Diagnostics(Vec<Diagnostic>),
    /// The call failed outright.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| {
            let mut line = d.summary.clone();
            if let Some(detail) = &d.detail {
                line.push_str(": ");
                line.push_str(detail);
            }
            if let Some(attr) = &d.attribute {
                line.push_str(&format!(" (at {})", attr));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics
        .into_iter()
        .filter(|d| d.is_error())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan changes nothing.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan changes `path`.
///
/// # Panics
///
/// Panics if no change has the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    assert!(
        plan.changes.iter().any(|c| c.path == path),
        "Expected plan to change attribute '{}'. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain an error whose summary contains `substring`.
///
/// # Panics
///
/// Panics if no error diagnostic matches.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.is_error())
        .collect();

    assert!(
        errors.iter().any(|d| d.summary.contains(substring)),
        "Expected an error containing '{}'. Errors: {:?}",
        substring,
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

// =========================================================================
// Fake Management API
// =========================================================================

const FAKE_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

/// An in-memory management API.
///
/// Entities live under `/v1/spaces/{space}/{collection}/{id}` and get
/// sequential ids starting at 1. Status codes follow the real API: `201` for
/// creates, `204` without a body for asset folder updates and for webhook
/// and asset folder deletes, `404` for unknown ids. Webhook secrets are
/// accepted but never returned.
#[derive(Debug, Default)]
pub struct FakeManagementApi {
    state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: i64,
    entities: BTreeMap<String, Value>,
    requests: Vec<ApiRequest>,
    canned: VecDeque<RawResponse>,
}

struct Route<'a> {
    space_id: i64,
    collection: &'a str,
    envelope: &'static str,
    id: Option<i64>,
}

impl<'a> Route<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let mut segments = path.strip_prefix("/v1/spaces/")?.split('/');
        let space_id = segments.next()?.parse().ok()?;
        let collection = segments.next()?;
        let envelope = envelope_of(collection)?;
        let id = match segments.next() {
            Some(id) => Some(id.parse().ok()?),
            None => None,
        };
        if segments.next().is_some() {
            return None;
        }
        Some(Self {
            space_id,
            collection,
            envelope,
            id,
        })
    }

    fn key(&self, id: i64) -> String {
        entity_key(self.space_id, self.collection, id)
    }
}

fn envelope_of(collection: &str) -> Option<&'static str> {
    const ENTITIES: [(&str, &str); 5] = [
        (Component::COLLECTION, Component::ENVELOPE),
        (ComponentGroup::COLLECTION, ComponentGroup::ENVELOPE),
        (SpaceRole::COLLECTION, SpaceRole::ENVELOPE),
        (AssetFolder::COLLECTION, AssetFolder::ENVELOPE),
        (Webhook::COLLECTION, Webhook::ENVELOPE),
    ];
    ENTITIES
        .iter()
        .find(|(c, _)| *c == collection)
        .map(|(_, envelope)| *envelope)
}

fn entity_key(space_id: i64, collection: &str, id: i64) -> String {
    format!("{}/{}/{}", space_id, collection, id)
}

fn empty(status: StatusCode) -> RawResponse {
    RawResponse::new(status, Vec::new())
}

fn enveloped(status: StatusCode, envelope: &str, entity: &Value) -> RawResponse {
    let body = json!({ envelope: entity }).to_string();
    RawResponse::new(status, body.into_bytes())
}

fn request_entity(request: &ApiRequest, envelope: &str) -> Option<Map<String, Value>> {
    let body: Value = serde_json::from_slice(request.body.as_deref()?).ok()?;
    match body.get(envelope)? {
        Value::Object(entity) => Some(entity.clone()),
        _ => None,
    }
}

impl FakeManagementApi {
    /// Create an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer the next request with `status` and `body` instead of handling it.
    ///
    /// Canned responses are used in the order they were queued.
    pub fn respond_with(&self, status: StatusCode, body: &str) {
        self.lock()
            .canned
            .push_back(RawResponse::new(status, body.as_bytes().to_vec()));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// The stored entity, without its envelope.
    pub fn stored(&self, space_id: i64, collection: &str, id: i64) -> Option<Value> {
        self.lock()
            .entities
            .get(&entity_key(space_id, collection, id))
            .cloned()
    }

    fn handle(state: &mut FakeState, request: &ApiRequest) -> RawResponse {
        let Some(route) = Route::parse(&request.path) else {
            return empty(StatusCode::NOT_FOUND);
        };

        match (&request.method, route.id) {
            (&Method::POST, None) => Self::create(state, &route, request),
            (&Method::GET, Some(id)) => match state.entities.get(&route.key(id)) {
                Some(entity) => enveloped(StatusCode::OK, route.envelope, entity),
                None => empty(StatusCode::NOT_FOUND),
            },
            (&Method::PUT, Some(id)) => Self::update(state, &route, id, request),
            (&Method::DELETE, Some(id)) => match state.entities.remove(&route.key(id)) {
                None => empty(StatusCode::NOT_FOUND),
                Some(_)
                    if route.collection == Webhook::COLLECTION
                        || route.collection == AssetFolder::COLLECTION =>
                {
                    empty(StatusCode::NO_CONTENT)
                }
                Some(entity) => enveloped(StatusCode::OK, route.envelope, &entity),
            },
            _ => empty(StatusCode::METHOD_NOT_ALLOWED),
        }
    }

    fn create(state: &mut FakeState, route: &Route<'_>, request: &ApiRequest) -> RawResponse {
        let Some(mut entity) = request_entity(request, route.envelope) else {
            return empty(StatusCode::UNPROCESSABLE_ENTITY);
        };
        state.next_id += 1;
        let id = state.next_id;

        entity.insert("id".to_string(), json!(id));
        entity.remove("secret");
        match route.collection {
            Component::COLLECTION => {
                entity.insert("created_at".to_string(), json!(FAKE_TIMESTAMP));
            }
            ComponentGroup::COLLECTION => {
                let uuid = format!("00000000-0000-4000-8000-{:012}", id);
                entity.insert("uuid".to_string(), json!(uuid));
                entity.insert("created_at".to_string(), json!(FAKE_TIMESTAMP));
                entity.insert("updated_at".to_string(), json!(FAKE_TIMESTAMP));
            }
            _ => {}
        }

        let entity = Value::Object(entity);
        let response = enveloped(StatusCode::CREATED, route.envelope, &entity);
        state.entities.insert(route.key(id), entity);
        response
    }

    fn update(
        state: &mut FakeState,
        route: &Route<'_>,
        id: i64,
        request: &ApiRequest,
    ) -> RawResponse {
        let key = route.key(id);
        let Some(existing) = state.entities.get(&key) else {
            return empty(StatusCode::NOT_FOUND);
        };
        let Some(mut entity) = request_entity(request, route.envelope) else {
            return empty(StatusCode::UNPROCESSABLE_ENTITY);
        };

        for kept in ["id", "created_at", "uuid", "updated_at"] {
            if let Some(value) = existing.get(kept) {
                entity.insert(kept.to_string(), value.clone());
            }
        }
        entity.remove("secret");

        let entity = Value::Object(entity);
        let response = if route.collection == AssetFolder::COLLECTION {
            empty(StatusCode::NO_CONTENT)
        } else {
            enveloped(StatusCode::OK, route.envelope, &entity)
        };
        state.entities.insert(key, entity);
        response
    }
}

#[async_trait]
impl ManagementApi for FakeManagementApi {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ProviderError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if let Some(canned) = state.canned.pop_front() {
            return Ok(canned);
        }
        Ok(Self::handle(&mut state, &request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ManagementClient;
    use crate::provider::StoryblokProvider;
    use std::sync::Arc;

    fn folder_request(method: Method, path: &str, name: &str) -> ApiRequest {
        ApiRequest::new(method, path)
            .with_json(&json!({"asset_folder": {"name": name}}))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fake_assigns_ids_and_statuses() {
        let api = FakeManagementApi::new();

        let created = api
            .execute(folder_request(Method::POST, "/v1/spaces/3/asset_folders", "a"))
            .await
            .unwrap();
        assert_eq!(created.status, StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&created.body).unwrap();
        assert_eq!(body, json!({"asset_folder": {"name": "a", "id": 1}}));

        let updated = api
            .execute(folder_request(Method::PUT, "/v1/spaces/3/asset_folders/1", "b"))
            .await
            .unwrap();
        assert_eq!(updated.status, StatusCode::NO_CONTENT);
        assert!(updated.body.is_empty());
        assert_eq!(
            api.stored(3, "asset_folders", 1),
            Some(json!({"name": "b", "id": 1}))
        );

        let missing = api
            .execute(ApiRequest::new(Method::GET, "/v1/spaces/4/asset_folders/1"))
            .await
            .unwrap();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let deleted = api
            .execute(ApiRequest::new(Method::DELETE, "/v1/spaces/3/asset_folders/1"))
            .await
            .unwrap();
        assert_eq!(deleted.status, StatusCode::NO_CONTENT);
        assert_eq!(api.stored(3, "asset_folders", 1), None);
        assert_eq!(api.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_fake_group_gets_uuid_and_webhook_hides_secret() {
        let api = Arc::new(FakeManagementApi::new());
        let client = ManagementClient::new(api.clone());

        let group = client
            .create::<ComponentGroup>(1, &json!({"component_group": {"name": "Layout"}}))
            .await
            .unwrap();
        let group = group.entity().unwrap();
        assert_eq!(group.uuid.to_string(), "00000000-0000-4000-8000-000000000001");

        let hook = client
            .create::<Webhook>(
                1,
                &json!({"webhook_endpoint": {"name": "deploy", "secret": "s3cr3t"}}),
            )
            .await
            .unwrap();
        assert_eq!(hook.entity().unwrap().secret, None);
        assert_eq!(api.stored(1, "webhook_endpoints", 2).unwrap()["name"], "deploy");
    }

    #[tokio::test]
    async fn test_fake_canned_responses_come_first() {
        let api = FakeManagementApi::new();
        api.respond_with(StatusCode::TOO_MANY_REQUESTS, "slow down");

        let first = api
            .execute(ApiRequest::new(Method::GET, "/v1/spaces/1/components/1"))
            .await
            .unwrap();
        assert_eq!(first.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(first.body, b"slow down");

        let second = api
            .execute(ApiRequest::new(Method::GET, "/v1/spaces/1/components/1"))
            .await
            .unwrap();
        assert_eq!(second.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_fake_rejects_unknown_paths() {
        let api = FakeManagementApi::new();
        for path in [
            "/v1/spaces/1/stories",
            "/v2/spaces/1/components",
            "/v1/spaces/x/components",
            "/v1/spaces/1/components/2/extra",
        ] {
            let response =
                tokio_test::block_on(api.execute(ApiRequest::new(Method::GET, path))).unwrap();
            assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_tester_lifecycle_crud() {
        let api = Arc::new(FakeManagementApi::new());
        let tester = ProviderTester::new(StoryblokProvider::with_api(api.clone()));

        let final_state = tester
            .lifecycle_crud(
                "storyblok_component_group",
                json!({"space_id": 5, "name": "Layout"}),
                json!({"space_id": 5, "name": "Sections"}),
            )
            .await
            .unwrap();

        assert_eq!(final_state["name"], "Sections");
        assert_eq!(final_state["id"], "5/1");
        assert_eq!(api.stored(5, "component_groups", 1), None);
    }

    #[tokio::test]
    async fn test_tester_plan_update_no_changes() {
        let tester = ProviderTester::new(StoryblokProvider::with_api(Arc::new(
            FakeManagementApi::new(),
        )));
        let config = json!({"space_id": 5, "name": "images"});
        let state = tester
            .lifecycle_create("storyblok_asset_folder", config.clone())
            .await
            .unwrap();

        let plan = tester
            .plan_update("storyblok_asset_folder", state, config)
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }

    #[test]
    fn test_check_diagnostics_ignores_warnings() {
        assert!(check_diagnostics(vec![Diagnostic::warning("Just a warning")]).is_ok());
        assert!(matches!(
            check_diagnostics(vec![Diagnostic::error("An error")]),
            Err(TestError::Diagnostics(errors)) if errors.len() == 1
        ));
    }

    #[test]
    #[should_panic(expected = "Expected no changes")]
    fn test_assert_plan_no_changes_fails() {
        let plan = PlanResult::with_changes(
            json!({"name": "b"}),
            vec![crate::types::AttributeChange::modified("name", json!("a"), json!("b"))],
            false,
        );
        assert_plan_no_changes(&plan);
    }

    #[test]
    fn test_assert_error_contains() {
        let diagnostics = vec![Diagnostic::error("Invalid Storyblok API URL")];
        assert_error_contains(&diagnostics, "API URL");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("url"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = err.to_string();
        assert!(display.contains("First error (at url)"));
        assert!(display.contains("Second error: More info"));
    }
}
