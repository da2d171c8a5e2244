//! Typed access to the Storyblok management API.
//!
//! The transport is a single [`ManagementApi::execute`] call so tests can swap
//! the HTTP client for an in-memory fake. [`ManagementClient`] layers the
//! typed create/get/update/delete calls for each [`Entity`] on top of it.

mod http;
#[allow(missing_docs)]
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ProviderError;

pub use http::{HttpClient, HttpClientBuilder, RetryPolicy, TrafficObserver};

/// A request against the management API, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path starting with `/v1/`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ProviderError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

/// A response as it came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Status and body accessors shared by every response type.
pub trait ApiResult {
    /// The HTTP status of the response.
    fn status_code(&self) -> StatusCode;

    /// The raw response body.
    fn body(&self) -> &[u8];
}

impl ApiResult for RawResponse {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

/// The transport used to reach the management API.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Send a request and return the response, whatever its status.
    ///
    /// Errors are reserved for requests that never produced a response.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ProviderError>;
}

/// An entity kind of the management API.
pub trait Entity: DeserializeOwned + Send + 'static {
    /// Name used in error messages, e.g. `component group`.
    const NAME: &'static str;
    /// Path segment of the collection, e.g. `component_groups`.
    const COLLECTION: &'static str;
    /// Key that wraps the entity in request and response bodies.
    const ENVELOPE: &'static str;
}

/// A response with its entity decoded.
#[derive(Debug, Clone)]
pub struct ApiResponse<E> {
    status: StatusCode,
    body: Vec<u8>,
    entity: Option<E>,
}

impl<E: Entity> ApiResponse<E> {
    /// Decode the enveloped entity of a successful response.
    ///
    /// Non-success responses and empty bodies decode to no entity so the
    /// caller can report the status together with the body.
    pub fn decode(raw: RawResponse) -> Result<Self, ProviderError> {
        let entity = if raw.status.is_success() && !raw.body.is_empty() {
            let mut value: serde_json::Value = serde_json::from_slice(&raw.body)?;
            match value.get_mut(E::ENVELOPE).map(serde_json::Value::take) {
                None | Some(serde_json::Value::Null) => None,
                Some(inner) => Some(serde_json::from_value(inner)?),
            }
        } else {
            None
        };
        Ok(Self {
            status: raw.status,
            body: raw.body,
            entity,
        })
    }

    /// The decoded entity, if the response carried one.
    pub fn entity(&self) -> Option<&E> {
        self.entity.as_ref()
    }
}

impl<E> ApiResult for ApiResponse<E> {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Typed calls for every entity kind.
#[derive(Clone)]
pub struct ManagementClient {
    api: Arc<dyn ManagementApi>,
}

impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient").finish_non_exhaustive()
    }
}

impl ManagementClient {
    /// Wrap a transport.
    pub fn new(api: Arc<dyn ManagementApi>) -> Self {
        Self { api }
    }

    fn collection<E: Entity>(space_id: i64) -> String {
        format!("/v1/spaces/{}/{}", space_id, E::COLLECTION)
    }

    fn member<E: Entity>(space_id: i64, id: i64) -> String {
        format!("{}/{}", Self::collection::<E>(space_id), id)
    }

    /// `POST /v1/spaces/{space}/{collection}`.
    pub async fn create<E: Entity>(
        &self,
        space_id: i64,
        input: &(impl Serialize + Sync),
    ) -> Result<ApiResponse<E>, ProviderError> {
        let request =
            ApiRequest::new(Method::POST, Self::collection::<E>(space_id)).with_json(input)?;
        ApiResponse::decode(self.api.execute(request).await?)
    }

    /// `GET /v1/spaces/{space}/{collection}/{id}`.
    pub async fn get<E: Entity>(
        &self,
        space_id: i64,
        id: i64,
    ) -> Result<ApiResponse<E>, ProviderError> {
        let request = ApiRequest::new(Method::GET, Self::member::<E>(space_id, id));
        ApiResponse::decode(self.api.execute(request).await?)
    }

    /// `PUT /v1/spaces/{space}/{collection}/{id}`.
    pub async fn update<E: Entity>(
        &self,
        space_id: i64,
        id: i64,
        input: &(impl Serialize + Sync),
    ) -> Result<ApiResponse<E>, ProviderError> {
        let request =
            ApiRequest::new(Method::PUT, Self::member::<E>(space_id, id)).with_json(input)?;
        ApiResponse::decode(self.api.execute(request).await?)
    }

    /// `DELETE /v1/spaces/{space}/{collection}/{id}`.
    pub async fn delete<E: Entity>(
        &self,
        space_id: i64,
        id: i64,
    ) -> Result<RawResponse, ProviderError> {
        let request = ApiRequest::new(Method::DELETE, Self::member::<E>(space_id, id));
        self.api.execute(request).await
    }
}
