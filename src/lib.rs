//! Storyblok Provider
//!
//! This crate manages the configuration of a [Storyblok](https://www.storyblok.com)
//! space as infrastructure: components, component groups, space roles, asset
//! folders and webhooks are declared as resources and reconciled through the
//! Storyblok management API.
//!
//! # Overview
//!
//! - **Identifiers**: every entity is addressed by a composite
//!   `"<space_id>/<resource_id>"` token, see [`identifier`]
//! - **Field ordering**: component fields are sent to the API sorted by their
//!   `position`, see [`ordering`]
//! - **Resources**: the state mapping of each entity kind, see [`resources`]
//! - **ProviderService trait**: the plan and CRUD entry points the host calls
//! - **Logging**: structured logging with `tracing`, written to stderr
//!
//! # Quick Start
//!
//! ```ignore
//! use storyblok_provider::{ProviderService, StoryblokProvider};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     storyblok_provider::init_logging();
//!
//!     let provider = StoryblokProvider::default();
//!     provider.configure(json!({"token": "..."})).await?;
//!
//!     let state = provider
//!         .create(
//!             "storyblok_asset_folder",
//!             json!({"space_id": 233252, "name": "images"}),
//!         )
//!         .await?;
//!     println!("created {}", state["id"]);
//!     Ok(())
//! }
//! ```
//!
//! # Resource Types
//!
//! - `storyblok_component`
//! - `storyblok_component_group`
//! - `storyblok_space_role`
//! - `storyblok_asset_folder`
//! - `storyblok_webhook`
//!
//! # Configuration
//!
//! The provider block takes an optional `url` and `token`. They fall back to
//! `STORYBLOK_URL` and `STORYBLOK_TOKEN`; the URL finally defaults to
//! `https://mapi.storyblok.com`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod ordering;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use config::{ProviderConfig, ProviderOptions};
pub use error::ProviderError;
pub use identifier::CompositeId;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use ordering::order_fields;
pub use provider::StoryblokProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult};
pub use validation::{is_valid, validate};

// Re-export async_trait for implementing ProviderService
pub use async_trait::async_trait;

// Re-export commonly used dependencies
pub use serde_json;
pub use tracing;
