//! Akeneo PIM provider
//!
//! Manages the catalog structure of an Akeneo PIM (attributes, attribute
//! options and groups, categories, channels, families, family variants,
//! association types and measurement families) as declarative resources
//! driven by an infrastructure-as-code host.
//!
//! # Overview
//!
//! - [`akeneo`]: REST client for the Akeneo API and its wire types
//! - [`resources`]: one module per managed resource type
//! - [`provider`]: [`AkeneoProvider`], which wires the resources to the client
//! - [`server`]: the [`ProviderService`] trait and the transport that serves it
//! - [`schema`], [`validation`]: schema description and config validation
//! - [`testing`]: helpers for driving a provider through its lifecycle in tests
//!
//! # Quick Start
//!
//! ```ignore
//! use terraform_provider_akeneo::{init_logging, serve, AkeneoProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(AkeneoProvider::new()).await
//! }
//! ```
//!
//! # Handshake Protocol
//!
//! When the provider starts via [`serve`], it prints one line to stdout:
//!
//! ```text
//! AKENEO_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `AKENEO_PROVIDER|<protocol_version>|<address>`
//!
//! The host then connects to the address and exchanges newline-delimited JSON
//! requests (see [`server`] for the message shapes).
//!
//! # Provider Protocol
//!
//! - **get_metadata**: provider version and resource type names
//! - **get_schema**: schema for the provider config and every resource
//! - **validate_provider_config** / **configure**: check and apply credentials
//! - **stop**: release the API client
//! - **validate_resource_config**: check a resource's configuration
//! - **upgrade_resource_state**: migrate state from older schema versions
//! - **plan**: compute changes and replacements
//! - **create** / **read** / **update** / **delete**: resource CRUD
//! - **import_resource_state**: adopt an existing Akeneo entity

#![warn(clippy::all)]

pub mod akeneo;
pub mod error;
pub mod identity;
pub mod logging;
pub mod mapping;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;
pub mod validators;
pub mod value;

// Re-export main types at crate root
pub use akeneo::{AkeneoClient, Credentials};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{AkeneoProvider, ProviderConfig};
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, HANDSHAKE_PREFIX,
    PROTOCOL_VERSION,
};
pub use validation::validate;

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
