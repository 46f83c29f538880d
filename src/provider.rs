//! The Akeneo provider.
//!
//! Holds the provider configuration, the API client installed by `configure`,
//! and the registry of resource types every lifecycle call is routed to.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::akeneo::{AkeneoClient, Credentials};
use crate::error::ProviderError;
use crate::resources::{
    AssociationTypeResource, AttributeGroupResource, AttributeOptionResource, AttributeResource,
    CategoryResource, ChannelResource, FamilyResource, FamilyVariantResource, ManagedResource,
    MeasurementFamilyResource, ResourceAdapter,
};
use crate::schema::{has_errors, Attribute, Diagnostic, ProviderSchema, Schema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProviderMetadata};
use crate::validation;
use crate::validators::Validator;

/// The provider configuration block.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub host: String,
    pub unsecure_api: Option<bool>,
    pub api_username: String,
    pub api_password: String,
    pub api_client_id: String,
    pub api_client_secret: String,
    pub extra_attribute_types: Option<Vec<String>>,
}

impl ProviderConfig {
    fn credentials(&self) -> Credentials {
        Credentials {
            username: self.api_username.clone(),
            password: self.api_password.clone(),
            client_id: self.api_client_id.clone(),
            client_secret: self.api_client_secret.clone(),
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("unsecure_api", &self.unsecure_api)
            .field("extra_attribute_types", &self.extra_attribute_types)
            .finish_non_exhaustive()
    }
}

/// Schema of the provider configuration block.
pub fn provider_config_schema() -> Schema {
    Schema::v0()
        .with_description("Akeneo PIM provider")
        .with_attribute(
            "host",
            Attribute::required_string()
                .sensitive()
                .with_description("Akeneo host, without scheme (e.g. pim.example.com)"),
        )
        .with_attribute(
            "unsecure_api",
            Attribute::optional_bool().with_description("Use http instead of https"),
        )
        .with_attribute(
            "api_username",
            Attribute::required_string()
                .sensitive()
                .with_description("API user name"),
        )
        .with_attribute(
            "api_password",
            Attribute::required_string()
                .sensitive()
                .with_description("API user password"),
        )
        .with_attribute(
            "api_client_id",
            Attribute::required_string()
                .sensitive()
                .with_description("API connection client id"),
        )
        .with_attribute(
            "api_client_secret",
            Attribute::required_string()
                .sensitive()
                .with_description("API connection client secret"),
        )
        .with_attribute(
            "extra_attribute_types",
            Attribute::optional_string_list()
                .with_description("Attribute types accepted in addition to the built-in PIM types")
                .with_validator(Validator::ListValuesLengthAtLeast { min: 1 }),
        )
}

fn known_string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Akeneo PIM provider.
pub struct AkeneoProvider {
    client: RwLock<Option<Arc<AkeneoClient>>>,
    extra_attribute_types: RwLock<Vec<String>>,
    resources: BTreeMap<&'static str, Box<dyn ManagedResource>>,
}

impl Default for AkeneoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AkeneoProvider {
    /// Create an unconfigured provider with every resource type registered.
    pub fn new() -> Self {
        let mut provider = Self {
            client: RwLock::new(None),
            extra_attribute_types: RwLock::new(Vec::new()),
            resources: BTreeMap::new(),
        };
        provider.register(ResourceAdapter::new(AttributeResource));
        provider.register(ResourceAdapter::new(AttributeOptionResource));
        provider.register(ResourceAdapter::new(AttributeGroupResource));
        provider.register(ResourceAdapter::new(CategoryResource));
        provider.register(ResourceAdapter::new(ChannelResource));
        provider.register(ResourceAdapter::new(FamilyResource));
        provider.register(ResourceAdapter::new(FamilyVariantResource));
        provider.register(ResourceAdapter::new(AssociationTypeResource));
        provider.register(ResourceAdapter::new(MeasurementFamilyResource));
        provider
    }

    /// Install an already authenticated client, skipping `configure`.
    pub fn with_client(self, client: AkeneoClient) -> Self {
        Self {
            client: RwLock::new(Some(Arc::new(client))),
            ..self
        }
    }

    fn register<R: ManagedResource + 'static>(&mut self, resource: R) {
        self.resources.insert(resource.type_name(), Box::new(resource));
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn ManagedResource, ProviderError> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    async fn client(&self) -> Result<Arc<AkeneoClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "The provider has not been configured. Configure it before managing resources."
                    .to_string(),
            )
        })
    }
}

#[async_trait::async_trait]
impl ProviderService for AkeneoProvider {
    fn schema(&self) -> ProviderSchema {
        self.resources.values().fold(
            ProviderSchema::new().with_provider_config(provider_config_schema()),
            |schema, resource| schema.with_resource(resource.type_name(), resource.schema()),
        )
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources: self.resources.keys().map(|k| k.to_string()).collect(),
        }
    }

    /// Validate the provider config and remember its `extra_attribute_types`.
    ///
    /// Hosts may validate resources before `configure` runs, so the list is
    /// taken from here as well.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = validation::validate(&provider_config_schema(), &config);
        if let Some(extra) = known_string_list(config.get("extra_attribute_types")) {
            *self.extra_attribute_types.write().await = extra;
        }
        Ok(diagnostics)
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = validation::validate(&provider_config_schema(), &config);
        if has_errors(&diagnostics) {
            return Ok(diagnostics);
        }

        let config: ProviderConfig = serde_json::from_value(config).map_err(|e| {
            ProviderError::Configuration(format!("Unable to decode provider configuration: {}", e))
        })?;
        if config.host.is_empty() || config.host == crate::value::UNKNOWN_SENTINEL {
            return Err(ProviderError::Configuration(
                "host must be known when configuring the provider".to_string(),
            ));
        }
        debug!(config = ?config, "Configuring provider");

        let client = AkeneoClient::connect(
            &config.host,
            config.unsecure_api.unwrap_or(false),
            &config.credentials(),
        )
        .await
        .map_err(|e| {
            ProviderError::Configuration(format!(
                "Unable to create an Akeneo API client: {}",
                e.message()
            ))
        })?;

        *self.client.write().await = Some(Arc::new(client));
        *self.extra_attribute_types.write().await =
            config.extra_attribute_types.unwrap_or_default();

        info!(host = %config.host, "Provider configured");
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        if self.client.write().await.take().is_some() {
            debug!("Released Akeneo client");
        }
        Ok(())
    }

    /// Unrecognized attribute types are checked against the
    /// `extra_attribute_types` seen by the latest `validate_provider_config`
    /// or `configure` call.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let extra = self.extra_attribute_types.read().await;
        Ok(resource.validate(&config, &extra))
    }

    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        self.resource(resource_type)?;
        if version != 0 {
            warn!(resource_type, version, "Refusing to upgrade unknown state version");
            return Err(ProviderError::Unsupported(format!(
                "state version {} of {} is not supported",
                version, resource_type
            )));
        }
        Ok(state)
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        if proposed_state.is_null() {
            // Destroy plan; the delete itself is refused
            return Ok(PlanResult::no_change(Value::Null));
        }
        resource.plan(prior_state.as_ref(), proposed_state)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.create(&client, planned_state).await
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.read(&client, current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        _prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.update(&client, planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        self.resource(resource_type)?.delete(current_state)
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let state = self.resource(resource_type)?.import(id)?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }
}
