//! Akeneo resource types and the lifecycle they share.
//!
//! Each entity implements [`AkeneoResource`]: its schema, its model, how the
//! model maps to and from the wire struct, and which endpoints it talks to.
//! [`ResourceAdapter`] runs the create/read/update/delete/import/plan
//! lifecycle for any of them and exposes it as a [`ManagedResource`], the
//! object-safe form the provider dispatches to.

mod association_type;
mod attribute;
mod attribute_group;
mod attribute_option;
mod category;
mod channel;
mod family;
mod family_variant;
mod measurement_family;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::akeneo::AkeneoClient;
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::schema::{Diagnostic, Schema};
use crate::types::{AttributeChange, PlanResult};
use crate::validation;
use crate::value::{TfValue, UNKNOWN_SENTINEL};

pub use association_type::{AssociationTypeModel, AssociationTypeResource};
pub use attribute::{AttributeModel, AttributeResource};
pub use attribute_group::{AttributeGroupModel, AttributeGroupResource};
pub use attribute_option::{AttributeOptionModel, AttributeOptionResource};
pub use category::{CategoryModel, CategoryResource};
pub use channel::{ChannelModel, ChannelResource};
pub use family::{FamilyModel, FamilyResource};
pub use family_variant::{FamilyVariantModel, FamilyVariantResource, VariantAttributeSetModel};
pub use measurement_family::{
    MeasurementFamilyModel, MeasurementFamilyResource, MeasurementUnitConversionModel,
    MeasurementUnitModel,
};

/// How a new entity is submitted to Akeneo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// POST to the collection path.
    Post,
    /// PATCH to the entity path, which creates or updates.
    PatchUpsert,
}

/// One Akeneo entity type.
#[async_trait]
pub trait AkeneoResource: Send + Sync + 'static {
    /// Configuration/state model.
    type Model: Serialize + DeserializeOwned + Default + Send + Sync;
    /// Wire struct.
    type Api: Send + Sync;

    /// Host type name, e.g. `akeneo_attribute_option`.
    fn type_name(&self) -> &'static str;

    /// Entity name used in messages, e.g. `attribute option`.
    fn entity(&self) -> &'static str;

    /// Endpoint used to create a new entity.
    fn create_mode(&self) -> CreateMode;

    /// Component names of the import identifier.
    fn import_fields(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn schema(&self) -> Schema;

    /// Identity of the entity described by `model`.
    fn key(&self, model: &Self::Model) -> Result<ImportKey, ProviderError>;

    /// Identity-only model for an imported entity.
    fn import_model(&self, key: &ImportKey) -> Self::Model;

    fn to_api(&self, model: &Self::Model) -> Result<Self::Api, ProviderError>;

    /// Overwrite model fields with the values Akeneo returned.
    fn merge_api(&self, model: &mut Self::Model, api: Self::Api) -> Result<(), ProviderError>;

    /// Checks beyond the schema, run at validation time.
    fn validate_config(&self, config: &Value, extra_attribute_types: &[String]) -> Vec<Diagnostic> {
        let _ = (config, extra_attribute_types);
        Vec::new()
    }

    async fn fetch(&self, client: &AkeneoClient, key: &ImportKey)
        -> Result<Self::Api, ProviderError>;

    /// Submit a new entity with POST. Only used in [`CreateMode::Post`].
    async fn post(&self, client: &AkeneoClient, api: &Self::Api) -> Result<(), ProviderError> {
        let _ = (client, api);
        Err(ProviderError::Unsupported(format!(
            "{} cannot be created with POST",
            self.type_name()
        )))
    }

    /// Submit changes with PATCH. `action` is the verb of the running
    /// operation, for resources that build their own diagnostics.
    async fn patch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
        api: &Self::Api,
        action: &str,
    ) -> Result<(), ProviderError>;
}

/// Lifecycle operations of a resource type, independent of its model.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Validate configuration against the schema and resource-specific rules.
    fn validate(&self, config: &Value, extra_attribute_types: &[String]) -> Vec<Diagnostic>;

    /// Diff proposed state against prior state.
    fn plan(&self, prior: Option<&Value>, proposed: Value) -> Result<PlanResult, ProviderError>;

    async fn create(&self, client: &AkeneoClient, planned: Value) -> Result<Value, ProviderError>;

    async fn read(&self, client: &AkeneoClient, current: Value) -> Result<Value, ProviderError>;

    async fn update(&self, client: &AkeneoClient, planned: Value) -> Result<Value, ProviderError>;

    /// Akeneo cannot delete configuration entities; always fails.
    fn delete(&self, current: Value) -> Result<(), ProviderError>;

    /// Build identity-only state from an import identifier.
    fn import(&self, id: &str) -> Result<Value, ProviderError>;
}

/// Runs the shared lifecycle for one [`AkeneoResource`].
pub struct ResourceAdapter<R> {
    resource: R,
}

impl<R: AkeneoResource> ResourceAdapter<R> {
    pub fn new(resource: R) -> Self {
        Self { resource }
    }

    fn decode(&self, value: Value) -> Result<R::Model, ProviderError> {
        Ok(serde_json::from_value(value)?)
    }

    fn encode(&self, model: &R::Model) -> Result<Value, ProviderError> {
        let mut value = serde_json::to_value(model)?;
        resolve_unknowns(&mut value);
        Ok(value)
    }

    fn failure(&self, action: &str, err: ProviderError) -> ProviderError {
        operation_failure(action, self.resource.entity(), err)
    }

    /// Submit the model, then re-read it so state reflects what Akeneo stored.
    async fn apply(
        &self,
        client: &AkeneoClient,
        planned: Value,
        mode: CreateMode,
        action: &str,
    ) -> Result<Value, ProviderError> {
        let mut model = self.decode(planned)?;
        let key = self.resource.key(&model)?;
        let api = self.resource.to_api(&model)?;

        debug!(resource_type = self.resource.type_name(), key = %key, ?mode, "Submitting entity");
        let submitted = match mode {
            CreateMode::Post => self.resource.post(client, &api).await,
            CreateMode::PatchUpsert => self.resource.patch(client, &key, &api, action).await,
        };
        submitted.map_err(|e| self.failure(action, e))?;

        let stored = self
            .resource
            .fetch(client, &key)
            .await
            .map_err(|e| self.failure("reading", e))?;
        self.resource.merge_api(&mut model, stored)?;

        info!(resource_type = self.resource.type_name(), key = %key, "Entity {}", past(action));
        self.encode(&model)
    }
}

#[async_trait]
impl<R: AkeneoResource> ManagedResource for ResourceAdapter<R> {
    fn type_name(&self) -> &'static str {
        self.resource.type_name()
    }

    fn schema(&self) -> Schema {
        self.resource.schema()
    }

    fn validate(&self, config: &Value, extra_attribute_types: &[String]) -> Vec<Diagnostic> {
        let mut diagnostics = validation::validate(&self.resource.schema(), config);
        diagnostics.extend(
            self.resource
                .validate_config(config, extra_attribute_types),
        );
        diagnostics
    }

    fn plan(&self, prior: Option<&Value>, proposed: Value) -> Result<PlanResult, ProviderError> {
        plan_changes(&self.resource.schema(), prior, proposed)
    }

    async fn create(&self, client: &AkeneoClient, planned: Value) -> Result<Value, ProviderError> {
        self.apply(client, planned, self.resource.create_mode(), "creating")
            .await
    }

    async fn read(&self, client: &AkeneoClient, current: Value) -> Result<Value, ProviderError> {
        let mut model = self.decode(current)?;
        let key = self.resource.key(&model)?;
        let stored = self
            .resource
            .fetch(client, &key)
            .await
            .map_err(|e| self.failure("reading", e))?;
        self.resource.merge_api(&mut model, stored)?;
        self.encode(&model)
    }

    async fn update(&self, client: &AkeneoClient, planned: Value) -> Result<Value, ProviderError> {
        self.apply(client, planned, CreateMode::PatchUpsert, "updating")
            .await
    }

    fn delete(&self, _current: Value) -> Result<(), ProviderError> {
        Err(ProviderError::Diagnostics(vec![Diagnostic::error(
            "This resource does not support deletes",
        )
        .with_detail(format!(
            "This resource does not support deletes. The Akeneo API does not support deletes for {}.",
            plural(self.resource.entity())
        ))]))
    }

    fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let key = ImportKey::parse(id, self.resource.import_fields())?;
        self.encode(&self.resource.import_model(&key))
    }
}

/// Wrap a failed Akeneo call in the operation's diagnostic.
///
/// Prepared diagnostics pass through unchanged.
pub fn operation_failure(action: &str, entity: &str, err: ProviderError) -> ProviderError {
    if let ProviderError::Diagnostics(_) = err {
        return err;
    }
    ProviderError::Diagnostics(vec![Diagnostic::error(format!(
        "Error while {} {}",
        action,
        with_article(entity)
    ))
    .with_detail(format!(
        "An unexpected error occurred when {} {}. \n\nAkeneo API Error: {}",
        action,
        entity,
        err.message()
    ))])
}

/// Diff top-level attributes and nested blocks of `proposed` against `prior`.
///
/// Computed attributes left null in the proposal keep their prior value, or
/// become unknown on create.
pub fn plan_changes(
    schema: &Schema,
    prior: Option<&Value>,
    mut proposed: Value,
) -> Result<PlanResult, ProviderError> {
    let Some(planned) = proposed.as_object_mut() else {
        return Err(ProviderError::Validation(
            "proposed state must be an object".to_string(),
        ));
    };

    for (name, attr) in &schema.block.attributes {
        if !attr.flags.computed || !planned.get(name).map_or(true, Value::is_null) {
            continue;
        }
        let fill = match prior.and_then(|p| p.get(name)) {
            Some(v) if !v.is_null() => v.clone(),
            _ if prior.is_none() => Value::String(UNKNOWN_SENTINEL.to_string()),
            _ => Value::Null,
        };
        planned.insert(name.clone(), fill);
    }

    let force_new: Vec<&str> = schema.force_new_attributes().collect();
    let mut changes = Vec::new();
    let mut requires_replace = false;
    let names = schema
        .block
        .attributes
        .keys()
        .chain(schema.block.blocks.keys());

    for name in names {
        let before = prior.and_then(|p| p.get(name)).filter(|v| !v.is_null());
        let after = planned.get(name).filter(|v| !v.is_null());
        if before == after {
            continue;
        }

        let change = match (before, after) {
            (None, Some(a)) => AttributeChange::added(name.clone(), a.clone()),
            (Some(b), None) => AttributeChange::removed(name.clone(), b.clone()),
            (Some(b), Some(a)) => AttributeChange::modified(name.clone(), b.clone(), a.clone()),
            (None, None) => continue,
        };

        if prior.is_some() && force_new.contains(&name.as_str()) {
            requires_replace = true;
        }
        changes.push(change);
    }

    Ok(PlanResult::with_changes(proposed, changes, requires_replace))
}

/// Replace leftover unknown sentinels with null once an apply has finished.
fn resolve_unknowns(value: &mut Value) {
    match value {
        Value::String(s) if s == UNKNOWN_SENTINEL => *value = Value::Null,
        Value::Array(items) => items.iter_mut().for_each(resolve_unknowns),
        Value::Object(map) => map.values_mut().for_each(resolve_unknowns),
        _ => {},
    }
}

/// Read a required string identity field from a model.
pub(crate) fn required_code(value: &TfValue<String>, field: &str) -> Result<String, ProviderError> {
    match value.as_known() {
        Some(code) if !code.is_empty() => Ok(code.clone()),
        _ => Err(ProviderError::Validation(format!(
            "{} must be set to a known value",
            field
        ))),
    }
}

fn with_article(entity: &str) -> String {
    match entity.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {}", entity),
        _ => format!("a {}", entity),
    }
}

fn plural(entity: &str) -> String {
    match entity.strip_suffix('y') {
        Some(stem) => format!("{}ies", stem),
        None => format!("{}s", entity),
    }
}

fn past(action: &str) -> &'static str {
    match action {
        "creating" => "created",
        _ => "updated",
    }
}
