//! `akeneo_attribute`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, Attribute};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute as SchemaAttribute, Diagnostic, Schema};
use crate::validators::{is_pim_attribute_type, Validator};
use crate::value::TfValue;

const MAX_INT32: i64 = 2_147_483_647;

/// Configuration and state of an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeModel {
    pub code: TfValue<String>,
    #[serde(rename = "type")]
    pub attribute_type: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub group: TfValue<String>,
    pub group_labels: TfValue<Labels>,
    pub sort_order: TfValue<i64>,
    pub localizable: TfValue<bool>,
    pub scopable: TfValue<bool>,
    pub available_locales: TfValue<Vec<String>>,
    pub unique: TfValue<bool>,
    pub useable_as_grid_filter: TfValue<bool>,
    pub max_characters: TfValue<i64>,
    pub validation_rule: TfValue<String>,
    pub validation_regexp: TfValue<String>,
    pub wysiwyg_enabled: TfValue<bool>,
    pub number_min: TfValue<f64>,
    pub number_max: TfValue<f64>,
    pub decimals_allowed: TfValue<bool>,
    pub negative_allowed: TfValue<bool>,
    pub metric_family: TfValue<String>,
    pub default_metric_unit: TfValue<String>,
    pub date_min: TfValue<String>,
    pub date_max: TfValue<String>,
    pub allowed_extensions: TfValue<Vec<String>>,
    pub max_file_size: TfValue<i64>,
    pub reference_data_name: TfValue<String>,
    pub default_value: TfValue<bool>,
    pub table_configuration: TfValue<Vec<String>>,
}

pub struct AttributeResource;

#[async_trait]
impl AkeneoResource for AttributeResource {
    type Model = AttributeModel;
    type Api = Attribute;

    fn type_name(&self) -> &'static str {
        "akeneo_attribute"
    }

    fn entity(&self) -> &'static str {
        "attribute"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo attribute resource")
            .with_attribute(
                "code",
                SchemaAttribute::required_string()
                    .with_description("Attribute code")
                    .with_force_new(),
            )
            .with_attribute(
                "type",
                SchemaAttribute::required_string()
                    .with_description("Attribute type - see akeneo available akeneo types in the documentation. Example: pim_catalog_file")
                    .with_validator(Validator::LengthAtLeast { min: 1 })
                    .with_force_new(),
            )
            .with_attribute("labels", SchemaAttribute::labels())
            .with_attribute(
                "group",
                SchemaAttribute::required_string().with_description("Attribute group"),
            )
            .with_attribute("group_labels", SchemaAttribute::labels())
            .with_attribute(
                "sort_order",
                SchemaAttribute::optional_int64()
                    .with_description("Order of the attribute in its group")
                    .with_validator(Validator::Int64Between { min: 0, max: MAX_INT32 }),
            )
            .with_attribute(
                "localizable",
                SchemaAttribute::optional_bool().with_description(
                    "Whether the attribute is localizable, i.e. can have one value by locale",
                ),
            )
            .with_attribute(
                "scopable",
                SchemaAttribute::optional_bool().with_description(
                    "Whether the attribute is scopable, i.e. can have one value by channel",
                ),
            )
            .with_attribute(
                "available_locales",
                SchemaAttribute::optional_string_list()
                    .with_description("To make the attribute locale specific, specify here for which locales it is specific")
                    .with_validator(Validator::ListValuesLocaleCode),
            )
            .with_attribute(
                "unique",
                SchemaAttribute::optional_bool()
                    .with_description("Whether two values for the attribute cannot be the same"),
            )
            .with_attribute(
                "useable_as_grid_filter",
                SchemaAttribute::optional_bool().with_description(
                    "Whether the attribute can be used as a filter for the product grid in the PIM user interface",
                ),
            )
            .with_attribute(
                "max_characters",
                SchemaAttribute::optional_int64()
                    .with_description("Number maximum of characters allowed for the value of the attribute when the attribute type is `pim_catalog_text`, `pim_catalog_textarea` or `pim_catalog_identifier`")
                    .with_validator(Validator::Int64Between { min: 1, max: MAX_INT32 }),
            )
            .with_attribute(
                "validation_rule",
                SchemaAttribute::optional_string().with_description(
                    "Validation rule type used to validate any attribute value when the attribute type is `pim_catalog_text` or `pim_catalog_identifier`",
                ),
            )
            .with_attribute(
                "validation_regexp",
                SchemaAttribute::optional_string().with_description(
                    "Regexp expression used to validate any attribute value when the attribute type is `pim_catalog_text` or `pim_catalog_identifier`",
                ),
            )
            .with_attribute(
                "wysiwyg_enabled",
                SchemaAttribute::optional_bool().with_description(
                    "Whether the WYSIWYG interface is shown when the attribute type is `pim_catalog_textarea`",
                ),
            )
            .with_attribute(
                "number_min",
                SchemaAttribute::optional_number().with_description(
                    "Minimum value allowed when the attribute type is `pim_catalog_metric`, `pim_catalog_price` or `pim_catalog_number`",
                ),
            )
            .with_attribute(
                "number_max",
                SchemaAttribute::optional_number().with_description(
                    "Maximum value allowed when the attribute type is `pim_catalog_metric`, `pim_catalog_price` or `pim_catalog_number`",
                ),
            )
            .with_attribute(
                "decimals_allowed",
                SchemaAttribute::optional_bool().with_description(
                    "Whether decimals are allowed when the attribute type is `pim_catalog_metric`, `pim_catalog_price` or `pim_catalog_number`",
                ),
            )
            .with_attribute(
                "negative_allowed",
                SchemaAttribute::optional_bool().with_description(
                    "Whether negative values are allowed when the attribute type is `pim_catalog_metric` or `pim_catalog_number`",
                ),
            )
            .with_attribute(
                "metric_family",
                SchemaAttribute::optional_string()
                    .with_description("Metric family when the attribute type is `pim_catalog_metric`"),
            )
            .with_attribute(
                "default_metric_unit",
                SchemaAttribute::optional_string().with_description(
                    "Default metric unit when the attribute type is `pim_catalog_metric`",
                ),
            )
            .with_attribute(
                "date_min",
                SchemaAttribute::optional_string().with_description(
                    "Minimum date allowed when the attribute type is `pim_catalog_date`",
                ),
            )
            .with_attribute(
                "date_max",
                SchemaAttribute::optional_string().with_description(
                    "Maximum date allowed when the attribute type is `pim_catalog_date`",
                ),
            )
            .with_attribute(
                "allowed_extensions",
                SchemaAttribute::optional_string_list().with_description(
                    "Extensions allowed when the attribute type is `pim_catalog_file` or `pim_catalog_image`",
                ),
            )
            .with_attribute(
                "max_file_size",
                SchemaAttribute::optional_int64().with_description(
                    "Max file size in MB when the attribute type is `pim_catalog_file` or `pim_catalog_image`",
                ),
            )
            .with_attribute(
                "reference_data_name",
                SchemaAttribute::optional_string().with_description(
                    "Reference entity code when the attribute type is `akeneo_reference_entity` or `akeneo_reference_entity_collection` OR Asset family code when the attribute type is `pim_catalog_asset_collection`",
                ),
            )
            .with_attribute(
                "default_value",
                SchemaAttribute::optional_bool().with_description(
                    "Default value for a Yes/No attribute, applied when creating a new product or product model",
                ),
            )
            .with_attribute(
                "table_configuration",
                SchemaAttribute::optional_string_list()
                    .with_description("Configuration of the Table attribute (columns), one JSON object per column"),
            )
    }

    fn key(&self, model: &AttributeModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> AttributeModel {
        AttributeModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &AttributeModel) -> Result<Attribute, ProviderError> {
        let table_configuration = model
            .table_configuration
            .as_known()
            .map(|columns| mapping::table_configuration_to_wire(columns))
            .transpose()?;

        Ok(Attribute {
            code: required_code(&model.code, "code")?,
            attribute_type: model.attribute_type.known(),
            group: model.group.known(),
            labels: model.labels.known(),
            group_labels: model.group_labels.known(),
            sort_order: model.sort_order.known(),
            localizable: model.localizable.known(),
            scopable: model.scopable.known(),
            available_locales: model.available_locales.known(),
            unique: model.unique.known(),
            useable_as_grid_filter: model.useable_as_grid_filter.known(),
            max_characters: model.max_characters.known(),
            validation_rule: model.validation_rule.known(),
            validation_regexp: model.validation_regexp.known(),
            wysiwyg_enabled: model.wysiwyg_enabled.known(),
            number_min: model.number_min.known().map(mapping::number_to_wire),
            number_max: model.number_max.known().map(mapping::number_to_wire),
            decimals_allowed: model.decimals_allowed.known(),
            negative_allowed: model.negative_allowed.known(),
            metric_family: model.metric_family.known(),
            default_metric_unit: model.default_metric_unit.known(),
            date_min: model.date_min.known(),
            date_max: model.date_max.known(),
            allowed_extensions: model.allowed_extensions.known(),
            max_file_size: model.max_file_size.known().map(mapping::integer_to_wire),
            reference_data_name: model.reference_data_name.known(),
            default_value: model.default_value.known(),
            table_configuration,
        })
    }

    fn merge_api(&self, model: &mut AttributeModel, api: Attribute) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        model.attribute_type.merge(api.attribute_type);
        model.group.merge(api.group);
        mapping::merge_map(&mut model.labels, api.labels);
        mapping::merge_map(&mut model.group_labels, api.group_labels);
        model.sort_order.merge(api.sort_order);
        model.localizable.merge(api.localizable);
        model.scopable.merge(api.scopable);
        mapping::merge_list(&mut model.available_locales, api.available_locales);
        model.unique.merge(api.unique);
        model.useable_as_grid_filter.merge(api.useable_as_grid_filter);
        model.max_characters.merge(api.max_characters);
        model.validation_rule.merge(api.validation_rule);
        model.validation_regexp.merge(api.validation_regexp);
        model.wysiwyg_enabled.merge(api.wysiwyg_enabled);
        if let Some(raw) = api.number_min.filter(|s| !s.is_empty()) {
            model.number_min = TfValue::Known(mapping::number_from_wire("number_min", &raw)?);
        }
        if let Some(raw) = api.number_max.filter(|s| !s.is_empty()) {
            model.number_max = TfValue::Known(mapping::number_from_wire("number_max", &raw)?);
        }
        model.decimals_allowed.merge(api.decimals_allowed);
        model.negative_allowed.merge(api.negative_allowed);
        model.metric_family.merge(api.metric_family);
        model.default_metric_unit.merge(api.default_metric_unit);
        model.date_min.merge(api.date_min);
        model.date_max.merge(api.date_max);
        mapping::merge_list(&mut model.allowed_extensions, api.allowed_extensions);
        if let Some(raw) = api.max_file_size.filter(|s| !s.is_empty()) {
            model.max_file_size =
                TfValue::Known(mapping::integer_from_wire("max_file_size", &raw)?);
        }
        model.reference_data_name.merge(api.reference_data_name);
        model.default_value.merge(api.default_value);
        if let Some(columns) = api.table_configuration.filter(|c| !c.is_empty()) {
            model.table_configuration =
                TfValue::Known(mapping::table_configuration_from_wire(&columns)?);
        }
        Ok(())
    }

    fn validate_config(&self, config: &Value, extra_attribute_types: &[String]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if let Some(attribute_type) = config.get("type").and_then(Value::as_str) {
            if !attribute_type.is_empty()
                && attribute_type != crate::value::UNKNOWN_SENTINEL
                && !is_pim_attribute_type(attribute_type, extra_attribute_types)
            {
                diagnostics.push(
                    Diagnostic::warning("Unrecognized attribute type")
                        .with_detail(format!(
                            "{:?} is not a built-in Akeneo attribute type and is not listed in extra_attribute_types; it will be sent to Akeneo as is",
                            attribute_type
                        ))
                        .with_attribute("type"),
                );
            }
        }

        if let Some(columns) = config.get("table_configuration").and_then(Value::as_array) {
            let columns: Vec<String> = columns
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if let Err(e) = mapping::table_configuration_to_wire(&columns) {
                diagnostics.push(
                    Diagnostic::error("Invalid table configuration")
                        .with_detail(e.message())
                        .with_attribute("table_configuration"),
                );
            }
        }

        diagnostics
    }

    async fn fetch(&self, client: &AkeneoClient, key: &ImportKey) -> Result<Attribute, ProviderError> {
        client.get_attribute(&key.to_string()).await
    }

    async fn post(&self, client: &AkeneoClient, api: &Attribute) -> Result<(), ProviderError> {
        client.create_attribute(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &Attribute,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_attribute(api).await.map(|_| ())
    }
}
