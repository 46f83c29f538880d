//! Attribute, attribute option and attribute group endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;

/// An Akeneo attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub code: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_locales: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub useable_as_grid_filter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_characters: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_regexp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wysiwyg_enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "de::decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_min: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_metric_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "de::decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_file_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_data_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_configuration: Option<Vec<Value>>,
}

/// An option of a select attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub code: String,
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
}

/// A group of attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    pub code: String,
    /// Codes of the attributes in the group, maintained by Akeneo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
}

impl AkeneoClient {
    /// Get an attribute by code
    pub async fn get_attribute(&self, code: &str) -> Result<Attribute, ProviderError> {
        self.get(&format!("{}/attributes/{}", API_PREFIX, code)).await
    }

    /// Create an attribute
    pub async fn create_attribute(&self, attribute: &Attribute) -> Result<(), ProviderError> {
        self.post(&format!("{}/attributes", API_PREFIX), attribute)
            .await
    }

    /// Update an attribute
    pub async fn update_attribute(
        &self,
        attribute: &Attribute,
    ) -> Result<Option<Attribute>, ProviderError> {
        self.patch(
            &format!("{}/attributes/{}", API_PREFIX, attribute.code),
            attribute,
        )
        .await
    }

    /// Get an option of an attribute
    pub async fn get_attribute_option(
        &self,
        attribute: &str,
        code: &str,
    ) -> Result<AttributeOption, ProviderError> {
        self.get(&format!(
            "{}/attributes/{}/options/{}",
            API_PREFIX, attribute, code
        ))
        .await
    }

    /// Create an attribute option under its parent attribute
    pub async fn create_attribute_option(
        &self,
        option: &AttributeOption,
    ) -> Result<(), ProviderError> {
        self.post(
            &format!("{}/attributes/{}/options", API_PREFIX, option.attribute),
            option,
        )
        .await
    }

    /// Update an attribute option
    pub async fn update_attribute_option(
        &self,
        option: &AttributeOption,
    ) -> Result<Option<AttributeOption>, ProviderError> {
        self.patch(
            &format!(
                "{}/attributes/{}/options/{}",
                API_PREFIX, option.attribute, option.code
            ),
            option,
        )
        .await
    }

    /// Get an attribute group by code
    pub async fn get_attribute_group(&self, code: &str) -> Result<AttributeGroup, ProviderError> {
        self.get(&format!("{}/attribute-groups/{}", API_PREFIX, code))
            .await
    }

    /// Create an attribute group
    pub async fn create_attribute_group(
        &self,
        group: &AttributeGroup,
    ) -> Result<(), ProviderError> {
        self.post(&format!("{}/attribute-groups", API_PREFIX), group)
            .await
    }

    /// Update an attribute group
    pub async fn update_attribute_group(
        &self,
        group: &AttributeGroup,
    ) -> Result<Option<AttributeGroup>, ProviderError> {
        self.patch(
            &format!("{}/attribute-groups/{}", API_PREFIX, group.code),
            group,
        )
        .await
    }
}
