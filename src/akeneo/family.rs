//! Family and family variant endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;

/// A product family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_as_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_as_image: Option<String>,
    /// Channel code to the attribute codes required for completeness.
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub attribute_requirements: Option<BTreeMap<String, Vec<String>>>,
}

/// Attribute distribution for one enrichment level of a family variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantAttributeSet {
    pub level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
}

/// A family variant. Its family is part of the path, not the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyVariant {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_attribute_sets: Option<Vec<VariantAttributeSet>>,
}

impl AkeneoClient {
    /// Get a family by code
    pub async fn get_family(&self, code: &str) -> Result<Family, ProviderError> {
        self.get(&format!("{}/families/{}", API_PREFIX, code)).await
    }

    /// Create a family
    pub async fn create_family(&self, family: &Family) -> Result<(), ProviderError> {
        self.post(&format!("{}/families", API_PREFIX), family).await
    }

    /// Update a family
    pub async fn update_family(&self, family: &Family) -> Result<Option<Family>, ProviderError> {
        self.patch(&format!("{}/families/{}", API_PREFIX, family.code), family)
            .await
    }

    /// Get a variant of a family
    pub async fn get_family_variant(
        &self,
        family_code: &str,
        code: &str,
    ) -> Result<FamilyVariant, ProviderError> {
        self.get(&format!(
            "{}/families/{}/variants/{}",
            API_PREFIX, family_code, code
        ))
        .await
    }

    /// Create or update a variant of a family
    pub async fn upsert_family_variant(
        &self,
        family_code: &str,
        variant: &FamilyVariant,
    ) -> Result<Option<FamilyVariant>, ProviderError> {
        self.patch(
            &format!(
                "{}/families/{}/variants/{}",
                API_PREFIX, family_code, variant.code
            ),
            variant,
        )
        .await
    }
}
