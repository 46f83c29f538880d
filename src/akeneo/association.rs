//! Association type endpoints.

use serde::{Deserialize, Serialize};

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;

/// A kind of link between products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationType {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_quantified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_two_way: Option<bool>,
}

impl AkeneoClient {
    /// Get an association type by code
    pub async fn get_association_type(&self, code: &str) -> Result<AssociationType, ProviderError> {
        self.get(&format!("{}/association-types/{}", API_PREFIX, code))
            .await
    }

    /// Create or update an association type
    pub async fn upsert_association_type(
        &self,
        association: &AssociationType,
    ) -> Result<Option<AssociationType>, ProviderError> {
        self.patch(
            &format!("{}/association-types/{}", API_PREFIX, association.code),
            association,
        )
        .await
    }
}
