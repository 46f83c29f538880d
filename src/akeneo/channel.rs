//! Channel endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;

/// A channel (scope) products are published to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_tree: Option<String>,
    /// Metric attribute code to the unit values are converted to.
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversion_units: Option<BTreeMap<String, String>>,
}

impl AkeneoClient {
    /// Get a channel by code
    pub async fn get_channel(&self, code: &str) -> Result<Channel, ProviderError> {
        self.get(&format!("{}/channels/{}", API_PREFIX, code)).await
    }

    /// Create a channel
    pub async fn create_channel(&self, channel: &Channel) -> Result<(), ProviderError> {
        self.post(&format!("{}/channels", API_PREFIX), channel).await
    }

    /// Update a channel
    pub async fn update_channel(&self, channel: &Channel) -> Result<Option<Channel>, ProviderError> {
        self.patch(&format!("{}/channels/{}", API_PREFIX, channel.code), channel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_channel_with_empty_conversion_units() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rest/v1/channels/ecommerce"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "ecommerce",
                "currencies": ["USD", "EUR"],
                "locales": ["en_US"],
                "category_tree": "master",
                "conversion_units": [],
                "labels": {"en_US": "Ecommerce"}
            })))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let channel = client.get_channel("ecommerce").await.unwrap();
        assert_eq!(channel.currencies.unwrap(), vec!["USD", "EUR"]);
        assert_eq!(channel.conversion_units, Some(BTreeMap::new()));
    }
}
