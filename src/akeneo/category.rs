//! Category endpoints.

use serde::{Deserialize, Serialize};

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;

/// A node of a category tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    /// Parent category code; `None` for a tree root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
}

impl AkeneoClient {
    /// Get a category by code
    pub async fn get_category(&self, code: &str) -> Result<Category, ProviderError> {
        self.get(&format!("{}/categories/{}", API_PREFIX, code)).await
    }

    /// Create a category
    pub async fn create_category(&self, category: &Category) -> Result<(), ProviderError> {
        self.post(&format!("{}/categories", API_PREFIX), category)
            .await
    }

    /// Update a category
    pub async fn update_category(
        &self,
        category: &Category,
    ) -> Result<Option<Category>, ProviderError> {
        self.patch(
            &format!("{}/categories/{}", API_PREFIX, category.code),
            category,
        )
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
    async fn test_get_root_category() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rest/v1/categories/master"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "master",
                "parent": null,
                "labels": {"en_US": "Master catalog"}
            })))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let category = client.get_category("master").await.unwrap();
        assert_eq!(category.parent, None);
        assert_eq!(category.labels.unwrap()["en_US"], "Master catalog");
    }
}
