//! `akeneo_category`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, Category};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Schema};
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryModel {
    pub code: TfValue<String>,
    pub parent: TfValue<String>,
    pub labels: TfValue<Labels>,
}

pub struct CategoryResource;

#[async_trait]
impl AkeneoResource for CategoryResource {
    type Model = CategoryModel;
    type Api = Category;

    fn type_name(&self) -> &'static str {
        "akeneo_category"
    }

    fn entity(&self) -> &'static str {
        "category"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo category resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Category code")
                    .with_force_new(),
            )
            .with_attribute(
                "parent",
                Attribute::optional_string()
                    .with_description("Category code of the parent's category. Omit for a category tree root"),
            )
            .with_attribute("labels", Attribute::labels())
    }

    fn key(&self, model: &CategoryModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> CategoryModel {
        CategoryModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &CategoryModel) -> Result<Category, ProviderError> {
        Ok(Category {
            code: required_code(&model.code, "code")?,
            parent: model.parent.known(),
            labels: model.labels.known(),
        })
    }

    fn merge_api(&self, model: &mut CategoryModel, api: Category) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        model.parent.merge(api.parent);
        mapping::merge_map(&mut model.labels, api.labels);
        Ok(())
    }

    async fn fetch(&self, client: &AkeneoClient, key: &ImportKey) -> Result<Category, ProviderError> {
        client.get_category(&key.to_string()).await
    }

    async fn post(&self, client: &AkeneoClient, api: &Category) -> Result<(), ProviderError> {
        client.create_category(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &Category,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_category(api).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::resources::{ManagedResource, ResourceAdapter};

    #[tokio::test]
    async fn test_create_posts_then_reads_back() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/rest/v1/categories"))
            .and(body_json(json!({"code": "shoes", "parent": "master"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/rest/v1/categories/shoes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "shoes",
                "parent": "master",
                "labels": {"en_US": "Shoes"}
            })))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let adapter = ResourceAdapter::new(CategoryResource);
        let state = adapter
            .create(&client, json!({"code": "shoes", "parent": "master", "labels": null}))
            .await
            .unwrap();

        assert_eq!(state["code"], "shoes");
        assert_eq!(state["labels"], json!({"en_US": "Shoes"}));
    }

    #[tokio::test]
    async fn test_create_failure_is_described() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/rest/v1/categories"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "message": "Validation failed.",
                "errors": [{"property": "parent", "message": "The category does not exist"}]
            })))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let adapter = ResourceAdapter::new(CategoryResource);
        let err = adapter
            .create(&client, json!({"code": "shoes", "parent": "missing"}))
            .await
            .unwrap_err();

        let diagnostics = err.into_diagnostics();
        assert_eq!(diagnostics[0].summary, "Error while creating a category");
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("The category does not exist"));
    }

    #[test]
    fn test_delete_is_refused() {
        let adapter = ResourceAdapter::new(CategoryResource);
        let diagnostics = adapter
            .delete(json!({"code": "shoes"}))
            .unwrap_err()
            .into_diagnostics();
        assert_eq!(diagnostics[0].summary, "This resource does not support deletes");
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .ends_with("does not support deletes for categories."));
    }

    #[test]
    fn test_round_trip() {
        let original: CategoryModel = serde_json::from_value(json!({
            "code": "shoes",
            "parent": "master",
            "labels": {"en_US": "Shoes", "de_DE": "Schuhe"}
        }))
        .unwrap();

        let wire = serde_json::to_value(CategoryResource.to_api(&original).unwrap()).unwrap();
        let mut merged = CategoryResource.import_model(&ImportKey::new(["shoes"]));
        CategoryResource
            .merge_api(&mut merged, serde_json::from_value(wire).unwrap())
            .unwrap();
        assert_eq!(merged, original);
    }

    #[test]
    fn test_unset_fields_omitted() {
        for model in [
            json!({"code": "shoes", "parent": null, "labels": "__unknown__"}),
            json!({"code": "shoes", "parent": "__unknown__", "labels": null}),
        ] {
            let model: CategoryModel = serde_json::from_value(model).unwrap();
            let wire = serde_json::to_value(CategoryResource.to_api(&model).unwrap()).unwrap();
            assert_eq!(wire, json!({"code": "shoes"}));
        }
    }
}
