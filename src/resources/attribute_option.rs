//! `akeneo_attribute_option`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, AttributeOption};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Schema};
use crate::validators::Validator;
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeOptionModel {
    pub code: TfValue<String>,
    pub attribute: TfValue<String>,
    pub sort_order: TfValue<i64>,
    pub labels: TfValue<Labels>,
}

pub struct AttributeOptionResource;

#[async_trait]
impl AkeneoResource for AttributeOptionResource {
    type Model = AttributeOptionModel;
    type Api = AttributeOption;

    fn type_name(&self) -> &'static str {
        "akeneo_attribute_option"
    }

    fn entity(&self) -> &'static str {
        "attribute option"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn import_fields(&self) -> &'static [&'static str] {
        &["attribute", "code"]
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo attribute option resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Attribute option code")
                    .with_force_new(),
            )
            .with_attribute(
                "attribute",
                Attribute::required_string()
                    .with_description("Code of the attribute the option belongs to")
                    .with_force_new(),
            )
            .with_attribute(
                "sort_order",
                Attribute::optional_int64()
                    .with_description("Order of the option in the attribute")
                    .with_validator(Validator::Int64Between {
                        min: 0,
                        max: 2_147_483_647,
                    }),
            )
            .with_attribute("labels", Attribute::labels())
    }

    fn key(&self, model: &AttributeOptionModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([
            required_code(&model.attribute, "attribute")?,
            required_code(&model.code, "code")?,
        ]))
    }

    fn import_model(&self, key: &ImportKey) -> AttributeOptionModel {
        let parts = key.parts();
        AttributeOptionModel {
            attribute: TfValue::Known(parts[0].clone()),
            code: TfValue::Known(parts[1].clone()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &AttributeOptionModel) -> Result<AttributeOption, ProviderError> {
        Ok(AttributeOption {
            code: required_code(&model.code, "code")?,
            attribute: required_code(&model.attribute, "attribute")?,
            sort_order: model.sort_order.known(),
            labels: model.labels.known(),
        })
    }

    fn merge_api(
        &self,
        model: &mut AttributeOptionModel,
        api: AttributeOption,
    ) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        if !api.attribute.is_empty() {
            model.attribute = TfValue::Known(api.attribute);
        }
        model.sort_order.merge(api.sort_order);
        mapping::merge_map(&mut model.labels, api.labels);
        Ok(())
    }

    async fn fetch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
    ) -> Result<AttributeOption, ProviderError> {
        let parts = key.parts();
        client.get_attribute_option(&parts[0], &parts[1]).await
    }

    async fn post(&self, client: &AkeneoClient, api: &AttributeOption) -> Result<(), ProviderError> {
        client.create_attribute_option(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &AttributeOption,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_attribute_option(api).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ManagedResource, ResourceAdapter};
    use serde_json::json;

    #[test]
    fn test_key_joins_attribute_and_code() {
        let model: AttributeOptionModel =
            serde_json::from_value(json!({"code": "red", "attribute": "color"})).unwrap();
        let key = AttributeOptionResource.key(&model).unwrap();
        assert_eq!(key.to_string(), "color/red");
    }

    #[test]
    fn test_import_splits_identifier() {
        let adapter = ResourceAdapter::new(AttributeOptionResource);
        let state = adapter.import("color/red").unwrap();
        assert_eq!(state["attribute"], "color");
        assert_eq!(state["code"], "red");
        assert!(state["labels"].is_null());

        let err = adapter.import("red").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidImportId(_)));
    }

    #[test]
    fn test_moving_option_requires_replace() {
        let adapter = ResourceAdapter::new(AttributeOptionResource);
        let prior = json!({"code": "red", "attribute": "color", "sort_order": 1, "labels": null});
        let result = adapter
            .plan(
                Some(&prior),
                json!({"code": "red", "attribute": "main_color", "sort_order": 1, "labels": null}),
            )
            .unwrap();
        assert!(result.requires_replace);
    }

    #[test]
    fn test_negative_sort_order_is_rejected() {
        let adapter = ResourceAdapter::new(AttributeOptionResource);
        let diagnostics = adapter.validate(
            &json!({"code": "red", "attribute": "color", "sort_order": -1}),
            &[],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("sort_order"));
    }

    #[test]
    fn test_round_trip() {
        let original: AttributeOptionModel = serde_json::from_value(json!({
            "code": "red",
            "attribute": "color",
            "sort_order": 4,
            "labels": {"en_US": "Red", "fr_FR": "Rouge"}
        }))
        .unwrap();

        let wire =
            serde_json::to_value(AttributeOptionResource.to_api(&original).unwrap()).unwrap();
        let mut merged = AttributeOptionResource.import_model(&ImportKey::new(["color", "red"]));
        AttributeOptionResource
            .merge_api(&mut merged, serde_json::from_value(wire).unwrap())
            .unwrap();
        assert_eq!(merged, original);
    }

    #[test]
    fn test_unset_fields_omitted() {
        for model in [
            json!({"code": "red", "attribute": "color", "sort_order": "__unknown__", "labels": null}),
            json!({"code": "red", "attribute": "color", "sort_order": null, "labels": "__unknown__"}),
        ] {
            let model: AttributeOptionModel = serde_json::from_value(model).unwrap();
            let wire =
                serde_json::to_value(AttributeOptionResource.to_api(&model).unwrap()).unwrap();
            assert_eq!(wire, json!({"code": "red", "attribute": "color"}));
        }
    }
}
