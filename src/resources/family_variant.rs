//! `akeneo_family_variant`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, FamilyVariant, VariantAttributeSet};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Block, NestedBlock, Schema};
use crate::validators::Validator;
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantAttributeSetModel {
    pub level: TfValue<i64>,
    pub axes: TfValue<Vec<String>>,
    pub attributes: TfValue<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyVariantModel {
    pub family_code: TfValue<String>,
    pub code: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub variant_attribute_sets: TfValue<Vec<VariantAttributeSetModel>>,
}

impl VariantAttributeSetModel {
    fn to_api(&self) -> Result<VariantAttributeSet, ProviderError> {
        let level = self.level.known().ok_or_else(|| {
            ProviderError::Validation(
                "variant_attribute_sets.level must be set to a known value".to_string(),
            )
        })?;
        Ok(VariantAttributeSet {
            level,
            axes: self.axes.known(),
            attributes: self.attributes.known(),
        })
    }

    fn from_api(set: VariantAttributeSet) -> Self {
        let mut model = Self {
            level: TfValue::Known(set.level),
            ..Default::default()
        };
        mapping::merge_list(&mut model.axes, set.axes);
        mapping::merge_list(&mut model.attributes, set.attributes);
        model
    }
}

pub struct FamilyVariantResource;

#[async_trait]
impl AkeneoResource for FamilyVariantResource {
    type Model = FamilyVariantModel;
    type Api = FamilyVariant;

    fn type_name(&self) -> &'static str {
        "akeneo_family_variant"
    }

    fn entity(&self) -> &'static str {
        "family variant"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::PatchUpsert
    }

    fn import_fields(&self) -> &'static [&'static str] {
        &["family_code", "code"]
    }

    fn schema(&self) -> Schema {
        let attribute_set = Block::new()
            .with_attribute(
                "level",
                Attribute::required_int64()
                    .with_description("Enrichment level")
                    .with_validator(Validator::Int64Between {
                        min: 1,
                        max: 2_147_483_647,
                    }),
            )
            .with_attribute(
                "axes",
                Attribute::optional_string_list()
                    .with_description("Codes of attributes used as variant axes"),
            )
            .with_attribute(
                "attributes",
                Attribute::optional_string_list()
                    .with_description("Codes of attributes bind to this enrichment level"),
            );

        Schema::v0()
            .with_description("Akeneo family variant resource")
            .with_attribute(
                "family_code",
                Attribute::required_string()
                    .with_description("Family code to which this variant belongs")
                    .with_force_new(),
            )
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Family variant code")
                    .with_force_new(),
            )
            .with_attribute("labels", Attribute::labels())
            .with_block(
                "variant_attribute_sets",
                NestedBlock::list(attribute_set.with_description(
                    "Attribute distributions according to the enrichment level.",
                )),
            )
    }

    fn key(&self, model: &FamilyVariantModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([
            required_code(&model.family_code, "family_code")?,
            required_code(&model.code, "code")?,
        ]))
    }

    fn import_model(&self, key: &ImportKey) -> FamilyVariantModel {
        let parts = key.parts();
        FamilyVariantModel {
            family_code: TfValue::Known(parts[0].clone()),
            code: TfValue::Known(parts[1].clone()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &FamilyVariantModel) -> Result<FamilyVariant, ProviderError> {
        let variant_attribute_sets = model
            .variant_attribute_sets
            .as_known()
            .map(|sets| {
                sets.iter()
                    .map(VariantAttributeSetModel::to_api)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(FamilyVariant {
            code: required_code(&model.code, "code")?,
            labels: model.labels.known(),
            variant_attribute_sets,
        })
    }

    fn merge_api(
        &self,
        model: &mut FamilyVariantModel,
        api: FamilyVariant,
    ) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        mapping::merge_map(&mut model.labels, api.labels);

        if let Some(mut sets) = api.variant_attribute_sets.filter(|s| !s.is_empty()) {
            sets.sort_by_key(|set| set.level);
            model.variant_attribute_sets = TfValue::Known(
                sets.into_iter()
                    .map(VariantAttributeSetModel::from_api)
                    .collect(),
            );
        }
        Ok(())
    }

    async fn fetch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
    ) -> Result<FamilyVariant, ProviderError> {
        let parts = key.parts();
        client.get_family_variant(&parts[0], &parts[1]).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
        api: &FamilyVariant,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client
            .upsert_family_variant(&key.parts()[0], api)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::resources::{ManagedResource, ResourceAdapter};

    #[test]
    fn test_level_must_be_positive() {
        let adapter = ResourceAdapter::new(FamilyVariantResource);
        let diagnostics = adapter.validate(
            &json!({
                "family_code": "shoes",
                "code": "shoes_by_size",
                "variant_attribute_sets": [{"level": 0, "axes": ["size"]}]
            }),
            &[],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("variant_attribute_sets.0.level")
        );
    }

    #[test]
    fn test_merge_sorts_sets_by_level() {
        let api: FamilyVariant = serde_json::from_value(json!({
            "code": "shoes_by_size_color",
            "variant_attribute_sets": [
                {"level": 2, "axes": ["color"], "attributes": ["sku", "color"]},
                {"level": 1, "axes": ["size"], "attributes": ["size"]}
            ]
        }))
        .unwrap();

        let mut model = FamilyVariantResource.import_model(&ImportKey::new([
            "shoes",
            "shoes_by_size_color",
        ]));
        FamilyVariantResource.merge_api(&mut model, api).unwrap();

        let sets = model.variant_attribute_sets.known().unwrap();
        assert_eq!(sets[0].level, TfValue::Known(1));
        assert_eq!(sets[1].axes, TfValue::Known(vec!["color".to_string()]));
        assert_eq!(model.family_code, TfValue::Known("shoes".to_string()));
    }

    #[tokio::test]
    async fn test_create_patches_under_family() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/rest/v1/families/shoes/variants/shoes_by_size"))
            .and(body_json(json!({
                "code": "shoes_by_size",
                "variant_attribute_sets": [{"level": 1, "axes": ["size"], "attributes": ["size"]}]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/rest/v1/families/shoes/variants/shoes_by_size"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "shoes_by_size",
                "labels": {},
                "variant_attribute_sets": [{"level": 1, "axes": ["size"], "attributes": ["size", "sku"]}]
            })))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let adapter = ResourceAdapter::new(FamilyVariantResource);
        let state = adapter
            .create(
                &client,
                json!({
                    "family_code": "shoes",
                    "code": "shoes_by_size",
                    "variant_attribute_sets": [{"level": 1, "axes": ["size"], "attributes": ["size"]}]
                }),
            )
            .await
            .unwrap();

        assert_eq!(state["family_code"], "shoes");
        assert_eq!(
            state["variant_attribute_sets"][0]["attributes"],
            json!(["size", "sku"])
        );
        assert!(state["labels"].is_null());
    }

    #[test]
    fn test_round_trip() {
        let original: FamilyVariantModel = serde_json::from_value(json!({
            "family_code": "shoes",
            "code": "shoes_by_size",
            "labels": {"en_US": "Shoes by size"},
            "variant_attribute_sets": [
                {"level": 1, "axes": ["color"], "attributes": ["color", "picture"]},
                {"level": 2, "axes": ["size"], "attributes": ["size", "sku"]}
            ]
        }))
        .unwrap();

        let wire =
            serde_json::to_value(FamilyVariantResource.to_api(&original).unwrap()).unwrap();
        assert!(wire.get("family_code").is_none());

        let mut merged =
            FamilyVariantResource.import_model(&ImportKey::new(["shoes", "shoes_by_size"]));
        FamilyVariantResource
            .merge_api(&mut merged, serde_json::from_value(wire).unwrap())
            .unwrap();
        assert_eq!(merged, original);
    }

    #[test]
    fn test_unset_fields_omitted() {
        let model: FamilyVariantModel = serde_json::from_value(json!({
            "family_code": "__unknown__",
            "code": "shoes_by_size",
            "labels": null,
            "variant_attribute_sets": [
                {"level": 1, "axes": "__unknown__", "attributes": null},
                {"level": 2, "axes": ["size"], "attributes": "__unknown__"}
            ]
        }))
        .unwrap();

        let wire = serde_json::to_value(FamilyVariantResource.to_api(&model).unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "code": "shoes_by_size",
                "variant_attribute_sets": [
                    {"level": 1},
                    {"level": 2, "axes": ["size"]}
                ]
            })
        );

        let model: FamilyVariantModel = serde_json::from_value(json!({
            "family_code": "shoes",
            "code": "shoes_by_size",
            "labels": "__unknown__",
            "variant_attribute_sets": "__unknown__"
        }))
        .unwrap();
        let wire = serde_json::to_value(FamilyVariantResource.to_api(&model).unwrap()).unwrap();
        assert_eq!(wire, json!({"code": "shoes_by_size"}));
    }
}
