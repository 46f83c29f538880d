//! `akeneo_family`

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, Family};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyModel {
    pub code: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub attributes: TfValue<Vec<String>>,
    pub attribute_as_label: TfValue<String>,
    pub attribute_as_image: TfValue<String>,
    pub attribute_requirements: TfValue<BTreeMap<String, Vec<String>>>,
}

pub struct FamilyResource;

#[async_trait]
impl AkeneoResource for FamilyResource {
    type Model = FamilyModel;
    type Api = Family;

    fn type_name(&self) -> &'static str {
        "akeneo_family"
    }

    fn entity(&self) -> &'static str {
        "family"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo family resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Family code")
                    .with_force_new(),
            )
            .with_attribute("labels", Attribute::labels())
            .with_attribute(
                "attributes",
                Attribute::optional_string_list()
                    .with_description("Attributes codes that compose the family"),
            )
            .with_attribute(
                "attribute_as_label",
                Attribute::optional_string().with_description(
                    "Attribute code used as label. Must be a text or identifier attribute of the family",
                ),
            )
            .with_attribute(
                "attribute_as_image",
                Attribute::optional_string().with_description(
                    "Attribute code used as the main picture in the user interface",
                ),
            )
            .with_attribute(
                "attribute_requirements",
                Attribute::new(
                    AttributeType::map(AttributeType::list(AttributeType::String)),
                    AttributeFlags::optional(),
                )
                .with_description(
                    "Attributes codes of the family that are required for the completeness calculation for each channel",
                ),
            )
    }

    fn key(&self, model: &FamilyModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> FamilyModel {
        FamilyModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &FamilyModel) -> Result<Family, ProviderError> {
        Ok(Family {
            code: required_code(&model.code, "code")?,
            labels: model.labels.known(),
            attributes: model.attributes.known(),
            attribute_as_label: model.attribute_as_label.known(),
            attribute_as_image: model.attribute_as_image.known(),
            attribute_requirements: model.attribute_requirements.known(),
        })
    }

    fn merge_api(&self, model: &mut FamilyModel, api: Family) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        mapping::merge_map(&mut model.labels, api.labels);
        mapping::merge_list(&mut model.attributes, api.attributes);
        model.attribute_as_label.merge(api.attribute_as_label);
        model.attribute_as_image.merge(api.attribute_as_image);
        mapping::merge_map(&mut model.attribute_requirements, api.attribute_requirements);
        Ok(())
    }

    async fn fetch(&self, client: &AkeneoClient, key: &ImportKey) -> Result<Family, ProviderError> {
        client.get_family(&key.to_string()).await
    }

    async fn post(&self, client: &AkeneoClient, api: &Family) -> Result<(), ProviderError> {
        client.create_family(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &Family,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_family(api).await.map(|_| ())
    }
}
