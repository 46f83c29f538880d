//! `akeneo_attribute_group`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, AttributeGroup};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Schema};
use crate::validators::Validator;
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeGroupModel {
    pub code: TfValue<String>,
    pub attributes: TfValue<Vec<String>>,
    pub sort_order: TfValue<i64>,
    pub labels: TfValue<Labels>,
}

pub struct AttributeGroupResource;

#[async_trait]
impl AkeneoResource for AttributeGroupResource {
    type Model = AttributeGroupModel;
    type Api = AttributeGroup;

    fn type_name(&self) -> &'static str {
        "akeneo_attribute_group"
    }

    fn entity(&self) -> &'static str {
        "attribute group"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo attribute group resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Attribute group code")
                    .with_force_new(),
            )
            .with_attribute(
                "attributes",
                Attribute::optional_string_list()
                    .computed()
                    .with_description("Attribute codes that compose the attribute group"),
            )
            .with_attribute(
                "sort_order",
                Attribute::optional_int64()
                    .with_description("Attribute group order among other attribute groups")
                    .with_validator(Validator::Int64Between {
                        min: 0,
                        max: 2_147_483_647,
                    }),
            )
            .with_attribute("labels", Attribute::labels())
    }

    fn key(&self, model: &AttributeGroupModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> AttributeGroupModel {
        AttributeGroupModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &AttributeGroupModel) -> Result<AttributeGroup, ProviderError> {
        // Membership is managed through each attribute's `group`
        Ok(AttributeGroup {
            code: required_code(&model.code, "code")?,
            attributes: None,
            sort_order: model.sort_order.known(),
            labels: model.labels.known(),
        })
    }

    fn merge_api(
        &self,
        model: &mut AttributeGroupModel,
        api: AttributeGroup,
    ) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        model.attributes = TfValue::Known(api.attributes.unwrap_or_default());
        model.sort_order.merge(api.sort_order);
        mapping::merge_map(&mut model.labels, api.labels);
        Ok(())
    }

    async fn fetch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
    ) -> Result<AttributeGroup, ProviderError> {
        client.get_attribute_group(&key.to_string()).await
    }

    async fn post(&self, client: &AkeneoClient, api: &AttributeGroup) -> Result<(), ProviderError> {
        client.create_attribute_group(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &AttributeGroup,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_attribute_group(api).await.map(|_| ())
    }
}
