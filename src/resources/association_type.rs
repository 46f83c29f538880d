//! `akeneo_association_type`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, AssociationType};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Schema};
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationTypeModel {
    pub code: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub is_quantified: TfValue<bool>,
    pub is_two_way: TfValue<bool>,
}

pub struct AssociationTypeResource;

#[async_trait]
impl AkeneoResource for AssociationTypeResource {
    type Model = AssociationTypeModel;
    type Api = AssociationType;

    fn type_name(&self) -> &'static str {
        "akeneo_association_type"
    }

    fn entity(&self) -> &'static str {
        "association type"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::PatchUpsert
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo association type resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Association type code")
                    .with_force_new(),
            )
            .with_attribute("labels", Attribute::labels())
            .with_attribute(
                "is_quantified",
                Attribute::optional_bool()
                    .with_description("When true, the association is a quantified association")
                    .with_force_new(),
            )
            .with_attribute(
                "is_two_way",
                Attribute::optional_bool()
                    .with_description("When true, the association is a two-way association")
                    .with_force_new(),
            )
    }

    fn key(&self, model: &AssociationTypeModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> AssociationTypeModel {
        AssociationTypeModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &AssociationTypeModel) -> Result<AssociationType, ProviderError> {
        Ok(AssociationType {
            code: required_code(&model.code, "code")?,
            labels: model.labels.known(),
            is_quantified: model.is_quantified.known(),
            is_two_way: model.is_two_way.known(),
        })
    }

    fn merge_api(
        &self,
        model: &mut AssociationTypeModel,
        api: AssociationType,
    ) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        mapping::merge_map(&mut model.labels, api.labels);
        model.is_quantified.merge(api.is_quantified);
        model.is_two_way.merge(api.is_two_way);
        Ok(())
    }

    async fn fetch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
    ) -> Result<AssociationType, ProviderError> {
        client.get_association_type(&key.to_string()).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &AssociationType,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.upsert_association_type(api).await.map(|_| ())
    }
}
