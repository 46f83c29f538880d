//! `akeneo_channel`

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{AkeneoClient, Channel};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Schema};
use crate::validators::Validator;
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelModel {
    pub code: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub locales: TfValue<Vec<String>>,
    pub currencies: TfValue<Vec<String>>,
    pub category_tree: TfValue<String>,
    pub conversion_units: TfValue<BTreeMap<String, String>>,
}

pub struct ChannelResource;

#[async_trait]
impl AkeneoResource for ChannelResource {
    type Model = ChannelModel;
    type Api = Channel;

    fn type_name(&self) -> &'static str {
        "akeneo_channel"
    }

    fn entity(&self) -> &'static str {
        "channel"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::Post
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Akeneo channel resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Channel code")
                    .with_force_new(),
            )
            .with_attribute("labels", Attribute::labels())
            .with_attribute(
                "locales",
                Attribute::required_string_list()
                    .with_description("Codes of activated locales for the channel")
                    .with_validator(Validator::ListSizeAtLeast { min: 1 })
                    .with_validator(Validator::ListValuesLocaleCode),
            )
            .with_attribute(
                "currencies",
                Attribute::required_string_list()
                    .with_description("Codes of activated currencies for the channel")
                    .with_validator(Validator::ListSizeAtLeast { min: 1 }),
            )
            .with_attribute(
                "category_tree",
                Attribute::required_string()
                    .with_description("Code of the category tree linked to the channel"),
            )
            .with_attribute(
                "conversion_units",
                Attribute::optional_string_map().with_description(
                    "Units to which the given metric attributes should be converted when exporting products",
                ),
            )
    }

    fn key(&self, model: &ChannelModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> ChannelModel {
        ChannelModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &ChannelModel) -> Result<Channel, ProviderError> {
        Ok(Channel {
            code: required_code(&model.code, "code")?,
            labels: model.labels.known(),
            locales: model.locales.known(),
            currencies: model.currencies.known(),
            category_tree: model.category_tree.known(),
            conversion_units: model.conversion_units.known(),
        })
    }

    fn merge_api(&self, model: &mut ChannelModel, api: Channel) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        mapping::merge_map(&mut model.labels, api.labels);
        mapping::merge_list(&mut model.locales, api.locales);
        mapping::merge_list(&mut model.currencies, api.currencies);
        model.category_tree.merge(api.category_tree);
        mapping::merge_map(&mut model.conversion_units, api.conversion_units);
        Ok(())
    }

    async fn fetch(&self, client: &AkeneoClient, key: &ImportKey) -> Result<Channel, ProviderError> {
        client.get_channel(&key.to_string()).await
    }

    async fn post(&self, client: &AkeneoClient, api: &Channel) -> Result<(), ProviderError> {
        client.create_channel(api).await
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &Channel,
        _action: &str,
    ) -> Result<(), ProviderError> {
        client.update_channel(api).await.map(|_| ())
    }
}
