//! `akeneo_measurement_family`
//!
//! Akeneo has no single-family endpoints, so reads scan the collection and
//! writes go through the batch PATCH. A rejected batch item is reported as
//! diagnostics built from its validation errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{required_code, AkeneoResource, CreateMode};
use crate::akeneo::{
    patch_response_diagnostics, AkeneoClient, MeasurementFamily, MeasurementUnit,
    MeasurementUnitConversion,
};
use crate::error::ProviderError;
use crate::identity::ImportKey;
use crate::mapping::{self, Labels};
use crate::schema::{Attribute, Block, NestedBlock, Schema};
use crate::validators::Validator;
use crate::value::TfValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementUnitConversionModel {
    pub operator: TfValue<String>,
    pub value: TfValue<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementUnitModel {
    pub code: TfValue<String>,
    pub symbol: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub convert_from_standard: TfValue<Vec<MeasurementUnitConversionModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementFamilyModel {
    pub code: TfValue<String>,
    pub standard_unit_code: TfValue<String>,
    pub labels: TfValue<Labels>,
    pub units: TfValue<Vec<MeasurementUnitModel>>,
}

impl MeasurementUnitModel {
    fn to_api(&self) -> Result<MeasurementUnit, ProviderError> {
        let convert_from_standard = self
            .convert_from_standard
            .as_known()
            .map(|steps| {
                steps
                    .iter()
                    .map(|step| {
                        Ok(MeasurementUnitConversion {
                            operator: required_code(&step.operator, "units.convert_from_standard.operator")?,
                            value: required_code(&step.value, "units.convert_from_standard.value")?,
                        })
                    })
                    .collect::<Result<Vec<_>, ProviderError>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(MeasurementUnit {
            code: required_code(&self.code, "units.code")?,
            labels: self.labels.known(),
            convert_from_standard,
            symbol: self.symbol.known(),
        })
    }

    fn from_api(unit: MeasurementUnit) -> Self {
        let mut model = Self {
            code: TfValue::Known(unit.code),
            ..Default::default()
        };
        model.symbol.merge(unit.symbol);
        mapping::merge_map(&mut model.labels, unit.labels);
        let steps = unit
            .convert_from_standard
            .into_iter()
            .map(|step| MeasurementUnitConversionModel {
                operator: TfValue::Known(step.operator),
                value: TfValue::Known(step.value),
            })
            .collect();
        mapping::merge_list(&mut model.convert_from_standard, Some(steps));
        model
    }
}

pub struct MeasurementFamilyResource;

#[async_trait]
impl AkeneoResource for MeasurementFamilyResource {
    type Model = MeasurementFamilyModel;
    type Api = MeasurementFamily;

    fn type_name(&self) -> &'static str {
        "akeneo_measurement_family"
    }

    fn entity(&self) -> &'static str {
        "measurement family"
    }

    fn create_mode(&self) -> CreateMode {
        CreateMode::PatchUpsert
    }

    fn schema(&self) -> Schema {
        let conversion = Block::new()
            .with_description("Calculation to convert the unit from the standard unit.")
            .with_attribute(
                "operator",
                Attribute::required_string()
                    .with_description("The operator for a conversion operation to convert a unit from the standard unit.")
                    .with_validator(Validator::ConversionOperator),
            )
            .with_attribute(
                "value",
                Attribute::required_string()
                    .with_description("The value for a conversion operation to convert the unit from the standard unit.")
                    .with_validator(Validator::DecimalString),
            );

        let unit = Block::new()
            .with_description("Unit definitions")
            .with_attribute(
                "code",
                Attribute::required_string().with_description("Measurement unit code."),
            )
            .with_attribute("labels", Attribute::labels())
            .with_attribute(
                "symbol",
                Attribute::required_string().with_description("Measurement unit symbol."),
            )
            .with_block(
                "convert_from_standard",
                NestedBlock::list(conversion).with_min_items(1),
            );

        Schema::v0()
            .with_description("Akeneo measurement family resource")
            .with_attribute(
                "code",
                Attribute::required_string()
                    .with_description("Measurement family code (preferred uppercase values to follow Akeneo's convention)")
                    .with_force_new(),
            )
            .with_attribute(
                "standard_unit_code",
                Attribute::required_string()
                    .with_description("Unit code used as the standard unit for this measurement family"),
            )
            .with_attribute("labels", Attribute::labels())
            .with_block("units", NestedBlock::list(unit).with_min_items(1))
    }

    fn key(&self, model: &MeasurementFamilyModel) -> Result<ImportKey, ProviderError> {
        Ok(ImportKey::new([required_code(&model.code, "code")?]))
    }

    fn import_model(&self, key: &ImportKey) -> MeasurementFamilyModel {
        MeasurementFamilyModel {
            code: TfValue::Known(key.to_string()),
            ..Default::default()
        }
    }

    fn to_api(&self, model: &MeasurementFamilyModel) -> Result<MeasurementFamily, ProviderError> {
        let mut units = std::collections::BTreeMap::new();
        for unit in model.units.as_known().into_iter().flatten() {
            let unit = unit.to_api()?;
            units.insert(unit.code.clone(), unit);
        }

        Ok(MeasurementFamily {
            code: required_code(&model.code, "code")?,
            labels: model.labels.known(),
            standard_unit_code: model.standard_unit_code.known(),
            units,
        })
    }

    fn merge_api(
        &self,
        model: &mut MeasurementFamilyModel,
        api: MeasurementFamily,
    ) -> Result<(), ProviderError> {
        model.code = TfValue::Known(api.code);
        model.standard_unit_code.merge(api.standard_unit_code);
        mapping::merge_map(&mut model.labels, api.labels);

        // BTreeMap iteration keeps units sorted by code
        let units: Vec<_> = api
            .units
            .into_values()
            .map(MeasurementUnitModel::from_api)
            .collect();
        mapping::merge_list(&mut model.units, Some(units));
        Ok(())
    }

    async fn fetch(
        &self,
        client: &AkeneoClient,
        key: &ImportKey,
    ) -> Result<MeasurementFamily, ProviderError> {
        let code = key.to_string();
        client
            .get_measurement_family(&code)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("measurement family {:?}", code)))
    }

    async fn patch(
        &self,
        client: &AkeneoClient,
        _key: &ImportKey,
        api: &MeasurementFamily,
        action: &str,
    ) -> Result<(), ProviderError> {
        let responses = client
            .update_measurement_families(std::slice::from_ref(api))
            .await?;

        let diagnostics = patch_response_diagnostics(action, &responses);
        if diagnostics.is_empty() {
            return Ok(());
        }

        warn!(
            code = %api.code,
            errors = diagnostics.len(),
            "Measurement family rejected by Akeneo"
        );
        Err(ProviderError::Diagnostics(diagnostics))
    }
}
