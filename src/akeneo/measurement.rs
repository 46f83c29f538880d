//! Measurement family endpoints.
//!
//! Akeneo only exposes the collection: reads fetch every family and writes
//! go through a batch PATCH answered with one status object per family.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{de, AkeneoClient, API_PREFIX};
use crate::error::ProviderError;
use crate::mapping::Labels;
use crate::schema::Diagnostic;

/// One arithmetic step converting a value from the standard unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementUnitConversion {
    pub operator: String,
    pub value: String,
}

/// A unit within a measurement family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(default)]
    pub convert_from_standard: Vec<MeasurementUnitConversion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// A measurement family. Units are keyed by unit code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFamily {
    pub code: String,
    #[serde(
        default,
        deserialize_with = "de::map",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_unit_code: Option<String>,
    #[serde(default)]
    pub units: BTreeMap<String, MeasurementUnit>,
}

/// A property-level validation error in a batch response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchValidationError {
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of one family in a batch PATCH.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementFamilyPatchResponse {
    pub code: String,
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<PatchValidationError>,
}

impl MeasurementFamilyPatchResponse {
    /// Whether Akeneo rejected this family.
    pub fn is_failure(&self) -> bool {
        self.status_code > 299
    }
}

/// Turn rejected batch items into diagnostics.
///
/// Each structured validation error becomes one diagnostic pointing at its
/// property. The item message is reported only when there are no structured
/// errors. `action` is the verb used in the summary, e.g. `creating`.
pub fn patch_response_diagnostics(
    action: &str,
    responses: &[MeasurementFamilyPatchResponse],
) -> Vec<Diagnostic> {
    let summary = format!("Error while {} a measurement family", action);
    let mut diagnostics = Vec::new();

    for response in responses.iter().filter(|r| r.is_failure()) {
        if response.errors.is_empty() {
            let message = if response.message.is_empty() {
                format!("status code {}", response.status_code)
            } else {
                response.message.clone()
            };
            diagnostics.push(Diagnostic::error(&summary).with_detail(format!(
                "An unexpected error occurred when {} measurement family. \n\nAkeneo API Error: {}",
                action, message
            )));
            continue;
        }

        for error in &response.errors {
            diagnostics.push(
                Diagnostic::error(&summary)
                    .with_detail(format!(
                        "A validation error was returned from the Akeneo API. \n\nValidation Error: {}\nOn property: {}\n",
                        error.message, error.property
                    ))
                    .with_attribute_if_not_empty(&error.property),
            );
        }
    }

    diagnostics
}

impl AkeneoClient {
    /// List every measurement family
    pub async fn get_measurement_families(&self) -> Result<Vec<MeasurementFamily>, ProviderError> {
        self.get(&format!("{}/measurement-families", API_PREFIX))
            .await
    }

    /// Find a measurement family by code. A missing code is `Ok(None)`.
    pub async fn get_measurement_family(
        &self,
        code: &str,
    ) -> Result<Option<MeasurementFamily>, ProviderError> {
        Ok(self
            .get_measurement_families()
            .await?
            .into_iter()
            .find(|family| family.code == code))
    }

    /// Create or update measurement families in one batch
    pub async fn update_measurement_families(
        &self,
        families: &[MeasurementFamily],
    ) -> Result<Vec<MeasurementFamilyPatchResponse>, ProviderError> {
        self.patch_list(&format!("{}/measurement-families", API_PREFIX), families)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn families_body() -> serde_json::Value {
        json!([
            {
                "code": "AREA",
                "labels": {"en_US": "Area"},
                "standard_unit_code": "SQUARE_METER",
                "units": {
                    "SQUARE_METER": {
                        "code": "SQUARE_METER",
                        "labels": {"en_US": "Square meter"},
                        "convert_from_standard": [{"operator": "mul", "value": "1"}],
                        "symbol": "m²"
                    }
                }
            }
        ])
    }

    #[tokio::test]
    async fn test_get_measurement_family_scans_collection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rest/v1/measurement-families"))
            .respond_with(ResponseTemplate::new(200).set_body_json(families_body()))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let area = client.get_measurement_family("AREA").await.unwrap().unwrap();
        assert_eq!(area.standard_unit_code.as_deref(), Some("SQUARE_METER"));
        assert_eq!(area.units["SQUARE_METER"].symbol.as_deref(), Some("m²"));

        let missing = client.get_measurement_family("KILOGRAM").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_measurement_families_returns_items() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/rest/v1/measurement-families"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"code": "AREA", "status_code": 201}
            ])))
            .mount(&mock_server)
            .await;

        let client = AkeneoClient::with_token(mock_server.uri(), "token");
        let family = MeasurementFamily {
            code: "AREA".to_string(),
            ..Default::default()
        };
        let responses = client.update_measurement_families(&[family]).await.unwrap();
        assert_eq!(responses.len(), 1);
        assert!(!responses[0].is_failure());
        assert!(patch_response_diagnostics("creating", &responses).is_empty());
    }

    #[test]
    fn test_validation_errors_become_property_diagnostics() {
        let responses: Vec<MeasurementFamilyPatchResponse> = serde_json::from_value(json!([
            {"code": "LENGTH", "status_code": 204},
            {
                "code": "AREA",
                "status_code": 422,
                "message": "The measurement family has data that does not comply with the business rules.",
                "errors": [{"property": "units", "message": "The units must not be empty."}]
            }
        ]))
        .unwrap();

        let diagnostics = patch_response_diagnostics("updating", &responses);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Error while updating a measurement family");
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("units"));
        let detail = diagnostics[0].detail.as_deref().unwrap();
        assert!(detail.contains("The units must not be empty."));
        assert!(detail.contains("On property: units"));
    }

    #[test]
    fn test_message_reported_without_structured_errors() {
        let responses = vec![MeasurementFamilyPatchResponse {
            code: "AREA".to_string(),
            status_code: 500,
            message: "Internal error".to_string(),
            errors: Vec::new(),
        }];

        let diagnostics = patch_response_diagnostics("creating", &responses);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].attribute.is_none());
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .ends_with("Akeneo API Error: Internal error"));
    }
}
