//! Akeneo PIM REST API client and wire models.

mod association;
mod attribute;
mod category;
mod channel;
pub mod client;
mod family;
mod measurement;

pub use association::AssociationType;
pub use attribute::{Attribute, AttributeGroup, AttributeOption};
pub use category::Category;
pub use channel::Channel;
pub use client::{AkeneoClient, Credentials};
pub use family::{Family, FamilyVariant, VariantAttributeSet};
pub use measurement::{
    patch_response_diagnostics, MeasurementFamily, MeasurementFamilyPatchResponse,
    MeasurementUnit, MeasurementUnitConversion, PatchValidationError,
};

/// REST path prefix for every entity endpoint.
pub const API_PREFIX: &str = "/api/rest/v1";

/// OAuth token endpoint.
pub const TOKEN_PATH: &str = "/api/oauth/v1/token";

/// Lenient deserializers for shapes Akeneo encodes inconsistently.
pub(crate) mod de {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMap<V> {
        Map(BTreeMap<String, Option<V>>),
        // PHP serializes an empty associative array as `[]`
        List(Vec<Value>),
    }

    /// A string-keyed map that may arrive as `[]` when empty and may hold
    /// `null` values, which are dropped.
    pub fn map<'de, D, V>(deserializer: D) -> Result<Option<BTreeMap<String, V>>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        Ok(
            match Option::<RawMap<V>>::deserialize(deserializer)? {
                Some(RawMap::Map(map)) => Some(
                    map.into_iter()
                        .filter_map(|(k, v)| v.map(|v| (k, v)))
                        .collect(),
                ),
                Some(RawMap::List(_)) => Some(BTreeMap::new()),
                None => None,
            },
        )
    }

    /// A decimal that may arrive either as a JSON string or a JSON number.
    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[derive(Debug, Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "map")]
            labels: Option<BTreeMap<String, String>>,
            #[serde(default, deserialize_with = "decimal")]
            number_min: Option<String>,
        }

        #[test]
        fn test_map_shapes() {
            let probe: Probe = serde_json::from_value(json!({"labels": []})).unwrap();
            assert_eq!(probe.labels, Some(BTreeMap::new()));

            let probe: Probe =
                serde_json::from_value(json!({"labels": {"en_US": "Color", "fr_FR": null}}))
                    .unwrap();
            let labels = probe.labels.unwrap();
            assert_eq!(labels.len(), 1);
            assert_eq!(labels["en_US"], "Color");

            let probe: Probe = serde_json::from_value(json!({})).unwrap();
            assert!(probe.labels.is_none());
        }

        #[test]
        fn test_decimal_shapes() {
            let probe: Probe = serde_json::from_value(json!({"number_min": "1.5000"})).unwrap();
            assert_eq!(probe.number_min.as_deref(), Some("1.5000"));

            let probe: Probe = serde_json::from_value(json!({"number_min": 3})).unwrap();
            assert_eq!(probe.number_min.as_deref(), Some("3"));

            let probe: Probe = serde_json::from_value(json!({"number_min": null})).unwrap();
            assert!(probe.number_min.is_none());
        }
    }
}
