//! Field conversions shared by the resource adapters.
//!
//! Model to wire: a field is sent only when it is [`TfValue::Known`].
//! Wire to model: a field is overwritten only when the server returned it,
//! and for collections only when the collection is non-empty.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ProviderError;
use crate::value::TfValue;

/// Labels keyed by locale code.
pub type Labels = BTreeMap<String, String>;

/// Merge a wire collection over a model field, ignoring empty collections.
pub fn merge_list<T>(target: &mut TfValue<Vec<T>>, wire: Option<Vec<T>>) {
    target.merge(wire.filter(|items| !items.is_empty()));
}

/// Merge a wire map over a model field, ignoring empty maps.
pub fn merge_map<V>(target: &mut TfValue<BTreeMap<String, V>>, wire: Option<BTreeMap<String, V>>) {
    target.merge(wire.filter(|map| !map.is_empty()));
}

/// Format a number the way Akeneo stores decimals.
///
/// The shortest representation that parses back to the same value, without
/// exponent notation: `12.5` becomes `"12.5"` and `10.0` becomes `"10"`.
pub fn number_to_wire(value: f64) -> String {
    value.to_string()
}

/// Parse a decimal string returned by Akeneo.
pub fn number_from_wire(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim().parse::<f64>().map_err(|e| {
        ProviderError::Mapping(format!(
            "Error parsing float value for {}: {:?}: {}",
            field, raw, e
        ))
    })
}

/// Format an integer as a decimal string.
pub fn integer_to_wire(value: i64) -> String {
    value.to_string()
}

/// Parse an integer decimal string returned by Akeneo.
///
/// Akeneo stores some integers as decimals, so `"10.00"` is accepted as `10`.
/// A non-zero fractional part is an error.
pub fn integer_from_wire(field: &str, raw: &str) -> Result<i64, ProviderError> {
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if !fraction.chars().all(|c| c == '0') {
        return Err(ProviderError::Mapping(format!(
            "Error parsing integer value for {}: {:?}: non-zero fractional part",
            field, raw
        )));
    }
    whole.parse::<i64>().map_err(|e| {
        ProviderError::Mapping(format!(
            "Error parsing integer value for {}: {:?}: {}",
            field, raw, e
        ))
    })
}

/// Decode table columns configured as JSON strings into wire objects.
pub fn table_configuration_to_wire(columns: &[String]) -> Result<Vec<Value>, ProviderError> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| match serde_json::from_str::<Value>(column) {
            Ok(value @ Value::Object(_)) => Ok(value),
            Ok(_) => Err(ProviderError::Mapping(format!(
                "table_configuration[{}] must be a JSON object",
                i
            ))),
            Err(e) => Err(ProviderError::Mapping(format!(
                "table_configuration[{}] is not valid JSON: {}",
                i, e
            ))),
        })
        .collect()
}

/// Encode wire table columns as JSON strings for the model.
pub fn table_configuration_from_wire(columns: &[Value]) -> Result<Vec<String>, ProviderError> {
    columns
        .iter()
        .map(|column| serde_json::to_string(column).map_err(ProviderError::from))
        .collect()
}
