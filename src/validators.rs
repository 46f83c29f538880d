//! Value validators attached to schema attributes.
//!
//! The predicates here are pure functions; [`Validator`] is the serializable
//! form a schema [`Attribute`](crate::schema::Attribute) carries, and knows how
//! to turn a failed predicate into a [`Diagnostic`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Diagnostic;
use crate::value::UNKNOWN_SENTINEL;

static LOCALE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").expect("locale code pattern compiles"));

static DECIMAL_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d*(\.\d+)?$").expect("decimal pattern compiles"));

/// Attribute types Akeneo ships out of the box.
pub const PIM_ATTRIBUTE_TYPES: &[&str] = &[
    "pim_catalog_identifier",
    "pim_catalog_text",
    "pim_catalog_textarea",
    "pim_catalog_simpleselect",
    "pim_catalog_multiselect",
    "pim_catalog_boolean",
    "pim_catalog_date",
    "pim_catalog_number",
    "pim_catalog_metric",
    "pim_catalog_price_collection",
    "pim_catalog_image",
    "pim_catalog_file",
    "pim_catalog_asset_collection",
    "akeneo_reference_entity",
    "akeneo_reference_entity_collection",
    "pim_reference_data_simpleselect",
    "pim_reference_data_multiselect",
    "pim_catalog_table",
];

/// Operators allowed in a measurement unit conversion step.
pub const CONVERSION_OPERATORS: &[&str] = &["add", "sub", "mul", "div"];

/// Returns true for a `language_COUNTRY` code such as `en_US`.
pub fn is_locale_code(value: &str) -> bool {
    LOCALE_CODE.is_match(value)
}

/// Returns true for one of `add`, `sub`, `mul`, `div`.
pub fn is_conversion_operator(value: &str) -> bool {
    CONVERSION_OPERATORS.contains(&value)
}

/// Returns true for a decimal literal as Akeneo stores conversion values.
pub fn is_decimal_string(value: &str) -> bool {
    DECIMAL_STRING.is_match(value)
}

/// Returns true when `value` is a built-in PIM type or one of `extra_types`.
pub fn is_pim_attribute_type(value: &str, extra_types: &[String]) -> bool {
    PIM_ATTRIBUTE_TYPES.contains(&value) || extra_types.iter().any(|t| t == value)
}

/// A check applied to a configured (non-null) attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// String must be a locale code.
    LocaleCode,
    /// Every key of a map must be a locale code.
    MapKeysLocaleCode,
    /// Every element of a list must be a locale code.
    ListValuesLocaleCode,
    /// String must be a conversion operator.
    ConversionOperator,
    /// String must contain only a decimal number.
    DecimalString,
    /// String must have at least this many characters.
    LengthAtLeast { min: usize },
    /// Every string element of a list must have at least this many characters.
    ListValuesLengthAtLeast { min: usize },
    /// List must have at least this many elements.
    ListSizeAtLeast { min: usize },
    /// Integer must lie in the inclusive range.
    Int64Between { min: i64, max: i64 },
}

impl Validator {
    /// Human-readable description of what the validator accepts.
    pub fn description(&self) -> String {
        match self {
            Self::LocaleCode | Self::ListValuesLocaleCode => {
                "value must be valid locale code (example 'en_US')".to_string()
            },
            Self::MapKeysLocaleCode => {
                "map keys must be valid locale codes (example 'en_US')".to_string()
            },
            Self::ConversionOperator => {
                format!("value must be one of: {:?}", CONVERSION_OPERATORS)
            },
            Self::DecimalString => "must only contain decimal values".to_string(),
            Self::LengthAtLeast { min } | Self::ListValuesLengthAtLeast { min } => {
                format!("string length must be at least {}", min)
            },
            Self::ListSizeAtLeast { min } => format!("list must contain at least {} elements", min),
            Self::Int64Between { min, max } => format!("value must be between {} and {}", min, max),
        }
    }

    /// Run the validator against a value already known to have the right type.
    pub fn check(&self, path: &str, value: &Value, diagnostics: &mut Vec<Diagnostic>) {
        match self {
            Self::LocaleCode => self.check_str(path, value, is_locale_code, diagnostics),
            Self::ConversionOperator => {
                self.check_str(path, value, is_conversion_operator, diagnostics)
            },
            Self::DecimalString => self.check_str(path, value, is_decimal_string, diagnostics),
            Self::LengthAtLeast { min } => {
                self.check_str(path, value, |s| s.chars().count() >= *min, diagnostics)
            },
            Self::MapKeysLocaleCode => {
                if let Some(map) = value.as_object() {
                    for key in map.keys().filter(|k| !is_locale_code(k)) {
                        diagnostics.push(self.invalid(&format!("{}.{}", path, key), key));
                    }
                }
            },
            Self::ListValuesLocaleCode => {
                self.check_elements(path, value, is_locale_code, diagnostics)
            },
            Self::ListValuesLengthAtLeast { min } => {
                self.check_elements(path, value, |s| s.chars().count() >= *min, diagnostics)
            },
            Self::ListSizeAtLeast { min } => {
                if let Some(items) = value.as_array() {
                    if items.len() < *min {
                        diagnostics.push(self.invalid(path, &items.len().to_string()));
                    }
                }
            },
            Self::Int64Between { min, max } => {
                if let Some(n) = value.as_i64() {
                    if n < *min || n > *max {
                        diagnostics.push(self.invalid(path, &n.to_string()));
                    }
                }
            },
        }
    }

    fn check_str(
        &self,
        path: &str,
        value: &Value,
        predicate: impl Fn(&str) -> bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if let Some(s) = value.as_str() {
            if !predicate(s) {
                diagnostics.push(self.invalid(path, s));
            }
        }
    }

    fn check_elements(
        &self,
        path: &str,
        value: &Value,
        predicate: impl Fn(&str) -> bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some(items) = value.as_array() else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if let Some(s) = item.as_str().filter(|s| *s != UNKNOWN_SENTINEL) {
                if !predicate(s) {
                    diagnostics.push(self.invalid(&format!("{}.{}", path, i), s));
                }
            }
        }
    }

    fn invalid(&self, path: &str, got: &str) -> Diagnostic {
        Diagnostic::error("Invalid Attribute Value Match")
            .with_detail(format!(
                "Attribute {} {}, got: {}",
                path,
                self.description(),
                got
            ))
            .with_attribute(path)
    }
}
