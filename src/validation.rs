//! Schema validation.
//!
//! Checks a configuration value against a [`Schema`]: presence of required
//! attributes, value types, nested block cardinality, and the [`Validator`]s
//! attached to each attribute. Values not yet known (the unknown sentinel) are
//! skipped because they can only be checked once they resolve.
//!
//! # Example
//!
//! ```
//! use terraform_provider_akeneo::schema::{Attribute, Schema};
//! use terraform_provider_akeneo::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("code", Attribute::required_string())
//!     .with_attribute("labels", Attribute::labels());
//!
//! let diagnostics = validate(&schema, &json!({"code": "color", "labels": {"en_US": "Color"}}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"code": "color", "labels": {"english": "Color"}}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("labels.english".to_string()));
//! ```
//!
//! [`Validator`]: crate::validators::Validator

use serde_json::Value;

use crate::schema::{Attribute, AttributeType, Block, Diagnostic, NestedBlock, Schema};
use crate::value::UNKNOWN_SENTINEL;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Optional attributes may be absent or null
/// - Computed-only attributes are skipped (provider sets these)
/// - Attribute types must match the schema
/// - Attribute validators run once the type matches
/// - Nested blocks are validated recursively with min/max item constraints
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        v if is_unknown(v) => return,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value)))
                    .with_attribute_if_not_empty(path),
            );
            return;
        },
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }

    for (name, nested) in &block.blocks {
        let block_path = join_path(path, name);
        validate_list_block(nested, obj.get(name), &block_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) if is_unknown(v) => {},
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                for validator in &attr.validators {
                    validator.check(path, v, diagnostics);
                }
            }
        },
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if is_unknown(value) {
        return;
    }

    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Number => {
            if !value.is_number() {
                diagnostics.push(type_error(path, "number", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        },
        AttributeType::Map(value_type) => {
            if let Some(obj) = value.as_object() {
                for (key, val) in obj {
                    let key_path = format!("{}.{}", path, key);
                    validate_attribute_type(value_type, val, &key_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "map", value));
            }
        },
    }
}

fn validate_list_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        None | Some(Value::Null) => {
            if nested.min_items > 0 {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s)",
                        path, nested.min_items
                    ))
                    .with_attribute(path),
                );
            }
        },
        Some(v) if is_unknown(v) => {},
        Some(Value::Array(arr)) => {
            let len = arr.len() as u32;

            if len < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s), got {}",
                        path, nested.min_items, len
                    ))
                    .with_attribute(path),
                );
            }

            // 0 means unlimited
            if nested.max_items > 0 && len > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' allows at most {} item(s), got {}",
                        path, nested.max_items, len
                    ))
                    .with_attribute(path),
                );
            }

            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                validate_block(&nested.block, item, &item_path, diagnostics);
            }
        },
        Some(v) => {
            diagnostics.push(
                Diagnostic::error(format!("Expected list for block '{}'", path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
        },
    }
}

fn is_unknown(value: &Value) -> bool {
    value.as_str() == Some(UNKNOWN_SENTINEL)
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            if n.is_i64() {
                true
            } else if let Some(f) = n.as_f64() {
                f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
            } else {
                false
            }
        },
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!(
            "Expected {}, got {}",
            expected,
            value_type_name(got)
        ))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeFlags, Block, NestedBlock, Schema};
    use crate::validators::Validator;
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("code", Attribute::required_string());

        assert!(validate(&schema, &json!({"code": "color"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("code".to_string()));

        let diagnostics = validate(&schema, &json!({"code": null}));
        assert_eq!(diagnostics.len(), 1);

        let diagnostics = validate(&schema, &json!({"code": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_attribute() {
        let schema = Schema::v0().with_attribute("sort_order", Attribute::optional_int64());

        assert!(validate(&schema, &json!({"sort_order": 42})).is_empty());
        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"sort_order": null})).is_empty());
        assert_eq!(validate(&schema, &json!({"sort_order": "ten"})).len(), 1);
    }

    #[test]
    fn test_unknown_values_are_skipped() {
        let schema = Schema::v0()
            .with_attribute("code", Attribute::required_string())
            .with_attribute(
                "sort_order",
                Attribute::optional_int64()
                    .with_validator(Validator::Int64Between { min: 0, max: 10 }),
            )
            .with_attribute("labels", Attribute::labels());

        let diagnostics = validate(
            &schema,
            &json!({"code": "__unknown__", "sort_order": "__unknown__", "labels": "__unknown__"}),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute(
            "attributes",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::computed(),
            ),
        );

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"attributes": 123})).is_empty());
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("level", Attribute::required_int64());

        assert!(validate(&schema, &json!({"level": 42})).is_empty());
        assert!(validate(&schema, &json!({"level": 42.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"level": 42.5})).len(), 1);
        assert_eq!(validate(&schema, &json!({"level": "42"})).len(), 1);
    }

    #[test]
    fn test_validate_number_and_bool() {
        let schema = Schema::v0()
            .with_attribute("number_min", Attribute::optional_number())
            .with_attribute("unique", Attribute::optional_bool());

        assert!(validate(&schema, &json!({"number_min": 12.5, "unique": true})).is_empty());
        assert_eq!(
            validate(&schema, &json!({"number_min": "12.5", "unique": "true"})).len(),
            2
        );
    }

    #[test]
    fn test_validate_list() {
        let schema = Schema::v0().with_attribute("locales", Attribute::required_string_list());

        assert!(validate(&schema, &json!({"locales": ["en_US", "fr_FR"]})).is_empty());
        assert!(validate(&schema, &json!({"locales": []})).is_empty());

        let diagnostics = validate(&schema, &json!({"locales": ["en_US", 123]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("locales.1".to_string()));

        assert_eq!(validate(&schema, &json!({"locales": "en_US"})).len(), 1);
    }

    #[test]
    fn test_validate_map_of_lists() {
        let schema = Schema::v0().with_attribute(
            "attribute_requirements",
            Attribute::new(
                AttributeType::map(AttributeType::list(AttributeType::String)),
                AttributeFlags::optional(),
            ),
        );

        assert!(validate(
            &schema,
            &json!({"attribute_requirements": {"ecommerce": ["sku", "name"]}})
        )
        .is_empty());

        let diagnostics = validate(
            &schema,
            &json!({"attribute_requirements": {"ecommerce": "sku"}}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("attribute_requirements.ecommerce".to_string())
        );
    }

    #[test]
    fn test_validators_run_after_type_check() {
        let schema = Schema::v0().with_attribute(
            "available_locales",
            Attribute::optional_string_list().with_validator(Validator::ListValuesLocaleCode),
        );

        let diagnostics = validate(&schema, &json!({"available_locales": ["en_US", "en-GB"]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid Attribute Value Match");
        assert_eq!(
            diagnostics[0].attribute,
            Some("available_locales.1".to_string())
        );

        // A type error suppresses the value checks for that attribute.
        let diagnostics = validate(&schema, &json!({"available_locales": "en-GB"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_nested_block_list() {
        let schema = Schema::v0().with_block(
            "units",
            NestedBlock::list(
                Block::new()
                    .with_attribute("code", Attribute::required_string())
                    .with_attribute("labels", Attribute::labels())
                    .with_block(
                        "convert_from_standard",
                        NestedBlock::list(Block::new().with_attribute(
                            "operator",
                            Attribute::required_string()
                                .with_validator(Validator::ConversionOperator),
                        ))
                        .with_min_items(1),
                    ),
            )
            .with_min_items(1),
        );

        let valid = json!({"units": [{
            "code": "KILOGRAM",
            "labels": {"en_US": "Kilogram"},
            "convert_from_standard": [{"operator": "mul"}]
        }]});
        assert!(validate(&schema, &valid).is_empty());

        let diagnostics = validate(&schema, &json!({"units": []}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("at least 1"));

        let diagnostics = validate(
            &schema,
            &json!({"units": [{"code": "KILOGRAM", "convert_from_standard": [{"operator": "pow"}]}]}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("units.0.convert_from_standard.0.operator".to_string())
        );

        let diagnostics = validate(&schema, &json!({"units": {"code": "KILOGRAM"}}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected list"));
    }

    #[test]
    fn test_validate_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("code", Attribute::required_string())
            .with_attribute("sort_order", Attribute::optional_int64())
            .with_attribute("unique", Attribute::optional_bool());

        let diagnostics = validate(
            &schema,
            &json!({"code": 123, "sort_order": "first", "unique": "yes"}),
        );
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = Schema::v0().with_attribute("code", Attribute::required_string());

        let diagnostics = validate(&schema, &json!("not an object"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected object"));
    }
}
