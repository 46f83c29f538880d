//! Tri-state attribute values as exchanged with the host.
//!
//! Every model field is a [`TfValue`]: the host either left it out (`Null`),
//! cannot know it until apply (`Unknown`), or configured it (`Known`). On the
//! JSON boundary an unknown value is the string [`UNKNOWN_SENTINEL`].

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// JSON encoding of a value that is not known until apply.
pub const UNKNOWN_SENTINEL: &str = "__unknown__";

/// A host attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum TfValue<T> {
    /// Not set in configuration or state.
    Null,
    /// Will be known after apply.
    Unknown,
    /// A concrete value.
    Known(T),
}

impl<T> TfValue<T> {
    /// Whether the value is concrete.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the concrete value, if any.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the concrete value, dropping null and unknown.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Overwrite with `value` when it is present; keep the current value otherwise.
    pub fn merge(&mut self, value: Option<T>) {
        if let Some(v) = value {
            *self = Self::Known(v);
        }
    }
}

impl<T: Clone> TfValue<T> {
    /// Clone the concrete value, if any.
    pub fn known(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl<T> Default for TfValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for TfValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T: Serialize> Serialize for TfValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
            Self::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for TfValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::String(ref s) if s == UNKNOWN_SENTINEL => Ok(Self::Unknown),
            other => serde_json::from_value(other)
                .map(Self::Known)
                .map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Model {
        code: TfValue<String>,
        sort_order: TfValue<i64>,
        labels: TfValue<std::collections::BTreeMap<String, String>>,
    }

    #[test]
    fn test_decode_tri_state() {
        let model: Model =
            serde_json::from_value(json!({"code": "color", "sort_order": "__unknown__"})).unwrap();
        assert_eq!(model.code, TfValue::Known("color".to_string()));
        assert_eq!(model.sort_order, TfValue::Unknown);
        assert_eq!(model.labels, TfValue::Null);
    }

    #[test]
    fn test_encode_tri_state() {
        let model = Model {
            code: TfValue::Known("color".to_string()),
            sort_order: TfValue::Unknown,
            labels: TfValue::Null,
        };
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({"code": "color", "sort_order": "__unknown__", "labels": null})
        );
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<Model, _> = serde_json::from_value(json!({"sort_order": "ten"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_keeps_prior_when_absent() {
        let mut v: TfValue<i64> = TfValue::Known(3);
        v.merge(None);
        assert_eq!(v, TfValue::Known(3));
        v.merge(Some(7));
        assert_eq!(v, TfValue::Known(7));

        let from_none: TfValue<i64> = None.into();
        assert!(from_none.is_null());
    }
}
