//! Import identifiers.
//!
//! Most entities are identified by `code` alone. Entities nested under a
//! parent use a `/`-joined id: `attribute/code` for attribute options and
//! `family_code/code` for family variants.

use std::fmt;

use crate::error::ProviderError;

/// A parsed import identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportKey {
    parts: Vec<String>,
}

impl ImportKey {
    /// Build a key from its components.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `id` into exactly `fields.len()` non-empty components.
    ///
    /// `fields` names the components and is only used for the error message.
    pub fn parse(id: &str, fields: &[&str]) -> Result<Self, ProviderError> {
        let parts: Vec<&str> = id.split('/').collect();

        if parts.len() != fields.len() || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(ProviderError::InvalidImportId(format!(
                "Expected import identifier with format: {}. Got: {:?}",
                fields.join("/"),
                id
            )));
        }

        Ok(Self::new(parts))
    }

    /// The components in order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for ImportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("/"))
    }
}
