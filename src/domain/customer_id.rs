//! CustomerId value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a stored customer.
///
/// Service entry points wrap incoming id strings in a `CustomerId` so blank
/// ids are rejected before any store is touched.
///
/// # Example
///
/// ```
/// use customer_core::domain::CustomerId;
///
/// let id = CustomerId::new(" cust_1 ").unwrap();
/// assert_eq!(id.as_str(), "cust_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(String);

impl CustomerId {
    /// Create a new CustomerId from a trimmed, non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyId` if nothing but whitespace is given.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Validate a list of ids, failing on the first blank entry or an empty list.
    pub fn parse_all(ids: &[String]) -> Result<Vec<Self>, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::EmptyIdList);
        }
        ids.iter().map(|id| Self::new(id.as_str())).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CustomerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CustomerId::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
