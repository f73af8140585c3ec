//! EmailAddress value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A syntactically plausible email address.
///
/// Surrounding whitespace is dropped and the domain is lowercased; the local
/// part keeps its case. Used to coerce `email` custom fields and to accept
/// contact details left by messenger visitors.
///
/// # Example
///
/// ```
/// use customer_core::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Jane@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Jane@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address.
    ///
    /// Requires exactly one '@', a non-empty local part and a dotted domain
    /// without empty labels.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = email.into();
        let trimmed = raw.trim();

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(ValidationError::InvalidEmail(raw));
        };

        let domain_ok = domain.contains('.')
            && !domain.contains('@')
            && domain.split('.').all(|label| !label.is_empty());

        if local.is_empty() || local.contains(char::is_whitespace) || !domain_ok {
            return Err(ValidationError::InvalidEmail(raw));
        }

        Ok(Self(format!("{}@{}", local, domain.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
