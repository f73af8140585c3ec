//! Identity fields and record exclusion used by duplicate detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute that must be unique across active customers.
///
/// Variants are declared in the order the duplication checker evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityField {
    Twitter,
    Facebook,
    Email,
    Phone,
}

impl IdentityField {
    /// All identity fields in evaluation order.
    pub const ALL: [IdentityField; 4] = [
        IdentityField::Twitter,
        IdentityField::Facebook,
        IdentityField::Email,
        IdentityField::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityField::Twitter => "twitter",
            IdentityField::Facebook => "facebook",
            IdentityField::Email => "email",
            IdentityField::Phone => "phone",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records left out of a duplicate search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Exclusion {
    /// Every stored record is considered.
    #[default]
    None,
    /// A single record (usually the one being updated) is skipped.
    One(String),
    /// A set of records (usually the ones being merged) is skipped.
    Many(Vec<String>),
}

impl Exclusion {
    /// Whether the record with `id` is excluded.
    pub fn excludes(&self, id: &str) -> bool {
        match self {
            Exclusion::None => false,
            Exclusion::One(excluded) => excluded == id,
            Exclusion::Many(excluded) => excluded.iter().any(|e| e == id),
        }
    }
}

impl From<&str> for Exclusion {
    fn from(id: &str) -> Self {
        Exclusion::One(id.to_string())
    }
}

impl From<Vec<String>> for Exclusion {
    fn from(ids: Vec<String>) -> Self {
        Exclusion::Many(ids)
    }
}
