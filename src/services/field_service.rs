//! Custom field sanitization.
//!
//! Customers carry a free-form custom field payload whose schema is owned by
//! the fields module. Every write goes through [`FieldService::clean_multi`].

use crate::domain::{EmailAddress, PhoneNumber};
use crate::error::{CustomerError, CustomerResult};
use crate::models::CustomFieldData;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

/// Value type declared by a custom field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Email,
    Phone,
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "email" => Ok(FieldType::Email),
            "phone" => Ok(FieldType::Phone),
            other => Err(format!("Unknown field type: {}", other)),
        }
    }
}

/// A custom field known to the fields module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
}

fn default_field_type() -> FieldType {
    FieldType::Text
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            field_type,
            is_required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// Sanitizer for custom field payloads.
///
/// Implementations must accept an absent payload (treated as empty), drop
/// unknown field ids, coerce values to their declared types, and be
/// idempotent.
#[async_trait]
pub trait FieldService: Send + Sync {
    async fn clean_multi(&self, data: Option<CustomFieldData>) -> CustomerResult<CustomFieldData>;
}

/// Field service backed by a fixed set of field definitions.
#[derive(Debug, Clone, Default)]
pub struct SchemaFieldService {
    definitions: HashMap<String, FieldDefinition>,
}

impl SchemaFieldService {
    pub fn new(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|definition| (definition.id.clone(), definition))
                .collect(),
        }
    }

    pub fn definition(&self, id: &str) -> Option<&FieldDefinition> {
        self.definitions.get(id)
    }

    /// Coerce one value. `Ok(None)` means the value is blank and dropped.
    fn clean(&self, definition: &FieldDefinition, value: Value) -> CustomerResult<Option<Value>> {
        let invalid = |reason: &str| CustomerError::InvalidField {
            field: definition.id.clone(),
            reason: reason.to_string(),
        };

        let text = match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) if definition.field_type == FieldType::Number => {
                return Ok(Some(Value::Number(n)));
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) => return Err(invalid("expected a scalar value")),
        };

        let Some(text) = text else {
            if definition.is_required {
                return Err(invalid("value is required"));
            }
            return Ok(None);
        };

        let cleaned = match definition.field_type {
            FieldType::Text => Value::String(text),
            FieldType::Number => parse_number(&text).ok_or_else(|| invalid("invalid number"))?,
            FieldType::Date => Value::String(parse_date(&text).ok_or_else(|| invalid("invalid date"))?),
            FieldType::Email => Value::String(
                EmailAddress::new(text)
                    .map_err(|e| invalid(&e.to_string()))?
                    .into_inner(),
            ),
            FieldType::Phone => Value::String(
                PhoneNumber::new(text)
                    .map_err(|e| invalid(&e.to_string()))?
                    .into_inner(),
            ),
        };

        Ok(Some(cleaned))
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Normalize RFC 3339 timestamps and plain `YYYY-MM-DD` dates to UTC RFC 3339.
fn parse_date(text: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })?;

    Some(parsed.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[async_trait]
impl FieldService for SchemaFieldService {
    async fn clean_multi(&self, data: Option<CustomFieldData>) -> CustomerResult<CustomFieldData> {
        let mut cleaned = CustomFieldData::new();

        for (field_id, value) in data.unwrap_or_default() {
            let Some(definition) = self.definition(&field_id) else {
                tracing::debug!(field_id = %field_id, "Dropping unknown custom field");
                continue;
            };
            if let Some(value) = self.clean(definition, value)? {
                cleaned.insert(field_id, value);
            }
        }

        Ok(cleaned)
    }
}
