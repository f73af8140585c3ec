//! Bulk customer import.
//!
//! Turns spreadsheet-style rows (a header of column names plus rows of cell
//! values) into customers, creating each row through the customer service.

use crate::error::{CustomerError, CustomerResult};
use crate::models::{ActingUser, CustomFieldData, CustomerFields};
use crate::observability::ServiceMetrics;
use crate::services::customer_service::CustomerService;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Content type tag accepted by the customer importer.
pub const CUSTOMER_CONTENT_TYPE: &str = "customer";

/// Columns that map onto customer attributes instead of custom fields.
pub const CUSTOMER_BASIC_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "primaryEmail",
    "primaryPhone",
    "position",
    "department",
    "leadStatus",
    "lifecycleState",
    "hasAuthority",
    "description",
    "doNotDisturb",
    "ownerId",
    "integrationId",
];

const BOOLEAN_FIELDS: &[&str] = &["hasAuthority", "doNotDisturb"];

fn default_basic_fields() -> Vec<String> {
    CUSTOMER_BASIC_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_content_type() -> String {
    CUSTOMER_CONTENT_TYPE.to_string()
}

/// Input of one bulk import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkInsertParams {
    /// Column names, one per cell in each row
    pub field_names: Vec<String>,
    /// Rows of cell values
    pub field_values: Vec<Vec<String>>,
    /// Columns treated as customer attributes; the rest become custom fields
    #[serde(default = "default_basic_fields")]
    pub basic_fields: Vec<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub user: Option<ActingUser>,
}

impl BulkInsertParams {
    /// Customer import with the default basic-field allowlist.
    pub fn customers(field_names: Vec<String>, field_values: Vec<Vec<String>>) -> Self {
        Self {
            field_names,
            field_values,
            basic_fields: default_basic_fields(),
            content_type: default_content_type(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: ActingUser) -> Self {
        self.user = Some(user);
        self
    }
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// Zero-based index into `field_values`
    pub row: usize,
    pub message: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkInsertReport {
    pub content_type: String,
    pub inserted_ids: Vec<String>,
    pub errors: Vec<ImportRowError>,
}

impl BulkInsertReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Import service trait for bulk operations.
#[async_trait]
pub trait ImportService: Send + Sync {
    /// Create one customer per row, collecting per-row failures.
    async fn bulk_insert(&self, params: BulkInsertParams) -> CustomerResult<BulkInsertReport>;
}

/// Default implementation of ImportService.
pub struct ImportServiceImpl {
    customers: Arc<dyn CustomerService>,
    max_rows: usize,
    metrics: ServiceMetrics,
}

impl ImportServiceImpl {
    pub fn new(customers: Arc<dyn CustomerService>, max_rows: usize) -> Self {
        Self {
            customers,
            max_rows,
            metrics: ServiceMetrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: ServiceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    fn validate(&self, params: &BulkInsertParams) -> CustomerResult<()> {
        if params.content_type != CUSTOMER_CONTENT_TYPE {
            return Err(CustomerError::InvalidRequest(format!(
                "Unsupported import content type: {}",
                params.content_type
            )));
        }
        if params.field_names.iter().all(|name| name.trim().is_empty()) {
            return Err(CustomerError::InvalidRequest(
                "Import has no columns".to_string(),
            ));
        }
        if params.field_values.len() > self.max_rows {
            return Err(CustomerError::InvalidRequest(format!(
                "You can only import max {} rows at a time",
                self.max_rows
            )));
        }
        Ok(())
    }

    /// Build the customer attributes for one row.
    fn row_fields(
        field_names: &[String],
        basic_fields: &HashSet<&str>,
        row: &[String],
    ) -> CustomerResult<CustomerFields> {
        if row.len() != field_names.len() {
            return Err(CustomerError::InvalidRequest(format!(
                "Expected {} values, got {}",
                field_names.len(),
                row.len()
            )));
        }

        let mut doc = Map::new();
        let mut custom = CustomFieldData::new();

        for (name, cell) in field_names.iter().zip(row) {
            let name = name.trim();
            let cell = cell.trim();
            if name.is_empty() || cell.is_empty() {
                continue;
            }

            if basic_fields.contains(name) {
                let value = if BOOLEAN_FIELDS.contains(&name) {
                    Value::Bool(parse_flag(name, cell)?)
                } else {
                    Value::String(cell.to_string())
                };
                doc.insert(name.to_string(), value);
            } else {
                custom.insert(name.to_string(), Value::String(cell.to_string()));
            }
        }

        let mut fields: CustomerFields = serde_json::from_value(Value::Object(doc))?;
        if !custom.is_empty() {
            fields.custom_field_data = Some(custom);
        }
        Ok(fields)
    }
}

fn parse_flag(field: &str, cell: &str) -> CustomerResult<bool> {
    match cell.to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(CustomerError::InvalidField {
            field: field.to_string(),
            reason: format!("expected yes/no, got {}", cell),
        }),
    }
}

#[async_trait]
impl ImportService for ImportServiceImpl {
    async fn bulk_insert(&self, params: BulkInsertParams) -> CustomerResult<BulkInsertReport> {
        self.validate(&params)?;

        let basic_fields: HashSet<&str> = params.basic_fields.iter().map(String::as_str).collect();
        let mut report = BulkInsertReport {
            content_type: params.content_type.clone(),
            ..Default::default()
        };

        for (index, row) in params.field_values.iter().enumerate() {
            let created = match Self::row_fields(&params.field_names, &basic_fields, row) {
                Ok(fields) => self.customers.create_customer(fields, params.user.as_ref()).await,
                Err(err) => Err(err),
            };

            match created {
                Ok(customer) => report.inserted_ids.push(customer.id),
                Err(err) => {
                    warn!(row = index, error = %err, "Import row failed");
                    report.errors.push(ImportRowError {
                        row: index,
                        message: err.to_string(),
                    });
                }
            }
        }

        self.metrics
            .track_import(report.inserted_ids.len(), report.errors.len());
        info!(
            inserted = report.inserted_ids.len(),
            failed = report.errors.len(),
            "Bulk import finished"
        );
        Ok(report)
    }
}
