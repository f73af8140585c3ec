//! customer-import - dry run of a customer bulk import.
//!
//! Reads an import file and replays it against in-memory stores, printing
//! which rows would be created and which would fail (duplicates, bad values).
//!
//! The file is JSON with `fieldNames` and `fieldValues`, plus optional
//! `basicFields`, `user`, `fields` (custom field definitions) and `existing`
//! (customers assumed to already exist, so duplicates against them surface).

use anyhow::{bail, Context, Result};
use customer_core::models::LinkedRecordKind;
use customer_core::repositories::{
    InMemoryCompanyRepository, InMemoryCustomerRepository, InMemoryLinkedRecordRepository,
};
use customer_core::services::{FieldDefinition, SchemaFieldService};
use customer_core::{
    BulkInsertParams, Config, CustomerFields, CustomerService, CustomerServiceImpl, ImportService,
    ImportServiceImpl, LinkedStores, ServiceMetrics,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportFile {
    #[serde(flatten)]
    params: BulkInsertParams,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
    #[serde(default)]
    existing: Vec<CustomerFields>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr, the report to stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: customer-import <import.json>");
    };

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let file: ImportFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let metrics = ServiceMetrics::new();
    let linked = LinkedStores::new(
        Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::ActivityLog)),
        Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::Conversation)),
        Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::EngageMessage)),
        Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::InternalNote)),
    );
    let customers = Arc::new(
        CustomerServiceImpl::new(
            Arc::new(InMemoryCustomerRepository::new()),
            Arc::new(InMemoryCompanyRepository::new()),
            Arc::new(SchemaFieldService::new(file.fields)),
            linked,
        )
        .with_page_size(config.page_size)
        .with_metrics(metrics.clone()),
    );

    for fields in file.existing {
        if let Err(e) = customers.create_customer(fields, None).await {
            error!("Failed to seed existing customer: {}", e);
            return Err(e.into());
        }
    }
    info!("Seeded existing customers");

    let importer = ImportServiceImpl::new(customers, config.import_max_rows)
        .with_metrics(metrics.clone());
    let report = importer.bulk_insert(file.params).await?;

    let output = serde_json::json!({
        "report": report,
        "metrics": metrics.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
