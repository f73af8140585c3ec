//! Customer Core - data-access and business-logic layer for CRM customers.
//!
//! Provides creation and update of customers guarded by identity-field
//! deduplication, company linkage, removal cascades into collaborator
//! modules, merging of duplicate records, and bulk import.
//!
//! # Architecture
//!
//! - **domain**: Value objects (ids, emails, phones) and identity vocabulary
//! - **models**: Customer aggregate, partial field sets and targeted updates
//! - **repositories**: Store traits plus in-memory implementations
//! - **services**: Customer, field sanitization and import services
//! - **observability**: Operation counters and timers
//! - **config**: Environment-driven settings
//! - **error**: Error types

pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use domain::{CustomerId, Exclusion, IdentityField};
pub use error::{ConfigError, CustomerError, CustomerResult};
pub use models::{ActingUser, Company, CompanyInput, Customer, CustomerFields, LinkedRecordKind};
pub use observability::ServiceMetrics;
pub use services::{
    BulkInsertParams, BulkInsertReport, CustomerService, CustomerServiceImpl, ImportService,
    ImportServiceImpl, LinkedStores,
};
