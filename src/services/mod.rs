//! Application service layer.
//!
//! Services contain the customer business logic and orchestrate calls to
//! the injected repositories and collaborator services.

mod customer_service;
mod field_service;
mod import_service;

pub use customer_service::{
    CustomerService, CustomerServiceImpl, LinkedStores, VisitorContact,
};
pub use field_service::{FieldDefinition, FieldService, FieldType, SchemaFieldService};
pub use import_service::{
    BulkInsertParams, BulkInsertReport, ImportRowError, ImportService, ImportServiceImpl,
    CUSTOMER_BASIC_FIELDS, CUSTOMER_CONTENT_TYPE,
};
