//! Service wiring and sample data shared by the integration tests.

use crate::mocks::{CallLog, MockCustomerRepository, MockLinkedRecordRepository};
use chrono::{Duration, Utc};
use customer_core::models::{Customer, FacebookData, LinkedRecordKind, TwitterData};
use customer_core::repositories::InMemoryCompanyRepository;
use customer_core::services::SchemaFieldService;
use customer_core::{CustomerServiceImpl, LinkedStores, ServiceMetrics};
use std::sync::Arc;

/// A customer service wired to mocks that all write into one call log.
#[allow(dead_code)]
pub struct Harness {
    pub log: CallLog,
    pub customers: MockCustomerRepository,
    pub companies: Arc<InMemoryCompanyRepository>,
    pub activity_logs: MockLinkedRecordRepository,
    pub conversations: MockLinkedRecordRepository,
    pub engage_messages: MockLinkedRecordRepository,
    pub internal_notes: MockLinkedRecordRepository,
    pub metrics: ServiceMetrics,
    pub service: CustomerServiceImpl,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_fields(SchemaFieldService::default())
    }

    pub fn with_fields(fields: SchemaFieldService) -> Self {
        let log = CallLog::new();
        let customers = MockCustomerRepository::with_log(log.clone());
        let companies = Arc::new(InMemoryCompanyRepository::new());
        let activity_logs = MockLinkedRecordRepository::new(LinkedRecordKind::ActivityLog, log.clone());
        let conversations =
            MockLinkedRecordRepository::new(LinkedRecordKind::Conversation, log.clone());
        let engage_messages =
            MockLinkedRecordRepository::new(LinkedRecordKind::EngageMessage, log.clone());
        let internal_notes =
            MockLinkedRecordRepository::new(LinkedRecordKind::InternalNote, log.clone());
        let metrics = ServiceMetrics::new();

        let service = CustomerServiceImpl::new(
            Arc::new(customers.clone()),
            companies.clone(),
            Arc::new(fields),
            LinkedStores::new(
                Arc::new(activity_logs.clone()),
                Arc::new(conversations.clone()),
                Arc::new(engage_messages.clone()),
                Arc::new(internal_notes.clone()),
            ),
        )
        .with_metrics(metrics.clone());

        Self {
            log,
            customers,
            companies,
            activity_logs,
            conversations,
            engage_messages,
            internal_notes,
            metrics,
            service,
        }
    }

    /// Collaborator mocks in cascade order.
    pub fn linked(&self) -> [&MockLinkedRecordRepository; 4] {
        [
            &self.activity_logs,
            &self.conversations,
            &self.engage_messages,
            &self.internal_notes,
        ]
    }
}

/// A stored customer with only an id and timestamps.
///
/// `age_minutes` back-dates creation so listings have a stable order.
#[allow(dead_code)]
pub fn stored_customer(id: &str, age_minutes: i64) -> Customer {
    let created = Utc::now() - Duration::minutes(age_minutes);
    Customer {
        id: id.to_string(),
        created_at: created,
        modified_at: created,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn customer_with_email(id: &str, email: &str) -> Customer {
    Customer {
        primary_email: Some(email.to_string()),
        ..stored_customer(id, 0)
    }
}

#[allow(dead_code)]
pub fn customer_with_phone(id: &str, phone: &str) -> Customer {
    Customer {
        primary_phone: Some(phone.to_string()),
        ..stored_customer(id, 0)
    }
}

#[allow(dead_code)]
pub fn twitter(id: &str) -> TwitterData {
    TwitterData {
        id: id.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn facebook(id: &str) -> FacebookData {
    FacebookData {
        id: id.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
