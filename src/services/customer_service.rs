//! Customer service layer.
//!
//! Business logic for customers: duplicate detection, create/update,
//! messenger state, company links, removal cascades and merging.
//!
//! Every multi-step operation here is a plain sequence of awaited calls with
//! no transaction around it. A failure part way through a removal cascade
//! or a merge leaves the steps already taken in place and returns the error
//! unchanged; callers decide whether to retry.

use crate::domain::{CustomerId, EmailAddress, Exclusion, PhoneNumber};
use crate::error::{CustomerError, CustomerResult};
use crate::models::{
    unique, ActingUser, CompanyInput, Customer, CustomerFields, CustomerUpdate, Location,
    VisitorContactInfo,
};
use crate::observability::{ServiceMetrics, Timer};
use crate::repositories::{
    CompanyRepository, CustomerQuery, CustomerRepository, IdentityMatch, LinkedRecordRepository,
};
use crate::services::field_service::FieldService;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_PAGE_SIZE: usize = 20;

/// Contact details a messenger visitor can leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitorContact {
    Email(String),
    Phone(String),
}

/// The four collaborator stores whose records reference customers.
#[derive(Clone)]
pub struct LinkedStores {
    pub activity_logs: Arc<dyn LinkedRecordRepository>,
    pub conversations: Arc<dyn LinkedRecordRepository>,
    pub engage_messages: Arc<dyn LinkedRecordRepository>,
    pub internal_notes: Arc<dyn LinkedRecordRepository>,
}

impl LinkedStores {
    pub fn new(
        activity_logs: Arc<dyn LinkedRecordRepository>,
        conversations: Arc<dyn LinkedRecordRepository>,
        engage_messages: Arc<dyn LinkedRecordRepository>,
        internal_notes: Arc<dyn LinkedRecordRepository>,
    ) -> Self {
        Self {
            activity_logs,
            conversations,
            engage_messages,
            internal_notes,
        }
    }

    /// Stores in the order cascades visit them.
    pub fn in_cascade_order(&self) -> [&Arc<dyn LinkedRecordRepository>; 4] {
        [
            &self.activity_logs,
            &self.conversations,
            &self.engage_messages,
            &self.internal_notes,
        ]
    }
}

/// Customer service trait for business operations.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Fail with `DuplicateField` if any identity value in `fields` is held
    /// by a non-excluded customer.
    ///
    /// Checks run twitter, facebook, email, phone and stop at the first hit.
    async fn check_duplication(
        &self,
        fields: &CustomerFields,
        exclusion: Exclusion,
    ) -> CustomerResult<()>;

    /// Create a customer; the acting user becomes owner when none is given.
    async fn create_customer(
        &self,
        fields: CustomerFields,
        user: Option<&ActingUser>,
    ) -> CustomerResult<Customer>;

    /// Apply a partial update and return the stored result.
    async fn update_customer(&self, id: &str, fields: CustomerFields) -> CustomerResult<Customer>;

    async fn get_customer(&self, id: &str) -> CustomerResult<Customer>;

    /// List customers oldest first; `limit` falls back to the configured page size.
    async fn list_customers(
        &self,
        limit: Option<usize>,
        offset: usize,
    ) -> CustomerResult<Vec<Customer>>;

    async fn mark_active(&self, id: &str) -> CustomerResult<Customer>;

    /// Mark the customer inactive in the messenger and stamp last-seen.
    async fn mark_inactive(&self, id: &str) -> CustomerResult<Customer>;

    /// Create a company and link it to the customer.
    async fn add_company(&self, id: &str, company: CompanyInput) -> CustomerResult<Customer>;

    /// Replace the customer's company ids exactly as given.
    async fn update_companies(
        &self,
        id: &str,
        company_ids: Vec<String>,
    ) -> CustomerResult<Customer>;

    async fn update_location(&self, id: &str, location: Location) -> CustomerResult<Customer>;

    async fn save_visitor_contact_info(
        &self,
        id: &str,
        contact: VisitorContact,
    ) -> CustomerResult<Customer>;

    /// Record the start of a messenger session.
    async fn update_session(&self, id: &str) -> CustomerResult<Customer>;

    async fn add_url_visit(&self, id: &str, url: &str) -> CustomerResult<Customer>;

    /// Remove a customer after clearing every collaborator's records for it.
    async fn remove_customer(&self, id: &str) -> CustomerResult<()>;

    /// Fold `customer_ids` into one newly created customer built from `fields`.
    async fn merge_customers(
        &self,
        customer_ids: &[String],
        fields: CustomerFields,
    ) -> CustomerResult<Customer>;
}

/// Default implementation of CustomerService.
pub struct CustomerServiceImpl {
    customers: Arc<dyn CustomerRepository>,
    companies: Arc<dyn CompanyRepository>,
    fields: Arc<dyn FieldService>,
    linked: LinkedStores,
    metrics: ServiceMetrics,
    page_size: usize,
}

impl CustomerServiceImpl {
    /// Create a new customer service.
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        companies: Arc<dyn CompanyRepository>,
        fields: Arc<dyn FieldService>,
        linked: LinkedStores,
    ) -> Self {
        Self {
            customers,
            companies,
            fields,
            linked,
            metrics: ServiceMetrics::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: ServiceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    /// Apply `update` then re-read the record.
    async fn update_and_fetch(&self, id: &str, update: CustomerUpdate) -> CustomerResult<Customer> {
        let id = CustomerId::new(id)?;
        self.customers.update(id.as_str(), &update).await?;
        self.customers.get(id.as_str()).await
    }
}

#[async_trait]
impl CustomerService for CustomerServiceImpl {
    async fn check_duplication(
        &self,
        fields: &CustomerFields,
        exclusion: Exclusion,
    ) -> CustomerResult<()> {
        for identity in IdentityMatch::of_fields(fields) {
            let field = identity.field();
            let query = CustomerQuery::new(identity, exclusion.clone());

            if self.customers.count(&query).await? > 0 {
                warn!(field = %field, "Duplicate customer identity");
                self.metrics.track_duplicate(field);
                return Err(CustomerError::DuplicateField(field));
            }
        }

        debug!("Duplication check passed");
        Ok(())
    }

    async fn create_customer(
        &self,
        mut fields: CustomerFields,
        user: Option<&ActingUser>,
    ) -> CustomerResult<Customer> {
        self.check_duplication(&fields, Exclusion::None).await?;

        let custom_field_data = self
            .fields
            .clean_multi(fields.custom_field_data.take())
            .await?;

        let now = Utc::now();
        let mut customer = Customer {
            created_at: now,
            modified_at: now,
            ..Default::default()
        };
        fields.apply_to(&mut customer);
        customer.custom_field_data = custom_field_data;

        if customer.owner_id.is_none() {
            customer.owner_id = user.map(|u| u.id.clone());
        }

        let created = self.customers.insert(&customer).await?;
        self.metrics.track_created();

        info!(
            customer_id = %created.id,
            name = %created.display_name(),
            "Customer created"
        );
        Ok(created)
    }

    async fn update_customer(&self, id: &str, mut fields: CustomerFields) -> CustomerResult<Customer> {
        let id = CustomerId::new(id)?;

        self.check_duplication(&fields, Exclusion::One(id.to_string()))
            .await?;

        if let Some(data) = fields.custom_field_data.take() {
            fields.custom_field_data = Some(self.fields.clean_multi(Some(data)).await?);
        }

        let update = CustomerUpdate::Fields {
            fields,
            modified_at: Utc::now(),
        };
        self.customers.update(id.as_str(), &update).await?;
        self.metrics.track_updated();

        info!(customer_id = %id, "Customer updated");
        self.customers.get(id.as_str()).await
    }

    async fn get_customer(&self, id: &str) -> CustomerResult<Customer> {
        let id = CustomerId::new(id)?;
        self.customers.get(id.as_str()).await
    }

    async fn list_customers(
        &self,
        limit: Option<usize>,
        offset: usize,
    ) -> CustomerResult<Vec<Customer>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.page_size);
        self.customers.list(limit, offset).await
    }

    async fn mark_active(&self, id: &str) -> CustomerResult<Customer> {
        self.update_and_fetch(
            id,
            CustomerUpdate::MessengerActivity {
                is_active: true,
                last_seen_at: None,
            },
        )
        .await
    }

    async fn mark_inactive(&self, id: &str) -> CustomerResult<Customer> {
        self.update_and_fetch(
            id,
            CustomerUpdate::MessengerActivity {
                is_active: false,
                last_seen_at: Some(Utc::now()),
            },
        )
        .await
    }

    async fn add_company(&self, id: &str, company: CompanyInput) -> CustomerResult<Customer> {
        let id = CustomerId::new(id)?;

        let company = self.companies.create_company(&company).await?;
        info!(customer_id = %id, company_id = %company.id, "Linking new company");

        self.update_and_fetch(id.as_str(), CustomerUpdate::AddCompany(company.id))
            .await
    }

    async fn update_companies(
        &self,
        id: &str,
        company_ids: Vec<String>,
    ) -> CustomerResult<Customer> {
        self.update_and_fetch(id, CustomerUpdate::SetCompanies(company_ids))
            .await
    }

    async fn update_location(&self, id: &str, location: Location) -> CustomerResult<Customer> {
        self.update_and_fetch(id, CustomerUpdate::Location(location))
            .await
    }

    async fn save_visitor_contact_info(
        &self,
        id: &str,
        contact: VisitorContact,
    ) -> CustomerResult<Customer> {
        let info = match contact {
            VisitorContact::Email(email) => VisitorContactInfo {
                email: Some(EmailAddress::new(email)?.into_inner()),
                phone: None,
            },
            VisitorContact::Phone(phone) => VisitorContactInfo {
                email: None,
                phone: Some(PhoneNumber::new(phone)?.into_inner()),
            },
        };

        self.update_and_fetch(id, CustomerUpdate::VisitorContactInfo(info))
            .await
    }

    async fn update_session(&self, id: &str) -> CustomerResult<Customer> {
        self.update_and_fetch(id, CustomerUpdate::Session { seen_at: Utc::now() })
            .await
    }

    async fn add_url_visit(&self, id: &str, url: &str) -> CustomerResult<Customer> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CustomerError::InvalidRequest(
                "Visited url cannot be empty".to_string(),
            ));
        }
        self.update_and_fetch(id, CustomerUpdate::UrlVisit(url.to_string()))
            .await
    }

    async fn remove_customer(&self, id: &str) -> CustomerResult<()> {
        let id = CustomerId::new(id)?;

        for store in self.linked.in_cascade_order() {
            if let Err(err) = store.remove_customer_records(id.as_str()).await {
                warn!(
                    customer_id = %id,
                    kind = %store.kind(),
                    error = %err,
                    "Cascade failed, customer kept"
                );
                return Err(err);
            }
        }

        self.customers.delete(id.as_str()).await?;
        self.metrics.track_removed();

        info!(customer_id = %id, "Customer removed");
        Ok(())
    }

    async fn merge_customers(
        &self,
        customer_ids: &[String],
        mut fields: CustomerFields,
    ) -> CustomerResult<Customer> {
        let timer = Timer::new("merge_customers");
        let ids: Vec<String> = CustomerId::parse_all(customer_ids)?
            .into_iter()
            .map(CustomerId::into_inner)
            .collect();

        if let Err(err) = self
            .check_duplication(&fields, Exclusion::Many(ids.clone()))
            .await
        {
            timer.finish_with_status(false);
            return Err(err);
        }

        let mut tag_ids = Vec::new();
        let mut company_ids = Vec::new();
        let mut emails: Vec<String> = fields.primary_email.iter().cloned().collect();
        let mut phones: Vec<String> = fields.primary_phone.iter().cloned().collect();

        for id in &ids {
            let Some(source) = self.customers.find(id).await? else {
                debug!(customer_id = %id, "Merge source not found, skipping");
                continue;
            };

            // Last processed source decides the integration
            fields.integration_id = source.integration_id;

            tag_ids.extend(source.tag_ids);
            company_ids.extend(source.company_ids);
            emails.extend(source.emails);
            phones.extend(source.phones);

            self.customers.delete(id).await?;
            debug!(customer_id = %id, "Merge source folded and deleted");
        }

        fields.tag_ids = Some(unique(tag_ids));
        fields.company_ids = Some(unique(company_ids));
        fields.emails = Some(unique(emails));
        fields.phones = Some(unique(phones));

        let survivor = self.create_customer(fields, None).await?;

        for store in self.linked.in_cascade_order() {
            store.change_customer(&survivor.id, &ids).await?;
        }

        self.metrics.track_merged(ids.len());
        timer.finish_with_status(true);

        info!(
            customer_id = %survivor.id,
            merged = ids.len(),
            "Customers merged"
        );
        Ok(survivor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkedRecordKind;
    use crate::repositories::{
        InMemoryCompanyRepository, InMemoryCustomerRepository, InMemoryLinkedRecordRepository,
    };
    use crate::services::field_service::SchemaFieldService;

    fn service() -> CustomerServiceImpl {
        let linked = LinkedStores::new(
            Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::ActivityLog)),
            Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::Conversation)),
            Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::EngageMessage)),
            Arc::new(InMemoryLinkedRecordRepository::new(LinkedRecordKind::InternalNote)),
        );
        CustomerServiceImpl::new(
            Arc::new(InMemoryCustomerRepository::new()),
            Arc::new(InMemoryCompanyRepository::new()),
            Arc::new(SchemaFieldService::default()),
            linked,
        )
    }

    #[test]
    fn test_cascade_order() {
        let service = service();
        let kinds: Vec<_> = service
            .linked
            .in_cascade_order()
            .iter()
            .map(|store| store.kind())
            .collect();
        assert_eq!(kinds, LinkedRecordKind::ALL);
    }

    #[tokio::test]
    async fn test_blank_ids_are_rejected() {
        let service = service();
        assert!(matches!(
            service.get_customer("  ").await,
            Err(CustomerError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.merge_customers(&[], CustomerFields::default()).await,
            Err(CustomerError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_page_size_fallback() {
        let service = service().with_page_size(2);
        for i in 0..3 {
            let fields = CustomerFields {
                primary_email: Some(format!("user{i}@example.com")),
                ..Default::default()
            };
            service.create_customer(fields, None).await.unwrap();
        }

        assert_eq!(service.list_customers(None, 0).await.unwrap().len(), 2);
        assert_eq!(service.list_customers(Some(10), 0).await.unwrap().len(), 3);
        assert_eq!(service.metrics().snapshot().created, 3);
    }

    #[tokio::test]
    async fn test_visitor_contact_info_is_validated() {
        let service = service();
        let customer = service
            .create_customer(CustomerFields::default(), None)
            .await
            .unwrap();

        let result = service
            .save_visitor_contact_info(&customer.id, VisitorContact::Email("not-an-email".into()))
            .await;
        assert!(matches!(result, Err(CustomerError::InvalidRequest(_))));

        let updated = service
            .save_visitor_contact_info(&customer.id, VisitorContact::Phone(" 555-0199 ".into()))
            .await
            .unwrap();
        assert_eq!(
            updated.visitor_contact_info.and_then(|i| i.phone).as_deref(),
            Some("555-0199")
        );
    }
}
