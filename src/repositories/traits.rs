use crate::domain::{Exclusion, IdentityField};
use crate::error::{CustomerError, CustomerResult};
use crate::models::*;
use async_trait::async_trait;

/// One identity value to look for among stored customers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityMatch {
    TwitterId(String),
    FacebookId(String),
    /// Matches a primary email or any secondary email
    Email(String),
    /// Matches a primary phone or any secondary phone
    Phone(String),
}

impl IdentityMatch {
    pub fn field(&self) -> IdentityField {
        match self {
            IdentityMatch::TwitterId(_) => IdentityField::Twitter,
            IdentityMatch::FacebookId(_) => IdentityField::Facebook,
            IdentityMatch::Email(_) => IdentityField::Email,
            IdentityMatch::Phone(_) => IdentityField::Phone,
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            IdentityMatch::TwitterId(id) => customer.twitter_id() == Some(id.as_str()),
            IdentityMatch::FacebookId(id) => customer.facebook_id() == Some(id.as_str()),
            IdentityMatch::Email(email) => customer.holds_email(email),
            IdentityMatch::Phone(phone) => customer.holds_phone(phone),
        }
    }

    /// Identity values supplied in `fields`, in checking order.
    pub fn of_fields(fields: &CustomerFields) -> Vec<IdentityMatch> {
        Self::collect(
            fields.twitter_id(),
            fields.facebook_id(),
            fields.primary_email.as_deref(),
            fields.primary_phone.as_deref(),
        )
    }

    /// Identity values held by a stored customer, in checking order.
    pub fn of_customer(customer: &Customer) -> Vec<IdentityMatch> {
        Self::collect(
            customer.twitter_id(),
            customer.facebook_id(),
            customer.primary_email.as_deref(),
            customer.primary_phone.as_deref(),
        )
    }

    fn collect(
        twitter: Option<&str>,
        facebook: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Vec<IdentityMatch> {
        let present = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(String::from);

        [
            present(twitter).map(IdentityMatch::TwitterId),
            present(facebook).map(IdentityMatch::FacebookId),
            present(email).map(IdentityMatch::Email),
            present(phone).map(IdentityMatch::Phone),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Selects customers holding an identity value, minus excluded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerQuery {
    pub identity: IdentityMatch,
    pub exclusion: Exclusion,
}

impl CustomerQuery {
    pub fn new(identity: IdentityMatch, exclusion: Exclusion) -> Self {
        Self {
            identity,
            exclusion,
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        !self.exclusion.excludes(&customer.id) && self.identity.matches(customer)
    }
}

/// Repository for customer records.
///
/// Injected into the customer service so stores can be swapped for test
/// doubles.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Look up a customer, returning `None` when absent.
    async fn find(&self, id: &str) -> CustomerResult<Option<Customer>>;

    /// Retrieve a single customer by ID.
    async fn get(&self, id: &str) -> CustomerResult<Customer> {
        self.find(id)
            .await?
            .ok_or_else(|| CustomerError::NotFound(format!("Customer {} not found", id)))
    }

    /// Retrieve customers ordered by creation time.
    async fn list(&self, limit: usize, offset: usize) -> CustomerResult<Vec<Customer>>;

    /// Count customers selected by `query`.
    async fn count(&self, query: &CustomerQuery) -> CustomerResult<usize>;

    /// Persist a new customer, assigning its ID when empty.
    async fn insert(&self, customer: &Customer) -> CustomerResult<Customer>;

    /// Apply a partial write to an existing customer.
    async fn update(&self, id: &str, update: &CustomerUpdate) -> CustomerResult<()>;

    /// Delete a customer.
    async fn delete(&self, id: &str) -> CustomerResult<()>;
}

/// Company module entry point used when linking customers to new companies.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Create a company and return it with its generated ID.
    async fn create_company(&self, input: &CompanyInput) -> CustomerResult<Company>;
}

/// A collaborator store whose records reference customers.
#[async_trait]
pub trait LinkedRecordRepository: Send + Sync {
    /// Which collaborator this store belongs to.
    fn kind(&self) -> LinkedRecordKind;

    /// Delete every record referencing `customer_id`.
    async fn remove_customer_records(&self, customer_id: &str) -> CustomerResult<()>;

    /// Repoint records referencing any of `old_customer_ids` to `new_customer_id`.
    async fn change_customer(
        &self,
        new_customer_id: &str,
        old_customer_ids: &[String],
    ) -> CustomerResult<()>;
}
