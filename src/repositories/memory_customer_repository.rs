use crate::domain::Exclusion;
use crate::error::{CustomerError, CustomerResult};
use crate::models::{Customer, CustomerUpdate};
use crate::repositories::traits::{CustomerQuery, CustomerRepository, IdentityMatch};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Customer repository kept in process memory.
///
/// Besides serving as a store for tests and dry runs, it enforces identity
/// uniqueness itself while holding the write lock, so two writers that both
/// passed the service-level check cannot both persist the same identity.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }

    /// Fail if any of `identities` is held by a record other than `id`.
    fn ensure_unique(
        customers: &HashMap<String, Customer>,
        identities: Vec<IdentityMatch>,
        id: &str,
    ) -> CustomerResult<()> {
        let exclusion = Exclusion::One(id.to_string());

        for identity in identities {
            let query = CustomerQuery::new(identity, exclusion.clone());
            if customers.values().any(|existing| query.matches(existing)) {
                return Err(CustomerError::DuplicateField(query.identity.field()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find(&self, id: &str) -> CustomerResult<Option<Customer>> {
        Ok(self.customers.read().await.get(id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> CustomerResult<Vec<Customer>> {
        let customers = self.customers.read().await;
        let mut all: Vec<&Customer> = customers.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self, query: &CustomerQuery) -> CustomerResult<usize> {
        let customers = self.customers.read().await;
        Ok(customers.values().filter(|c| query.matches(c)).count())
    }

    async fn insert(&self, customer: &Customer) -> CustomerResult<Customer> {
        let mut customers = self.customers.write().await;

        let mut stored = customer.clone();
        if stored.id.is_empty() {
            stored.id = Uuid::new_v4().to_string();
        } else if customers.contains_key(&stored.id) {
            return Err(CustomerError::Storage(format!(
                "Customer with ID {} already exists",
                stored.id
            )));
        }

        let identities = IdentityMatch::of_customer(&stored);
        Self::ensure_unique(&customers, identities, &stored.id)?;

        customers.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, update: &CustomerUpdate) -> CustomerResult<()> {
        let mut customers = self.customers.write().await;

        let mut updated = customers
            .get(id)
            .cloned()
            .ok_or_else(|| CustomerError::NotFound(format!("Customer {} not found", id)))?;

        // Only identity values supplied by this write are re-checked
        if let CustomerUpdate::Fields { fields, .. } = update {
            Self::ensure_unique(&customers, IdentityMatch::of_fields(fields), id)?;
        }
        update.apply(&mut updated);

        customers.insert(id.to_string(), updated);
        Ok(())
    }

    async fn delete(&self, id: &str) -> CustomerResult<()> {
        let mut customers = self.customers.write().await;
        customers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CustomerError::NotFound(format!("Customer {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentityField;
    use crate::models::CustomerFields;
    use chrono::{Duration, Utc};

    fn customer_with_email(email: &str) -> Customer {
        Customer {
            primary_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let repo = InMemoryCustomerRepository::new();
        let stored = repo.insert(&customer_with_email("a@example.com")).await.unwrap();

        assert!(!stored.id.is_empty());
        assert_eq!(repo.get(&stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_insert_rejects_identity_collision() {
        let repo = InMemoryCustomerRepository::new();
        let mut first = customer_with_email("a@example.com");
        first.phones = vec!["555-0100".to_string()];
        repo.insert(&first).await.unwrap();

        let err = repo
            .insert(&customer_with_email("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateField(IdentityField::Email)));

        let phone_clash = Customer {
            primary_phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        let err = repo.insert(&phone_clash).await.unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateField(IdentityField::Phone)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_allows_own_identity() {
        let repo = InMemoryCustomerRepository::new();
        let stored = repo.insert(&customer_with_email("a@example.com")).await.unwrap();

        let update = CustomerUpdate::Fields {
            fields: CustomerFields {
                primary_email: Some("a@example.com".to_string()),
                position: Some("CEO".to_string()),
                ..Default::default()
            },
            modified_at: Utc::now(),
        };
        repo.update(&stored.id, &update).await.unwrap();

        let reloaded = repo.get(&stored.id).await.unwrap();
        assert_eq!(reloaded.position.as_deref(), Some("CEO"));
    }

    #[tokio::test]
    async fn test_update_checks_only_supplied_identity() {
        let repo = InMemoryCustomerRepository::new();
        let b = repo.insert(&customer_with_email("b@example.com")).await.unwrap();
        let a = repo.insert(&customer_with_email("a@example.com")).await.unwrap();

        // A holds B's primary email as a secondary one
        let fields = |fields: CustomerFields| CustomerUpdate::Fields {
            fields,
            modified_at: Utc::now(),
        };
        repo.update(
            &a.id,
            &fields(CustomerFields {
                emails: Some(vec!["b@example.com".to_string()]),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        repo.update(
            &b.id,
            &fields(CustomerFields {
                position: Some("CEO".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        repo.update(
            &b.id,
            &fields(CustomerFields {
                primary_email: Some("b@example.com".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let err = repo
            .update(
                &b.id,
                &fields(CustomerFields {
                    primary_email: Some("a@example.com".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateField(IdentityField::Email)));
        assert_eq!(
            repo.get(&b.id).await.unwrap().primary_email.as_deref(),
            Some("b@example.com")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_customer() {
        let repo = InMemoryCustomerRepository::new();
        let update = CustomerUpdate::AddCompany("co".to_string());

        assert!(matches!(
            repo.update("missing", &update).await,
            Err(CustomerError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete("missing").await,
            Err(CustomerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_orders_by_creation() {
        let repo = InMemoryCustomerRepository::new();
        let now = Utc::now();
        for (offset, email) in [(2, "c@example.com"), (0, "a@example.com"), (1, "b@example.com")] {
            let mut customer = customer_with_email(email);
            customer.created_at = now + Duration::seconds(offset);
            repo.insert(&customer).await.unwrap();
        }

        let page = repo.list(2, 1).await.unwrap();
        let emails: Vec<_> = page.iter().filter_map(|c| c.primary_email.as_deref()).collect();
        assert_eq!(emails, vec!["b@example.com", "c@example.com"]);
    }
}
