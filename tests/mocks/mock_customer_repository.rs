use super::CallLog;
use async_trait::async_trait;
use customer_core::error::{CustomerError, CustomerResult};
use customer_core::models::{Customer, CustomerUpdate};
use customer_core::repositories::{CustomerQuery, CustomerRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock customer repository for testing.
///
/// Stores customers in memory, hands out sequential ids and tracks method
/// calls for verification. Unlike the in-memory repository it does not
/// enforce identity uniqueness, so tests see exactly what the service checks.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockCustomerRepository {
    customers: Arc<Mutex<HashMap<String, Customer>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    next_id: Arc<Mutex<usize>>,
    log: CallLog,
}

#[allow(dead_code)]
impl MockCustomerRepository {
    /// Create a new empty MockCustomerRepository.
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    /// Create a repository that also writes its calls into `log`.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            customers: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(0)),
            log,
        }
    }

    /// Add a customer directly, bypassing the service.
    pub fn add_customer(&self, customer: Customer) {
        let mut customers = self.customers.lock().unwrap();
        customers.insert(customer.id.clone(), customer);
    }

    pub fn add_customers(&self, list: Vec<Customer>) {
        let mut customers = self.customers.lock().unwrap();
        for customer in list {
            customers.insert(customer.id.clone(), customer);
        }
    }

    pub fn stored(&self, id: &str) -> Option<Customer> {
        self.customers.lock().unwrap().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.customers.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.customers.lock().unwrap().len()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        let mut counts = self.call_counts.lock().unwrap();
        counts.clear();
    }

    fn track_call(&self, method: &str, id: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
        self.log.push(format!("customers.{}:{}", method, id));
    }
}

impl Default for MockCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn find(&self, id: &str) -> CustomerResult<Option<Customer>> {
        self.track_call("find", id);

        let customers = self.customers.lock().unwrap();
        Ok(customers.get(id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> CustomerResult<Vec<Customer>> {
        self.track_call("list", "");

        let customers = self.customers.lock().unwrap();
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &CustomerQuery) -> CustomerResult<usize> {
        self.track_call("count", query.identity.field().as_str());

        let customers = self.customers.lock().unwrap();
        Ok(customers.values().filter(|c| query.matches(c)).count())
    }

    async fn insert(&self, customer: &Customer) -> CustomerResult<Customer> {
        let mut stored = customer.clone();
        if stored.id.is_empty() {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            stored.id = format!("cust-{}", *next_id);
        }
        self.track_call("insert", &stored.id);

        let mut customers = self.customers.lock().unwrap();
        if customers.contains_key(&stored.id) {
            return Err(CustomerError::InvalidRequest(format!(
                "Customer with ID {} already exists",
                stored.id
            )));
        }

        customers.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, update: &CustomerUpdate) -> CustomerResult<()> {
        self.track_call("update", id);

        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .get_mut(id)
            .ok_or_else(|| CustomerError::NotFound(format!("Customer {} not found", id)))?;
        update.apply(customer);
        Ok(())
    }

    async fn delete(&self, id: &str) -> CustomerResult<()> {
        self.track_call("delete", id);

        let mut customers = self.customers.lock().unwrap();
        if customers.remove(id).is_none() {
            return Err(CustomerError::NotFound(format!("Customer {} not found", id)));
        }
        Ok(())
    }
}
