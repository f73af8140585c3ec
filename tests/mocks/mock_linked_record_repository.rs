use super::CallLog;
use async_trait::async_trait;
use customer_core::error::{CustomerError, CustomerResult};
use customer_core::models::{LinkedRecord, LinkedRecordKind};
use customer_core::repositories::LinkedRecordRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock collaborator store for testing cascades and merges.
///
/// Records every call into a shared [`CallLog`] and can be told to fail a
/// given method to exercise partial-failure paths.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockLinkedRecordRepository {
    kind: LinkedRecordKind,
    records: Arc<Mutex<Vec<LinkedRecord>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<Mutex<Option<String>>>,
    log: CallLog,
}

#[allow(dead_code)]
impl MockLinkedRecordRepository {
    pub fn new(kind: LinkedRecordKind, log: CallLog) -> Self {
        Self {
            kind,
            records: Arc::new(Mutex::new(Vec::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(None)),
            log,
        }
    }

    pub fn add_record(&self, customer_id: &str) -> LinkedRecord {
        let mut record = LinkedRecord::new(self.kind, customer_id, serde_json::json!({}));
        let mut records = self.records.lock().unwrap();
        record.id = format!("{}-{}", self.kind, records.len() + 1);
        records.push(record.clone());
        record
    }

    pub fn records_for(&self, customer_id: &str) -> Vec<LinkedRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// Make `method` ("remove" or "change") fail from now on.
    pub fn fail_on(&self, method: &str) {
        *self.failing.lock().unwrap() = Some(method.to_string());
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str, detail: &str) -> CustomerResult<()> {
        {
            let mut counts = self.call_counts.lock().unwrap();
            *counts.entry(method.to_string()).or_insert(0) += 1;
        }
        self.log.push(format!("{}.{}:{}", self.kind, method, detail));

        if self.failing.lock().unwrap().as_deref() == Some(method) {
            return Err(CustomerError::Collaborator {
                collaborator: self.kind.to_string(),
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LinkedRecordRepository for MockLinkedRecordRepository {
    fn kind(&self) -> LinkedRecordKind {
        self.kind
    }

    async fn remove_customer_records(&self, customer_id: &str) -> CustomerResult<()> {
        self.track_call("remove", customer_id)?;

        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.customer_id != customer_id);
        Ok(())
    }

    async fn change_customer(
        &self,
        new_customer_id: &str,
        old_customer_ids: &[String],
    ) -> CustomerResult<()> {
        self.track_call(
            "change",
            &format!("{}<-{}", new_customer_id, old_customer_ids.join(",")),
        )?;

        let mut records = self.records.lock().unwrap();
        for record in records
            .iter_mut()
            .filter(|r| old_customer_ids.contains(&r.customer_id))
        {
            record.customer_id = new_customer_id.to_string();
        }
        Ok(())
    }
}
