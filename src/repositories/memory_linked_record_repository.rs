use crate::error::CustomerResult;
use crate::models::{LinkedRecord, LinkedRecordKind};
use crate::repositories::traits::LinkedRecordRepository;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Collaborator store kept in process memory.
///
/// One instance stands in for one collaborator module (activity logs,
/// conversations, engage messages or internal notes).
pub struct InMemoryLinkedRecordRepository {
    kind: LinkedRecordKind,
    records: RwLock<Vec<LinkedRecord>>,
}

impl InMemoryLinkedRecordRepository {
    pub fn new(kind: LinkedRecordKind) -> Self {
        Self {
            kind,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Store a record, assigning an ID when empty.
    pub async fn insert(&self, mut record: LinkedRecord) -> LinkedRecord {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        record.kind = self.kind;
        self.records.write().await.push(record.clone());
        record
    }

    /// Records currently referencing `customer_id`.
    pub async fn for_customer(&self, customer_id: &str) -> Vec<LinkedRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LinkedRecordRepository for InMemoryLinkedRecordRepository {
    fn kind(&self) -> LinkedRecordKind {
        self.kind
    }

    async fn remove_customer_records(&self, customer_id: &str) -> CustomerResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.customer_id != customer_id);

        tracing::debug!(
            kind = %self.kind,
            customer_id = %customer_id,
            removed = before - records.len(),
            "Removed customer records"
        );
        Ok(())
    }

    async fn change_customer(
        &self,
        new_customer_id: &str,
        old_customer_ids: &[String],
    ) -> CustomerResult<()> {
        let mut records = self.records.write().await;
        let mut moved = 0usize;
        for record in records
            .iter_mut()
            .filter(|r| old_customer_ids.contains(&r.customer_id))
        {
            record.customer_id = new_customer_id.to_string();
            moved += 1;
        }

        tracing::debug!(
            kind = %self.kind,
            new_customer_id = %new_customer_id,
            moved,
            "Repointed customer records"
        );
        Ok(())
    }
}
