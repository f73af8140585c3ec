//! Records owned by other modules that point at a customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The collaborator modules whose records reference customers.
///
/// Declaration order is the order cascades run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkedRecordKind {
    ActivityLog,
    Conversation,
    EngageMessage,
    InternalNote,
}

impl LinkedRecordKind {
    pub const ALL: [LinkedRecordKind; 4] = [
        LinkedRecordKind::ActivityLog,
        LinkedRecordKind::Conversation,
        LinkedRecordKind::EngageMessage,
        LinkedRecordKind::InternalNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkedRecordKind::ActivityLog => "activity_logs",
            LinkedRecordKind::Conversation => "conversations",
            LinkedRecordKind::EngageMessage => "engage_messages",
            LinkedRecordKind::InternalNote => "internal_notes",
        }
    }
}

impl fmt::Display for LinkedRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record in a collaborator store that references one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedRecord {
    pub id: String,
    pub kind: LinkedRecordKind,
    pub customer_id: String,
    /// Opaque payload owned by the collaborator
    #[serde(default)]
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LinkedRecord {
    pub fn new(kind: LinkedRecordKind, customer_id: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            id: String::new(),
            kind,
            customer_id: customer_id.into(),
            content,
            created_at: Utc::now(),
        }
    }
}
