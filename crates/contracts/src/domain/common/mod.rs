//! Common types and traits for all aggregates

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Typed aggregate identifier backed by a UUID.
pub trait AggregateId: Sized {
    fn as_string(&self) -> String;
    fn from_string(s: &str) -> Result<Self, String>;
}

/// Bookkeeping fields every aggregate carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    pub version: i32,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
}

/// Common head of every aggregate: identity, code, human description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            comment: None,
            metadata: EntityMetadata {
                created_at: Some(Utc::now().to_rfc3339()),
                updated_at: None,
                version: 0,
                is_deleted: false,
            },
        }
    }

    /// Bump version and stamp the update time; called before every write.
    pub fn touch(&mut self) {
        self.metadata.updated_at = Some(Utc::now().to_rfc3339());
        self.metadata.version += 1;
    }
}
