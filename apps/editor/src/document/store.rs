//! Persistence port. Documents cross this boundary in their plain nested-record form.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Stored record is not a valid resume: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn load(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError>;
    /// Returns `true` when no record existed for `resume_id` before.
    async fn save(&self, resume_id: Uuid, doc: &ResumeDocument) -> Result<bool, StoreError>;
    async fn delete(&self, resume_id: Uuid) -> Result<(), StoreError>;
}

/// Process-local store. Contents vanish with the process.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<Uuid, Value>>,
}

#[async_trait]
impl ResumeStore for InMemoryStore {
    async fn load(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError> {
        let records = self.records.read().await;
        let record = records
            .get(&resume_id)
            .cloned()
            .ok_or(StoreError::NotFound(resume_id))?;
        Ok(serde_json::from_value(record)?)
    }

    async fn save(&self, resume_id: Uuid, doc: &ResumeDocument) -> Result<bool, StoreError> {
        let record = serde_json::to_value(doc)?;
        Ok(self.records.write().await.insert(resume_id, record).is_none())
    }

    async fn delete(&self, resume_id: Uuid) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .remove(&resume_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(resume_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_returns_same_document() {
        let store = InMemoryStore::default();
        let id = Uuid::new_v4();
        let mut doc = ResumeDocument::seed();
        doc.summary = "Line one\nLine two".to_string();

        assert!(store.save(id, &doc).await.unwrap());
        assert_eq!(store.load(id).await.unwrap(), doc);
        assert!(!store.save(id, &doc).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_record_once() {
        let store = InMemoryStore::default();
        let id = Uuid::new_v4();
        store.save(id, &ResumeDocument::seed()).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(matches!(store.load(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_resume_is_not_found() {
        let store = InMemoryStore::default();
        let err = store.load(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
