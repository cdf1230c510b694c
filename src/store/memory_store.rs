//! In-memory `DocumentStore` used to drive the synchronizer in tests.

use super::types::{DocumentId, DocumentStore, Result, StoreError};
use crate::upload::PendingFile;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub struct MemoryDocumentStore {
    documents: Mutex<Vec<DocumentId>>,
    failing: AtomicBool,
    gate: Semaphore,
    calls: Mutex<Vec<String>>,
}

impl MemoryDocumentStore {
    pub fn new(documents: &[&str]) -> Self {
        Self::with_permits(documents, 1)
    }

    /// Every request waits until `release` is called.
    pub fn held(documents: &[&str]) -> Self {
        Self::with_permits(documents, 0)
    }

    fn with_permits(documents: &[&str], permits: usize) -> Self {
        Self {
            documents: Mutex::new(documents.iter().map(|d| d.to_string()).collect()),
            failing: AtomicBool::new(false),
            gate: Semaphore::new(permits),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn documents(&self) -> Vec<DocumentId> {
        self.documents.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        let _permit = self.gate.acquire().await.unwrap();
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self) -> Result<Vec<DocumentId>> {
        self.enter("list".to_string()).await?;
        Ok(self.documents())
    }

    async fn upload(&self, files: &[PendingFile]) -> Result<Vec<DocumentId>> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        self.enter(format!("upload {}", names.join(","))).await?;

        let mut documents = self.documents.lock().unwrap();
        for name in names {
            if !documents.iter().any(|d| d == name) {
                documents.push(name.to_string());
            }
        }
        Ok(documents.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.enter(format!("delete {id}")).await?;
        self.documents.lock().unwrap().retain(|d| d != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.enter("delete_all".to_string()).await?;
        self.documents.lock().unwrap().clear();
        Ok(())
    }
}
