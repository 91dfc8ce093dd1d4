use super::UserStore;
use crate::{models::UserRecord, utils::AppError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Records every insert in memory
#[derive(Default)]
pub struct InMemoryUserStore {
    documents: Mutex<Vec<(String, UserRecord)>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<(String, UserRecord)> {
        self.documents.lock().await.clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, collection: &str, record: &UserRecord) -> Result<String, AppError> {
        let mut documents = self.documents.lock().await;
        documents.push((collection.to_string(), record.clone()));
        Ok(format!("mem-{}", documents.len()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Fails every call the way an unreachable server does
#[derive(Default)]
pub struct UnavailableUserStore {
    attempts: AtomicUsize,
}

impl UnavailableUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn insert_user(&self, _collection: &str, _record: &UserRecord) -> Result<String, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::StoreUnavailable(
            "Server selection timeout: No available servers".to_string(),
        ))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::StoreUnavailable("ping failed".to_string()))
    }
}
