//! In-memory record store for local development and tests

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::RecordStore;
use crate::core::error::{AppError, AppResult};
use crate::models::{UserRecord, UserRole, UserStatus};

/// `Vec`-backed store with the same contract as the spreadsheet.
///
/// `fail_with` makes every subsequent call fail with a store error, which
/// is how tests simulate an unreachable backend.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<UserRecord>>,
    failure: RwLock<Option<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            failure: RwLock::new(None),
        }
    }

    /// Every call fails with `AppError::Store(message)` until cleared.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the rows, for assertions.
    pub fn snapshot(&self) -> Vec<UserRecord> {
        self.read().clone()
    }

    fn check(&self) -> AppResult<()> {
        match self.failure.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(message) => Err(AppError::Store(message.clone())),
            None => Ok(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<UserRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<UserRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, telegram_id: i64) -> AppResult<UserRecord> {
        self.check()?;
        self.read()
            .iter()
            .find(|record| record.telegram_id == telegram_id)
            .cloned()
            .ok_or(AppError::NotFound(telegram_id))
    }

    async fn append(&self, record: &UserRecord) -> AppResult<()> {
        self.check()?;
        self.write().push(record.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        telegram_id: i64,
        status: UserStatus,
        role: UserRole,
        comment: &str,
    ) -> AppResult<()> {
        self.check()?;
        let mut records = self.write();
        let record = records
            .iter_mut()
            .find(|record| record.telegram_id == telegram_id)
            .ok_or(AppError::NotFound(telegram_id))?;
        record.status = status;
        record.role = role;
        if !comment.is_empty() {
            record.admin_comment = comment.to_string();
        }
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<UserRecord>> {
        self.check()?;
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_get_and_not_found() {
        let store = MemoryRecordStore::with_records(vec![UserRecord::applicant(1, Some("a"))]);
        assert_eq!(store.get(1).await.unwrap().username, "a");
        assert!(store.get(2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_keeps_comment_when_empty() {
        let mut record = UserRecord::applicant(5, None);
        record.admin_comment = "earlier".to_string();
        let store = MemoryRecordStore::with_records(vec![record]);

        store.update_status(5, UserStatus::Approved, UserRole::Ok, "").await.unwrap();
        let updated = store.get(5).await.unwrap();
        assert_eq!(updated.status, UserStatus::Approved);
        assert_eq!(updated.role, UserRole::Ok);
        assert_eq!(updated.admin_comment, "earlier");

        let missing = store.update_status(6, UserStatus::Rejected, UserRole::Guest, "x").await;
        assert!(matches!(missing, Err(AppError::NotFound(6))));
    }

    #[tokio::test]
    async fn test_fail_with_blocks_every_call() {
        let store = MemoryRecordStore::new();
        store.fail_with("backend down");
        assert!(matches!(store.list_all().await, Err(AppError::Store(_))));
        assert!(store.append(&UserRecord::applicant(1, None)).await.is_err());
        assert!(store.is_empty());

        store.clear_failure();
        store.append(&UserRecord::applicant(1, None)).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
