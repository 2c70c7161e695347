//! Record store: the single source of truth for committed resident records
//!
//! The store is an external tabular system (a Google Sheets spreadsheet in
//! production) addressed as a key-value-by-ID table with linear scans. There
//! is no secondary index and no local caching: every call reaches the backing
//! store, so reads always reflect its state at call time.

pub mod auth;
pub mod memory;
pub mod row;
pub mod sheets;

use async_trait::async_trait;

use crate::core::error::AppResult;
use crate::models::{UserRecord, UserRole, UserStatus};

pub use auth::Credentials;
pub use memory::MemoryRecordStore;
pub use sheets::SheetsStore;

/// Directory operations the rest of the system relies on.
///
/// Implementations translate each call into the backing store's row API.
/// Transport failures surface as errors; `get` and `update_status` report an
/// absent identifier as [`AppError::NotFound`](crate::core::error::AppError::NotFound).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Linear scan by identifier.
    async fn get(&self, telegram_id: i64) -> AppResult<UserRecord>;

    /// Adds one row. Does not check for an existing identifier; callers do that first.
    async fn append(&self, record: &UserRecord) -> AppResult<()>;

    /// Rewrites status and role in place, and the comment when it is non-empty.
    /// All other fields are left untouched.
    async fn update_status(&self, telegram_id: i64, status: UserStatus, role: UserRole, comment: &str)
        -> AppResult<()>;

    /// Every record in insertion order, no pagination.
    async fn list_all(&self) -> AppResult<Vec<UserRecord>>;
}
