//! forestcore - core library of the Green Forest resident verification bot
//!
//! Everything here is transport-agnostic; the Telegram side lives in the
//! `forestbot` crate.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `models`: resident record, status, role, registration steps
//! - `store`: record store contract, Google Sheets and in-memory backends
//! - `session`: in-memory registration sessions
//! - `registration`: the registration dialogue state machine
//! - `dispatch`: intent classification, routing, callback payloads
//! - `moderation`: approve / reject decisions
//! - `search`: directory search
//! - `notify`: outbound notification port

pub mod core;
pub mod dispatch;
pub mod models;
pub mod moderation;
pub mod notify;
pub mod registration;
pub mod search;
pub mod session;
pub mod store;

// Re-export commonly used types for convenience
pub use crate::core::{AppConfig, AppError, AppResult};
pub use dispatch::{classify, route, CallbackAction, Intent, MenuButton, Route};
pub use models::{RegistrationSession, RegistrationStep, UserRecord, UserRole, UserStatus};
pub use moderation::{Decision, Moderator};
pub use notify::Notifier;
pub use registration::{RegistrationFlow, StartOutcome, StepOutcome};
pub use search::{search_directory, SearchOutcome, MAX_RESULTS};
pub use session::{Begin, SessionStore};
pub use store::{MemoryRecordStore, RecordStore, SheetsStore};
