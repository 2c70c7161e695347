//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::{Message, User};

use forestcore::{Moderator, RecordStore, RegistrationFlow};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub admin_id: i64,
    pub store: Arc<dyn RecordStore>,
    pub flow: Arc<RegistrationFlow>,
    pub moderator: Arc<Moderator>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(admin_id: i64, store: Arc<dyn RecordStore>, flow: Arc<RegistrationFlow>, moderator: Arc<Moderator>) -> Self {
        Self {
            admin_id,
            store,
            flow,
            moderator,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_id
    }
}

/// Telegram user id of the sender as the record store keys it
pub fn user_id(user: &User) -> Option<i64> {
    i64::try_from(user.id.0).ok()
}

/// Sender of a message, if Telegram attached one
pub fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().and_then(user_id)
}
