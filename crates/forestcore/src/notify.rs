//! Outbound notification port used by moderation

use async_trait::async_trait;

use crate::core::error::AppResult;

/// Delivers a plain-text message to a user's private chat.
///
/// The Telegram bot implements this over `sendMessage`; tests record calls.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: i64, text: &str) -> AppResult<()>;
}
