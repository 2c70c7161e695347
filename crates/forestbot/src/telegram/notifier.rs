//! Telegram delivery of moderation notices

use async_trait::async_trait;
use teloxide::prelude::*;

use forestcore::{AppError, AppResult, Notifier};

/// Sends notices to the applicant's private chat (chat id == user id).
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
