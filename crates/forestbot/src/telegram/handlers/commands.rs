//! Command handlers: /start, /help, /status, /register, /users and the admin search prompt
//!
//! Every handler takes the target chat and the sender id, so message and
//! callback routes share them.

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use forestcore::{RegistrationStep, StartOutcome};

use super::types::HandlerDeps;
use crate::telegram::{keyboards, texts};

/// Greeting with the persistent reply keyboard
pub async fn handle_start(bot: &Bot, chat_id: ChatId, user_id: i64, deps: &HandlerDeps) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::GREETING)
        .reply_markup(keyboards::main_menu(deps.is_admin(user_id)))
        .await?;
    Ok(())
}

/// Help text with the inline quick actions
pub async fn handle_help(bot: &Bot, chat_id: ChatId, user_id: i64, deps: &HandlerDeps) -> ResponseResult<()> {
    let is_admin = deps.is_admin(user_id);
    bot.send_message(chat_id, texts::help_text(is_admin))
        .reply_markup(keyboards::quick_actions(is_admin))
        .await?;
    Ok(())
}

pub async fn handle_status(bot: &Bot, chat_id: ChatId, user_id: i64, deps: &HandlerDeps) -> ResponseResult<()> {
    let text = match deps.store.get(user_id).await {
        Ok(record) => texts::status_card(&record),
        Err(e) if e.is_not_found() => texts::NOT_REGISTERED.to_string(),
        Err(e) => {
            log::error!("❌ Status lookup failed for user {}: {}", user_id, e);
            texts::STORE_UNAVAILABLE.to_string()
        }
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Opens a registration session, or shows the status of an existing application
pub async fn handle_register(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    username: Option<&str>,
    deps: &HandlerDeps,
) -> ResponseResult<()> {
    match deps.flow.start(user_id, username).await {
        Ok(StartOutcome::Started) => {
            bot.send_message(chat_id, texts::registration_started(false))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(StartOutcome::Restarted) => {
            bot.send_message(chat_id, texts::registration_started(true))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(StartOutcome::Submitting) => {
            bot.send_message(chat_id, texts::step_prompt(RegistrationStep::Complete))
                .await?;
        }
        Ok(StartOutcome::AlreadyRegistered(record)) => {
            bot.send_message(chat_id, texts::already_registered(&record)).await?;
        }
        Err(e) => {
            log::error!("❌ Registration start failed for user {}: {}", user_id, e);
            bot.send_message(chat_id, texts::STORE_UNAVAILABLE).await?;
        }
    }
    Ok(())
}

/// Admin: numbered list of every record
pub async fn handle_users(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps) -> ResponseResult<()> {
    let records = match deps.store.list_all().await {
        Ok(records) => records,
        Err(e) => {
            log::error!("❌ Listing users failed: {}", e);
            bot.send_message(chat_id, texts::USERS_FAILED).await?;
            return Ok(());
        }
    };

    if records.is_empty() {
        bot.send_message(chat_id, texts::USERS_EMPTY).await?;
        return Ok(());
    }

    send_chunks(bot, chat_id, texts::user_list_chunks(&records)).await;
    Ok(())
}

/// Sends each chunk in order. A refused chunk is logged and the rest still go out.
pub(super) async fn send_chunks(bot: &Bot, chat_id: ChatId, chunks: Vec<String>) {
    let total = chunks.len();
    for (i, chunk) in chunks.into_iter().enumerate() {
        if let Err(e) = bot.send_message(chat_id, chunk).await {
            log::error!("❌ Failed to send part {}/{} to chat {}: {}", i + 1, total, chat_id, e);
        }
    }
}

/// Admin: explains what the directory search looks at
pub async fn handle_search_prompt(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::SEARCH_PROMPT).await?;
    Ok(())
}
