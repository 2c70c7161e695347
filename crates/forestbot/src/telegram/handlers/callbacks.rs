//! Inline button presses

use teloxide::prelude::*;

use forestcore::CallbackAction;

use super::commands::{handle_help, handle_register, handle_search_prompt, handle_status, handle_users};
use super::moderation::{handle_card_approve, handle_card_reject, Card};
use super::types::{user_id, HandlerDeps};
use crate::telegram::texts;

/// Acknowledges the press, then runs the action in the chat the button lives in.
pub async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> ResponseResult<()> {
    let Some(user_id) = user_id(&q.from) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let data = q.data.as_deref().unwrap_or_default();

    let action = match CallbackAction::parse(data) {
        Ok(action) => action,
        Err(e) => {
            log::warn!("Malformed callback from user {}: {}", user_id, e);
            bot.answer_callback_query(q.id.clone()).text(e.to_string()).await?;
            return Ok(());
        }
    };

    if action.is_admin_only() && !deps.is_admin(user_id) {
        log::warn!("⛔ User {} pressed admin-only button {:?}", user_id, action);
        bot.answer_callback_query(q.id.clone())
            .text(texts::PERMISSION_DENIED)
            .await?;
        return Ok(());
    }

    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message.as_ref() else {
        log::debug!("Callback {} without a message, nothing to do", data);
        return Ok(());
    };
    let chat_id = message.chat().id;
    log::info!("🎯 Callback {:?} from user {}", action, user_id);

    match action {
        CallbackAction::Register => {
            handle_register(bot, chat_id, user_id, q.from.username.as_deref(), deps).await
        }
        CallbackAction::Status => handle_status(bot, chat_id, user_id, deps).await,
        CallbackAction::Help => handle_help(bot, chat_id, user_id, deps).await,
        CallbackAction::AdminUsers => handle_users(bot, chat_id, deps).await,
        CallbackAction::AdminSearch => handle_search_prompt(bot, chat_id).await,
        CallbackAction::Approve { telegram_id, role } => {
            let card = Card {
                chat_id,
                message_id: message.id(),
            };
            handle_card_approve(bot, card, telegram_id, &role, deps).await
        }
        CallbackAction::Reject { telegram_id } => {
            let card = Card {
                chat_id,
                message_id: message.id(),
            };
            handle_card_reject(bot, card, telegram_id, deps).await
        }
    }
}
