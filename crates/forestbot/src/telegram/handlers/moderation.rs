//! /approve, /reject and the buttons on moderation cards

use teloxide::prelude::*;
use teloxide::types::MessageId;

use forestcore::dispatch::{parse_approve_args, parse_reject_args};
use forestcore::moderation::BUTTON_REJECT_REASON;
use forestcore::{AppResult, Decision};

use super::types::HandlerDeps;
use crate::telegram::texts;

/// `/approve <id> <role>`
pub async fn handle_approve_command(bot: &Bot, chat_id: ChatId, args: &str, deps: &HandlerDeps) -> ResponseResult<()> {
    let result = match parse_approve_args(args) {
        Ok(parsed) => deps.moderator.approve(parsed.telegram_id, &parsed.role).await,
        Err(e) => Err(e),
    };
    reply_with_decision(bot, chat_id, result).await
}

/// `/reject <id> [reason...]`
pub async fn handle_reject_command(bot: &Bot, chat_id: ChatId, args: &str, deps: &HandlerDeps) -> ResponseResult<()> {
    let result = match parse_reject_args(args) {
        Ok(parsed) => deps.moderator.reject(parsed.telegram_id, &parsed.reason).await,
        Err(e) => Err(e),
    };
    reply_with_decision(bot, chat_id, result).await
}

async fn reply_with_decision(bot: &Bot, chat_id: ChatId, result: AppResult<Decision>) -> ResponseResult<()> {
    let text = match result {
        Ok(decision) => texts::decision_confirmation(&decision),
        Err(e) => {
            log::warn!("Moderation command refused: {}", e);
            texts::moderation_error(&e)
        }
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Moderation card the button was pressed on
pub struct Card {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// `approve_{id}_{role}` button
pub async fn handle_card_approve(bot: &Bot, card: Card, telegram_id: i64, role: &str, deps: &HandlerDeps) -> ResponseResult<()> {
    let result = deps.moderator.approve(telegram_id, role).await;
    settle_card(bot, card, result).await
}

/// `reject_{id}` button
pub async fn handle_card_reject(bot: &Bot, card: Card, telegram_id: i64, deps: &HandlerDeps) -> ResponseResult<()> {
    let result = deps.moderator.reject(telegram_id, BUTTON_REJECT_REASON).await;
    settle_card(bot, card, result).await
}

/// On success the card text is replaced, which also drops its buttons.
/// On failure the card stays and the reason goes out as a new message.
async fn settle_card(bot: &Bot, card: Card, result: AppResult<Decision>) -> ResponseResult<()> {
    match result {
        Ok(decision) => {
            bot.edit_message_text(card.chat_id, card.message_id, texts::card_outcome(&decision))
                .await?;
        }
        Err(e) => {
            log::warn!("Moderation button refused: {}", e);
            bot.send_message(card.chat_id, texts::moderation_error(&e)).await?;
        }
    }
    Ok(())
}
