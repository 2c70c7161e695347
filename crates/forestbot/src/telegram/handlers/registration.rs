//! Registration answers and the hand-off to the administrator

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use forestcore::{StepOutcome, UserRecord};

use super::types::HandlerDeps;
use crate::telegram::{keyboards, texts};

/// Feeds one free-text answer into the sender's registration session.
pub async fn handle_registration_answer(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    text: &str,
    deps: &HandlerDeps,
) -> ResponseResult<()> {
    match deps.flow.answer(user_id, text).await {
        Ok(StepOutcome::Prompt(step)) => {
            bot.send_message(chat_id, texts::step_prompt(step))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(StepOutcome::Submitted(record)) => {
            bot.send_message(chat_id, texts::registration_summary(&record)).await?;
            send_admin_card(bot, &record, deps).await;
        }
        Ok(StepOutcome::Ignored) | Ok(StepOutcome::NoSession) => {}
        Err(e) => {
            log::error!("❌ Registration commit failed for user {}: {}", user_id, e);
            bot.send_message(chat_id, texts::SAVE_FAILED).await?;
        }
    }
    Ok(())
}

/// Delivery failures are logged, never reported to the applicant.
async fn send_admin_card(bot: &Bot, record: &UserRecord, deps: &HandlerDeps) {
    let sent = bot
        .send_message(ChatId(deps.admin_id), texts::admin_card(record))
        .reply_markup(keyboards::moderation_keyboard(record.telegram_id))
        .await;
    if let Err(e) = sent {
        log::error!(
            "❌ Failed to deliver moderation card for user {} to admin: {}",
            record.telegram_id,
            e
        );
    }
}
