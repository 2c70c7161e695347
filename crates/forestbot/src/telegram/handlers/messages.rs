//! Entry point for private text messages

use teloxide::prelude::*;

use forestcore::{classify, route, Intent, Route};

use super::commands::{handle_help, handle_register, handle_search_prompt, handle_start, handle_status, handle_users};
use super::moderation::{handle_approve_command, handle_reject_command};
use super::registration::handle_registration_answer;
use super::search::handle_search;
use super::types::{sender_id, HandlerDeps};
use crate::telegram::texts;

/// Classifies the text, applies the admin gate and runs the matching handler.
pub async fn handle_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> ResponseResult<()> {
    let (Some(text), Some(user_id)) = (msg.text(), sender_id(msg)) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;
    let username = msg.from.as_ref().and_then(|u| u.username.as_deref());

    let has_session = deps.flow.sessions().contains(user_id);
    match route(classify(text), user_id, deps.admin_id, has_session) {
        Route::Command(intent) => {
            log::info!("🎯 {:?} from user {}", intent, user_id);
            run_command(bot, chat_id, user_id, username, intent, deps).await
        }
        Route::Denied(intent) => {
            log::warn!("⛔ User {} tried admin-only {:?}", user_id, intent);
            bot.send_message(chat_id, texts::PERMISSION_DENIED).await?;
            Ok(())
        }
        Route::RegistrationAnswer(answer) => handle_registration_answer(bot, chat_id, user_id, &answer, deps).await,
        Route::Search(query) => handle_search(bot, chat_id, user_id, &query, deps).await,
        Route::Unknown(name) => {
            log::debug!("Unknown command /{} from user {}", name, user_id);
            bot.send_message(chat_id, texts::UNKNOWN_COMMAND).await?;
            Ok(())
        }
    }
}

async fn run_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    username: Option<&str>,
    intent: Intent,
    deps: &HandlerDeps,
) -> ResponseResult<()> {
    match intent {
        Intent::Start => handle_start(bot, chat_id, user_id, deps).await,
        Intent::Register => handle_register(bot, chat_id, user_id, username, deps).await,
        Intent::Status => handle_status(bot, chat_id, user_id, deps).await,
        Intent::Help => handle_help(bot, chat_id, user_id, deps).await,
        Intent::Users => handle_users(bot, chat_id, deps).await,
        Intent::SearchPrompt => handle_search_prompt(bot, chat_id).await,
        Intent::Approve { args } => handle_approve_command(bot, chat_id, &args, deps).await,
        Intent::Reject { args } => handle_reject_command(bot, chat_id, &args, deps).await,
        // route() never yields these as commands
        Intent::UnknownCommand(_) | Intent::Text(_) => {
            bot.send_message(chat_id, texts::UNKNOWN_COMMAND).await?;
            Ok(())
        }
    }
}
