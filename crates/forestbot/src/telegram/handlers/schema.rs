//! Dispatcher schema

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::callbacks::handle_callback;
use super::messages::handle_message;
use super::types::{sender_id, HandlerDeps, HandlerError};

/// Creates the dispatcher schema for the bot.
///
/// The same handler tree runs in production and in the integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Text messages in private chats; groups and media are ignored
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private() && msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(e) = handle_message(&bot, &msg, &deps).await {
                    log::error!(
                        "❌ Message handler failed for user {}: {}",
                        sender_id(&msg).unwrap_or_default(),
                        e
                    );
                }
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if let Err(e) = handle_callback(&bot, &q, &deps).await {
                log::error!("❌ Callback handler failed for user {}: {}", q.from.id, e);
            }
            Ok(())
        }
    })
}
