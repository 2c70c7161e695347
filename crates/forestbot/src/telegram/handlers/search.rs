//! Free text outside a registration session is a directory query

use teloxide::prelude::*;

use forestcore::{search_directory, SearchOutcome};

use super::commands::send_chunks;
use super::types::HandlerDeps;
use crate::telegram::texts;

pub async fn handle_search(bot: &Bot, chat_id: ChatId, user_id: i64, query: &str, deps: &HandlerDeps) -> ResponseResult<()> {
    let text = match search_directory(deps.store.as_ref(), user_id, query).await {
        Ok(SearchOutcome::NotVerified) => texts::SEARCH_NOT_VERIFIED.to_string(),
        Ok(SearchOutcome::EmptyQuery) => texts::SEARCH_EMPTY_QUERY.to_string(),
        Ok(SearchOutcome::NoMatches) => texts::SEARCH_NOTHING_FOUND.to_string(),
        Ok(SearchOutcome::Matches(records)) => {
            send_chunks(bot, chat_id, texts::search_results(query, &records)).await;
            return Ok(());
        }
        Err(e) => {
            log::error!("❌ Search failed for user {}: {}", user_id, e);
            texts::SEARCH_FAILED.to_string()
        }
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}
