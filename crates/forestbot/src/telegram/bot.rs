//! Bot initialization
//!
//! This module contains:
//! - Command enum shown in the Telegram command menu
//! - Bot instance creation

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use forestcore::AppConfig;

/// Bot commands enum with descriptions
///
/// Parsing of inbound commands goes through `forestcore::classify`; this enum
/// only feeds `setMyCommands`.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "приветствие и главное меню")]
    Start,
    #[command(description = "начать процесс регистрации")]
    Register,
    #[command(description = "проверить статус заявки")]
    Status,
    #[command(description = "справка")]
    Help,
    #[command(description = "список всех пользователей (только для администратора)")]
    Users,
    #[command(description = "одобрить заявку: /approve ID роль (только для администратора)")]
    Approve(String),
    #[command(description = "отклонить заявку: /reject ID причина (только для администратора)")]
    Reject(String),
}

/// Creates a Bot instance with the configured token and request timeout
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to build the HTTP client
pub fn create_bot(config: &AppConfig) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config.request_timeout()).build()?;
    Ok(Bot::with_client(config.telegram_token.expose_secret(), client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
