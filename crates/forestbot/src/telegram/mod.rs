//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod keyboards;
pub mod notifier;
pub mod texts;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{handle_callback, handle_message, schema, HandlerDeps, HandlerError};
pub use notifier::TelegramNotifier;
