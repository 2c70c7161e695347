//! Telegram bot handler tree configuration
//!
//! The handlers are organized in a testable way, allowing integration tests
//! to use the same handler tree as production code.

mod callbacks;
mod commands;
mod messages;
mod moderation;
mod registration;
mod schema;
mod search;
mod types;

pub use callbacks::handle_callback;
pub use messages::handle_message;
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
