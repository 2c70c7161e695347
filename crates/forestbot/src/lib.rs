//! forestbot - Telegram front end of the Green Forest verification bot
//!
//! Turns Telegram updates into calls on `forestcore` and renders the results.

pub mod cli;
pub mod telegram;
