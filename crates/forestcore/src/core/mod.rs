//! Configuration, errors and logging

pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_configuration};
