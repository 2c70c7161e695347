//! Domain types shared by the store, the registration flow and the bot

pub mod session;
pub mod user;

pub use session::{RegistrationSession, RegistrationStep};
pub use user::{UserRecord, UserRole, UserStatus, TIMESTAMP_FORMAT};
