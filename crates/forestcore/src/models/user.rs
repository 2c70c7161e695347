//! Resident record, verification status and community roles

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Text layout of the registration timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Verification status of an application.
///
/// Starts as `Pending` and moves exactly once to `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    /// Reads a status cell; anything unrecognized falls back to `Pending`.
    pub fn from_cell(cell: &str) -> Self {
        UserStatus::from_str(cell.trim()).unwrap_or_else(|_| {
            if !cell.trim().is_empty() {
                log::warn!("Unknown status '{}' in record store, treating as pending", cell);
            }
            UserStatus::Pending
        })
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, UserStatus::Pending)
    }
}

/// Community role. Stored in the sheet under its Russian label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum UserRole {
    #[default]
    Guest,
    Resident,
    Neighbor,
    Ok,
}

impl UserRole {
    /// Label written to the sheet and shown to users
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Guest => "гость",
            UserRole::Resident => "житель",
            UserRole::Neighbor => "сосед",
            UserRole::Ok => "ОК",
        }
    }

    /// Roles an administrator may grant on approval
    pub fn assignable() -> impl Iterator<Item = UserRole> {
        UserRole::iter().filter(|role| *role != UserRole::Guest)
    }

    pub fn is_assignable(self) -> bool {
        self != UserRole::Guest
    }

    /// Reads a role cell; anything unrecognized falls back to `Guest`.
    pub fn from_cell(cell: &str) -> Self {
        cell.parse().unwrap_or_else(|_| {
            if !cell.trim().is_empty() {
                log::warn!("Unknown role '{}' in record store, treating as guest", cell);
            }
            UserRole::Guest
        })
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UserRole {
    type Err = String;

    /// Case-insensitive; accepts the Russian labels and English aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "гость" | "guest" => Ok(UserRole::Guest),
            "житель" | "resident" => Ok(UserRole::Resident),
            "сосед" | "neighbor" | "neighbour" => Ok(UserRole::Neighbor),
            "ок" | "ok" => Ok(UserRole::Ok),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// One row of the record store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram user ID, primary key
    pub telegram_id: i64,
    /// Telegram handle without '@'; informational only
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Set once, when the registration is committed
    pub registered_at: Option<NaiveDateTime>,
    pub status: UserStatus,
    pub role: UserRole,
    /// Rejection reason; empty otherwise
    pub admin_comment: String,
}

impl UserRecord {
    /// Fresh application for a user that just started registering.
    pub fn applicant(telegram_id: i64, username: Option<&str>) -> Self {
        Self {
            telegram_id,
            username: username.unwrap_or_default().to_string(),
            status: UserStatus::Pending,
            role: UserRole::Guest,
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_approved(&self) -> bool {
        self.status == UserStatus::Approved
    }

    /// Registration date in the store's text layout, empty when unknown
    pub fn registered_at_text(&self) -> String {
        self.registered_at
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Lowercased haystack used by directory search: name, handle, phone, email, address.
    pub fn search_haystack(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.first_name, self.last_name, self.username, self.phone, self.email, self.address
        )
        .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(UserStatus::Pending.to_string(), "pending");
        assert_eq!(UserStatus::from_cell("approved"), UserStatus::Approved);
        assert_eq!(UserStatus::from_cell(" rejected "), UserStatus::Rejected);
        assert_eq!(UserStatus::from_cell("banana"), UserStatus::Pending);
        assert_eq!(UserStatus::from_cell(""), UserStatus::Pending);
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("Сосед".parse::<UserRole>(), Ok(UserRole::Neighbor));
        assert_eq!("ок".parse::<UserRole>(), Ok(UserRole::Ok));
        assert_eq!("ОК".parse::<UserRole>(), Ok(UserRole::Ok));
        assert_eq!("resident".parse::<UserRole>(), Ok(UserRole::Resident));
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_assignable_roles_exclude_guest() {
        let roles: Vec<UserRole> = UserRole::assignable().collect();
        assert_eq!(roles, vec![UserRole::Resident, UserRole::Neighbor, UserRole::Ok]);
        assert!(!UserRole::Guest.is_assignable());
    }

    #[test]
    fn test_role_label_round_trips_through_cell() {
        for role in UserRole::iter() {
            assert_eq!(UserRole::from_cell(role.label()), role);
        }
        assert_eq!(UserRole::from_cell("???"), UserRole::Guest);
    }

    #[test]
    fn test_applicant_defaults() {
        let record = UserRecord::applicant(7, Some("ivan"));
        assert_eq!(record.status, UserStatus::Pending);
        assert_eq!(record.role, UserRole::Guest);
        assert_eq!(record.username, "ivan");
        assert!(record.registered_at.is_none());
        assert!(record.admin_comment.is_empty());
    }

    #[test]
    fn test_search_haystack_covers_six_fields() {
        let record = UserRecord {
            telegram_id: 1,
            username: "IvanP".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            phone: "+71234567890".to_string(),
            email: "ivan@mail.com".to_string(),
            address: "GFC P11".to_string(),
            ..UserRecord::default()
        };
        assert_eq!(
            record.search_haystack(),
            "ivan petrov ivanp +71234567890 ivan@mail.com gfc p11"
        );
    }
}
