//! Classification of inbound text and callbacks into intents, and routing
//!
//! Inbound text is classified in a fixed order, first match wins:
//! 1. slash commands (`/start`, `/register`, ... with an optional `@botname`)
//! 2. menu button labels, looked up in [`MenuButton`]
//! 3. anything else is free text
//!
//! [`route`] then applies the admin gate and decides whether free text is a
//! registration answer or a directory search query.

use strum::{EnumIter, IntoEnumIterator};

use crate::core::error::{AppError, AppResult};

/// What the sender asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Register,
    Status,
    Help,
    Users,
    SearchPrompt,
    /// `/approve`; `args` is everything after the command
    Approve { args: String },
    /// `/reject`; `args` is everything after the command
    Reject { args: String },
    /// Slash command nobody handles
    UnknownCommand(String),
    /// Free text, kept verbatim
    Text(String),
}

impl Intent {
    /// Intents only the administrator may use.
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Intent::Users | Intent::SearchPrompt | Intent::Approve { .. } | Intent::Reject { .. }
        )
    }
}

/// Buttons of the persistent reply keyboard. Their labels arrive as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuButton {
    Home,
    Register,
    Status,
    Help,
    Users,
    Search,
}

impl MenuButton {
    pub fn label(self) -> &'static str {
        match self {
            MenuButton::Home => "🏠 Меню",
            MenuButton::Register => "📝 Регистрация",
            MenuButton::Status => "📊 Статус",
            MenuButton::Help => "❓ Справка",
            MenuButton::Users => "👥 Пользователи",
            MenuButton::Search => "🔍 Поиск",
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            MenuButton::Home => Intent::Start,
            MenuButton::Register => Intent::Register,
            MenuButton::Status => Intent::Status,
            MenuButton::Help => Intent::Help,
            MenuButton::Users => Intent::Users,
            MenuButton::Search => Intent::SearchPrompt,
        }
    }

    pub fn is_admin_only(self) -> bool {
        matches!(self, MenuButton::Users | MenuButton::Search)
    }

    pub fn from_label(text: &str) -> Option<MenuButton> {
        MenuButton::iter().find(|button| button.label() == text)
    }
}

/// Classifies one inbound text message.
pub fn classify(text: &str) -> Intent {
    if let Some(command) = text.trim_start().strip_prefix('/') {
        let (head, args) = match command.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (command, ""),
        };
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        return match name.as_str() {
            "start" => Intent::Start,
            "register" => Intent::Register,
            "status" => Intent::Status,
            "help" => Intent::Help,
            "users" => Intent::Users,
            "approve" => Intent::Approve { args: args.to_string() },
            "reject" => Intent::Reject { args: args.to_string() },
            _ => Intent::UnknownCommand(name),
        };
    }

    match MenuButton::from_label(text) {
        Some(button) => button.intent(),
        None => Intent::Text(text.to_string()),
    }
}

/// Where a classified message goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Run the command handler.
    Command(Intent),
    /// Admin-only intent from someone else; reply with a refusal and stop.
    Denied(Intent),
    /// Next answer of an open registration session.
    RegistrationAnswer(String),
    /// Directory search query.
    Search(String),
    /// Unrecognized slash command.
    Unknown(String),
}

pub fn route(intent: Intent, sender: i64, admin_id: i64, has_session: bool) -> Route {
    if intent.is_admin_only() && sender != admin_id {
        return Route::Denied(intent);
    }
    match intent {
        Intent::Text(text) if has_session => Route::RegistrationAnswer(text),
        Intent::Text(text) => Route::Search(text),
        Intent::UnknownCommand(name) => Route::Unknown(name),
        other => Route::Command(other),
    }
}

/// Inline button payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Register,
    Status,
    Help,
    AdminUsers,
    AdminSearch,
    /// `approve_{id}_{role}`; the role token is validated by moderation
    Approve { telegram_id: i64, role: String },
    /// `reject_{id}`
    Reject { telegram_id: i64 },
}

impl CallbackAction {
    pub fn parse(data: &str) -> AppResult<Self> {
        match data {
            "register" => return Ok(CallbackAction::Register),
            "status" => return Ok(CallbackAction::Status),
            "help" => return Ok(CallbackAction::Help),
            "admin_users" => return Ok(CallbackAction::AdminUsers),
            "admin_search" => return Ok(CallbackAction::AdminSearch),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("approve_") {
            let (id, role) = rest
                .split_once('_')
                .ok_or_else(|| malformed_callback(data))?;
            let telegram_id = id.parse().map_err(|_| malformed_callback(data))?;
            if role.is_empty() {
                return Err(malformed_callback(data));
            }
            return Ok(CallbackAction::Approve {
                telegram_id,
                role: role.to_string(),
            });
        }

        if let Some(id) = data.strip_prefix("reject_") {
            let telegram_id = id.parse().map_err(|_| malformed_callback(data))?;
            return Ok(CallbackAction::Reject { telegram_id });
        }

        Err(malformed_callback(data))
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            CallbackAction::AdminUsers
                | CallbackAction::AdminSearch
                | CallbackAction::Approve { .. }
                | CallbackAction::Reject { .. }
        )
    }

    /// Payload string carried by the inline button.
    pub fn payload(&self) -> String {
        match self {
            CallbackAction::Register => "register".to_string(),
            CallbackAction::Status => "status".to_string(),
            CallbackAction::Help => "help".to_string(),
            CallbackAction::AdminUsers => "admin_users".to_string(),
            CallbackAction::AdminSearch => "admin_search".to_string(),
            CallbackAction::Approve { telegram_id, role } => format!("approve_{}_{}", telegram_id, role),
            CallbackAction::Reject { telegram_id } => format!("reject_{}", telegram_id),
        }
    }
}

fn malformed_callback(data: &str) -> AppError {
    AppError::Validation(format!("❌ Неизвестное действие: {}", data))
}

pub const APPROVE_USAGE: &str = "❌ Неверный формат команды.\nИспользуйте: /approve ID роль";
pub const REJECT_USAGE: &str = "❌ Неверный формат команды.\nИспользуйте: /reject ID причина";
pub const INVALID_ID: &str = "❌ Неверный ID пользователя.";
pub const MISSING_ROLE: &str = "❌ Укажите роль: житель, сосед, ОК";

/// Parsed `/approve <id> <role>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveArgs {
    pub telegram_id: i64,
    pub role: String,
}

/// Parsed `/reject <id> [reason...]`. The reason may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectArgs {
    pub telegram_id: i64,
    pub reason: String,
}

pub fn parse_approve_args(args: &str) -> AppResult<ApproveArgs> {
    let mut parts = args.split_whitespace();
    let telegram_id = parse_id(parts.next(), APPROVE_USAGE)?;
    let role = parts
        .next()
        .ok_or_else(|| AppError::Validation(MISSING_ROLE.to_string()))?;
    Ok(ApproveArgs {
        telegram_id,
        role: role.to_string(),
    })
}

pub fn parse_reject_args(args: &str) -> AppResult<RejectArgs> {
    let mut parts = args.split_whitespace();
    let telegram_id = parse_id(parts.next(), REJECT_USAGE)?;
    Ok(RejectArgs {
        telegram_id,
        reason: parts.collect::<Vec<_>>().join(" "),
    })
}

fn parse_id(token: Option<&str>, usage: &str) -> AppResult<i64> {
    let token = token.ok_or_else(|| AppError::Validation(usage.to_string()))?;
    token
        .parse()
        .map_err(|_| AppError::Validation(INVALID_ID.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADMIN: i64 = 100;

    #[test]
    fn test_classify_commands() {
        assert_eq!(classify("/start"), Intent::Start);
        assert_eq!(classify("/register@ForestBot"), Intent::Register);
        assert_eq!(classify("/STATUS"), Intent::Status);
        assert_eq!(
            classify("/approve 42 сосед"),
            Intent::Approve { args: "42 сосед".to_string() }
        );
        assert_eq!(
            classify("/reject 42   fake   address "),
            Intent::Reject { args: "42   fake   address".to_string() }
        );
        assert_eq!(classify("/cancel"), Intent::UnknownCommand("cancel".to_string()));
    }

    #[test]
    fn test_classify_menu_labels() {
        for button in MenuButton::iter() {
            assert_eq!(classify(button.label()), button.intent());
        }
        assert_eq!(classify("🔍 Поиск соседей"), Intent::Text("🔍 Поиск соседей".to_string()));
    }

    #[test]
    fn test_free_text_is_kept_verbatim() {
        assert_eq!(classify("  GFC P11 "), Intent::Text("  GFC P11 ".to_string()));
    }

    #[test]
    fn test_admin_gate() {
        assert_eq!(route(Intent::Users, 5, ADMIN, false), Route::Denied(Intent::Users));
        assert_eq!(route(Intent::Users, ADMIN, ADMIN, false), Route::Command(Intent::Users));
        assert_eq!(
            route(classify("🔍 Поиск"), 5, ADMIN, true),
            Route::Denied(Intent::SearchPrompt)
        );
        let approve = Intent::Approve { args: "1 ОК".to_string() };
        assert_eq!(route(approve.clone(), 5, ADMIN, false), Route::Denied(approve));
    }

    #[test]
    fn test_text_goes_to_session_before_search() {
        assert_eq!(
            route(Intent::Text("Ivan".to_string()), 5, ADMIN, true),
            Route::RegistrationAnswer("Ivan".to_string())
        );
        assert_eq!(
            route(Intent::Text("Ivan".to_string()), 5, ADMIN, false),
            Route::Search("Ivan".to_string())
        );
        // menu buttons still work mid-registration
        assert_eq!(route(classify("📊 Статус"), 5, ADMIN, true), Route::Command(Intent::Status));
    }

    #[test]
    fn test_unknown_command_is_never_an_answer() {
        assert_eq!(
            route(classify("/foo"), 5, ADMIN, true),
            Route::Unknown("foo".to_string())
        );
    }

    #[test]
    fn test_callback_payloads() {
        assert_eq!(CallbackAction::parse("register").unwrap(), CallbackAction::Register);
        assert_eq!(CallbackAction::parse("admin_users").unwrap(), CallbackAction::AdminUsers);
        assert_eq!(
            CallbackAction::parse("approve_42_сосед").unwrap(),
            CallbackAction::Approve { telegram_id: 42, role: "сосед".to_string() }
        );
        assert_eq!(
            CallbackAction::parse("reject_42").unwrap(),
            CallbackAction::Reject { telegram_id: 42 }
        );
        for bad in ["approve_42", "approve_x_ОК", "approve_42_", "reject_", "reject_abc", "bogus"] {
            assert!(matches!(CallbackAction::parse(bad), Err(AppError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn test_callback_payload_round_trip() {
        let action = CallbackAction::Approve { telegram_id: -5, role: "ОК".to_string() };
        assert_eq!(CallbackAction::parse(&action.payload()).unwrap(), action);
        assert!(action.is_admin_only());
        assert!(!CallbackAction::Help.is_admin_only());
    }

    #[test]
    fn test_approve_args() {
        assert_eq!(
            parse_approve_args("42 сосед").unwrap(),
            ApproveArgs { telegram_id: 42, role: "сосед".to_string() }
        );
        assert_eq!(parse_approve_args("").unwrap_err().to_string(), APPROVE_USAGE);
        assert_eq!(parse_approve_args("abc сосед").unwrap_err().to_string(), INVALID_ID);
        assert_eq!(parse_approve_args("42").unwrap_err().to_string(), MISSING_ROLE);
    }

    #[test]
    fn test_reject_args() {
        assert_eq!(
            parse_reject_args("42 fake  address").unwrap(),
            RejectArgs { telegram_id: 42, reason: "fake address".to_string() }
        );
        assert_eq!(parse_reject_args("42").unwrap().reason, "");
        assert_eq!(parse_reject_args("").unwrap_err().to_string(), REJECT_USAGE);
    }
}
