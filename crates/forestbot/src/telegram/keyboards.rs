//! Reply and inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use forestcore::{CallbackAction, MenuButton, UserRole};

fn reply_row(buttons: &[MenuButton]) -> Vec<KeyboardButton> {
    buttons.iter().map(|b| KeyboardButton::new(b.label())).collect()
}

/// Persistent menu under the input field. Admins get an extra row.
pub fn main_menu(is_admin: bool) -> KeyboardMarkup {
    let mut rows = vec![
        reply_row(&[MenuButton::Register, MenuButton::Status]),
        reply_row(&[MenuButton::Help, MenuButton::Home]),
    ];
    if is_admin {
        rows.push(reply_row(&[MenuButton::Users, MenuButton::Search]));
    }
    KeyboardMarkup::new(rows).resize_keyboard()
}

fn action_button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), action.payload())
}

/// Inline quick actions attached to the greeting and the help text
pub fn quick_actions(is_admin: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![action_button("📝 Зарегистрироваться", CallbackAction::Register)],
        vec![action_button("📊 Проверить статус", CallbackAction::Status)],
        vec![action_button("❓ Справка", CallbackAction::Help)],
    ];
    if is_admin {
        rows.push(vec![action_button("👥 Список пользователей", CallbackAction::AdminUsers)]);
        rows.push(vec![action_button("🔍 Поиск пользователя", CallbackAction::AdminSearch)]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// Buttons under a moderation card: one approve button per grantable role, then reject.
///
/// The reject button carries no reason; moderation fills in a fixed one.
pub fn moderation_keyboard(telegram_id: i64) -> InlineKeyboardMarkup {
    let approve_row: Vec<InlineKeyboardButton> = UserRole::assignable()
        .map(|role| {
            action_button(
                &format!("✅ {}", capitalize(role.label())),
                CallbackAction::Approve {
                    telegram_id,
                    role: role.label().to_string(),
                },
            )
        })
        .collect();
    InlineKeyboardMarkup::new(vec![
        approve_row,
        vec![action_button("❌ Отклонить", CallbackAction::Reject { telegram_id })],
    ])
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
