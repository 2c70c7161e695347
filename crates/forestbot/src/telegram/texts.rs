//! Message texts shown to residents and the administrator
//!
//! Registration prompts are sent with `ParseMode::Html`; everything that
//! embeds user-supplied data is sent as plain text.

use indoc::indoc;

use forestcore::{AppError, Decision, RegistrationStep, UserRecord, UserStatus};

/// Telegram's limit on one message, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Budget for one chunk of a multi-message listing
pub const MAX_CHUNK_CHARS: usize = 3500;

/// Longest query echoed back in the search results header
const QUERY_ECHO_CHARS: usize = 100;

pub const GREETING: &str = "👋 Добро пожаловать в бот верификации!\n\nВыберите действие:";

pub const PERMISSION_DENIED: &str = "❌ У вас нет прав для выполнения этой команды.";

pub const UNKNOWN_COMMAND: &str = "🤷 Неизвестная команда. Список команд: /help";

pub const NOT_REGISTERED: &str = "❓ Вы не найдены в системе. Используйте /register для регистрации.";

pub const SAVE_FAILED: &str =
    "❌ Произошла ошибка при сохранении данных. Отправьте адрес ещё раз, чтобы повторить попытку.";

pub const STORE_UNAVAILABLE: &str = "❌ Сервис временно недоступен. Попробуйте позже.";

pub const USERS_EMPTY: &str = "📝 Список пользователей пуст.";

pub const USERS_FAILED: &str = "❌ Ошибка при получении списка пользователей.";

pub const SEARCH_PROMPT: &str = "🔍 Введите запрос для поиска пользователей:\n\n\
                                 Можно искать по: имени, фамилии, username, телефону, email, адресу";

pub const SEARCH_NOT_VERIFIED: &str =
    "❓ Для использования поиска необходимо пройти верификацию. Используйте /register";

pub const SEARCH_EMPTY_QUERY: &str = "🔍 Введите непустой запрос для поиска.";

pub const SEARCH_NOTHING_FOUND: &str = "🔍 По вашему запросу ничего не найдено.";

pub const SEARCH_FAILED: &str = "❌ Ошибка при поиске.";

pub const HELP: &str = indoc! {"
    📚 Справка по боту

    👥 Основные команды:
    🔹 /start - приветствие и главное меню
    🔹 /register - начать процесс регистрации
    🔹 /status - проверить статус заявки
    🔹 /help - эта справка

    🔍 Поиск:
    После одобрения заявки вы можете искать других жителей, просто отправив текстовое сообщение."};

pub const ADMIN_HELP: &str = indoc! {"


    👨‍💼 Команды администратора:
    🔹 /users - список всех пользователей
    🔹 /approve ID роль - одобрить заявку
    🔹 /reject ID причина - отклонить заявку

    📝 Доступные роли: житель, сосед, ОК"};

pub fn help_text(is_admin: bool) -> String {
    if is_admin {
        format!("{}{}", HELP, ADMIN_HELP)
    } else {
        HELP.to_string()
    }
}

/// Question asked at each registration step (HTML)
pub fn step_prompt(step: RegistrationStep) -> &'static str {
    match step {
        RegistrationStep::FirstName => "👤 Пожалуйста, введите ваше имя\n<i>в формате:</i> Иван",
        RegistrationStep::LastName => "✅ Отлично! Теперь введите вашу фамилию\n<i>в формате:</i> Иванов",
        RegistrationStep::Phone => "✅ Хорошо! Введите ваш номер телефона\n<i>в формате:</i> +71234567890",
        RegistrationStep::Email => "✅ Принято! Введите ваш email\n<i>пример:</i> example@mail.com",
        RegistrationStep::Address => {
            "✅ Отлично! И наконец, введите ваш адрес по образцу:\n\n\
             🏘 <b>Поселок Green Forest Club:</b> GFC P11\n\
             🏘 <b>Поселок Green Forest Park:</b> GFP P11\n\
             🏘 <b>Green Forest Premium:</b> GFPr P11"
        }
        RegistrationStep::Complete => "⏳ Ваша заявка уже отправляется, подождите немного.",
    }
}

pub fn registration_started(restarted: bool) -> String {
    let header = if restarted {
        "🔄 Предыдущая регистрация сброшена, начинаем заново!"
    } else {
        "📝 Начинаем процесс регистрации!"
    };
    format!("{}\n\n{}", header, step_prompt(RegistrationStep::FirstName))
}

/// Status line: `⏳ На рассмотрении`, `✅ Одобрена (роль: сосед)`, `❌ Отклонена`
pub fn status_line(record: &UserRecord) -> String {
    match record.status {
        UserStatus::Pending => "⏳ На рассмотрении".to_string(),
        UserStatus::Approved => format!("✅ Одобрена (роль: {})", record.role),
        UserStatus::Rejected if record.admin_comment.is_empty() => "❌ Отклонена".to_string(),
        UserStatus::Rejected => format!("❌ Отклонена\nПричина: {}", record.admin_comment),
    }
}

pub fn already_registered(record: &UserRecord) -> String {
    format!("Вы уже зарегистрированы!\nСтатус заявки: {}", status_line(record))
}

fn short_date(record: &UserRecord) -> String {
    record
        .registered_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn handle(record: &UserRecord) -> String {
    if record.username.is_empty() {
        String::new()
    } else {
        format!(" (@{})", record.username)
    }
}

pub fn status_card(record: &UserRecord) -> String {
    let text = format!(
        "📋 Статус вашей заявки: {}\n\n👤 Имя: {}\n📧 Email: {}\n📅 Дата регистрации: {}",
        status_line(record),
        record.full_name(),
        record.email,
        short_date(record)
    );
    truncate_chars(&text, MAX_MESSAGE_CHARS)
}

/// Confirmation sent to the applicant after the record is saved
pub fn registration_summary(record: &UserRecord) -> String {
    let text = format!(
        "✅ Регистрация завершена!\n\n\
         📋 Ваши данные:\n\
         👤 Имя: {}\n\
         📱 Телефон: {}\n\
         📧 Email: {}\n\
         🏠 Адрес: {}\n\n\
         ⏳ Ваша заявка отправлена на модерацию. Ожидайте уведомления о результате.",
        record.full_name(),
        record.phone,
        record.email,
        record.address
    );
    truncate_chars(&text, MAX_MESSAGE_CHARS)
}

/// Moderation card sent to the administrator for a new application
pub fn admin_card(record: &UserRecord) -> String {
    let text = format!(
        "🆕 Новая заявка на верификацию!\n\n\
         👤 Пользователь: {}{}\n\
         📱 ID: {}\n\
         📞 Телефон: {}\n\
         📧 Email: {}\n\
         🏠 Адрес: {}\n\
         📅 Дата: {}",
        record.full_name(),
        handle(record),
        record.telegram_id,
        record.phone,
        record.email,
        record.address,
        record.registered_at_text()
    );
    truncate_chars(&text, MAX_MESSAGE_CHARS)
}

fn list_status(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Pending => "⏳ На рассмотрении",
        UserStatus::Approved => "✅ Одобрен",
        UserStatus::Rejected => "❌ Отклонен",
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Packs `entries` under `header` into messages of at most [`MAX_CHUNK_CHARS`].
///
/// An entry that alone exceeds the budget is split across messages.
pub fn chunk_entries(header: &str, entries: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = header.to_string();
    let mut current_chars = current.chars().count();

    for entry in entries {
        let entry_chars = entry.chars().count();
        if entry_chars <= MAX_CHUNK_CHARS {
            if current_chars + entry_chars > MAX_CHUNK_CHARS {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            current.push_str(&entry);
            current_chars += entry_chars;
            continue;
        }

        for ch in entry.chars() {
            if current_chars == MAX_CHUNK_CHARS {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            current.push(ch);
            current_chars += 1;
        }
    }

    if current_chars > 0 {
        chunks.push(current);
    }
    chunks
}

/// Numbered user list split into messages of at most [`MAX_CHUNK_CHARS`].
pub fn user_list_chunks(records: &[UserRecord]) -> Vec<String> {
    let entries = records.iter().enumerate().map(|(i, record)| {
        format!(
            "{}. {}{}\n   ID: {} | {} | Роль: {}\n\n",
            i + 1,
            record.full_name(),
            handle(record),
            record.telegram_id,
            list_status(record.status),
            record.role
        )
    });
    chunk_entries("👥 Список пользователей:\n\n", entries)
}

/// Search hits split into messages of at most [`MAX_CHUNK_CHARS`].
pub fn search_results(query: &str, records: &[UserRecord]) -> Vec<String> {
    let header = format!(
        "🔍 Результаты поиска по запросу \"{}\":\n\n",
        truncate_chars(query.trim(), QUERY_ECHO_CHARS)
    );
    let entries = records.iter().map(|record| {
        format!(
            "👤 {}{}\n🏠 {} | Роль: {}\n\n",
            record.full_name(),
            handle(record),
            record.address,
            record.role
        )
    });
    chunk_entries(&header, entries)
}

fn undelivered_note(decision: &Decision) -> &'static str {
    if decision.user_notified {
        ""
    } else {
        "\n⚠️ Не удалось отправить уведомление пользователю."
    }
}

/// Administrator's confirmation of a moderation decision
pub fn decision_confirmation(decision: &Decision) -> String {
    let head = match decision.status {
        UserStatus::Approved => format!(
            "✅ Пользователь {} одобрен с ролью: {}",
            decision.telegram_id, decision.role
        ),
        _ => format!(
            "❌ Пользователь {} отклонен. Причина: {}",
            decision.telegram_id, decision.comment
        ),
    };
    format!("{}{}", head, undelivered_note(decision))
}

/// Replacement text for a moderation card once a button decided it
pub fn card_outcome(decision: &Decision) -> String {
    let head = match decision.status {
        UserStatus::Approved => format!("✅ Пользователь одобрен с ролью: {}", decision.role),
        _ => format!("❌ Пользователь отклонен. Причина: {}", decision.comment),
    };
    format!("{}{}", head, undelivered_note(decision))
}

/// What the administrator sees when a moderation attempt fails
pub fn moderation_error(err: &AppError) -> String {
    match err {
        AppError::NotFound(id) => format!("❌ Пользователь {} не найден.", id),
        AppError::AlreadyModerated { id, status } => {
            format!("⚠️ Заявка пользователя {} уже рассмотрена (статус: {}).", id, status)
        }
        AppError::Validation(message) => message.clone(),
        _ => "❌ Ошибка при обновлении статуса.".to_string(),
    }
}
