//! Fixed column layout of the record sheet and row <-> record conversion

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::models::{UserRecord, UserRole, UserStatus, TIMESTAMP_FORMAT};

/// Number of columns in a record row (A..K)
pub const COLUMN_COUNT: usize = 11;

/// Columns covering a full record
pub const RECORD_COLUMNS: &str = "A:K";

/// Header row cells
pub const HEADER_RANGE: &str = "A1:K1";

pub const STATUS_COLUMN: char = 'I';
pub const ROLE_COLUMN: char = 'J';
pub const COMMENT_COLUMN: char = 'K';

/// Header labels written by the one-time sheet bootstrap
pub const HEADERS: [&str; COLUMN_COUNT] = [
    "User ID",
    "Username",
    "Имя",
    "Фамилия",
    "Телефон",
    "Email",
    "Адрес",
    "Дата регистрации",
    "Статус",
    "Роль",
    "Админ комментарий",
];

const COL_ID: usize = 0;
const COL_USERNAME: usize = 1;
const COL_FIRST_NAME: usize = 2;
const COL_LAST_NAME: usize = 3;
const COL_PHONE: usize = 4;
const COL_EMAIL: usize = 5;
const COL_ADDRESS: usize = 6;
const COL_REGISTERED_AT: usize = 7;
const COL_STATUS: usize = 8;
const COL_ROLE: usize = 9;
const COL_COMMENT: usize = 10;

/// Sheet row number (1-based, header on row 1) of the data row at `index`.
pub fn sheet_row(index: usize) -> usize {
    index + 2
}

/// Range covering status, role and (optionally) comment of one sheet row.
pub fn status_range(sheet_row: usize, with_comment: bool) -> String {
    let last = if with_comment { COMMENT_COLUMN } else { ROLE_COLUMN };
    format!("{STATUS_COLUMN}{sheet_row}:{last}{sheet_row}")
}

/// Tab name quoted for A1 notation: `'Лист 1'`, inner quotes doubled.
pub fn quoted_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// A1 range, prefixed with the quoted tab name when one is given.
pub fn a1_range(sheet_name: Option<&str>, a1: &str) -> String {
    match sheet_name {
        Some(name) => format!("{}!{}", quoted_sheet_name(name), a1),
        None => a1.to_string(),
    }
}

/// Renders a cell as text; the API returns strings, but numbers and bools
/// show up when someone edits the sheet by hand.
pub fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Identifier cell of a row, if it holds a valid integer.
pub fn row_id(row: &[Value]) -> Option<i64> {
    cell_text(row.get(COL_ID)).trim().parse().ok()
}

/// Builds a record from a data row. Missing trailing cells read as empty.
///
/// Returns `None` when the identifier cell is empty or not a number.
pub fn record_from_row(row: &[Value]) -> Option<UserRecord> {
    let telegram_id = row_id(row)?;
    let text = |col: usize| cell_text(row.get(col));
    let registered_at = NaiveDateTime::parse_from_str(text(COL_REGISTERED_AT).trim(), TIMESTAMP_FORMAT).ok();

    Some(UserRecord {
        telegram_id,
        username: text(COL_USERNAME),
        first_name: text(COL_FIRST_NAME),
        last_name: text(COL_LAST_NAME),
        phone: text(COL_PHONE),
        email: text(COL_EMAIL),
        address: text(COL_ADDRESS),
        registered_at,
        status: UserStatus::from_cell(&text(COL_STATUS)),
        role: UserRole::from_cell(&text(COL_ROLE)),
        admin_comment: text(COL_COMMENT),
    })
}

/// Serializes a record into the fixed column layout.
pub fn row_from_record(record: &UserRecord) -> Vec<Value> {
    vec![
        Value::String(record.telegram_id.to_string()),
        Value::String(record.username.clone()),
        Value::String(record.first_name.clone()),
        Value::String(record.last_name.clone()),
        Value::String(record.phone.clone()),
        Value::String(record.email.clone()),
        Value::String(record.address.clone()),
        Value::String(record.registered_at_text()),
        Value::String(record.status.to_string()),
        Value::String(record.role.label().to_string()),
        Value::String(record.admin_comment.clone()),
    ]
}

/// Cells written by a status update, in column order starting at `I`.
pub fn status_cells(status: UserStatus, role: UserRole, comment: &str) -> Vec<Value> {
    let mut cells = vec![
        Value::String(status.to_string()),
        Value::String(role.label().to_string()),
    ];
    if !comment.is_empty() {
        cells.push(Value::String(comment.to_string()));
    }
    cells
}

/// Decodes every data row (header skipped), dropping rows without a usable id.
pub fn records_from_rows(rows: &[Vec<Value>]) -> Vec<(usize, UserRecord)> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| !row.is_empty())
        .filter_map(|(i, row)| match record_from_row(row) {
            Some(record) => Some((i - 1, record)),
            None => {
                log::warn!("Skipping sheet row {}: id cell is not a number", i + 1);
                None
            }
        })
        .collect()
}
