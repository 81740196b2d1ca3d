use crate::domain::model::{Record, UserRecord};
use serde_json::Value;

const ACTIVE_STATUSES: [&str; 2] = ["active", "enabled"];

/// Maps loose source records to [`UserRecord`]s.
///
/// A `None` container and an empty one both give an empty result. `None`
/// entries are dropped; everything else keeps its relative order. Missing or
/// null `id`, `name` and `email` become empty strings, and `active` is set when
/// the lower-cased `status` is `active` or `enabled`.
pub fn process_user_data(data: Option<&[Option<Record>]>) -> Vec<UserRecord> {
    let Some(entries) = data else {
        return Vec::new();
    };

    entries.iter().flatten().map(to_user_record).collect()
}

fn to_user_record(record: &Record) -> UserRecord {
    let status = field_as_string(record, "status").to_lowercase();

    UserRecord::new(
        field_as_string(record, "id"),
        field_as_string(record, "name"),
        field_as_string(record, "email"),
        ACTIVE_STATUSES.contains(&status.as_str()),
    )
}

fn field_as_string(record: &Record, key: &str) -> String {
    record.data.get(key).map(value_to_string).unwrap_or_default()
}

/// 字串原樣輸出，其他型別轉成文字表示，null 視為空字串
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
