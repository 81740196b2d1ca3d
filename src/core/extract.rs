use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Input formats accepted for file sources, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    pub const EXTENSIONS: [&'static str; 2] = ["json", "csv"];

    pub fn from_path(path: &str) -> Option<Self> {
        let extension = std::path::Path::new(path)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(FileFormat::Json),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

pub fn parse_records(format: FileFormat, bytes: &[u8]) -> Result<Vec<Option<Record>>> {
    match format {
        FileFormat::Json => parse_json_records(bytes),
        FileFormat::Csv => parse_csv_records(bytes),
    }
}

pub fn parse_json_records(bytes: &[u8]) -> Result<Vec<Option<Record>>> {
    let json_data: Value = serde_json::from_slice(bytes)?;
    json_to_records(json_data)
}

/// `null` 代表沒有資料；陣列中的 `null` 保留為 `None`，交給 transform 過濾
pub fn json_to_records(json_data: Value) -> Result<Vec<Option<Record>>> {
    match json_data {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Null => records.push(None),
                    Value::Object(obj) => records.push(Some(Record::from_map(obj))),
                    other => {
                        tracing::warn!(
                            "Skipping entry {}: expected an object, found {}",
                            index,
                            json_type_name(&other)
                        );
                    }
                }
            }
            Ok(records)
        }
        // 單一物件視為一筆記錄
        Value::Object(obj) => Ok(vec![Some(Record::from_map(obj))]),
        other => Err(EtlError::ProcessingError {
            message: format!(
                "expected a JSON array of user objects, found {}",
                json_type_name(&other)
            ),
        }),
    }
}

pub fn parse_csv_records(bytes: &[u8]) -> Result<Vec<Option<Record>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let data: HashMap<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(Some(Record { data }));
    }

    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_array_keeps_null_entries() {
        let input = br#"[{"id": "1", "name": "Ann"}, null, 5, {"id": "2"}]"#;
        let records = parse_json_records(input).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().data.get("name"), Some(&json!("Ann")));
        assert!(records[1].is_none());
        assert_eq!(records[2].as_ref().unwrap().data.get("id"), Some(&json!("2")));
    }

    #[test]
    fn test_json_null_and_single_object() {
        assert!(parse_json_records(b"null").unwrap().is_empty());

        let records = parse_json_records(br#"{"id": "9"}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_json_scalar_and_garbage_are_rejected() {
        assert!(matches!(
            parse_json_records(b"\"users\""),
            Err(EtlError::ProcessingError { .. })
        ));
        assert!(matches!(
            parse_json_records(b"[{"),
            Err(EtlError::SerializationError(_))
        ));
    }

    #[test]
    fn test_csv_rows_become_string_records() {
        let input = b"id, name ,email,status\n1,Ann,ann@example.com,Active\n2,Bob,,disabled\n";
        let records = parse_csv_records(input).unwrap();

        assert_eq!(records.len(), 2);
        let second = records[1].as_ref().unwrap();
        assert_eq!(second.data.get("name"), Some(&json!("Bob")));
        assert_eq!(second.data.get("email"), Some(&json!("")));
        assert_eq!(second.data.get("status"), Some(&json!("disabled")));
    }

    #[test]
    fn test_csv_ragged_row_is_an_error() {
        let input = b"id,name\n1,Ann,extra\n";
        assert!(matches!(parse_csv_records(input), Err(EtlError::CsvError(_))));
    }

    #[test]
    fn test_file_format_from_path() {
        assert_eq!(FileFormat::from_path("users.json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path("data/Users.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path("users.txt"), None);
        assert_eq!(FileFormat::from_path("users"), None);
    }
}
