use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 來源端的鬆散記錄，欄位型別不固定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: map.into_iter().collect(),
        }
    }
}

/// A validated user, built once from a [`Record`] and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    id: String,
    name: String,
    email: String,
    active: bool,
}

impl UserRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            active,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub rows_inserted: usize,
    pub database: String,
    pub loaded_at: DateTime<Utc>,
}
