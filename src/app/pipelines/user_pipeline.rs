use crate::adapters::database::SqliteConnectionProvider;
use crate::config::SourceSettings;
use crate::core::extract::{self, FileFormat};
use crate::core::persist::UserWriter;
use crate::core::transform::process_user_data;
use crate::core::{
    ConfigProvider, ConnectionProvider, LoadReport, Pipeline, Record, Storage, UserRecord,
};
use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Pipeline that reads user records from a file or an API and loads them into
/// the SQLite `users` table.
pub struct UserPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    writer: UserWriter<SqliteConnectionProvider>,
}

impl<S: Storage, C: ConfigProvider> UserPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let writer = UserWriter::new(SqliteConnectionProvider::new(config.database_path()));
        Self {
            storage,
            config,
            client: Client::new(),
            writer,
        }
    }

    async fn extract_file(&self, path: &str) -> Result<Vec<Option<Record>>> {
        let format = FileFormat::from_path(path).ok_or_else(|| EtlError::InvalidConfigValueError {
            field: "source.path".to_string(),
            value: path.to_string(),
            reason: format!("Allowed extensions: {}", FileFormat::EXTENSIONS.join(", ")),
        })?;

        tracing::debug!("Reading {:?} records from {}", format, path);
        let bytes = self.storage.read_file(path).await?;
        extract::parse_records(format, &bytes)
    }

    async fn extract_api(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Vec<Option<Record>>> {
        let mut request = self.client.get(endpoint);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        tracing::debug!("Making API request to: {}", endpoint);
        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(EtlError::ApiStatusError {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        let json_data: serde_json::Value = response.json().await?;
        extract::json_to_records(json_data)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for UserPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Option<Record>>> {
        let source = self.config.source();
        tracing::info!("Extracting users from {}", source.location());

        match &source {
            SourceSettings::File { path } => self.extract_file(path).await,
            SourceSettings::Api {
                endpoint,
                headers,
                timeout_seconds,
            } => self.extract_api(endpoint, headers, *timeout_seconds).await,
        }
    }

    async fn transform(&self, data: Vec<Option<Record>>) -> Result<Vec<UserRecord>> {
        let skipped = data.iter().filter(|entry| entry.is_none()).count();
        if skipped > 0 {
            tracing::debug!("Dropping {} null entries", skipped);
        }

        let users = process_user_data(Some(data.as_slice()));
        tracing::debug!(
            "{} of {} users are active",
            users.iter().filter(|u| u.active()).count(),
            users.len()
        );
        Ok(users)
    }

    async fn load(&self, users: Vec<UserRecord>) -> Result<LoadReport> {
        let writer = self.writer.clone();
        let create_schema = self.config.create_schema();
        let database = self.writer.provider().describe();

        // rusqlite 是阻塞 API，移到 blocking 執行緒
        let rows_inserted = tokio::task::spawn_blocking(move || -> Result<usize> {
            if create_schema {
                writer.ensure_schema()?;
            }
            writer.try_save(&users)
        })
        .await
        .map_err(|e| EtlError::ProcessingError {
            message: format!("database task failed: {}", e),
        })??;

        Ok(LoadReport {
            rows_inserted,
            database,
            loaded_at: Utc::now(),
        })
    }
}
