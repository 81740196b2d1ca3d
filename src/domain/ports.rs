use crate::config::SourceSettings;
use crate::domain::model::{LoadReport, Record, UserRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Hands out a fresh database connection per call. The caller owns it and
/// closes it by dropping it.
pub trait ConnectionProvider: Send + Sync {
    fn connect(&self) -> rusqlite::Result<rusqlite::Connection>;

    /// 用於日誌與報告的資料庫描述
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> SourceSettings;
    fn database_path(&self) -> &str;
    fn create_schema(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Option<Record>>>;
    async fn transform(&self, data: Vec<Option<Record>>) -> Result<Vec<UserRecord>>;
    async fn load(&self, users: Vec<UserRecord>) -> Result<LoadReport>;
}
