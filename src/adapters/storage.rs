use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        // 絕對路徑會取代 base_path
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_relative_and_absolute_paths() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("users.json"), b"[]").unwrap();

        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        assert_eq!(storage.read_file("users.json").await.unwrap(), b"[]");

        let absolute = temp_dir.path().join("users.json");
        let storage = LocalStorage::default();
        assert_eq!(
            storage.read_file(absolute.to_str().unwrap()).await.unwrap(),
            b"[]"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        let err = storage.read_file("nope.json").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }
}
