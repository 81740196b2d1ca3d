use crate::config::SourceSettings;
use crate::core::extract::FileFormat;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub database: DatabaseConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default)]
    pub create_schema: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ${VAR_NAME}
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("database.path", &self.database.path)?;

        match self.source.r#type.as_str() {
            "file" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                validation::validate_path("source.path", path)?;
                validation::validate_file_extension("source.path", path, &FileFormat::EXTENSIONS)?;
            }
            "api" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;
                if let Some(timeout) = self.source.timeout_seconds {
                    validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
                }
            }
            other => {
                return Err(EtlError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Supported source types: file, api".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> SourceSettings {
        if self.source.r#type == "api" {
            SourceSettings::Api {
                endpoint: self.source.endpoint.clone().unwrap_or_default(),
                headers: self.source.headers.clone().unwrap_or_default(),
                timeout_seconds: self.source.timeout_seconds,
            }
        } else {
            SourceSettings::File {
                path: self.source.path.clone().unwrap_or_default(),
            }
        }
    }

    fn database_path(&self) -> &str {
        &self.database.path
    }

    fn create_schema(&self) -> bool {
        self.database.create_schema
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_file_source_config() {
        let toml_content = r#"
[pipeline]
name = "nightly-users"
description = "Import users exported by the CRM"
version = "1.0.0"

[source]
type = "file"
path = "./exports/users.csv"

[database]
path = "./users.db"
create_schema = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.name, "nightly-users");
        assert_eq!(
            config.source(),
            SourceSettings::File {
                path: "./exports/users.csv".to_string()
            }
        );
        assert_eq!(config.database_path(), "./users.db");
        assert!(config.create_schema());
        assert!(!config.verbose());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("USER_ETL_TEST_TOKEN", "Bearer s3cret");

        let toml_content = r#"
[pipeline]
name = "api"

[source]
type = "api"
endpoint = "https://example.com/users"
timeout_seconds = 15

[source.headers]
Authorization = "${USER_ETL_TEST_TOKEN}"
X-Unset = "${USER_ETL_TEST_UNSET}"

[database]
path = "./users.db"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let headers = config.source.headers.clone().unwrap();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer s3cret");
        assert_eq!(headers.get("X-Unset").unwrap(), "${USER_ETL_TEST_UNSET}");
        assert!(!config.create_schema());

        std::env::remove_var("USER_ETL_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let base = |source: &str| {
            format!(
                r#"
[pipeline]
name = "test"

[source]
{}

[database]
path = "./users.db"
"#,
                source
            )
        };

        let invalid = [
            "type = \"api\"\nendpoint = \"invalid-url\"",
            "type = \"api\"",
            "type = \"file\"",
            "type = \"file\"\npath = \"users.parquet\"",
            "type = \"ftp\"\npath = \"users.json\"",
            "type = \"api\"\nendpoint = \"https://example.com\"\ntimeout_seconds = 0",
        ];

        for source in invalid {
            let config = TomlConfig::from_toml_str(&base(source)).unwrap();
            assert!(config.validate().is_err(), "expected failure for {}", source);
        }

        let missing = TomlConfig::from_toml_str(&base("type = \"file\"")).unwrap();
        assert!(matches!(
            missing.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline\nname = 1").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
type = "file"
path = "users.json"

[database]
path = "./users.db"

[monitoring]
verbose = true
json_logs = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.verbose());
        assert!(config.json_logs());
    }
}
