use crate::config::SourceSettings;
use crate::core::extract::FileFormat;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    File,
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "user-etl")]
#[command(about = "Load user records from JSON, CSV or an HTTP endpoint into a SQLite users table")]
pub struct CliConfig {
    #[arg(long, value_enum, default_value = "file")]
    pub source_type: SourceType,

    /// Input file path (.json or .csv) or HTTP endpoint
    #[arg(long)]
    pub source: String,

    #[arg(long, default_value = "./users.db")]
    pub database: String,

    /// Create the users table when it does not exist
    #[arg(long)]
    pub create_schema: bool,

    /// Extra request header for API sources, as NAME=VALUE
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

impl ConfigProvider for CliConfig {
    fn source(&self) -> SourceSettings {
        match self.source_type {
            SourceType::File => SourceSettings::File {
                path: self.source.clone(),
            },
            SourceType::Api => SourceSettings::Api {
                endpoint: self.source.clone(),
                headers: self.headers.iter().cloned().collect::<HashMap<_, _>>(),
                timeout_seconds: self.timeout_seconds,
            },
        }
    }

    fn database_path(&self) -> &str {
        &self.database
    }

    fn create_schema(&self) -> bool {
        self.create_schema
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.source_type {
            SourceType::File => {
                validation::validate_path("source", &self.source)?;
                validation::validate_file_extension("source", &self.source, &FileFormat::EXTENSIONS)?;
            }
            SourceType::Api => {
                validation::validate_url("source", &self.source)?;
            }
        }

        if !self.headers.is_empty() && self.source_type == SourceType::File {
            return Err(EtlError::ConfigValidationError {
                field: "header".to_string(),
                message: "headers only apply to api sources".to_string(),
            });
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        validation::validate_path("database", &self.database)
    }
}
