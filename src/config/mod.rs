#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use std::collections::HashMap;

/// Where the loose user records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    File {
        path: String,
    },
    Api {
        endpoint: String,
        headers: HashMap<String, String>,
        timeout_seconds: Option<u64>,
    },
}

impl SourceSettings {
    pub fn location(&self) -> &str {
        match self {
            SourceSettings::File { path } => path,
            SourceSettings::Api { endpoint, .. } => endpoint,
        }
    }
}
