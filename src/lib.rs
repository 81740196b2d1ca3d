pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, SqliteConnectionProvider};
pub use app::pipelines::UserPipeline;
pub use config::TomlConfig;
pub use crate::core::{etl::EtlEngine, persist::UserWriter, transform::process_user_data};
pub use domain::model::{LoadReport, Record, UserRecord};
pub use utils::error::{EtlError, Result};
