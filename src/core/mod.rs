pub mod etl;
pub mod extract;
pub mod persist;
pub mod transform;

pub use crate::domain::model::{LoadReport, Record, UserRecord};
pub use crate::domain::ports::{ConfigProvider, ConnectionProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
