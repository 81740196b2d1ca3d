use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadReport> {
        let started = Instant::now();
        tracing::info!("Starting ETL process...");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} entries", raw_data.len());

        // Transform
        let users = self.pipeline.transform(raw_data).await?;
        tracing::info!("Transformed {} users", users.len());

        // Load
        let report = self.pipeline.load(users).await?;
        tracing::info!(
            "Loaded {} users into {} in {:?}",
            report.rows_inserted,
            report.database,
            started.elapsed()
        );

        Ok(report)
    }
}
