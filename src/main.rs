use clap::Parser;
use user_etl::utils::error::{EtlError, ErrorSeverity};
use user_etl::utils::{logger, validation::Validate};
use user_etl::{CliConfig, EtlEngine, LocalStorage, UserPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting user-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let pipeline = UserPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ Loaded {} users into {}", report.rows_inserted, report.database);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: EtlError) {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
