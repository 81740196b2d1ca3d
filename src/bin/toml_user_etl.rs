use clap::Parser;
use user_etl::config::TomlConfig;
use user_etl::core::ConfigProvider;
use user_etl::utils::error::ErrorSeverity;
use user_etl::utils::{logger, validation::Validate};
use user_etl::{EtlEngine, LocalStorage, UserPipeline};

#[derive(Parser)]
#[command(name = "toml-user-etl")]
#[command(about = "User ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "user-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the database path from the config
    #[arg(long)]
    database: Option<String>,

    /// Override schema creation from the config
    #[arg(long)]
    create_schema: Option<bool>,

    /// Dry run - show what would be processed without writing to the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("🚀 Starting TOML-based user ETL");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(database) = args.database {
        tracing::info!("🔧 Database overridden to: {}", database);
        config.database.path = database;
    }
    if let Some(create_schema) = args.create_schema {
        config.database.create_schema = create_schema;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Pipeline '{}' {}: {} -> {}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("unversioned"),
        config.source().location(),
        config.database_path()
    );

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        println!("Source:   {}", config.source().location());
        println!("Database: {}", config.database_path());
        println!("Schema:   {}", if config.create_schema() { "create if missing" } else { "must exist" });
        return Ok(());
    }

    let pipeline = UserPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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
    }

    Ok(())
}
