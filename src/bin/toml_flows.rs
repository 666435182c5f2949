use clap::Parser;
use sankey_flows::config::toml_config::TomlConfig;
use sankey_flows::domain::ports::{ConfigProvider, MatrixSource};
use sankey_flows::utils::error::ErrorSeverity;
use sankey_flows::utils::{logger, validation::Validate};
use sankey_flows::{EtlEngine, FlowPipeline, LocalStorage, SpreadsheetSource};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-flows")]
#[command(about = "Flow matrix to Sankey edge list, driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "flows.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Load the matrix and report its shape without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if args.json_logs {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));
    }

    tracing::info!("🚀 Starting TOML-based flow conversion");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let source = SpreadsheetSource::from_selection(config.column_selection(), config.row_limit())?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return perform_dry_run(&source, &config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FlowPipeline::new(source, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(output_path) => {
            tracing::info!("✅ Flow table written");
            println!("✅ Flow table written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!(
        "📥 Source: {} [sheet '{}', columns {}]",
        config.input_path(),
        config.sheet_name(),
        config.column_selection()
    );
    tracing::info!(
        "📤 Output: {} ({})",
        config.output_path(),
        config.output_formats().join(", ")
    );
}

fn perform_dry_run(source: &SpreadsheetSource, config: &TomlConfig) -> anyhow::Result<()> {
    let matrix = source.load(Path::new(config.input_path()), config.sheet_name())?;
    let (rows, columns) = matrix.shape();

    println!("Matrix: {} rows x {} columns", rows, columns);
    println!("Categories: {}", matrix.column_labels.join(", "));
    for format in config.output_formats() {
        println!(
            "Would write: {}",
            Path::new(config.output_path())
                .join(config.output_filename(format))
                .display()
        );
    }
    Ok(())
}
