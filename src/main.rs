use clap::Parser;
use clickstream_transform::config::toml_config::TomlConfig;
use clickstream_transform::utils::error::{ErrorSeverity, TransformError};
use clickstream_transform::utils::{logger, validation::Validate};
use clickstream_transform::{CliConfig, LocalStorage, ReplayEngine, ReplayPipeline};

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting clickstream-transform replay");

    if let Err(e) = run(&mut config).await {
        tracing::error!(
            "❌ Replay failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(config: &mut CliConfig) -> Result<(), TransformError> {
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = TomlConfig::from_file(&path)?;
        file.validate()?;
        config.merge_file(&file);
    }

    config.validate()?;
    tracing::debug!("CLI config: {:?}", config);

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Storage is rooted at the output directory, so the input must not be
    // resolved against it.
    let input = std::path::absolute(&config.input)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ReplayPipeline::new(storage, &*config, input.to_string_lossy());

    let engine = ReplayEngine::new_with_monitoring(pipeline, config.monitor);
    let response = engine.run().await?;

    println!("✅ Replay completed successfully!");
    println!("📁 Response saved to: {}/{}", config.output_path, response);
    Ok(())
}
