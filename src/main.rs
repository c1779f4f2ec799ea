use clap::Parser;
use contrib_chart::app::run_and_export;
use contrib_chart::core::ConfigProvider;
use contrib_chart::utils::error::{EtlError, ErrorSeverity};
use contrib_chart::utils::{logger, validation::Validate};
use contrib_chart::{CliConfig, TomlConfig};

async fn run<C: ConfigProvider + Validate + std::fmt::Debug>(
    config: &C,
    monitor_enabled: bool,
    verbose: bool,
) -> Result<String, EtlError> {
    if verbose {
        tracing::debug!("Config: {:?}", config);
    }

    config.validate()?;
    tracing::info!(
        "👥 Roster: {} identifiers, {} format",
        config.roster().len(),
        config.format()
    );

    run_and_export(config, monitor_enabled).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting contrib-chart CLI");

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    // 命令列參數覆蓋檔案設定
                    if let Some(format) = cli.format {
                        config.roster.format = Some(format);
                    }
                    let monitor = cli.monitor || config.monitoring_enabled();
                    run(&config, monitor, cli.verbose).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(&cli, cli.monitor, cli.verbose).await,
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Contribution data fetched successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Contribution data fetched successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
