use anyhow::Context;
use contrib_chart::app::build_engine;
use contrib_chart::core::ConfigProvider;
use contrib_chart::server::{router, AppState};
use contrib_chart::utils::{logger, validation::Validate};
use contrib_chart::TomlConfig;
use std::net::SocketAddr;
use std::sync::Arc;

const CONFIG_ENV: &str = "CONTRIB_CHART_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "contrib-chart.toml";

/// Returns the config and the file it came from, if any.
fn load_config() -> anyhow::Result<(TomlConfig, Option<String>)> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    if std::path::Path::new(&path).exists() {
        let config =
            TomlConfig::from_file(&path).with_context(|| format!("failed to load {}", path))?;
        Ok((config, Some(path)))
    } else {
        Ok((TomlConfig::default(), None))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日誌等級來自設定檔，所以先讀設定再初始化
    let (config, source) = load_config()?;
    config.validate().context("invalid configuration")?;
    logger::init_server_logger(config.log_level());

    match source {
        Some(path) => tracing::info!("📁 Loaded configuration from: {}", path),
        None => tracing::info!("No configuration file found, using defaults"),
    }

    let mut addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("invalid server.bind address")?;
    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        addr.set_port(port);
    }

    let engine = build_engine(&config, config.monitoring_enabled())?;
    let roster = config.roster();
    tracing::info!("👥 Serving {} identifiers", roster.len());

    let app = router(Arc::new(AppState::new(engine, roster)));

    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
