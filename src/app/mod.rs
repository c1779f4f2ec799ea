// Application wiring: builds the concrete pipeline from configuration.

use crate::adapters::{CalendarMarkup, ReqwestFetcher};
use crate::config::LocalStorage;
use crate::core::discovery::RetryPolicy;
use crate::core::etl::EtlEngine;
use crate::core::export::Exporter;
use crate::core::pipeline::ContributionPipeline;
use crate::core::ConfigProvider;
use crate::utils::error::Result;

pub type GithubPipeline = ContributionPipeline<ReqwestFetcher, CalendarMarkup>;

pub fn build_pipeline<C: ConfigProvider>(config: &C) -> Result<GithubPipeline> {
    let fetcher = ReqwestFetcher::from_config(config)?;
    let markup = CalendarMarkup::new()?;

    Ok(ContributionPipeline::new(fetcher, markup).with_retry_policy(RetryPolicy {
        max_attempts: config.retry_attempts(),
        interval: config.retry_delay(),
    }))
}

pub fn build_engine<C: ConfigProvider>(
    config: &C,
    monitor_enabled: bool,
) -> Result<EtlEngine<GithubPipeline>> {
    let pipeline = build_pipeline(config)?;
    Ok(EtlEngine::new_with_monitoring(pipeline, monitor_enabled).with_pacing(config.pacing()))
}

/// Fetches the configured roster and writes the results to `output_path`.
/// Returns the path of the primary output file.
pub async fn run_and_export<C: ConfigProvider>(
    config: &C,
    monitor_enabled: bool,
) -> Result<String> {
    let engine = build_engine(config, monitor_enabled)?;
    let results = engine.run(&config.roster(), config.format()).await?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let exporter = Exporter::new(storage, config.output_path());
    exporter
        .load(&results, config.output_formats(), config.archive())
        .await
}
