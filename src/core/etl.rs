use crate::core::{OutputFormat, Pipeline, Roster, UserResult};
use crate::utils::error::Result;
use crate::utils::monitor::{RunMonitor, RunStats};
use std::sync::Mutex;
use std::time::Duration;

pub const DEFAULT_PACING: Duration = Duration::from_secs(2);

/// Runs a pipeline over a roster, one identifier at a time, in roster order.
///
/// `pacing` is slept between identifiers to stay under the upstream rate
/// limit. The first hard failure aborts the run and discards what was
/// collected so far.
///
/// Every `run` gets its own [`RunMonitor`], so a long-lived engine (the
/// server keeps one for the whole process) reports per-run numbers.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    pacing: Duration,
    monitor_enabled: bool,
    last_stats: Mutex<Option<RunStats>>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            pacing: DEFAULT_PACING,
            monitor_enabled,
            last_stats: Mutex::new(None),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Stats of the most recent completed run; `None` when monitoring is off.
    pub fn last_run_stats(&self) -> Option<RunStats> {
        self.last_stats.lock().ok().and_then(|stats| stats.clone())
    }

    pub async fn run(&self, roster: &Roster, format: OutputFormat) -> Result<Vec<UserResult>> {
        tracing::info!(
            "🚀 Fetching contributions for {} identifiers ({} format)",
            roster.len(),
            format
        );
        let monitor = RunMonitor::new(self.monitor_enabled);
        monitor.log_stats("Start");

        let mut results = Vec::with_capacity(roster.len());

        for (index, username) in roster.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tracing::debug!("⏳ Waiting {:?} before next identifier", self.pacing);
                tokio::time::sleep(self.pacing).await;
            }

            let data = self
                .pipeline
                .fetch_data_for_all_years(username, format)
                .await?;

            let records = data.day_records().count();
            tracing::info!(
                "✅ Fetched {}: {} years, {} days",
                username,
                data.year_summaries().count(),
                records
            );
            monitor.record_identifier(records);
            if monitor.is_enabled() {
                monitor.log_stats(username);
            }

            results.push(UserResult {
                username: username.to_string(),
                data,
            });
        }

        monitor.log_final_stats();
        if let Ok(mut last) = self.last_stats.lock() {
            *last = monitor.get_stats();
        }
        Ok(results)
    }
}
