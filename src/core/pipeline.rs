use crate::core::aggregation::aggregate;
use crate::core::discovery::{discover_years, RetryPolicy};
use crate::core::extraction::fetch_year;
use crate::core::{HttpFetch, MarkupAdapter, OutputFormat, Pipeline, UserData, YearExtraction};
use crate::utils::error::Result;

/// Discovery, year fetch and aggregation for one identifier.
///
/// Years are fetched one after another, never concurrently.
pub struct ContributionPipeline<F: HttpFetch, M: MarkupAdapter> {
    fetcher: F,
    markup: M,
    retry: RetryPolicy,
}

impl<F: HttpFetch, M: MarkupAdapter> ContributionPipeline<F, M> {
    pub fn new(fetcher: F, markup: M) -> Self {
        Self {
            fetcher,
            markup,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait::async_trait]
impl<F: HttpFetch, M: MarkupAdapter> Pipeline for ContributionPipeline<F, M> {
    async fn extract(&self, username: &str) -> Result<Vec<YearExtraction>> {
        let years = discover_years(&self.fetcher, &self.markup, username, &self.retry).await?;
        tracing::debug!("📅 {}: {} year ranges to fetch", username, years.len());

        let mut extractions = Vec::with_capacity(years.len());
        for link in &years {
            extractions.push(fetch_year(&self.fetcher, &self.markup, link).await?);
        }

        Ok(extractions)
    }

    fn transform(&self, extractions: Vec<YearExtraction>, format: OutputFormat) -> UserData {
        aggregate(extractions, format)
    }
}
