use crate::domain::model::{OutputFormat, UserData, YearExtraction, YearLink};
use crate::domain::roster::Roster;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn roster(&self) -> Roster;
    fn format(&self) -> OutputFormat;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn pacing(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn archive(&self) -> bool;
}

/// Fetches a document relative to the upstream base URL and returns its body.
///
/// Non-success statuses are errors.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Reads contribution data out of one known version of the upstream markup.
pub trait MarkupAdapter: Send + Sync {
    fn year_links(&self, html: &str) -> Result<Vec<YearLink>>;
    fn year_page(&self, html: &str) -> Result<YearPage>;
}

/// Raw values pulled from one year page, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearPage {
    pub heading: String,
    pub cells: Vec<DayCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayCell {
    pub date: Option<String>,
    pub count: Option<String>,
    pub level: Option<String>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, username: &str) -> Result<Vec<YearExtraction>>;
    fn transform(&self, extractions: Vec<YearExtraction>, format: OutputFormat) -> UserData;

    async fn fetch_data_for_all_years(
        &self,
        username: &str,
        format: OutputFormat,
    ) -> Result<UserData> {
        let extractions = self.extract(username).await?;
        Ok(self.transform(extractions, format))
    }
}

pub struct DrawOptions<'a> {
    pub username: &'a str,
    pub contributions: &'a UserData,
    pub theme_name: &'a str,
    pub footer_text: &'a str,
}

/// Pixel rendering is supplied by the caller.
pub trait ChartRenderer {
    type Surface;

    fn draw(&self, surface: &mut Self::Surface, options: &DrawOptions<'_>) -> Result<()>;
}
