use crate::adapters::http::DEFAULT_BASE_URL;
use crate::core::export::SUPPORTED_FORMATS;
use crate::core::{ConfigProvider, OutputFormat, Roster};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "contrib-chart")]
#[command(about = "Scrapes contribution calendars for a roster of profiles")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, value_delimiter = ',', help = "Identifiers to fetch (default: built-in roster)")]
    pub roster: Vec<String>,

    #[arg(long, help = "Output shape: 'nested' for a year/month/day tree, anything else is flat")]
    pub format: Option<OutputFormat>,

    #[arg(long, default_value = "20")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "2000")]
    pub retry_delay_ms: u64,

    #[arg(long, default_value = "2000")]
    pub pacing_ms: u64,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = super::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value = super::DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Also write a zip with one JSON file per identifier")]
    pub archive: bool,

    #[arg(short, long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log run statistics")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn roster(&self) -> Roster {
        if self.roster.is_empty() {
            Roster::default()
        } else {
            Roster::new(&self.roster)
        }
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn archive(&self) -> bool {
        self.archive
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_positive_number("retry_attempts", self.retry_attempts as usize, 1)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        if !self.roster.is_empty() {
            validation::validate_identifiers("roster", &self.roster)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats(
            "output_formats",
            &self.output_formats,
            &SUPPORTED_FORMATS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["contrib-chart"]);

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.roster(), Roster::default());
        assert_eq!(config.format(), OutputFormat::Flat);
        assert_eq!(config.retry_attempts(), 20);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.pacing(), Duration::from_secs(2));
        assert_eq!(config.output_formats(), ["json"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "contrib-chart",
            "--roster",
            "alice,Bob,bob",
            "--format",
            "nested",
            "--output-formats",
            "json,csv",
            "--pacing-ms",
            "0",
            "--archive",
        ]);

        assert_eq!(config.roster().as_slice(), ["alice", "Bob"]);
        assert_eq!(config.format(), OutputFormat::Nested);
        assert_eq!(config.output_formats(), ["json", "csv"]);
        assert_eq!(config.pacing(), Duration::ZERO);
        assert!(config.archive());
    }

    #[test]
    fn test_unknown_format_means_flat() {
        let config = CliConfig::parse_from(["contrib-chart", "--format", "tree"]);
        assert_eq!(config.format(), OutputFormat::Flat);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = CliConfig::parse_from(["contrib-chart", "--retry-attempts", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["contrib-chart", "--output-formats", "xml"]);
        assert!(config.validate().is_err());
    }
}
