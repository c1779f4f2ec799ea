use crate::adapters::http::DEFAULT_BASE_URL;
use crate::config::{DEFAULT_OUTPUT_PATH, DEFAULT_USER_AGENT};
use crate::core::etl::DEFAULT_PACING;
use crate::core::export::SUPPORTED_FORMATS;
use crate::core::{ConfigProvider, OutputFormat, Roster};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LOG_LEVELS;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub discovery: DiscoveryConfig,
    pub roster: RosterConfig,
    pub load: LoadConfig,
    pub server: ServerConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub usernames: Vec<String>,
    pub pacing_ms: Option<u64>,
    #[serde(deserialize_with = "deserialize_format")]
    pub format: Option<OutputFormat>,
}

/// 只有 "nested" 代表樹狀輸出，其他任何字串都視為 flat
fn deserialize_format<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<OutputFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|value| OutputFormat::from_param(Some(&value))))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub archive: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec!["json".to_string()],
            archive: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_BASE_URL})；未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.base_url", self.base_url())?;

        if let Some(user_agent) = &self.source.user_agent {
            validation::validate_non_empty_string("source.user_agent", user_agent)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        validation::validate_positive_number(
            "discovery.retry_attempts",
            self.retry_attempts() as usize,
            1,
        )?;

        if !self.roster.usernames.is_empty() {
            validation::validate_identifiers("roster.usernames", &self.roster.usernames)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats(
            "load.output_formats",
            &self.load.output_formats,
            &SUPPORTED_FORMATS,
        )?;

        if let Some(level) = self.log_level() {
            validation::validate_allowed("monitoring.log_level", level, &LOG_LEVELS)?;
        }

        if let Some(bind) = &self.server.bind {
            bind.parse::<std::net::SocketAddr>()
                .map_err(|e| EtlError::InvalidConfigValueError {
                    field: "server.bind".to_string(),
                    value: bind.clone(),
                    reason: format!("Invalid socket address: {}", e),
                })?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn bind_address(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.source.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn roster(&self) -> Roster {
        if self.roster.usernames.is_empty() {
            Roster::default()
        } else {
            Roster::new(&self.roster.usernames)
        }
    }

    fn format(&self) -> OutputFormat {
        self.roster.format.unwrap_or_default()
    }

    fn retry_attempts(&self) -> u32 {
        self.discovery.retry_attempts.unwrap_or(20)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.discovery.retry_delay_ms.unwrap_or(2000))
    }

    fn pacing(&self) -> Duration {
        self.roster
            .pacing_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PACING)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(30))
    }

    fn user_agent(&self) -> &str {
        self.source
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn archive(&self) -> bool {
        self.load.archive
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
