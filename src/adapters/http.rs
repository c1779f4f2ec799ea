use crate::domain::ports::{ConfigProvider, HttpFetch};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://github.com";

pub struct ReqwestFetcher {
    client: Client,
    base_url: Url,
}

impl ReqwestFetcher {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            config.request_timeout(),
            config.user_agent(),
        )
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        let url = self.base_url.join(location)?;

        tracing::debug!("Making request to: {}", url);
        let response = self
            .client
            .get(url.clone())
            .header("x-requested-with", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
