use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{Error, Result};

/// Shared HTTP client used by every adapter.
///
/// One request per call, no retries: a non-2xx status becomes
/// [`Error::Status`] and transport failures become [`Error::Http`].
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let inner = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { inner })
    }

    /// Client for page and API fetches, using the configured timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.user_agent, Duration::from_secs(config.http_timeout_secs))
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.get_text_with_query(url, &[]).await
    }

    pub async fn get_text_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        debug!("GET {} {:?}", url, query);

        let response = self.inner.get(url).query(query).send().await?;
        let response = check_status(url, response)?;

        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_query(url, &[]).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get_text_with_query(url, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a urlencoded form, with a per-request timeout override.
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T> {
        debug!("POST {}", url);

        let response = self
            .inner
            .post(url)
            .form(form)
            .timeout(timeout)
            .send()
            .await?;
        let response = check_status(url, response)?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}
