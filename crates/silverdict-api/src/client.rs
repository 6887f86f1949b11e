use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use silverdict_config::network::NetworkConfig;

use crate::error::ApiError;

/// REST client for the SilverDict backend
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &NetworkConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` is appended verbatim, so path segments must already be encoded
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    pub(crate) async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!("backend answered {}: {}", status, body);
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
