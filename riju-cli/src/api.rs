//! HTTP client for the Riju API server

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed: {} - {}", status, error_message(&error_text));
        }

        let data = response.json().await?;
        Ok(data)
    }
}

/// Pull the message out of the server's error envelope, falling back to the raw body
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Envelope {
        message: String,
    }

    serde_json::from_str::<Envelope>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}
