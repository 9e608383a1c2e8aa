use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use sensor_core::{Payload, publish::Publisher};
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum PutError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Upserts the sensor record over HTTP.
pub struct HttpPublisher {
    client: Client,
    url: String,
}

impl HttpPublisher {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Sends the payload as the request body. Any status outside 2xx is an
    /// error carrying the response body.
    pub async fn put(&self, payload: &Payload) -> Result<(), PutError> {
        let response = self
            .client
            .put(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.as_str().to_owned())
            .send()
            .await?;

        let status = response.status();
        debug!(url = %self.url, %status, "PUT completed");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PutError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Publisher for HttpPublisher {
    type Error = PutError;

    async fn publish(&mut self, payload: &Payload) -> Result<String, PutError> {
        self.put(payload).await?;
        Ok(payload.to_string())
    }
}
