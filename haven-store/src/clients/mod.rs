//! reqwest clients for the JSON-over-HTTP RPC surfaces of both services.

use haven_core::RemoteError;
use haven_shared::rpc::{ErrorBody, INTERNAL_KEY_HEADER};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub mod booking;
pub mod property;

pub use booking::BookingServiceClient;
pub use property::PropertyServiceClient;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid internal key: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
    #[error("unable to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

fn build_client(timeout: Duration, internal_key: Option<&str>) -> Result<reqwest::Client, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = internal_key {
        headers.insert(INTERNAL_KEY_HEADER, HeaderValue::from_str(key)?);
    }

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// POSTs `body` to one procedure and decodes the reply or the error body.
async fn call<Req, Resp>(
    client: &reqwest::Client,
    base: &str,
    path: &str,
    body: &Req,
) -> Result<Resp, RemoteError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let url = format!("{}{}", base, path);
    let response = client.post(&url).json(body).send().await.map_err(|e| {
        if e.is_timeout() {
            RemoteError::internal(format!("request to {} timed out", url))
        } else {
            RemoteError::internal(format!("request to {} failed: {}", url, e))
        }
    })?;

    decode(response, &url).await
}

async fn decode<Resp: DeserializeOwned>(response: Response, url: &str) -> Result<Resp, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<Resp>().await.map_err(|e| {
            RemoteError::internal(format!("unable to parse response from {}: {}", url, e))
        });
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(RemoteError::new(body.kind, body.error)),
        // Not one of ours, e.g. a proxy or an extractor rejection
        Err(_) => Err(RemoteError::internal(format!(
            "{} returned {}: {}",
            url,
            status.as_u16(),
            text
        ))),
    }
}
