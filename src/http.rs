//! JSON-over-HTTP transport to the exchange REST API.

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, TransportError};

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(base_url: Url) -> Result<Self, Error> {
        let client = Client::builder().build().map_err(Error::HttpClient)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and returns the decoded JSON body.
    ///
    /// Bodies carrying a string `error` field are returned as-is whatever the status,
    /// so that the caller can surface the exchange's message. An empty body
    /// decodes to [`Value::Null`].
    pub async fn fetch_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Value, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| TransportError::Path {
                path: path.to_string(),
                source,
            })?;
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%status, body = %text, "received response");

        if text.trim().is_empty() {
            return if status.is_success() {
                Ok(Value::Null)
            } else {
                Err(TransportError::Status {
                    status: status.as_u16(),
                    body: text,
                })
            };
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value)
                if status.is_success() || value.get("error").and_then(Value::as_str).is_some() =>
            {
                Ok(value)
            }
            Ok(_) => Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(err) => Err(TransportError::Decode(err)),
        }
    }
}
