//! HTTP client for the Deal Dive REST backend.
//!
//! The backend owns every record. This client forwards the caller's bearer
//! token, unwraps `{ "data": ... }` envelopes and turns the backend's several
//! error body shapes into [`BackendError`].

mod deals;
mod engagement;
mod error;

pub use error::BackendError;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] when `base_url` cannot be used as a
    /// base, or [`BackendError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|_| BackendError::InvalidUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder, BackendError> {
        let url = self.url(segments)?;
        debug!("Backend {} {}", method, url);

        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T, BackendError> {
        let response = builder.send().await?;
        let body = read_body(response).await?;
        let payload = unwrap_envelope(body)?;

        serde_json::from_value(payload).map_err(|e| BackendError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Like [`Self::send_json`] for list endpoints, but items that fail to
    /// deserialize are logged and skipped instead of failing the whole list.
    async fn send_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<Vec<T>, BackendError> {
        let items: Vec<Value> = self.send_json(builder, context).await?;
        Ok(parse_items(items, context))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), BackendError> {
        let response = builder.send().await?;
        let body = read_body(response).await?;
        unwrap_envelope(body).map(|_| ())
    }
}

fn parse_items<T: DeserializeOwned>(items: Vec<Value>, context: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping item {} in {}: {}", index, context, e);
                None
            }
        })
        .collect()
}

/// Reads a response body as JSON, failing on non-2xx statuses.
async fn read_body(response: Response) -> Result<Value, BackendError> {
    let status = response.status();
    let text = response.text().await?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => Value::String(text.trim().to_string()),
            Err(e) => {
                return Err(BackendError::Deserialize {
                    context: "response body".to_string(),
                    source: e,
                })
            }
        }
    };

    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &body));
    }

    Ok(body)
}

fn unwrap_envelope(body: Value) -> Result<Value, BackendError> {
    match body {
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error").filter(|e| !e.is_null()) {
                return Err(match status_code_of(&error) {
                    Some(status) => BackendError::Status {
                        status,
                        message: error_message(&error),
                    },
                    None => BackendError::Api(error_message(&error)),
                });
            }

            match map.remove("data") {
                Some(data) if !data.is_null() => Ok(data),
                Some(_) => Ok(Value::Null),
                None => Ok(Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}

fn status_code_of(body: &Value) -> Option<u16> {
    body.get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
}

fn error_from_body(http_status: u16, body: &Value) -> BackendError {
    let inner = body.get("error").filter(|e| !e.is_null()).unwrap_or(body);
    BackendError::Status {
        status: status_code_of(inner).unwrap_or(http_status),
        message: error_message(inner),
    }
}

/// Understands `{ statusCode, message }`, `{ detail: [{ msg }] }`, `{ detail }`,
/// `{ message }` and bare strings.
fn error_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    match body.get("detail") {
        Some(Value::Array(items)) => {
            if let Some(msg) = items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
            {
                return msg.to_string();
            }
        }
        Some(Value::String(detail)) => return detail.clone(),
        _ => {}
    }

    match body {
        Value::String(s) => s.clone(),
        Value::Null => "empty response".to_string(),
        other => other.to_string(),
    }
}
