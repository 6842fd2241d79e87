//! Single-shot JSON transport over reqwest.

use std::time::Duration;

use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::builder::InspectorConfig;
use super::error::LlmError;

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total time allowed for the request, including reading the body.
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP session used for exactly one call per request. Failures are never retried.
pub struct HttpClient {
    client: reqwest::Client,
    inspector_config: Option<InspectorConfig>,
}

impl HttpClient {
    pub fn new(
        config: &HttpClientConfig,
        user_agent: Option<&str>,
        inspector_config: Option<InspectorConfig>,
    ) -> Result<Self, LlmError> {
        let default_ua = format!("sqlprompt/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                LlmError::Configuration(format!("Failed to build reqwest client: {e}"))
            })?;

        Ok(Self {
            client,
            inspector_config,
        })
    }

    /// POST a JSON body and decode the JSON answer.
    ///
    /// 401 and 403 map to [`LlmError::Authentication`], every other non-success
    /// status to [`LlmError::Api`].
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err(level = "debug")
    )]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url = reqwest::Url::parse(url)
            .map_err(|e| LlmError::Configuration(format!("Invalid API URL '{url}': {e}")))?;

        // Serialized as-is so the wire body keeps the struct's field order.
        let body_bytes = serde_json::to_vec(body).map_err(|e| LlmError::Parse {
            message: "Failed to serialize request".to_string(),
            source: Box::new(e),
        })?;

        if let Some(inspector) = self
            .inspector_config
            .as_ref()
            .and_then(|c| c.request_inspector.as_ref())
        {
            let body_value = serde_json::from_slice(&body_bytes).map_err(|e| LlmError::Parse {
                message: "Failed to serialize request for inspection".to_string(),
                source: Box::new(e),
            })?;
            inspector(&body_value);
        }

        let mut req_builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body_bytes);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder.send().await.map_err(|e| LlmError::Network {
            message: "Request failed".to_string(),
            source: Box::new(e),
        })?;

        let status = res.status();
        let response_text = res.text().await.map_err(|e| LlmError::Network {
            message: "Failed to read response body".to_string(),
            source: Box::new(e),
        })?;

        if !status.is_success() {
            debug!(status = %status, "API returned error status");
            self.inspect_response(|| {
                serde_json::from_str(&response_text).unwrap_or_else(|_| {
                    serde_json::json!({
                        "error": response_text,
                        "status_code": status.as_u16()
                    })
                })
            });
            return Err(status_error(status, &response_text));
        }

        debug!(status = %status, "HTTP request successful");

        let response_value: serde_json::Value =
            serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
                message: "Failed to parse response as JSON".to_string(),
                source: Box::new(e),
            })?;

        self.inspect_response(|| response_value.clone());

        serde_json::from_value(response_value).map_err(|e| LlmError::Parse {
            message: "Failed to parse API response".to_string(),
            source: Box::new(e),
        })
    }

    fn inspect_response(&self, value: impl FnOnce() -> serde_json::Value) {
        if let Some(inspector) = self
            .inspector_config
            .as_ref()
            .and_then(|c| c.response_inspector.as_ref())
        {
            inspector(&value());
        }
    }
}

fn status_error(status: StatusCode, body: &str) -> LlmError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication {
            message,
            status_code: status.as_u16(),
        },
        _ => LlmError::Api {
            message: format!("{status}: {message}"),
            status_code: Some(status.as_u16()),
        },
    }
}

/// Pull `error.message` out of an OpenAI-style error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        })
}
